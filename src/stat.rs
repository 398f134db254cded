use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub cube_find_time: Duration,
    pub cube_solve_time: Duration,
    pub num_cubes: usize,
    pub num_workers: usize,
    pub found_while_cubing: bool,
    pub plan_length: Option<usize>,
    pub discarded_plans: usize,
}

impl Stats {
    pub fn total_time(&self) -> Duration {
        self.cube_find_time + self.cube_solve_time
    }

    pub(crate) fn print(&self) {
        info!(
            "Cubes {} Workers {} Find time(ms) {} Solve time(ms) {} Total time(ms) {}",
            self.num_cubes,
            self.num_workers,
            self.cube_find_time.as_millis(),
            self.cube_solve_time.as_millis(),
            self.total_time().as_millis()
        );
        match self.plan_length {
            Some(length) => info!(
                "Plan length {length} found while cubing {} discarded plans {}",
                self.found_while_cubing, self.discarded_plans
            ),
            None => info!("No plan found"),
        }
    }
}
