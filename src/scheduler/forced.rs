use super::{distance, ExitStatus, Scheduler, SliceBudget};
use crate::common::Plan;
use crate::solver::CubeSolver;

use tracing::{debug, info};

/// At the start of each round the solvers are sorted by best distance. The
/// current solver keeps its turn as long as every slice improves it.
pub struct ForcedImprovementScheduler {
    solvers: Vec<CubeSolver>,
    budget: SliceBudget,
    next_running: usize,
    rounds: usize,
    plan: Option<Plan>,
}

impl ForcedImprovementScheduler {
    pub fn new(solvers: Vec<CubeSolver>, budget: SliceBudget) -> Self {
        ForcedImprovementScheduler {
            solvers,
            budget,
            next_running: 0,
            rounds: 0,
            plan: None,
        }
    }
}

impl Scheduler for ForcedImprovementScheduler {
    fn schedule_next(&mut self) -> ExitStatus {
        if self.budget.is_unbounded() {
            return ExitStatus::Error;
        }
        if self.solvers.is_empty() {
            return ExitStatus::Exhausted;
        }
        if self.next_running == 0 {
            self.solvers.sort_by_key(distance);
            self.rounds += 1;
        }

        let solver = &mut self.solvers[self.next_running];
        let before = distance(solver);
        if let Some(plan) = solver.calculate_steps(&self.budget) {
            self.plan = Some(plan);
            return ExitStatus::FoundPlan;
        }
        if solver.is_exhausted() {
            debug!("solver {} exhausted", self.next_running);
            self.solvers.remove(self.next_running);
            if self.solvers.is_empty() {
                return ExitStatus::Exhausted;
            }
            if self.next_running >= self.solvers.len() {
                self.next_running = 0;
            }
            return ExitStatus::FoundNoPlan;
        }
        if distance(solver) >= before {
            self.next_running = (self.next_running + 1) % self.solvers.len();
        }
        ExitStatus::FoundNoPlan
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!(
            "forced improvement: rounds {} remaining {}",
            self.rounds,
            self.solvers.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures;
    use crate::config::SchedulerMode;
    use crate::scheduler::testing::{config, solver};

    #[test]
    fn test_closest_solver_runs_while_improving() {
        let config = config(SchedulerMode::ForcedImprovement);
        let far = fixtures::grid_problem(10);
        let near = fixtures::grid_problem(4);
        let solvers = vec![solver(&far, &config), solver(&near, &config)];
        let mut scheduler = ForcedImprovementScheduler::new(
            solvers,
            SliceBudget {
                iterations: 1,
                time: None,
            },
        );
        // The small grid is sorted first and improves with every slice until
        // its goal node is expanded on the seventh.
        for _ in 0..6 {
            assert_eq!(scheduler.schedule_next(), ExitStatus::FoundNoPlan);
        }
        assert_eq!(scheduler.schedule_next(), ExitStatus::FoundPlan);
        assert_eq!(scheduler.rounds, 7);
        let plan = scheduler.take_plan().expect("plan was found");
        assert!(plan.verify(&near));
        assert_eq!(scheduler.solvers[1].total_iterations(), 0);
    }
}
