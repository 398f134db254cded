use super::{ExitStatus, Scheduler, SliceBudget};
use crate::common::Plan;
use crate::solver::CubeSolver;

use tracing::{debug, info};

/// Gives every solver the same slice in turn.
pub struct RoundRobinScheduler {
    solvers: Vec<CubeSolver>,
    budget: SliceBudget,
    current: usize,
    plan: Option<Plan>,
    calls: usize,
    num_exhausted: usize,
}

impl RoundRobinScheduler {
    pub fn new(solvers: Vec<CubeSolver>, budget: SliceBudget) -> Self {
        RoundRobinScheduler {
            solvers,
            budget,
            current: 0,
            plan: None,
            calls: 0,
            num_exhausted: 0,
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    fn schedule_next(&mut self) -> ExitStatus {
        if self.budget.is_unbounded() {
            return ExitStatus::Error;
        }
        if self.solvers.is_empty() {
            return ExitStatus::Exhausted;
        }
        self.calls += 1;
        self.current %= self.solvers.len();

        let solver = &mut self.solvers[self.current];
        if let Some(plan) = solver.calculate_steps(&self.budget) {
            self.plan = Some(plan);
            return ExitStatus::FoundPlan;
        }
        if solver.is_exhausted() {
            debug!("solver {} exhausted", self.current);
            self.solvers.remove(self.current);
            self.num_exhausted += 1;
            if self.solvers.is_empty() {
                return ExitStatus::Exhausted;
            }
        } else {
            self.current += 1;
        }
        ExitStatus::FoundNoPlan
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!(
            "round robin: calls {} exhausted {} remaining {}",
            self.calls,
            self.num_exhausted,
            self.solvers.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures;
    use crate::config::SchedulerMode;
    use crate::scheduler::testing::{config, run, solver};

    #[test]
    fn test_round_robin_liveness() {
        let problem = fixtures::chain_problem();
        let config = config(SchedulerMode::RoundRobin);
        let budget = SliceBudget {
            iterations: 10,
            time: None,
        };
        // Every solver finishes within one slice, so the first call wins.
        for k in [1, 3, 7] {
            let solvers = (0..k).map(|_| solver(&problem, &config)).collect();
            let mut scheduler = RoundRobinScheduler::new(solvers, budget);
            let (status, calls) = run(&mut scheduler, k);
            assert_eq!(status, ExitStatus::FoundPlan);
            assert!(calls <= k);
            assert!(scheduler.take_plan().is_some_and(|plan| plan.verify(&problem)));
        }
    }

    #[test]
    fn test_round_robin_cycles_in_order() {
        let grid = fixtures::grid_problem(5);
        let config = config(SchedulerMode::RoundRobin);
        let solvers = (0..3).map(|_| solver(&grid, &config)).collect();
        let mut scheduler = RoundRobinScheduler::new(
            solvers,
            SliceBudget {
                iterations: 1,
                time: None,
            },
        );
        for _ in 0..6 {
            assert_eq!(scheduler.schedule_next(), ExitStatus::FoundNoPlan);
        }
        let iterations: Vec<u64> = scheduler.solvers.iter().map(|s| s.total_iterations()).collect();
        assert_eq!(iterations, vec![2, 2, 2]);
    }

    #[test]
    fn test_round_robin_drops_exhausted_solvers() {
        let unsolvable = fixtures::unsolvable_problem();
        let grid = fixtures::grid_problem(5);
        let config = config(SchedulerMode::RoundRobin);
        let solvers = vec![solver(&unsolvable, &config), solver(&grid, &config)];
        let mut scheduler = RoundRobinScheduler::new(
            solvers,
            SliceBudget {
                iterations: 1,
                time: None,
            },
        );
        assert_eq!(scheduler.schedule_next(), ExitStatus::FoundNoPlan);
        assert_eq!(scheduler.solvers.len(), 1);
        assert_eq!(scheduler.num_exhausted, 1);
    }
}
