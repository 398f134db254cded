mod bandit;
mod exponential;
mod forced;
mod greedy_bandit;
mod hill_climbing;
mod regression;
mod round_robin;

pub use bandit::BanditScheduler;
pub use exponential::ExponentialScheduler;
pub use forced::ForcedImprovementScheduler;
pub use greedy_bandit::GreedyBanditScheduler;
pub use hill_climbing::HillClimbingScheduler;
pub use round_robin::RoundRobinScheduler;

use crate::common::Plan;
use crate::config::{Config, SchedulerMode};
use crate::solver::CubeSolver;

use std::time::Duration;

/// Outcome of one scheduling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every solver ran out of nodes.
    Exhausted,
    FoundPlan,
    /// Nothing found yet, more work is possible.
    FoundNoPlan,
    /// Neither an iteration nor a time budget is configured.
    Error,
}

/// Work granted to a solver in one call. Zero iterations or no time means
/// that dimension is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBudget {
    pub iterations: u64,
    pub time: Option<Duration>,
}

impl SliceBudget {
    pub fn from_config(config: &Config) -> Self {
        SliceBudget {
            iterations: config.scheduler_iterations,
            time: (config.scheduler_time > 0).then(|| Duration::from_millis(config.scheduler_time)),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.iterations == 0 && self.time.is_none()
    }

    /// Both dimensions multiplied by `factor`, never below one unit.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |value: u64| ((value as f64 * factor).round() as u64).max(1);
        SliceBudget {
            iterations: if self.iterations > 0 {
                scale(self.iterations)
            } else {
                0
            },
            time: self
                .time
                .map(|time| Duration::from_millis(scale(time.as_millis() as u64))),
        }
    }
}

/// Distributes budget over the cube solvers of one worker.
pub trait Scheduler: Send {
    fn schedule_next(&mut self) -> ExitStatus;

    fn take_plan(&mut self) -> Option<Plan>;

    fn log_information(&self);
}

pub fn build(config: &Config, solvers: Vec<CubeSolver>) -> Box<dyn Scheduler> {
    let budget = SliceBudget::from_config(config);
    match config.scheduler_mode {
        SchedulerMode::RoundRobin => Box::new(RoundRobinScheduler::new(solvers, budget)),
        SchedulerMode::Exponential => Box::new(ExponentialScheduler::new(
            solvers,
            budget,
            config.scheduler_growth,
        )),
        SchedulerMode::Bandit => Box::new(BanditScheduler::new(
            solvers,
            budget,
            config.bandit_reward,
            regression::horizon(config),
        )),
        SchedulerMode::GreedyBandit => Box::new(GreedyBanditScheduler::new(
            solvers,
            budget,
            regression::horizon(config),
        )),
        SchedulerMode::HillClimbing => Box::new(HillClimbingScheduler::new(
            solvers,
            budget,
            config.scheduler_hill_climb,
        )),
        SchedulerMode::ForcedImprovement => {
            Box::new(ForcedImprovementScheduler::new(solvers, budget))
        }
    }
}

/// Best distance of a solver as a number, unreachable when unknown.
fn distance(solver: &CubeSolver) -> u32 {
    solver
        .best_distance()
        .unwrap_or(crate::heuristic::UNREACHABLE)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::common::{Cube, GroundPlanningProblem, Plan, StopSignal};
    use crate::config::{HeuristicType, SearchStrategy};

    pub(crate) fn config(mode: SchedulerMode) -> Config {
        Config {
            scheduler_mode: mode,
            scheduler_iterations: 1,
            scheduler_time: 0,
            cube_solve_search_strategy: SearchStrategy::BestFirst,
            cube_solve_heuristic: Some(HeuristicType::RelaxedPlan),
            ..Config::default()
        }
    }

    pub(crate) fn solver(problem: &GroundPlanningProblem, config: &Config) -> CubeSolver {
        let cube = Cube::forward(problem, problem.initial_state().clone(), Plan::new());
        CubeSolver::new(cube, config, 1, None, StopSignal::unlimited())
    }

    /// Runs until a terminal status, returning it with the number of calls.
    pub(crate) fn run(scheduler: &mut dyn Scheduler, limit: usize) -> (ExitStatus, usize) {
        for call in 1..=limit {
            let status = scheduler.schedule_next();
            if status != ExitStatus::FoundNoPlan {
                return (status, call);
            }
        }
        (ExitStatus::FoundNoPlan, limit)
    }
}
