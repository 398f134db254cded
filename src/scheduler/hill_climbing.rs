use super::{distance, ExitStatus, Scheduler, SliceBudget};
use crate::common::Plan;
use crate::heuristic::UNREACHABLE;
use crate::solver::CubeSolver;

use std::collections::VecDeque;
use tracing::{debug, info, trace};

struct Climber {
    solver: CubeSolver,
    improvement: i64,
    runs: u32,
}

impl Climber {
    fn average(&self) -> f64 {
        if self.runs == 0 {
            f64::MAX
        } else {
            self.improvement as f64 / self.runs as f64
        }
    }
}

/// Keeps running the front solver while it improves as well as the others
/// do on average. A solver whose average improvement per slice drops below
/// `fraction` of the global average is moved to the back of the queue. The
/// global average only covers solvers still in the queue.
pub struct HillClimbingScheduler {
    queue: VecDeque<Climber>,
    budget: SliceBudget,
    fraction: f64,
    total_runs: u64,
    rotations: usize,
    plan: Option<Plan>,
}

impl HillClimbingScheduler {
    pub fn new(solvers: Vec<CubeSolver>, budget: SliceBudget, fraction: f64) -> Self {
        HillClimbingScheduler {
            queue: solvers
                .into_iter()
                .map(|solver| Climber {
                    solver,
                    improvement: 0,
                    runs: 0,
                })
                .collect(),
            budget,
            fraction,
            total_runs: 0,
            rotations: 0,
            plan: None,
        }
    }

    fn global_average(&self) -> f64 {
        let (improvement, runs) = self
            .queue
            .iter()
            .fold((0i64, 0u64), |(improvement, runs), climber| {
                (improvement + climber.improvement, runs + climber.runs as u64)
            });
        if runs == 0 {
            0.0
        } else {
            improvement as f64 / runs as f64
        }
    }

    /// Moves plateaued solvers to the back, at most once around the queue.
    fn rotate_plateaus(&mut self) {
        let threshold = self.global_average() * self.fraction;
        for _ in 0..self.queue.len() {
            match self.queue.front() {
                Some(front) if front.average() < threshold => {
                    trace!("solver plateaued at {}", front.average());
                    self.queue.rotate_left(1);
                    self.rotations += 1;
                }
                _ => break,
            }
        }
    }
}

impl Scheduler for HillClimbingScheduler {
    fn schedule_next(&mut self) -> ExitStatus {
        if self.budget.is_unbounded() {
            return ExitStatus::Error;
        }
        if self.queue.is_empty() {
            return ExitStatus::Exhausted;
        }
        self.rotate_plateaus();

        let Some(front) = self.queue.front_mut() else {
            return ExitStatus::Exhausted;
        };
        let before = distance(&front.solver);
        if let Some(plan) = front.solver.calculate_steps(&self.budget) {
            self.plan = Some(plan);
            return ExitStatus::FoundPlan;
        }
        if front.solver.is_exhausted() {
            debug!("solver exhausted after {} runs", front.runs);
            self.queue.pop_front();
            return if self.queue.is_empty() {
                ExitStatus::Exhausted
            } else {
                ExitStatus::FoundNoPlan
            };
        }
        self.total_runs += 1;
        let after = distance(&front.solver);
        if before == UNREACHABLE || after == UNREACHABLE {
            trace!("no distance to compare, slice not recorded");
            return ExitStatus::FoundNoPlan;
        }
        front.improvement += before as i64 - after as i64;
        front.runs += 1;
        ExitStatus::FoundNoPlan
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!(
            "hill climbing: runs {} rotations {} remaining {} global average {:.3}",
            self.total_runs,
            self.rotations,
            self.queue.len(),
            self.global_average()
        );
    }
}
