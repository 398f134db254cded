use super::{ExitStatus, Scheduler, SliceBudget};
use crate::common::Plan;
use crate::solver::CubeSolver;

use std::collections::VecDeque;
use tracing::{debug, info};

/// Admits one more solver per cycle over the running list. A solver at
/// position `i` gets `initial * growth^(cycle - i)`, so the longer a solver
/// has been running the larger its slices grow.
pub struct ExponentialScheduler {
    running: Vec<CubeSolver>,
    waiting: VecDeque<CubeSolver>,
    budget: SliceBudget,
    growth: f64,
    cycle: u32,
    position: usize,
    plan: Option<Plan>,
    num_exhausted: usize,
}

impl ExponentialScheduler {
    pub fn new(solvers: Vec<CubeSolver>, budget: SliceBudget, growth: f64) -> Self {
        ExponentialScheduler {
            running: Vec::new(),
            waiting: solvers.into(),
            budget,
            growth,
            cycle: 0,
            position: 0,
            plan: None,
            num_exhausted: 0,
        }
    }

    fn slice(&self) -> SliceBudget {
        let exponent = (self.cycle as i32 - 1 - self.position as i32).max(0);
        self.budget.scaled(self.growth.powi(exponent))
    }
}

impl Scheduler for ExponentialScheduler {
    fn schedule_next(&mut self) -> ExitStatus {
        if self.budget.is_unbounded() {
            return ExitStatus::Error;
        }
        if self.position >= self.running.len() {
            if let Some(solver) = self.waiting.pop_front() {
                self.running.push(solver);
            }
            self.cycle += 1;
            self.position = 0;
            if self.running.is_empty() {
                return ExitStatus::Exhausted;
            }
        }

        let slice = self.slice();
        let solver = &mut self.running[self.position];
        if let Some(plan) = solver.calculate_steps(&slice) {
            self.plan = Some(plan);
            return ExitStatus::FoundPlan;
        }
        if solver.is_exhausted() {
            debug!("solver at position {} exhausted", self.position);
            self.running.remove(self.position);
            self.num_exhausted += 1;
            if self.running.is_empty() && self.waiting.is_empty() {
                return ExitStatus::Exhausted;
            }
        } else {
            self.position += 1;
        }
        ExitStatus::FoundNoPlan
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!(
            "exponential: cycles {} running {} waiting {} exhausted {}",
            self.cycle,
            self.running.len(),
            self.waiting.len(),
            self.num_exhausted
        );
    }
}
