use super::regression;
use super::{distance, ExitStatus, Scheduler, SliceBudget};
use crate::common::Plan;
use crate::heuristic::UNREACHABLE;
use crate::solver::CubeSolver;

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

struct Slot {
    solver: CubeSolver,
    history: Vec<u32>,
    plays: u32,
}

/// Runs every solver once, then always the one with the smallest estimated
/// number of remaining slices.
pub struct GreedyBanditScheduler {
    slots: Vec<Option<Slot>>,
    budget: SliceBudget,
    horizon: f64,
    warm_up: usize,
    queue: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>>,
    plan: Option<Plan>,
}

impl GreedyBanditScheduler {
    pub fn new(solvers: Vec<CubeSolver>, budget: SliceBudget, horizon: f64) -> Self {
        GreedyBanditScheduler {
            slots: solvers
                .into_iter()
                .map(|solver| {
                    Some(Slot {
                        solver,
                        history: Vec::new(),
                        plays: 0,
                    })
                })
                .collect(),
            budget,
            horizon,
            warm_up: 0,
            queue: BinaryHeap::new(),
            plan: None,
        }
    }

    fn select(&mut self) -> Option<usize> {
        while self.warm_up < self.slots.len() {
            let index = self.warm_up;
            self.warm_up += 1;
            if self.slots[index].is_some() {
                return Some(index);
            }
        }
        while let Some(Reverse((_, index))) = self.queue.pop() {
            if self.slots[index].is_some() {
                return Some(index);
            }
        }
        None
    }
}

impl Scheduler for GreedyBanditScheduler {
    fn schedule_next(&mut self) -> ExitStatus {
        if self.budget.is_unbounded() {
            return ExitStatus::Error;
        }
        let Some(index) = self.select() else {
            return ExitStatus::Exhausted;
        };
        let Some(slot) = self.slots[index].as_mut() else {
            return ExitStatus::Exhausted;
        };

        if let Some(plan) = slot.solver.calculate_steps(&self.budget) {
            self.plan = Some(plan);
            return ExitStatus::FoundPlan;
        }
        slot.plays += 1;
        if slot.solver.is_exhausted() {
            debug!("solver {index} retired after {} plays", slot.plays);
            self.slots[index] = None;
            return ExitStatus::FoundNoPlan;
        }
        let current = distance(&slot.solver);
        if current != UNREACHABLE {
            slot.history.push(current);
        }
        let remaining = regression::remaining_slices(&slot.history, self.horizon);
        trace!("solver {index} needs about {remaining} more slices");
        self.queue.push(Reverse((OrderedFloat(remaining), index)));
        ExitStatus::FoundNoPlan
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        let plays: Vec<u32> = self
            .slots
            .iter()
            .map(|slot| slot.as_ref().map_or(0, |slot| slot.plays))
            .collect();
        let retired = self.slots.iter().filter(|slot| slot.is_none()).count();
        info!("greedy bandit: retired {retired} plays per live solver {plays:?}");
    }
}
