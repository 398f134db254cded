mod goal_count;
mod relaxed;

pub use goal_count::GoalCount;
pub use relaxed::{RelaxedGraph, RelaxedPathLength, RelaxedPlan};

use crate::common::{Goal, GroundPlanningProblem, State};
use crate::config::HeuristicType;

/// Value of a node from which the goal cannot be reached, even when deletes
/// are ignored. Larger than every real estimate.
pub const UNREACHABLE: u32 = u32::MAX;

/// Estimates the number of actions needed to get from `state` to `goal`.
/// Forward nodes pass their own state and the problem's goal, backward nodes
/// pass the problem's initial state and their own region.
pub trait Heuristic: Send {
    fn value(
        &mut self,
        problem: &GroundPlanningProblem,
        state: &State,
        goal: &Goal,
        depth: usize,
    ) -> u32;
}

pub fn build(kind: HeuristicType, seed: u64) -> Box<dyn Heuristic> {
    match kind {
        HeuristicType::RelaxedPlan => Box::new(RelaxedPlan),
        HeuristicType::RelaxedPathLength => Box::new(RelaxedPathLength),
        HeuristicType::GoalCount => Box::new(GoalCount::new(seed)),
    }
}
