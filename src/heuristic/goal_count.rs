use super::Heuristic;
use crate::common::{Goal, GroundPlanningProblem, State};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Cheap non-relaxed guidance: unsatisfied goal literals plus depth, scaled
/// by ten, plus a random tiebreak below ten.
#[derive(Debug, Clone)]
pub struct GoalCount {
    rng: StdRng,
}

impl GoalCount {
    pub fn new(seed: u64) -> Self {
        GoalCount {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Heuristic for GoalCount {
    fn value(&mut self, _: &GroundPlanningProblem, state: &State, goal: &Goal, depth: usize) -> u32 {
        let distance = (depth + goal.unsatisfied_count(state)) as u32;
        distance
            .saturating_mul(10)
            .saturating_add(self.rng.gen_range(0..10))
    }
}
