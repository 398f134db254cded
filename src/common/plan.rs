use super::{ActionId, GroundPlanningProblem};

use std::collections::VecDeque;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Plan {
    actions: VecDeque<ActionId>,
}

impl Plan {
    pub fn new() -> Self {
        Plan::default()
    }

    pub fn push_front(&mut self, action: ActionId) {
        self.actions.push_front(action);
    }

    pub fn push_back(&mut self, action: ActionId) {
        self.actions.push_back(action);
    }

    /// Puts every action of `prefix` in front of this plan, keeping its order.
    pub fn concat_front(&mut self, prefix: &Plan) {
        for &action in prefix.actions.iter().rev() {
            self.actions.push_front(action);
        }
    }

    pub fn concat_back(&mut self, suffix: &Plan) {
        self.actions.extend(suffix.actions.iter().copied());
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.iter().copied()
    }

    pub fn cost(&self, problem: &GroundPlanningProblem) -> u64 {
        self.iter()
            .map(|id| problem.actions()[id].cost as u64)
            .sum()
    }

    pub fn names<'a>(&self, problem: &'a GroundPlanningProblem) -> Vec<&'a str> {
        self.iter()
            .map(|id| problem.actions()[id].name.as_str())
            .collect()
    }

    /// Replays the plan from the problem's initial state.
    pub fn verify(&self, problem: &GroundPlanningProblem) -> bool {
        let mut state = problem.initial_state().clone();
        for (step, id) in self.iter().enumerate() {
            let Some(action) = problem.actions().get(id) else {
                debug!("step {step}: unknown action {id}");
                return false;
            };
            if !action.is_applicable(&state) {
                debug!("step {step}: action {} is not applicable", action.name);
                return false;
            }
            state = action.apply(&state);
        }
        let reached = problem.goal().is_satisfied(&state);
        if !reached {
            debug!("plan ends in a state that misses the goal");
        }
        reached
    }
}

impl FromIterator<ActionId> for Plan {
    fn from_iter<I: IntoIterator<Item = ActionId>>(iter: I) -> Self {
        Plan {
            actions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures;

    #[test]
    fn test_plan_concatenation_keeps_order() {
        let mut plan: Plan = [3, 4].into_iter().collect();
        plan.concat_front(&[1, 2].into_iter().collect());
        plan.concat_back(&[5].into_iter().collect());
        plan.push_front(0);
        plan.push_back(6);
        assert_eq!(plan.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(plan.len(), 7);
    }

    #[test]
    fn test_verify_chain_plan() {
        let problem = fixtures::chain_problem();
        let plan: Plan = [0, 1].into_iter().collect();
        assert!(plan.verify(&problem));
        assert_eq!(plan.names(&problem), vec!["a1", "a2"]);
        assert_eq!(plan.cost(&problem), 2);

        // a2 is not applicable first; a1 alone misses the goal.
        assert!(![1, 0].into_iter().collect::<Plan>().verify(&problem));
        assert!(![0].into_iter().collect::<Plan>().verify(&problem));
        assert!(![7].into_iter().collect::<Plan>().verify(&problem));
    }
}
