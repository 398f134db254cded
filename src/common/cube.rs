use super::{Goal, GroundPlanningProblem, Plan, State};

/// A sub-problem of the original task. Forward cubes replace the initial
/// state and carry the prefix leading to it, backward cubes replace the goal
/// and carry the suffix leading from it.
#[derive(Clone, Debug)]
pub struct Cube {
    problem: GroundPlanningProblem,
    front: Plan,
    back: Plan,
}

impl Cube {
    pub fn forward(original: &GroundPlanningProblem, initial_state: State, front: Plan) -> Self {
        Cube {
            problem: original.with_initial_state(initial_state),
            front,
            back: Plan::new(),
        }
    }

    pub fn backward(original: &GroundPlanningProblem, goal: Goal, back: Plan) -> Self {
        Cube {
            problem: original.with_goal(goal),
            front: Plan::new(),
            back,
        }
    }

    pub fn problem(&self) -> &GroundPlanningProblem {
        &self.problem
    }

    pub fn front(&self) -> &Plan {
        &self.front
    }

    pub fn back(&self) -> &Plan {
        &self.back
    }

    /// Splices a plan of the sub-problem into a plan of the original problem.
    pub fn finalize_plan(&self, mut local: Plan) -> Plan {
        local.concat_front(&self.front);
        local.concat_back(&self.back);
        local
    }
}
