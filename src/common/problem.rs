use super::{Action, ActionIndex, Goal, State};

use std::sync::Arc;

/// Fully ground planning task. Copies made with a substituted initial state
/// or goal share the action list, the atom names and the action index.
#[derive(Clone, Debug)]
pub struct GroundPlanningProblem {
    initial_state: State,
    goal: Goal,
    actions: Arc<Vec<Action>>,
    atom_names: Arc<Vec<String>>,
    index: Arc<ActionIndex>,
}

impl GroundPlanningProblem {
    pub fn new(
        initial_state: State,
        goal: Goal,
        actions: Vec<Action>,
        atom_names: Vec<String>,
    ) -> Self {
        let num_atoms = atom_names.len();
        assert_eq!(initial_state.num_atoms(), num_atoms);
        assert_eq!(goal.num_atoms(), num_atoms);
        for action in &actions {
            assert_eq!(
                action.pre_pos.len(),
                num_atoms,
                "action {} was built for another atom table",
                action.name
            );
        }
        let index = ActionIndex::new(&actions, num_atoms);
        GroundPlanningProblem {
            initial_state,
            goal,
            actions: Arc::new(actions),
            atom_names: Arc::new(atom_names),
            index: Arc::new(index),
        }
    }

    pub fn with_initial_state(&self, initial_state: State) -> Self {
        GroundPlanningProblem {
            initial_state,
            ..self.clone()
        }
    }

    pub fn with_goal(&self, goal: Goal) -> Self {
        GroundPlanningProblem {
            goal,
            ..self.clone()
        }
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn atom_names(&self) -> &[String] {
        &self.atom_names
    }

    pub fn num_atoms(&self) -> usize {
        self.atom_names.len()
    }

    pub fn index(&self) -> &ActionIndex {
        &self.index
    }
}
