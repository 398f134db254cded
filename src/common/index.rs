use super::{Action, ActionId, AtomSet, Goal, State};

/// Per-atom lookup tables over a fixed action list.
#[derive(Debug, Clone)]
pub struct ActionIndex {
    // Actions whose preconditions or effects mention the atom.
    touching: Vec<Vec<ActionId>>,
    // Actions keyed by their lowest positive precondition.
    by_first_precondition: Vec<Vec<ActionId>>,
    without_precondition: Vec<ActionId>,
    adding: Vec<Vec<ActionId>>,
    deleting: Vec<Vec<ActionId>>,
}

impl ActionIndex {
    pub fn new(actions: &[Action], num_atoms: usize) -> Self {
        let mut touching = vec![Vec::new(); num_atoms];
        let mut by_first_precondition = vec![Vec::new(); num_atoms];
        let mut without_precondition = Vec::new();
        let mut adding = vec![Vec::new(); num_atoms];
        let mut deleting = vec![Vec::new(); num_atoms];

        for (id, action) in actions.iter().enumerate() {
            let mut mentioned = action.pre_pos.clone();
            mentioned.union_with(&action.pre_neg);
            mentioned.union_with(&action.eff_pos);
            mentioned.union_with(&action.eff_neg);
            for atom in mentioned.ones() {
                touching[atom].push(id);
            }
            match action.pre_pos.ones().next() {
                Some(atom) => by_first_precondition[atom].push(id),
                None => without_precondition.push(id),
            }
            for atom in action.eff_pos.ones() {
                adding[atom].push(id);
            }
            for atom in action.eff_neg.ones() {
                deleting[atom].push(id);
            }
        }

        ActionIndex {
            touching,
            by_first_precondition,
            without_precondition,
            adding,
            deleting,
        }
    }

    pub fn touching(&self, atom: usize) -> &[ActionId] {
        &self.touching[atom]
    }

    /// Actions with `atom` among their positive effects, ordered by id.
    pub fn adding(&self, atom: usize) -> &[ActionId] {
        &self.adding[atom]
    }

    /// Applicable actions in `state`, ordered by id.
    pub fn applicable(&self, actions: &[Action], state: &State) -> Vec<ActionId> {
        let mut result: Vec<ActionId> = state
            .atom_set()
            .ones()
            .flat_map(|atom| self.by_first_precondition[atom].iter().copied())
            .chain(self.without_precondition.iter().copied())
            .filter(|&id| actions[id].is_applicable(state))
            .collect();
        result.sort_unstable();
        result
    }

    /// Applicable actions in `new` given the ones applicable in `old`. Only
    /// actions touching an atom that changed between the two states are
    /// re-evaluated.
    pub fn update_applicable(
        &self,
        actions: &[Action],
        applicable: &[ActionId],
        old: &State,
        new: &State,
    ) -> Vec<ActionId> {
        let changed = old.atom_set().changed(new.atom_set());
        let mut result: Vec<ActionId> = applicable
            .iter()
            .copied()
            .filter(|&id| !touches_any(&actions[id], &changed) || actions[id].is_applicable(new))
            .chain(
                changed
                    .ones()
                    .flat_map(|atom| self.touching[atom].iter().copied())
                    .filter(|&id| actions[id].is_applicable(new)),
            )
            .collect();
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Actions that can be regressed through `goal`, ordered by id.
    pub fn relevant(&self, actions: &[Action], goal: &Goal) -> Vec<ActionId> {
        let mut result: Vec<ActionId> = goal
            .positive()
            .ones()
            .flat_map(|atom| self.adding[atom].iter().copied())
            .chain(
                goal.negative()
                    .ones()
                    .flat_map(|atom| self.deleting[atom].iter().copied()),
            )
            .collect();
        result.sort_unstable();
        result.dedup();
        result.retain(|&id| goal.can_result_by_applying(&actions[id]));
        result
    }
}

fn touches_any(action: &Action, atoms: &AtomSet) -> bool {
    atoms.intersects(&action.pre_pos) || atoms.intersects(&action.pre_neg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures;

    #[test]
    fn test_incremental_update_matches_full_scan() {
        let problem = fixtures::grid_problem(4);
        let index = problem.index();
        let actions = problem.actions();

        let mut state = problem.initial_state().clone();
        let mut applicable = index.applicable(actions, &state);
        // Walk along the first row and down the last column.
        for _ in 0..6 {
            let &next_action = applicable.last().expect("grid always has a move");
            let next = actions[next_action].apply(&state);
            applicable = index.update_applicable(actions, &applicable, &state, &next);
            assert_eq!(applicable, index.applicable(actions, &next));
            state = next;
        }
    }

    #[test]
    fn test_relevant_actions_for_goal() {
        let problem = fixtures::chain_problem();
        let relevant = problem.index().relevant(problem.actions(), problem.goal());
        assert_eq!(relevant, vec![1]);
        assert_eq!(problem.index().touching(1), &[0, 1]);
    }
}
