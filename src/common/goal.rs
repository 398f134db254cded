use super::{Action, Atom, AtomSet, State};

/// Conjunction of literals. Also used as the region of a backward search node,
/// in which case `positive` are the atoms required true and `negative` the
/// atoms required false.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Goal {
    positive: AtomSet,
    negative: AtomSet,
}

impl Goal {
    pub fn new(positive: AtomSet, negative: AtomSet) -> Self {
        assert_eq!(positive.len(), negative.len());
        assert!(
            positive.none(&negative),
            "goal requires atoms {:?} to be both true and false",
            AtomSet::from_ids(
                positive.len(),
                positive.ones().filter(|&id| negative.contains(id))
            )
        );
        Goal { positive, negative }
    }

    pub fn from_atoms(num_atoms: usize, atoms: &[Atom]) -> Self {
        let positive = AtomSet::from_ids(num_atoms, atoms.iter().filter(|a| a.value).map(|a| a.id));
        let negative = AtomSet::from_ids(num_atoms, atoms.iter().filter(|a| !a.value).map(|a| a.id));
        Goal::new(positive, negative)
    }

    /// The region satisfied by exactly one state.
    pub fn from_state(state: &State) -> Self {
        Goal::new(state.atom_set().clone(), state.false_atoms())
    }

    pub fn positive(&self) -> &AtomSet {
        &self.positive
    }

    pub fn negative(&self) -> &AtomSet {
        &self.negative
    }

    pub fn num_atoms(&self) -> usize {
        self.positive.len()
    }

    pub fn is_satisfied(&self, state: &State) -> bool {
        let atoms = state.atom_set();
        atoms.all(&self.positive) && atoms.none(&self.negative)
    }

    /// Satisfaction under delete relaxation: only the positive part counts.
    pub fn is_satisfied_relaxed(&self, reached: &AtomSet) -> bool {
        reached.all(&self.positive)
    }

    pub fn unsatisfied_count(&self, state: &State) -> usize {
        let atoms = state.atom_set();
        let missing = self.positive.ones().filter(|&id| !atoms.contains(id)).count();
        let violated = self.negative.ones().filter(|&id| atoms.contains(id)).count();
        missing + violated
    }

    /// Whether `action` could have produced part of this region without
    /// contradicting any of it.
    pub fn can_result_by_applying(&self, action: &Action) -> bool {
        let supports =
            self.positive.intersects(&action.eff_pos) || self.negative.intersects(&action.eff_neg);
        supports && self.positive.none(&action.eff_neg) && self.negative.none(&action.eff_pos)
    }

    /// Region that must hold before `action` so that this region holds after
    /// it. Returns `None` when the action is not usable or the regressed region
    /// would require an atom to be both true and false.
    pub fn regress(&self, action: &Action) -> Option<Goal> {
        if !self.can_result_by_applying(action) {
            return None;
        }
        let mut positive = self.positive.clone();
        positive.difference_with(&action.eff_pos);
        positive.union_with(&action.pre_pos);

        let mut negative = self.negative.clone();
        negative.difference_with(&action.eff_neg);
        negative.union_with(&action.pre_neg);

        if positive.intersects(&negative) {
            return None;
        }
        Some(Goal { positive, negative })
    }

    pub fn distance(&self, other: &Goal) -> usize {
        self.positive.distance(&other.positive) + self.negative.distance(&other.negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures;

    #[test]
    fn test_goal_satisfaction_with_negative_literals() {
        let goal = Goal::new(AtomSet::from_ids(3, [2]), AtomSet::from_ids(3, [0]));
        assert!(goal.is_satisfied(&State::new(AtomSet::from_ids(3, [1, 2]))));
        assert!(!goal.is_satisfied(&State::new(AtomSet::from_ids(3, [0, 2]))));
        assert_eq!(goal.unsatisfied_count(&State::new(AtomSet::from_ids(3, [0]))), 2);
        assert!(goal.is_satisfied_relaxed(&AtomSet::from_ids(3, [0, 2])));
    }

    #[test]
    #[should_panic]
    fn test_contradictory_goal_is_rejected() {
        Goal::new(AtomSet::from_ids(2, [1]), AtomSet::from_ids(2, [1]));
    }

    #[test]
    fn test_regression_through_applied_action_is_satisfied_by_predecessor() {
        let problem = fixtures::switches_problem();
        let mut state = problem.initial_state().clone();
        for (id, action) in problem.actions().iter().enumerate() {
            if !action.is_applicable(&state) {
                continue;
            }
            let next = action.apply(&state);
            let region = Goal::from_state(&next);
            let regressed = region
                .regress(action)
                .unwrap_or_else(|| panic!("action {id} cannot be regressed"));
            assert!(regressed.is_satisfied(&state));
            state = next;
        }
    }

    #[test]
    fn test_regression_rejects_contradicting_action() {
        let problem = fixtures::switches_problem();
        let goal = problem.goal().clone();
        let light = &problem.actions()[0];
        let off1 = &problem.actions()[1];
        let on1 = &problem.actions()[3];

        let before_off1 = goal.regress(off1).expect("off1 achieves a goal literal");
        assert!(before_off1.positive().contains(0));
        assert!(!before_off1.negative().contains(0));
        assert!(before_off1.negative().contains(1));

        // "light" needs switch two on while the region still requires it off.
        assert!(before_off1.can_result_by_applying(light));
        assert!(before_off1.regress(light).is_none());

        // Turning switch one on contradicts a region requiring it off.
        assert!(!goal.can_result_by_applying(on1));
        assert!(goal.regress(on1).is_none());
    }
}
