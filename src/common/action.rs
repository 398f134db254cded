use super::{AtomSet, State};

/// Index of an action in the problem's action list.
pub type ActionId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub cost: u32,
    pub pre_pos: AtomSet,
    pub pre_neg: AtomSet,
    pub eff_pos: AtomSet,
    pub eff_neg: AtomSet,
}

impl Action {
    pub fn is_applicable(&self, state: &State) -> bool {
        let atoms = state.atom_set();
        atoms.all(&self.pre_pos) && atoms.none(&self.pre_neg)
    }

    /// Delete relaxation: negative preconditions are ignored.
    pub fn is_applicable_relaxed(&self, reached: &AtomSet) -> bool {
        reached.all(&self.pre_pos)
    }

    /// Deletes first, then adds.
    pub fn apply(&self, state: &State) -> State {
        let mut atoms = state.atom_set().clone();
        atoms.difference_with(&self.eff_neg);
        atoms.union_with(&self.eff_pos);
        State::new(atoms)
    }
}
