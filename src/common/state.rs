use super::AtomSet;

/// Total assignment of the problem's atoms. The backing set holds the true
/// atoms, every other atom is false.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    atoms: AtomSet,
}

impl State {
    pub fn new(atoms: AtomSet) -> Self {
        State { atoms }
    }

    pub fn holds(&self, atom: usize) -> bool {
        self.atoms.contains(atom)
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom_set(&self) -> &AtomSet {
        &self.atoms
    }

    pub fn false_atoms(&self) -> AtomSet {
        self.atoms.complement()
    }

    pub fn distance(&self, other: &State) -> usize {
        self.atoms.distance(&other.atoms)
    }
}
