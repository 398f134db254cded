use fixedbitset::FixedBitSet;
use std::fmt;

/// A single literal: atom `id` required to hold with polarity `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub id: usize,
    pub name: String,
    pub value: bool,
}

/// Bit vector over atom ids. Depending on where it is used it holds either the
/// atoms that are true or the atoms that are required to be false.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AtomSet {
    bits: FixedBitSet,
}

impl AtomSet {
    pub fn new(num_atoms: usize) -> Self {
        AtomSet {
            bits: FixedBitSet::with_capacity(num_atoms),
        }
    }

    pub fn from_ids(num_atoms: usize, ids: impl IntoIterator<Item = usize>) -> Self {
        let mut set = AtomSet::new(num_atoms);
        for id in ids {
            set.insert(id);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn contains(&self, id: usize) -> bool {
        self.bits.contains(id)
    }

    pub fn insert(&mut self, id: usize) {
        assert!(
            id < self.bits.len(),
            "atom {id} out of range for a set of {} atoms",
            self.bits.len()
        );
        self.bits.insert(id);
    }

    /// Superset test: every atom of `other` is in `self`.
    pub fn all(&self, other: &AtomSet) -> bool {
        self.bits.is_superset(&other.bits)
    }

    /// Disjointness test: no atom of `other` is in `self`.
    pub fn none(&self, other: &AtomSet) -> bool {
        self.bits.is_disjoint(&other.bits)
    }

    pub fn intersects(&self, other: &AtomSet) -> bool {
        !self.bits.is_disjoint(&other.bits)
    }

    pub fn union_with(&mut self, other: &AtomSet) {
        self.bits.union_with(&other.bits);
    }

    pub fn difference_with(&mut self, other: &AtomSet) {
        self.bits.difference_with(&other.bits);
    }

    pub fn count(&self) -> usize {
        self.bits.count_ones(..)
    }

    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    /// Atoms that are set in exactly one of the two sets.
    pub fn changed(&self, other: &AtomSet) -> AtomSet {
        AtomSet::from_ids(self.len(), self.bits.symmetric_difference(&other.bits))
    }

    /// Hamming distance between the two sets.
    pub fn distance(&self, other: &AtomSet) -> usize {
        self.bits.symmetric_difference(&other.bits).count()
    }

    /// All atoms of the same universe that are not in this set.
    pub fn complement(&self) -> AtomSet {
        let mut bits = FixedBitSet::with_capacity(self.len());
        bits.insert_range(..);
        bits.difference_with(&self.bits);
        AtomSet { bits }
    }
}

impl fmt::Debug for AtomSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.ones()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_set_basic_operations() {
        let mut a = AtomSet::from_ids(6, [0, 2, 4]);
        let b = AtomSet::from_ids(6, [2, 4]);
        let c = AtomSet::from_ids(6, [1, 3]);

        assert!(a.all(&b));
        assert!(!b.all(&a));
        assert!(a.none(&c));
        assert!(!a.intersects(&c));
        assert!(a.intersects(&b));
        assert_eq!(a.count(), 3);

        a.union_with(&c);
        assert_eq!(a.ones().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        a.difference_with(&b);
        assert_eq!(a.ones().collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn test_atom_set_distance() {
        let a = AtomSet::from_ids(5, [0, 1]);
        let b = AtomSet::from_ids(5, [1, 2, 3]);
        assert_eq!(a.distance(&b), 3);
        assert_eq!(a.distance(&a), 0);
        assert_eq!(a.changed(&b).ones().collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn test_atom_set_complement() {
        let a = AtomSet::from_ids(4, [1, 3]);
        let not_a = a.complement();
        assert_eq!(not_a.ones().collect::<Vec<_>>(), vec![0, 2]);
        assert!(a.all(&a));
        assert!(a.none(&not_a));
        assert_eq!(not_a.len(), 4);
    }

    #[test]
    #[should_panic]
    fn test_atom_set_insert_out_of_range() {
        let mut a = AtomSet::new(2);
        a.insert(2);
    }
}
