//! Extended set operations over slices.

use std::collections::HashSet;
use std::hash::Hash;

use crate::sampling::RandomSource;

/// Binary set operator used by [`de_morgan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersection,
}

impl SetOperator {
    /// The operator De Morgan's laws swap this one for.
    pub fn dual(self) -> Self {
        match self {
            SetOperator::Union => SetOperator::Intersection,
            SetOperator::Intersection => SetOperator::Union,
        }
    }

    fn holds(self, in_a: bool, in_b: bool) -> bool {
        match self {
            SetOperator::Union => in_a || in_b,
            SetOperator::Intersection => in_a && in_b,
        }
    }
}

/// Fisher-Yates shuffle in place.
pub(crate) fn shuffle_in_place<T>(items: &mut [T], random: &dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = random.below(i + 1);
        items.swap(i, j);
    }
}

/// A copy of `source` shuffled `permutations` times. Zero permutations is a plain copy.
pub fn permutate<T: Clone>(source: &[T], permutations: usize, random: &dyn RandomSource) -> Vec<T> {
    let mut items = source.to_vec();
    for _ in 0..permutations {
        shuffle_in_place(&mut items, random);
    }
    items
}

/// A reversed copy of `source`.
pub fn reflect<T: Clone>(source: &[T]) -> Vec<T> {
    source.iter().rev().cloned().collect()
}

pub fn identity<T: Clone>(source: &[T]) -> Vec<T> {
    source.to_vec()
}

/// Complement of `a op b` within `universe`, computed as `¬a op' ¬b` where `op'` is the
/// dual of `op`.
///
/// Results follow `universe` order without duplicates. Elements of `a` or `b` outside
/// `universe` are ignored.
pub fn de_morgan<T>(universe: &[T], a: &[T], b: &[T], op: SetOperator) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let a: HashSet<&T> = a.iter().collect();
    let b: HashSet<&T> = b.iter().collect();
    let dual = op.dual();

    let mut seen = HashSet::new();
    universe
        .iter()
        .filter(|item| seen.insert(*item))
        .filter(|item| dual.holds(!a.contains(item), !b.contains(item)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::ThreadSafeRandom;

    fn direct_complement(universe: &[u32], a: &[u32], b: &[u32], op: SetOperator) -> Vec<u32> {
        let mut seen = HashSet::new();
        universe
            .iter()
            .filter(|x| seen.insert(**x))
            .filter(|x| !op.holds(a.contains(x), b.contains(x)))
            .cloned()
            .collect()
    }

    #[test]
    fn de_morgan_matches_direct_complement() {
        let universe: Vec<u32> = (0..10).collect();
        let a = [1, 2, 3, 4];
        let b = [3, 4, 5, 6, 42];

        for op in [SetOperator::Union, SetOperator::Intersection] {
            assert_eq!(
                de_morgan(&universe, &a, &b, op),
                direct_complement(&universe, &a, &b, op)
            );
        }
        assert_eq!(
            de_morgan(&universe, &a, &b, SetOperator::Union),
            vec![0, 7, 8, 9]
        );
    }

    #[test]
    fn de_morgan_dedupes_universe() {
        assert_eq!(
            de_morgan(&[1, 1, 2, 3], &[2], &[], SetOperator::Intersection),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn reflect_and_identity() {
        assert_eq!(reflect(&[1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(identity(&[1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn permutate_keeps_elements() {
        let random = ThreadSafeRandom::seeded(9);
        let source: Vec<u32> = (0..50).collect();

        assert_eq!(permutate(&source, 0, &random), source);

        let mut shuffled = permutate(&source, 3, &random);
        assert_ne!(shuffled, source);
        shuffled.sort();
        assert_eq!(shuffled, source);
    }
}
