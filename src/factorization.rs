//! Enumeration of segment-length factorizations.
//!
//! A ray's clue number is the product of its segment lengths, so every way
//! of writing the number as an ordered product is a potential path shape.
//! Only the first and last segment may have length 1 (a mirror on the
//! border cell), which is why 1 is only ever added at the ends.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::error::{MirrorError, Result};

/// Ordered segment lengths of one path shape.
pub type Factorization = Vec<u64>;

/// Memo key: (remaining value, smallest allowed factor, remaining length).
type MemoKey = (u64, u64, usize);

/// Limits on the factorizations considered for a clue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FactorBounds {
    /// Longest allowed tuple, boundary 1's included.
    pub max_len: usize,
    /// Largest allowed segment length.
    pub max_factor: u64,
}

impl FactorBounds {
    pub const fn new(max_len: usize, max_factor: u64) -> Self {
        Self {
            max_len,
            max_factor,
        }
    }
}

/// Enumerates factorizations, sharing the core memo across numbers.
pub struct Factorizer {
    bounds: FactorBounds,
    memo: FxHashMap<MemoKey, Vec<Factorization>>,
}

impl Factorizer {
    pub fn new(bounds: FactorBounds) -> Self {
        Self {
            bounds,
            memo: FxHashMap::default(),
        }
    }

    /// All admissible ordered factorizations of `number`.
    pub fn enumerate(&mut self, number: u64) -> Result<BTreeSet<Factorization>> {
        let max_len = self.bounds.max_len;
        let mut result = BTreeSet::new();

        match number {
            0 => return Err(MirrorError::ZeroClue),
            1 => {
                if max_len >= 1 {
                    result.insert(vec![1]);
                }
                if max_len >= 2 {
                    result.insert(vec![1, 1]);
                }
            }
            _ => {
                for core in self.sorted_cores(number, 2, max_len) {
                    let mut permutation = core;
                    loop {
                        insert_with_boundary_ones(&mut result, &permutation, max_len);
                        if !next_permutation(&mut permutation) {
                            break;
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    /// Non-decreasing factor tuples of `value` with every factor in
    /// `[start, max_factor]`, at most `budget` long.
    fn sorted_cores(&mut self, value: u64, start: u64, budget: usize) -> Vec<Factorization> {
        let key = (value, start, budget);
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }

        let mut cores = Vec::new();
        let upper = value.min(self.bounds.max_factor);
        for factor in start.max(2)..=upper {
            if value % factor != 0 {
                continue;
            }
            if factor == value {
                cores.push(vec![factor]);
            } else if budget > 1 {
                for tail in self.sorted_cores(value / factor, factor, budget - 1) {
                    let mut core = Vec::with_capacity(tail.len() + 1);
                    core.push(factor);
                    core.extend(tail);
                    cores.push(core);
                }
            }
        }

        self.memo.insert(key, cores.clone());
        cores
    }
}

/// Adds `permutation` and its 1-padded variants that fit in `max_len`.
fn insert_with_boundary_ones(
    result: &mut BTreeSet<Factorization>,
    permutation: &[u64],
    max_len: usize,
) {
    let len = permutation.len();
    if len <= max_len {
        result.insert(permutation.to_vec());
    }
    if len + 1 <= max_len {
        let mut leading = Vec::with_capacity(len + 1);
        leading.push(1);
        leading.extend_from_slice(permutation);
        result.insert(leading);

        let mut trailing = permutation.to_vec();
        trailing.push(1);
        result.insert(trailing);
    }
    if len + 2 <= max_len {
        let mut both = Vec::with_capacity(len + 2);
        both.push(1);
        both.extend_from_slice(permutation);
        both.push(1);
        result.insert(both);
    }
}

/// Rearranges `values` into the next lexicographic permutation.
///
/// Starting from sorted order this visits each distinct permutation once.
/// Returns `false` (leaving the slice untouched) at the last permutation.
fn next_permutation(values: &mut [u64]) -> bool {
    let Some(pivot) = values.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };
    let Some(successor) = values.iter().rposition(|&v| v > values[pivot]) else {
        return false;
    };
    values.swap(pivot, successor);
    values[pivot + 1..].reverse();
    true
}

/// Factorization sets for several numbers, in input order.
pub fn enumerate_factorizations(
    numbers: &[u64],
    max_len: usize,
    max_factor: u64,
) -> Result<Vec<BTreeSet<Factorization>>> {
    let mut factorizer = Factorizer::new(FactorBounds::new(max_len, max_factor));
    numbers
        .iter()
        .map(|&number| factorizer.enumerate(number))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tuples: &[&[u64]]) -> BTreeSet<Factorization> {
        tuples.iter().map(|t| t.to_vec()).collect()
    }

    #[test]
    fn test_one_yields_boundary_tuples() {
        let sets = enumerate_factorizations(&[1], 2, 6).unwrap();
        assert_eq!(sets[0], set(&[&[1], &[1, 1]]));

        let short = enumerate_factorizations(&[1], 1, 6).unwrap();
        assert_eq!(short[0], set(&[&[1]]));
    }

    #[test]
    fn test_four_with_two_slots() {
        let sets = enumerate_factorizations(&[4], 2, 4).unwrap();
        assert_eq!(sets[0], set(&[&[4], &[2, 2], &[1, 4], &[4, 1]]));
    }

    #[test]
    fn test_twelve_reference_list() {
        // 12 itself exceeds max_factor, so there is no single-segment tuple
        let sets = enumerate_factorizations(&[12], 3, 6).unwrap();
        let expected = set(&[
            &[2, 6],
            &[1, 2, 6],
            &[2, 6, 1],
            &[6, 2],
            &[1, 6, 2],
            &[6, 2, 1],
            &[3, 4],
            &[1, 3, 4],
            &[3, 4, 1],
            &[4, 3],
            &[1, 4, 3],
            &[4, 3, 1],
            &[2, 2, 3],
            &[2, 3, 2],
            &[3, 2, 2],
        ]);
        assert_eq!(sets[0], expected);
    }

    #[test]
    fn test_tuples_respect_bounds() {
        let numbers = [2, 6, 36, 64, 75, 360, 3087];
        let sets = enumerate_factorizations(&numbers, 6, 9).unwrap();
        for (&number, tuples) in numbers.iter().zip(&sets) {
            for tuple in tuples {
                assert_eq!(tuple.iter().product::<u64>(), number, "{tuple:?}");
                assert!(tuple.len() <= 6, "{tuple:?} too long");
                assert!(tuple.iter().all(|&f| f <= 9), "{tuple:?} factor too large");
                if tuple.len() > 2 {
                    let inner = &tuple[1..tuple.len() - 1];
                    assert!(!inner.contains(&1), "{tuple:?} has an inner 1");
                }
            }
        }
    }

    #[test]
    fn test_orderings_are_distinct_factorizations() {
        let sets = enumerate_factorizations(&[18], 3, 9).unwrap();
        assert!(sets[0].contains(&vec![2, 3, 3]));
        assert!(sets[0].contains(&vec![3, 2, 3]));
        assert!(sets[0].contains(&vec![3, 3, 2]));
        assert!(sets[0].contains(&vec![2, 9]));
        assert!(sets[0].contains(&vec![9, 2]));
    }

    #[test]
    fn test_shared_memo_matches_fresh_memo() {
        let numbers = [36, 12, 64, 36, 2025];
        let shared = enumerate_factorizations(&numbers, 8, 11).unwrap();
        for (&number, tuples) in numbers.iter().zip(&shared) {
            let fresh = enumerate_factorizations(&[number], 8, 11).unwrap();
            assert_eq!(&fresh[0], tuples);
        }
    }

    #[test]
    fn test_unreachable_number_gives_empty_set() {
        let sets = enumerate_factorizations(&[13], 4, 11).unwrap();
        assert!(sets[0].is_empty());
    }

    #[test]
    fn test_zero_is_rejected() {
        assert!(matches!(
            enumerate_factorizations(&[4, 0], 4, 4),
            Err(MirrorError::ZeroClue)
        ));
    }

    #[test]
    fn test_next_permutation_visits_distinct_orders() {
        let mut values = vec![2, 2, 3];
        let mut seen = vec![values.clone()];
        while next_permutation(&mut values) {
            seen.push(values.clone());
        }
        assert_eq!(seen, vec![vec![2, 2, 3], vec![2, 3, 2], vec![3, 2, 2]]);
    }
}
