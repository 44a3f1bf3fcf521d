//! Snapshot generation for the animated bubble sort.
//!
//! [`BubbleSortSnapshots`] drives the sort one exchange at a time and yields a
//! [`Snapshot`] after every swap. Each snapshot owns a copy of the array, so
//! the mutations that follow never reach back into frames already produced.

use std::iter::FusedIterator;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{InputConfig, Result};

/// Immutable copy of the array state taken right after an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    index: usize,
    values: Vec<T>,
}

impl<T> Snapshot<T> {
    /// 0-based position in the emission sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based number shown in the frame title.
    pub fn frame_number(&self) -> usize {
        self.index + 1
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lazy bubble sort over a borrowed slice.
///
/// The iterator consumes the mutable borrow, so it cannot be restarted: once
/// exhausted the slice is sorted and a fresh run would emit nothing. Every
/// pass runs to the end; there is no early exit when a pass makes no swaps.
#[derive(Debug)]
pub struct BubbleSortSnapshots<'a, T> {
    values: &'a mut [T],
    pass: usize,
    pos: usize,
    emitted: usize,
}

/// Starts a bubble sort over `values`, yielding one snapshot per exchange.
pub fn bubble_sort_snapshots<T: PartialOrd + Clone>(values: &mut [T]) -> BubbleSortSnapshots<'_, T> {
    BubbleSortSnapshots {
        values,
        pass: 0,
        pos: 0,
        emitted: 0,
    }
}

impl<T: PartialOrd + Clone> Iterator for BubbleSortSnapshots<'_, T> {
    type Item = Snapshot<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.values.len();
        while self.pass < len {
            let limit = len - self.pass - 1;
            while self.pos < limit {
                let j = self.pos;
                self.pos += 1;
                if self.values[j] > self.values[j + 1] {
                    self.values.swap(j, j + 1);
                    let snapshot = Snapshot {
                        index: self.emitted,
                        values: self.values.to_vec(),
                    };
                    self.emitted += 1;
                    return Some(snapshot);
                }
            }
            self.pass += 1;
            self.pos = 0;
        }
        None
    }
}

impl<T: PartialOrd + Clone> FusedIterator for BubbleSortSnapshots<'_, T> {}

/// Sorts a working copy of `values` and collects every snapshot. The input is
/// left untouched.
pub fn collect_snapshots<T: PartialOrd + Clone>(values: &[T]) -> Vec<Snapshot<T>> {
    let mut working = values.to_vec();
    bubble_sort_snapshots(&mut working).collect()
}

/// Number of adjacent exchanges a plain bubble sort performs on `values`.
pub fn count_exchanges<T: PartialOrd + Clone>(values: &[T]) -> usize {
    let mut working = values.to_vec();
    let len = working.len();
    let mut exchanges = 0;
    for i in 0..len {
        for j in 0..len - i - 1 {
            if working[j] > working[j + 1] {
                working.swap(j, j + 1);
                exchanges += 1;
            }
        }
    }
    exchanges
}

/// Draws `config.len` integers from `[config.min, config.max)`. A configured
/// seed makes the draw reproducible.
pub fn random_values(config: &InputConfig) -> Result<Vec<u32>> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    Ok((0..config.len)
        .map(|_| rng.gen_range(config.min..config.max))
        .collect())
}
