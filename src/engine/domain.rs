//
// csprop is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License  v3
// as published by the Free Software Foundation.
//
// csprop is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY.
// See the GNU Lesser General Public License  for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with csprop. If not, see http://www.gnu.org/licenses/lgpl-3.0.en.html
//
// Copyright (c)  2022 by X. Gillard
//

//! This module provides the definition and implementation of the domain of
//! a variable: the set of values the variable may still assume. A domain
//! only ever shrinks during propagation, one value at a time, and every
//! withdrawal must be undoable: the backtracking search that embeds the
//! engine puts withdrawn values back (in any order) when it retracts an
//! assignment.

use rustc_hash::FxHashMap;

/// This is the kind of error that gets raised whenever a propagator fails
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq, Hash)]
#[error("inconsistency")]
pub struct Inconsistency;

/// The result of a propagation operation. (Note: all propagation opertations
/// can fail, in which case they raise an Inconsistency error)
pub type CPResult<T> = Result<T, Inconsistency>;

/// The domain of a variable. It is built once from the original candidate
/// set and never holds anything beyond it: `prune` withdraws one candidate,
/// `restore` puts one withdrawn candidate back.
///
/// # Note
/// The implementation is a sparse set: all original values live in a single
/// vector which is partitioned so that the first `live` cells hold the
/// current domain. Pruning swaps the victim into the dead zone and
/// restoring swaps it back. Both operations are O(1), and -- unlike a
/// trail -- restoration works value by value in whatever order the search
/// replays its undo log. Because the original candidates need not be
/// contiguous, positions are looked up in a map rather than computed from
/// an offset.
#[derive(Debug, Clone)]
pub struct Domain {
    /// All original candidate values; the first `live` cells hold the
    /// current domain
    values: Vec<isize>,
    /// The position of each original candidate inside of `values`
    position: FxHashMap<isize, usize>,
    /// How many of the original candidates are still live
    live: usize,
}

impl Domain {
    /// Creates a new domain holding the given candidate values (duplicates
    /// collapse: a domain is a set)
    pub fn new(values: impl IntoIterator<Item = isize>) -> Self {
        let mut vals = vec![];
        let mut position = FxHashMap::default();
        for value in values {
            if let std::collections::hash_map::Entry::Vacant(e) = position.entry(value) {
                e.insert(vals.len());
                vals.push(value);
            }
        }
        let live = vals.len();
        Self {
            values: vals,
            position,
            live,
        }
    }

    /// The number of values still candidates
    pub fn size(&self) -> usize {
        self.live
    }
    /// True iff no candidate is left (the domain was wiped out)
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
    /// True iff the given value is still a candidate
    pub fn contains(&self, value: isize) -> bool {
        match self.position.get(&value) {
            Some(pos) => *pos < self.live,
            None => false,
        }
    }
    /// Iterates over the values still candidates
    pub fn iter(&self) -> impl Iterator<Item = isize> + '_ {
        self.values[..self.live].iter().copied()
    }
    /// Iterates over the original candidate set, withdrawn or not (no
    /// particular order: a domain is a set)
    pub fn original(&self) -> impl Iterator<Item = isize> + '_ {
        self.values.iter().copied()
    }
    /// The number of values in the original candidate set
    pub fn original_size(&self) -> usize {
        self.values.len()
    }

    /// Withdraws the given value from the current domain.
    ///
    /// # Panics
    /// When the value is not a live candidate. Pruning the same value twice
    /// (or pruning a value foreign to the original set) would silently
    /// corrupt the bookkeeping every later restoration depends on, so it
    /// must fail fast instead.
    pub fn prune(&mut self, value: isize) {
        match self.position.get(&value).copied() {
            Some(pos) if pos < self.live => {
                self.live -= 1;
                let last = self.live;
                self.swap(pos, last);
            }
            _ => panic!("cannot prune {}: not a live candidate", value),
        }
    }

    /// Puts a previously withdrawn value back into the current domain.
    ///
    /// # Panics
    /// When the value is live or foreign to the original candidate set:
    /// restoring something that was never pruned is the mirror image of the
    /// double prune and corrupts the state just as silently.
    pub fn restore(&mut self, value: isize) {
        match self.position.get(&value).copied() {
            Some(pos) if pos >= self.live => {
                let first_dead = self.live;
                self.swap(pos, first_dead);
                self.live += 1;
            }
            _ => panic!("cannot restore {}: not a pruned candidate", value),
        }
    }

    /// Swaps the cells at both positions, keeping the position map in sync
    fn swap(&mut self, a: usize, b: usize) {
        self.values.swap(a, b);
        self.position.insert(self.values[a], a);
        self.position.insert(self.values[b], b);
    }
}
