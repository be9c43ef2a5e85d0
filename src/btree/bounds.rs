//! Slice bounds and the `lower_bound`/`upper_bound` search routines used
//! by both the tombstone-aware slicer and the rebuild-free rebalance pass.

use std::cmp::Ordering;

use crate::key::{compare_prefix, Key};
use crate::value::Value;

/// The two shapes a B-tree slice query can take: a single key used as a
/// point-or-prefix match, or a `[start, stop)` range where either end may
/// be open.
#[derive(Debug, Clone)]
pub enum SliceBounds {
    Key(Vec<Value>),
    Range {
        start: Option<Vec<Value>>,
        stop: Option<Vec<Value>>,
        /// When true, `stop` is an enclosing scalar prefix rather than an
        /// explicit exclusive endpoint: the window extends through every
        /// row sharing that prefix (`upper_bound`), not just up to the
        /// first row not less than it (`lower_bound`). Set whenever a
        /// trailing range has no stop value of its own but an earlier
        /// scalar bound still needs to cap it.
        stop_is_prefix: bool,
    },
}

impl SliceBounds {
    pub fn unbounded() -> SliceBounds {
        SliceBounds::Range {
            start: None,
            stop: None,
            stop_is_prefix: false,
        }
    }

    pub fn point(key: Vec<Value>) -> SliceBounds {
        SliceBounds::Key(key)
    }

    pub fn range(start: Option<Vec<Value>>, stop: Option<Vec<Value>>) -> SliceBounds {
        SliceBounds::Range {
            start,
            stop,
            stop_is_prefix: false,
        }
    }

    /// Like `range`, but `stop` (if present) bounds the window by
    /// `upper_bound` rather than `lower_bound` -- used when `stop` is only
    /// an enclosing scalar prefix, not an explicit exclusive endpoint.
    pub fn range_with_prefix_stop(start: Option<Vec<Value>>, stop: Option<Vec<Value>>) -> SliceBounds {
        SliceBounds::Range {
            start,
            stop,
            stop_is_prefix: true,
        }
    }

    /// Whether a single stored row (or a shorter key prefix of one) falls
    /// inside this bound, evaluated directly rather than by binary search
    /// -- used to re-check a point lookup against a bound a caller already
    /// narrowed the tree to, without re-deriving the bound from scratch.
    pub(crate) fn contains_row(&self, row: &[Value]) -> bool {
        match self {
            SliceBounds::Key(k) => compare_prefix(row, k) == Ordering::Equal,
            SliceBounds::Range { start, stop, stop_is_prefix } => {
                if let Some(s) = start {
                    if compare_prefix(row, s) == Ordering::Less {
                        return false;
                    }
                }
                if let Some(s) = stop {
                    let cmp = compare_prefix(row, s);
                    let past_stop = if *stop_is_prefix {
                        cmp == Ordering::Greater
                    } else {
                        cmp != Ordering::Less
                    };
                    if past_stop {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// The `[l, r)` window of `keys` that this bound selects: for a range
    /// bound, `l` comes from `lower_bound`; `r` comes from `lower_bound`
    /// when `stop` is an explicit exclusive endpoint, or `upper_bound`
    /// when it is only an enclosing scalar prefix. For a point/prefix
    /// key, `l` comes from `lower_bound` and `r` from `upper_bound`.
    pub(crate) fn window(&self, keys: &[Key]) -> (usize, usize) {
        match self {
            SliceBounds::Key(k) => (lower_bound(keys, k), upper_bound(keys, k)),
            SliceBounds::Range { start, stop, stop_is_prefix } => {
                let l = start.as_deref().map_or(0, |s| lower_bound(keys, s));
                let r = stop.as_deref().map_or(keys.len(), |s| {
                    if *stop_is_prefix {
                        upper_bound(keys, s)
                    } else {
                        lower_bound(keys, s)
                    }
                });
                (l, r)
            }
        }
    }
}

/// Smallest `i` such that `keys[i]` is not less than `bound` under
/// prefix comparison: the first slot whose shared prefix with `bound`
/// is `>=`.
pub(crate) fn lower_bound(keys: &[Key], bound: &[Value]) -> usize {
    let mut lo = 0;
    let mut hi = keys.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if compare_prefix(keys[mid].fields(), bound) == Ordering::Less {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Smallest `i` such that `keys[i]` is strictly greater than `bound`
/// under prefix comparison.
pub(crate) fn upper_bound(keys: &[Key], bound: &[Value]) -> usize {
    let mut lo = 0;
    let mut hi = keys.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if compare_prefix(keys[mid].fields(), bound) == Ordering::Greater {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Smallest `i` such that `keys[i] >= row` under full-arity `Ord`
/// comparison. Used by `insert`/`contains` which always compare full rows,
/// never prefixes.
pub(crate) fn lower_bound_row(keys: &[Key], row: &Key) -> usize {
    let mut lo = 0;
    let mut hi = keys.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if &keys[mid] < row {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;
