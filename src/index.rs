//! An `Index`: a [`BTree`] whose row layout is `schema.key ++ schema.value`.
//!
//! A `Table` (see `table.rs`) owns exactly one `Index` as its primary store
//! and zero or more as auxiliaries; auxiliaries differ only in which
//! columns make up their key and in what their value columns hold (always
//! the primary key, so an auxiliary row round-trips back to the primary).

use std::fmt;

use crate::btree::{BTree, SliceBounds};
use crate::error::{Error, Result};
use crate::key::Key;
use crate::schema::Schema;
use crate::value::Value;

/// One entry of a bounds query: a scalar equality, or a half-open range.
#[derive(Debug, Clone)]
pub enum Bound {
    Scalar(Value),
    Range {
        start: Option<Value>,
        stop: Option<Value>,
    },
}

/// An ordered column-name -> [`Bound`] mapping. Order matters: entries are
/// read in the order given, and at most the last entry may be a range.
pub type BoundsMap = Vec<(String, Bound)>;

/// The default fan-out order used where a caller doesn't name one
/// explicitly (`Table::new`, `Table::add_index`).
pub const DEFAULT_ORDER: usize = 16;

pub struct Index {
    schema: Schema,
    tree: BTree,
}

impl Index {
    pub fn new(schema: Schema) -> Result<Index> {
        Index::with_order(schema, DEFAULT_ORDER)
    }

    pub fn with_order(schema: Schema, order: usize) -> Result<Index> {
        let arity = schema.len();
        let tree = BTree::new(order, arity)?;
        Ok(Index { schema, tree })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// `row` must have arity `schema.len()`.
    pub fn insert(&mut self, row: Vec<Value>) -> Result<()> {
        self.tree.insert(row)
    }

    /// Tombstone every row whose leading fields equal `key_prefix`.
    pub fn delete(&mut self, key_prefix: &[Value]) -> Result<usize> {
        self.tree.delete(SliceBounds::point(key_prefix.to_vec()))
    }

    pub fn contains(&self, key: &[Value]) -> Result<bool> {
        self.tree.contains(key)
    }

    pub fn rebalance(&mut self) {
        self.tree.rebalance()
    }

    pub fn iter_all(&self) -> impl Iterator<Item = &Key> {
        self.tree.iter_all()
    }

    pub fn iter_reverse(&self) -> impl Iterator<Item = &Key> {
        self.tree.iter(SliceBounds::unbounded(), true)
    }

    pub fn iter_bounds(&self, bounds: SliceBounds, reverse: bool) -> impl Iterator<Item = &Key> {
        self.tree.iter(bounds, reverse)
    }

    /// True iff the column names named in `bounds`, in order, form a
    /// prefix of this schema's column order, with at most the last entry
    /// a range (every earlier entry a scalar).
    pub fn supports_bounds(&self, bounds: &BoundsMap) -> bool {
        let names = self.schema.column_names();
        if bounds.len() > names.len() {
            return false;
        }
        for (i, (name, bound)) in bounds.iter().enumerate() {
            if names[i] != *name {
                return false;
            }
            let is_last = i == bounds.len() - 1;
            if !is_last && matches!(bound, Bound::Range { .. }) {
                return false;
            }
        }
        true
    }

    /// True iff `cols` is a prefix of this schema's column order.
    pub fn supports_order(&self, cols: &[String]) -> bool {
        let names = self.schema.column_names();
        cols.len() <= names.len() && cols.iter().zip(names.iter()).all(|(a, b)| a == b)
    }

    /// Convert an ordered bounds mapping into BTree-level [`SliceBounds`]:
    /// scalars become positional values; when the last entry is a range,
    /// both `start` and `stop` are seeded with the earlier scalars, then
    /// the range's own start/stop value is appended to each when present.
    /// When the range's stop is absent, `stop` is left as the bare scalar
    /// prefix and the window extends through every row sharing that
    /// prefix, rather than stopping at its first row (see
    /// `SliceBounds::range_with_prefix_stop`); otherwise the bound is the
    /// list of scalars, a prefix point match.
    pub fn resolve_bounds(&self, bounds: &BoundsMap) -> Result<SliceBounds> {
        if !self.supports_bounds(bounds) {
            return Err(Error::UnsupportedQuery(format!(
                "index over {} cannot serve bounds {:?}",
                self.schema, bounds
            )));
        }
        if bounds.is_empty() {
            return Ok(SliceBounds::unbounded());
        }

        let last_is_range = matches!(bounds[bounds.len() - 1].1, Bound::Range { .. });
        if !last_is_range {
            let scalars = scalars_of(bounds)?;
            return Ok(SliceBounds::point(scalars));
        }

        let scalars = scalars_of(&bounds[..bounds.len() - 1])?;
        let (range_start, range_stop) = match &bounds[bounds.len() - 1].1 {
            Bound::Range { start, stop } => (start.clone(), stop.clone()),
            Bound::Scalar(_) => unreachable!("checked above"),
        };

        let mut start = scalars.clone();
        if let Some(v) = range_start {
            start.push(v);
        }

        let mut stop = scalars;
        let stop_has_endpoint = range_stop.is_some();
        if let Some(v) = range_stop {
            stop.push(v);
        }

        if stop_has_endpoint {
            Ok(SliceBounds::range(Some(start), Some(stop)))
        } else {
            Ok(SliceBounds::range_with_prefix_stop(Some(start), Some(stop)))
        }
    }
}

fn scalars_of(bounds: &[(String, Bound)]) -> Result<Vec<Value>> {
    bounds
        .iter()
        .map(|(name, b)| match b {
            Bound::Scalar(v) => Ok(v.clone()),
            Bound::Range { .. } => Err(Error::InvalidArgument(format!(
                "column {:?} used as a range where only the trailing bound may be a range",
                name
            ))),
        })
        .collect()
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({}, len={})", self.schema, self.len())
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
