//! The lazy selection algebra layered over indices and tables.
//!
//! Every `Selection` is a pull iterator: a chain such as
//! `filter(...).limit(5)` never materialises more than `limit`'s count,
//! because each combinator only calls its source's `rows()` as often as
//! it itself needs to yield. The one exception is a table-backed leaf
//! ([`TableIndexSliceSelection`]): it borrows the owning table just long
//! enough to copy out the rows its bounds select, then drops the borrow,
//! because a trait object cannot return an iterator that outlives a
//! `Ref` guard taken inside the method that produced it.

mod aggregate;
mod column;
mod derive;
mod filter;
mod limit;
mod merge;
mod order;
mod reindex;
mod table_slice;

pub use aggregate::AggregateSelection;
pub use column::ColumnSelection;
pub use derive::DeriveSelection;
pub use filter::FilterSelection;
pub use limit::LimitSelection;
pub use merge::MergeSelection;
pub use order::OrderSelection;
pub use reindex::ReindexSelection;
pub use table_slice::TableIndexSliceSelection;

use crate::btree::SliceBounds;
use crate::error::{Error, Result};
use crate::index::{BoundsMap, Index};
use crate::row::Row;
use crate::schema::Schema;
use crate::value::{Type, Value};
use std::rc::Rc;

/// A predicate over a borrowed row view, as used by [`filter`].
pub type Predicate = Rc<dyn Fn(&Row) -> bool>;

/// A function computing a derived column's value from a borrowed row view,
/// as used by [`derive`].
pub type DeriveFn = Rc<dyn Fn(&Row) -> Value>;

/// A lazy, composable view over a [`crate::table::Table`] or one of its
/// indices.
pub trait Selection {
    /// This selection's row layout. Cheap to call repeatedly: schemas are
    /// small, so this returns an owned copy rather than tying callers to
    /// `self`'s lifetime (a table-backed leaf cannot hand out a reference
    /// into data behind a `RefCell` borrow it has already released).
    fn schema(&self) -> Schema;

    /// Pull rows one at a time, in this selection's own order.
    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_>;

    /// Pull rows in the reverse of this selection's own order. The default
    /// materialises `rows()` and reverses it; leaves with a native reverse
    /// traversal (an index) override this with something cheaper.
    fn rows_reverse(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let mut all: Vec<Vec<Value>> = self.rows().collect();
        all.reverse();
        Box::new(all.into_iter())
    }

    fn supports_bounds(&self, bounds: &BoundsMap) -> bool;

    fn supports_order(&self, cols: &[String]) -> bool;

    fn slice(&self, bounds: &BoundsMap) -> Result<Box<dyn Selection>>;

    /// The row whose leading `key.len()` fields equal `key`, if this
    /// selection currently yields one. The default scans `rows()`, which
    /// is always correct since it reuses this selection's own ordering and
    /// filtering; a table-backed leaf overrides it with a real index point
    /// lookup, and [`MergeSelection`] overrides it to recurse through its
    /// own bounded left without rebuilding bounds from scratch.
    fn lookup(&self, key: &[Value]) -> Option<Vec<Value>> {
        self.rows().find(|row| row.len() >= key.len() && row[..key.len()] == *key)
    }

    /// How many leading fields of a row from `rows()` are the originating
    /// table's primary key. `None` once a projection or grouping has
    /// dropped them, which also disables `update`/`delete` on this
    /// selection.
    fn primary_key_len(&self) -> Option<usize>;

    /// Apply `assignments` to every row whose primary key is in `keys`.
    /// Combinators that only reshape rows (filter, order, limit, derive)
    /// forward this call unchanged to their source; only a table-backed
    /// leaf actually performs the write.
    fn update_keys(&mut self, keys: &[Vec<Value>], assignments: &[(String, Value)]) -> Result<usize> {
        let _ = (keys, assignments);
        Err(Error::UnsupportedQuery(
            "update is not supported on this selection".into(),
        ))
    }

    fn delete_keys(&mut self, keys: &[Vec<Value>]) -> Result<usize> {
        let _ = keys;
        Err(Error::UnsupportedQuery(
            "delete is not supported on this selection".into(),
        ))
    }

    /// Resolve the primary keys this selection currently yields and apply
    /// `assignments` to each.
    fn update(&mut self, assignments: &[(String, Value)]) -> Result<usize> {
        let key_len = self.primary_key_len().ok_or_else(|| {
            Error::UnsupportedQuery(
                "this selection's projection does not retain the primary key columns".into(),
            )
        })?;
        let keys: Vec<Vec<Value>> = self.rows().map(|r| r[..key_len].to_vec()).collect();
        self.update_keys(&keys, assignments)
    }

    /// Resolve the primary keys this selection currently yields and
    /// delete each of them.
    fn delete(&mut self) -> Result<usize> {
        let key_len = self.primary_key_len().ok_or_else(|| {
            Error::UnsupportedQuery(
                "this selection's projection does not retain the primary key columns".into(),
            )
        })?;
        let keys: Vec<Vec<Value>> = self.rows().map(|r| r[..key_len].to_vec()).collect();
        self.delete_keys(&keys)
    }
}

/// Project `source` onto `cols`, in the order given.
pub fn select(source: Box<dyn Selection>, cols: Vec<String>) -> Result<Box<dyn Selection>> {
    Ok(Box::new(ColumnSelection::new(source, cols)?))
}

/// Keep only rows for which `pred` returns true.
pub fn filter(source: Box<dyn Selection>, pred: Predicate) -> Box<dyn Selection> {
    Box::new(FilterSelection::new(source, pred))
}

/// Yield at most `n` rows, in source order.
pub fn limit(source: Box<dyn Selection>, n: usize) -> Box<dyn Selection> {
    Box::new(LimitSelection::new(source, n))
}

/// Reorder `source` by `cols`; `source` must already support that order.
pub fn order_by(source: Box<dyn Selection>, cols: Vec<String>, reverse: bool) -> Result<Box<dyn Selection>> {
    Ok(Box::new(OrderSelection::new(source, cols, reverse)?))
}

/// Append a value column named `name`, computed by `f`, to every row of
/// `source`.
pub fn derive(source: Box<dyn Selection>, name: String, f: DeriveFn, ty: Type) -> Result<Box<dyn Selection>> {
    Ok(Box::new(DeriveSelection::new(source, name, f, ty)?))
}

/// Materialize `source`'s current rows into a fresh, standalone [`Index`]
/// keyed the same way as `source`'s own schema, and hand back a selection
/// over it. Lets a chain regain index-backed `slice`/`order_by` support
/// after a combinator -- a filter, a limit, a merge -- that dropped it.
pub fn index(source: Box<dyn Selection>) -> Result<Box<dyn Selection>> {
    let mut built = Index::new(source.schema())?;
    for row in source.rows() {
        built.insert(row)?;
    }
    Ok(Box::new(ReindexSelection::new(Rc::new(built), SliceBounds::unbounded())))
}

/// `order_by(cols).select(cols)`, deduplicated adjacently -- the ordered
/// distinct combinations of `cols`.
pub fn group_by(source: Box<dyn Selection>, cols: Vec<String>) -> Result<Box<dyn Selection>> {
    let ordered = order_by(source, cols.clone(), false)?;
    let projected = select(ordered, cols.clone())?;
    Ok(Box::new(AggregateSelection::new(projected, cols)))
}
