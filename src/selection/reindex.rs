use std::rc::Rc;

use super::Selection;
use crate::btree::SliceBounds;
use crate::error::Result;
use crate::index::{BoundsMap, Index};
use crate::schema::Schema;
use crate::value::Value;

/// A selection materialized back into a standalone [`Index`] -- the
/// `index` combinator's result. Re-enters index-backed `slice`/`order_by`
/// support after a combinator (filter, limit, merge) that dropped it,
/// mid-chain, without a route back to the originating table.
pub struct ReindexSelection {
    index: Rc<Index>,
    bounds: SliceBounds,
}

impl ReindexSelection {
    pub(crate) fn new(index: Rc<Index>, bounds: SliceBounds) -> ReindexSelection {
        ReindexSelection { index, bounds }
    }
}

impl Selection for ReindexSelection {
    fn schema(&self) -> Schema {
        self.index.schema().clone()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let rows: Vec<Vec<Value>> = self
            .index
            .iter_bounds(self.bounds.clone(), false)
            .map(|k| k.fields().to_vec())
            .collect();
        Box::new(rows.into_iter())
    }

    fn rows_reverse(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let rows: Vec<Vec<Value>> = self
            .index
            .iter_bounds(self.bounds.clone(), true)
            .map(|k| k.fields().to_vec())
            .collect();
        Box::new(rows.into_iter())
    }

    fn supports_bounds(&self, bounds: &BoundsMap) -> bool {
        self.index.supports_bounds(bounds)
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        self.index.supports_order(cols)
    }

    fn slice(&self, bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        let resolved = self.index.resolve_bounds(bounds)?;
        Ok(Box::new(ReindexSelection::new(self.index.clone(), resolved)))
    }

    fn lookup(&self, key: &[Value]) -> Option<Vec<Value>> {
        let row = self
            .index
            .iter_bounds(SliceBounds::point(key.to_vec()), false)
            .next()
            .map(|k| k.fields().to_vec())?;
        if self.bounds.contains_row(&row) {
            Some(row)
        } else {
            None
        }
    }

    fn primary_key_len(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
#[path = "reindex_test.rs"]
mod reindex_test;
