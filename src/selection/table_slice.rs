use super::Selection;
use crate::btree::SliceBounds;
use crate::error::{Error, Result};
use crate::index::{BoundsMap, Index};
use crate::schema::Schema;
use crate::table::TableHandle;
use crate::value::Value;

/// A bounds-restricted view over an index -- the primary or one auxiliary
/// -- that remembers the owning table so that `update`/`delete` cascade
/// correctly to every index. This is the only `Selection` leaf with real
/// mutation support; every combinator above it forwards to its source.
pub struct TableIndexSliceSelection {
    table: TableHandle,
    aux_name: Option<String>,
    bounds: SliceBounds,
}

impl TableIndexSliceSelection {
    pub(crate) fn new(table: TableHandle, aux_name: Option<String>, bounds: SliceBounds) -> TableIndexSliceSelection {
        TableIndexSliceSelection { table, aux_name, bounds }
    }

    fn with_index<R>(&self, f: impl FnOnce(&Index) -> R) -> R {
        let table = self.table.borrow();
        match &self.aux_name {
            None => f(table.primary()),
            Some(name) => f(table
                .auxiliary(name)
                .expect("auxiliary index referenced by a live selection must still exist")),
        }
    }
}

impl Selection for TableIndexSliceSelection {
    fn schema(&self) -> Schema {
        self.with_index(|idx| idx.schema().clone())
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let rows: Vec<Vec<Value>> = self.with_index(|idx| {
            idx.iter_bounds(self.bounds.clone(), false)
                .map(|k| k.fields().to_vec())
                .collect()
        });
        Box::new(rows.into_iter())
    }

    fn rows_reverse(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let rows: Vec<Vec<Value>> = self.with_index(|idx| {
            idx.iter_bounds(self.bounds.clone(), true)
                .map(|k| k.fields().to_vec())
                .collect()
        });
        Box::new(rows.into_iter())
    }

    fn supports_bounds(&self, bounds: &BoundsMap) -> bool {
        self.with_index(|idx| idx.supports_bounds(bounds))
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        self.with_index(|idx| idx.supports_order(cols))
    }

    fn slice(&self, bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        let resolved = self.with_index(|idx| idx.resolve_bounds(bounds))?;
        Ok(Box::new(TableIndexSliceSelection {
            table: self.table.clone(),
            aux_name: self.aux_name.clone(),
            bounds: resolved,
        }))
    }

    /// A real index point lookup, filtered through this selection's own
    /// bounds -- so a lookup through a left that already carries, say, a
    /// prefix restriction doesn't leak rows from outside it.
    fn lookup(&self, key: &[Value]) -> Option<Vec<Value>> {
        let row = self.with_index(|idx| {
            idx.iter_bounds(SliceBounds::point(key.to_vec()), false)
                .next()
                .map(|k| k.fields().to_vec())
        })?;
        if self.bounds.contains_row(&row) {
            Some(row)
        } else {
            None
        }
    }

    fn primary_key_len(&self) -> Option<usize> {
        if self.aux_name.is_some() {
            return None;
        }
        Some(self.table.borrow().schema().key_len())
    }

    fn update_keys(&mut self, keys: &[Vec<Value>], assignments: &[(String, Value)]) -> Result<usize> {
        if self.aux_name.is_some() {
            return Err(Error::UnsupportedQuery(
                "update must be routed through the primary index, not an auxiliary".into(),
            ));
        }
        self.table.borrow_mut().apply_update(keys, assignments)
    }

    fn delete_keys(&mut self, keys: &[Vec<Value>]) -> Result<usize> {
        if self.aux_name.is_some() {
            return Err(Error::UnsupportedQuery(
                "delete must be routed through the primary index, not an auxiliary".into(),
            ));
        }
        self.table.borrow_mut().apply_delete(keys)
    }
}

#[cfg(test)]
#[path = "table_slice_test.rs"]
mod table_slice_test;
