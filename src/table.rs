//! `Table`: a primary [`Index`] plus an insertion-ordered list of named
//! auxiliary indices, with the insert/upsert/update/delete cascade and the
//! slice/order_by planner that routes a query through whichever index (or
//! chain of indices) can serve it.
//!
//! Selections that can mutate need a way back to the owning `Table`
//! without tying their lifetime to a single borrow of it (a `Box<dyn
//! Selection>` stored inside another combinator must be able to outlive
//! any one stack frame). `Rc<RefCell<Table>>` is the idiomatic answer:
//! the table lives behind a shared, interior-mutable handle, and a
//! [`crate::selection::TableIndexSliceSelection`] clones the `Rc` rather
//! than borrowing it.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::btree::SliceBounds;
use crate::error::{Error, Result};
use crate::index::{BoundsMap, Index};
use crate::schema::{Column, Schema};
use crate::selection::{self, OrderSelection, Selection, TableIndexSliceSelection};
use crate::value::Value;

/// A shared, interior-mutable handle to a [`Table`]. Selections obtained
/// from [`Table::slice`] hold a clone of this handle so that `update`/
/// `delete` called on them can cascade back through every index.
pub type TableHandle = Rc<RefCell<Table>>;

pub struct Table {
    schema: Schema,
    order: usize,
    primary: Index,
    auxiliaries: Vec<(String, Index)>,
}

impl Table {
    pub fn new(schema: Schema) -> Result<TableHandle> {
        Table::with_order(schema, crate::index::DEFAULT_ORDER)
    }

    pub fn with_order(schema: Schema, order: usize) -> Result<TableHandle> {
        let primary = Index::with_order(schema.clone(), order)?;
        Ok(Rc::new(RefCell::new(Table {
            schema,
            order,
            primary,
            auxiliaries: Vec::new(),
        })))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn primary(&self) -> &Index {
        &self.primary
    }

    pub fn auxiliary(&self, name: &str) -> Option<&Index> {
        self.auxiliaries.iter().find(|(n, _)| n == name).map(|(_, idx)| idx)
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Add an auxiliary index keyed on `key_cols` (a subset of this
    /// table's columns), backfilled from every row currently in the
    /// primary index. The auxiliary's value columns are always the
    /// primary key, so an auxiliary row round-trips back to the primary.
    pub fn add_index(&mut self, name: impl Into<String>, key_cols: Vec<String>) -> Result<()> {
        let name = name.into();
        let key_columns: Vec<Column> = key_cols
            .iter()
            .map(|c| {
                self.schema
                    .column(c)
                    .cloned()
                    .ok_or_else(|| Error::InvalidArgument(format!("unknown column {:?}", c)))
            })
            .collect::<Result<_>>()?;
        let value_columns = self.schema.key_columns().to_vec();
        let aux_schema = Schema::new(key_columns, value_columns);
        let mut aux = Index::with_order(aux_schema, self.order)?;

        let full_cols: Vec<String> = key_cols.iter().cloned().chain(self.schema.key_names()).collect();
        for k in self.primary.iter_all() {
            let aux_row = project_row(&self.schema, k.fields(), &full_cols)?;
            aux.insert(aux_row)?;
        }

        self.auxiliaries.push((name, aux));
        Ok(())
    }

    pub fn insert(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(Error::InvalidArgument(format!(
                "row arity {} does not match schema arity {}",
                row.len(),
                self.schema.len()
            )));
        }
        for (col, v) in self.schema.columns().into_iter().zip(row.iter()) {
            col.ty.validate(v)?;
        }

        let key_len = self.schema.key_len();
        let key = row[..key_len].to_vec();
        let value = row[key_len..].to_vec();
        if self.primary.contains(&key)? {
            return Err(Error::DuplicateKey(format!("{:?}", key)));
        }
        self.upsert(key, value)
    }

    pub(crate) fn upsert(&mut self, key: Vec<Value>, value: Vec<Value>) -> Result<()> {
        if let Some(old_value) = self.primary_value(&key) {
            let old_row: Vec<Value> = key.iter().cloned().chain(old_value).collect();
            for (_, aux) in self.auxiliaries.iter_mut() {
                let aux_key = project_row(&self.schema, &old_row, &aux.schema().key_names())?;
                aux.delete(&aux_key)?;
            }
            self.primary.delete(&key)?;
        }

        let mut row = key;
        row.extend(value);
        self.primary.insert(row.clone())?;
        for (_, aux) in self.auxiliaries.iter_mut() {
            let aux_cols = aux.schema().column_names();
            let aux_row = project_row(&self.schema, &row, &aux_cols)?;
            aux.insert(aux_row)?;
        }
        Ok(())
    }

    /// Apply `assignments` to every live row of the table.
    pub fn update(&mut self, assignments: &[(String, Value)]) -> Result<usize> {
        let keys: Vec<Vec<Value>> = self
            .primary
            .iter_all()
            .map(|k| k.fields()[..self.schema.key_len()].to_vec())
            .collect();
        self.apply_update(&keys, assignments)
    }

    /// Delete every live row of the table.
    pub fn delete(&mut self) -> Result<usize> {
        let keys: Vec<Vec<Value>> = self
            .primary
            .iter_all()
            .map(|k| k.fields()[..self.schema.key_len()].to_vec())
            .collect();
        self.apply_delete(&keys)
    }

    pub(crate) fn apply_update(&mut self, keys: &[Vec<Value>], assignments: &[(String, Value)]) -> Result<usize> {
        for (name, _) in assignments {
            if self.schema.key_names().iter().any(|k| k == name) {
                return Err(Error::InvalidArgument(format!("cannot update key column {:?}", name)));
            }
        }
        let key_len = self.schema.key_len();
        let mut count = 0;
        for key in keys {
            if let Some(mut value) = self.primary_value(key) {
                let mut changed = false;
                for (name, v) in assignments {
                    let pos = self
                        .schema
                        .position(name)
                        .ok_or_else(|| Error::InvalidArgument(format!("unknown column {:?}", name)))?;
                    let vpos = pos - key_len;
                    if value[vpos] != *v {
                        value[vpos] = v.clone();
                        changed = true;
                    }
                }
                if changed {
                    self.upsert(key.clone(), value)?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    pub(crate) fn apply_delete(&mut self, keys: &[Vec<Value>]) -> Result<usize> {
        let mut count = 0;
        for key in keys {
            if self.delete_row(key)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn delete_row(&mut self, key: &[Value]) -> Result<bool> {
        if let Some(old_value) = self.primary_value(key) {
            let old_row: Vec<Value> = key.iter().cloned().chain(old_value).collect();
            for (_, aux) in self.auxiliaries.iter_mut() {
                let aux_key = project_row(&self.schema, &old_row, &aux.schema().key_names())?;
                aux.delete(&aux_key)?;
            }
            self.primary.delete(key)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn primary_value(&self, key: &[Value]) -> Option<Vec<Value>> {
        let key_len = self.schema.key_len();
        self.primary
            .iter_bounds(SliceBounds::point(key.to_vec()), false)
            .next()
            .map(|k| k.fields()[key_len..].to_vec())
    }

    pub fn rebalance(&mut self) {
        self.primary.rebalance();
        for (_, aux) in self.auxiliaries.iter_mut() {
            aux.rebalance();
        }
    }

    /// The slice planner: reject unknown columns, drop a trailing
    /// fully-open range, then serve the whole bounds from the primary if
    /// it can, otherwise consume the longest supported prefix at a time
    /// (primary first, then auxiliaries, merging residual predicates back
    /// to primary rows).
    pub fn slice(this: &TableHandle, bounds: BoundsMap) -> Result<Box<dyn Selection>> {
        let table = this.borrow();
        for (name, _) in &bounds {
            if table.schema.position(name).is_none() {
                return Err(Error::InvalidArgument(format!("unknown column {:?}", name)));
            }
        }
        let canon = drop_trailing_open_range(bounds);

        if table.primary.supports_bounds(&canon) {
            let resolved = table.primary.resolve_bounds(&canon)?;
            debug!(target: "table ", "slice served entirely by the primary index");
            drop(table);
            return Ok(Box::new(TableIndexSliceSelection::new(this.clone(), None, resolved)));
        }

        let mut remaining: &[(String, crate::index::Bound)] = &canon;
        let mut current: Option<Box<dyn Selection>> = None;
        while !remaining.is_empty() {
            let primary_len = longest_supported_prefix(&table.primary, remaining);
            if primary_len > 0 {
                let resolved = table.primary.resolve_bounds(&remaining[..primary_len].to_vec())?;
                current = Some(Box::new(TableIndexSliceSelection::new(this.clone(), None, resolved)));
                remaining = &remaining[primary_len..];
                continue;
            }

            let found = table
                .auxiliaries
                .iter()
                .map(|(name, idx)| (name.clone(), longest_supported_prefix(idx, remaining)))
                .find(|(_, len)| *len > 0);

            match found {
                Some((name, len)) => {
                    debug!(target: "table ", "routing residual bounds through auxiliary {:?}", name);
                    let aux = table.auxiliary(&name).expect("just matched");
                    let resolved = aux.resolve_bounds(&remaining[..len].to_vec())?;
                    let aux_slice: Box<dyn Selection> =
                        Box::new(TableIndexSliceSelection::new(this.clone(), Some(name), resolved));
                    let right = selection::select(aux_slice, table.schema.key_names())?;
                    let left = current.take().unwrap_or_else(|| {
                        Box::new(TableIndexSliceSelection::new(this.clone(), None, SliceBounds::unbounded()))
                    });
                    current = Some(Box::new(crate::selection::MergeSelection::new(left, right)));
                    remaining = &remaining[len..];
                }
                None => {
                    return Err(Error::UnsupportedQuery(format!(
                        "no index supports bounds {:?}",
                        remaining
                    )));
                }
            }
        }

        Ok(current.unwrap_or_else(|| {
            Box::new(TableIndexSliceSelection::new(this.clone(), None, SliceBounds::unbounded()))
        }))
    }

    /// Route an `order_by` through whichever index supports it.
    pub fn order_by(this: &TableHandle, cols: Vec<String>, reverse: bool) -> Result<Box<dyn Selection>> {
        let table = this.borrow();
        if table.primary.supports_order(&cols) {
            let base: Box<dyn Selection> =
                Box::new(TableIndexSliceSelection::new(this.clone(), None, SliceBounds::unbounded()));
            drop(table);
            return selection::order_by(base, cols, reverse);
        }

        let aux_name = table
            .auxiliaries
            .iter()
            .find(|(_, idx)| idx.supports_order(&cols))
            .map(|(n, _)| n.clone());

        match aux_name {
            Some(name) => {
                let aux_slice: Box<dyn Selection> = Box::new(TableIndexSliceSelection::new(
                    this.clone(),
                    Some(name),
                    SliceBounds::unbounded(),
                ));
                let right = selection::select(aux_slice, table.schema.key_names())?;
                let left: Box<dyn Selection> =
                    Box::new(TableIndexSliceSelection::new(this.clone(), None, SliceBounds::unbounded()));
                drop(table);
                let merged: Box<dyn Selection> = Box::new(crate::selection::MergeSelection::new(left, right));
                Ok(Box::new(OrderSelection::new_unchecked(merged, cols, reverse)))
            }
            None => Err(Error::UnsupportedQuery(format!(
                "no index supports ordering by {:?}",
                cols
            ))),
        }
    }
}

fn drop_trailing_open_range(mut bounds: BoundsMap) -> BoundsMap {
    while matches!(
        bounds.last(),
        Some((_, crate::index::Bound::Range { start: None, stop: None }))
    ) {
        bounds.pop();
    }
    bounds
}

fn longest_supported_prefix(index: &Index, remaining: &[(String, crate::index::Bound)]) -> usize {
    for len in (1..=remaining.len()).rev() {
        if index.supports_bounds(&remaining[..len].to_vec()) {
            return len;
        }
    }
    0
}

fn project_row(schema: &Schema, row: &[Value], names: &[String]) -> Result<Vec<Value>> {
    names
        .iter()
        .map(|n| {
            schema
                .position(n)
                .map(|p| row[p].clone())
                .ok_or_else(|| Error::Internal(format!("column {:?} missing from schema", n)))
        })
        .collect()
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
