use super::{DeriveFn, Selection};
use crate::error::{Error, Result};
use crate::index::BoundsMap;
use crate::row::Row;
use crate::schema::{Column, Schema};
use crate::value::{Type, Value};

/// Extends every row of `source` with one computed value column.
pub struct DeriveSelection {
    source: Box<dyn Selection>,
    name: String,
    f: DeriveFn,
    schema: Schema,
}

impl DeriveSelection {
    pub fn new(source: Box<dyn Selection>, name: String, f: DeriveFn, ty: Type) -> Result<DeriveSelection> {
        let source_schema = source.schema();
        let mut value_cols = source_schema.value_columns().to_vec();
        value_cols.push(Column::new(name.clone(), ty));
        let schema = Schema::new(source_schema.key_columns().to_vec(), value_cols);
        Ok(DeriveSelection { source, name, f, schema })
    }
}

impl Selection for DeriveSelection {
    fn schema(&self) -> Schema {
        self.schema.clone()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let source_schema = self.source.schema();
        Box::new(self.source.rows().map(move |mut row| {
            let extra = {
                let view = Row::new(&source_schema, &row);
                (self.f)(&view)
            };
            row.push(extra);
            row
        }))
    }

    fn supports_bounds(&self, bounds: &BoundsMap) -> bool {
        bounds.iter().all(|(name, _)| name != &self.name) && self.source.supports_bounds(bounds)
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        cols.iter().all(|c| c != &self.name) && self.source.supports_order(cols)
    }

    fn slice(&self, bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        let inner = self.source.slice(bounds)?;
        Ok(Box::new(DeriveSelection {
            source: inner,
            name: self.name.clone(),
            f: self.f.clone(),
            schema: self.schema.clone(),
        }))
    }

    fn primary_key_len(&self) -> Option<usize> {
        self.source.primary_key_len()
    }

    fn update_keys(&mut self, keys: &[Vec<Value>], assignments: &[(String, Value)]) -> Result<usize> {
        if assignments.iter().any(|(n, _)| n == &self.name) {
            return Err(Error::InvalidArgument(format!(
                "cannot update derived column {:?}",
                self.name
            )));
        }
        self.source.update_keys(keys, assignments)
    }

    fn delete_keys(&mut self, keys: &[Vec<Value>]) -> Result<usize> {
        self.source.delete_keys(keys)
    }
}

#[cfg(test)]
#[path = "derive_test.rs"]
mod derive_test;
