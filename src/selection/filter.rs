use super::{Predicate, Selection};
use crate::error::Result;
use crate::index::BoundsMap;
use crate::row::Row;
use crate::schema::Schema;
use crate::value::Value;

/// Yields only the rows of `source` for which `pred` returns true.
pub struct FilterSelection {
    source: Box<dyn Selection>,
    pred: Predicate,
}

impl FilterSelection {
    pub fn new(source: Box<dyn Selection>, pred: Predicate) -> FilterSelection {
        FilterSelection { source, pred }
    }
}

impl Selection for FilterSelection {
    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let schema = self.source.schema();
        Box::new(self.source.rows().filter(move |row| {
            let view = Row::new(&schema, row);
            (self.pred)(&view)
        }))
    }

    fn supports_bounds(&self, bounds: &BoundsMap) -> bool {
        self.source.supports_bounds(bounds)
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        self.source.supports_order(cols)
    }

    fn slice(&self, bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        let inner = self.source.slice(bounds)?;
        Ok(Box::new(FilterSelection::new(inner, self.pred.clone())))
    }

    fn primary_key_len(&self) -> Option<usize> {
        self.source.primary_key_len()
    }

    fn update_keys(&mut self, keys: &[Vec<Value>], assignments: &[(String, Value)]) -> Result<usize> {
        self.source.update_keys(keys, assignments)
    }

    fn delete_keys(&mut self, keys: &[Vec<Value>]) -> Result<usize> {
        self.source.delete_keys(keys)
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;
