use super::Selection;
use crate::error::{Error, Result};
use crate::index::BoundsMap;
use crate::schema::Schema;
use crate::value::Value;

/// Yields at most `n` rows of `source`, in source order.
pub struct LimitSelection {
    source: Box<dyn Selection>,
    n: usize,
}

impl LimitSelection {
    pub fn new(source: Box<dyn Selection>, n: usize) -> LimitSelection {
        LimitSelection { source, n }
    }
}

impl Selection for LimitSelection {
    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        Box::new(self.source.rows().take(self.n))
    }

    fn supports_bounds(&self, _bounds: &BoundsMap) -> bool {
        false
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        self.source.supports_order(cols)
    }

    fn slice(&self, _bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        Err(Error::UnsupportedQuery(
            "cannot push a bound through a limited selection".into(),
        ))
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
#[path = "limit_test.rs"]
mod limit_test;
