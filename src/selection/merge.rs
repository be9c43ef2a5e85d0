use super::Selection;
use crate::error::{Error, Result};
use crate::index::BoundsMap;
use crate::schema::Schema;
use crate::value::Value;

/// For each key produced by iterating `right` (already projected to the
/// primary key's columns), looks up `left[key]`. Used to route a predicate
/// an auxiliary index can serve back through to primary rows.
pub struct MergeSelection {
    left: Box<dyn Selection>,
    right: Box<dyn Selection>,
}

impl MergeSelection {
    pub fn new(left: Box<dyn Selection>, right: Box<dyn Selection>) -> MergeSelection {
        MergeSelection { left, right }
    }
}

impl Selection for MergeSelection {
    fn schema(&self) -> Schema {
        self.left.schema()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        Box::new(self.right.rows().filter_map(move |key| self.lookup(&key)))
    }

    fn rows_reverse(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        Box::new(self.right.rows_reverse().filter_map(move |key| self.lookup(&key)))
    }

    fn supports_bounds(&self, _bounds: &BoundsMap) -> bool {
        false
    }

    fn supports_order(&self, _cols: &[String]) -> bool {
        false
    }

    fn slice(&self, _bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        Err(Error::UnsupportedQuery(
            "cannot further slice a merged selection".into(),
        ))
    }

    /// Recurses into `left` for the actual row, but first checks that
    /// `right` still yields `key` too -- needed when `left` is itself a
    /// merge, so every nested predicate along the chain is honored rather
    /// than just the innermost one.
    fn lookup(&self, key: &[Value]) -> Option<Vec<Value>> {
        self.right.lookup(key)?;
        self.left.lookup(key)
    }

    fn primary_key_len(&self) -> Option<usize> {
        self.left.primary_key_len()
    }

    fn update_keys(&mut self, keys: &[Vec<Value>], assignments: &[(String, Value)]) -> Result<usize> {
        self.left.update_keys(keys, assignments)
    }

    fn delete_keys(&mut self, keys: &[Vec<Value>]) -> Result<usize> {
        self.left.delete_keys(keys)
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod merge_test;
