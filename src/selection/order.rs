use super::Selection;
use crate::error::{Error, Result};
use crate::index::BoundsMap;
use crate::schema::Schema;
use crate::value::Value;

/// Reorders `source` by `cols`. Forward iteration just forwards; reverse
/// iteration requests the source's own reverse traversal rather than
/// buffering and re-sorting.
pub struct OrderSelection {
    source: Box<dyn Selection>,
    cols: Vec<String>,
    reverse: bool,
}

impl OrderSelection {
    pub fn new(source: Box<dyn Selection>, cols: Vec<String>, reverse: bool) -> Result<OrderSelection> {
        if !source.supports_order(&cols) {
            return Err(Error::UnsupportedQuery(format!(
                "source does not support ordering by {:?}",
                cols
            )));
        }
        Ok(OrderSelection { source, cols, reverse })
    }

    /// Build an `OrderSelection` without checking `source.supports_order`.
    /// Used by the table planner when it has already established, via an
    /// index directly, that the requested order is valid for a
    /// `MergeSelection` whose own `supports_order` is conservatively
    /// `false`.
    pub(crate) fn new_unchecked(source: Box<dyn Selection>, cols: Vec<String>, reverse: bool) -> OrderSelection {
        OrderSelection { source, cols, reverse }
    }
}

impl Selection for OrderSelection {
    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        if self.reverse {
            self.source.rows_reverse()
        } else {
            self.source.rows()
        }
    }

    fn rows_reverse(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        if self.reverse {
            self.source.rows()
        } else {
            self.source.rows_reverse()
        }
    }

    fn supports_bounds(&self, bounds: &BoundsMap) -> bool {
        !self.reverse && self.source.supports_bounds(bounds)
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        cols.len() <= self.cols.len() && cols.iter().zip(self.cols.iter()).all(|(a, b)| a == b)
    }

    fn slice(&self, bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        if self.reverse {
            return Err(Error::UnsupportedQuery(
                "cannot push a bound through a reversed ordering".into(),
            ));
        }
        let inner = self.source.slice(bounds)?;
        Ok(Box::new(OrderSelection {
            source: inner,
            cols: self.cols.clone(),
            reverse: self.reverse,
        }))
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
#[path = "order_test.rs"]
mod order_test;
