use super::Selection;
use crate::error::{Error, Result};
use crate::index::BoundsMap;
use crate::schema::Schema;
use crate::value::Value;

/// Sorts by `cols`, projects to `cols`, and yields each distinct tuple once.
/// `source` is expected to already be ordered and projected accordingly --
/// see [`super::group_by`], the only constructor a caller should reach for.
pub struct AggregateSelection {
    source: Box<dyn Selection>,
    cols: Vec<String>,
}

impl AggregateSelection {
    pub fn new(source: Box<dyn Selection>, cols: Vec<String>) -> AggregateSelection {
        AggregateSelection { source, cols }
    }
}

impl Selection for AggregateSelection {
    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let mut last: Option<Vec<Value>> = None;
        Box::new(self.source.rows().filter(move |row| {
            let is_new = last.as_ref() != Some(row);
            if is_new {
                last = Some(row.clone());
            }
            is_new
        }))
    }

    fn supports_bounds(&self, _bounds: &BoundsMap) -> bool {
        false
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        cols.len() <= self.cols.len() && cols.iter().zip(self.cols.iter()).all(|(a, b)| a == b)
    }

    fn slice(&self, _bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        Err(Error::UnsupportedQuery("cannot slice a grouped selection".into()))
    }

    fn primary_key_len(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod aggregate_test;
