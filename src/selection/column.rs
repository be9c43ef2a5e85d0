use super::Selection;
use crate::error::{Error, Result};
use crate::index::BoundsMap;
use crate::schema::Schema;
use crate::value::Value;

/// Projects each row of `source` onto `cols`, in the order given.
pub struct ColumnSelection {
    source: Box<dyn Selection>,
    cols: Vec<String>,
    schema: Schema,
}

impl ColumnSelection {
    pub fn new(source: Box<dyn Selection>, cols: Vec<String>) -> Result<ColumnSelection> {
        let schema = source.schema().project(&cols)?;
        Ok(ColumnSelection { source, cols, schema })
    }
}

impl Selection for ColumnSelection {
    fn schema(&self) -> Schema {
        self.schema.clone()
    }

    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        let source_schema = self.source.schema();
        let positions: Vec<usize> = self
            .cols
            .iter()
            .map(|n| source_schema.position(n).expect("validated in new"))
            .collect();
        Box::new(
            self.source
                .rows()
                .map(move |row| positions.iter().map(|&p| row[p].clone()).collect()),
        )
    }

    /// Conservative: only bounds phrased in exactly this projection's
    /// column order, and already servable by the source under that same
    /// naming, push down. Unlike an `Index`, a projection doesn't rewrite
    /// unspecified source columns into an open range before delegating --
    /// a caller slicing a narrower projection should slice the source
    /// directly instead.
    fn supports_bounds(&self, bounds: &BoundsMap) -> bool {
        let prefix_ok = bounds
            .iter()
            .enumerate()
            .all(|(i, (name, _))| self.cols.get(i) == Some(name));
        prefix_ok && self.source.supports_bounds(bounds)
    }

    fn supports_order(&self, cols: &[String]) -> bool {
        cols.iter().all(|c| self.cols.contains(c)) && self.source.supports_order(cols)
    }

    fn slice(&self, bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        if !self.supports_bounds(bounds) {
            return Err(Error::UnsupportedQuery(format!(
                "projection over {:?} cannot serve bounds {:?}",
                self.cols, bounds
            )));
        }
        let inner = self.source.slice(bounds)?;
        Ok(Box::new(ColumnSelection {
            source: inner,
            cols: self.cols.clone(),
            schema: self.schema.clone(),
        }))
    }

    fn primary_key_len(&self) -> Option<usize> {
        // A projection can drop or reorder the primary key columns; rather
        // than track whether this particular `cols` happens to preserve
        // them, mutation through a projected view is simply unsupported.
        None
    }
}

#[cfg(test)]
#[path = "column_test.rs"]
mod column_test;
