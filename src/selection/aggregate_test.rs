use super::*;
use crate::selection::group_by;
use crate::index::Index;
use crate::schema::{Column, Schema};
use crate::value::Type;

struct IndexAdapter(Index);

impl Selection for IndexAdapter {
    fn schema(&self) -> Schema {
        self.0.schema().clone()
    }
    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        Box::new(
            self.0
                .iter_bounds(crate::btree::SliceBounds::unbounded(), false)
                .map(|k| k.fields().to_vec()),
        )
    }
    fn rows_reverse(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        Box::new(
            self.0
                .iter_bounds(crate::btree::SliceBounds::unbounded(), true)
                .map(|k| k.fields().to_vec()),
        )
    }
    fn supports_bounds(&self, b: &BoundsMap) -> bool {
        self.0.supports_bounds(b)
    }
    fn supports_order(&self, cols: &[String]) -> bool {
        self.0.supports_order(cols)
    }
    fn slice(&self, _bounds: &BoundsMap) -> Result<Box<dyn Selection>> {
        Err(crate::error::Error::UnsupportedQuery("not needed in this test".into()))
    }
    fn primary_key_len(&self) -> Option<usize> {
        None
    }
}

#[test]
fn group_by_deduplicates_adjacent_groups() {
    let schema = Schema::new(
        vec![Column::new("color", Type::Str), Column::new("k", Type::Int)],
        Vec::new(),
    );
    let mut idx = Index::with_order(schema, 3).unwrap();
    idx.insert(vec![Value::Str("red".into()), Value::Int(1)]).unwrap();
    idx.insert(vec![Value::Str("red".into()), Value::Int(2)]).unwrap();
    idx.insert(vec![Value::Str("blue".into()), Value::Int(3)]).unwrap();
    let source: Box<dyn Selection> = Box::new(IndexAdapter(idx));

    let grouped = group_by(source, vec!["color".to_string()]).unwrap();
    let rows: Vec<_> = grouped.rows().collect();
    assert_eq!(
        rows,
        vec![vec![Value::Str("blue".into())], vec![Value::Str("red".into())]]
    );
}

#[test]
fn group_by_on_singleton_groups_is_identity() {
    let schema = Schema::new(vec![Column::new("k", Type::Int)], Vec::new());
    let mut idx = Index::with_order(schema, 3).unwrap();
    idx.insert(vec![Value::Int(1)]).unwrap();
    idx.insert(vec![Value::Int(2)]).unwrap();
    let source: Box<dyn Selection> = Box::new(IndexAdapter(idx));

    let grouped = group_by(source, vec!["k".to_string()]).unwrap();
    let rows: Vec<_> = grouped.rows().collect();
    assert_eq!(rows, vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
}
