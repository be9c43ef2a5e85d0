use super::*;
use crate::selection::derive;
use std::rc::Rc;
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

fn sample() -> Box<dyn Selection> {
    let schema = Schema::new(
        vec![Column::new("k", Type::Int)],
        vec![Column::new("v", Type::Int)],
    );
    let mut idx = Index::with_order(schema, 3).unwrap();
    idx.insert(vec![Value::Int(1), Value::Int(10)]).unwrap();
    idx.insert(vec![Value::Int(2), Value::Int(20)]).unwrap();
    Box::new(IndexAdapter(idx))
}

#[test]
fn appends_computed_column() {
    let f: DeriveFn = Rc::new(|row: &crate::row::Row| match row.get("v") {
        Some(Value::Int(v)) => Value::Int(v * 2),
        _ => Value::Int(0),
    });
    let derived = derive(sample(), "doubled".to_string(), f, Type::Int).unwrap();
    let schema = derived.schema();
    assert_eq!(schema.len(), 3);
    let rows: Vec<_> = derived.rows().collect();
    assert_eq!(
        rows,
        vec![
            vec![Value::Int(1), Value::Int(10), Value::Int(20)],
            vec![Value::Int(2), Value::Int(20), Value::Int(40)],
        ]
    );
}

#[test]
fn rejects_updating_derived_column() {
    let f: DeriveFn = Rc::new(|_row: &crate::row::Row| Value::Int(0));
    let mut derived = derive(sample(), "doubled".to_string(), f, Type::Int).unwrap();
    let err = derived.update(&[("doubled".to_string(), Value::Int(1))]);
    assert!(err.is_err());
}
