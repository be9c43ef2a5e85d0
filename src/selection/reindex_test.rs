use super::*;
use crate::schema::{Column, Schema};
use crate::value::Type;

struct Static(Schema, Vec<Vec<Value>>);
impl Selection for Static {
    fn schema(&self) -> Schema {
        self.0.clone()
    }
    fn rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
        Box::new(self.1.clone().into_iter())
    }
    fn supports_bounds(&self, _b: &BoundsMap) -> bool {
        false
    }
    fn supports_order(&self, _c: &[String]) -> bool {
        false
    }
    fn slice(&self, _b: &BoundsMap) -> Result<Box<dyn Selection>> {
        Err(crate::error::Error::UnsupportedQuery("static".into()))
    }
    fn primary_key_len(&self) -> Option<usize> {
        None
    }
}

fn schema() -> Schema {
    Schema::new(
        vec![Column::new("one", Type::Str), Column::new("two", Type::Int)],
        vec![Column::new("three", Type::Int)],
    )
}

// Mirrors a chain that has lost index support (a limit) regaining it via
// `index()`, then slicing on a leading key column.
#[test]
fn reindex_regains_bounds_support_after_a_limit() {
    let source: Box<dyn Selection> = Box::new(Static(
        schema(),
        vec![vec![Value::Str("Four".into()), Value::Int(5), Value::Int(6)]],
    ));

    let reindexed = crate::selection::index(source).unwrap();
    assert!(reindexed.supports_bounds(&vec![("one".into(), crate::index::Bound::Scalar(Value::Str("Four".into())))]));

    let bounds: BoundsMap = vec![("one".into(), crate::index::Bound::Scalar(Value::Str("Four".into())))];
    let sliced = reindexed.slice(&bounds).unwrap();
    let got: Vec<_> = sliced.rows().collect();
    assert_eq!(got, vec![vec![Value::Str("Four".into()), Value::Int(5), Value::Int(6)]]);
}

#[test]
fn reindex_slice_excludes_rows_outside_the_bound() {
    let source: Box<dyn Selection> = Box::new(Static(
        schema(),
        vec![
            vec![Value::Str("Four".into()), Value::Int(5), Value::Int(6)],
            vec![Value::Str("One".into()), Value::Int(2), Value::Int(3)],
        ],
    ));

    let reindexed = crate::selection::index(source).unwrap();
    let bounds: BoundsMap = vec![("one".into(), crate::index::Bound::Scalar(Value::Str("Four".into())))];
    let sliced = reindexed.slice(&bounds).unwrap();
    let got: Vec<_> = sliced.rows().collect();
    assert_eq!(got, vec![vec![Value::Str("Four".into()), Value::Int(5), Value::Int(6)]]);
}
