use super::*;
use crate::value::Value;

fn keys(vs: &[i64]) -> Vec<Key> {
    vs.iter().map(|&v| Key::new(vec![Value::Int(v)])).collect()
}

#[test]
fn point_bound_window_brackets_equal_run() {
    let ks = keys(&[1, 2, 2, 2, 3]);
    let bound = SliceBounds::point(vec![Value::Int(2)]);
    assert_eq!(bound.window(&ks), (1, 4));
}

#[test]
fn range_bound_window_half_open() {
    let ks = keys(&[0, 1, 2, 3, 4]);
    let bound = SliceBounds::range(Some(vec![Value::Int(1)]), Some(vec![Value::Int(3)]));
    assert_eq!(bound.window(&ks), (1, 3));
}

#[test]
fn prefix_stop_extends_through_the_whole_matching_run() {
    let ks = keys(&[0, 1, 1, 1, 2]);
    let bound = SliceBounds::range_with_prefix_stop(Some(vec![Value::Int(1)]), Some(vec![Value::Int(1)]));
    assert_eq!(bound.window(&ks), (1, 4));
}

#[test]
fn unbounded_range_covers_everything() {
    let ks = keys(&[0, 1, 2]);
    let bound = SliceBounds::unbounded();
    assert_eq!(bound.window(&ks), (0, 3));
}

#[test]
fn prefix_point_matches_longer_stored_keys() {
    let ks = vec![
        Key::new(vec![Value::Int(1), Value::Int(9)]),
        Key::new(vec![Value::Int(1), Value::Int(10)]),
        Key::new(vec![Value::Int(2), Value::Int(0)]),
    ];
    let bound = SliceBounds::point(vec![Value::Int(1)]);
    assert_eq!(bound.window(&ks), (0, 2));
}

#[test]
fn contains_row_honors_an_existing_range_bound() {
    let bound = SliceBounds::range(Some(vec![Value::Int(0)]), Some(vec![Value::Int(2)]));
    assert!(bound.contains_row(&[Value::Int(0), Value::Int(9)]));
    assert!(bound.contains_row(&[Value::Int(1), Value::Int(0)]));
    assert!(!bound.contains_row(&[Value::Int(2), Value::Int(0)]));
}

#[test]
fn contains_row_honors_a_prefix_stop() {
    let bound = SliceBounds::range_with_prefix_stop(Some(vec![Value::Int(1)]), Some(vec![Value::Int(1)]));
    assert!(bound.contains_row(&[Value::Int(1), Value::Int(999)]));
    assert!(!bound.contains_row(&[Value::Int(2), Value::Int(0)]));
}

#[test]
fn lower_bound_row_uses_full_row_comparison() {
    let ks = keys(&[1, 2, 3]);
    let row = Key::new(vec![Value::Int(2)]);
    assert_eq!(lower_bound_row(&ks, &row), 1);
}
