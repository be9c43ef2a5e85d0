use super::*;
use crate::index::Bound;
use crate::schema::Column;
use crate::value::Type;

fn scalar(name: &str, v: Value) -> (String, Bound) {
    (name.to_string(), Bound::Scalar(v))
}
fn range(name: &str, start: Option<Value>, stop: Option<Value>) -> (String, Bound) {
    (name.to_string(), Bound::Range { start, stop })
}

// S1: point + range over a compound key.
#[test]
fn s1_point_and_range_over_compound_key() {
    let schema = Schema::new(
        vec![Column::new("one", Type::Int), Column::new("two", Type::Int)],
        Vec::new(),
    );
    let table = Table::with_order(schema, 4).unwrap();
    for row in [[1, 1], [1, 2], [2, 2]] {
        table.borrow_mut().insert(row.iter().map(|v| Value::Int(*v)).collect()).unwrap();
    }

    let point = Table::slice(&table, vec![scalar("one", Value::Int(1)), scalar("two", Value::Int(2))]).unwrap();
    assert_eq!(point.rows().collect::<Vec<_>>(), vec![vec![Value::Int(1), Value::Int(2)]]);

    let by_one = Table::slice(&table, vec![range("one", Some(Value::Int(1)), Some(Value::Int(2)))]).unwrap();
    assert_eq!(
        by_one.rows().collect::<Vec<_>>(),
        vec![vec![Value::Int(1), Value::Int(1)], vec![Value::Int(1), Value::Int(2)]]
    );

    let mixed = Table::slice(
        &table,
        vec![scalar("one", Value::Int(1)), range("two", Some(Value::Int(1)), Some(Value::Int(3)))],
    )
    .unwrap();
    assert_eq!(
        mixed.rows().collect::<Vec<_>>(),
        vec![vec![Value::Int(1), Value::Int(1)], vec![Value::Int(1), Value::Int(2)]]
    );
}

// S2: limit composed over a range slice, driven through the table planner.
#[test]
fn s2_limit_over_range_through_the_table() {
    let schema = Schema::new(vec![Column::new("k", Type::Int)], Vec::new());
    let table = Table::with_order(schema, 5).unwrap();
    for k in 0..50 {
        table.borrow_mut().insert(vec![Value::Int(k)]).unwrap();
    }
    let sliced = Table::slice(&table, vec![range("k", Some(Value::Int(10)), Some(Value::Int(20)))]).unwrap();
    let limited = crate::selection::limit(sliced, 5);
    assert_eq!(
        limited.rows().collect::<Vec<_>>(),
        (10..15).map(|k| vec![Value::Int(k)]).collect::<Vec<_>>()
    );
}

// S3: filter + project, driven through the table planner.
#[test]
fn s3_filter_and_project_through_the_table() {
    let schema = Schema::new(
        vec![Column::new("k", Type::Str)],
        vec![Column::new("v", Type::Int)],
    );
    let table = Table::with_order(schema, 4).unwrap();
    for (k, v) in [("one", 1), ("two", 2), ("three", 3)] {
        table.borrow_mut().insert(vec![Value::Str(k.into()), Value::Int(v)]).unwrap();
    }
    let full = Table::slice(&table, Vec::new()).unwrap();
    let pred: crate::selection::Predicate = Rc::new(|row: &crate::row::Row| {
        matches!(row.get("k"), Some(Value::Str(s)) if s == "two")
    });
    let filtered = crate::selection::filter(full, pred);
    let projected = crate::selection::select(filtered, vec!["v".to_string()]).unwrap();
    assert_eq!(projected.rows().collect::<Vec<_>>(), vec![vec![Value::Int(2)]]);
}

// S4: a bound on an auxiliary-indexed column is routed through a merge.
#[test]
fn s4_auxiliary_index_routes_residual_bounds() {
    let schema = Schema::new(
        vec![Column::new("one", Type::Str)],
        vec![Column::new("two", Type::Int), Column::new("three", Type::Str)],
    );
    let table = Table::with_order(schema, 4).unwrap();
    table
        .borrow_mut()
        .insert(vec![Value::Str("One".into()), Value::Int(2), Value::Str("Three".into())])
        .unwrap();
    table
        .borrow_mut()
        .insert(vec![Value::Str("Four".into()), Value::Int(5), Value::Str("Six".into())])
        .unwrap();
    table.borrow_mut().add_index("by_two", vec!["two".to_string()]).unwrap();
    table
        .borrow_mut()
        .insert(vec![Value::Str("Seven".into()), Value::Int(8), Value::Str("Nine".into())])
        .unwrap();

    let sel = Table::slice(&table, vec![range("two", Some(Value::Int(2)), Some(Value::Int(8)))]).unwrap();
    assert_eq!(
        sel.rows().collect::<Vec<_>>(),
        vec![
            vec![Value::Str("One".into()), Value::Int(2), Value::Str("Three".into())],
            vec![Value::Str("Four".into()), Value::Int(5), Value::Str("Six".into())],
        ]
    );
}

// S5: update cascade, including key-column updates being rejected.
#[test]
fn s5_update_cascade_and_key_column_rejection() {
    let schema = Schema::new(
        vec![Column::new("one", Type::Int), Column::new("two", Type::Str)],
        vec![Column::new("three", Type::Str), Column::new("four", Type::Int)],
    );
    let table = Table::with_order(schema, 4).unwrap();
    table
        .borrow_mut()
        .upsert(vec![Value::Int(1), Value::Str("u".into())], vec![Value::Str("c3".into()), Value::Int(4)])
        .unwrap();
    table
        .borrow_mut()
        .insert(vec![Value::Int(2), Value::Str("i".into()), Value::Str("c3-2".into()), Value::Int(5)])
        .unwrap();
    table.borrow_mut().add_index("by_four", vec!["four".to_string()]).unwrap();

    let updated = table.borrow_mut().update(&[("three".to_string(), Value::Str("new".into()))]).unwrap();
    assert_eq!(updated, 2);
    let threes: Vec<_> = table
        .borrow()
        .primary()
        .iter_all()
        .map(|k| k.fields()[2].clone())
        .collect();
    assert!(threes.iter().all(|v| *v == Value::Str("new".into())));

    let mut sel = Table::slice(&table, vec![scalar("four", Value::Int(4))]).unwrap();
    sel.update(&[("three".to_string(), Value::Str("old".into()))]).unwrap();
    let projected = crate::selection::select(
        Table::slice(&table, vec![scalar("four", Value::Int(4))]).unwrap(),
        vec!["three".to_string()],
    )
    .unwrap();
    assert_eq!(projected.rows().collect::<Vec<_>>(), vec![vec![Value::Str("old".into())]]);

    let before = table.borrow().len();
    let mut key_sel = Table::slice(&table, vec![scalar("four", Value::Int(4))]).unwrap();
    let _ = key_sel.update(&[("four".to_string(), Value::Int(3))]);
    assert_eq!(table.borrow().len(), before);
}

// S6: delete + rebalance cascade across primary and auxiliary.
#[test]
fn s6_delete_and_rebalance_cascade() {
    let schema = Schema::new(
        vec![Column::new("a", Type::Int)],
        vec![Column::new("b", Type::Int), Column::new("c", Type::Int)],
    );
    let table = Table::with_order(schema, 4).unwrap();
    for i in 0..10 {
        table.borrow_mut().insert(vec![Value::Int(i), Value::Int(i), Value::Int(i)]).unwrap();
    }
    table.borrow_mut().add_index("by_b", vec!["b".to_string()]).unwrap();

    let mut first = Table::slice(&table, vec![range("a", Some(Value::Int(0)), Some(Value::Int(2)))]).unwrap();
    first.delete().unwrap();
    let remaining_a: Vec<_> = table.borrow().primary().iter_all().map(|k| k.fields()[0].clone()).collect();
    assert_eq!(
        remaining_a,
        (2..10).map(Value::Int).collect::<Vec<_>>()
    );

    let mut second = Table::slice(&table, vec![range("b", Some(Value::Int(5)), Some(Value::Int(9)))]).unwrap();
    second.delete().unwrap();
    let remaining_a: Vec<_> = table.borrow().primary().iter_all().map(|k| k.fields()[0].clone()).collect();
    assert_eq!(
        remaining_a,
        vec![Value::Int(2), Value::Int(3), Value::Int(4), Value::Int(9)]
    );

    table.borrow_mut().delete().unwrap();
    table.borrow_mut().rebalance();
    let empty = Table::slice(&table, Vec::new()).unwrap();
    assert_eq!(empty.rows().count(), 0);
}

// Index cascade: an auxiliary always agrees with the primary on which
// primary keys are live, after an arbitrary mix of insert/update/delete.
#[test]
fn index_cascade_stays_consistent_with_the_primary() {
    let schema = Schema::new(
        vec![Column::new("k", Type::Int)],
        vec![Column::new("v", Type::Int)],
    );
    let table = Table::with_order(schema, 4).unwrap();
    table.borrow_mut().add_index("by_v", vec!["v".to_string()]).unwrap();
    for k in 0..6 {
        table.borrow_mut().insert(vec![Value::Int(k), Value::Int(k * 10)]).unwrap();
    }
    table.borrow_mut().apply_delete(&[vec![Value::Int(2)], vec![Value::Int(4)]]).unwrap();
    table.borrow_mut().upsert(vec![Value::Int(0)], vec![Value::Int(999)]).unwrap();

    let primary_keys: std::collections::BTreeSet<_> = table
        .borrow()
        .primary()
        .iter_all()
        .map(|k| k.fields()[0].clone())
        .collect();
    let aux_keys: std::collections::BTreeSet<_> = table
        .borrow()
        .auxiliary("by_v")
        .unwrap()
        .iter_all()
        .map(|k| k.fields()[1].clone())
        .collect();
    assert_eq!(primary_keys, aux_keys);
}

// Nested merges: when two residual bounds are each served by a separate
// auxiliary, the outer merge's lookup must still honor the inner merge's
// own bound (here, a primary prefix restriction `a < 2`) rather than
// discarding it and leaking rows from outside it.
#[test]
fn nested_merges_honor_every_residual_bound() {
    let schema = Schema::new(
        vec![
            Column::new("a", Type::Int),
            Column::new("b", Type::Int),
            Column::new("c", Type::Int),
            Column::new("d", Type::Int),
        ],
        Vec::new(),
    );
    let table = Table::with_order(schema, 4).unwrap();
    table.borrow_mut().add_index("i2", vec!["b".to_string()]).unwrap();
    table.borrow_mut().add_index("i4", vec!["d".to_string()]).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    table
                        .borrow_mut()
                        .insert(vec![Value::Int(i), Value::Int(j), Value::Int(k), Value::Int(l)])
                        .unwrap();
                }
            }
        }
    }

    let sel = Table::slice(
        &table,
        vec![
            range("a", None, Some(Value::Int(2))),
            scalar("b", Value::Int(1)),
            range("d", Some(Value::Int(1)), Some(Value::Int(3))),
        ],
    )
    .unwrap();
    let rows = sel.rows().collect::<Vec<_>>();
    // a in [0,2) (2 values) x b == 1 x c unconstrained (3 values) x d in [1,3) (2 values).
    assert_eq!(rows.len(), 2 * 1 * 3 * 2);
    assert!(rows.iter().all(|r| {
        matches!(r[0], Value::Int(a) if a < 2)
            && r[1] == Value::Int(1)
            && matches!(r[3], Value::Int(d) if (1..3).contains(&d))
    }));
}

// Re-entering index support mid-chain via `index()`.
#[test]
fn index_combinator_reenters_bounds_support_mid_chain() {
    let schema = Schema::new(
        vec![Column::new("one", Type::Str), Column::new("two", Type::Int)],
        vec![Column::new("three", Type::Int)],
    );
    let table = Table::with_order(schema, 4).unwrap();
    table
        .borrow_mut()
        .insert(vec![Value::Str("One".into()), Value::Int(2), Value::Int(3)])
        .unwrap();
    table
        .borrow_mut()
        .insert(vec![Value::Str("Four".into()), Value::Int(5), Value::Int(6)])
        .unwrap();
    table.borrow_mut().add_index("aux", vec!["three".to_string()]).unwrap();
    table
        .borrow_mut()
        .insert(vec![Value::Str("Seven".into()), Value::Int(8), Value::Int(9)])
        .unwrap();

    let sliced = Table::slice(&table, vec![range("three", Some(Value::Int(2)), Some(Value::Int(9)))]).unwrap();
    let pred: crate::selection::Predicate =
        Rc::new(|row: &crate::row::Row| matches!(row.get("three"), Some(Value::Int(v)) if *v > 3));
    let filtered = crate::selection::filter(sliced, pred);
    let limited = crate::selection::limit(filtered, 1);
    let reindexed = crate::selection::index(limited).unwrap();
    let narrowed = reindexed.slice(&vec![scalar("one", Value::Str("Four".into()))]).unwrap();
    let limited_again = crate::selection::limit(narrowed, 2);
    let projected = crate::selection::select(limited_again, vec!["one".to_string()]).unwrap();
    assert_eq!(projected.rows().collect::<Vec<_>>(), vec![vec![Value::Str("Four".into())]]);
}

// Order_by correctness against a primary-supported ordering.
#[test]
fn order_by_matches_sorted_full_rows() {
    let schema = Schema::new(vec![Column::new("k", Type::Int)], Vec::new());
    let table = Table::with_order(schema, 4).unwrap();
    for k in [3, 1, 4, 1, 5, 9, 2] {
        let _ = table.borrow_mut().insert(vec![Value::Int(k)]);
    }
    let forward = Table::order_by(&table, vec!["k".to_string()], false).unwrap();
    let mut expected: Vec<_> = table.borrow().primary().iter_all().map(|k| k.fields().to_vec()).collect();
    expected.sort();
    assert_eq!(forward.rows().collect::<Vec<_>>(), expected);

    let reverse = Table::order_by(&table, vec!["k".to_string()], true).unwrap();
    expected.reverse();
    assert_eq!(reverse.rows().collect::<Vec<_>>(), expected);
}
