// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property tests for the filter engine's contract: idempotence,
//! order-independence of the final row set, and the "empty selection
//! means all" checkbox rule.

use proptest::prelude::*;
use serde_json::Value;

use crate::dataset::Row;
use crate::datamodel::{FilterDef, FilterKind};
use crate::filter::{FilterValue, FilterValues, apply_filters};

fn arb_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        "[a-d]{1,2}".prop_map(Value::from),
        (-1000i64..1000).prop_map(Value::from),
        Just(Value::from("not a number")),
    ]
}

fn arb_row() -> impl Strategy<Value = Row> {
    (arb_cell(), arb_cell()).prop_map(|(cat, num)| {
        let mut row = Row::new();
        row.insert("cat".to_owned(), cat);
        row.insert("num".to_owned(), num);
        row
    })
}

fn defs() -> Vec<FilterDef> {
    vec![
        FilterDef {
            id: "by_cat".to_owned(),
            field: "cat".to_owned(),
            kind: FilterKind::Checkbox,
        },
        FilterDef {
            id: "by_num".to_owned(),
            field: "num".to_owned(),
            kind: FilterKind::NumberRange,
        },
    ]
}

fn values(
    cats: std::collections::BTreeSet<String>,
    min: Option<f64>,
    max: Option<f64>,
) -> FilterValues {
    let mut vals = FilterValues::new();
    vals.insert("by_cat".to_owned(), FilterValue::Checkbox(cats));
    vals.insert("by_num".to_owned(), FilterValue::NumberRange { min, max });
    vals
}

fn owned(rows: Vec<&Row>) -> Vec<Row> {
    rows.into_iter().cloned().collect()
}

proptest! {
    #[test]
    fn filtering_is_idempotent(
        rows in prop::collection::vec(arb_row(), 0..40),
        cats in prop::collection::btree_set("[a-d]{1,2}".prop_map(String::from), 0..4),
        min in -500.0f64..500.0,
    ) {
        let defs = defs();
        let vals = values(cats, Some(min), None);

        let once = owned(apply_filters(&rows, &defs, &vals));
        let twice = owned(apply_filters(&once, &defs, &vals));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_order_does_not_change_the_result(
        rows in prop::collection::vec(arb_row(), 0..40),
        cats in prop::collection::btree_set("[a-d]{1,2}".prop_map(String::from), 0..4),
        max in -500.0f64..500.0,
    ) {
        let forward = defs();
        let mut reversed = defs();
        reversed.reverse();
        let vals = values(cats, None, Some(max));

        let a = owned(apply_filters(&rows, &forward, &vals));
        let b = owned(apply_filters(&rows, &reversed, &vals));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn empty_checkbox_selection_passes_every_row(
        rows in prop::collection::vec(arb_row(), 0..40),
    ) {
        let defs = vec![FilterDef {
            id: "by_cat".to_owned(),
            field: "cat".to_owned(),
            kind: FilterKind::Checkbox,
        }];
        let mut vals = FilterValues::new();
        vals.insert(
            "by_cat".to_owned(),
            FilterValue::Checkbox(Default::default()),
        );

        prop_assert_eq!(rows.len(), apply_filters(&rows, &defs, &vals).len());
    }

    #[test]
    fn filtered_output_is_a_subsequence_of_the_input(
        rows in prop::collection::vec(arb_row(), 0..40),
        cats in prop::collection::btree_set("[a-d]{1,2}".prop_map(String::from), 0..4),
    ) {
        let defs = defs();
        let vals = values(cats, Some(-100.0), Some(100.0));

        let out = apply_filters(&rows, &defs, &vals);
        let mut cursor = rows.iter();
        for kept in out {
            prop_assert!(cursor.any(|r| std::ptr::eq(r, kept)));
        }
    }
}
