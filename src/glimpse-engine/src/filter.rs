// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The filter engine: declared filters plus the transient cross-filter.
//!
//! Filters are pure, per-row AND-composed predicates applied in declared
//! order.  The final row set is order-independent even though the
//! intermediate sets aren't, and applying the same filters twice changes
//! nothing.  Malformed filter values make rows non-matching; they never
//! abort the pass.

use std::collections::{BTreeSet, HashMap};

use crate::coerce::{display_string, parse_date, to_numeric};
use crate::common::resolve_value;
use crate::crossfilter::CrossFilter;
use crate::dataset::Row;
use crate::datamodel::{FilterDef, FilterKind};

/// The `select` sentinel meaning "don't filter".
pub const SELECT_ALL: &str = "All";

/// Runtime state of one declared filter, typed per filter kind.
#[derive(Clone, PartialEq, Debug)]
pub enum FilterValue {
    /// Inclusive date bounds; both ends must parse as dates for any row
    /// to match.
    TimeRange { start: String, end: String },
    /// Exact string match; `"All"` is a no-op.
    Select(String),
    /// Membership in the set; an empty set means "all pass".
    Checkbox(BTreeSet<String>),
    /// Inclusive numeric bounds; a missing bound is unconstrained.
    NumberRange { min: Option<f64>, max: Option<f64> },
}

/// Runtime filter state keyed by filter id.  A filter with no entry is
/// not applied.
pub type FilterValues = HashMap<String, FilterValue>;

/// Narrow the row set through each declared filter in order.
pub fn apply_filters<'a>(
    rows: &'a [Row],
    defs: &[FilterDef],
    values: &FilterValues,
) -> Vec<&'a Row> {
    let mut out: Vec<&Row> = rows.iter().collect();
    for def in defs {
        let Some(value) = values.get(&def.id) else {
            continue;
        };
        out.retain(|row| row_passes(row, def, value));
    }
    out
}

/// Layer the transient cross-filter over an already-filtered row set.
pub fn apply_cross_filter<'a>(
    rows: Vec<&'a Row>,
    cross: Option<&CrossFilter>,
) -> Vec<&'a Row> {
    let Some(cross) = cross else {
        return rows;
    };
    rows.into_iter()
        .filter(|row| {
            resolve_value(row, &cross.field)
                .and_then(display_string)
                .is_some_and(|s| s == cross.value)
        })
        .collect()
}

fn row_passes(row: &Row, def: &FilterDef, value: &FilterValue) -> bool {
    match (&def.kind, value) {
        (FilterKind::TimeRange, FilterValue::TimeRange { start, end }) => {
            let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
                // malformed bound: the predicate matches nothing
                return false;
            };
            let Some(row_date) = resolve_value(row, &def.field)
                .and_then(display_string)
                .and_then(|s| parse_date(&s))
            else {
                // unparseable row dates are excluded, never included
                return false;
            };
            start <= row_date && row_date <= end
        }
        (FilterKind::Select, FilterValue::Select(selected)) => {
            if selected == SELECT_ALL {
                return true;
            }
            resolve_value(row, &def.field)
                .and_then(display_string)
                .is_some_and(|s| s == *selected)
        }
        (FilterKind::Checkbox, FilterValue::Checkbox(selected)) => {
            if selected.is_empty() {
                return true;
            }
            resolve_value(row, &def.field)
                .and_then(display_string)
                .is_some_and(|s| selected.contains(&s))
        }
        (FilterKind::NumberRange, FilterValue::NumberRange { min, max }) => {
            // both bounds missing means unconstrained: even rows whose
            // cell isn't numeric pass
            if min.is_none() && max.is_none() {
                return true;
            }
            let v = match resolve_value(row, &def.field) {
                Some(value) => to_numeric(value),
                None => f64::NAN,
            };
            if v.is_nan() {
                return false;
            }
            min.is_none_or(|min| min <= v) && max.is_none_or(|max| v <= max)
        }
        // unknown filter kinds and mismatched value types are no-ops
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn rows(value: Value) -> Vec<Row> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn def(id: &str, field: &str, kind: FilterKind) -> FilterDef {
        FilterDef {
            id: id.to_owned(),
            field: field.to_owned(),
            kind,
        }
    }

    fn values(entries: Vec<(&str, FilterValue)>) -> FilterValues {
        entries
            .into_iter()
            .map(|(id, v)| (id.to_owned(), v))
            .collect()
    }

    #[test]
    fn time_range_excludes_unparseable_dates() {
        let data = rows(json!([
            {"date": "2024-01-15"},
            {"date": "2024-02-01"},
            {"date": ""}
        ]));
        let defs = vec![def("f1", "date", FilterKind::TimeRange)];
        let vals = values(vec![(
            "f1",
            FilterValue::TimeRange {
                start: "2024-01-01".to_owned(),
                end: "2024-01-31".to_owned(),
            },
        )]);

        let out = apply_filters(&data, &defs, &vals);
        assert_eq!(1, out.len());
        assert_eq!(json!("2024-01-15"), out[0]["date"]);
    }

    #[test]
    fn time_range_bare_year_bounds() {
        let data = rows(json!([{"date": "2021-06-15"}, {"date": "2023-06-15"}]));
        let defs = vec![def("f1", "date", FilterKind::TimeRange)];
        let vals = values(vec![(
            "f1",
            FilterValue::TimeRange {
                start: "2021".to_owned(),
                end: "2022".to_owned(),
            },
        )]);

        // end "2022" means Jan 1 2022, so only the 2021 row passes
        let out = apply_filters(&data, &defs, &vals);
        assert_eq!(1, out.len());
    }

    #[test]
    fn malformed_time_bound_matches_nothing() {
        let data = rows(json!([{"date": "2024-01-15"}]));
        let defs = vec![def("f1", "date", FilterKind::TimeRange)];
        let vals = values(vec![(
            "f1",
            FilterValue::TimeRange {
                start: "whenever".to_owned(),
                end: "2024-12-31".to_owned(),
            },
        )]);

        assert!(apply_filters(&data, &defs, &vals).is_empty());
    }

    #[test]
    fn select_all_is_a_noop() {
        let data = rows(json!([{"region": "East"}, {"region": "West"}]));
        let defs = vec![def("f1", "region", FilterKind::Select)];

        let all = values(vec![("f1", FilterValue::Select("All".to_owned()))]);
        assert_eq!(2, apply_filters(&data, &defs, &all).len());

        let east = values(vec![("f1", FilterValue::Select("East".to_owned()))]);
        assert_eq!(1, apply_filters(&data, &defs, &east).len());

        // case-sensitive value match
        let lower = values(vec![("f1", FilterValue::Select("east".to_owned()))]);
        assert_eq!(0, apply_filters(&data, &defs, &lower).len());
    }

    #[test]
    fn select_resolves_field_case_insensitively() {
        let data = rows(json!([{"Region": "East"}]));
        let defs = vec![def("f1", "region", FilterKind::Select)];
        let vals = values(vec![("f1", FilterValue::Select("East".to_owned()))]);

        assert_eq!(1, apply_filters(&data, &defs, &vals).len());
    }

    #[test]
    fn checkbox_empty_set_passes_all() {
        let data = rows(json!([{"cat": "a"}, {"cat": "b"}, {"cat": "c"}]));
        let defs = vec![def("f1", "cat", FilterKind::Checkbox)];

        let none = values(vec![("f1", FilterValue::Checkbox(BTreeSet::new()))]);
        assert_eq!(3, apply_filters(&data, &defs, &none).len());

        let some = values(vec![(
            "f1",
            FilterValue::Checkbox(["a", "c"].iter().map(|s| s.to_string()).collect()),
        )]);
        assert_eq!(2, apply_filters(&data, &defs, &some).len());
    }

    #[test]
    fn number_range_bounds() {
        let data = rows(json!([
            {"price": "1,200"},
            {"price": 800},
            {"price": "bad"}
        ]));
        let defs = vec![def("f1", "price", FilterKind::NumberRange)];

        let vals = values(vec![(
            "f1",
            FilterValue::NumberRange {
                min: Some(1000.0),
                max: None,
            },
        )]);
        let out = apply_filters(&data, &defs, &vals);
        assert_eq!(1, out.len());

        let vals = values(vec![(
            "f1",
            FilterValue::NumberRange {
                min: None,
                max: Some(900.0),
            },
        )]);
        // a constrained range drops non-numeric cells
        assert_eq!(1, apply_filters(&data, &defs, &vals).len());
    }

    #[test]
    fn number_range_without_bounds_passes_every_row() {
        let data = rows(json!([
            {"price": 100},
            {"price": "bad"},
            {"price": null}
        ]));
        let defs = vec![def("f1", "price", FilterKind::NumberRange)];
        let vals = values(vec![(
            "f1",
            FilterValue::NumberRange {
                min: None,
                max: None,
            },
        )]);

        assert_eq!(3, apply_filters(&data, &defs, &vals).len());
    }

    #[test]
    fn filters_and_compose() {
        let data = rows(json!([
            {"region": "East", "price": 100},
            {"region": "East", "price": 900},
            {"region": "West", "price": 100}
        ]));
        let defs = vec![
            def("f1", "region", FilterKind::Select),
            def("f2", "price", FilterKind::NumberRange),
        ];
        let vals = values(vec![
            ("f1", FilterValue::Select("East".to_owned())),
            (
                "f2",
                FilterValue::NumberRange {
                    min: None,
                    max: Some(500.0),
                },
            ),
        ]);

        let out = apply_filters(&data, &defs, &vals);
        assert_eq!(1, out.len());
        assert_eq!(json!(100), out[0]["price"]);
    }

    #[test]
    fn unvalued_filters_are_skipped() {
        let data = rows(json!([{"region": "East"}]));
        let defs = vec![def("f1", "region", FilterKind::Select)];

        assert_eq!(1, apply_filters(&data, &defs, &FilterValues::new()).len());
    }

    #[test]
    fn cross_filter_layers_on_top() {
        let data = rows(json!([
            {"region": "East"},
            {"region": "West"},
            {"region": "East"}
        ]));
        let all: Vec<&Row> = data.iter().collect();

        let cf = CrossFilter {
            field: "Region".to_owned(), // resolved case-insensitively
            value: "East".to_owned(),
        };
        assert_eq!(2, apply_cross_filter(all.clone(), Some(&cf)).len());
        assert_eq!(3, apply_cross_filter(all, None).len());
    }
}
