// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The aggregation engine: reduces a filtered row set into the shape each
//! widget needs.
//!
//! Every reducer skips `NaN` cells (except count, which counts rows
//! regardless of numeric validity), and a group with zero valid values is
//! dropped from the output rather than reported as zero.  An empty row
//! set produces the empty shape for every variant; nothing here panics on
//! bad input.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::coerce::{compare_values, display_string, parse_date, to_numeric};
use crate::common::resolve_value;
use crate::dataset::Row;
use crate::datamodel::{Aggregation, WidgetDef, WidgetKind};
use crate::results::{BreakdownRow, Point, StackedRow, WidgetResult};

/// Scatter plots cap by input order, not by ranking.
pub const DEFAULT_POINT_LIMIT: usize = 200;

/// Produce one widget's result from the filtered row set.  `None` for
/// widget kinds this engine doesn't know; the rendering layer owns the
/// "type not supported" placeholder.
pub fn evaluate(widget: &WidgetDef, rows: &[&Row]) -> Option<WidgetResult> {
    match &widget.kind {
        WidgetKind::Kpi => Some(WidgetResult::Scalar {
            value: scalar(rows, widget.metric.as_deref(), widget.aggregation),
        }),
        WidgetKind::Bar | WidgetKind::Pie | WidgetKind::Table => Some(WidgetResult::Breakdown {
            rows: breakdown(widget, rows),
        }),
        WidgetKind::StackedBar => Some(WidgetResult::Stacked {
            rows: stacked(widget, rows),
        }),
        WidgetKind::Line | WidgetKind::Area => Some(WidgetResult::Breakdown {
            rows: series(widget, rows),
        }),
        WidgetKind::Scatter => Some(WidgetResult::Points {
            points: points(widget, rows),
        }),
        WidgetKind::Unknown(_) => None,
    }
}

/// Reduce a row set to a single value.  `None` means "no data": an empty
/// row set, or no cell that coerces to a number (except count, which only
/// needs rows).
pub fn scalar(rows: &[&Row], field: Option<&str>, aggregation: Aggregation) -> Option<f64> {
    let values = numeric_values(rows, field);
    reduce(aggregation, &values, rows.len())
}

/// Group by `dimension`, reduce `metric`, rank descending by value.
///
/// Ties keep first-encountered input order (the sort is stable).  When a
/// category allow-list is present it replaces ranking and truncation:
/// exactly those keys, in allow-list order.
pub fn breakdown(widget: &WidgetDef, rows: &[&Row]) -> Vec<BreakdownRow> {
    let Some(dimension) = widget.dimension.as_deref() else {
        return Vec::new();
    };
    let metric = widget.metric.as_deref();

    let mut out: Vec<BreakdownRow> = Vec::new();
    for (key, group) in group_rows(rows, dimension) {
        let values = numeric_values(&group, metric);
        let Some(value) = reduce(widget.aggregation, &values, group.len()) else {
            continue;
        };
        let details = match widget.detail_field.as_deref() {
            Some(detail_field) => detail_values(&group, detail_field),
            None => Vec::new(),
        };
        out.push(BreakdownRow {
            key,
            value,
            details,
        });
    }

    match &widget.category_filter {
        Some(keys) => keys
            .iter()
            .filter_map(|k| out.iter().find(|r| &r.key == k).cloned())
            .collect(),
        None => {
            out.sort_by(|a, b| b.value.total_cmp(&a.value));
            out.truncate(widget.effective_limit());
            out
        }
    }
}

/// Group by `dimension`, sub-group by `stack_field`, reduce `metric`.
/// Missing (dimension, stack) combinations are absent from the record,
/// never zero-filled — that's a draw-time decision.
pub fn stacked(widget: &WidgetDef, rows: &[&Row]) -> Vec<StackedRow> {
    let (Some(dimension), Some(stack_field)) =
        (widget.dimension.as_deref(), widget.stack_field.as_deref())
    else {
        return Vec::new();
    };
    let metric = widget.metric.as_deref();

    let mut out: Vec<StackedRow> = Vec::new();
    for (key, group) in group_rows(rows, dimension) {
        let mut values: BTreeMap<String, f64> = BTreeMap::new();
        for (stack_key, sub_group) in group_rows(&group, stack_field) {
            let sub_values = numeric_values(&sub_group, metric);
            if let Some(v) = reduce(widget.aggregation, &sub_values, sub_group.len()) {
                values.insert(stack_key, v);
            }
        }
        if !values.is_empty() {
            out.push(StackedRow { key, values });
        }
    }
    out
}

/// Group by the x field, reduce the y field, sort ascending by parsed
/// date (dated keys first, then the rest by value-aware compare).  Series
/// are not truncated.
pub fn series(widget: &WidgetDef, rows: &[&Row]) -> Vec<BreakdownRow> {
    let x_field = widget.x_field.as_deref().or(widget.dimension.as_deref());
    let y_field = widget.y_field.as_deref().or(widget.metric.as_deref());
    let Some(x_field) = x_field else {
        return Vec::new();
    };

    let mut out: Vec<BreakdownRow> = Vec::new();
    for (key, group) in group_rows(rows, x_field) {
        let values = numeric_values(&group, y_field);
        let Some(value) = reduce(widget.aggregation, &values, group.len()) else {
            continue;
        };
        out.push(BreakdownRow {
            key,
            value,
            details: Vec::new(),
        });
    }

    out.sort_by(|a, b| match (parse_date(&a.key), parse_date(&b.key)) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_values(&a.key, &b.key),
    });
    out
}

/// Project each row to an (x, y) point.  Rows where either coordinate
/// fails to coerce are dropped entirely, and the cloud is capped at the
/// widget's limit by input order.
pub fn points(widget: &WidgetDef, rows: &[&Row]) -> Vec<Point> {
    let (Some(x_field), Some(y_field)) = (widget.x_field.as_deref(), widget.y_field.as_deref())
    else {
        return Vec::new();
    };
    let name_field = widget.dimension.as_deref().or(widget.detail_field.as_deref());
    let limit = widget.limit.unwrap_or(DEFAULT_POINT_LIMIT);

    let mut out: Vec<Point> = Vec::new();
    for &row in rows {
        if out.len() >= limit {
            break;
        }
        let x = resolve_value(row, x_field).map(to_numeric).unwrap_or(f64::NAN);
        let y = resolve_value(row, y_field).map(to_numeric).unwrap_or(f64::NAN);
        if x.is_nan() || y.is_nan() {
            continue;
        }
        let name = name_field
            .and_then(|f| resolve_value(row, f))
            .and_then(display_string)
            .unwrap_or_default();
        out.push(Point { x, y, name });
    }
    out
}

fn reduce(aggregation: Aggregation, values: &[f64], row_count: usize) -> Option<f64> {
    if row_count == 0 {
        return None;
    }
    match aggregation {
        Aggregation::Count => Some(row_count as f64),
        _ if values.is_empty() => None,
        Aggregation::Sum => Some(values.iter().sum()),
        Aggregation::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
        Aggregation::Min => values.iter().copied().reduce(f64::min),
        Aggregation::Max => values.iter().copied().reduce(f64::max),
    }
}

/// The numeric cells of `field` across the rows, with `NaN`s (blank,
/// unparseable, missing) already skipped.
fn numeric_values(rows: &[&Row], field: Option<&str>) -> Vec<f64> {
    let Some(field) = field else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| resolve_value(row, field))
        .map(to_numeric)
        .filter(|v| !v.is_nan())
        .collect()
}

/// Group rows by the string form of `field`, preserving first-encounter
/// order of keys.  Rows with a null/missing grouping cell belong to no
/// group.
fn group_rows<'a>(rows: &[&'a Row], field: &str) -> Vec<(String, Vec<&'a Row>)> {
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut groups: Vec<(String, Vec<&'a Row>)> = Vec::new();
    for &row in rows {
        let Some(key) = resolve_value(row, field).and_then(display_string) else {
            continue;
        };
        match index.get(&key) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups
}

/// Distinct detail values of a group, sorted ascending with numeric
/// compare when both sides parse as numbers.
fn detail_values(rows: &[&Row], field: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut details: Vec<String> = Vec::new();
    for &row in rows {
        if let Some(s) = resolve_value(row, field).and_then(display_string) {
            if seen.insert(s.clone()) {
                details.push(s);
            }
        }
    }
    details.sort_by(|a, b| compare_values(a, b));
    details
}
