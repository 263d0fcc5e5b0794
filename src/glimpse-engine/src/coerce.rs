// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Value coercion: heterogeneous dataset cells to numbers, dates, and
//! display strings.
//!
//! Datasets arrive as flat JSON-ish records whose cells may be numbers,
//! locale-formatted number strings ("1,200", "$45"), dates in a handful of
//! common shapes, or blank.  Everything here degrades to `NaN`/`None`
//! instead of failing: absence of data is represented, never invented as
//! zero, and never raised as an error.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::Value;

/// Coerce a cell to a number, yielding `NaN` for anything unparseable.
///
/// Strings are stripped of thousands separators and currency/percent
/// symbols before parsing.  Aggregation consumers are responsible for
/// skipping `NaN`s; an all-`NaN` group means "no data", not zero.
pub fn to_numeric(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_numeric_str(s),
        _ => f64::NAN,
    }
}

fn parse_numeric_str(s: &str) -> f64 {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | '¥' | '%' | ' '))
        .collect();
    if cleaned.is_empty() {
        return f64::NAN;
    }
    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}

/// The string form of a cell, used for grouping keys and equality filters.
///
/// `None` for null/missing cells: a row with no value for a grouping
/// dimension belongs to no group rather than an "undefined" group.
pub fn display_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Parse a date-ish string.
///
/// Accepts ISO `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`, `DD.MM.YYYY`, a
/// datetime with the time part cut at `T` or space, and a bare 4-digit
/// year (treated as January 1 of that year).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.split(|c| c == 'T' || c == ' ').next().unwrap_or(s);

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Compare two raw cell strings: numerically when both sides parse as
/// numbers, lexicographically otherwise.  Used to order detail lists
/// ("2019" before "2020" before "n/a").
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}
