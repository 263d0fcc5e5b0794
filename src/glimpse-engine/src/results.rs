// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Per-widget result shapes, owned by the interpreter for one render
//! cycle and read by the rendering layer.  Results serialize to the plain
//! records the consumer draws from; they carry no styling or chart
//! concerns.

use std::collections::BTreeMap;

use serde::Serialize;

/// One group in a breakdown: a category key and its reduced value, plus
/// (when the widget asks for them) the underlying detail values the
/// group spans.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct BreakdownRow {
    pub key: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<String>,
}

/// One group in a stacked breakdown: one numeric entry per observed stack
/// key.  Missing combinations are absent, not zero — treating absent as
/// zero is a draw-time decision that belongs to the renderer.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct StackedRow {
    pub key: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
}

/// What the aggregation engine hands the rendering layer for one widget.
///
/// A scalar of `None` is the "no data" sentinel — an all-invalid or empty
/// input is not the same thing as zero, and the renderer shows it
/// differently.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(untagged)]
pub enum WidgetResult {
    Scalar { value: Option<f64> },
    Breakdown { rows: Vec<BreakdownRow> },
    Stacked { rows: Vec<StackedRow> },
    Points { points: Vec<Point> },
}

impl WidgetResult {
    /// True when there is nothing to draw: the renderer shows its empty
    /// state instead of an empty chart.
    pub fn is_empty(&self) -> bool {
        match self {
            WidgetResult::Scalar { value } => value.is_none(),
            WidgetResult::Breakdown { rows } => rows.is_empty(),
            WidgetResult::Stacked { rows } => rows.is_empty(),
            WidgetResult::Points { points } => points.is_empty(),
        }
    }
}
