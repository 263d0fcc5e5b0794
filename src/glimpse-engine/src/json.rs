// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! JSON serialization for dashboard specifications.
//!
//! The wire format mirrors the documents the publishing product stores:
//! camelCase widget fields, a `type` string per filter/widget, and layout
//! items whose geometry may be missing or mistyped.  Deserialization is
//! permissive — the structural keep-or-discard decision for layouts
//! belongs to the layout reconciler, so raw items survive parsing intact.
//!
//! # Example
//! ```no_run
//! use glimpse_engine::json;
//!
//! let json_str = r#"{"filters": [], "kpis": [], "charts": []}"#;
//! let doc: json::Dashboard = serde_json::from_str(json_str)?;
//! let spec: glimpse_engine::datamodel::DashboardSpec = doc.into();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::result;

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::datamodel;
use crate::layout::validate_supplied;
use crate::spec_err;

// Helper functions for serde skip_serializing_if

fn is_empty_string(val: &str) -> bool {
    val.is_empty()
}

fn is_empty_vec<T>(val: &[T]) -> bool {
    val.is_empty()
}

// Lenient accessors for layout geometry: a mistyped cell (a string where
// a number belongs) must read as "missing" so the reconciler can discard
// the layout, rather than failing the whole document parse.

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Deserialize::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_f64))
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Deserialize::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Filter {
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub id: String,
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub field: String,
    #[serde(rename = "type", skip_serializing_if = "is_empty_string", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "is_empty_string", default)]
    pub kind: String,
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stack_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub y_field: Option<String>,
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub aggregation: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category_filter: Option<Vec<String>>,
}

/// A raw layout entry.  Geometry fields are optional on purpose: a single
/// missing/mistyped field invalidates the whole supplied layout (see the
/// reconciler), so we must be able to represent the broken entry rather
/// than fail the document parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LayoutItem {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_string",
        default
    )]
    pub id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_f64",
        default
    )]
    pub x: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_f64",
        default
    )]
    pub y: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_f64",
        default
    )]
    pub w: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_f64",
        default
    )]
    pub h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Tab {
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dataset: Option<String>,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Dashboard {
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub filters: Vec<Filter>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub kpis: Vec<Widget>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub charts: Vec<Widget>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub layout: Vec<LayoutItem>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub tabs: Vec<Tab>,
}

/// Parse a spec document, mapping serde failures into the engine's error
/// type.  This is the only place a malformed document is an error; past
/// this boundary everything degrades gracefully.
pub fn dashboard_from_str(s: &str) -> Result<datamodel::DashboardSpec> {
    match serde_json::from_str::<Dashboard>(s) {
        Ok(doc) => Ok(doc.into()),
        Err(err) => spec_err!(JsonDeserialization, err.to_string()),
    }
}

impl From<Filter> for datamodel::FilterDef {
    fn from(f: Filter) -> Self {
        datamodel::FilterDef {
            kind: datamodel::FilterKind::from_name(&f.kind),
            id: f.id,
            field: f.field,
        }
    }
}

impl From<datamodel::FilterDef> for Filter {
    fn from(f: datamodel::FilterDef) -> Self {
        Filter {
            kind: f.kind.name().to_owned(),
            id: f.id,
            field: f.field,
        }
    }
}

impl From<Widget> for datamodel::WidgetDef {
    fn from(w: Widget) -> Self {
        datamodel::WidgetDef {
            kind: datamodel::WidgetKind::from_name(&w.kind),
            aggregation: datamodel::Aggregation::from_name(&w.aggregation),
            id: w.id,
            label: w.label,
            dimension: w.dimension,
            metric: w.metric,
            stack_field: w.stack_field,
            detail_field: w.detail_field,
            x_field: w.x_field,
            y_field: w.y_field,
            limit: w.limit.map(|n| n as usize),
            category_filter: w.category_filter,
        }
    }
}

impl From<datamodel::WidgetDef> for Widget {
    fn from(w: datamodel::WidgetDef) -> Self {
        Widget {
            kind: w.kind.name().to_owned(),
            aggregation: w.aggregation.name().to_owned(),
            id: w.id,
            label: w.label,
            dimension: w.dimension,
            metric: w.metric,
            stack_field: w.stack_field,
            detail_field: w.detail_field,
            x_field: w.x_field,
            y_field: w.y_field,
            limit: w.limit.map(|n| n as u64),
            category_filter: w.category_filter,
        }
    }
}

impl From<&datamodel::LayoutItem> for LayoutItem {
    fn from(item: &datamodel::LayoutItem) -> Self {
        LayoutItem {
            id: Some(item.id.clone()),
            x: Some(item.x),
            y: Some(item.y),
            w: Some(item.w),
            h: Some(item.h),
        }
    }
}

impl From<Dashboard> for datamodel::DashboardSpec {
    fn from(d: Dashboard) -> Self {
        datamodel::DashboardSpec {
            layout: validate_supplied(&d.layout),
            filters: d.filters.into_iter().map(Into::into).collect(),
            kpis: d.kpis.into_iter().map(Into::into).collect(),
            charts: d.charts.into_iter().map(Into::into).collect(),
            tabs: d
                .tabs
                .into_iter()
                .map(|t| datamodel::Tab {
                    label: t.label,
                    dataset: t.dataset,
                    spec: t.dashboard.into(),
                })
                .collect(),
        }
    }
}

impl From<datamodel::DashboardSpec> for Dashboard {
    fn from(spec: datamodel::DashboardSpec) -> Self {
        Dashboard {
            layout: spec
                .layout
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(Into::into)
                .collect(),
            filters: spec.filters.into_iter().map(Into::into).collect(),
            kpis: spec.kpis.into_iter().map(Into::into).collect(),
            charts: spec.charts.into_iter().map(Into::into).collect(),
            tabs: spec
                .tabs
                .into_iter()
                .map(|t| Tab {
                    label: t.label,
                    dataset: t.dataset,
                    dashboard: t.spec.into(),
                })
                .collect(),
        }
    }
}
