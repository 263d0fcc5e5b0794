// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! A declarative dashboard interpreter.
//!
//! Given a dashboard specification (filters, KPIs, charts, layout, tabs)
//! and a flat tabular dataset, the engine computes filtered, aggregated
//! per-widget result sets, keeps the widget grid layout consistent with
//! the spec, and supports click-driven cross-filtering across the whole
//! dashboard.  Everything is synchronous and in-memory; rendering,
//! persistence, and data transport belong to the embedding application.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod coerce;
pub mod common;
pub mod crossfilter;
pub mod dataset;
pub mod datamodel;
pub mod filter;
pub mod interpreter;
pub mod json;
pub mod layout;
pub mod results;

#[cfg(test)]
mod filter_proptest;

pub use self::common::{Error, ErrorCode, ErrorKind, Result, resolve_field, resolve_value};
pub use self::crossfilter::{CrossFilter, CrossFilterState};
pub use self::dataset::{Dataset, DatasetMap, Row};
pub use self::datamodel::{DashboardSpec, FilterDef, LayoutItem, WidgetDef, WidgetKind};
pub use self::filter::{FilterValue, FilterValues};
pub use self::interpreter::{Dashboard, Interpretation};
pub use self::layout::LayoutReconciler;
pub use self::results::WidgetResult;
