// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The layout reconciler: keeps the widget grid-position list consistent
//! with the spec's widget list.
//!
//! A supplied layout is adopted verbatim only when every item is
//! structurally valid; otherwise the whole list is discarded and a
//! default is synthesized positionally (items are never repaired one by
//! one).  After reconciliation the layout's id set equals the widget id
//! set exactly: orphan items are dropped, layout-less widgets get a
//! generated cell.

use std::collections::HashSet;

use crate::datamodel::{DashboardSpec, LayoutItem};
use crate::json;

pub const GRID_COLUMNS: f64 = 12.0;
pub const KPI_WIDTH: f64 = 3.0;
pub const KPI_HEIGHT: f64 = 2.0;
pub const CHART_WIDTH: f64 = 6.0;
pub const CHART_HEIGHT: f64 = 5.0;

/// Validate a supplied layout wholesale: every entry needs an id and
/// numeric geometry, and the list must be non-empty.  Any violation
/// discards the entire list.
pub fn validate_supplied(items: &[json::LayoutItem]) -> Option<Vec<LayoutItem>> {
    if items.is_empty() {
        return None;
    }
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let (Some(id), Some(x), Some(y), Some(w), Some(h)) =
            (item.id.as_ref(), item.x, item.y, item.w, item.h)
        else {
            return None;
        };
        if id.is_empty() || !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return None;
        }
        out.push(LayoutItem {
            id: id.clone(),
            x,
            y,
            w,
            h,
        });
    }
    Some(out)
}

/// Synthesize the default layout for a spec: KPI cells left-to-right,
/// wrapping at the grid width, then charts two per row beneath, all in
/// spec order.  Purely positional — no prior layout state is consulted.
pub fn synthesize(spec: &DashboardSpec) -> Vec<LayoutItem> {
    let mut items: Vec<LayoutItem> = Vec::new();

    let mut x = 0.0;
    let mut y = 0.0;
    for kpi in &spec.kpis {
        if x + KPI_WIDTH > GRID_COLUMNS {
            x = 0.0;
            y += KPI_HEIGHT;
        }
        items.push(LayoutItem {
            id: kpi.id.clone(),
            x,
            y,
            w: KPI_WIDTH,
            h: KPI_HEIGHT,
        });
        x += KPI_WIDTH;
    }

    let charts_top = if spec.kpis.is_empty() { 0.0 } else { y + KPI_HEIGHT };
    for (i, chart) in spec.charts.iter().enumerate() {
        items.push(LayoutItem {
            id: chart.id.clone(),
            x: (i % 2) as f64 * CHART_WIDTH,
            y: charts_top + (i / 2) as f64 * CHART_HEIGHT,
            w: CHART_WIDTH,
            h: CHART_HEIGHT,
        });
    }

    items
}

/// Owns the current layout item list across spec changes and user edits.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct LayoutReconciler {
    items: Vec<LayoutItem>,
}

impl LayoutReconciler {
    pub fn new() -> LayoutReconciler {
        Default::default()
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Re-derive the layout from the spec: adopt its valid supplied
    /// layout or synthesize a default, then drop orphan ids and assign
    /// cells to widgets the layout doesn't mention.
    pub fn reconcile(&mut self, spec: &DashboardSpec) {
        let mut items = match &spec.layout {
            Some(supplied) if !supplied.is_empty() => supplied.clone(),
            _ => synthesize(spec),
        };

        let widget_ids: HashSet<&str> = spec.widgets().map(|w| w.id.as_str()).collect();
        items.retain(|item| widget_ids.contains(item.id.as_str()));

        let placed: HashSet<String> = items.iter().map(|item| item.id.clone()).collect();
        let mut next_y = items
            .iter()
            .map(|item| item.y + item.h)
            .fold(0.0, f64::max);

        for kpi in &spec.kpis {
            if !placed.contains(&kpi.id) {
                items.push(LayoutItem {
                    id: kpi.id.clone(),
                    x: 0.0,
                    y: next_y,
                    w: KPI_WIDTH,
                    h: KPI_HEIGHT,
                });
                next_y += KPI_HEIGHT;
            }
        }
        for chart in &spec.charts {
            if !placed.contains(&chart.id) {
                items.push(LayoutItem {
                    id: chart.id.clone(),
                    x: 0.0,
                    y: next_y,
                    w: CHART_WIDTH,
                    h: CHART_HEIGHT,
                });
                next_y += CHART_HEIGHT;
            }
        }

        self.items = items;
    }

    /// Accept a drag/resize edit from the rendering layer.  Returns true
    /// only when the edit actually changes the layout, so the caller
    /// reports each distinct layout upward exactly once.
    pub fn apply_edit(&mut self, items: Vec<LayoutItem>) -> bool {
        if items == self.items {
            return false;
        }
        self.items = items;
        true
    }

    /// Drop a removed widget's item.  Counts as a layout change for
    /// upward notification when the id was present.
    pub fn remove_widget(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }
}
