// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The dashboard interpreter: the orchestrator tying filters,
//! cross-filtering, aggregation, and layout together.
//!
//! All runtime UI state (filter values, the cross-filter, the layout
//! list, the active tab) lives in one explicit `Dashboard` container —
//! there is no ambient state.  Every interpretation is a complete,
//! synchronous recomputation over the full dataset in the fixed order
//! filters → cross-filter → aggregation, with layout reconciled
//! independently of data.

use std::collections::HashMap;

use crate::aggregate;
use crate::crossfilter::{CrossFilter, CrossFilterState};
use crate::dataset::{DatasetMap, Row};
use crate::datamodel::{DashboardSpec, LayoutItem};
use crate::filter::{FilterValue, FilterValues, apply_cross_filter, apply_filters};
use crate::layout::LayoutReconciler;
use crate::results::WidgetResult;

/// The output of one interpretation pass, owned by the interpreter for
/// one render cycle and read by the rendering layer.
#[derive(Clone, PartialEq, Debug)]
pub struct Interpretation {
    /// Per-widget results keyed by widget id.  Widgets of unknown kind
    /// have no entry.
    pub results: HashMap<String, WidgetResult>,
    pub layout: Vec<LayoutItem>,
}

/// One dashboard's spec plus all of its runtime state.
#[derive(Clone, PartialEq, Debug)]
pub struct Dashboard {
    spec: DashboardSpec,
    filter_values: FilterValues,
    cross_filter: CrossFilterState,
    reconciler: LayoutReconciler,
    active_tab: usize,
}

impl Dashboard {
    pub fn new(spec: DashboardSpec) -> Dashboard {
        Dashboard {
            spec,
            filter_values: FilterValues::new(),
            cross_filter: CrossFilterState::new(),
            reconciler: LayoutReconciler::new(),
            active_tab: 0,
        }
    }

    /// The spec driving the current view: the active tab's spec, or the
    /// outer spec when the dashboard has no tabs.
    pub fn active_spec(&self) -> &DashboardSpec {
        match self.spec.tabs.get(self.active_tab) {
            Some(tab) => &tab.spec,
            None => &self.spec,
        }
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Switch tabs.  Tabs are fully independent dashboards, so runtime
    /// filter and cross-filter state is reset along with the switch.
    /// Returns false (and changes nothing) for an out-of-range index.
    pub fn set_active_tab(&mut self, index: usize) -> bool {
        let tab_count = self.spec.tabs.len().max(1);
        if index >= tab_count {
            return false;
        }
        if index != self.active_tab {
            self.active_tab = index;
            self.filter_values.clear();
            self.cross_filter.clear();
        }
        true
    }

    pub fn set_filter(&mut self, id: &str, value: FilterValue) {
        self.filter_values.insert(id.to_owned(), value);
    }

    pub fn clear_filter(&mut self, id: &str) {
        self.filter_values.remove(id);
    }

    pub fn filter_values(&self) -> &FilterValues {
        &self.filter_values
    }

    /// Route a widget-click event: toggles the dashboard-wide
    /// cross-filter.
    pub fn toggle_cross_filter(&mut self, field: &str, value: &str) {
        self.cross_filter.toggle(field, value);
    }

    pub fn clear_cross_filter(&mut self) {
        self.cross_filter.clear();
    }

    pub fn cross_filter(&self) -> Option<&CrossFilter> {
        self.cross_filter.active()
    }

    /// Route a drag/resize event from the rendering layer.  Returns true
    /// when the layout actually changed and should be reported upward.
    pub fn apply_layout_edit(&mut self, items: Vec<LayoutItem>) -> bool {
        self.reconciler.apply_edit(items)
    }

    /// Remove a widget from the active spec and its layout item.  Returns
    /// true when this changed the layout.
    pub fn remove_widget(&mut self, id: &str) -> bool {
        let spec = match self.spec.tabs.get_mut(self.active_tab) {
            Some(tab) => &mut tab.spec,
            None => &mut self.spec,
        };
        spec.kpis.retain(|w| w.id != id);
        spec.charts.retain(|w| w.id != id);
        if let Some(layout) = spec.layout.as_mut() {
            layout.retain(|item| item.id != id);
        }
        self.reconciler.remove_widget(id)
    }

    /// One full interpretation pass: declared filters, then the
    /// cross-filter, then per-widget aggregation; layout reconciled from
    /// the spec alone.
    pub fn interpret(&mut self, datasets: &DatasetMap) -> Interpretation {
        let spec = match self.spec.tabs.get(self.active_tab) {
            Some(tab) => &tab.spec,
            None => &self.spec,
        };
        let dataset_name = self
            .spec
            .tabs
            .get(self.active_tab)
            .and_then(|tab| tab.dataset.as_deref());

        let rows: &[Row] = datasets
            .resolve(dataset_name)
            .map(|ds| ds.rows())
            .unwrap_or(&[]);

        let filtered = apply_filters(rows, &spec.filters, &self.filter_values);
        let filtered = apply_cross_filter(filtered, self.cross_filter.active());

        let mut results: HashMap<String, WidgetResult> = HashMap::new();
        for widget in spec.widgets() {
            if let Some(result) = aggregate::evaluate(widget, &filtered) {
                results.insert(widget.id.clone(), result);
            }
        }

        self.reconciler.reconcile(spec);

        Interpretation {
            results,
            layout: self.reconciler.items().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::datamodel::{Aggregation, Tab, WidgetDef, WidgetKind};
    use serde_json::json;

    fn sales_datasets() -> DatasetMap {
        let mut map = DatasetMap::new();
        map.insert(
            "sales",
            Dataset::from_json(json!([
                {"region": "East", "sales": "1,200"},
                {"region": "East", "sales": "800"},
                {"region": "West", "sales": "500"}
            ]))
            .unwrap(),
        );
        map
    }

    fn kpi_spec() -> DashboardSpec {
        let mut kpi = WidgetDef::new("k1", WidgetKind::Kpi);
        kpi.metric = Some("sales".to_owned());
        kpi.aggregation = Aggregation::Sum;
        DashboardSpec {
            kpis: vec![kpi],
            ..Default::default()
        }
    }

    #[test]
    fn interpret_produces_results_and_layout() {
        let mut dash = Dashboard::new(kpi_spec());
        let pass = dash.interpret(&sales_datasets());

        assert_eq!(
            Some(&WidgetResult::Scalar {
                value: Some(2500.0)
            }),
            pass.results.get("k1")
        );
        assert_eq!(1, pass.layout.len());
        assert_eq!("k1", pass.layout[0].id);
    }

    #[test]
    fn cross_filter_toggle_round_trips_results() {
        let mut dash = Dashboard::new(kpi_spec());
        let datasets = sales_datasets();

        dash.toggle_cross_filter("region", "East");
        let pass = dash.interpret(&datasets);
        assert_eq!(
            Some(&WidgetResult::Scalar {
                value: Some(2000.0)
            }),
            pass.results.get("k1")
        );

        dash.toggle_cross_filter("region", "East");
        let pass = dash.interpret(&datasets);
        assert_eq!(
            Some(&WidgetResult::Scalar {
                value: Some(2500.0)
            }),
            pass.results.get("k1")
        );
    }

    #[test]
    fn tabs_switch_specs_and_reset_runtime_state() {
        let mut tab_kpi = WidgetDef::new("t1", WidgetKind::Kpi);
        tab_kpi.metric = Some("sales".to_owned());
        tab_kpi.aggregation = Aggregation::Count;
        let spec = DashboardSpec {
            tabs: vec![
                Tab {
                    label: "Totals".to_owned(),
                    dataset: Some("sales".to_owned()),
                    spec: kpi_spec(),
                },
                Tab {
                    label: "Counts".to_owned(),
                    dataset: Some("sales".to_owned()),
                    spec: DashboardSpec {
                        kpis: vec![tab_kpi],
                        ..Default::default()
                    },
                },
            ],
            ..Default::default()
        };

        let mut dash = Dashboard::new(spec);
        let datasets = sales_datasets();
        dash.toggle_cross_filter("region", "East");

        assert!(dash.set_active_tab(1));
        assert_eq!(None, dash.cross_filter());

        let pass = dash.interpret(&datasets);
        assert_eq!(
            Some(&WidgetResult::Scalar { value: Some(3.0) }),
            pass.results.get("t1")
        );
        assert!(pass.results.get("k1").is_none());

        assert!(!dash.set_active_tab(7));
        assert_eq!(1, dash.active_tab());
    }

    #[test]
    fn missing_dataset_degrades_to_empty_results() {
        let mut dash = Dashboard::new(kpi_spec());
        let pass = dash.interpret(&DatasetMap::new());

        assert_eq!(
            Some(&WidgetResult::Scalar { value: None }),
            pass.results.get("k1")
        );
        // layout is data-independent
        assert_eq!(1, pass.layout.len());
    }

    #[test]
    fn remove_widget_updates_spec_and_layout() {
        let mut spec = kpi_spec();
        spec.charts.push({
            let mut c = WidgetDef::new("c1", WidgetKind::Bar);
            c.dimension = Some("region".to_owned());
            c.metric = Some("sales".to_owned());
            c
        });

        let mut dash = Dashboard::new(spec);
        let datasets = sales_datasets();
        let pass = dash.interpret(&datasets);
        assert_eq!(2, pass.layout.len());

        assert!(dash.remove_widget("c1"));
        let pass = dash.interpret(&datasets);
        assert_eq!(1, pass.layout.len());
        assert!(pass.results.get("c1").is_none());
    }
}
