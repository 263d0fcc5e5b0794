// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The internal representation of a dashboard specification.
//!
//! These types are deliberately serde-free; the wire format lives in
//! `json.rs` and converts into this model.  A spec describes filters,
//! widgets (KPIs and charts), an optional explicit layout, and optional
//! tabs, each of which is a fully independent spec sharing only the outer
//! dataset map.

/// How a declared filter narrows the row set.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FilterKind {
    TimeRange,
    Select,
    Checkbox,
    NumberRange,
    /// A filter type this engine doesn't recognize; its predicate is a
    /// no-op so the rest of the dashboard keeps working.
    Unknown(String),
}

impl FilterKind {
    pub fn from_name(name: &str) -> FilterKind {
        match name {
            "time_range" => FilterKind::TimeRange,
            "select" => FilterKind::Select,
            "checkbox" => FilterKind::Checkbox,
            "number_range" => FilterKind::NumberRange,
            other => FilterKind::Unknown(other.to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FilterKind::TimeRange => "time_range",
            FilterKind::Select => "select",
            FilterKind::Checkbox => "checkbox",
            FilterKind::NumberRange => "number_range",
            FilterKind::Unknown(name) => name.as_str(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FilterDef {
    pub id: String,
    pub field: String,
    pub kind: FilterKind,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

/// The default Aggregation is Sum
impl Default for Aggregation {
    fn default() -> Self {
        Aggregation::Sum
    }
}

impl Aggregation {
    pub fn from_name(name: &str) -> Aggregation {
        match name {
            "avg" => Aggregation::Avg,
            "count" => Aggregation::Count,
            "min" => Aggregation::Min,
            "max" => Aggregation::Max,
            _ => Aggregation::Sum,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
            Aggregation::Count => "count",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    /// How many groups a ranked breakdown keeps when the widget doesn't
    /// say.  Counts tend to have long tails (30); value rankings stay
    /// short (10).  Widgets override this via `WidgetDef::limit`.
    pub fn default_limit(&self) -> usize {
        match self {
            Aggregation::Count => 30,
            _ => 10,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum WidgetKind {
    Kpi,
    Bar,
    Pie,
    StackedBar,
    Line,
    Area,
    Scatter,
    Table,
    /// Preserved verbatim so the rendering layer can show a "type not
    /// supported" placeholder; the aggregation engine produces no result.
    Unknown(String),
}

impl WidgetKind {
    pub fn from_name(name: &str) -> WidgetKind {
        match name {
            "kpi" => WidgetKind::Kpi,
            "bar" => WidgetKind::Bar,
            "pie" => WidgetKind::Pie,
            "stacked_bar" => WidgetKind::StackedBar,
            "line" => WidgetKind::Line,
            "area" => WidgetKind::Area,
            "scatter" => WidgetKind::Scatter,
            "table" => WidgetKind::Table,
            other => WidgetKind::Unknown(other.to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            WidgetKind::Kpi => "kpi",
            WidgetKind::Bar => "bar",
            WidgetKind::Pie => "pie",
            WidgetKind::StackedBar => "stacked_bar",
            WidgetKind::Line => "line",
            WidgetKind::Area => "area",
            WidgetKind::Scatter => "scatter",
            WidgetKind::Table => "table",
            WidgetKind::Unknown(name) => name.as_str(),
        }
    }
}

/// One KPI or chart entry in a spec.  Which fields are meaningful depends
/// on the kind: KPIs use `metric` + `aggregation`; breakdowns add
/// `dimension` (and optionally `stack_field`/`detail_field`); series use
/// `x_field`/`y_field` falling back to `dimension`/`metric`; scatter
/// requires both axis fields.
#[derive(Clone, PartialEq, Debug)]
pub struct WidgetDef {
    pub id: String,
    pub kind: WidgetKind,
    pub label: String,
    pub dimension: Option<String>,
    pub metric: Option<String>,
    pub stack_field: Option<String>,
    pub detail_field: Option<String>,
    pub x_field: Option<String>,
    pub y_field: Option<String>,
    pub aggregation: Aggregation,
    pub limit: Option<usize>,
    /// An explicit allow-list of category keys.  Mutually exclusive with
    /// top-N truncation: when present the breakdown contains exactly these
    /// keys, in this order.
    pub category_filter: Option<Vec<String>>,
}

impl WidgetDef {
    pub fn new(id: &str, kind: WidgetKind) -> Self {
        WidgetDef {
            id: id.to_owned(),
            kind,
            label: String::new(),
            dimension: None,
            metric: None,
            stack_field: None,
            detail_field: None,
            x_field: None,
            y_field: None,
            aggregation: Default::default(),
            limit: None,
            category_filter: None,
        }
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or_else(|| self.aggregation.default_limit())
    }
}

/// A widget's grid position and span.  `x + w <= grid columns` is not
/// enforced here; the consumer's placement algorithm owns overlap
/// resolution.
#[derive(Clone, PartialEq, Debug)]
pub struct LayoutItem {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Tab {
    pub label: String,
    /// Name of the dataset this tab reads, resolved against the outer
    /// dataset map; `None` means the default dataset.
    pub dataset: Option<String>,
    pub spec: DashboardSpec,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct DashboardSpec {
    pub filters: Vec<FilterDef>,
    pub kpis: Vec<WidgetDef>,
    pub charts: Vec<WidgetDef>,
    /// `None` when the document supplied no layout, or supplied one that
    /// failed structural validation and was discarded wholesale.
    pub layout: Option<Vec<LayoutItem>>,
    pub tabs: Vec<Tab>,
}

impl DashboardSpec {
    /// All widgets (KPIs then charts) in spec order.
    pub fn widgets(&self) -> impl Iterator<Item = &WidgetDef> {
        self.kpis.iter().chain(self.charts.iter())
    }

    pub fn widget_ids(&self) -> Vec<&str> {
        self.widgets().map(|w| w.id.as_str()).collect()
    }

    pub fn get_widget(&self, id: &str) -> Option<&WidgetDef> {
        self.widgets().find(|w| w.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        assert_eq!(10, Aggregation::Sum.default_limit());
        assert_eq!(10, Aggregation::Avg.default_limit());
        assert_eq!(10, Aggregation::Min.default_limit());
        assert_eq!(30, Aggregation::Count.default_limit());

        let mut w = WidgetDef::new("w1", WidgetKind::Bar);
        w.aggregation = Aggregation::Count;
        assert_eq!(30, w.effective_limit());
        w.limit = Some(5);
        assert_eq!(5, w.effective_limit());
    }

    #[test]
    fn widget_kind_round_trips_names() {
        for name in ["kpi", "bar", "pie", "stacked_bar", "line", "area", "scatter", "table"] {
            assert_eq!(name, WidgetKind::from_name(name).name());
        }
        assert_eq!(
            WidgetKind::Unknown("gauge".to_owned()),
            WidgetKind::from_name("gauge")
        );
    }

    #[test]
    fn widget_ids_covers_kpis_and_charts_in_order() {
        let spec = DashboardSpec {
            kpis: vec![WidgetDef::new("k1", WidgetKind::Kpi)],
            charts: vec![
                WidgetDef::new("c1", WidgetKind::Bar),
                WidgetDef::new("c2", WidgetKind::Line),
            ],
            ..Default::default()
        };
        assert_eq!(vec!["k1", "c1", "c2"], spec.widget_ids());
        assert!(spec.get_widget("c2").is_some());
        assert!(spec.get_widget("nope").is_none());
    }
}
