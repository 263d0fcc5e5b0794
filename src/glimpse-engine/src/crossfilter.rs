// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The single transient cross-filter set by clicking a rendered data point.
//!
//! Dashboard-wide on purpose: clicking any widget filters every other
//! widget simultaneously, which is the defining interactive feature of
//! the product.  At most one `{field, value}` pair is active; it is never
//! persisted.

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CrossFilter {
    pub field: String,
    pub value: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CrossFilterState {
    active: Option<CrossFilter>,
}

impl CrossFilterState {
    pub fn new() -> CrossFilterState {
        Default::default()
    }

    /// Toggle the cross-filter: clicking the already-selected value clears
    /// it, clicking anything else replaces it.
    pub fn toggle(&mut self, field: &str, value: &str) {
        let same = self
            .active
            .as_ref()
            .is_some_and(|cf| cf.field == field && cf.value == value);
        if same {
            self.active = None;
        } else {
            self.active = Some(CrossFilter {
                field: field.to_owned(),
                value: value.to_owned(),
            });
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&CrossFilter> {
        self.active.as_ref()
    }
}

#[test]
fn test_toggle_same_value_clears() {
    let mut state = CrossFilterState::new();
    assert_eq!(None, state.active());

    state.toggle("region", "East");
    assert_eq!("East", state.active().unwrap().value);

    state.toggle("region", "East");
    assert_eq!(None, state.active());
}

#[test]
fn test_toggle_different_value_replaces() {
    let mut state = CrossFilterState::new();
    state.toggle("region", "East");
    state.toggle("region", "West");

    let active = state.active().unwrap();
    assert_eq!("region", active.field);
    assert_eq!("West", active.value);

    state.toggle("category", "West");
    assert_eq!("category", state.active().unwrap().field);
}

#[test]
fn test_clear() {
    let mut state = CrossFilterState::new();
    state.toggle("region", "East");
    state.clear();
    assert_eq!(None, state.active());

    // clearing an empty state is a no-op
    state.clear();
    assert_eq!(None, state.active());
}
