// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Datasets: ordered sequences of flat rows.
//!
//! A row is an open map of field name to JSON value (string, number, or
//! null); the engine never mutates rows, and one interpretation pass
//! treats the dataset as frozen.  Multi-tab dashboards read from a named
//! dataset map.

use std::collections::HashMap;

use serde_json::Value;

use crate::common::Result;
use crate::dataset_err;

pub type Row = serde_json::Map<String, Value>;

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Dataset {
        Dataset { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a dataset from a JSON array of objects.  Non-object entries
    /// are skipped: a few garbage rows shouldn't take down the dashboard.
    pub fn from_json(value: Value) -> Result<Dataset> {
        let Value::Array(entries) = value else {
            return dataset_err!(BadDataset, "expected a JSON array of row objects".to_owned());
        };

        let rows = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect();

        Ok(Dataset { rows })
    }

    /// Build a dataset from JSON text.  Like spec parsing, this is an
    /// error boundary: malformed text is an error here, and everything
    /// past it degrades gracefully.
    pub fn from_json_str(s: &str) -> Result<Dataset> {
        match serde_json::from_str(s) {
            Ok(value) => Dataset::from_json(value),
            Err(err) => dataset_err!(JsonDeserialization, err.to_string()),
        }
    }

    /// Load a dataset from CSV.  Every cell comes in as a string; value
    /// coercion downstream decides what is numeric or date-like.
    #[cfg(feature = "file_io")]
    pub fn from_csv<R: std::io::Read>(reader: R) -> Result<Dataset> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = match rdr.headers() {
            Ok(headers) => headers.clone(),
            Err(err) => return dataset_err!(CsvDeserialization, err.to_string()),
        };

        let mut rows: Vec<Row> = Vec::new();
        for record in rdr.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) => return dataset_err!(CsvDeserialization, err.to_string()),
            };
            let mut row = Row::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                row.insert(header.to_owned(), Value::String(cell.to_owned()));
            }
            rows.push(row);
        }

        Ok(Dataset { rows })
    }
}

/// The named datasets one dashboard (and its tabs) can read.  The first
/// dataset inserted becomes the default unless overridden.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DatasetMap {
    datasets: HashMap<String, Dataset>,
    default_name: Option<String>,
}

impl DatasetMap {
    pub fn new() -> DatasetMap {
        Default::default()
    }

    pub fn insert(&mut self, name: &str, dataset: Dataset) {
        if self.default_name.is_none() {
            self.default_name = Some(name.to_owned());
        }
        self.datasets.insert(name.to_owned(), dataset);
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    pub fn default_dataset(&self) -> Option<&Dataset> {
        self.default_name
            .as_deref()
            .and_then(|name| self.datasets.get(name))
    }

    pub fn set_default(&mut self, name: &str) -> bool {
        if self.datasets.contains_key(name) {
            self.default_name = Some(name.to_owned());
            true
        } else {
            false
        }
    }

    /// Resolve a tab's dataset reference: a named dataset if the name is
    /// known, the default otherwise.
    pub fn resolve(&self, name: Option<&str>) -> Option<&Dataset> {
        match name {
            Some(name) => self.get(name).or_else(|| self.default_dataset()),
            None => self.default_dataset(),
        }
    }
}
