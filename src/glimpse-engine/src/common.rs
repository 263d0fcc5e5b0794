// Copyright 2026 The Glimpse Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::{error, fmt, result};

use serde_json::Value;

use crate::dataset::Row;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    JsonDeserialization,
    CsvDeserialization,
    BadSpec,
    BadDataset,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            JsonDeserialization => "json_deserialization",
            CsvDeserialization => "csv_deserialization",
            BadSpec => "bad_spec",
            BadDataset => "bad_dataset",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Spec,
    Dataset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Spec => "SpecError",
            ErrorKind::Dataset => "DatasetError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! spec_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Spec, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Spec, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! dataset_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Dataset, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Dataset, ErrorCode::$code, None))
    }};
}

/// Resolve a spec-declared field name against a row's actual keys.
///
/// Specs are written by hand and datasets come from arbitrary uploads, so a
/// declared field often differs in letter-casing from the dataset's column
/// name.  Exact match wins; otherwise the first case-insensitive match is
/// taken.  Returns the row's own key so callers can index with it directly.
pub fn resolve_field<'a>(row: &'a Row, name: &str) -> Option<&'a str> {
    row.keys()
        .find(|k| k.as_str() == name)
        .or_else(|| row.keys().find(|k| k.eq_ignore_ascii_case(name)))
        .map(|k| k.as_str())
}

/// Resolve a field name and return the row's value for it, if any.
pub fn resolve_value<'a>(row: &'a Row, name: &str) -> Option<&'a Value> {
    resolve_field(row, name).and_then(|k| row.get(k))
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Dataset,
        ErrorCode::BadDataset,
        Some("expected an array".to_owned()),
    );
    assert_eq!("DatasetError{bad_dataset: expected an array}", err.to_string());

    let err = Error::new(ErrorKind::Spec, ErrorCode::JsonDeserialization, None);
    assert_eq!("SpecError{json_deserialization}", err.to_string());
}

#[test]
fn test_resolve_field() {
    let row: Row = serde_json::from_str(r#"{"Region": "East", "sales": 12}"#).unwrap();

    assert_eq!(Some("Region"), resolve_field(&row, "Region"));
    assert_eq!(Some("Region"), resolve_field(&row, "region"));
    assert_eq!(Some("Region"), resolve_field(&row, "REGION"));
    assert_eq!(Some("sales"), resolve_field(&row, "Sales"));
    assert_eq!(None, resolve_field(&row, "profit"));
}

#[test]
fn test_resolve_field_prefers_exact_match() {
    let row: Row = serde_json::from_str(r#"{"date": 1, "Date": 2}"#).unwrap();

    assert_eq!(Some("Date"), resolve_field(&row, "Date"));
    assert_eq!(Some("date"), resolve_field(&row, "date"));
}

#[test]
fn test_resolve_value() {
    let row: Row = serde_json::from_str(r#"{"Region": "East"}"#).unwrap();

    assert_eq!(Some(&Value::String("East".to_owned())), resolve_value(&row, "region"));
    assert_eq!(None, resolve_value(&row, "missing"));
}
