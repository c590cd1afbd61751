//! Columnar JSON timemap decoding (`/web/timemap/json`).
//!
//! The response is an array of arrays: the first row names the fields, every
//! later row holds the values in the same positions.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::TimemapError;

/// One captured URL from a JSON timemap. The field set is whatever the
/// response's header row declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SnapshotRecord {
    fields: BTreeMap<String, String>,
}

impl SnapshotRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Capture time, `yyyymmddhhmmss`.
    pub fn timestamp(&self) -> Option<&str> {
        self.get("timestamp")
    }

    /// The URL as originally captured.
    pub fn original(&self) -> Option<&str> {
        self.get("original")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SnapshotRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Lazy decoder over a JSON timemap. Yields one record per data row, in order;
/// a malformed row is yielded as an error and decoding continues with the next.
#[derive(Debug)]
pub struct SnapshotRecords {
    header: Vec<String>,
    rows: std::vec::IntoIter<Value>,
    row_index: usize,
}

impl SnapshotRecords {
    /// Validates the outer shape and the header row. An empty array decodes
    /// to an empty sequence.
    pub fn decode(value: Value) -> Result<Self, TimemapError> {
        let rows = match value {
            Value::Array(rows) => rows,
            other => {
                return Err(TimemapError::NotAnArray {
                    found: json_kind(&other),
                })
            }
        };
        let mut rows = rows.into_iter();
        let header = match rows.next() {
            None => Vec::new(),
            Some(Value::Array(names)) => names
                .into_iter()
                .map(|n| match n {
                    Value::String(s) => Ok(s),
                    other => Err(TimemapError::BadHeader {
                        found: json_kind(&other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(TimemapError::BadHeader {
                    found: json_kind(&other),
                })
            }
        };
        Ok(Self {
            header,
            rows,
            row_index: 0,
        })
    }

    /// Field names from the header row.
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl Iterator for SnapshotRecords {
    type Item = Result<SnapshotRecord, TimemapError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.row_index += 1;
        let values = match row {
            Value::Array(values) => values,
            other => {
                return Some(Err(TimemapError::RowNotArray {
                    row: self.row_index,
                    found: json_kind(&other),
                }))
            }
        };
        if values.len() != self.header.len() {
            return Some(Err(TimemapError::RowLength {
                row: self.row_index,
                expected: self.header.len(),
                found: values.len(),
            }));
        }
        Some(Ok(self
            .header
            .iter()
            .cloned()
            .zip(values.into_iter().map(scalar_text))
            .collect()))
    }
}

fn scalar_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
