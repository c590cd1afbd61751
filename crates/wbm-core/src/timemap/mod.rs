//! Timemap listings: which snapshots the archive holds for a URL.
//!
//! Two formats are supported. The link format lists the relations of a single
//! URL (original, timegate, mementos). The JSON format lists every captured
//! URL under a prefix, one row per URL key.

mod json;
mod link;
mod query;

pub use json::{SnapshotRecord, SnapshotRecords};
pub use link::{parse_link_line, parse_link_timemap, LinkRecords, TimemapRecord};
pub use query::{jsonmap_url, link_timemap_url, validate_time_bound, TimeRange};

/// Malformed timemap responses and query inputs.
#[derive(Debug, thiserror::Error)]
pub enum TimemapError {
    #[error("JSON timemap is not an array (found {found})")]
    NotAnArray { found: &'static str },
    #[error("JSON timemap header row must be an array of field names (found {found})")]
    BadHeader { found: &'static str },
    #[error("JSON timemap row {row} is not an array (found {found})")]
    RowNotArray { row: usize, found: &'static str },
    #[error("JSON timemap row {row} has {found} values but the header names {expected} fields")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("archive returned a non-JSON timemap (HTTP {status})")]
    NotJson { status: u32 },
    #[error("invalid time bound {0:?}: expected yyyymmddhhmmss or a prefix of it")]
    BadTimeBound(String),
}
