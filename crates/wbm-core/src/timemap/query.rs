//! JSON timemap query construction.

use anyhow::{Context, Result};

use super::TimemapError;

/// Fixed query parameters: prefix match, one row per URL key, JSON output,
/// and no redirects or error captures.
const FIXED_PARAMS: [(&str, &str); 4] = [
    ("matchType", "prefix"),
    ("collapse", "urlkey"),
    ("output", "json"),
    ("filter", "!statuscode:[345].."),
];

/// Optional capture-time window for a JSON timemap query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<String>,
    pub until: Option<String>,
}

impl TimeRange {
    /// Validates both bounds (see [`validate_time_bound`]).
    pub fn new(from: Option<&str>, until: Option<&str>) -> Result<Self, TimemapError> {
        Ok(Self {
            from: from.map(validate_time_bound).transpose()?,
            until: until.map(validate_time_bound).transpose()?,
        })
    }
}

/// A time bound is `yyyymmddhhmmss` or any non-empty prefix of it.
pub fn validate_time_bound(bound: &str) -> Result<String, TimemapError> {
    let bound = bound.trim();
    if bound.is_empty() || bound.len() > 14 || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimemapError::BadTimeBound(bound.to_string()));
    }
    Ok(bound.to_string())
}

/// Builds `<base>/web/timemap/json?url=...` for `target`.
pub fn jsonmap_url(base_url: &str, target: &str, range: &TimeRange) -> Result<String> {
    let endpoint = format!("{}/web/timemap/json", base_url.trim_end_matches('/'));
    let mut url = url::Url::parse(&endpoint)
        .with_context(|| format!("invalid archive base URL: {}", base_url))?;
    {
        let mut q = url.query_pairs_mut();
        q.append_pair("url", target);
        for (k, v) in FIXED_PARAMS {
            q.append_pair(k, v);
        }
        if let Some(from) = &range.from {
            q.append_pair("from", from);
        }
        if let Some(until) = &range.until {
            q.append_pair("to", until);
        }
    }
    Ok(url.into())
}

/// Builds `<base>/web/timemap/link/<target>`. The target is appended verbatim,
/// as the archive expects.
pub fn link_timemap_url(base_url: &str, target: &str) -> String {
    format!("{}/web/timemap/link/{}", base_url.trim_end_matches('/'), target)
}
