//! Snapshot URL construction and rewriting.

/// Replay modifier that makes the archive serve the original bytes, without
/// its toolbar or link rewriting.
pub const ORIGINAL_MODIFIER: &str = "id_";

/// `<base>/web/<timestamp>id_/<original>`.
pub fn snapshot_url(base_url: &str, timestamp: &str, original: &str) -> String {
    format!(
        "{}/web/{}{}/{}",
        base_url.trim_end_matches('/'),
        timestamp,
        ORIGINAL_MODIFIER,
        original
    )
}

/// Rewrites the first `web/<digits>/` segment of a snapshot URL to
/// `web/<digits>id_/`. URLs that already carry a modifier after the
/// timestamp, or have no timestamp segment, are returned unchanged.
pub fn to_original_snapshot(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut search = 0;
    while let Some(found) = url[search..].find("web/") {
        let start = search + found;
        let at_boundary = start == 0 || bytes[start - 1] == b'/';
        let digits_start = start + "web/".len();
        let digits_end = digits_start
            + bytes[digits_start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
        if at_boundary && digits_end > digits_start {
            if bytes.get(digits_end) == Some(&b'/') {
                let mut out = String::with_capacity(url.len() + ORIGINAL_MODIFIER.len());
                out.push_str(&url[..digits_end]);
                out.push_str(ORIGINAL_MODIFIER);
                out.push_str(&url[digits_end..]);
                return out;
            }
            return url.to_string();
        }
        search = digits_start;
    }
    url.to_string()
}
