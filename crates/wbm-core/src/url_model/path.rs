//! Logical mirror paths derived from archived URLs.

/// Relative, `/`-separated path under which `original` is mirrored.
///
/// The URL is used as-is, so `https://example.com/a/` becomes the components
/// `https:`, `example.com`, `a` plus a trailing `/` (materialized as
/// `index.html`). With a timestamp the capture time becomes the first
/// component. Nothing is normalized here: `..` segments survive so the
/// sandbox guard can reject them.
pub fn logical_path(original: &str, timestamp: Option<&str>) -> String {
    match timestamp {
        Some(ts) => format!("{}/{}", ts, original),
        None => original.to_string(),
    }
}

/// Splits a logical path into non-empty directory components and the leaf.
/// A trailing `/`, an empty path, or a final `.`/`..` yields `default_leaf`
/// as the leaf; the dot segment stays a directory component.
pub fn split_logical<'a>(logical: &'a str, default_leaf: &'a str) -> (Vec<&'a str>, &'a str) {
    let mut parts: Vec<&str> = logical.split('/').collect();
    let leaf = match parts.pop() {
        Some(last) if !last.is_empty() && last != "." && last != ".." => last,
        Some(last) => {
            parts.push(last);
            default_leaf
        }
        None => default_leaf,
    };
    parts.retain(|p| !p.is_empty());
    (parts, leaf)
}
