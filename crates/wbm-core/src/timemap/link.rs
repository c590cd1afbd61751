//! Link-format timemap parsing (`/web/timemap/link/<url>`).

/// One relation line of a link-format timemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimemapRecord {
    /// `rel` value, e.g. `original`, `timegate`, `self`, `memento`, `first memento`.
    pub relation: String,
    /// URL between the angle brackets.
    pub target: String,
    /// `datetime` attribute when it directly follows `rel` (mementos only).
    pub datetime: Option<String>,
}

impl TimemapRecord {
    /// True for every memento flavour (`memento`, `first memento`, `last memento`, ...).
    pub fn is_memento(&self) -> bool {
        self.relation.contains("memento")
    }
}

/// Lazy iterator over the records of a link-format body. Lines that do not
/// look like `<URL>; rel="REL"[; datetime="DT"]` are skipped.
#[derive(Debug, Clone)]
pub struct LinkRecords {
    body: String,
    pos: usize,
}

impl LinkRecords {
    pub fn new(body: String) -> Self {
        Self { body, pos: 0 }
    }

    /// Decodes `bytes` lossily; the archive sends UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Iterator for LinkRecords {
    type Item = TimemapRecord;

    fn next(&mut self) -> Option<TimemapRecord> {
        while self.pos < self.body.len() {
            let rest = &self.body[self.pos..];
            let (line, advance) = match rest.find('\n') {
                Some(i) => (&rest[..i], i + 1),
                None => (rest, rest.len()),
            };
            self.pos += advance;
            if let Some(record) = parse_link_line(line) {
                return Some(record);
            }
        }
        None
    }
}

/// Parses a whole body eagerly. Convenience for callers holding the bytes.
pub fn parse_link_timemap(body: &str) -> LinkRecords {
    LinkRecords::new(body.to_string())
}

/// Parses one directive line. Anchored at the start of the line; trailing
/// attributes after `rel`/`datetime` are ignored.
pub fn parse_link_line(line: &str) -> Option<TimemapRecord> {
    const REL: &str = "; rel=\"";
    const DATETIME: &str = "; datetime=\"";

    let rest = line.strip_prefix('<')?;
    let close = rest.find(&format!(">{}", REL))?;
    let target = &rest[..close];
    let rest = &rest[close + 1 + REL.len()..];

    let end = rest.find('"')?;
    let relation = &rest[..end];
    let rest = &rest[end + 1..];

    let datetime = rest
        .strip_prefix(DATETIME)
        .and_then(|r| r.find('"').map(|e| r[..e].to_string()));

    Some(TimemapRecord {
        relation: relation.to_string(),
        target: target.to_string(),
        datetime,
    })
}
