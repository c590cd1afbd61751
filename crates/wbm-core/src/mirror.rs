//! Mirror driver: walks a JSON timemap and saves every capture under a
//! destination root, one request at a time.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{ArchiveClient, HttpResponse, Transport};
use crate::mirror_path::{ensure_within, materialize, target_path, unique_name, UniqueName};
use crate::storage;
use crate::timemap::{SnapshotRecord, TimeRange, TimemapRecord};
use crate::url_model::logical_path;

/// How captures are laid out and when existing files are left alone.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Destination root; everything is written below it.
    pub root: PathBuf,
    /// Put the capture timestamp in front of the URL path.
    pub with_time: bool,
    /// Skip captures whose path already exists instead of suffixing.
    pub no_clobber: bool,
    /// Pause after every download.
    pub interval: Duration,
}

/// Where a capture will go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Planned {
    /// Download `url` into `path` (which does not exist yet).
    Write { url: String, path: PathBuf },
    /// No-clobber and `path` is already there.
    Skip { path: PathBuf },
}

/// Progress notifications for the caller to display.
#[derive(Debug)]
pub enum MirrorEvent<'a> {
    Saving {
        timestamp: &'a str,
        original: &'a str,
        path: &'a Path,
    },
    Saved {
        path: &'a Path,
        status: u32,
        bytes: usize,
    },
    AlreadyPresent {
        original: &'a str,
        path: &'a Path,
    },
}

/// Counts for one mirror run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    pub saved: usize,
    pub skipped: usize,
    /// Saved captures whose fetch came back with a non-2xx status.
    pub http_errors: usize,
}

pub struct Mirror<'a, T> {
    client: &'a ArchiveClient<T>,
    options: MirrorOptions,
}

impl<'a, T: Transport> Mirror<'a, T> {
    pub fn new(client: &'a ArchiveClient<T>, options: MirrorOptions) -> Self {
        Self { client, options }
    }

    /// Mirrors every capture under the `url` prefix. Stops at the first
    /// error; a sandbox escape is always such an error.
    pub fn run<F>(&self, url: &str, range: &TimeRange, mut on_event: F) -> Result<MirrorSummary>
    where
        F: FnMut(MirrorEvent<'_>),
    {
        let mut summary = MirrorSummary::default();
        for record in self.client.jsonmap(url, range)? {
            let record = record?;
            self.mirror_record(&record, &mut summary, &mut on_event)?;
        }
        tracing::info!(
            saved = summary.saved,
            skipped = summary.skipped,
            http_errors = summary.http_errors,
            "mirror of {} finished",
            url
        );
        Ok(summary)
    }

    fn mirror_record<F>(
        &self,
        record: &SnapshotRecord,
        summary: &mut MirrorSummary,
        on_event: &mut F,
    ) -> Result<()>
    where
        F: FnMut(MirrorEvent<'_>),
    {
        let (timestamp, original) = capture_of(record)?;
        match self.plan(record)? {
            Planned::Skip { path } => {
                tracing::info!(path = %path.display(), "{} already there", original);
                on_event(MirrorEvent::AlreadyPresent {
                    original,
                    path: &path,
                });
                summary.skipped += 1;
            }
            Planned::Write { url, path } => {
                on_event(MirrorEvent::Saving {
                    timestamp,
                    original,
                    path: &path,
                });
                let response = self.save(&url, &path)?;
                if !response.is_success() {
                    summary.http_errors += 1;
                }
                on_event(MirrorEvent::Saved {
                    path: &path,
                    status: response.status,
                    bytes: response.body.len(),
                });
                summary.saved += 1;
                self.pause();
            }
        }
        Ok(())
    }

    /// Resolves the local path for a capture, creating its directories.
    /// The path `materialize` will use is checked against the root before
    /// anything is created, and the final path again after collision handling.
    pub fn plan(&self, record: &SnapshotRecord) -> Result<Planned> {
        let (timestamp, original) = capture_of(record)?;
        let root = &self.options.root;
        let logical = logical_path(original, self.options.with_time.then_some(timestamp));

        ensure_within(root, &target_path(root, &logical))?;
        let path = materialize(root, &logical)
            .with_context(|| format!("prepare directories for {}", original))?;

        match unique_name(&path, self.options.no_clobber)? {
            UniqueName::AlreadyPresent(path) => Ok(Planned::Skip { path }),
            UniqueName::Available(path) => {
                ensure_within(root, &path)?;
                Ok(Planned::Write {
                    url: self.client.snapshot_url(timestamp, original),
                    path,
                })
            }
        }
    }

    /// Fetches `url` and writes the body to `path`. Error pages are saved
    /// too; the status is returned for the caller to inspect.
    fn save(&self, url: &str, path: &Path) -> Result<HttpResponse> {
        let response = self.client.get(url)?;
        if !response.is_success() {
            tracing::warn!(status = response.status, path = %path.display(), "saving error response for {}", url);
        }
        storage::write_atomically(path, &response.body)
            .with_context(|| format!("save {}", path.display()))?;
        Ok(response)
    }

    fn pause(&self) {
        if !self.options.interval.is_zero() {
            std::thread::sleep(self.options.interval);
        }
    }
}

fn capture_of(record: &SnapshotRecord) -> Result<(&str, &str)> {
    let timestamp = record
        .timestamp()
        .context("timemap record has no `timestamp` field")?;
    let original = record
        .original()
        .context("timemap record has no `original` field")?;
    Ok((timestamp, original))
}

/// Fetches every memento listed in the link timemap of `url`, handing each
/// body to `each`, pausing `interval` after every fetch. Returns the count.
pub fn fetch_mementos<T, F>(
    client: &ArchiveClient<T>,
    url: &str,
    interval: Duration,
    mut each: F,
) -> Result<usize>
where
    T: Transport,
    F: FnMut(&TimemapRecord, HttpResponse) -> Result<()>,
{
    let mut count = 0;
    for record in client.timemap(url)?.filter(TimemapRecord::is_memento) {
        let response = client.get(&record.target)?;
        each(&record, response)?;
        count += 1;
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }
    Ok(count)
}
