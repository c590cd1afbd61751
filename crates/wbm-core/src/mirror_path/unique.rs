//! Collision-free leaf names for new downloads.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::digest::name_digest;

/// Linux NAME_MAX, in bytes.
pub const NAME_MAX: usize = 255;

/// Longest suffix we may append to a leaf (collision counter plus a sidecar
/// extension); a leaf that cannot take it is replaced by a digest name.
const PROBE_SUFFIX: &str = "-xxxxxxxx.http";

/// Extension given to digest-named leaves.
const DIGEST_EXT: &str = ".md5";

/// Outcome of [`unique_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueName {
    /// Nothing exists at this path yet; safe to write.
    Available(PathBuf),
    /// No-clobber mode and the path is taken; the caller skips the item.
    AlreadyPresent(PathBuf),
}

/// Picks the path to write `path`'s content to.
///
/// Over-long leaves become `<digest>.md5`. An unused path is returned as is.
/// A used path is either reported (`no_clobber`) or moved to the lowest free
/// `<stem>-<n><ext>`.
pub fn unique_name(path: &Path, no_clobber: bool) -> Result<UniqueName> {
    let path = fit_leaf(path);

    if !is_occupied(&path)? {
        return Ok(UniqueName::Available(path));
    }
    if no_clobber {
        return Ok(UniqueName::AlreadyPresent(path));
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let leaf = leaf_str(&path);
    let (stem, ext) = split_ext(&leaf);
    let mut n = 1u64;
    loop {
        let candidate = parent.join(format!("{}-{}{}", stem, n, ext));
        if !is_occupied(&candidate)? {
            return Ok(UniqueName::Available(candidate));
        }
        n += 1;
    }
}

fn fit_leaf(path: &Path) -> PathBuf {
    let leaf = leaf_str(path);
    if leaf.len() + PROBE_SUFFIX.len() <= NAME_MAX && !probe_reports_too_long(path) {
        return path.to_path_buf();
    }
    let short = format!("{}{}", name_digest(&leaf), DIGEST_EXT);
    tracing::debug!(leaf = %leaf, digest = %short, "leaf name too long, using digest");
    path.with_file_name(short)
}

/// Asks the filesystem whether a suffixed sibling would be too long; catches
/// filesystems with a NAME_MAX smaller than Linux's.
#[cfg(unix)]
fn probe_reports_too_long(path: &Path) -> bool {
    let mut probe = path.as_os_str().to_owned();
    probe.push(PROBE_SUFFIX);
    match std::fs::symlink_metadata(&probe) {
        Err(e) => e.raw_os_error() == Some(libc::ENAMETOOLONG),
        Ok(_) => false,
    }
}

#[cfg(not(unix))]
fn probe_reports_too_long(_path: &Path) -> bool {
    false
}

/// A path is taken when anything sits there, including a dangling symlink.
fn is_occupied(path: &Path) -> Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("stat {}", path.display())),
    }
}

fn leaf_str(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Splits `name` into stem and extension at the last dot. Leading dots do
/// not start an extension (`.htaccess` has none).
pub(crate) fn split_ext(name: &str) -> (&str, &str) {
    let body_start = name.len() - name.trim_start_matches('.').len();
    match name[body_start..].rfind('.') {
        Some(i) => name.split_at(body_start + i),
        None => (name, ""),
    }
}
