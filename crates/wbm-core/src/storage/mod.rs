//! File lifecycle for downloaded snapshots.
//!
//! Content is written to a hidden `.<name>.wbm-part` sibling, synced, then
//! renamed onto the final name, so an interrupted download never leaves a
//! truncated file where a later run would mistake it for a complete one.

mod writer;

pub use writer::StorageWriter;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::digest::name_digest;
use crate::mirror_path::NAME_MAX;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".wbm-part";

/// Hidden sibling used while downloading (e.g. `index.html` → `.index.html.wbm-part`).
/// The dot prefix and tool-specific suffix keep it from colliding with a
/// mirrored `*.part` URL.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = if name.len() + 1 + TEMP_SUFFIX.len() > NAME_MAX {
        name_digest(&name)
    } else {
        name
    };
    final_path.with_file_name(format!(".{}{}", base, TEMP_SUFFIX))
}

/// Writes `data` to `final_path` through a synced temp file.
pub fn write_atomically(final_path: &Path, data: &[u8]) -> Result<()> {
    let mut writer = StorageWriter::create(&temp_path(final_path))?;
    writer.write_all(data)?;
    writer.sync()?;
    writer.finalize(final_path)
}
