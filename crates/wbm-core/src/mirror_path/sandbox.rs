//! Keeps every mirrored file inside the destination root.

use std::io;
use std::path::{Component, Path, PathBuf};

/// A computed path would land outside the destination root.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("path {} escapes destination root {}", .path.display(), .root.display())]
    Escape { root: PathBuf, path: PathBuf },
    #[error("cannot resolve current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Succeeds when `candidate`, made absolute and lexically normalized, is
/// `root` itself or nested under it.
pub fn ensure_within(root: &Path, candidate: &Path) -> Result<(), SandboxError> {
    let abs_root = absolute_normalized(root)?;
    let abs_candidate = absolute_normalized(candidate)?;
    if abs_candidate.starts_with(&abs_root) {
        Ok(())
    } else {
        Err(SandboxError::Escape {
            root: abs_root,
            path: abs_candidate,
        })
    }
}

/// Joins relative paths onto the current directory, drops `.` and resolves
/// `..` without touching the filesystem (symlinks are not followed).
pub fn absolute_normalized(path: &Path) -> Result<PathBuf, SandboxError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(SandboxError::CurrentDir)?
            .join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to go above the root, like `abspath`.
                out.pop();
            }
            Component::Normal(name) => out.push(name),
        }
    }
    Ok(out)
}
