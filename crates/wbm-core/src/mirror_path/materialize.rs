//! Turns a logical mirror path into real directories under the root.
//!
//! URLs nest freely, files do not: `http://x/a` and later `http://x/a/b`
//! need `a` to be both a file and a directory. The first save wins as a
//! file; when a deeper path arrives the file is moved to `a/index.html`.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::unique::{unique_name, UniqueName, NAME_MAX};
use crate::digest::name_digest;
use crate::url_model::{sanitize_component, split_logical, DEFAULT_LEAF};

/// Directory components longer than this many bytes are replaced by a digest.
pub const COMPONENT_LIMIT: usize = 250;

/// Suffix of the parking name used while converting a file into a directory.
const PARK_SUFFIX: &str = ".wbm-convert";

/// Creates every directory of `logical` under `root` and returns the path
/// the leaf should be written to. The leaf itself is not created.
///
/// Deterministic: the same `root` and `logical` give the same path, and a
/// second call after a file-to-directory conversion is a no-op.
pub fn materialize(root: &Path, logical: &str) -> Result<PathBuf> {
    fs::create_dir_all(root)
        .with_context(|| format!("create destination root {}", root.display()))?;

    let (dirs, leaf) = split_logical(logical, DEFAULT_LEAF);
    let mut cur = root.to_path_buf();
    for component in dirs {
        cur.push(fit_component(&sanitize_component(component)));
        ensure_dir(&cur)?;
    }
    Ok(cur.join(sanitize_component(leaf).as_ref()))
}

/// The path [`materialize`] resolves `logical` to, computed without touching
/// the filesystem. Empty components are dropped here too, so a leading `/`
/// never makes the result absolute.
pub fn target_path(root: &Path, logical: &str) -> PathBuf {
    let (dirs, leaf) = split_logical(logical, DEFAULT_LEAF);
    let mut cur = root.to_path_buf();
    for component in dirs {
        cur.push(fit_component(&sanitize_component(component)));
    }
    cur.join(sanitize_component(leaf).as_ref())
}

/// Shortens a component that would not fit in a directory entry.
pub fn fit_component(component: &str) -> String {
    if component.len() > COMPONENT_LIMIT {
        name_digest(component)
    } else {
        component.to_string()
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    let parked = parked_path(dir);
    match fs::symlink_metadata(dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            create_dir(dir)?;
            if exists(&parked)? {
                // Interrupted after parking the file: put it where it belongs.
                tracing::warn!(dir = %dir.display(), "finishing interrupted file-to-directory conversion");
                adopt_parked(dir, &parked)?;
            }
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("stat {}", dir.display())),
        Ok(_) if dir.is_dir() => {
            if exists(&parked)? {
                tracing::warn!(dir = %dir.display(), "finishing interrupted file-to-directory conversion");
                adopt_parked(dir, &parked)?;
            }
            Ok(())
        }
        Ok(_) => convert_file_to_dir(dir, &parked),
    }
}

/// `dir` is a file: park it, create the directory, move it inside as
/// `index.html`. Every intermediate state is picked up by `ensure_dir`.
///
/// A parked file may already be waiting from an interrupted conversion while
/// a newer capture sits at `dir`. The newer file is then parked under the
/// next free hidden name and adopted first, so it becomes `index.html` and
/// the older one takes the next free index name.
fn convert_file_to_dir(dir: &Path, parked: &Path) -> Result<()> {
    let stale = exists(parked)?;
    let current = if stale {
        match unique_name(parked, false)? {
            UniqueName::Available(p) | UniqueName::AlreadyPresent(p) => p,
        }
    } else {
        parked.to_path_buf()
    };
    fs::rename(dir, &current)
        .with_context(|| format!("rename {} to {}", dir.display(), current.display()))?;
    create_dir(dir)?;
    adopt_parked(dir, &current)?;
    if stale {
        tracing::warn!(dir = %dir.display(), "finishing interrupted file-to-directory conversion");
        adopt_parked(dir, parked)?;
    }
    tracing::debug!(dir = %dir.display(), "converted file into directory");
    Ok(())
}

/// Moves the parked file to `dir/index.html`, or the next free name if an
/// index already exists there.
fn adopt_parked(dir: &Path, parked: &Path) -> Result<()> {
    let target = match unique_name(&dir.join(DEFAULT_LEAF), false)? {
        UniqueName::Available(p) | UniqueName::AlreadyPresent(p) => p,
    };
    fs::rename(parked, &target)
        .with_context(|| format!("rename {} to {}", parked.display(), target.display()))
}

fn create_dir(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("create directory {}", dir.display())),
    }
}

/// Hidden sibling used while `dir` is being converted. Names that would
/// overflow NAME_MAX are parked under their digest.
fn parked_path(dir: &Path) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = if name.len() + 1 + PARK_SUFFIX.len() > NAME_MAX {
        name_digest(&name)
    } else {
        name
    };
    dir.with_file_name(format!(".{}{}", base, PARK_SUFFIX))
}

fn exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("stat {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_dirs_and_returns_leaf() {
        let root = tempfile::tempdir().unwrap();
        let p = materialize(root.path(), "http://x.com/a/b/page.html").unwrap();
        assert_eq!(p, root.path().join("http:/x.com/a/b/page.html"));
        assert!(root.path().join("http:/x.com/a/b").is_dir());
        assert!(!p.exists());
    }

    #[test]
    fn trailing_slash_maps_to_index() {
        let root = tempfile::tempdir().unwrap();
        let p = materialize(root.path(), "http://x.com/docs/").unwrap();
        assert_eq!(p, root.path().join("http:/x.com/docs/index.html"));
    }

    #[test]
    fn deterministic_across_calls() {
        let root = tempfile::tempdir().unwrap();
        let a = materialize(root.path(), "20200101000000/http://x.com/a/b").unwrap();
        let b = materialize(root.path(), "20200101000000/http://x.com/a/b").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn creates_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("fresh/mirror");
        let p = materialize(&root, "http://x.com/").unwrap();
        assert!(root.join("http:/x.com").is_dir());
        assert_eq!(p, root.join("http:/x.com/index.html"));
    }

    #[test]
    fn file_in_the_way_becomes_index() {
        let root = tempfile::tempdir().unwrap();
        let first = materialize(root.path(), "http://x.com/a").unwrap();
        fs::write(&first, b"page a").unwrap();

        let deeper = materialize(root.path(), "http://x.com/a/b").unwrap();
        assert_eq!(deeper, root.path().join("http:/x.com/a/b"));
        assert!(root.path().join("http:/x.com/a").is_dir());
        assert_eq!(
            fs::read(root.path().join("http:/x.com/a/index.html")).unwrap(),
            b"page a"
        );
        assert!(!parked_path(&root.path().join("http:/x.com/a")).exists());

        // Second call must not loop or error.
        let again = materialize(root.path(), "http://x.com/a/b").unwrap();
        assert_eq!(again, deeper);
        assert_eq!(
            fs::read(root.path().join("http:/x.com/a/index.html")).unwrap(),
            b"page a"
        );
    }

    #[test]
    fn long_component_is_digested_deterministically() {
        let root = tempfile::tempdir().unwrap();
        let long = "d".repeat(300);
        let logical = format!("http://x.com/{}/leaf", long);
        let p = materialize(root.path(), &logical).unwrap();
        let expected_dir = root.path().join("http:/x.com").join(name_digest(&long));
        assert_eq!(p, expected_dir.join("leaf"));
        assert!(expected_dir.is_dir());
        assert_eq!(materialize(root.path(), &logical).unwrap(), p);
    }

    #[test]
    fn component_at_limit_is_kept() {
        let exact = "e".repeat(COMPONENT_LIMIT);
        assert_eq!(fit_component(&exact), exact);
        assert_eq!(fit_component(&format!("{}e", exact)).len(), 32);
    }

    #[test]
    fn recovers_when_interrupted_after_parking() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a");
        // State left behind by a crash between the two renames.
        fs::write(parked_path(&dir), b"old a").unwrap();

        let p = materialize(root.path(), "a/b").unwrap();
        assert_eq!(p, dir.join("b"));
        assert_eq!(fs::read(dir.join("index.html")).unwrap(), b"old a");
        assert!(!parked_path(&dir).exists());
    }

    #[test]
    fn recovers_when_interrupted_after_mkdir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a");
        fs::create_dir(&dir).unwrap();
        fs::write(parked_path(&dir), b"old a").unwrap();

        materialize(root.path(), "a/b").unwrap();
        assert_eq!(fs::read(dir.join("index.html")).unwrap(), b"old a");
        assert!(!parked_path(&dir).exists());
    }

    #[test]
    fn recovery_does_not_overwrite_existing_index() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("index.html"), b"current").unwrap();
        fs::write(parked_path(&dir), b"old a").unwrap();

        materialize(root.path(), "a/b").unwrap();
        assert_eq!(fs::read(dir.join("index.html")).unwrap(), b"current");
        assert_eq!(fs::read(dir.join("index-1.html")).unwrap(), b"old a");
    }

    #[test]
    fn parked_name_stays_within_name_max() {
        let dir = Path::new("/m").join("p".repeat(COMPONENT_LIMIT));
        let parked = parked_path(&dir);
        let name = parked.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.len() <= NAME_MAX);
        assert!(name.ends_with(PARK_SUFFIX));
    }

    #[test]
    fn new_file_over_stale_parked_file_keeps_both() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a");
        // Parked by an interrupted run, then a later capture of `a` landed.
        fs::write(parked_path(&dir), b"old a").unwrap();
        fs::write(&dir, b"new a").unwrap();

        let p = materialize(root.path(), "a/b").unwrap();
        assert_eq!(p, dir.join("b"));
        assert!(dir.is_dir());
        assert_eq!(fs::read(dir.join("index.html")).unwrap(), b"new a");
        assert_eq!(fs::read(dir.join("index-1.html")).unwrap(), b"old a");
        assert!(!parked_path(&dir).exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);

        // Nothing left to recover on the next call.
        assert_eq!(materialize(root.path(), "a/c").unwrap(), dir.join("c"));
    }

    #[test]
    fn final_dotdot_lands_on_index_of_parent() {
        let root = tempfile::tempdir().unwrap();
        let p = materialize(root.path(), "http://x.com/a/..").unwrap();
        assert_eq!(p.file_name().unwrap(), "index.html");
        assert_eq!(
            crate::mirror_path::absolute_normalized(&p).unwrap(),
            crate::mirror_path::absolute_normalized(&root.path().join("http:/x.com/index.html"))
                .unwrap()
        );
    }

    #[test]
    fn target_path_matches_materialize() {
        let root = tempfile::tempdir().unwrap();
        let long = "d".repeat(300);
        for logical in [
            "http://x.com/a/b.html".to_string(),
            "/abs/page".to_string(),
            format!("20200101000000/http://x.com/{}/leaf", long),
            "http://x.com/docs/".to_string(),
        ] {
            let planned = target_path(root.path(), &logical);
            assert_eq!(materialize(root.path(), &logical).unwrap(), planned);
            assert!(planned.starts_with(root.path()));
        }
    }
}
