//! URL modeling: snapshot URL rewriting and mirror path derivation.

mod path;
mod sanitize;
mod snapshot;

pub use path::{logical_path, split_logical};
pub use sanitize::sanitize_component;
pub use snapshot::{snapshot_url, to_original_snapshot, ORIGINAL_MODIFIER};

/// Leaf name used for URLs ending in `/` and for files displaced by a directory.
pub const DEFAULT_LEAF: &str = "index.html";
