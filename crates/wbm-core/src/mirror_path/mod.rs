//! Mapping archived URLs onto a local directory tree.
//!
//! [`materialize`] creates the directories for a logical path, [`unique_name`]
//! picks a leaf that does not overwrite anything, and [`ensure_within`] keeps
//! the result under the destination root.

mod materialize;
mod sandbox;
mod unique;

pub use materialize::{fit_component, materialize, target_path, COMPONENT_LIMIT};
pub use sandbox::{absolute_normalized, ensure_within, SandboxError};
pub use unique::{unique_name, UniqueName, NAME_MAX};
