//! Linux-safe path component sanitization.

use std::borrow::Cow;

/// Replaces NUL and control characters with `_`.
///
/// Unlike a full filename sanitizer this keeps dots, so `.` and `..`
/// components stay visible to the sandbox guard, and keeps every other
/// character so the mirror layout matches the archived URL.
pub fn sanitize_component(component: &str) -> Cow<'_, str> {
    if !component.chars().any(|c| c == '\0' || c.is_control()) {
        return Cow::Borrowed(component);
    }
    Cow::Owned(
        component
            .chars()
            .map(|c| if c == '\0' || c.is_control() { '_' } else { c })
            .collect(),
    )
}
