//! Canonical forms for name comparison.

use crate::Name;

/// Lowercase `raw` and strip every space and hyphen.
///
/// Names are only ever compared in this form.
///
/// # Examples
/// ```
/// use poimatch_core::normalize;
///
/// assert_eq!(normalize("O Park -Name"), "oparkname");
/// assert_eq!(normalize("Lion's Head"), "lion'shead");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-'))
        .collect()
}

/// Normalise the value of a [`Name`].
#[must_use]
pub fn normalize_name(name: &Name) -> String {
    normalize(&name.value)
}
