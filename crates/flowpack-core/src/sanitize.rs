//! Container and image name normalization.
//!
//! Container runtimes accept identifiers made of ASCII letters, digits,
//! `_`, `.` and `-`, starting with an alphanumeric. Image repositories must
//! additionally be lower-case. [`sanitize_name`] maps any user string into
//! the intersection of both rules.

const REPLACEMENT: char = '_';

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Normalize a user-supplied name into a runtime identifier.
///
/// Disallowed characters become `_`, letters are lower-cased, and leading
/// separators are dropped. Idempotent.
///
/// # Examples
///
/// ```
/// use flowpack_core::sanitize_name;
///
/// assert_eq!(sanitize_name("My Flow: v2"), "my_flow__v2");
/// assert_eq!(sanitize_name("__hidden"), "hidden");
/// assert_eq!(sanitize_name(&sanitize_name("Ä b")), sanitize_name("Ä b"));
/// ```
pub fn sanitize_name(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| {
            if is_allowed(c) {
                c.to_ascii_lowercase()
            } else {
                REPLACEMENT
            }
        })
        .collect();

    mapped
        .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_owned()
}

/// Whether `name` is already in sanitized form.
pub fn is_sanitized(name: &str) -> bool {
    sanitize_name(name) == name
}
