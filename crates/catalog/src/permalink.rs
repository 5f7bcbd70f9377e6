//! Permalink derivation and validation.

/// Derive a URL-safe permalink from a display name.
///
/// Lowercases, keeps ASCII alphanumerics, and collapses everything else into
/// single dashes: `"Yealink T46G (Refurbished)"` becomes
/// `"yealink-t46g-refurbished"`.
pub fn parameterize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// A stored permalink must be non-empty lowercase kebab: `[a-z0-9-]`.
pub fn is_valid(permalink: &str) -> bool {
    !permalink.is_empty()
        && permalink
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
