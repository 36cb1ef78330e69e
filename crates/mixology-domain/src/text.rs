//! Name normalization for reference entities.
//!
//! Category, glass and ingredient names are stored lower-cased and trimmed,
//! and title-cased only for display.

/// Canonical storage form of a reference name: trimmed, inner whitespace
/// collapsed to single spaces, lower-cased. Returns `None` when nothing is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.to_lowercase())
}

/// Display form: first letter of every word upper-cased, the rest lower-cased.
/// Words are separated by whitespace or hyphens.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = c.is_whitespace() || c == '-';
    }
    out
}
