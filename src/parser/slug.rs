//! Term identifier normalization.
//!
//! Turns a display term such as `**Deck**, Ground Level` into the
//! identifier `Deck_Ground_Level`. The same identifier is embedded in image
//! filenames, so the function must stay stable across releases.

/// Emphasis delimiters removed from terms.
pub const EMPHASIS_MARKERS: [&str; 2] = ["**", "__"];

/// Remove bold/italic delimiters anywhere in the string.
pub fn strip_emphasis(text: &str) -> String {
    let mut result = text.to_string();
    for marker in EMPHASIS_MARKERS {
        result = result.replace(marker, "");
    }
    result
}

/// Normalize a raw term into its identifier.
///
/// Emphasis markers are removed, the result is trimmed, every character
/// that is not a word character, whitespace or `-` is dropped, and each run
/// of whitespace becomes a single `_`. Runs of underscores are collapsed so
/// the output never contains a `__` marker, which keeps the function
/// idempotent.
pub fn normalize(term: &str) -> String {
    let stripped = strip_emphasis(term);
    let cleaned: String = stripped
        .trim()
        .chars()
        .filter(|c| is_slug_char(*c))
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    let mut in_separator = false;
    for c in cleaned.trim().chars() {
        if c.is_whitespace() || c == '_' {
            if !in_separator {
                slug.push('_');
                in_separator = true;
            }
        } else {
            slug.push(c);
            in_separator = false;
        }
    }
    slug
}

fn is_slug_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace()
}
