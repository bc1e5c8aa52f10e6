//! Case conversion for mutator names and generated labels

use once_cell::sync::Lazy;
use regex::Regex;

/// Word separators recognised by `studly`
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_\s]+").expect("valid regex"));

/// Convert a key to StudlyCase
///
/// Examples:
/// - "created_at" → "CreatedAt"
/// - "createdAt" → "CreatedAt"
/// - "first-name" → "FirstName"
pub fn studly(key: &str) -> String {
    SEPARATORS
        .split(key)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

/// Default label text for a field name: underscores become spaces, words capitalized
///
/// "first_name" → "First Name"
pub fn title_from_name(name: &str) -> String {
    name.replace('_', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
