//! HTML escaping
//!
//! Escapes `& < > " '` but leaves existing character references
//! (`&amp;`, `&#39;`, `&#x27;`, `&nbsp;`) untouched, so values that were
//! already escaped once are never double encoded.

use once_cell::sync::Lazy;
use regex::Regex;

/// A character reference at the start of the haystack
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);").expect("valid regex")
});

/// Escape a string for use in HTML text or a quoted attribute value
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 8);

    for (i, ch) in value.char_indices() {
        match ch {
            '&' if ENTITY.is_match(&value[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#039;b&#039;&lt;/b&gt;");
    }

    #[test]
    fn keeps_existing_entities() {
        assert_eq!(escape("Eggs &amp;&amp; Sausage"), "Eggs &amp;&amp; Sausage");
        assert_eq!(escape("&nbsp;"), "&nbsp;");
        assert_eq!(escape("&#64; &#x40;"), "&#64; &#x40;");
    }

    #[test]
    fn bare_ampersand_is_escaped() {
        assert_eq!(escape("Eggs & Sausage"), "Eggs &amp; Sausage");
        assert_eq!(escape("a&b"), "a&amp;b");
        assert_eq!(escape("&;"), "&amp;;");
    }

    #[test]
    fn query_string_ampersand() {
        assert_eq!(
            escape("https://a.com/b?id=4&not_id=5"),
            "https://a.com/b?id=4&amp;not_id=5"
        );
    }
}
