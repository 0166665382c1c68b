//! Text helpers for SVG output.
//!
//! Names, prefixes and locations come straight from Azure API responses and
//! are escaped before they reach markup.

use std::borrow::Cow;

/// Escape `& < > " '` for use in XML text and attribute values.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// # Examples
/// ```
/// use azure_topology_diagram::diagram::escape_xml;
/// assert_eq!(escape_xml("a<b"), "a&lt;b");
/// assert_eq!(escape_xml("plain"), "plain");
/// ```
pub fn escape_xml(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(['&', '<', '>', '"', '\'']) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 16);
    out.push_str(&input[..first]);
    for ch in input[first..].chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Cut `input` to at most `max_chars` characters, marking the cut with a single `…`.
pub fn truncate_label(input: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 {
        return Cow::Borrowed("");
    }
    match input.char_indices().nth(max_chars) {
        None => Cow::Borrowed(input),
        Some(_) => {
            let keep: String = input.chars().take(max_chars - 1).collect();
            Cow::Owned(format!("{keep}…"))
        }
    }
}

/// Truncate then escape, the order every label goes through.
pub fn label(input: &str, max_chars: usize) -> String {
    escape_xml(&truncate_label(input, max_chars)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml_all_specials() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&apos;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_xml_borrows_clean_input() {
        assert!(matches!(escape_xml("vnet-hub-01"), Cow::Borrowed(_)));
        assert!(matches!(escape_xml(""), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_xml_keeps_unicode() {
        assert_eq!(escape_xml("réseau & ñ"), "réseau &amp; ñ");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("exactly-10", 10), "exactly-10");
        assert_eq!(truncate_label("longer-than-10", 10), "longer-th…");
        assert_eq!(truncate_label("longer-than-10", 10).chars().count(), 10);
        assert_eq!(truncate_label("ééééé", 3), "éé…");
        assert_eq!(truncate_label("anything", 0), "");
    }

    #[test]
    fn test_label_truncates_before_escaping() {
        // escaping first would cut an entity in half
        assert_eq!(label("a&b&c&d", 4), "a&amp;b…");
    }
}
