//! Best-effort attribute list parsing for literal pseudo-blocks.
//!
//! Parses the `{#id .class key="value"}` text of a fence the host left as
//! paragraph content.

/// Attributes recovered from brace text.
///
/// # Example
///
/// ```
/// use folio_include::AttrList;
///
/// let attrs = AttrList::parse(r#".include src="a.fodt" alt='Fan' style=Body"#);
/// assert_eq!(attrs.classes, vec!["include"]);
/// assert_eq!(attrs.get("src"), Some("a.fodt"));
/// assert_eq!(attrs.get("alt"), Some("Fan"));
/// assert_eq!(attrs.get("style"), Some("Body"));
/// ```
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AttrList {
    /// Identifier: `#id`.
    pub id: Option<String>,
    /// Classes: `.name`.
    pub classes: Vec<String>,
    /// Key-value pairs in source order.
    pub attrs: Vec<(String, String)>,
}

impl AttrList {
    /// Parse attribute text (without the braces).
    ///
    /// Typographic quotes are treated as their ASCII counterparts. Tokens that
    /// fit none of the forms are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let normalized = normalize_quotes(text);
        let mut list = Self::default();
        let mut remaining = normalized.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some(rest) = remaining.strip_prefix('#') {
                let end = token_end(rest);
                list.id = Some(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = token_end(rest);
                if end > 0 {
                    list.classes.push(rest[..end].to_owned());
                }
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                list.attrs.push((key.to_owned(), value.to_owned()));
                remaining = rest;
            } else {
                let skip = remaining.chars().next().map_or(0, char::len_utf8);
                remaining = &remaining[skip..];
            }
        }

        list
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the class list contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
            other => other,
        })
        .collect()
}

/// Length of an `#id` or `.class` token.
fn token_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse `key="value"`, `key='value'` or `key=value` at the start of `s`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || key.contains(char::is_whitespace) || key.starts_with(['#', '.']) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    for quote in ['"', '\''] {
        if let Some(stripped) = after_eq.strip_prefix(quote) {
            // An unterminated quote runs to the end of the text
            let end = stripped.find(quote).unwrap_or(stripped.len());
            let rest = stripped.get(end + 1..).unwrap_or("");
            return Some((key, &stripped[..end], rest));
        }
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    Some((key, &after_eq[..end], &after_eq[end..]))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(AttrList::parse(""), AttrList::default());
        assert_eq!(AttrList::parse("   "), AttrList::default());
    }

    #[test]
    fn test_id_and_classes() {
        let attrs = AttrList::parse("#fan .include .wide");
        assert_eq!(attrs.id.as_deref(), Some("fan"));
        assert_eq!(attrs.classes, vec!["include", "wide"]);
    }

    #[test]
    fn test_quoted_values_with_spaces() {
        let attrs = AttrList::parse(r#".include src="dir/a b.fodt" alt='Big Fan'"#);
        assert_eq!(attrs.get("src"), Some("dir/a b.fodt"));
        assert_eq!(attrs.get("alt"), Some("Big Fan"));
    }

    #[test]
    fn test_typographic_quotes() {
        let attrs = AttrList::parse(".include src=\u{201C}a.fodt\u{201D} alt=\u{2018}A\u{2019}");
        assert_eq!(attrs.get("src"), Some("a.fodt"));
        assert_eq!(attrs.get("alt"), Some("A"));
    }

    #[test]
    fn test_unterminated_quote() {
        let attrs = AttrList::parse(r#".include src="a.fodt"#);
        assert_eq!(attrs.get("src"), Some("a.fodt"));
    }

    #[test]
    fn test_garbage_skipped() {
        let attrs = AttrList::parse(".include ??? =x src=a.fodt");
        assert!(attrs.has_class("include"));
        assert_eq!(attrs.get("src"), Some("a.fodt"));
    }
}
