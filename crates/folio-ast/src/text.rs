//! Plain-text flattening of inline content.

use crate::node::Inline;

/// Flatten inline content to plain text.
///
/// Spaces, soft breaks and line breaks become a single space. Styled text,
/// citations, spans, links and image descriptions contribute their text;
/// quoted content is wrapped in ASCII quotes. Footnotes, raw inlines, markers
/// and unmodelled kinds contribute nothing.
///
/// # Example
///
/// ```
/// use folio_ast::{Inline, QuoteType, stringify};
///
/// let inlines = vec![
///     Inline::Str("src=".to_owned()),
///     Inline::Quoted(QuoteType::DoubleQuote, vec![Inline::Str("a.fodt".to_owned())]),
///     Inline::SoftBreak,
///     Inline::Emph(vec![Inline::Str("end".to_owned())]),
/// ];
/// assert_eq!(stringify(&inlines), r#"src="a.fodt" end"#);
/// ```
#[must_use]
pub fn stringify(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_text(&mut out, inlines);
    out
}

fn push_text(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Str(text) => out.push_str(text),
            Inline::Space | Inline::SoftBreak | Inline::LineBreak => out.push(' '),
            Inline::Emph(content)
            | Inline::Underline(content)
            | Inline::Strong(content)
            | Inline::Strikeout(content)
            | Inline::Superscript(content)
            | Inline::Subscript(content)
            | Inline::SmallCaps(content)
            | Inline::Cite(_, content)
            | Inline::Span(_, content)
            | Inline::Link(_, content, _)
            | Inline::Image(_, content, _) => push_text(out, content),
            Inline::Quoted(quote, content) => {
                out.push(quote.mark());
                push_text(out, content);
                out.push(quote.mark());
            }
            Inline::Note(_) | Inline::RawInline(..) | Inline::Marker(_) | Inline::Other(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Attr, Marker, QuoteType, Target};

    #[test]
    fn test_empty() {
        assert_eq!(stringify(&[]), "");
    }

    #[test]
    fn test_breaks_become_spaces() {
        let inlines = vec![
            Inline::Str(":::".to_owned()),
            Inline::Space,
            Inline::Str("{.include}".to_owned()),
            Inline::SoftBreak,
            Inline::Str(":::".to_owned()),
        ];
        assert_eq!(stringify(&inlines), "::: {.include} :::");
    }

    #[test]
    fn test_single_quotes() {
        let inlines = vec![Inline::Quoted(
            QuoteType::SingleQuote,
            vec![Inline::Str("x".to_owned())],
        )];
        assert_eq!(stringify(&inlines), "'x'");
    }

    #[test]
    fn test_skips_raw_and_markers() {
        let inlines = vec![
            Inline::Str("a".to_owned()),
            Inline::raw("opendocument", "<text:s/>"),
            Inline::Marker(Marker::new("opendocument", "BODY")),
            Inline::Image(
                Attr::default(),
                vec![Inline::Str("b".to_owned())],
                Target::new("x.png"),
            ),
        ];
        assert_eq!(stringify(&inlines), "ab");
    }

    #[test]
    fn test_footnotes_skipped() {
        let inlines = vec![
            Inline::SmallCaps(vec![Inline::Str("src".to_owned())]),
            Inline::Note(vec![crate::Block::Plain(vec![Inline::Str("note".to_owned())])]),
            Inline::Superscript(vec![Inline::Str("=a".to_owned())]),
        ];
        assert_eq!(stringify(&inlines), "src=a");
    }
}
