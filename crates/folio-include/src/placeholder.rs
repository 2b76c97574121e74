//! Visible fallback for unresolved references.

use quick_xml::escape::escape;

use crate::ResultShape;

/// Body text of the stripped placeholder.
const MISSING_SOURCE_TEXT: &str = "«INCLUDE:missing-src»";

/// Placeholder emitted in place of an unresolved reference.
///
/// # Example
///
/// ```
/// use folio_include::{Placeholder, ResultShape};
///
/// let placeholder = Placeholder::unresolved("Body", "a.fodt", "A");
/// assert_eq!(
///     placeholder.render(ResultShape::Block),
///     r#"<text:p text:style-name="Body">«INCLUDE:a.fodt:A»</text:p>"#
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    style: String,
    text: String,
}

impl Placeholder {
    /// Placeholder naming the unresolved path and its alt text.
    #[must_use]
    pub fn unresolved(style: &str, path: &str, alt: &str) -> Self {
        Self {
            style: style.to_owned(),
            text: format!("«INCLUDE:{path}:{alt}»"),
        }
    }

    /// Stripped placeholder for a reference without a usable path.
    #[must_use]
    pub fn missing_source(style: &str) -> Self {
        Self {
            style: style.to_owned(),
            text: MISSING_SOURCE_TEXT.to_owned(),
        }
    }

    /// Unescaped body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render as OpenDocument markup of the given shape.
    #[must_use]
    pub fn render(&self, shape: ResultShape) -> String {
        let element = match shape {
            ResultShape::Block => "text:p",
            ResultShape::Inline => "text:span",
        };
        format!(
            r#"<{element} text:style-name="{}">{}</{element}>"#,
            escape(self.style.as_str()),
            escape(self.text.as_str()),
        )
    }
}
