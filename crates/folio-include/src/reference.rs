//! Normalized include reference.

/// Shape of the content a reference is replaced with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultShape {
    /// Raw inline content.
    Inline,
    /// Raw block content.
    Block,
}

/// Surface syntax a reference was written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceSyntax {
    /// `::: {.include src="..."} :::` parsed by the host as a container.
    ContainerBlock,
    /// `![alt](resources/includes/x.fodt)` as a standalone image node.
    Image,
    /// Include image inside a paragraph; the paragraph is replaced.
    NestedImage,
    /// Container syntax left as literal paragraph text.
    LiteralPseudoBlock,
}

/// A detected include reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Path as written by the author.
    pub path: String,
    /// Paragraph style for the placeholder; the default style when `None`.
    pub style: Option<String>,
    /// Alternative text for the placeholder; the path when `None`.
    pub alt: Option<String>,
    pub shape: ResultShape,
    pub syntax: ReferenceSyntax,
}

impl Reference {
    /// Create a reference without style or alt text.
    #[must_use]
    pub fn new(path: impl Into<String>, shape: ResultShape, syntax: ReferenceSyntax) -> Self {
        Self {
            path: path.into(),
            style: None,
            alt: None,
            shape,
            syntax,
        }
    }

    /// Set the style; an empty value counts as absent.
    #[must_use]
    pub fn with_style(mut self, style: Option<&str>) -> Self {
        self.style = non_empty(style);
        self
    }

    /// Set the alt text; an empty value counts as absent.
    #[must_use]
    pub fn with_alt(mut self, alt: Option<&str>) -> Self {
        self.alt = non_empty(alt);
        self
    }

    /// Alt text, defaulting to the path.
    #[must_use]
    pub fn alt_or_path(&self) -> &str {
        self.alt.as_deref().unwrap_or(&self.path)
    }

    /// Style, defaulting to `default`.
    #[must_use]
    pub fn style_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.style.as_deref().unwrap_or(default)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let reference = Reference::new("a.fodt", ResultShape::Block, ReferenceSyntax::ContainerBlock)
            .with_style(Some(""))
            .with_alt(None);

        assert_eq!(reference.alt_or_path(), "a.fodt");
        assert_eq!(reference.style_or("Default"), "Default");
    }

    #[test]
    fn test_explicit_values() {
        let reference = Reference::new("a.fodt", ResultShape::Inline, ReferenceSyntax::Image)
            .with_style(Some("Caption"))
            .with_alt(Some("Diagram"));

        assert_eq!(reference.alt_or_path(), "Diagram");
        assert_eq!(reference.style_or("Default"), "Caption");
    }
}
