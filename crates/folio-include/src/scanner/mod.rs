//! Include reference detection.
//!
//! Recognises the four surface syntaxes and normalizes each into a
//! [`Reference`]:
//!
//! - container block: `Div` with the include class
//! - image: image whose path lies under the reserved prefix
//! - nested image: such an image somewhere inside a paragraph
//! - literal pseudo-block: `::: {.include src=...} :::` as paragraph text

mod args;

use std::path::Path;
use std::sync::LazyLock;

use folio_ast::{Attr, Content, Inline, Target, stringify};
use regex::Regex;

pub use args::AttrList;

use crate::{IncludeSettings, Reference, ReferenceSyntax, ResolveError, ResultShape};

/// Fenced attribute line: `::: {attrs} :::` with an optional closing fence.
static PSEUDO_BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:{3,}\s*\{([^{}]*)\}\s*(?::{3,})?\s*$").expect("invalid pseudo-block regex")
});

/// Node a reference can be scanned from.
#[derive(Clone, Copy, Debug)]
pub enum ScanNode<'a> {
    /// Container block attributes.
    Div(&'a Attr),
    /// Paragraph content.
    Para(&'a [Inline]),
}

/// Detects include references in document nodes.
#[derive(Clone, Debug)]
pub struct Scanner {
    class: String,
    extension: String,
    reserved_prefix: String,
}

impl Scanner {
    /// Create a scanner from include settings.
    #[must_use]
    pub fn new(settings: &IncludeSettings) -> Self {
        Self {
            class: settings.class.clone(),
            extension: settings.extension.clone(),
            reserved_prefix: normalize_path(&settings.reserved_prefix),
        }
    }

    /// Scan a node for a reference.
    ///
    /// Returns `None` when the node is not an include, and an error when it is
    /// one without a usable source path. For paragraphs the literal
    /// pseudo-block form is checked first; a nested image is only used when
    /// the pseudo-block is absent or has no path.
    pub fn scan(&self, node: ScanNode<'_>) -> Option<Result<Reference, ResolveError>> {
        match node {
            ScanNode::Div(attr) => self.scan_container(attr),
            ScanNode::Para(inlines) => match self.scan_pseudo_block(inlines) {
                Some(Ok(reference)) => Some(Ok(reference)),
                Some(Err(err)) => Some(self.scan_nested_image(inlines).ok_or(err)),
                None => self.scan_nested_image(inlines).map(Ok),
            },
        }
    }

    /// Container block with the include class.
    pub fn scan_container(&self, attr: &Attr) -> Option<Result<Reference, ResolveError>> {
        if !attr.has_class(&self.class) {
            return None;
        }
        Some(reference_from(
            attr.get("src"),
            attr.get("style"),
            attr.get("alt"),
            ReferenceSyntax::ContainerBlock,
            || ResolveError::MissingSource,
        ))
    }

    /// Image whose path is a reserved include path.
    #[must_use]
    pub fn scan_image(
        &self,
        attr: &Attr,
        description: &[Inline],
        target: &Target,
    ) -> Option<Reference> {
        if !self.is_reserved_path(&target.url) {
            return None;
        }
        let alt = stringify(description);
        Some(
            Reference::new(&target.url, ResultShape::Inline, ReferenceSyntax::Image)
                .with_style(attr.get("style"))
                .with_alt(Some(alt.as_str())),
        )
    }

    /// First include image anywhere in the paragraph content.
    ///
    /// Footnotes are not searched: their paragraphs are scanned on their own.
    #[must_use]
    pub fn scan_nested_image(&self, inlines: &[Inline]) -> Option<Reference> {
        inlines.iter().find_map(|inline| match inline {
            Inline::Image(attr, description, target) => {
                self.scan_image(attr, description, target).map(|reference| Reference {
                    shape: ResultShape::Block,
                    syntax: ReferenceSyntax::NestedImage,
                    ..reference
                })
            }
            other => match other.children()? {
                Content::Inlines(children) => self.scan_nested_image(children),
                Content::Blocks(_) => None,
            },
        })
    }

    /// Paragraph whose text is a fenced attribute line naming the include class.
    pub fn scan_pseudo_block(&self, inlines: &[Inline]) -> Option<Result<Reference, ResolveError>> {
        let text = stringify(inlines);
        let captures = PSEUDO_BLOCK_PATTERN.captures(&text)?;
        let attrs = AttrList::parse(captures.get(1)?.as_str());
        if !attrs.has_class(&self.class) {
            return None;
        }
        Some(reference_from(
            attrs.get("src"),
            attrs.get("style"),
            attrs.get("alt"),
            ReferenceSyntax::LiteralPseudoBlock,
            || ResolveError::MalformedAttributes { text: text.clone() },
        ))
    }

    /// Whether an image path lies under the reserved prefix and has the
    /// supported extension.
    #[must_use]
    pub fn is_reserved_path(&self, url: &str) -> bool {
        let path = normalize_path(url);
        let has_extension = Path::new(&path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension));
        if !has_extension || self.reserved_prefix.is_empty() {
            return has_extension;
        }
        path.starts_with(&self.reserved_prefix)
            || path.contains(&format!("/{}", self.reserved_prefix))
    }
}

fn reference_from(
    src: Option<&str>,
    style: Option<&str>,
    alt: Option<&str>,
    syntax: ReferenceSyntax,
    missing: impl FnOnce() -> ResolveError,
) -> Result<Reference, ResolveError> {
    let Some(path) = src.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(missing());
    };
    Ok(Reference::new(path, ResultShape::Block, syntax)
        .with_style(style)
        .with_alt(alt))
}

/// Forward slashes only, without leading `./` segments.
fn normalize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let mut rest = path.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_owned()
}
