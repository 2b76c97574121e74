//! Resolution engine: locate, extract, or fall back to a placeholder.

use std::fs;
use std::path::{Path, PathBuf};

use folio_ast::{Block, Inline, Marker};

use crate::{
    ContentDigest, Diagnostics, FragmentCache, FragmentLocator, IncludeSettings,
    MemoryFragmentCache, NullFragmentCache, Placeholder, Reference, ResolveError, ResultShape,
    extract_body,
};

/// Outcome of resolving one reference. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Body markup extracted from a fragment file.
    Fragment {
        /// Fragment file the body was read from.
        path: PathBuf,
        /// Trimmed body markup.
        markup: String,
    },
    /// Visible fallback for an unresolved reference.
    Placeholder(Placeholder),
}

impl Resolution {
    /// Markup for the given shape.
    ///
    /// Fragment bodies are inserted as-is in either shape; placeholders are
    /// rendered as a paragraph or a span.
    #[must_use]
    pub fn markup(&self, shape: ResultShape) -> String {
        match self {
            Self::Fragment { markup, .. } => markup.clone(),
            Self::Placeholder(placeholder) => placeholder.render(shape),
        }
    }

    /// Tree content of the requested shape, as raw content in `format`.
    ///
    /// Block results are raw blocks. Inline results are staged as a marker
    /// carrying both renderings: the block one is used when the containing
    /// paragraph is replaced, the inline one anywhere else.
    #[must_use]
    pub fn to_replacement(&self, shape: ResultShape, format: &str) -> Replacement {
        match shape {
            ResultShape::Block => Replacement::Raw {
                format: format.to_owned(),
                markup: self.markup(ResultShape::Block),
            },
            ResultShape::Inline => Replacement::Staged(
                Marker::new(format, self.markup(ResultShape::Block))
                    .with_inline(self.markup(ResultShape::Inline)),
            ),
        }
    }

    /// Whether a fragment body was found.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        matches!(self, Self::Fragment { .. })
    }
}

/// Content a resolved reference is spliced in as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Replacement {
    /// Raw content in the named format.
    Raw { format: String, markup: String },
    /// Marker awaiting the second phase.
    Staged(Marker),
}

impl Replacement {
    /// Block node. A staged marker is wrapped in a plain block, which the
    /// second phase replaces whole.
    #[must_use]
    pub fn into_block(self) -> Block {
        match self {
            Self::Raw { format, markup } => Block::RawBlock(format, markup),
            Self::Staged(marker) => Block::Plain(vec![Inline::Marker(marker)]),
        }
    }

    /// Inline node. Raw content is staged, since block markup may not sit
    /// inside inline content.
    #[must_use]
    pub fn into_inline(self) -> Inline {
        match self {
            Self::Raw { format, markup } => Inline::Marker(Marker::new(format, markup)),
            Self::Staged(marker) => Inline::Marker(marker),
        }
    }
}

/// Turns references into fragment bodies or placeholders.
pub struct Resolver {
    locator: FragmentLocator,
    default_style: String,
    cache: Box<dyn FragmentCache>,
}

impl Resolver {
    /// Create a resolver from include settings.
    #[must_use]
    pub fn new(settings: &IncludeSettings) -> Self {
        let cache: Box<dyn FragmentCache> = if settings.cache_enabled {
            Box::new(MemoryFragmentCache::new())
        } else {
            Box::new(NullFragmentCache)
        };
        Self {
            locator: FragmentLocator::new(settings),
            default_style: settings.default_style.clone(),
            cache,
        }
    }

    /// Resolve a reference. Failures are reported to `diagnostics` and yield
    /// a placeholder naming the path and alt text.
    pub fn resolve(&self, reference: &Reference, diagnostics: &mut Diagnostics) -> Resolution {
        match self.load(&reference.path) {
            Ok((path, markup)) => {
                tracing::debug!(
                    reference = %reference.path,
                    path = %path.display(),
                    syntax = ?reference.syntax,
                    "Resolved include"
                );
                Resolution::Fragment { path, markup }
            }
            Err(err) => {
                diagnostics.report_error(Some(&reference.path), &err);
                Resolution::Placeholder(Placeholder::unresolved(
                    reference.style_or(&self.default_style),
                    &reference.path,
                    reference.alt_or_path(),
                ))
            }
        }
    }

    /// Resolution for a reference that failed before lookup.
    ///
    /// Reports the error and yields the stripped placeholder when the error
    /// carries no path.
    pub fn fail(&self, error: &ResolveError, diagnostics: &mut Diagnostics) -> Resolution {
        diagnostics.report_error(None, error);
        Resolution::Placeholder(Placeholder::missing_source(&self.default_style))
    }

    fn load(&self, reference: &str) -> Result<(PathBuf, String), ResolveError> {
        let path = self.locator.locate(reference)?;
        let body = self.read_body(&path)?;
        Ok((path, body))
    }

    fn read_body(&self, path: &Path) -> Result<String, ResolveError> {
        let read_error = |source| ResolveError::Read {
            path: path.to_path_buf(),
            source,
        };

        let raw = fs::read_to_string(path).map_err(read_error)?;
        let digest = ContentDigest::of(raw.as_bytes());
        if let Some(body) = self.cache.get(path, &digest) {
            tracing::trace!(path = %path.display(), digest = digest.as_str(), "Fragment cache hit");
            return Ok(body);
        }

        let body = extract_body(&raw).ok_or_else(|| ResolveError::Extraction {
            path: path.to_path_buf(),
        })?;
        self.cache.set(path, digest, body);
        Ok(body.to_owned())
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("locator", &self.locator)
            .field("default_style", &self.default_style)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::{DiagnosticKind, ReferenceSyntax};

    fn write_fragment(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn container(path: &str) -> Reference {
        Reference::new(path, ResultShape::Block, ReferenceSyntax::ContainerBlock)
    }

    #[test]
    fn test_resolve_fragment() {
        let temp = TempDir::new().unwrap();
        write_fragment(
            temp.path(),
            "resources/includes/note.fodt",
            "<office:text>...<text:sequence-decls>...</text:sequence-decls>HELLO</office:text>",
        );
        let resolver = Resolver::new(&IncludeSettings::new().with_working_dir(temp.path()));
        let mut diagnostics = Diagnostics::new();

        let resolution = resolver.resolve(&container("resources/includes/note.fodt"), &mut diagnostics);

        assert!(resolution.is_fragment());
        assert_eq!(resolution.markup(ResultShape::Block), "HELLO");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_file_yields_placeholder() {
        let temp = TempDir::new().unwrap();
        let resolver = Resolver::new(&IncludeSettings::new().with_working_dir(temp.path()));
        let mut diagnostics = Diagnostics::new();

        let resolution = resolver.resolve(&container("resources/includes/note.fodt"), &mut diagnostics);

        assert_eq!(
            resolution
                .to_replacement(ResultShape::Block, "opendocument")
                .into_block(),
            Block::raw(
                "opendocument",
                r#"<text:p text:style-name="Default Paragraph Style">«INCLUDE:resources/includes/note.fodt:resources/includes/note.fodt»</text:p>"#
            )
        );
        assert_eq!(diagnostics.count(DiagnosticKind::FileNotFound), 1);
    }

    #[test]
    fn test_placeholder_uses_style_and_alt() {
        let temp = TempDir::new().unwrap();
        let resolver = Resolver::new(&IncludeSettings::new().with_working_dir(temp.path()));
        let reference = container("gone.fodt")
            .with_style(Some("Warning"))
            .with_alt(Some("Gone"));

        let resolution = resolver.resolve(&reference, &mut Diagnostics::new());

        assert_eq!(
            resolution.markup(ResultShape::Inline),
            r#"<text:span text:style-name="Warning">«INCLUDE:gone.fodt:Gone»</text:span>"#
        );
    }

    #[test]
    fn test_extraction_failure() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "bad.fodt", "<office:document/>");
        let resolver = Resolver::new(&IncludeSettings::new().with_working_dir(temp.path()));
        let mut diagnostics = Diagnostics::new();

        let resolution = resolver.resolve(&container("bad.fodt"), &mut diagnostics);

        assert!(!resolution.is_fragment());
        assert_eq!(diagnostics.count(DiagnosticKind::ExtractionFailure), 1);
    }

    #[test]
    fn test_unsupported_format() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "note.odt", "<office:text>X</office:text>");
        let resolver = Resolver::new(&IncludeSettings::new().with_working_dir(temp.path()));
        let mut diagnostics = Diagnostics::new();

        let resolution = resolver.resolve(&container("note.odt"), &mut diagnostics);

        assert!(!resolution.is_fragment());
        assert_eq!(diagnostics.count(DiagnosticKind::UnsupportedFormat), 1);
    }

    #[test]
    fn test_missing_source_placeholder() {
        let resolver = Resolver::new(&IncludeSettings::new().with_working_dir("."));
        let mut diagnostics = Diagnostics::new();

        let resolution = resolver.fail(&ResolveError::MissingSource, &mut diagnostics);

        assert_eq!(
            resolution.markup(ResultShape::Block),
            r#"<text:p text:style-name="Default Paragraph Style">«INCLUDE:missing-src»</text:p>"#
        );
        assert_eq!(diagnostics.count(DiagnosticKind::MissingSource), 1);
        assert_eq!(diagnostics.warnings()[0].reference, None);
    }

    #[test]
    fn test_repeated_resolution_identical() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "a.fodt", "<office:text> <text:p>A</text:p> </office:text>");
        let settings = IncludeSettings::new()
            .with_working_dir(temp.path())
            .with_cache(true);
        let resolver = Resolver::new(&settings);
        let mut diagnostics = Diagnostics::new();

        let first = resolver.resolve(&container("a.fodt"), &mut diagnostics);
        let second = resolver.resolve(&container("a.fodt"), &mut diagnostics);

        assert_eq!(first, second);
        assert_eq!(first.markup(ResultShape::Block), "<text:p>A</text:p>");
    }

    #[test]
    fn test_cache_never_serves_stale_body() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "a.fodt", "<office:text>old</office:text>");
        let settings = IncludeSettings::new()
            .with_working_dir(temp.path())
            .with_cache(true);
        let resolver = Resolver::new(&settings);
        let mut diagnostics = Diagnostics::new();

        let first = resolver.resolve(&container("a.fodt"), &mut diagnostics);
        write_fragment(temp.path(), "a.fodt", "<office:text>newer body</office:text>");
        let second = resolver.resolve(&container("a.fodt"), &mut diagnostics);

        assert_eq!(first.markup(ResultShape::Block), "old");
        assert_eq!(second.markup(ResultShape::Block), "newer body");
    }

    #[test]
    fn test_cache_never_serves_same_length_rewrite() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "a.fodt", "<office:text>aaa</office:text>");
        let settings = IncludeSettings::new()
            .with_working_dir(temp.path())
            .with_cache(true);
        let resolver = Resolver::new(&settings);
        let mut diagnostics = Diagnostics::new();

        let first = resolver.resolve(&container("a.fodt"), &mut diagnostics);
        write_fragment(temp.path(), "a.fodt", "<office:text>bbb</office:text>");
        let second = resolver.resolve(&container("a.fodt"), &mut diagnostics);

        assert_eq!(first.markup(ResultShape::Block), "aaa");
        assert_eq!(second.markup(ResultShape::Block), "bbb");
    }

    #[test]
    fn test_inline_shape_stages_both_renderings() {
        let resolution = Resolution::Placeholder(Placeholder::unresolved("S", "p.fodt", "P"));

        let Replacement::Staged(marker) =
            resolution.to_replacement(ResultShape::Inline, "opendocument")
        else {
            panic!("expected a staged marker");
        };

        assert_eq!(marker.format, "opendocument");
        assert!(marker.block.starts_with("<text:p "));
        assert!(marker.inline.starts_with("<text:span "));
    }

    #[test]
    fn test_block_shape_is_raw_block() {
        let resolution = Resolution::Fragment {
            path: PathBuf::from("a.fodt"),
            markup: "<text:p>A</text:p>".to_owned(),
        };

        let replacement = resolution.to_replacement(ResultShape::Block, "opendocument");

        assert_eq!(
            replacement.clone().into_block(),
            Block::raw("opendocument", "<text:p>A</text:p>")
        );
        assert_eq!(
            replacement.into_inline(),
            Inline::Marker(Marker::new("opendocument", "<text:p>A</text:p>"))
        );
    }

    #[test]
    fn test_staged_marker_in_block_position() {
        let marker = Marker::new("opendocument", "B").with_inline("i");

        let block = Replacement::Staged(marker.clone()).into_block();

        assert_eq!(block, Block::Plain(vec![Inline::Marker(marker)]));
    }
}
