//! Include filter: the two-phase rewrite over a document.

use folio_ast::{Attr, Block, Document, Filter, Inline, Target, apply_filter};

use crate::{
    Diagnostics, IncludeSettings, Reference, ReferenceSyntax, Replacement, ResolveError,
    Resolver, ResultShape, ScanNode, Scanner, SpliceReport, splice_markers,
};

/// Document filter resolving include references.
///
/// Container blocks and literal pseudo-blocks are replaced directly. Include
/// images become markers during traversal; the [`document`](Filter::document)
/// callback then replaces each block holding a marker.
#[derive(Debug)]
pub struct IncludeFilter {
    scanner: Scanner,
    resolver: Resolver,
    raw_format: String,
    diagnostics: Diagnostics,
    report: SpliceReport,
}

impl IncludeFilter {
    /// Create a filter from include settings.
    #[must_use]
    pub fn new(settings: &IncludeSettings) -> Self {
        Self {
            scanner: Scanner::new(settings),
            resolver: Resolver::new(settings),
            raw_format: settings.raw_format.clone(),
            diagnostics: Diagnostics::new(),
            report: SpliceReport::default(),
        }
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume the filter, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Result of the last marker splice.
    #[must_use]
    pub fn splice_report(&self) -> SpliceReport {
        self.report
    }

    /// Resolve a scanned reference into content of its requested shape.
    ///
    /// A reference without a usable source yields the block-shaped
    /// missing-source placeholder.
    fn replacement(&mut self, scanned: Result<Reference, ResolveError>) -> Replacement {
        match scanned {
            Ok(reference) => self
                .resolver
                .resolve(&reference, &mut self.diagnostics)
                .to_replacement(reference.shape, &self.raw_format),
            Err(err) => self
                .resolver
                .fail(&err, &mut self.diagnostics)
                .to_replacement(ResultShape::Block, &self.raw_format),
        }
    }
}

impl Filter for IncludeFilter {
    fn div(&mut self, attr: &Attr, _content: &[Block]) -> Option<Block> {
        let scanned = self.scanner.scan(ScanNode::Div(attr))?;
        Some(self.replacement(scanned).into_block())
    }

    fn para(&mut self, content: &[Inline]) -> Option<Block> {
        let scanned = self.scanner.scan(ScanNode::Para(content))?;
        // Left to the image callback and the marker splice
        if matches!(&scanned, Ok(reference) if reference.syntax == ReferenceSyntax::NestedImage) {
            return None;
        }
        Some(self.replacement(scanned).into_block())
    }

    fn image(&mut self, attr: &Attr, description: &[Inline], target: &Target) -> Option<Inline> {
        let reference = self.scanner.scan_image(attr, description, target)?;
        Some(self.replacement(Ok(reference)).into_inline())
    }

    fn document(&mut self, doc: &mut Document) {
        self.report = splice_markers(&mut doc.blocks, &mut self.diagnostics);
        if !self.report.is_empty() {
            tracing::debug!(
                blocks_replaced = self.report.blocks_replaced,
                inline_fallbacks = self.report.inline_fallbacks,
                "Spliced include markers"
            );
        }
    }
}

/// Resolve every include reference in `doc`.
///
/// Always leaves a complete document: unresolved references become
/// placeholders, reported in the returned diagnostics.
pub fn process_document(doc: &mut Document, settings: IncludeSettings) -> Diagnostics {
    let mut filter = IncludeFilter::new(&settings);
    apply_filter(doc, &mut filter);
    let diagnostics = filter.into_diagnostics();
    tracing::info!(warnings = diagnostics.len(), "Processed includes");
    diagnostics
}
