//! Second phase: replace blocks holding markers with raw content.

use folio_ast::{Block, Content, ContentMut, Inline, Marker};

use crate::{DiagnosticKind, Diagnostics};

/// Counts of replacements made by [`splice_markers`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpliceReport {
    /// Paragraphs, plain blocks and figures replaced by raw blocks.
    pub blocks_replaced: usize,
    /// Markers outside a replaceable block, spliced as raw inlines.
    pub inline_fallbacks: usize,
}

impl SpliceReport {
    /// Whether nothing was replaced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks_replaced == 0 && self.inline_fallbacks == 0
    }
}

/// Replace every block that holds a [`Marker`].
///
/// A paragraph, plain block or figure holding one or more markers is replaced
/// as a whole by one raw block joining the markers' block renderings in
/// document order. Markers anywhere else (headings, line blocks, definition
/// terms) are replaced in place by their inline rendering and reported.
/// Footnote content is spliced on its own: a marker inside a footnote
/// replaces the footnote's paragraph, never the paragraph the footnote is
/// attached to. No marker remains afterwards.
pub fn splice_markers(blocks: &mut [Block], diagnostics: &mut Diagnostics) -> SpliceReport {
    let mut report = SpliceReport::default();
    splice_blocks(blocks, diagnostics, &mut report);
    report
}

fn splice_blocks(blocks: &mut [Block], diagnostics: &mut Diagnostics, report: &mut SpliceReport) {
    for block in blocks {
        splice_block(block, diagnostics, report);
    }
}

fn splice_block(block: &mut Block, diagnostics: &mut Diagnostics, report: &mut SpliceReport) {
    if !block.contains_marker() {
        return;
    }

    let mut markers = Vec::new();
    match &*block {
        Block::Plain(inlines) | Block::Para(inlines) => collect_inline_markers(inlines, &mut markers),
        Block::Figure(_, _, body) => collect_block_markers(body, &mut markers),
        _ => {}
    }
    if let Some(raw) = joined_raw_block(&markers) {
        *block = raw;
        report.blocks_replaced += 1;
        return;
    }

    for child in block.children_mut() {
        splice_content(child, diagnostics, report);
    }
}

fn splice_content(content: ContentMut<'_>, diagnostics: &mut Diagnostics, report: &mut SpliceReport) {
    match content {
        ContentMut::Blocks(blocks) => splice_blocks(blocks, diagnostics, report),
        ContentMut::Inlines(inlines) => splice_inlines(inlines, diagnostics, report),
    }
}

/// Inline fallback for markers outside a replaceable block.
fn splice_inlines(inlines: &mut [Inline], diagnostics: &mut Diagnostics, report: &mut SpliceReport) {
    for inline in inlines {
        if let Inline::Marker(marker) = inline {
            diagnostics.report(
                DiagnosticKind::MarkerOutsideParagraph,
                None,
                "include image outside a paragraph spliced as inline content",
            );
            *inline = Inline::raw(
                std::mem::take(&mut marker.format),
                std::mem::take(&mut marker.inline),
            );
            report.inline_fallbacks += 1;
        } else if let Some(child) = inline.children_mut() {
            splice_content(child, diagnostics, report);
        }
    }
}

fn joined_raw_block(markers: &[&Marker]) -> Option<Block> {
    let format = markers.first()?.format.clone();
    let markup = markers
        .iter()
        .map(|marker| marker.block.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Some(Block::RawBlock(format, markup))
}

fn collect_block_markers<'a>(blocks: &'a [Block], out: &mut Vec<&'a Marker>) {
    for child in blocks.iter().flat_map(Block::children) {
        collect_content_markers(child, out);
    }
}

/// Markers of the content itself; footnotes are left to their own splice.
fn collect_inline_markers<'a>(inlines: &'a [Inline], out: &mut Vec<&'a Marker>) {
    for inline in inlines {
        match inline {
            Inline::Marker(marker) => out.push(marker),
            Inline::Note(_) => {}
            other => {
                if let Some(child) = other.children() {
                    collect_content_markers(child, out);
                }
            }
        }
    }
}

fn collect_content_markers<'a>(content: Content<'a>, out: &mut Vec<&'a Marker>) {
    match content {
        Content::Blocks(blocks) => collect_block_markers(blocks, out),
        Content::Inlines(inlines) => collect_inline_markers(inlines, out),
    }
}
