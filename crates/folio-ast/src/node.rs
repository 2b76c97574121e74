//! Document tree node types.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AstError;

/// Pandoc API version written when a document is built from scratch.
const DEFAULT_API_VERSION: [u32; 3] = [1, 23, 1];

/// A whole pandoc document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Pandoc API version the document was produced with.
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Vec<u32>,
    /// Document metadata, kept verbatim.
    pub meta: Value,
    /// Top-level blocks.
    pub blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Create a document with empty metadata.
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_vec(),
            meta: Value::Object(serde_json::Map::new()),
            blocks,
        }
    }

    /// Decode a document from pandoc JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, AstError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a document from a reader producing pandoc JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self, AstError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Encode the document as pandoc JSON text.
    ///
    /// Fails with [`AstError::UnsplicedMarker`] if a [`Marker`] is still present.
    pub fn to_json_string(&self) -> Result<String, AstError> {
        self.ensure_no_markers()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Encode the document as pandoc JSON into a writer.
    pub fn to_writer(&self, writer: impl Write) -> Result<(), AstError> {
        self.ensure_no_markers()?;
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Whether any block of the document still holds a [`Marker`].
    #[must_use]
    pub fn contains_markers(&self) -> bool {
        self.blocks.iter().any(Block::contains_marker)
    }

    fn ensure_no_markers(&self) -> Result<(), AstError> {
        if self.contains_markers() {
            return Err(AstError::UnsplicedMarker);
        }
        Ok(())
    }
}

/// Node attributes: `{#id .class key="value"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attr {
    /// Identifier (empty if absent).
    pub id: String,
    /// Class names.
    pub classes: Vec<String>,
    /// Key-value pairs in source order.
    pub attributes: Vec<(String, String)>,
}

impl Attr {
    /// Set the classes.
    #[must_use]
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Append a key-value attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Check whether the class list contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    /// Get the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Link or image target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Target {
    /// Destination URL or path.
    pub url: String,
    /// Title (empty if absent).
    pub title: String,
}

impl Target {
    /// Create a target without a title.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }
}

/// Kind of quotation marks around [`Inline::Quoted`] content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

impl QuoteType {
    /// Plain ASCII quotation mark for this kind.
    #[must_use]
    pub fn mark(self) -> char {
        match self {
            Self::SingleQuote => '\'',
            Self::DoubleQuote => '"',
        }
    }
}

/// Caption of a figure or table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Caption {
    /// Short caption, kept verbatim (`null` when absent).
    pub short: Value,
    /// Full caption blocks.
    pub long: Vec<Block>,
}

/// Table with every cell's content decoded.
///
/// Column specs, alignments, spans and row-head counts are layout data the
/// filters never touch; they are kept verbatim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub attr: Attr,
    pub caption: Caption,
    pub col_specs: Value,
    pub head: TableSection,
    pub bodies: Vec<TableBody>,
    pub foot: TableSection,
}

/// Table head or foot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSection {
    pub attr: Attr,
    pub rows: Vec<Row>,
}

/// Table body with its intermediate head rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableBody {
    pub attr: Attr,
    pub row_head_columns: Value,
    pub head: Vec<Row>,
    pub body: Vec<Row>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub attr: Attr,
    pub cells: Vec<Cell>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub attr: Attr,
    pub alignment: Value,
    pub row_span: Value,
    pub col_span: Value,
    pub content: Vec<Block>,
}

impl Table {
    /// Caption blocks followed by every cell's blocks, in document order.
    #[must_use]
    pub fn block_lists(&self) -> Vec<&[Block]> {
        let rows = self
            .head
            .rows
            .iter()
            .chain(self.bodies.iter().flat_map(|body| body.head.iter().chain(&body.body)))
            .chain(&self.foot.rows);
        std::iter::once(self.caption.long.as_slice())
            .chain(rows.flat_map(|row| row.cells.iter().map(|cell| cell.content.as_slice())))
            .collect()
    }

    /// Mutable counterpart of [`block_lists`](Self::block_lists).
    pub fn block_lists_mut(&mut self) -> Vec<&mut Vec<Block>> {
        let Self {
            caption,
            head,
            bodies,
            foot,
            ..
        } = self;
        let rows = head
            .rows
            .iter_mut()
            .chain(
                bodies
                    .iter_mut()
                    .flat_map(|body| body.head.iter_mut().chain(body.body.iter_mut())),
            )
            .chain(foot.rows.iter_mut());
        std::iter::once(&mut caption.long)
            .chain(rows.flat_map(|row| row.cells.iter_mut().map(|cell| &mut cell.content)))
            .collect()
    }
}

/// One list of child nodes.
#[derive(Clone, Copy, Debug)]
pub enum Content<'a> {
    Blocks(&'a [Block]),
    Inlines(&'a [Inline]),
}

impl Content<'_> {
    /// Whether any node of the list is or holds a [`Marker`].
    #[must_use]
    pub fn contains_marker(self) -> bool {
        match self {
            Self::Blocks(blocks) => blocks.iter().any(Block::contains_marker),
            Self::Inlines(inlines) => inlines.iter().any(Inline::contains_marker),
        }
    }
}

/// One mutable list of child nodes.
#[derive(Debug)]
pub enum ContentMut<'a> {
    Blocks(&'a mut Vec<Block>),
    Inlines(&'a mut Vec<Inline>),
}

/// Block-level node.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Inline content not wrapped in a paragraph (tight list items, figure bodies).
    Plain(Vec<Inline>),
    /// Paragraph.
    Para(Vec<Inline>),
    /// Lines of a line block (`| verse`).
    LineBlock(Vec<Vec<Inline>>),
    /// Heading with level, attributes and content.
    Header(u32, Attr, Vec<Inline>),
    /// Block quotation.
    BlockQuote(Vec<Block>),
    /// Bullet list; each item is a list of blocks.
    BulletList(Vec<Vec<Block>>),
    /// Ordered list with its list attributes kept verbatim.
    OrderedList(Value, Vec<Vec<Block>>),
    /// Terms, each with one or more definitions.
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    /// Generic container (`::: {.class} ... :::`).
    Div(Attr, Vec<Block>),
    Figure(Attr, Caption, Vec<Block>),
    Table(Box<Table>),
    /// Raw content in the named output format.
    RawBlock(String, String),
    /// Any other block kind, carried unchanged.
    Other(Value),
}

impl Block {
    /// Create a raw block in the given format.
    #[must_use]
    pub fn raw(format: impl Into<String>, text: impl Into<String>) -> Self {
        Self::RawBlock(format.into(), text.into())
    }

    /// Direct child lists in document order.
    #[must_use]
    pub fn children(&self) -> Vec<Content<'_>> {
        match self {
            Self::Plain(inlines) | Self::Para(inlines) | Self::Header(_, _, inlines) => {
                vec![Content::Inlines(inlines)]
            }
            Self::LineBlock(lines) => lines.iter().map(|line| Content::Inlines(line)).collect(),
            Self::BlockQuote(blocks) | Self::Div(_, blocks) => vec![Content::Blocks(blocks)],
            Self::BulletList(items) | Self::OrderedList(_, items) => {
                items.iter().map(|item| Content::Blocks(item)).collect()
            }
            Self::DefinitionList(items) => items
                .iter()
                .flat_map(|(term, definitions)| {
                    std::iter::once(Content::Inlines(term))
                        .chain(definitions.iter().map(|d| Content::Blocks(d)))
                })
                .collect(),
            Self::Figure(_, caption, body) => {
                vec![Content::Blocks(&caption.long), Content::Blocks(body)]
            }
            Self::Table(table) => table.block_lists().into_iter().map(Content::Blocks).collect(),
            Self::RawBlock(..) | Self::Other(_) => Vec::new(),
        }
    }

    /// Mutable counterpart of [`children`](Self::children).
    pub fn children_mut(&mut self) -> Vec<ContentMut<'_>> {
        match self {
            Self::Plain(inlines) | Self::Para(inlines) | Self::Header(_, _, inlines) => {
                vec![ContentMut::Inlines(inlines)]
            }
            Self::LineBlock(lines) => lines.iter_mut().map(ContentMut::Inlines).collect(),
            Self::BlockQuote(blocks) | Self::Div(_, blocks) => vec![ContentMut::Blocks(blocks)],
            Self::BulletList(items) | Self::OrderedList(_, items) => {
                items.iter_mut().map(ContentMut::Blocks).collect()
            }
            Self::DefinitionList(items) => items
                .iter_mut()
                .flat_map(|(term, definitions)| {
                    std::iter::once(ContentMut::Inlines(term))
                        .chain(definitions.iter_mut().map(ContentMut::Blocks))
                })
                .collect(),
            Self::Figure(_, caption, body) => {
                vec![ContentMut::Blocks(&mut caption.long), ContentMut::Blocks(body)]
            }
            Self::Table(table) => table
                .block_lists_mut()
                .into_iter()
                .map(ContentMut::Blocks)
                .collect(),
            Self::RawBlock(..) | Self::Other(_) => Vec::new(),
        }
    }

    /// Whether this block or any descendant holds a [`Marker`].
    #[must_use]
    pub fn contains_marker(&self) -> bool {
        self.children().into_iter().any(Content::contains_marker)
    }
}

/// Inline-level node.
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Str(String),
    Space,
    SoftBreak,
    LineBreak,
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Quoted(QuoteType, Vec<Inline>),
    /// Citation with its citation records kept verbatim.
    Cite(Value, Vec<Inline>),
    Span(Attr, Vec<Inline>),
    Link(Attr, Vec<Inline>, Target),
    /// Image with attributes, description and target.
    Image(Attr, Vec<Inline>, Target),
    /// Footnote; its content is block-level.
    Note(Vec<Block>),
    /// Raw content in the named output format.
    RawInline(String, String),
    /// Transient payload awaiting block-level splicing. Never encoded.
    Marker(Marker),
    /// Any other inline kind, carried unchanged.
    Other(Value),
}

impl Inline {
    /// Create a raw inline in the given format.
    #[must_use]
    pub fn raw(format: impl Into<String>, text: impl Into<String>) -> Self {
        Self::RawInline(format.into(), text.into())
    }

    /// Direct child list, if any. Image descriptions count as children.
    #[must_use]
    pub fn children(&self) -> Option<Content<'_>> {
        match self {
            Self::Emph(inlines)
            | Self::Underline(inlines)
            | Self::Strong(inlines)
            | Self::Strikeout(inlines)
            | Self::Superscript(inlines)
            | Self::Subscript(inlines)
            | Self::SmallCaps(inlines)
            | Self::Quoted(_, inlines)
            | Self::Cite(_, inlines)
            | Self::Span(_, inlines)
            | Self::Link(_, inlines, _)
            | Self::Image(_, inlines, _) => Some(Content::Inlines(inlines)),
            Self::Note(blocks) => Some(Content::Blocks(blocks)),
            Self::Str(_)
            | Self::Space
            | Self::SoftBreak
            | Self::LineBreak
            | Self::RawInline(..)
            | Self::Marker(_)
            | Self::Other(_) => None,
        }
    }

    /// Mutable counterpart of [`children`](Self::children).
    pub fn children_mut(&mut self) -> Option<ContentMut<'_>> {
        match self {
            Self::Emph(inlines)
            | Self::Underline(inlines)
            | Self::Strong(inlines)
            | Self::Strikeout(inlines)
            | Self::Superscript(inlines)
            | Self::Subscript(inlines)
            | Self::SmallCaps(inlines)
            | Self::Quoted(_, inlines)
            | Self::Cite(_, inlines)
            | Self::Span(_, inlines)
            | Self::Link(_, inlines, _)
            | Self::Image(_, inlines, _) => Some(ContentMut::Inlines(inlines)),
            Self::Note(blocks) => Some(ContentMut::Blocks(blocks)),
            Self::Str(_)
            | Self::Space
            | Self::SoftBreak
            | Self::LineBreak
            | Self::RawInline(..)
            | Self::Marker(_)
            | Self::Other(_) => None,
        }
    }

    /// Whether this inline is or contains a [`Marker`].
    #[must_use]
    pub fn contains_marker(&self) -> bool {
        matches!(self, Self::Marker(_)) || self.children().is_some_and(Content::contains_marker)
    }
}

/// Raw content staged inside inline content until its containing block is replaced.
///
/// A marker carries two renderings of the same payload: one valid at block
/// level and one valid inside inline content, for markers that end up outside
/// any replaceable block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    /// Output format identity of the payload (e.g., "opendocument").
    pub format: String,
    /// Payload rendered as block content.
    pub block: String,
    /// Payload rendered as inline content.
    pub inline: String,
}

impl Marker {
    /// Create a marker whose block and inline renderings are both `markup`.
    #[must_use]
    pub fn new(format: impl Into<String>, markup: impl Into<String>) -> Self {
        let block = markup.into();
        Self {
            format: format.into(),
            inline: block.clone(),
            block,
        }
    }

    /// Set a distinct inline rendering.
    #[must_use]
    pub fn with_inline(mut self, markup: impl Into<String>) -> Self {
        self.inline = markup.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_lookup() {
        let attr = Attr::default()
            .with_classes(["include", "wide"])
            .with_attribute("src", "a.fodt")
            .with_attribute("src", "b.fodt");

        assert!(attr.has_class("include"));
        assert!(!attr.has_class("inc"));
        assert_eq!(attr.get("src"), Some("a.fodt"));
        assert_eq!(attr.get("alt"), None);
    }

    #[test]
    fn test_contains_marker_nested() {
        let marker = Inline::Marker(Marker::new("opendocument", "<text:p/>"));
        let block = Block::BulletList(vec![vec![Block::Para(vec![Inline::Emph(vec![
            marker,
        ])])]]);

        assert!(block.contains_marker());
        assert!(!Block::Para(vec![Inline::Str("x".to_owned())]).contains_marker());
    }

    #[test]
    fn test_contains_marker_in_footnote_and_table() {
        let marker = || Inline::Marker(Marker::new("opendocument", "<text:p/>"));
        let note = Block::Para(vec![
            Inline::Str("text".to_owned()),
            Inline::Note(vec![Block::Plain(vec![marker()])]),
        ]);
        let table = Block::Table(Box::new(Table {
            bodies: vec![TableBody {
                body: vec![Row {
                    cells: vec![Cell {
                        content: vec![Block::Plain(vec![Inline::Superscript(vec![marker()])])],
                        ..Cell::default()
                    }],
                    ..Row::default()
                }],
                ..TableBody::default()
            }],
            ..Table::default()
        }));

        assert!(note.contains_marker());
        assert!(table.contains_marker());
    }

    #[test]
    fn test_children_in_document_order() {
        let term = vec![Inline::Str("term".to_owned())];
        let definition = vec![Block::Plain(vec![Inline::Str("def".to_owned())])];
        let block = Block::DefinitionList(vec![(term.clone(), vec![definition.clone()])]);

        let children = block.children();

        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], Content::Inlines(inlines) if inlines == term.as_slice()));
        assert!(matches!(children[1], Content::Blocks(blocks) if blocks == definition.as_slice()));
    }

    #[test]
    fn test_encode_rejects_marker() {
        let doc = Document::new(vec![Block::Para(vec![Inline::Marker(Marker::new(
            "opendocument",
            "x",
        ))])]);

        let err = doc.to_json_string().unwrap_err();
        assert!(matches!(err, AstError::UnsplicedMarker));
    }

    #[test]
    fn test_default_document() {
        let doc = Document::default();
        assert_eq!(doc.api_version, vec![1, 23, 1]);
        assert!(doc.blocks.is_empty());
        assert_eq!(doc.to_json_string().unwrap(), r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[]}"#);
    }
}
