//! Typed pandoc document tree for folio filters.
//!
//! Documents travel between pandoc and folio as pandoc's JSON AST. This crate
//! decodes that AST into [`Document`], lets a [`Filter`] rewrite it through
//! node-level callbacks, and encodes it back.
//!
//! # Architecture
//!
//! - [`Block`] and [`Inline`] model every kind that can hold other blocks or
//!   inlines, down to table cells and footnotes, so a traversal reaches all
//!   content. Leaf kinds without nested content (code, math, rules, ...) are
//!   carried verbatim as [`Block::Other`] / [`Inline::Other`] and round-trip
//!   unchanged. [`Block::children`] and [`Inline::children`] expose the child
//!   lists generically.
//! - [`Marker`] is a transient inline with no wire form. It exists between the
//!   two phases of a rewrite; encoding a tree that still holds one fails with
//!   [`AstError::UnsplicedMarker`].
//! - [`apply_filter`] drives the traversal: block callbacks run before their
//!   content is visited, image callbacks run for every image left in place, and
//!   [`Filter::document`] runs once after the whole tree was visited.
//!
//! # Example
//!
//! ```
//! use folio_ast::{Block, Document, Filter, Inline, apply_filter};
//!
//! struct Shout;
//!
//! impl Filter for Shout {
//!     fn para(&mut self, content: &[Inline]) -> Option<Block> {
//!         let text = folio_ast::stringify(content).to_uppercase();
//!         Some(Block::Para(vec![Inline::Str(text)]))
//!     }
//! }
//!
//! let json = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[
//!     {"t":"Para","c":[{"t":"Str","c":"hello"},{"t":"Space"},{"t":"Str","c":"world"}]}
//! ]}"#;
//! let mut doc = Document::from_json_str(json).unwrap();
//! apply_filter(&mut doc, &mut Shout);
//! assert_eq!(doc.blocks, vec![Block::Para(vec![Inline::Str("HELLO WORLD".to_owned())])]);
//! ```

mod error;
mod filter;
mod json;
mod node;
mod text;

pub use error::AstError;
pub use filter::{Filter, apply_filter};
pub use node::{
    Attr, Block, Caption, Cell, Content, ContentMut, Document, Inline, Marker, QuoteType, Row,
    Table, TableBody, TableSection, Target,
};
pub use text::stringify;
