//! Fragment transclusion for pandoc documents targeting OpenDocument.
//!
//! Authors reference reusable `.fodt` fragments from markdown; this crate
//! finds those references in a [`folio_ast::Document`], extracts each
//! fragment's body and splices it into the tree as raw OpenDocument markup.
//! A reference that cannot be resolved always leaves a visible placeholder.
//!
//! # Reference syntaxes
//!
//! - Container block: `::: {.include src="resources/includes/note.fodt"} :::`
//!   parsed by the host as a `Div`.
//! - Image: `![Icon](resources/includes/icon.fodt)` anywhere in inline content.
//! - Nested image: the same image inside a paragraph; the whole paragraph is
//!   replaced.
//! - Literal pseudo-block: the container syntax left as paragraph text when the
//!   host did not recognise fenced divs.
//!
//! # Architecture
//!
//! - [`FragmentLocator`]: maps a reference path to a fragment file
//! - [`extract_body`]: isolates the reusable body of a fragment
//! - [`Scanner`]: recognises the four syntaxes and yields a [`Reference`]
//! - [`Resolver`]: locate, extract, or fall back to a [`Placeholder`]
//! - [`splice_markers`]: second phase replacing blocks that hold markers
//! - [`IncludeFilter`]: the [`folio_ast::Filter`] tying it together
//!
//! # Example
//!
//! ```
//! use folio_ast::{Attr, Block, Document};
//! use folio_include::{IncludeSettings, process_document};
//!
//! let mut doc = Document::new(vec![Block::Div(
//!     Attr::default().with_classes(["include"]),
//!     Vec::new(),
//! )]);
//! let diagnostics = process_document(&mut doc, IncludeSettings::default());
//!
//! assert_eq!(
//!     doc.blocks,
//!     vec![Block::raw(
//!         "opendocument",
//!         r#"<text:p text:style-name="Default Paragraph Style">«INCLUDE:missing-src»</text:p>"#,
//!     )]
//! );
//! assert_eq!(diagnostics.len(), 1);
//! ```

mod cache;
mod diagnostics;
mod error;
mod extract;
mod filter;
mod locator;
mod placeholder;
mod reference;
mod resolve;
mod scanner;
mod settings;
mod splice;

pub use cache::{ContentDigest, FragmentCache, MemoryFragmentCache, NullFragmentCache};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::ResolveError;
pub use extract::extract_body;
pub use filter::{IncludeFilter, process_document};
pub use locator::{FragmentLocator, working_dir};
pub use placeholder::Placeholder;
pub use reference::{Reference, ReferenceSyntax, ResultShape};
pub use resolve::{Replacement, Resolution, Resolver};
pub use scanner::{AttrList, ScanNode, Scanner};
pub use settings::{
    DEFAULT_CLASS, DEFAULT_EXTENSION, DEFAULT_RAW_FORMAT, DEFAULT_RESERVED_PREFIX, DEFAULT_STYLE,
    IncludeSettings,
};
pub use splice::{SpliceReport, splice_markers};
