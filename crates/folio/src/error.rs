//! CLI error types.

use std::path::PathBuf;

use folio_ast::AstError;
use folio_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pandoc document: {0}")]
    Document(#[from] AstError),

    #[error("no document body found in {}", .0.display())]
    NoBody(PathBuf),
}
