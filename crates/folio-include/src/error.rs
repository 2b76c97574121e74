//! Resolution failure kinds.

use std::io;
use std::path::PathBuf;

use crate::diagnostics::DiagnosticKind;

/// Reason a reference could not be resolved to a fragment body.
///
/// Never crosses the crate boundary as a hard failure: the resolver turns each
/// of these into a placeholder plus a [`Diagnostic`](crate::Diagnostic).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// No candidate path exists.
    #[error("fragment not found: {reference} (searched {})", display_paths(.searched))]
    NotFound {
        /// Path as written by the author.
        reference: String,
        /// Candidates tried, in order.
        searched: Vec<PathBuf>,
    },

    /// A candidate exists but is not a supported fragment file.
    #[error("unsupported fragment format: {} (expected .{expected})", .path.display())]
    UnsupportedFormat {
        /// Existing file with the wrong extension.
        path: PathBuf,
        /// Supported extension.
        expected: String,
    },

    /// The fragment file could not be read.
    #[error("failed to read fragment {}", .path.display())]
    Read {
        /// Fragment file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The fragment file lacks the root text container tags.
    #[error("no document body found in {}", .path.display())]
    Extraction {
        /// Fragment file.
        path: PathBuf,
    },

    /// An include reference without a source path.
    #[error("include reference has no source path")]
    MissingSource,

    /// Literal pseudo-block text with no recoverable source path.
    #[error("could not recover a source path from {text:?}")]
    MalformedAttributes {
        /// Paragraph text that looked like an include.
        text: String,
    },
}

impl ResolveError {
    /// Diagnostic classification of this error.
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::NotFound { .. } => DiagnosticKind::FileNotFound,
            Self::UnsupportedFormat { .. } => DiagnosticKind::UnsupportedFormat,
            Self::Read { .. } => DiagnosticKind::FileNotFound,
            Self::Extraction { .. } => DiagnosticKind::ExtractionFailure,
            Self::MissingSource => DiagnosticKind::MissingSource,
            Self::MalformedAttributes { .. } => DiagnosticKind::MalformedAttributes,
        }
    }

    /// Whether the placeholder for this error omits the reference path.
    #[must_use]
    pub fn omits_path(&self) -> bool {
        matches!(self, Self::MissingSource | Self::MalformedAttributes { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_candidates() {
        let err = ResolveError::NotFound {
            reference: "a.fodt".to_owned(),
            searched: vec![PathBuf::from("a.fodt"), PathBuf::from("/work/a.fodt")],
        };

        assert_eq!(
            err.to_string(),
            "fragment not found: a.fodt (searched a.fodt, /work/a.fodt)"
        );
        assert_eq!(err.kind(), DiagnosticKind::FileNotFound);
        assert!(!err.omits_path());
    }

    #[test]
    fn test_read_error_counts_as_not_found() {
        let err = ResolveError::Read {
            path: PathBuf::from("a.fodt"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };

        assert_eq!(err.kind(), DiagnosticKind::FileNotFound);
    }

    #[test]
    fn test_stripped_variants() {
        assert!(ResolveError::MissingSource.omits_path());
        assert!(
            ResolveError::MalformedAttributes {
                text: "::: {.include} :::".to_owned()
            }
            .omits_path()
        );
    }
}
