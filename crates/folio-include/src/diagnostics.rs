//! Diagnostic sink for unresolved references.

use std::fmt;

use crate::ResolveError;

/// Classification of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No candidate path exists, or the file could not be read.
    FileNotFound,
    /// The file exists with an unsupported extension.
    UnsupportedFormat,
    /// The file lacks the root text container tags.
    ExtractionFailure,
    /// An include reference without a source path.
    MissingSource,
    /// Pseudo-block text without a recoverable source path.
    MalformedAttributes,
    /// A marker outside any replaceable block fell back to inline content.
    MarkerOutsideParagraph,
}

impl DiagnosticKind {
    /// Short identifier used in log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileNotFound => "file-not-found",
            Self::UnsupportedFormat => "unsupported-format",
            Self::ExtractionFailure => "extraction-failure",
            Self::MissingSource => "missing-source",
            Self::MalformedAttributes => "malformed-attributes",
            Self::MarkerOutsideParagraph => "marker-outside-paragraph",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Reference path involved, if any.
    pub reference: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Collected diagnostics of one document run.
///
/// Every report is also emitted as a `tracing` warning.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        reference: Option<&str>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        tracing::warn!(kind = kind.as_str(), reference, "{message}");
        self.entries.push(Diagnostic {
            kind,
            reference: reference.map(str::to_owned),
            message,
        });
    }

    /// Record a resolution failure.
    pub fn report_error(&mut self, reference: Option<&str>, error: &ResolveError) {
        self.report(error.kind(), reference, error.to_string());
    }

    /// All recorded diagnostics in report order.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics of the given kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}
