//! Error types for document decoding and encoding.

/// Error raised while reading or writing a pandoc JSON document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AstError {
    /// The input is not valid JSON, or writing the output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node of a known kind does not have the expected shape.
    #[error("malformed {kind} node: {message}")]
    Malformed {
        /// Node kind (e.g., "Image", "Attr").
        kind: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A [`Marker`](crate::Marker) survived to encoding time.
    #[error("document still contains an unspliced include marker")]
    UnsplicedMarker,
}

impl AstError {
    pub(crate) fn malformed(kind: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            message: message.into(),
        }
    }
}
