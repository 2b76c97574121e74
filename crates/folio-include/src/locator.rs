//! Fragment file lookup.

use std::env;
use std::path::{Path, PathBuf};

use crate::{IncludeSettings, ResolveError};

/// Process working directory.
///
/// Falls back to `$PWD`, then to `.`, when the platform query fails.
#[must_use]
pub fn working_dir() -> PathBuf {
    env::current_dir()
        .ok()
        .or_else(|| env::var_os("PWD").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolves reference paths to fragment files on disk.
///
/// Candidates, in order: the path as written, the path joined onto the
/// working directory, then the path joined onto each search directory.
#[derive(Clone, Debug)]
pub struct FragmentLocator {
    base: PathBuf,
    search_dirs: Vec<PathBuf>,
    extension: String,
}

impl FragmentLocator {
    /// Create a locator from include settings.
    #[must_use]
    pub fn new(settings: &IncludeSettings) -> Self {
        Self {
            base: settings.working_dir.clone().unwrap_or_else(working_dir),
            search_dirs: settings.search_dirs.clone(),
            extension: settings.extension.clone(),
        }
    }

    /// Candidate paths for a reference, in lookup order.
    #[must_use]
    pub fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        let literal = PathBuf::from(reference);
        let mut candidates = vec![literal.clone()];
        if literal.is_relative() {
            for dir in std::iter::once(&self.base).chain(&self.search_dirs) {
                let joined = dir.join(&literal);
                if !candidates.contains(&joined) {
                    candidates.push(joined);
                }
            }
        }
        candidates
    }

    /// Find the fragment file for a reference path.
    ///
    /// A missing file is an ordinary outcome reported as [`ResolveError::NotFound`];
    /// an existing file with another extension is [`ResolveError::UnsupportedFormat`]
    /// unless a later candidate succeeds.
    pub fn locate(&self, reference: &str) -> Result<PathBuf, ResolveError> {
        let candidates = self.candidates(reference);
        let mut wrong_format = None;

        for candidate in &candidates {
            if !candidate.is_file() {
                continue;
            }
            if self.has_supported_extension(candidate) {
                tracing::debug!(reference, path = %candidate.display(), "Located fragment");
                return Ok(candidate.clone());
            }
            wrong_format.get_or_insert_with(|| candidate.clone());
        }

        match wrong_format {
            Some(path) => Err(ResolveError::UnsupportedFormat {
                path,
                expected: self.extension.clone(),
            }),
            None => Err(ResolveError::NotFound {
                reference: reference.to_owned(),
                searched: candidates,
            }),
        }
    }

    /// Whether a path carries the supported fragment extension (case-insensitive).
    #[must_use]
    pub fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}
