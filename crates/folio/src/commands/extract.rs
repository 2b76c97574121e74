//! `folio extract` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use folio_include::extract_body;

use crate::error::CliError;

/// Arguments for the extract command.
#[derive(Args)]
pub(crate) struct ExtractArgs {
    /// Fragment file to read.
    file: PathBuf,
}

impl ExtractArgs {
    /// Execute the extract command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let body = self.body()?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{body}")?;
        Ok(())
    }

    fn body(&self) -> Result<String, CliError> {
        let raw = std::fs::read_to_string(&self.file)?;
        extract_body(&raw)
            .map(str::to_owned)
            .ok_or_else(|| CliError::NoBody(self.file.clone()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_body() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.fodt");
        std::fs::write(&file, "<office:text> <text:p>A</text:p> </office:text>").unwrap();

        let body = ExtractArgs { file }.body().unwrap();

        assert_eq!(body, "<text:p>A</text:p>");
    }

    #[test]
    fn test_no_body() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.fodt");
        std::fs::write(&file, "<office:document/>").unwrap();

        let err = ExtractArgs { file }.body().unwrap_err();

        assert!(matches!(err, CliError::NoBody(_)));
    }
}
