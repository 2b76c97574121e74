//! `folio filter` command implementation.

use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Args;
use folio_ast::Document;
use folio_config::{CliSettings, Config};
use folio_include::{Diagnostics, process_document};

use crate::error::CliError;
use crate::output::Output;

/// Output formats that carry OpenDocument raw content.
const OPENDOCUMENT_FORMATS: &[&str] = &["odt", "opendocument", "fodt"];

/// Arguments for the filter command.
#[derive(Args)]
pub(crate) struct FilterArgs {
    /// Target output format (passed by pandoc).
    format: Option<String>,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Additional fragment search directory (repeatable).
    #[arg(long = "search-dir", value_name = "DIR")]
    search_dirs: Vec<PathBuf>,

    /// Enable the fragment cache (default: from config).
    #[arg(long)]
    cache: bool,

    /// Disable the fragment cache.
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,

    /// Enable verbose output (log every resolved include).
    #[arg(short, long)]
    pub verbose: bool,
}

impl FilterArgs {
    /// Execute the filter command on stdin/stdout.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let stdin = io::stdin().lock();
        let stdout = io::stdout().lock();
        let diagnostics = self.run(stdin, BufWriter::new(stdout))?;

        let output = Output::new();
        for diagnostic in diagnostics.warnings() {
            output.warning(&format!("warning: {diagnostic}"));
        }
        Ok(())
    }

    /// Read a document from `input`, resolve includes, and write it to `output`.
    fn run(self, input: impl Read, mut output: impl Write) -> Result<Diagnostics, CliError> {
        let cli_settings = CliSettings {
            search_dirs: (!self.search_dirs.is_empty()).then_some(self.search_dirs),
            cache_enabled: self.no_cache.then_some(false).or(self.cache.then_some(true)),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(format) = &self.format
            && !is_opendocument(format)
        {
            tracing::warn!(format, "Target format is not OpenDocument, spliced includes will be dropped");
        }

        let mut doc = Document::from_reader(input)?;
        let diagnostics = process_document(&mut doc, config.include_settings());
        doc.to_writer(&mut output)?;
        output.flush()?;

        Ok(diagnostics)
    }
}

fn is_opendocument(format: &str) -> bool {
    // pandoc passes extensions as `odt+smart`
    let base = format.split(['+', '-']).next().unwrap_or(format);
    OPENDOCUMENT_FORMATS.contains(&base)
}
