//! Include resolution settings.

use std::path::PathBuf;

/// Class marking a container block as an include.
pub const DEFAULT_CLASS: &str = "include";

/// Extension of the supported fragment format (flat OpenDocument text).
pub const DEFAULT_EXTENSION: &str = "fodt";

/// Directory prefix an image path must lie under to be treated as an include.
pub const DEFAULT_RESERVED_PREFIX: &str = "resources/includes/";

/// Paragraph style used when a reference names none.
pub const DEFAULT_STYLE: &str = "Default Paragraph Style";

/// Raw format identity attached to spliced markup.
pub const DEFAULT_RAW_FORMAT: &str = "opendocument";

/// Settings shared by the locator, scanner and resolver.
#[derive(Clone, Debug)]
pub struct IncludeSettings {
    /// Class marking include containers (`{.include}`).
    pub class: String,
    /// Supported fragment extension, without the leading dot.
    pub extension: String,
    /// Reserved directory prefix for image-syntax includes.
    pub reserved_prefix: String,
    /// Style applied when a reference has no `style` attribute.
    pub default_style: String,
    /// Raw format identity of spliced content.
    pub raw_format: String,
    /// Base directory for relative references.
    ///
    /// Default: the process working directory.
    pub working_dir: Option<PathBuf>,
    /// Additional directories tried after the working directory.
    pub search_dirs: Vec<PathBuf>,
    /// Cache extracted bodies by path and modification time.
    pub cache_enabled: bool,
}

impl Default for IncludeSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl IncludeSettings {
    /// Create settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            class: DEFAULT_CLASS.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_owned(),
            default_style: DEFAULT_STYLE.to_owned(),
            raw_format: DEFAULT_RAW_FORMAT.to_owned(),
            working_dir: None,
            search_dirs: Vec::new(),
            cache_enabled: false,
        }
    }

    /// Set the base directory for relative references.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the additional search directories.
    #[must_use]
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    /// Enable or disable the fragment cache.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the default paragraph style.
    #[must_use]
    pub fn with_default_style(mut self, style: impl Into<String>) -> Self {
        self.default_style = style.into();
        self
    }
}
