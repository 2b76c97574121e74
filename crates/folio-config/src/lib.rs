//! Configuration management for folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields: every string in the `[include]` section, including each
//! entry of `include.search_dirs`.

mod expand;

use std::path::{Path, PathBuf};

use folio_include::{
    DEFAULT_CLASS, DEFAULT_EXTENSION, DEFAULT_RAW_FORMAT, DEFAULT_RESERVED_PREFIX, DEFAULT_STYLE,
    IncludeSettings,
};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Extra search directories, tried before configured ones.
    pub search_dirs: Option<Vec<PathBuf>>,
    /// Override fragment cache flag.
    pub cache_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Include configuration as parsed from TOML.
    include: IncludeConfigRaw,

    /// Resolved include configuration (set after loading).
    #[serde(skip)]
    pub include_resolved: IncludeConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw `[include]` section (paths as strings).
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct IncludeConfigRaw {
    class: Option<String>,
    extension: Option<String>,
    reserved_prefix: Option<String>,
    default_style: Option<String>,
    raw_format: Option<String>,
    search_dirs: Option<Vec<String>>,
    cache: Option<bool>,
}

/// Resolved include configuration with absolute search directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeConfig {
    /// Class marking include containers.
    pub class: String,
    /// Fragment file extension, without the dot.
    pub extension: String,
    /// Reserved directory prefix for image-syntax includes.
    pub reserved_prefix: String,
    /// Placeholder style when a reference names none.
    pub default_style: String,
    /// Raw format identity of spliced content.
    pub raw_format: String,
    /// Directories tried after the working directory.
    pub search_dirs: Vec<PathBuf>,
    /// Whether extracted fragments are cached.
    pub cache_enabled: bool,
}

impl Default for IncludeConfig {
    fn default() -> Self {
        Self {
            class: DEFAULT_CLASS.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_owned(),
            default_style: DEFAULT_STYLE.to_owned(),
            raw_format: DEFAULT_RAW_FORMAT.to_owned(),
            search_dirs: Vec::new(),
            cache_enabled: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`include.default_style`").
        field: String,
        /// Error message (e.g., "${`BOOK_STYLE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and path resolution, so CLI
    /// arguments take precedence over config file values.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Settings for the include filter.
    #[must_use]
    pub fn include_settings(&self) -> IncludeSettings {
        let resolved = &self.include_resolved;
        let mut settings = IncludeSettings::new()
            .with_search_dirs(resolved.search_dirs.clone())
            .with_cache(resolved.cache_enabled)
            .with_default_style(resolved.default_style.clone());
        settings.class.clone_from(&resolved.class);
        settings.extension.clone_from(&resolved.extension);
        settings.reserved_prefix.clone_from(&resolved.reserved_prefix);
        settings.raw_format.clone_from(&resolved.raw_format);
        settings
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let include = &self.include_resolved;
        require_non_empty(&include.class, "include.class")?;
        require_non_empty(&include.extension, "include.extension")?;
        require_non_empty(&include.default_style, "include.default_style")?;
        require_non_empty(&include.raw_format, "include.raw_format")?;

        if include.extension.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "include.extension must not start with a dot (use \"{}\")",
                include.extension.trim_start_matches('.')
            )));
        }
        if include.class.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "include.class cannot contain whitespace".to_owned(),
            ));
        }

        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dirs) = &settings.search_dirs {
            let mut search_dirs = dirs.clone();
            search_dirs.append(&mut self.include_resolved.search_dirs);
            self.include_resolved.search_dirs = search_dirs;
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.include_resolved.cache_enabled = cache_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let include = &mut self.include;
        for (value, field) in [
            (&mut include.class, "include.class"),
            (&mut include.extension, "include.extension"),
            (&mut include.reserved_prefix, "include.reserved_prefix"),
            (&mut include.default_style, "include.default_style"),
            (&mut include.raw_format, "include.raw_format"),
        ] {
            if let Some(v) = value {
                *v = expand::expand_env(v, field)?;
            }
        }
        for dir in include.search_dirs.iter_mut().flatten() {
            *dir = expand::expand_env(dir, "include.search_dirs")?;
        }
        Ok(())
    }

    /// Fill the resolved section, joining search directories onto the config directory.
    fn resolve(&mut self, config_dir: &Path) {
        let raw = &self.include;
        let defaults = IncludeConfig::default();
        self.include_resolved = IncludeConfig {
            class: raw.class.clone().unwrap_or(defaults.class),
            extension: raw.extension.clone().unwrap_or(defaults.extension),
            reserved_prefix: raw.reserved_prefix.clone().unwrap_or(defaults.reserved_prefix),
            default_style: raw.default_style.clone().unwrap_or(defaults.default_style),
            raw_format: raw.raw_format.clone().unwrap_or(defaults.raw_format),
            search_dirs: raw
                .search_dirs
                .iter()
                .flatten()
                .map(|d| config_dir.join(d))
                .collect(),
            cache_enabled: raw.cache.unwrap_or(defaults.cache_enabled),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn parse(toml: &str, dir: &Path) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(dir);
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        let include = &config.include_resolved;
        assert_eq!(include.class, "include");
        assert_eq!(include.extension, "fodt");
        assert_eq!(include.reserved_prefix, "resources/includes/");
        assert_eq!(include.default_style, "Default Paragraph Style");
        assert_eq!(include.raw_format, "opendocument");
        assert!(include.search_dirs.is_empty());
        assert!(!include.cache_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse("", Path::new("/book"));
        assert_eq!(config.include_resolved, IncludeConfig::default());
    }

    #[test]
    fn test_parse_include_section() {
        let toml = r#"
[include]
class = "transclude"
default_style = "Body Text"
search_dirs = ["shared", "/opt/fragments"]
cache = true
"#;
        let config = parse(toml, Path::new("/book"));
        let include = &config.include_resolved;

        assert_eq!(include.class, "transclude");
        assert_eq!(include.default_style, "Body Text");
        assert_eq!(
            include.search_dirs,
            vec![PathBuf::from("/book/shared"), PathBuf::from("/opt/fragments")]
        );
        assert!(include.cache_enabled);
        assert_eq!(include.extension, "fodt");
    }

    #[test]
    fn test_unknown_include_key_rejected() {
        let result: Result<Config, _> = toml::from_str("[include]\nsrc_dir = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_include_settings_conversion() {
        let toml = r#"
[include]
extension = "xml"
reserved_prefix = "fragments/"
raw_format = "odt"
"#;
        let settings = parse(toml, Path::new("/book")).include_settings();

        assert_eq!(settings.extension, "xml");
        assert_eq!(settings.reserved_prefix, "fragments/");
        assert_eq!(settings.raw_format, "odt");
        assert_eq!(settings.class, "include");
        assert!(settings.working_dir.is_none());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = parse(
            "[include]\nsearch_dirs = [\"shared\"]\n",
            Path::new("/book"),
        );

        config.apply_cli_settings(&CliSettings {
            search_dirs: Some(vec![PathBuf::from("/cli")]),
            cache_enabled: Some(true),
        });

        assert_eq!(
            config.include_resolved.search_dirs,
            vec![PathBuf::from("/cli"), PathBuf::from("/book/shared")]
        );
        assert!(config.include_resolved.cache_enabled);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.include_resolved, IncludeConfig::default());
    }

    #[test]
    fn test_validate_extension_with_dot() {
        let config = parse("[include]\nextension = \".fodt\"\n", Path::new("."));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("include.extension"));
    }

    #[test]
    fn test_validate_empty_class() {
        let config = parse("[include]\nclass = \"\"\n", Path::new("."));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("include.class cannot be empty"));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_SHARED", "/srv/shared");
        }

        let mut config: Config = toml::from_str(
            "[include]\nsearch_dirs = [\"${FOLIO_TEST_SHARED}/includes\"]\ndefault_style = \"${FOLIO_TEST_NO_STYLE:-Text Body}\"\n",
        )
        .unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/book"));

        assert_eq!(
            config.include_resolved.search_dirs,
            vec![PathBuf::from("/srv/shared/includes")]
        );
        assert_eq!(config.include_resolved.default_style, "Text Body");

        unsafe {
            std::env::remove_var("FOLIO_TEST_SHARED");
        }
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("folio.toml");
        std::fs::write(&path, "[include]\nsearch_dirs = [\"frag\"]\n").unwrap();

        let config = Config::load(
            Some(&path),
            Some(&CliSettings {
                cache_enabled: Some(true),
                ..Default::default()
            }),
        )
        .unwrap();

        assert_eq!(config.config_path, Some(path));
        assert_eq!(
            config.include_resolved.search_dirs,
            vec![temp.path().join("frag")]
        );
        assert!(config.include_resolved.cache_enabled);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/folio.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("folio.toml");
        std::fs::write(&path, "[include\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
