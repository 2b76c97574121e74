//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Values without `${` are returned unchanged, so a bare `$` in a style name
/// or path is kept literally.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_STYLE", "Body Text");
        }
        let result = expand_env("${FOLIO_TEST_STYLE}", "include.default_style").unwrap();
        assert_eq!(result, "Body Text");
        unsafe {
            std::env::remove_var("FOLIO_TEST_STYLE");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_UNSET");
        }
        let result = expand_env("${FOLIO_TEST_UNSET:-shared}/includes", "include.search_dirs").unwrap();
        assert_eq!(result, "shared/includes");
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_MISSING");
        }
        let err = expand_env("${FOLIO_TEST_MISSING}", "include.class").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("FOLIO_TEST_MISSING"));
        assert!(err.to_string().contains("include.class"));
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        let result = expand_env("Style $1", "include.default_style").unwrap();
        assert_eq!(result, "Style $1");
    }
}
