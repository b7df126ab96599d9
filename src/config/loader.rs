//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{RewriteConfig, Settings};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RewriteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = RewriteConfig::from_toml(&content)?;

    compile(&config)?;

    Ok(config)
}

/// Validate and compile a config. `Ok(None)` means disabled.
pub fn compile(config: &RewriteConfig) -> Result<Option<Settings>, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
url = "http://example.com/base/"
mediaTypes = ["text/html"]
rewrite_headers = true
rewriteContent = true
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.url.as_deref(), Some("http://example.com/base/"));
        assert_eq!(config.media_types, Some(vec!["text/html".to_string()]));
        assert!(config.rewrite_headers);
        assert!(config.rewrite_content);
        assert!(config.ignore.is_none());
    }

    #[test]
    fn test_load_reports_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"url = "mailto:someone""#).unwrap();

        let err = load_config(file.path()).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/camouflage.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "url = [").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
