//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the internal URL is absolute, hierarchical and http(s)
//! - Compile the ignore pattern and media types
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RewriteConfig → Result<Option<Settings>, Vec<ValidationError>>
//! - Runs before the middleware accepts any request

use mime::Mime;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::config::schema::{RewriteConfig, Settings};

/// A single semantic problem found in a [`RewriteConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("url `{url}` is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("url `{0}` has no host")]
    MissingHost(String),

    #[error("url `{url}` uses unsupported scheme `{scheme}`")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("url `{0}` must not carry credentials")]
    Credentials(String),

    #[error("ignore pattern `{pattern}` does not compile: {reason}")]
    InvalidIgnorePattern { pattern: String, reason: String },

    #[error("media type `{0}` is not a valid MIME type")]
    InvalidMediaType(String),
}

/// Validate a config and compile it.
///
/// `Ok(None)` means the config is valid but has no `url`, i.e. the
/// middleware is disabled.
pub fn validate_config(config: &RewriteConfig) -> Result<Option<Settings>, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let target = config.url.as_deref().and_then(|raw| match check_url(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            errors.push(e);
            None
        }
    });

    let ignore = config.ignore.as_deref().and_then(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            errors.push(ValidationError::InvalidIgnorePattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            });
            None
        }
    });

    let media_types = config.media_types.as_ref().map(|raw_types| {
        raw_types
            .iter()
            .filter_map(|raw| match raw.trim().parse::<Mime>() {
                Ok(mime) => Some(mime),
                Err(_) => {
                    errors.push(ValidationError::InvalidMediaType(raw.clone()));
                    None
                }
            })
            .collect::<Vec<_>>()
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    let (Some(public_url), Some(target)) = (config.url.clone(), target) else {
        return Ok(None);
    };

    Ok(Some(Settings {
        public_url,
        target,
        media_types,
        ignore,
        rewrite_headers: config.rewrite_headers,
        rewrite_content: config.rewrite_content,
    }))
}

fn check_url(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: url.scheme().to_string(),
        });
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::MissingHost(raw.to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ValidationError::Credentials(raw.to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_disables() {
        let settings = validate_config(&RewriteConfig::default()).unwrap();
        assert!(settings.is_none());
    }

    #[test]
    fn test_valid_config_compiles() {
        let config = RewriteConfig {
            url: Some("http://example.com:4321/base/".into()),
            media_types: Some(vec!["application/json".into(), "text/html".into()]),
            ignore: Some("^https://example\\.org/static/".into()),
            rewrite_headers: true,
            rewrite_content: false,
        };

        let settings = validate_config(&config).unwrap().unwrap();
        assert_eq!(settings.public_url, "http://example.com:4321/base/");
        assert_eq!(settings.target_host(), "example.com:4321");
        assert_eq!(settings.target_proto(), "http:");
        assert_eq!(settings.target_path(), "/base/");
        assert_eq!(settings.media_types.as_ref().map(Vec::len), Some(2));
        assert!(settings.ignore.is_some());
        assert!(settings.rewrite_headers);
        assert!(!settings.rewrite_content);
    }

    #[test]
    fn test_default_port_is_omitted() {
        let config = RewriteConfig::for_url("https://example.com:443/");
        let settings = validate_config(&config).unwrap().unwrap();
        assert_eq!(settings.target_host(), "example.com");
        assert_eq!(settings.target_proto(), "https:");
    }

    #[test]
    fn test_collects_every_error() {
        let config = RewriteConfig {
            url: Some("not a url".into()),
            media_types: Some(vec!["json".into()]),
            ignore: Some("(unclosed".into()),
            ..RewriteConfig::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::InvalidUrl { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidIgnorePattern { .. }));
        assert_eq!(errors[2], ValidationError::InvalidMediaType("json".into()));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let errors = validate_config(&RewriteConfig::for_url("ftp://example.com/")).unwrap_err();
        assert!(matches!(errors[0], ValidationError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_rejects_credentials() {
        let errors =
            validate_config(&RewriteConfig::for_url("http://user:pw@example.com/")).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Credentials("http://user:pw@example.com/".into())]
        );
    }
}
