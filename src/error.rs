//! Crate-level error definitions.
//!
//! Each subsystem owns its error enum; [`Error`] wraps them for callers that
//! only want a single type.

use thiserror::Error;

pub use crate::config::loader::ConfigError;

/// Boxed error used for opaque body failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while reading or resolving request addressing fields.
#[derive(Debug, Error)]
pub enum AddressError {
    /// A URL (configured or derived from headers) failed to parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Neither `x-forwarded-host`, `host` nor the URI authority is present.
    #[error("request carries no host information")]
    MissingHost,

    /// A header value is not visible ASCII.
    #[error("header {0} is not valid text")]
    InvalidHeader(&'static str),

    /// The URL has no hierarchical origin (e.g. `mailto:` or `data:`).
    #[error("URL has no origin: {0}")]
    Opaque(String),
}

/// Failure of the upstream body while it is being streamed through a rewrite.
///
/// The response cannot be replayed once partially sent, so this terminates
/// the exchange.
#[derive(Debug, Error)]
#[error("response body stream failed: {source}")]
pub struct StreamError {
    #[source]
    source: BoxError,
}

impl StreamError {
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Umbrella error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteConfig;
    use crate::CamouflageLayer;

    #[test]
    fn test_subsystem_errors_convert() {
        let err: Error = CamouflageLayer::new(&RewriteConfig::for_url("ftp://example.com/"))
            .map(|_| ())
            .map_err(Error::from)
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Validation(_))));
        assert!(err.to_string().contains("unsupported scheme"));

        let err = Error::from(StreamError::new(std::io::Error::other("connection reset")));
        assert_eq!(err.to_string(), "response body stream failed: connection reset");
    }
}
