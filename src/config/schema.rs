//! Configuration schema definitions.
//!
//! [`RewriteConfig`] is the raw, deserializable surface. It becomes a
//! [`Settings`] value after validation, which is what requests actually read.

use mime::Mime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Raw configuration for the camouflage middleware.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// Internal URL the backend runs under. Absent disables the middleware.
    pub url: Option<String>,

    /// Only requests accepting one of these media types are processed.
    #[serde(alias = "mediaTypes")]
    pub media_types: Option<Vec<String>>,

    /// Regular expression matched against the external URL; a match skips rewriting.
    pub ignore: Option<String>,

    /// Replace the internal URL in every response header value.
    #[serde(alias = "rewriteHeaders")]
    pub rewrite_headers: bool,

    /// Replace the internal URL in the response body.
    #[serde(alias = "rewriteContent")]
    pub rewrite_content: bool,
}

impl RewriteConfig {
    /// Config rewriting both headers and content for the given internal URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            rewrite_headers: true,
            rewrite_content: true,
            ..Self::default()
        }
    }

    /// Parse a config from TOML text. No semantic validation happens here.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Validated, compiled configuration.
///
/// Built once per middleware instance and shared by reference with every
/// request; nothing in here changes after construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The configured URL exactly as written. Used as the substitution needle.
    pub public_url: String,

    /// Parsed form of `public_url`.
    pub target: Url,

    /// `None` disables gating; an empty list turns every request away.
    pub media_types: Option<Vec<Mime>>,
    pub ignore: Option<Regex>,
    pub rewrite_headers: bool,
    pub rewrite_content: bool,
}

impl Settings {
    /// `host[:port]` of the internal URL; the port is omitted when it is the
    /// scheme default.
    pub fn target_host(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Scheme of the internal URL in `x-forwarded-proto` form (`http:`).
    pub fn target_proto(&self) -> String {
        format!("{}:", self.target.scheme())
    }

    /// Path component of the internal URL.
    pub fn target_path(&self) -> &str {
        self.target.path()
    }
}
