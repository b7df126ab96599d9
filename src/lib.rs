//! Camouflage rewriting middleware.
//!
//! Lets a backend that is reachable internally under one base URL appear
//! externally under the URL the client used. Inbound requests are pointed at
//! the internal URL; outbound responses have the internal URL replaced by the
//! public origin in headers and, while streaming, in the body.

pub mod address;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod stream;

pub use address::{absolute_url, capture, origin, restore, rewrite, AddressSnapshot, BasePath, OriginalUrl};
pub use config::{load_config, RewriteConfig, Settings};
pub use error::{AddressError, ConfigError, Error, StreamError};
pub use crate::http::{Camouflage, CamouflageLayer};
pub use stream::{RewriteBody, Substitution};
