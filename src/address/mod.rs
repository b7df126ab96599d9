//! Request addressing: the fields that decide which URL a request believes
//! it was sent to, and the operations that move them between the public and
//! the internal address.
//!
//! # Data Flow
//! ```text
//! incoming request (public address)
//!     → absolute.rs (resolve the URL the client used, expose as OriginalUrl)
//!     → snapshot.rs (capture host / forwarded / path fields)
//!     → rewriter.rs (point the fields at the internal URL)
//!     → ... downstream handling ...
//!     → snapshot.rs (restore, on a retained head)
//!     → absolute.rs + origin.rs (public origin used as replacement)
//! ```
//!
//! # Fields
//! - `host`, `x-forwarded-host`, `x-forwarded-proto` request headers
//! - base path: the [`BasePath`] extension, prefix consumed by mounting
//! - original path: axum's [`OriginalUri`] extension, falling back to the URI
//! - request path: the request URI itself, which routing reads; never rewritten

pub mod absolute;
pub mod origin;
pub mod path;
pub mod rewriter;
pub mod snapshot;

use axum::extract::OriginalUri;
use http::header::HeaderName;
use http::{Request, Uri};

pub use absolute::{absolute_url, OriginalUrl};
pub use origin::{origin, origin_of};
pub use rewriter::rewrite;
pub use snapshot::{capture, restore, AddressSnapshot};

pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Path prefix already consumed before the request reached the current handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePath(pub String);

/// Base path of the request, empty when no mount recorded one.
pub fn base_path<B>(req: &Request<B>) -> &str {
    req.extensions()
        .get::<BasePath>()
        .map(|base| base.0.as_str())
        .unwrap_or("")
}

pub fn set_base_path<B>(req: &mut Request<B>, path: String) {
    req.extensions_mut().insert(BasePath(path));
}

/// Full path the request arrived with, before any routing stripped a prefix.
pub fn original_uri<B>(req: &Request<B>) -> &Uri {
    req.extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| req.uri())
}

pub fn set_original_uri<B>(req: &mut Request<B>, uri: Uri) {
    req.extensions_mut().insert(OriginalUri(uri));
}
