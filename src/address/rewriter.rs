//! Point a request's addressing fields at the internal URL.

use http::header::{HeaderValue, HOST};
use http::uri::PathAndQuery;
use http::{Request, Uri};

use super::path::join_paths;
use super::{base_path, original_uri, set_base_path, set_original_uri};
use super::{X_FORWARDED_HOST, X_FORWARDED_PROTO};
use crate::config::Settings;
use crate::error::AddressError;

/// Rewrite `req` so downstream handling sees the internal URL.
///
/// Host and forwarding headers are replaced; the internal path is prefixed
/// onto the base path and the original path. The request URI (what routing
/// matches on) is left alone. Not idempotent: a second call prefixes again.
pub fn rewrite<B>(settings: &Settings, req: &mut Request<B>) -> Result<(), AddressError> {
    let host = HeaderValue::from_str(&settings.target_host())
        .map_err(|_| AddressError::InvalidHeader("host"))?;
    let proto = HeaderValue::from_str(&settings.target_proto())
        .map_err(|_| AddressError::InvalidHeader("x-forwarded-proto"))?;

    let prefix = settings.target_path();
    let base = join_paths(prefix, base_path(req));
    let original = prefix_uri(prefix, original_uri(req))?;

    let headers = req.headers_mut();
    headers.insert(HOST, host.clone());
    headers.insert(X_FORWARDED_HOST, host);
    headers.insert(X_FORWARDED_PROTO, proto);

    set_base_path(req, base);
    set_original_uri(req, original);
    Ok(())
}

/// Prefix the path of `uri` with `prefix`; the query is carried over untouched.
fn prefix_uri(prefix: &str, uri: &Uri) -> Result<Uri, AddressError> {
    let mut joined = join_paths(prefix, uri.path());
    if let Some(query) = uri.query() {
        joined.push('?');
        joined.push_str(query);
    }

    let path_and_query = PathAndQuery::try_from(joined)
        .map_err(|_| AddressError::InvalidHeader("original path"))?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).map_err(|_| AddressError::InvalidHeader("original path"))
}
