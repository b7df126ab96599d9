//! Resolution of the absolute URL a request is addressed to.

use http::header::{HeaderMap, HeaderName, HOST};
use http::Request;
use url::Url;

use super::{original_uri, X_FORWARDED_HOST, X_FORWARDED_PROTO};
use crate::error::AddressError;

/// The URL the client used, captured before the request was rewritten.
///
/// Inserted into the request extensions so handlers behind the middleware
/// can still see the public address; read it with `Extension<OriginalUrl>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalUrl(pub Url);

impl OriginalUrl {
    /// Wrap `url` with its query string removed.
    pub fn new(mut url: Url) -> Self {
        url.set_query(None);
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Absolute URL of `req` as currently addressed.
///
/// Scheme comes from `x-forwarded-proto`, then the URI scheme, then `http`.
/// Host comes from `x-forwarded-host`, then `host`, then the URI authority.
/// For list-valued forwarding headers the first entry wins.
pub fn absolute_url<B>(req: &Request<B>) -> Result<Url, AddressError> {
    let headers = req.headers();

    let scheme = match first_value(headers, &X_FORWARDED_PROTO, "x-forwarded-proto")? {
        Some(proto) => proto.trim_end_matches(':').to_ascii_lowercase(),
        None => req.uri().scheme_str().unwrap_or("http").to_string(),
    };

    let host = match first_value(headers, &X_FORWARDED_HOST, "x-forwarded-host")? {
        Some(host) => host,
        None => match first_value(headers, &HOST, "host")? {
            Some(host) => host,
            None => req
                .uri()
                .authority()
                .map(|authority| match authority.port_u16() {
                    Some(port) => format!("{}:{}", authority.host(), port),
                    None => authority.host().to_string(),
                })
                .ok_or(AddressError::MissingHost)?,
        },
    };

    let path = original_uri(req)
        .path_and_query()
        .map(|pq| pq.as_str())
        .filter(|pq| pq.starts_with('/'))
        .unwrap_or("/");

    Ok(Url::parse(&format!("{}://{}{}", scheme, host, path))?)
}

fn first_value(
    headers: &HeaderMap,
    name: &HeaderName,
    label: &'static str,
) -> Result<Option<String>, AddressError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AddressError::InvalidHeader(label))?;
    Ok(value
        .split(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
        .map(str::to_string))
}
