//! Capture and restore of a request's addressing fields.

use http::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use http::{Request, Uri};

use super::{base_path, original_uri, set_base_path, set_original_uri};
use super::{X_FORWARDED_HOST, X_FORWARDED_PROTO};

/// Addressing fields of a request at one point in time.
///
/// Header fields hold every value the header carried; an empty list means
/// the header was absent, which is distinct from a present empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSnapshot {
    pub host: Vec<HeaderValue>,
    pub forwarded_host: Vec<HeaderValue>,
    pub forwarded_proto: Vec<HeaderValue>,
    pub base_path: String,
    pub original_uri: Uri,
    pub uri: Uri,
}

impl AddressSnapshot {
    /// Rebuild a body-less request carrying exactly these fields.
    pub fn to_request(&self) -> Request<()> {
        let mut req = Request::new(());
        restore(&mut req, self);
        req
    }
}

/// Read the addressing fields of `req`.
pub fn capture<B>(req: &Request<B>) -> AddressSnapshot {
    let headers = req.headers();
    AddressSnapshot {
        host: values(headers, &HOST),
        forwarded_host: values(headers, &X_FORWARDED_HOST),
        forwarded_proto: values(headers, &X_FORWARDED_PROTO),
        base_path: base_path(req).to_string(),
        original_uri: original_uri(req).clone(),
        uri: req.uri().clone(),
    }
}

/// Write `snapshot` back onto `req`.
///
/// Headers absent at capture time are removed rather than set empty, so
/// forwarding headers synthesized by a rewrite never leak onto a request
/// that arrived without them. Path fields are written unconditionally.
pub fn restore<B>(req: &mut Request<B>, snapshot: &AddressSnapshot) {
    let headers = req.headers_mut();
    put(headers, HOST, &snapshot.host);
    put(headers, X_FORWARDED_HOST, &snapshot.forwarded_host);
    put(headers, X_FORWARDED_PROTO, &snapshot.forwarded_proto);

    set_base_path(req, snapshot.base_path.clone());
    set_original_uri(req, snapshot.original_uri.clone());
    *req.uri_mut() = snapshot.uri.clone();
}

fn values(headers: &HeaderMap, name: &HeaderName) -> Vec<HeaderValue> {
    headers.get_all(name).iter().cloned().collect()
}

fn put(headers: &mut HeaderMap, name: HeaderName, values: &[HeaderValue]) {
    headers.remove(&name);
    for value in values {
        headers.append(name.clone(), value.clone());
    }
}
