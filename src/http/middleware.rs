//! The camouflage middleware.
//!
//! Makes a backend that runs under an internal URL answer as if it lived at
//! the URL the client actually used. Requests are rewritten towards the
//! internal URL on the way in; on the way out, occurrences of the internal
//! URL in headers and body are replaced by the public origin.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use camouflage_rewrite::{CamouflageLayer, RewriteConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layer = CamouflageLayer::new(&RewriteConfig::for_url("http://backend.internal/app/"))?;
//! let app: Router = Router::new()
//!     .route("/{*path}", get(|| async { "see http://backend.internal/app/docs" }))
//!     .layer(layer);
//! # Ok(()) }
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::{HeaderMap, CONTENT_ENCODING};
use http::{Request, Response};
use tower::{Layer, Service};

use super::headers::replace_in_values;
use super::interceptor::{InterceptFuture, InterceptHandler, Intercepted};
use super::negotiate::accepts_any;
use crate::address::{absolute_url, capture, origin_of, restore, rewrite, AddressSnapshot, OriginalUrl};
use crate::config::{loader::compile, ConfigError, RewriteConfig, Settings};
use crate::observability::metrics::{self, Outcome};
use crate::stream::{RewriteBody, Substitution};

/// Layer that applies [`Camouflage`].
#[derive(Debug, Clone)]
pub struct CamouflageLayer {
    settings: Option<Arc<Settings>>,
}

impl CamouflageLayer {
    /// Validate `config` and build the layer.
    ///
    /// A config without `url` yields a layer that passes everything through.
    pub fn new(config: &RewriteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            settings: compile(config)?.map(Arc::new),
        })
    }

    /// Layer that never rewrites anything.
    pub fn disabled() -> Self {
        Self { settings: None }
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_deref()
    }
}

impl<S> Layer<S> for CamouflageLayer {
    type Service = Camouflage<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Camouflage {
            inner,
            settings: self.settings.clone(),
        }
    }
}

/// Middleware rewriting between the public and the internal URL.
///
/// See the [module docs](self) for details.
#[derive(Debug, Clone)]
pub struct Camouflage<S> {
    inner: S,
    settings: Option<Arc<Settings>>,
}

impl<S> Camouflage<S> {
    pub fn new(inner: S, config: &RewriteConfig) -> Result<Self, ConfigError> {
        Ok(CamouflageLayer::new(config)?.layer(inner))
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for Camouflage<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<RewriteBody<ResBody>>;
    type Error = S::Error;
    type Future = InterceptFuture<S::Future, Interception>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        match prepare(self.settings.as_ref(), &mut req) {
            Some(interception) => InterceptFuture::new(self.inner.call(req), interception),
            None => InterceptFuture::bypass(self.inner.call(req)),
        }
    }
}

/// Inbound half: decide whether to handle `req` and rewrite it if so.
///
/// Returns the state the outbound half needs, or `None` when the request is
/// left untouched.
fn prepare<B>(settings: Option<&Arc<Settings>>, req: &mut Request<B>) -> Option<Interception> {
    let Some(settings) = settings else {
        metrics::record_exchange(Outcome::Disabled);
        return None;
    };

    if let Some(media_types) = &settings.media_types {
        if !accepts_any(req.headers(), media_types) {
            tracing::debug!(reason = "unacceptable", "camouflage bypassed");
            metrics::record_exchange(Outcome::Unacceptable);
            return None;
        }
    }

    let original = match absolute_url(req) {
        Ok(url) => OriginalUrl::new(url),
        Err(err) => {
            tracing::warn!(error = %err, reason = "unresolved", "camouflage bypassed");
            metrics::record_exchange(Outcome::Unresolved);
            return None;
        }
    };

    let snapshot = capture(req);
    if let Err(err) = rewrite(settings, req) {
        restore(req, &snapshot);
        tracing::warn!(error = %err, reason = "unresolved", "camouflage bypassed");
        metrics::record_exchange(Outcome::Unresolved);
        return None;
    }

    tracing::debug!(original_url = %original.as_str(), target = %settings.public_url, "request rewritten");
    req.extensions_mut().insert(original);

    Some(Interception {
        settings: Arc::clone(settings),
        snapshot,
    })
}

/// Outbound half of one exchange.
///
/// Owns the addressing fields as they were before the rewrite; nothing in
/// here is shared with other requests.
#[derive(Debug)]
pub struct Interception {
    settings: Arc<Settings>,
    snapshot: AddressSnapshot,
}

impl<B> InterceptHandler<B> for Interception {
    fn on_intercept(&self, mut intercepted: Intercepted<B>) -> Response<RewriteBody<B>> {
        let settings = &self.settings;

        // the request itself went downstream; restore onto a retained head
        let head = self.snapshot.to_request();
        let origin = match absolute_url(&head) {
            Ok(url) => {
                if settings.ignore.as_ref().is_some_and(|re| re.is_match(url.as_str())) {
                    tracing::debug!(url = %url, reason = "ignored", "response passed through");
                    metrics::record_exchange(Outcome::Ignored);
                    return intercepted.pass_through();
                }
                origin_of(&url)
            }
            Err(err) => Err(err),
        };
        let origin = match origin {
            Ok(origin) => origin,
            Err(err) => {
                tracing::warn!(error = %err, "public origin unresolved, response passed through");
                metrics::record_exchange(Outcome::Unresolved);
                return intercepted.pass_through();
            }
        };

        let mut rewritten = false;
        if settings.rewrite_headers {
            let changed = replace_in_values(intercepted.headers_mut(), &settings.public_url, &origin);
            rewritten = changed > 0;
        }

        if settings.rewrite_content {
            if is_encoded(intercepted.headers()) {
                tracing::debug!(reason = "encoded", "response body left untouched");
            } else {
                tracing::debug!(origin = %origin, status = %intercepted.status(), "rewriting response body");
                metrics::record_exchange(Outcome::Rewritten);
                return intercepted.substitute(Substitution::new(&settings.public_url, origin));
            }
        }

        metrics::record_exchange(if rewritten {
            Outcome::Rewritten
        } else {
            Outcome::Passthrough
        });
        intercepted.pass_through()
    }
}

/// The body carries a content coding that byte substitution would corrupt.
fn is_encoded(headers: &HeaderMap) -> bool {
    headers.get_all(CONTENT_ENCODING).iter().any(|value| {
        value
            .to_str()
            .map(|codings| {
                codings
                    .split(',')
                    .map(str::trim)
                    .any(|coding| !coding.is_empty() && !coding.eq_ignore_ascii_case("identity"))
            })
            .unwrap_or(true)
    })
}
