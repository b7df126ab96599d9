//! Response interception.
//!
//! # Responsibilities
//! - Hold a response back after the inner service produced it and before
//!   any of it is written to the client
//! - Hand it to a handler that may edit headers and choose the body path
//! - Guarantee the response leaves exactly once, on every path
//!
//! # Design Decisions
//! - The exchange states are types, not a runtime flag:
//!   `InterceptFuture` pending = normal, `Intercepted` = intercepted/rewriting,
//!   the returned `Response<RewriteBody<_>>` = terminated
//! - `pass_through` and `substitute` consume the handle, so finishing twice
//!   or not at all does not compile
//! - An inner error is returned untouched and the handler never runs
//! - Dropping the future (client gone, request cancelled) drops the handler
//!   without running it

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use http::header::{HeaderMap, CONTENT_LENGTH};
use http::response::Parts;
use http::{Response, StatusCode};
use pin_project_lite::pin_project;

use crate::stream::{RewriteBody, Substitution};

/// A response whose headers have not been sent yet.
#[derive(Debug)]
pub struct Intercepted<B> {
    parts: Parts,
    body: B,
}

impl<B> Intercepted<B> {
    pub fn new(response: Response<B>) -> Self {
        let (parts, body) = response.into_parts();
        Self { parts, body }
    }

    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Headers can be changed freely until the handle is finished.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.parts.headers
    }

    /// Release the response with its body untouched.
    pub fn pass_through(self) -> Response<RewriteBody<B>> {
        Response::from_parts(self.parts, RewriteBody::passthrough(self.body))
    }

    /// Release the response with its body streamed through `substitution`.
    ///
    /// `content-length` is dropped since the new length is unknown upfront.
    pub fn substitute(mut self, substitution: Substitution) -> Response<RewriteBody<B>> {
        self.parts.headers.remove(CONTENT_LENGTH);
        Response::from_parts(self.parts, RewriteBody::substitute(self.body, substitution))
    }
}

/// Receives intercepted responses.
pub trait InterceptHandler<B> {
    /// Decide what leaves: the handle must be finished through one of its
    /// consuming methods.
    fn on_intercept(&self, intercepted: Intercepted<B>) -> Response<RewriteBody<B>>;
}

pin_project! {
    /// Future of an intercepted exchange.
    ///
    /// Resolves once the inner service's response is ready; the handler runs
    /// at that point, before the caller can start writing.
    pub struct InterceptFuture<F, H> {
        #[pin]
        future: F,
        handler: Option<H>,
    }
}

impl<F, H> InterceptFuture<F, H> {
    pub fn new(future: F, handler: H) -> Self {
        Self {
            future,
            handler: Some(handler),
        }
    }

    /// Not intercepted: the response is forwarded unchanged.
    pub fn bypass(future: F) -> Self {
        Self {
            future,
            handler: None,
        }
    }
}

impl<F, H, B, E> Future for InterceptFuture<F, H>
where
    F: Future<Output = Result<Response<B>, E>>,
    H: InterceptHandler<B>,
{
    type Output = Result<Response<RewriteBody<B>>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let response = match ready!(this.future.poll(cx)) {
            Ok(response) => response,
            Err(err) => {
                if this.handler.is_some() {
                    tracing::debug!("inner service failed, interception released");
                }
                return Poll::Ready(Err(err));
            }
        };

        let response = match this.handler.as_ref() {
            Some(handler) => handler.on_intercept(Intercepted::new(response)),
            None => response.map(RewriteBody::passthrough),
        };
        Poll::Ready(Ok(response))
    }
}
