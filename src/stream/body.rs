//! Response body wrapper applying an optional [`Substitution`].

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::{Buf, Bytes};
use http::HeaderMap;
use http_body::{Body, Frame, SizeHint};
use pin_project_lite::pin_project;

use super::substitute::Substitution;
use crate::error::{BoxError, StreamError};
use crate::observability::metrics;

pin_project! {
    /// Body of an intercepted response.
    ///
    /// Frames are pulled from the inner body only when the consumer polls,
    /// so the transformed body is never materialized. Dropping the body
    /// drops any held-back bytes with it.
    #[derive(Debug)]
    pub struct RewriteBody<B> {
        #[pin]
        inner: B,
        substitution: Option<Substitution>,
        trailers: Option<HeaderMap>,
        done: bool,
    }
}

impl<B> RewriteBody<B> {
    /// Forward `inner` unchanged.
    pub fn passthrough(inner: B) -> Self {
        Self {
            inner,
            substitution: None,
            trailers: None,
            done: false,
        }
    }

    /// Forward `inner` through `substitution`.
    pub fn substitute(inner: B, substitution: Substitution) -> Self {
        Self {
            inner,
            substitution: Some(substitution),
            trailers: None,
            done: false,
        }
    }
}

impl<B> Body for RewriteBody<B>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = StreamError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let mut this = self.project();

        if let Some(trailers) = this.trailers.take() {
            return Poll::Ready(Some(Ok(Frame::trailers(trailers))));
        }
        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            match ready!(this.inner.as_mut().poll_frame(cx)) {
                Some(Ok(frame)) => {
                    let frame = match frame.into_data() {
                        Ok(mut data) => {
                            let chunk = data.copy_to_bytes(data.remaining());
                            let Some(substitution) = this.substitution.as_mut() else {
                                return Poll::Ready(Some(Ok(Frame::data(chunk))));
                            };
                            let out = substitution.push(&chunk);
                            tracing::trace!(read = chunk.len(), written = out.len(), "substituted chunk");
                            if out.is_empty() {
                                continue;
                            }
                            return Poll::Ready(Some(Ok(Frame::data(out))));
                        }
                        Err(frame) => frame,
                    };

                    let Ok(trailers) = frame.into_trailers() else {
                        continue;
                    };
                    // held-back bytes belong before the trailers
                    let rest = this
                        .substitution
                        .as_mut()
                        .map(Substitution::finish)
                        .unwrap_or_default();
                    if rest.is_empty() {
                        return Poll::Ready(Some(Ok(Frame::trailers(trailers))));
                    }
                    *this.trailers = Some(trailers);
                    return Poll::Ready(Some(Ok(Frame::data(rest))));
                }
                Some(Err(err)) => {
                    *this.done = true;
                    if let Some(substitution) = this.substitution.as_mut() {
                        substitution.discard();
                    }
                    let err = StreamError::new(err);
                    tracing::warn!(error = %err, "response body failed mid-stream");
                    metrics::record_stream_error();
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    *this.done = true;
                    let rest = this
                        .substitution
                        .as_mut()
                        .map(Substitution::finish)
                        .unwrap_or_default();
                    if rest.is_empty() {
                        return Poll::Ready(None);
                    }
                    return Poll::Ready(Some(Ok(Frame::data(rest))));
                }
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        if self.trailers.is_some() {
            return false;
        }
        if self.done {
            return true;
        }
        match &self.substitution {
            Some(substitution) => substitution.pending() == 0 && self.inner.is_end_stream(),
            None => self.inner.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self.substitution {
            Some(_) => SizeHint::default(),
            None => self.inner.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full, StreamBody};
    use std::convert::Infallible;

    fn chunked(chunks: &[&'static str]) -> impl Body<Data = Bytes, Error = Infallible> {
        let frames: Vec<Result<Frame<Bytes>, Infallible>> = chunks
            .iter()
            .map(|chunk| Ok(Frame::data(Bytes::from_static(chunk.as_bytes()))))
            .collect();
        StreamBody::new(futures_util::stream::iter(frames))
    }

    #[tokio::test]
    async fn test_passthrough_keeps_body_and_size() {
        let body = RewriteBody::passthrough(Full::new(Bytes::from_static(b"hello")));
        assert_eq!(body.size_hint().exact(), Some(5));

        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn test_substitute_across_frames() {
        let body = RewriteBody::substitute(
            chunked(&["http://example.com/ba", "se/path ", "http://exa", "mple.com/base/"]),
            Substitution::new("http://example.com/base/", "http://example.org/"),
        );
        assert_eq!(body.size_hint().exact(), None);

        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"http://example.org/path http://example.org/");
    }

    #[tokio::test]
    async fn test_flushes_pending_before_trailers() {
        let mut trailers = HeaderMap::new();
        trailers.insert("x-checksum", "abc".parse().unwrap());
        let frames: Vec<Result<Frame<Bytes>, Infallible>> = vec![
            Ok(Frame::data(Bytes::from_static(b"tail http://exam"))),
            Ok(Frame::trailers(trailers)),
        ];
        let body = RewriteBody::substitute(
            StreamBody::new(futures_util::stream::iter(frames)),
            Substitution::new("http://example.com/", "x"),
        );

        let collected = body.collect().await.unwrap();
        assert_eq!(collected.trailers().unwrap()["x-checksum"], "abc");
        assert_eq!(&collected.to_bytes()[..], b"tail http://exam");
    }

    #[tokio::test]
    async fn test_error_stops_stream() {
        let frames: Vec<Result<Frame<Bytes>, std::io::Error>> = vec![
            Ok(Frame::data(Bytes::from_static(b"ok http://exa"))),
            Err(std::io::Error::other("connection reset")),
            Ok(Frame::data(Bytes::from_static(b"never"))),
        ];
        let mut body = RewriteBody::substitute(
            StreamBody::new(futures_util::stream::iter(frames)),
            Substitution::new("http://example.com/", "x"),
        );

        let first = body.frame().await.unwrap().unwrap();
        assert_eq!(&first.into_data().unwrap()[..], b"ok ");

        let err = body.frame().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert!(body.frame().await.is_none());
        assert!(body.is_end_stream());
    }
}
