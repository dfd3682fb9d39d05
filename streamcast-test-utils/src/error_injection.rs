// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream wrapper injecting a failure at a chosen position, for testing
//! error propagation through the engine.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use streamcast_core::{StreamEvent, StreamcastError};

/// Wraps a stream of plain values, yielding them as `StreamEvent::Value`
/// and injecting a single `StreamEvent::Error` at position
/// `inject_error_at` (0-indexed).
///
/// # Example
///
/// ```rust
/// use streamcast_test_utils::ErrorInjectingStream;
/// use streamcast_core::StreamEvent;
/// use futures::{stream, StreamExt};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut events = ErrorInjectingStream::new(stream::iter([1, 2]), 1);
/// assert!(events.next().await.unwrap().is_value());
/// assert!(events.next().await.unwrap().is_error());
/// assert!(events.next().await.unwrap().is_value());
/// # }
/// ```
pub struct ErrorInjectingStream<S> {
    inner: S,
    inject_error_at: Option<usize>,
    count: usize,
}

impl<S> ErrorInjectingStream<S> {
    pub fn new(inner: S, inject_error_at: usize) -> Self {
        Self {
            inner,
            inject_error_at: Some(inject_error_at),
            count: 0,
        }
    }
}

impl<S> Stream for ErrorInjectingStream<S>
where
    S: Stream + Unpin,
{
    type Item = StreamEvent<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(position) = self.inject_error_at {
            if self.count == position {
                self.inject_error_at = None;
                self.count += 1;
                return Poll::Ready(Some(StreamEvent::Error(StreamcastError::failure(
                    "injected test failure",
                ))));
            }
        }
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                self.count += 1;
                Poll::Ready(Some(StreamEvent::Value(item)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{stream, StreamExt};

    #[tokio::test]
    async fn injects_at_requested_position() {
        let mut events = ErrorInjectingStream::new(stream::iter([10, 20, 30]), 2);
        assert_eq!(events.next().await.unwrap().value(), Some(10));
        assert_eq!(events.next().await.unwrap().value(), Some(20));
        assert!(events.next().await.unwrap().is_error());
        assert_eq!(events.next().await.unwrap().value(), Some(30));
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn injects_before_first_value() {
        let mut events = ErrorInjectingStream::new(stream::iter([1]), 0);
        assert!(events.next().await.unwrap().is_error());
        assert_eq!(events.next().await.unwrap().value(), Some(1));
    }
}
