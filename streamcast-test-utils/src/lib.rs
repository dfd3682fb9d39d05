// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the streamcast workspace.
//!
//! This crate is for development and testing only. It provides:
//!
//! - channel-backed event sources ([`test_channel`],
//!   [`test_channel_with_errors`]) for imperative test setup;
//! - [`SourceProbe`], which counts upstream pulls and upstream
//!   instantiations — the instrument behind the single-pull and
//!   disposal-policy assertions;
//! - [`ErrorInjectingStream`] for failure-propagation tests;
//! - timeout-guarded assertion helpers in [`helpers`];
//! - small data fixtures in [`test_data`].

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_injection;
pub mod helpers;
pub mod source_probe;
pub mod test_data;

use futures::{Stream, StreamExt};
use streamcast_core::StreamEvent;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use error_injection::ErrorInjectingStream;
pub use helpers::{assert_no_element_emitted, assert_stream_ended, next_event, next_value};
pub use source_probe::SourceProbe;
pub use test_data::{person_alice, person_bob, person_charlie, person_diane, Person};

/// Creates a test channel whose receiving side is an event stream.
///
/// Sent values are wrapped in `StreamEvent::Value`; dropping the sender
/// completes the stream.
///
/// # Example
///
/// ```rust
/// use streamcast_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel();
/// tx.send(7).unwrap();
/// assert_eq!(stream.next().await.unwrap().unwrap(), 7);
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamEvent<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamEvent::Value);
    (tx, stream)
}

/// Creates a test channel that accepts raw `StreamEvent<T>` items, so tests
/// can push failures explicitly.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamEvent<T>>,
    impl Stream<Item = StreamEvent<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}
