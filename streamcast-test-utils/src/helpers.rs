// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use std::time::Duration;
use streamcast_core::StreamEvent;
use tokio::time::sleep;

/// Await the next event, panicking if the stream ends or nothing arrives
/// within `timeout_ms`.
pub async fn next_event<S, T>(stream: &mut S, timeout_ms: u64) -> StreamEvent<T>
where
    S: Stream<Item = StreamEvent<T>> + Unpin,
{
    tokio::select! {
        event = stream.next() => event.expect("stream ended, expected an event"),
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("no event within {timeout_ms}ms");
        }
    }
}

/// Await the next event and unwrap its value, panicking on end, failure or
/// timeout.
pub async fn next_value<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = StreamEvent<T>> + Unpin,
{
    next_event(stream, timeout_ms)
        .await
        .expect("expected a value event")
}

/// Assert that the stream ends (yields `None`) within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = StreamEvent<T>> + Unpin,
    T: std::fmt::Debug,
{
    tokio::select! {
        event = stream.next() => {
            assert!(event.is_none(), "expected end of stream, got {event:?}");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("stream did not end within {timeout_ms}ms");
        }
    }
}

/// Assert that nothing is emitted for the whole `timeout_ms` window.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("unexpected emission, expected no output");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}
