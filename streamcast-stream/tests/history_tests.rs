// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream;
use streamcast_core::StreamEvent;
use streamcast_stream::{MulticastConfig, ShareExt};
use streamcast_test_utils::{assert_stream_ended, next_value, test_channel};

#[tokio::test]
async fn late_subscriber_replays_the_most_recent_elements() {
    // Arrange
    let (tx, rx) = test_channel();
    let shared = rx.share_with(MulticastConfig::default().history_depth(2));
    let mut early = shared.subscribe();

    // Act - three elements flow before the late subscriber arrives
    for i in [1, 2, 3] {
        tx.send(i).unwrap();
    }
    for i in [1, 2, 3] {
        assert_eq!(next_value(&mut early, 500).await, i);
    }
    let mut late = shared.subscribe();

    // Assert - replay is capped at the configured depth
    assert_eq!(next_value(&mut late, 500).await, 2);
    assert_eq!(next_value(&mut late, 500).await, 3);

    // and live elements follow the replay
    tx.send(4).unwrap();
    assert_eq!(next_value(&mut late, 500).await, 4);
}

#[tokio::test]
async fn replay_is_shorter_than_depth_when_fewer_elements_flowed() {
    // Arrange
    let (tx, rx) = test_channel();
    let shared = rx.share_with(MulticastConfig::default().history_depth(5));
    let mut early = shared.subscribe();

    // Act - only one element has flowed
    tx.send(42).unwrap();
    assert_eq!(next_value(&mut early, 500).await, 42);
    let mut late = shared.subscribe();

    // Assert
    assert_eq!(next_value(&mut late, 500).await, 42);
}

#[tokio::test]
async fn zero_depth_disables_replay() {
    // Arrange
    let (tx, rx) = test_channel();
    let shared = rx.share_with(MulticastConfig::default());
    let mut early = shared.subscribe();

    // Act
    tx.send(1).unwrap();
    assert_eq!(next_value(&mut early, 500).await, 1);
    let mut late = shared.subscribe();
    tx.send(2).unwrap();

    // Assert - the late subscriber starts at the live edge
    assert_eq!(next_value(&mut late, 500).await, 2);
}

#[tokio::test]
async fn post_terminal_subscriber_replays_history_then_ends() {
    // Arrange
    let (tx, rx) = test_channel();
    let shared = rx.share_with(MulticastConfig::default().history_depth(1));
    let mut early = shared.subscribe();
    tx.send(7).unwrap();
    tx.send(8).unwrap();
    drop(tx);
    assert_eq!(next_value(&mut early, 500).await, 7);
    assert_eq!(next_value(&mut early, 500).await, 8);
    assert_stream_ended(&mut early, 500).await;

    // Act
    let mut late = shared.subscribe();

    // Assert - the retained tail, then the end
    assert_eq!(next_value(&mut late, 500).await, 8);
    assert_stream_ended(&mut late, 500).await;
}

#[tokio::test]
async fn full_depth_history_reads_from_the_start_regardless_of_timing() {
    // Arrange - an immediately-ready finite source whose history window
    // covers every element
    let shared = stream::iter([1, 2, 3].map(StreamEvent::Value))
        .share_with(MulticastConfig::default().history_depth(3));
    let mut early = shared.subscribe();
    for i in [1, 2, 3] {
        assert_eq!(next_value(&mut early, 500).await, i);
    }
    assert_stream_ended(&mut early, 500).await;

    // Act - subscribe only after the upstream has been fully drained
    let mut late = shared.subscribe();

    // Assert - the replay starts at the first element either way
    for i in [1, 2, 3] {
        assert_eq!(next_value(&mut late, 500).await, i);
    }
    assert_stream_ended(&mut late, 500).await;
}

/// Walks a full session: staggered subscribers around a five element
/// source with a one element replay window.
#[tokio::test]
async fn staggered_subscribers_observe_consistent_history() {
    // Arrange
    let (tx, rx) = test_channel();
    let shared = rx.share_with(MulticastConfig::default().history_depth(1));
    let mut c1 = shared.subscribe();

    tx.send(1).unwrap();
    assert_eq!(next_value(&mut c1, 500).await, 1);
    tx.send(2).unwrap();
    tx.send(3).unwrap();
    assert_eq!(next_value(&mut c1, 500).await, 2);
    assert_eq!(next_value(&mut c1, 500).await, 3);

    // Act - c2 joins mid-stream and sees the last element as replay
    let mut c2 = shared.subscribe();
    assert_eq!(next_value(&mut c2, 500).await, 3);

    tx.send(4).unwrap();
    tx.send(5).unwrap();
    drop(tx);

    // Assert - both live subscribers run to completion in order
    for c in [&mut c1, &mut c2] {
        assert_eq!(next_value(c, 500).await, 4);
        assert_eq!(next_value(c, 500).await, 5);
        assert_stream_ended(c, 500).await;
    }

    // and a subscriber arriving after the end still gets the tail
    let mut c3 = shared.subscribe();
    assert_eq!(next_value(&mut c3, 500).await, 5);
    assert_stream_ended(&mut c3, 500).await;
}
