// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use std::time::Duration;
use streamcast_stream::{DisposalPolicy, Multicast, MulticastConfig, ShareExt};
use streamcast_test_utils::{
    assert_no_element_emitted, assert_stream_ended, next_value, test_channel, SourceProbe,
};
use tokio::time::sleep;

#[tokio::test]
async fn dispose_when_vacant_recreates_the_upstream() {
    // Arrange
    let probe = SourceProbe::new();
    let shared = Multicast::with_config(
        MulticastConfig::default().disposal(DisposalPolicy::DisposeWhenVacant),
        probe.endless(vec![1, 2, 3]),
    );

    let mut first = shared.subscribe();
    for i in [1, 2, 3] {
        assert_eq!(next_value(&mut first, 500).await, i);
    }
    assert_eq!(probe.starts(), 1);

    // Act - the last subscriber leaves, then a new one arrives
    drop(first);
    let mut second = shared.subscribe();

    // Assert - a fresh upstream instance replays its side effects
    assert_eq!(next_value(&mut second, 500).await, 1);
    assert_eq!(probe.starts(), 2);
}

#[tokio::test]
async fn dispose_when_vacant_clears_history() {
    // Arrange - with history retained, the new subscriber would first see
    // a replayed 3 rather than a fresh 1
    let probe = SourceProbe::new();
    let shared = Multicast::with_config(
        MulticastConfig::default()
            .history_depth(2)
            .disposal(DisposalPolicy::DisposeWhenVacant),
        probe.endless(vec![1, 2, 3]),
    );
    let mut first = shared.subscribe();
    for i in [1, 2, 3] {
        assert_eq!(next_value(&mut first, 500).await, i);
    }

    // Act
    drop(first);
    let mut second = shared.subscribe();

    // Assert
    assert_eq!(next_value(&mut second, 500).await, 1);
    assert_eq!(probe.starts(), 2);
}

#[tokio::test]
async fn retain_until_terminal_keeps_the_upstream_alive_through_vacancy() {
    // Arrange
    let probe = SourceProbe::new();
    let shared = Multicast::with_config(
        MulticastConfig::default().history_depth(2),
        probe.endless(vec![1, 2, 3]),
    );
    let mut first = shared.subscribe();
    for i in [1, 2, 3] {
        assert_eq!(next_value(&mut first, 500).await, i);
    }

    // Act - vacancy, then a new subscriber
    drop(first);
    let mut second = shared.subscribe();

    // Assert - same upstream instance, history intact
    assert_eq!(next_value(&mut second, 500).await, 2);
    assert_eq!(next_value(&mut second, 500).await, 3);
    assert_no_element_emitted(&mut second, 100).await;
    assert_eq!(probe.starts(), 1);
}

#[tokio::test]
async fn retained_pump_keeps_pulling_while_vacant() {
    // Arrange
    let probe = SourceProbe::new();
    let (tx, rx) = test_channel();
    let shared = probe
        .wrap(rx)
        .share_with(MulticastConfig::default().history_depth(2));
    let mut first = shared.subscribe();
    tx.send(1).unwrap();
    assert_eq!(next_value(&mut first, 500).await, 1);

    // Act - elements flow while nobody is subscribed; wait for the pump to
    // pull them before anyone comes back
    drop(first);
    tx.send(2).unwrap();
    tx.send(3).unwrap();
    while probe.pulls() < 3 {
        sleep(Duration::from_millis(5)).await;
    }

    // Assert - the vacancy-era elements reach the next subscriber, through
    // replay or live delivery depending on where the fan-out stands
    let mut second = shared.subscribe();
    drop(tx);
    let mut seen = Vec::new();
    while let Some(event) = second.next().await {
        seen.push(event.unwrap());
    }
    assert!(seen.ends_with(&[2, 3]), "unexpected sequence {seen:?}");
}

#[tokio::test]
async fn termination_is_not_undone_by_vacancy_under_dispose() {
    // Arrange - a finite upstream that runs to completion
    let probe = SourceProbe::new();
    let shared = Multicast::with_config(
        MulticastConfig::default().disposal(DisposalPolicy::DisposeWhenVacant),
        probe.finite(vec![1, 2]),
    );
    let mut first = shared.subscribe();
    assert_eq!(next_value(&mut first, 500).await, 1);
    assert_eq!(next_value(&mut first, 500).await, 2);
    assert_stream_ended(&mut first, 500).await;

    // Act - vacancy after the terminal, then a new subscriber
    drop(first);
    let mut second = shared.subscribe();

    // Assert - the terminal is permanent; no fresh upstream is started
    assert_stream_ended(&mut second, 500).await;
    assert_eq!(probe.starts(), 1);
}

#[tokio::test]
async fn consumed_stream_under_dispose_finishes_after_teardown() {
    // Arrange - share_with consumes the stream, so there is nothing left
    // to re-instantiate after a vacancy teardown
    let (tx, rx) = test_channel();
    let shared = rx.share_with(
        MulticastConfig::default().disposal(DisposalPolicy::DisposeWhenVacant),
    );
    let mut first = shared.subscribe();
    tx.send(1).unwrap();
    assert_eq!(next_value(&mut first, 500).await, 1);

    // Act
    drop(first);
    let mut second = shared.subscribe();

    // Assert - the replacement upstream is empty, so the subscription ends
    assert_stream_ended(&mut second, 500).await;
}

#[tokio::test]
async fn facade_drop_tears_down_under_either_policy() {
    for disposal in [
        DisposalPolicy::RetainUntilTerminal,
        DisposalPolicy::DisposeWhenVacant,
    ] {
        // Arrange
        let probe = SourceProbe::new();
        let shared = Multicast::with_config(
            MulticastConfig::default().disposal(disposal),
            probe.endless(vec![1]),
        );
        let mut sub = shared.subscribe();
        assert_eq!(next_value(&mut sub, 500).await, 1);

        // Act
        drop(shared);

        // Assert
        assert_stream_ended(&mut sub, 500).await;
    }
}
