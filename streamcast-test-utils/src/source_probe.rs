// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Instrumented upstream sources.
//!
//! A [`SourceProbe`] hands out sources (or source factories) that share two
//! counters: how many elements have been pulled across all instances, and
//! how many instances have been created. Tests use them to verify that an
//! upstream is pulled exactly once per delivered element and that disposal
//! policies re-create (or keep) the upstream as specified.

use futures::stream::BoxStream;
use futures::{stream, Stream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use streamcast_core::StreamEvent;

/// Shared counters for instrumented sources.
#[derive(Clone, Default)]
pub struct SourceProbe {
    pulls: Arc<AtomicUsize>,
    starts: Arc<AtomicUsize>,
}

impl SourceProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total elements pulled across every source this probe handed out.
    #[must_use]
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    /// Number of source instantiations (factory invocations).
    #[must_use]
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Wraps an existing source so each pulled event bumps the pull count.
    ///
    /// Counts as one instantiation.
    pub fn wrap<S, T>(&self, source: S) -> BoxStream<'static, StreamEvent<T>>
    where
        S: Stream<Item = StreamEvent<T>> + Send + 'static,
        T: Send + 'static,
    {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let pulls = Arc::clone(&self.pulls);
        source
            .inspect(move |_| {
                pulls.fetch_add(1, Ordering::SeqCst);
            })
            .boxed()
    }

    /// Factory producing, per invocation, a fresh finite source yielding
    /// `items` in order and then completing.
    pub fn finite<T>(
        &self,
        items: Vec<T>,
    ) -> impl FnMut() -> BoxStream<'static, StreamEvent<T>> + Send + 'static
    where
        T: Clone + Send + 'static,
    {
        let probe = self.clone();
        move || probe.wrap(stream::iter(items.clone().into_iter().map(StreamEvent::Value)))
    }

    /// Factory producing, per invocation, a fresh source yielding `items`
    /// in order and then staying pending forever (never terminating).
    pub fn endless<T>(
        &self,
        items: Vec<T>,
    ) -> impl FnMut() -> BoxStream<'static, StreamEvent<T>> + Send + 'static
    where
        T: Clone + Send + 'static,
    {
        let probe = self.clone();
        move || {
            probe.wrap(
                stream::iter(items.clone().into_iter().map(StreamEvent::Value))
                    .chain(stream::pending()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wrap_counts_each_pulled_event() {
        let probe = SourceProbe::new();
        let mut source = probe.wrap(stream::iter([1, 2, 3].map(StreamEvent::Value)));
        while source.next().await.is_some() {}
        assert_eq!(probe.pulls(), 3);
        assert_eq!(probe.starts(), 1);
    }

    #[tokio::test]
    async fn finite_factory_counts_instantiations() {
        let probe = SourceProbe::new();
        let mut factory = probe.finite(vec![1, 2]);
        let mut first = factory();
        let mut second = factory();
        while first.next().await.is_some() {}
        while second.next().await.is_some() {}
        assert_eq!(probe.starts(), 2);
        assert_eq!(probe.pulls(), 4);
    }
}
