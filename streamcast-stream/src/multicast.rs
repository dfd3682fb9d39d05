// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multicast facade and the [`ShareExt`] stream adapter.
//!
//! A [`Multicast`] converts a cold, single-reader source into a hot,
//! multi-subscriber one. It is a **subscription factory**, not a stream
//! itself: call [`subscribe`](Multicast::subscribe) to obtain independent
//! [`Subscription`] streams.
//!
//! ## Characteristics
//!
//! - **Single driver**: the upstream is pulled by one pump task, at most
//!   once per element, no matter how many consumers subscribe.
//! - **Lazy**: the upstream is not instantiated until the first
//!   subscription arrives.
//! - **Replay**: the last `history_depth` elements are replayed, in order,
//!   to every late subscriber before any live element.
//! - **Per-consumer pacing**: each subscription drains its own mailbox
//!   under its own [`BufferPolicy`]; a slow consumer never stalls a fast
//!   one, nor the pump.
//! - **Owned lifecycle**: dropping the `Multicast` tears the upstream,
//!   pump and history down and completes every subscription.
//!
//! ## Example
//!
//! ```
//! use streamcast_stream::{MulticastConfig, ShareExt};
//! use streamcast_core::StreamEvent;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! // The history window spans the whole source, so subscribers read from
//! // the start no matter when they arrive relative to the pump.
//! let shared = stream::iter([1, 2, 3].map(StreamEvent::Value))
//!     .share_with(MulticastConfig::default().history_depth(3));
//!
//! let mut a = shared.subscribe();
//! let mut b = shared.subscribe();
//! assert_eq!(a.next().await.unwrap().unwrap(), 1);
//! assert_eq!(b.next().await.unwrap().unwrap(), 1);
//! # }
//! ```

use crate::config::{BufferPolicy, MulticastConfig};
use crate::state::{SharedCore, UpstreamFactory};
use crate::subscription::Subscription;
use futures::{stream, Stream, StreamExt};
use std::sync::Arc;
use streamcast_core::StreamEvent;

/// A hot, multi-subscriber view of a single-reader stream.
///
/// See the [module documentation](self) for characteristics and examples.
pub struct Multicast<T: Clone + Send + 'static> {
    core: Arc<SharedCore<T>>,
}

impl<T: Clone + Send + 'static> Multicast<T> {
    /// Creates a multicast over the streams produced by `factory`, with the
    /// default configuration (no history, unbounded mailboxes,
    /// retain-until-terminal disposal).
    ///
    /// The factory is invoked lazily on the first subscription. Under
    /// [`DisposalPolicy::DisposeWhenVacant`](crate::DisposalPolicy) it is
    /// invoked again after every vacancy teardown, re-running the
    /// upstream's startup side effects from scratch.
    pub fn new<F, S>(factory: F) -> Self
    where
        F: FnMut() -> S + Send + 'static,
        S: Stream<Item = StreamEvent<T>> + Send + 'static,
    {
        Self::with_config(MulticastConfig::default(), factory)
    }

    /// Creates a multicast with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (a capacity-carrying buffer
    /// policy with capacity zero).
    pub fn with_config<F, S>(config: MulticastConfig, mut factory: F) -> Self
    where
        F: FnMut() -> S + Send + 'static,
        S: Stream<Item = StreamEvent<T>> + Send + 'static,
    {
        config.assert_valid();
        let factory: UpstreamFactory<T> = Box::new(move || factory().boxed());
        Self {
            core: Arc::new(SharedCore::new(config, factory)),
        }
    }

    /// Registers a new consumer and returns its stream of events.
    ///
    /// Always succeeds, including after the upstream has terminated: the
    /// subscription then replays buffered history followed by the terminal
    /// event. Must be called from within a tokio runtime, since the first
    /// subscription spawns the pump task.
    pub fn subscribe(&self) -> Subscription<T> {
        self.core.subscribe(None)
    }

    /// Like [`subscribe`](Self::subscribe), with a per-consumer buffering
    /// policy overriding the configured default.
    ///
    /// # Panics
    ///
    /// Panics if `policy` carries a zero capacity.
    pub fn subscribe_with(&self, policy: BufferPolicy) -> Subscription<T> {
        policy.assert_valid();
        self.core.subscribe(Some(policy))
    }

    /// Number of currently registered consumers.
    ///
    /// Dropped subscriptions deregister eagerly, so the count is accurate
    /// immediately after a drop.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.core.subscriber_count()
    }

    /// Returns `true` once the upstream has completed or failed.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.core.is_terminated()
    }
}

impl<T: Clone + Send + 'static> Drop for Multicast<T> {
    fn drop(&mut self) {
        self.core.close();
    }
}

/// Extension trait turning an owned event stream into a [`Multicast`].
pub trait ShareExt<T: Clone + Send + 'static>: Stream<Item = StreamEvent<T>> {
    /// Shares this stream among multiple subscribers with the default
    /// configuration.
    fn share(self) -> Multicast<T>
    where
        Self: Send + Sized + 'static,
    {
        self.share_with(MulticastConfig::default())
    }

    /// Shares this stream with an explicit configuration.
    ///
    /// The stream is consumed, so it can only be driven once: paired with
    /// [`DisposalPolicy::DisposeWhenVacant`](crate::DisposalPolicy), a
    /// subscriber arriving after a vacancy teardown observes an
    /// immediately-finished upstream. Use [`Multicast::with_config`] with a
    /// factory when the source must be re-creatable.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    fn share_with(self, config: MulticastConfig) -> Multicast<T>
    where
        Self: Send + Sized + 'static,
    {
        let mut slot = Some(self);
        Multicast::with_config(config, move || match slot.take() {
            Some(source) => source.boxed(),
            None => stream::empty().boxed(),
        })
    }
}

impl<S, T> ShareExt<T> for S
where
    S: Stream<Item = StreamEvent<T>>,
    T: Clone + Send + 'static,
{
}
