// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multicast/fan-out engine for asynchronous streams.
//!
//! A [`Multicast`] turns a cold, single-reader stream into a hot source that
//! any number of independent consumers can iterate concurrently, each at its
//! own pace, while the upstream is pulled at most once per element.
//!
//! # Architecture
//!
//! - **Pump**: a single background task per multicast, the only entity that
//!   pulls the upstream. Each pulled element is appended to the history ring
//!   and fanned out to every registered mailbox.
//! - **Mailbox**: one buffered queue per consumer, fed by the pump and
//!   drained by that consumer alone, governed by a [`BufferPolicy`].
//! - **History**: a bounded ring of the most recently delivered elements,
//!   replayed to late subscribers before any live element.
//! - **Terminal cache**: the write-once record of how the upstream ended,
//!   delivered exactly once to every present and future subscriber.
//! - **Disposal policy**: what happens to the upstream and history when the
//!   last consumer unsubscribes before termination, see [`DisposalPolicy`].
//!
//! # Example
//!
//! ```
//! use streamcast_stream::{Multicast, MulticastConfig};
//! use streamcast_core::StreamEvent;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = MulticastConfig::default().history_depth(1);
//! let multicast = Multicast::with_config(config, || {
//!     stream::iter([1, 2, 3].map(StreamEvent::Value))
//! });
//!
//! let mut first = multicast.subscribe();
//! assert_eq!(first.next().await.unwrap().unwrap(), 1);
//! # }
//! ```
//!
//! Subscriptions are ordinary [`futures::Stream`]s: they can be combined
//! with any stream adapter, and dropping one unsubscribes its consumer.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod config;
pub mod multicast;
pub mod subscription;

mod mailbox;
mod pump;
mod state;

pub use config::{BufferPolicy, DisposalPolicy, MulticastConfig};
pub use multicast::{Multicast, ShareExt};
pub use streamcast_core::{StreamEvent, StreamcastError};
pub use subscription::Subscription;
