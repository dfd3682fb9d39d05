// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core vocabulary types for the streamcast multicast engine.
//!
//! This crate holds the types shared between the engine and its consumers:
//!
//! - [`StreamEvent`]: the in-band item type carried by every streamcast
//!   stream — either a value or a terminating error. Normal completion is
//!   expressed through the `Stream` protocol itself (`None`).
//! - [`StreamcastError`]: the root error type, with a [`Result`] alias.
//! - [`BackgroundTask`]: a spawn handle with cooperative, cancel-on-drop
//!   semantics, used to own the engine's pump task.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error;
pub mod stream_event;
pub mod task;

pub use self::error::{Result, StreamcastError};
pub use self::stream_event::StreamEvent;
pub use self::task::BackgroundTask;
