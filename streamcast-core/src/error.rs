// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the streamcast library.
//!
//! Failures travel in-band as [`StreamEvent::Error`](crate::StreamEvent)
//! events and are captured once by the engine's terminal cache. The engine
//! never retries or suppresses them — retry is an external layer composed on
//! top. Invalid configuration is a programmer error and panics at
//! construction; it never appears here.

/// Root error type carried by failed streams.
///
/// An upstream failure is propagated verbatim to every consumer exactly once
/// each. The payload is opaque to the engine: either a plain textual context
/// or a wrapped foreign error.
#[derive(Debug, thiserror::Error)]
pub enum StreamcastError {
    /// An upstream source failed with the given context.
    #[error("upstream failure: {context}")]
    Failure {
        /// Description of what went wrong upstream.
        context: String,
    },

    /// A foreign error propagated through the stream.
    ///
    /// Wraps errors produced outside the library (source adapters, user
    /// callbacks) so they can travel through the engine untouched.
    #[error("external error: {0}")]
    External(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StreamcastError {
    /// Create an upstream failure with the given context.
    pub fn failure(context: impl Into<String>) -> Self {
        Self::Failure {
            context: context.into(),
        }
    }

    /// Wrap a foreign error.
    pub fn external(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::External(Box::new(error))
    }
}

impl Clone for StreamcastError {
    fn clone(&self) -> Self {
        match self {
            Self::Failure { context } => Self::Failure {
                context: context.clone(),
            },
            // Boxed foreign errors are not Clone; degrade to their rendering.
            Self::External(e) => Self::Failure {
                context: format!("external error: {e}"),
            },
        }
    }
}

/// Specialized `Result` for streamcast operations.
pub type Result<T> = std::result::Result<T, StreamcastError>;
