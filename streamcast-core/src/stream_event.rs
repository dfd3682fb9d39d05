// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::StreamcastError;

/// An in-band stream item: either a value or a terminating failure.
///
/// Streams in this library yield `StreamEvent<T>` items; normal completion is
/// the stream's own `None`. An `Error` event terminates the sequence — an
/// engine observing one stops pulling and fans the failure out to every
/// consumer exactly once.
#[derive(Debug, Clone)]
pub enum StreamEvent<T> {
    /// A successfully produced element.
    Value(T),
    /// A failure that ends the sequence.
    Error(StreamcastError),
}

impl<T: PartialEq> PartialEq for StreamEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StreamEvent::Value(a), StreamEvent::Value(b)) => a == b,
            // Failures are never equal to anything, themselves included.
            _ => false,
        }
    }
}

impl<T> StreamEvent<T> {
    /// Returns `true` if this is a `Value`.
    pub const fn is_value(&self) -> bool {
        matches!(self, StreamEvent::Value(_))
    }

    /// Returns `true` if this is an `Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, StreamEvent::Error(_))
    }

    /// Converts into `Option<T>`, discarding a failure.
    pub fn value(self) -> Option<T> {
        match self {
            StreamEvent::Value(v) => Some(v),
            StreamEvent::Error(_) => None,
        }
    }

    /// Converts into `Option<StreamcastError>`, discarding a value.
    pub fn error(self) -> Option<StreamcastError> {
        match self {
            StreamEvent::Value(_) => None,
            StreamEvent::Error(e) => Some(e),
        }
    }

    /// Maps the contained value, propagating failures unchanged.
    pub fn map<U, F>(self, f: F) -> StreamEvent<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            StreamEvent::Value(v) => StreamEvent::Value(f(v)),
            StreamEvent::Error(e) => StreamEvent::Error(e),
        }
    }

    /// Returns the contained value.
    ///
    /// # Panics
    ///
    /// Panics if the event is an `Error`.
    pub fn unwrap(self) -> T {
        match self {
            StreamEvent::Value(v) => v,
            StreamEvent::Error(e) => {
                panic!("called `StreamEvent::unwrap()` on an `Error` event: {e:?}")
            }
        }
    }

    /// Returns the contained value, panicking with `msg` on an `Error`.
    ///
    /// # Panics
    ///
    /// Panics with the provided message if the event is an `Error`.
    pub fn expect(self, msg: &str) -> T {
        match self {
            StreamEvent::Value(v) => v,
            StreamEvent::Error(e) => panic!("{msg}: {e:?}"),
        }
    }
}

impl<T> From<Result<T, StreamcastError>> for StreamEvent<T> {
    fn from(result: Result<T, StreamcastError>) -> Self {
        match result {
            Ok(v) => StreamEvent::Value(v),
            Err(e) => StreamEvent::Error(e),
        }
    }
}

impl<T> From<StreamEvent<T>> for Result<T, StreamcastError> {
    fn from(event: StreamEvent<T>) -> Self {
        match event {
            StreamEvent::Value(v) => Ok(v),
            StreamEvent::Error(e) => Err(e),
        }
    }
}
