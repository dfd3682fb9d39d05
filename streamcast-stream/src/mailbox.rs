// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-consumer buffered queue fed by the pump.
//!
//! A [`Mailbox`] is touched by exactly two parties: the pump (producer) and
//! the owning subscription (drainer). Its queue sits behind its own
//! short-lived mutex; the only cross-party synchronization beyond that is
//! the single suspended reader parked on the mailbox's event.

use crate::config::BufferPolicy;
use event_listener::{Event, EventListener};
use parking_lot::Mutex;
use std::collections::VecDeque;
use streamcast_core::{StreamEvent, StreamcastError};

/// Write-once record of how the upstream ended.
#[derive(Debug, Clone)]
pub(crate) enum Terminal {
    /// The upstream completed normally.
    Finished,
    /// The upstream failed; the error is fanned out once per consumer.
    Failed(StreamcastError),
}

/// Outcome of a non-blocking dequeue attempt.
#[derive(Debug)]
pub(crate) enum TakeOutcome<T> {
    /// An event is ready for the consumer.
    Event(StreamEvent<T>),
    /// The mailbox has ended; every future take returns `Ended` too.
    Ended,
    /// Nothing buffered and not terminal; the caller should park.
    Empty,
}

struct MailboxInner<T> {
    policy: BufferPolicy,
    /// Elements ready for the consumer, oldest first. Capped at the policy
    /// capacity for capacity-carrying policies.
    queue: VecDeque<T>,
    /// `Bounded` only: deliveries held back while the queue is full,
    /// admitted in order as the consumer makes room.
    spillover: VecDeque<T>,
    terminal: Option<Terminal>,
    /// A failure is surfaced at most once; afterwards the mailbox ends.
    failure_taken: bool,
    /// Set when the consumer is gone; deliveries become no-ops.
    dead: bool,
}

pub(crate) struct Mailbox<T> {
    inner: Mutex<MailboxInner<T>>,
    reader: Event,
}

impl<T> Mailbox<T> {
    pub(crate) fn new(policy: BufferPolicy) -> Self {
        Self {
            inner: Mutex::new(MailboxInner {
                policy,
                queue: VecDeque::new(),
                spillover: VecDeque::new(),
                terminal: None,
                failure_taken: false,
                dead: false,
            }),
            reader: Event::new(),
        }
    }

    /// Accept one element from the pump, applying the buffering policy.
    ///
    /// Never blocks. Returns `false` once the consumer is gone, which tells
    /// the registry to prune this mailbox.
    pub(crate) fn deliver(&self, value: T) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.dead {
                return false;
            }
            match inner.policy {
                BufferPolicy::Unbounded => inner.queue.push_back(value),
                BufferPolicy::Bounded(n) => {
                    if inner.queue.len() < n && inner.spillover.is_empty() {
                        inner.queue.push_back(value);
                    } else {
                        inner.spillover.push_back(value);
                    }
                }
                BufferPolicy::DropNewest(n) => {
                    if inner.queue.len() < n {
                        inner.queue.push_back(value);
                    }
                }
                BufferPolicy::DropOldest(n) => {
                    if inner.queue.len() == n {
                        inner.queue.pop_front();
                    }
                    inner.queue.push_back(value);
                }
            }
        }
        self.reader.notify(1);
        true
    }

    /// Record the terminal event. First write wins; later calls are no-ops.
    pub(crate) fn set_terminal(&self, terminal: Terminal) {
        {
            let mut inner = self.inner.lock();
            if inner.terminal.is_none() {
                inner.terminal = Some(terminal);
            }
        }
        self.reader.notify(usize::MAX);
    }

    /// Dequeue the next event without blocking.
    ///
    /// Buffered elements drain before the terminal event; a failure is
    /// returned exactly once, then the mailbox ends idempotently.
    pub(crate) fn take(&self) -> TakeOutcome<T> {
        let mut inner = self.inner.lock();
        if let Some(value) = inner.queue.pop_front() {
            if let BufferPolicy::Bounded(n) = inner.policy {
                while inner.queue.len() < n {
                    match inner.spillover.pop_front() {
                        Some(held) => inner.queue.push_back(held),
                        None => break,
                    }
                }
            }
            return TakeOutcome::Event(StreamEvent::Value(value));
        }
        match &inner.terminal {
            Some(Terminal::Failed(e)) if !inner.failure_taken => {
                let error = e.clone();
                inner.failure_taken = true;
                TakeOutcome::Event(StreamEvent::Error(error))
            }
            Some(_) => TakeOutcome::Ended,
            None => TakeOutcome::Empty,
        }
    }

    /// Park point for the single suspended reader.
    pub(crate) fn listen(&self) -> EventListener {
        self.reader.listen()
    }

    /// Called by the subscription on drop; buffered elements are discarded
    /// unread and later deliveries are refused.
    pub(crate) fn mark_dead(&self) {
        let mut inner = self.inner.lock();
        inner.dead = true;
        inner.queue.clear();
        inner.spillover.clear();
    }
}
