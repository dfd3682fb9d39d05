// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared engine state: registry, history ring and terminal cache.
//!
//! Everything the pump and the subscribe/unsubscribe paths agree on lives
//! behind one mutex. Mailbox queues are not in here; each mailbox carries
//! its own lock, acquired only while the core lock is already held (pump
//! fan-out) or with no core lock at all (consumer drain), so the lock order
//! is always core before mailbox.

use crate::config::{DisposalPolicy, MulticastConfig};
use crate::mailbox::{Mailbox, Terminal};
use crate::pump;
use crate::subscription::Subscription;
use crate::BufferPolicy;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use streamcast_core::{BackgroundTask, StreamEvent};

pub(crate) type UpstreamFactory<T> =
    Box<dyn FnMut() -> BoxStream<'static, StreamEvent<T>> + Send>;

/// Lifecycle of the pump task.
pub(crate) enum PumpPhase {
    /// No upstream running; started on the next subscription.
    Idle,
    /// A pump task owns the upstream; the handle cancels it on teardown.
    Driving(BackgroundTask),
    /// Absorbing: the upstream ended, no pump ever runs again.
    Terminal,
}

struct Inner<T> {
    config: MulticastConfig,
    /// Last `history_depth` delivered elements, oldest first.
    history: VecDeque<T>,
    /// Live mailboxes keyed by subscription generation.
    registry: HashMap<u64, Arc<Mailbox<T>>>,
    next_id: u64,
    terminal: Option<Terminal>,
    pump: PumpPhase,
    /// Bumped on every pump start and teardown; callbacks carrying a stale
    /// epoch are inert.
    epoch: u64,
    /// Set when the facade is dropped; unconditional teardown.
    closed: bool,
}

impl<T> Inner<T> {
    /// Cancel a driving pump and fall back to `Idle`. A terminal core is
    /// left terminal.
    fn stop_pump(&mut self) {
        if matches!(self.pump, PumpPhase::Driving(_)) {
            if let PumpPhase::Driving(task) = std::mem::replace(&mut self.pump, PumpPhase::Idle) {
                task.cancel();
            }
        }
    }
}

pub(crate) struct SharedCore<T> {
    inner: Mutex<Inner<T>>,
    /// Kept outside `inner` so a starting pump can run user construction
    /// code without holding the core lock.
    factory: Mutex<UpstreamFactory<T>>,
}

impl<T: Clone + Send + 'static> SharedCore<T> {
    pub(crate) fn new(config: MulticastConfig, factory: UpstreamFactory<T>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                config,
                history: VecDeque::new(),
                registry: HashMap::new(),
                next_id: 0,
                terminal: None,
                pump: PumpPhase::Idle,
                epoch: 0,
                closed: false,
            }),
            factory: Mutex::new(factory),
        }
    }

    /// Register a new consumer, replaying history (and the terminal event,
    /// if any) into its mailbox before it can observe anything live.
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        policy: Option<BufferPolicy>,
    ) -> Subscription<T> {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let policy = policy.unwrap_or_else(|| inner.config.buffer.clone());
        let mailbox = Arc::new(Mailbox::new(policy));
        for element in &inner.history {
            mailbox.deliver(element.clone());
        }

        if let Some(terminal) = &inner.terminal {
            // Never registered: the upstream is not re-driven after
            // termination, so this mailbox receives nothing further.
            mailbox.set_terminal(terminal.clone());
            return Subscription::new(id, mailbox, Arc::downgrade(self));
        }

        inner.registry.insert(id, Arc::clone(&mailbox));
        if matches!(inner.pump, PumpPhase::Idle) {
            inner.epoch += 1;
            let epoch = inner.epoch;
            let core = Arc::clone(self);
            let task = BackgroundTask::spawn(move |cancel| pump::run(core, epoch, cancel));
            inner.pump = PumpPhase::Driving(task);
            debug_event!(epoch, subscriber = id, "pump started");
        }
        Subscription::new(id, mailbox, Arc::downgrade(self))
    }

    /// Instantiate the upstream for a pump start, outside the core lock.
    ///
    /// Returns `None` if the start was superseded before the factory ran,
    /// in which case the upstream's startup side effects do not run.
    pub(crate) fn build_upstream(&self, epoch: u64) -> Option<BoxStream<'static, StreamEvent<T>>> {
        let mut factory = self.factory.lock();
        {
            let inner = self.inner.lock();
            if inner.epoch != epoch || inner.terminal.is_some() || inner.closed {
                return None;
            }
        }
        Some((factory)())
    }

    /// Fan one pulled element out to history and every registered mailbox.
    ///
    /// Returns `false` once this pump epoch is no longer current and the
    /// caller should stop pulling.
    pub(crate) fn fan_out(&self, epoch: u64, value: T) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch || inner.terminal.is_some() || inner.closed {
            return false;
        }
        let depth = inner.config.history_depth;
        if depth > 0 {
            if inner.history.len() == depth {
                inner.history.pop_front();
            }
            inner.history.push_back(value.clone());
        }
        inner.registry.retain(|_, mailbox| mailbox.deliver(value.clone()));
        true
    }

    /// Record how the upstream ended and fan the terminal event out.
    ///
    /// Write-once: a stale epoch or an already-terminal core is a no-op.
    pub(crate) fn terminate(&self, epoch: u64, terminal: Terminal) {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch || inner.terminal.is_some() || inner.closed {
            return;
        }
        debug_event!(epoch, failed = matches!(terminal, Terminal::Failed(_)), "upstream terminal");
        inner.terminal = Some(terminal.clone());
        inner.pump = PumpPhase::Terminal;
        for (_, mailbox) in inner.registry.drain() {
            mailbox.set_terminal(terminal.clone());
        }
    }
}

impl<T> SharedCore<T> {
    /// Remove a consumer; on the transition to zero live consumers the
    /// disposal policy decides whether the upstream survives.
    pub(crate) fn deregister(&self, id: u64) {
        let mut inner = self.inner.lock();
        if inner.registry.remove(&id).is_none() {
            return;
        }
        if inner.registry.is_empty()
            && inner.terminal.is_none()
            && !inner.closed
            && inner.config.disposal == DisposalPolicy::DisposeWhenVacant
        {
            debug_event!(epoch = inner.epoch, "vacant, disposing upstream");
            inner.epoch += 1;
            // The upstream is dropped with the cancelled pump and recreated
            // from scratch on the next subscription.
            inner.stop_pump();
            inner.history.clear();
        }
    }

    /// Unconditional teardown when the facade is dropped, independent of
    /// the disposal policy. All mailboxes complete after their buffered
    /// elements.
    pub(crate) fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        debug_event!(epoch = inner.epoch, "facade dropped, tearing down");
        inner.closed = true;
        inner.epoch += 1;
        inner.stop_pump();
        inner.history.clear();
        for (_, mailbox) in inner.registry.drain() {
            mailbox.set_terminal(Terminal::Finished);
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner.lock().registry.len()
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.inner.lock().terminal.is_some()
    }
}
