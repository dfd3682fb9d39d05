// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One consumer's view of a multicast source.

use crate::mailbox::{Mailbox, TakeOutcome};
use crate::state::SharedCore;
use event_listener::EventListener;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use streamcast_core::StreamEvent;

/// A stream of events delivered to a single consumer.
///
/// Created by [`Multicast::subscribe`](crate::Multicast::subscribe). Each
/// subscription drains its own mailbox independently of every other
/// consumer: a slow subscription never delays a fast one.
///
/// The stream yields replayed history first, then live elements in pump
/// order; an upstream failure is yielded exactly once, after which — and
/// after normal completion — polling returns `None` forever.
///
/// Dropping the subscription unsubscribes the consumer without draining its
/// remaining buffered elements. It holds only a weak reference back to the
/// engine, so abandoned subscriptions never keep a multicast alive.
pub struct Subscription<T> {
    id: u64,
    mailbox: Arc<Mailbox<T>>,
    core: Weak<SharedCore<T>>,
    /// The single suspended reader slot for this mailbox.
    listener: Option<EventListener>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(id: u64, mailbox: Arc<Mailbox<T>>, core: Weak<SharedCore<T>>) -> Self {
        Self {
            id,
            mailbox,
            core,
            listener: None,
        }
    }
}

impl<T> Stream for Subscription<T> {
    type Item = StreamEvent<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.mailbox.take() {
                TakeOutcome::Event(event) => {
                    this.listener = None;
                    return Poll::Ready(Some(event));
                }
                TakeOutcome::Ended => {
                    this.listener = None;
                    return Poll::Ready(None);
                }
                TakeOutcome::Empty => match this.listener.as_mut() {
                    None => {
                        // Register, then re-check: a delivery racing with
                        // the registration would otherwise be missed.
                        this.listener = Some(this.mailbox.listen());
                    }
                    Some(listener) => match Pin::new(listener).poll(cx) {
                        Poll::Ready(()) => this.listener = None,
                        Poll::Pending => return Poll::Pending,
                    },
                },
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.mailbox.mark_dead();
        if let Some(core) = self.core.upgrade() {
            core.deregister(self.id);
        }
    }
}
