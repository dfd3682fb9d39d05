// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Construction-time configuration for a [`Multicast`](crate::Multicast).
//!
//! All configuration is immutable once the multicast exists. Invalid
//! configuration is a programmer error and panics at construction; it is
//! never surfaced as a runtime failure.

/// Overflow behavior of a consumer mailbox.
///
/// The pump delivers to each mailbox independently; no policy ever blocks
/// the pump's own pull loop or delivery to other mailboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferPolicy {
    /// No capacity limit; delivery always appends.
    Unbounded,
    /// At most `n` elements buffered for the consumer; further deliveries
    /// are held back for this mailbox only and admitted as the consumer
    /// makes room. Nothing is ever dropped.
    Bounded(usize),
    /// At most `n` elements; once full, newly delivered elements are
    /// discarded and the oldest buffered ones are kept.
    DropNewest(usize),
    /// At most `n` elements; once full, the oldest buffered element is
    /// evicted to admit the newly delivered one.
    DropOldest(usize),
}

impl BufferPolicy {
    /// The configured capacity, if this policy carries one.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(n) | Self::DropNewest(n) | Self::DropOldest(n) => Some(*n),
        }
    }

    pub(crate) fn assert_valid(&self) {
        if let Some(0) = self.capacity() {
            panic!("buffer policy capacity must be at least 1, got {self:?}");
        }
    }
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self::Unbounded
    }
}

/// What happens when the live-consumer count drops to zero before the
/// upstream has terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisposalPolicy {
    /// Keep the upstream, pump and history alive through the vacancy; a
    /// later subscriber resumes against the same running upstream and first
    /// receives buffered history.
    #[default]
    RetainUntilTerminal,
    /// Tear the upstream, pump and history down immediately; a later
    /// subscriber causes a fresh upstream instance to be created, with its
    /// own startup side effects re-run and no memory of prior output.
    DisposeWhenVacant,
}

/// Immutable configuration of a [`Multicast`](crate::Multicast).
///
/// # Example
///
/// ```
/// use streamcast_stream::{BufferPolicy, DisposalPolicy, MulticastConfig};
///
/// let config = MulticastConfig::default()
///     .history_depth(8)
///     .buffer(BufferPolicy::Bounded(16))
///     .disposal(DisposalPolicy::DisposeWhenVacant);
/// assert_eq!(config.history_depth, 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MulticastConfig {
    /// Number of most recently delivered elements replayed to late
    /// subscribers. Zero disables replay.
    pub history_depth: usize,
    /// Default buffering policy for mailboxes; individual subscriptions can
    /// override it via
    /// [`subscribe_with`](crate::Multicast::subscribe_with).
    pub buffer: BufferPolicy,
    /// Lifetime of the upstream and history across consumer vacancy.
    pub disposal: DisposalPolicy,
}

impl MulticastConfig {
    /// Sets the history replay depth.
    #[must_use]
    pub fn history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Sets the default mailbox buffering policy.
    #[must_use]
    pub fn buffer(mut self, policy: BufferPolicy) -> Self {
        self.buffer = policy;
        self
    }

    /// Sets the disposal policy.
    #[must_use]
    pub fn disposal(mut self, policy: DisposalPolicy) -> Self {
        self.disposal = policy;
        self
    }

    pub(crate) fn assert_valid(&self) {
        self.buffer.assert_valid();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unbounded_retaining_with_no_history() {
        let config = MulticastConfig::default();
        assert_eq!(config.history_depth, 0);
        assert_eq!(config.buffer, BufferPolicy::Unbounded);
        assert_eq!(config.disposal, DisposalPolicy::RetainUntilTerminal);
    }

    #[test]
    fn capacity_reports_policy_limits() {
        assert_eq!(BufferPolicy::Unbounded.capacity(), None);
        assert_eq!(BufferPolicy::Bounded(4).capacity(), Some(4));
        assert_eq!(BufferPolicy::DropNewest(2).capacity(), Some(2));
        assert_eq!(BufferPolicy::DropOldest(7).capacity(), Some(7));
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn zero_bounded_capacity_is_rejected() {
        BufferPolicy::Bounded(0).assert_valid();
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn zero_drop_newest_capacity_is_rejected() {
        BufferPolicy::DropNewest(0).assert_valid();
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn zero_drop_oldest_capacity_is_rejected() {
        BufferPolicy::DropOldest(0).assert_valid();
    }
}
