//! Deferred work on the host's event loop.
//!
//! The strip never blocks. Work that must wait (the selection notification
//! after a paging scroll, the refresh after a transition commits) is queued
//! here with a due instant and run by
//! [`ExpandableStrip::on_frame`](crate::strip::ExpandableStrip::on_frame).
//! Tasks with the same due instant run in the order they were queued.
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::{Duration, Instant},
};

/// Work the strip defers to a later turn of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Report the page starting at `position` to the listener.
    NotifySelection {
        /// Paging position the scroll settled on.
        position: usize,
    },
    /// Recompute all derived state, then report the selection.
    RefreshAndNotify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    due: Instant,
    seq: u64,
    task: DeferredTask,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Queue of [`DeferredTask`]s ordered by due instant.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `task` to run `delay` after `now`.
    pub fn schedule(&mut self, task: DeferredTask, now: Instant, delay: Duration) {
        let due = now.checked_add(delay).unwrap_or(now);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.push(Reverse(Entry { due, seq, task }));
    }

    /// Queues `task` for the next turn of the event loop.
    pub fn post(&mut self, task: DeferredTask, now: Instant) {
        self.schedule(task, now, Duration::ZERO);
    }

    /// Removes and returns the earliest task due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<DeferredTask> {
        if self.queue.peek()?.0.due > now {
            return None;
        }
        self.queue.pop().map(|Reverse(entry)| entry.task)
    }

    /// Drops every queued task matching `stale`. Returns how many were
    /// dropped.
    pub fn cancel(&mut self, mut stale: impl FnMut(&DeferredTask) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(entry)| !stale(&entry.task));
        before - self.queue.len()
    }

    /// Earliest due instant, if anything is queued.
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
