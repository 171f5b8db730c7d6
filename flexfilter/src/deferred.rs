//! Work posted to run after the current update has settled.
//!
//! Adding a dropdown filter creates its input on the rendering surface only
//! after the state change has been rendered, so focusing that input cannot
//! happen in the same step. The session posts a [`Deferred`] task instead and
//! the host runs the queue with [`FilterSession::settle`](crate::FilterSession::settle)
//! once the new element exists, before it processes further input.

use std::collections::VecDeque;

/// The part of the rendering surface the session drives directly.
pub trait RenderSurface {
    /// Move keyboard focus to the input of the active filter `key`.
    ///
    /// Returns `false` when no such input exists (for example because the
    /// filter was removed before the task ran).
    fn focus_filter_input(&mut self, key: &str) -> bool;
}

/// A task waiting for the next settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Focus the input of a freshly added filter.
    FocusFilterInput(String),
}

impl Deferred {
    /// The filter this task concerns.
    pub fn filter_key(&self) -> &str {
        match self {
            Deferred::FocusFilterInput(key) => key,
        }
    }
}

/// FIFO of deferred tasks.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<Deferred>,
}

impl DeferredQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a task.
    pub fn post(&mut self, task: Deferred) {
        log::debug!("deferred task posted: {:?}", task);
        self.tasks.push_back(task);
    }

    /// Take every pending task in posting order.
    pub fn drain(&mut self) -> Vec<Deferred> {
        self.tasks.drain(..).collect()
    }

    /// Drop pending tasks for `key`. Returns how many were dropped.
    pub fn discard_for(&mut self, key: &str) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.filter_key() != key);
        before - self.tasks.len()
    }

    /// Pending tasks in posting order.
    pub fn iter(&self) -> impl Iterator<Item = &Deferred> {
        self.tasks.iter()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = DeferredQueue::new();
        queue.post(Deferred::FocusFilterInput("a".into()));
        queue.post(Deferred::FocusFilterInput("b".into()));
        assert_eq!(
            queue.drain(),
            vec![
                Deferred::FocusFilterInput("a".into()),
                Deferred::FocusFilterInput("b".into())
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_discard_for_key() {
        let mut queue = DeferredQueue::new();
        queue.post(Deferred::FocusFilterInput("a".into()));
        queue.post(Deferred::FocusFilterInput("b".into()));
        assert_eq!(queue.discard_for("a"), 1);
        assert_eq!(queue.discard_for("missing"), 0);
        assert_eq!(queue.len(), 1);
    }
}
