//! Single-slot mailbox turning the next canvas or list click into a pick
//!
//! A caller that wants the user to point at something registers a callback
//! with [`PickMailbox::begin_pick`]. The next [`PickMailbox::submit_pick`]
//! hands the clicked item to that callback and empties the mailbox. There
//! is no queue: registering a second callback drops the first one unfired.

use std::fmt;

use tracing::debug;

/// What the user clicked while a pick was pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    Element(String),
    Constant(String),
    /// The pick was abandoned, e.g. with Escape
    Cancelled,
}

pub type PickCallback = Box<dyn FnOnce(Pick)>;

#[derive(Default)]
pub struct PickMailbox {
    pending: Option<PickCallback>,
}

impl PickMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next pick, replacing any request already pending
    pub fn begin_pick<F>(&mut self, on_resolved: F)
    where
        F: FnOnce(Pick) + 'static,
    {
        if self.pending.replace(Box::new(on_resolved)).is_some() {
            debug!("pending pick request replaced");
        }
    }

    /// Deliver `pick` to the pending request
    ///
    /// Returns false when nothing was waiting; the caller then falls back
    /// to its ordinary click behavior.
    pub fn submit_pick(&mut self, pick: Pick) -> bool {
        match self.pending.take() {
            Some(callback) => {
                debug!(?pick, "pick delivered");
                callback(pick);
                true
            }
            None => false,
        }
    }

    /// Resolve the pending request with [`Pick::Cancelled`]
    pub fn cancel_pick(&mut self) -> bool {
        self.submit_pick(Pick::Cancelled)
    }

    pub fn is_awaiting(&self) -> bool {
        self.pending.is_some()
    }
}

impl fmt::Debug for PickMailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickMailbox")
            .field("awaiting", &self.is_awaiting())
            .finish()
    }
}
