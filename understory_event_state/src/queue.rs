// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed event queue with stoppable dispatch.
//!
//! Controllers mutate their state first and push the events describing the
//! change afterwards, so a listener never observes a half-applied transition.
//! The host drains the queue and forwards events wherever it likes, or runs a
//! handler over them with [`EventQueue::dispatch`].
//!
//! ```
//! use understory_event_state::queue::{EventQueue, Outcome};
//!
//! let mut queue = EventQueue::new();
//! queue.push("show");
//! queue.push("shown");
//! queue.push("hide");
//!
//! let mut seen = Vec::new();
//! let stopped = queue.dispatch(|event| {
//!     seen.push(*event);
//!     if *event == "shown" { Outcome::Stop } else { Outcome::Continue }
//! });
//! assert_eq!(stopped, Some("shown"));
//! assert_eq!(seen, ["show", "shown"]);
//! assert_eq!(queue.drain(), ["hide"]);
//! ```

use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// Propagation control returned by a dispatch handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep delivering.
    Continue,
    /// Stop delivering; remaining events stay queued.
    Stop,
}

/// FIFO queue of events emitted by a controller.
#[derive(Clone, Debug)]
pub struct EventQueue<E> {
    events: VecDeque<E>,
}

impl<E> EventQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Append an event.
    pub fn push(&mut self, event: E) {
        self.events.push_back(event);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over queued events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }

    /// Take every queued event in emission order.
    pub fn drain(&mut self) -> Vec<E> {
        self.events.drain(..).collect()
    }

    /// Deliver queued events in order until the handler stops.
    ///
    /// Returns the event that stopped delivery, or `None` if every event was
    /// delivered. Events after the stopping one remain queued.
    pub fn dispatch(&mut self, mut handler: impl FnMut(&E) -> Outcome) -> Option<E> {
        while let Some(event) = self.events.pop_front() {
            if handler(&event) == Outcome::Stop {
                return Some(event);
            }
        }
        None
    }

    /// Discard queued events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Extend<E> for EventQueue<E> {
    fn extend<T: IntoIterator<Item = E>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}
