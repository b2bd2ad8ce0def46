// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced viewport resize.
//!
//! Resize events arrive in bursts while a window is dragged. Layout-sensitive
//! work (menu flow direction, pane heights, mobile/desktop switches) should run
//! once the burst is over. [`Debounce`] records the latest width and reports
//! [`Settled`] once `delay` milliseconds pass without a further width change.
//!
//! Height-only resizes are ignored: on mobile browsers the toolbar collapsing
//! while scrolling changes the height on every scroll.
//!
//! ```
//! use understory_event_state::debounce::{Debounce, Settled};
//!
//! let mut debounce = Debounce::new(150);
//! debounce.on_resize(800.0, 0);
//! debounce.on_resize(760.0, 40);
//! assert_eq!(debounce.poll(150), None);
//! assert_eq!(debounce.poll(190), Some(Settled { width: 760.0 }));
//! ```

/// A resize burst has ended.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settled {
    /// Viewport width after the burst.
    pub width: f64,
}

/// Trailing-edge debounce for viewport width changes.
#[derive(Clone, Debug)]
pub struct Debounce {
    delay: u64,
    width: Option<f64>,
    deadline: Option<u64>,
}

impl Debounce {
    /// Delay used by navigation components: 150 ms.
    pub const DEFAULT_DELAY: u64 = 150;

    /// Create a debounce with the given delay in milliseconds.
    pub fn new(delay: u64) -> Self {
        Self {
            delay,
            width: None,
            deadline: None,
        }
    }

    /// Configured delay.
    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Last width seen, if any.
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Record a viewport resize at `now`.
    ///
    /// Restarts the timer when the width differs from the last one seen and
    /// returns whether it did.
    pub fn on_resize(&mut self, width: f64, now: u64) -> bool {
        if self.width == Some(width) {
            return false;
        }
        self.width = Some(width);
        self.deadline = Some(now + self.delay);
        true
    }

    /// Report [`Settled`] once the quiet period has elapsed.
    pub fn poll(&mut self, now: u64) -> Option<Settled> {
        let due = self.deadline?;
        if due > now {
            return None;
        }
        self.deadline = None;
        let width = self.width?;
        tracing::trace!(message = "resize.settled", width);
        Some(Settled { width })
    }

    /// Timestamp at which [`Debounce::poll`] next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Drop the pending timer without forgetting the last width.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
