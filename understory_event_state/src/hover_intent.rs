// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover intent: tell a deliberate hover apart from a pointer passing through.
//!
//! A plain `mouseenter` opens a menu the moment the pointer crosses it, which
//! makes navbars flicker as the pointer travels to something else. Hover
//! intent instead samples the pointer once per `interval` while it is inside
//! the element and only reports [`HoverIntentEvent::Over`] once the distance
//! travelled between two consecutive samples drops below `sensitivity`. On
//! leave it reports [`HoverIntentEvent::Out`], optionally after a `timeout`
//! that is canceled by re-entering.
//!
//! The recognizer owns no clock. Feed it timestamps in milliseconds and call
//! [`HoverIntent::poll`] whenever [`HoverIntent::next_deadline`] has passed.
//!
//! ```
//! use understory_event_state::hover_intent::{HoverIntent, HoverIntentConfig, HoverIntentEvent};
//! use kurbo::Point;
//!
//! let mut hover = HoverIntent::new(HoverIntentConfig::default());
//! hover.on_enter(Point::new(0.0, 0.0), 1000);
//! hover.on_move(Point::new(40.0, 0.0)); // still travelling
//! assert_eq!(hover.poll(1100), None);
//! hover.on_move(Point::new(42.0, 1.0)); // settled
//! assert_eq!(hover.poll(1200), Some(HoverIntentEvent::Over));
//! ```

use kurbo::Point;

/// Hover intent tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HoverIntentConfig {
    /// Maximum Manhattan distance in pixels between two samples that still counts as resting.
    pub sensitivity: f64,
    /// Sampling interval in milliseconds.
    pub interval: u64,
    /// Delay in milliseconds between leaving and reporting [`HoverIntentEvent::Out`].
    pub timeout: u64,
}

impl Default for HoverIntentConfig {
    fn default() -> Self {
        Self {
            sensitivity: 7.0,
            interval: 100,
            timeout: 0,
        }
    }
}

/// Output of the hover intent recognizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverIntentEvent {
    /// The pointer has settled over the element.
    Over,
    /// The pointer has left the element (after the configured timeout).
    Out,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Timer {
    Compare(u64),
    Out(u64),
}

/// Hover intent state for one element.
#[derive(Clone, Debug)]
pub struct HoverIntent {
    config: HoverIntentConfig,
    previous: Point,
    current: Point,
    tracking: bool,
    inside: bool,
    timer: Option<Timer>,
}

impl HoverIntent {
    /// Create a recognizer with the given configuration.
    pub fn new(config: HoverIntentConfig) -> Self {
        Self {
            config,
            previous: Point::ZERO,
            current: Point::ZERO,
            tracking: false,
            inside: false,
            timer: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &HoverIntentConfig {
        &self.config
    }

    /// Pointer entered the element.
    ///
    /// Cancels any pending out timer and starts sampling.
    pub fn on_enter(&mut self, position: Point, now: u64) {
        self.inside = true;
        self.previous = position;
        self.current = position;
        self.tracking = true;
        self.timer = Some(Timer::Compare(now + self.config.interval));
    }

    /// Pointer moved inside the element.
    pub fn on_move(&mut self, position: Point) {
        if self.tracking {
            self.current = position;
        }
    }

    /// Pointer left the element.
    ///
    /// Returns [`HoverIntentEvent::Out`] right away when no timeout is configured.
    /// `Out` is reported even if `Over` never fired; consumers that only
    /// close what is open can ignore it.
    pub fn on_leave(&mut self, now: u64) -> Option<HoverIntentEvent> {
        self.timer = None;
        self.tracking = false;
        if !self.inside {
            return None;
        }
        self.inside = false;
        if self.config.timeout > 0 {
            self.timer = Some(Timer::Out(now + self.config.timeout));
            None
        } else {
            Some(HoverIntentEvent::Out)
        }
    }

    /// Run any timer that is due at `now`.
    pub fn poll(&mut self, now: u64) -> Option<HoverIntentEvent> {
        loop {
            match self.timer? {
                Timer::Compare(due) if due <= now => {
                    let delta = self.current - self.previous;
                    if delta.x.abs() + delta.y.abs() < self.config.sensitivity {
                        self.tracking = false;
                        self.inside = true;
                        self.timer = None;
                        return Some(HoverIntentEvent::Over);
                    }
                    self.previous = self.current;
                    self.timer = Some(Timer::Compare(due + self.config.interval));
                }
                Timer::Out(due) if due <= now => {
                    self.timer = None;
                    return (!self.inside).then_some(HoverIntentEvent::Out);
                }
                _ => return None,
            }
        }
    }

    /// Timestamp at which [`HoverIntent::poll`] next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timer.map(|t| match t {
            Timer::Compare(d) | Timer::Out(d) => d,
        })
    }

    /// Drop all pending timers and tracking.
    pub fn reset(&mut self) {
        self.timer = None;
        self.tracking = false;
        self.inside = false;
    }
}

impl Default for HoverIntent {
    fn default() -> Self {
        Self::new(HoverIntentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resting_pointer_fires_after_one_interval() {
        let mut hover = HoverIntent::default();
        hover.on_enter(Point::new(5.0, 5.0), 1000);
        assert_eq!(hover.next_deadline(), Some(1100));
        assert_eq!(hover.poll(1099), None);
        assert_eq!(hover.poll(1100), Some(HoverIntentEvent::Over));
        assert_eq!(hover.next_deadline(), None);
    }

    #[test]
    fn travelling_pointer_resamples() {
        let mut hover = HoverIntent::default();
        hover.on_enter(Point::new(0.0, 0.0), 0);
        hover.on_move(Point::new(30.0, 0.0));
        assert_eq!(hover.poll(100), None);
        assert_eq!(hover.next_deadline(), Some(200));
        hover.on_move(Point::new(60.0, 0.0));
        assert_eq!(hover.poll(200), None);
        hover.on_move(Point::new(63.0, 3.0));
        assert_eq!(hover.poll(300), Some(HoverIntentEvent::Over));
    }

    #[test]
    fn late_poll_catches_up() {
        let mut hover = HoverIntent::default();
        hover.on_enter(Point::new(0.0, 0.0), 0);
        hover.on_move(Point::new(30.0, 0.0));
        // The pointer has not moved since the first sample, so the second sample settles.
        assert_eq!(hover.poll(250), Some(HoverIntentEvent::Over));
    }

    #[test]
    fn leave_without_timeout_reports_out_immediately() {
        let mut hover = HoverIntent::default();
        hover.on_enter(Point::ZERO, 0);
        assert_eq!(hover.poll(100), Some(HoverIntentEvent::Over));
        assert_eq!(hover.on_leave(150), Some(HoverIntentEvent::Out));
        assert_eq!(hover.on_leave(160), None, "second leave is ignored");
    }

    #[test]
    fn leave_with_timeout_waits_and_reenter_cancels() {
        let mut hover = HoverIntent::new(HoverIntentConfig {
            timeout: 250,
            ..HoverIntentConfig::default()
        });
        hover.on_enter(Point::ZERO, 0);
        assert_eq!(hover.poll(100), Some(HoverIntentEvent::Over));

        assert_eq!(hover.on_leave(200), None);
        assert_eq!(hover.poll(449), None);
        assert_eq!(hover.poll(450), Some(HoverIntentEvent::Out));

        hover.on_enter(Point::ZERO, 500);
        assert_eq!(hover.poll(600), Some(HoverIntentEvent::Over));
        assert_eq!(hover.on_leave(700), None);
        hover.on_enter(Point::ZERO, 800);
        assert_eq!(hover.poll(950), Some(HoverIntentEvent::Over));
        assert_eq!(hover.poll(2000), None, "re-entering canceled the out timer");
    }

    #[test]
    fn leave_before_over_cancels_sampling() {
        let mut hover = HoverIntent::default();
        hover.on_enter(Point::ZERO, 0);
        assert_eq!(hover.on_leave(50), Some(HoverIntentEvent::Out));
        assert_eq!(hover.poll(500), None);
    }

    #[test]
    fn moves_are_ignored_when_not_tracking() {
        let mut hover = HoverIntent::default();
        hover.on_move(Point::new(100.0, 100.0));
        assert_eq!(hover.poll(1000), None);
    }

    proptest! {
        #[test]
        fn over_fires_one_interval_after_last_sample(
            start_x in -500.0_f64..500.0,
            start_y in -500.0_f64..500.0,
            travel in 8.0_f64..200.0,
            jitter_x in -3.4_f64..3.4,
            jitter_y in -3.4_f64..3.4,
            interval in 10_u64..400,
            enter_at in 0_u64..10_000,
        ) {
            let mut hover = HoverIntent::new(HoverIntentConfig {
                interval,
                ..HoverIntentConfig::default()
            });
            let start = Point::new(start_x, start_y);
            hover.on_enter(start, enter_at);

            // First sample: pointer travelled at least `sensitivity`, so no intent yet.
            let sampled = Point::new(start_x + travel, start_y);
            hover.on_move(sampled);
            prop_assert_eq!(hover.poll(enter_at + interval), None);

            // Below-sensitivity drift after the last sample fires exactly one interval later.
            hover.on_move(Point::new(sampled.x + jitter_x, sampled.y + jitter_y));
            let last_sample = enter_at + interval;
            prop_assert_eq!(hover.poll(last_sample + interval - 1), None);
            prop_assert_eq!(hover.poll(last_sample + interval), Some(HoverIntentEvent::Over));
        }
    }
}
