// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap recognition for touch-activated controls.
//!
//! Touch screens deliver a `touchend` on a control even when the user was
//! scrolling past it. A toggle that reacts to `touchend` must therefore ignore
//! presses during which the finger moved. [`TapState`] tracks each touch
//! point from down to up and reports a [`TapResult::Tap`] only for presses
//! that stayed put and ended on the element they started on.
//!
//! ## Usage
//!
//! ```
//! use understory_event_state::tap::{TapResult, TapState};
//! use kurbo::Point;
//!
//! let mut state: TapState<u32> = TapState::new();
//!
//! // A still press on toggle 7 is a tap.
//! state.on_down(None, 7, Point::new(10.0, 10.0), 1000);
//! assert_eq!(state.on_up(None, &7, 1080), TapResult::Tap(7));
//!
//! // A press that scrolled is not.
//! state.on_down(None, 7, Point::new(10.0, 10.0), 2000);
//! state.on_move(None, Point::new(10.0, 60.0));
//! assert_eq!(state.on_up(None, &7, 2100), TapResult::Suppressed(Some(7)));
//! ```
//!
//! ## Rules
//!
//! 1. **Drag**: any move farther than `drag_threshold` from the down position
//!    marks the press as dragged; a dragged press never taps.
//! 2. **Target**: the release must land on the pressed target.
//! 3. **No Active Press**: a release without a press is suppressed.
//!
//! Each touch point is tracked independently by its [`PointerId`].

use alloc::collections::BTreeMap;
use core::num::NonZeroU64;
use kurbo::Point;

/// Pointer identifier for tracking multiple concurrent touches.
pub type PointerId = NonZeroU64;

const PRIMARY: PointerId = NonZeroU64::MIN;

/// Touch tap state machine.
#[derive(Clone, Debug)]
pub struct TapState<K> {
    presses: BTreeMap<PointerId, Press<K>>,
    /// Distance in pixels a touch may travel before the press counts as a drag.
    ///
    /// The default of `0.0` matches browsers, which only report `touchmove`
    /// once the finger has left its slop region.
    pub drag_threshold: f64,
}

/// State for an active touch press.
#[derive(Clone, Debug)]
pub struct Press<K> {
    /// Element the press started on.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Timestamp of the press in milliseconds.
    pub down_time: u64,
    /// Whether the touch moved past the drag threshold.
    pub dragged: bool,
}

/// Result of a touch release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TapResult<K> {
    /// Activate the target.
    Tap(K),
    /// Ignore the release; carries the pressed target when there was one.
    Suppressed(Option<K>),
}

impl<K: PartialEq + Clone> TapState<K> {
    /// Create a tap state where any reported move counts as a drag.
    pub fn new() -> Self {
        Self::with_drag_threshold(0.0)
    }

    /// Create a tap state with a custom drag threshold in pixels.
    pub fn with_drag_threshold(drag_threshold: f64) -> Self {
        Self {
            presses: BTreeMap::new(),
            drag_threshold,
        }
    }

    /// Record a touch start on `target`.
    pub fn on_down(
        &mut self,
        pointer_id: Option<PointerId>,
        target: K,
        position: Point,
        timestamp: u64,
    ) {
        self.presses.insert(
            pointer_id.unwrap_or(PRIMARY),
            Press {
                target,
                down_position: position,
                down_time: timestamp,
                dragged: false,
            },
        );
    }

    /// Record a touch move.
    ///
    /// Returns the pressed target the first time the press turns into a drag.
    pub fn on_move(&mut self, pointer_id: Option<PointerId>, position: Point) -> Option<K> {
        let press = self.presses.get_mut(&pointer_id.unwrap_or(PRIMARY))?;
        if press.dragged {
            return None;
        }
        let delta = position - press.down_position;
        // Manhattan distance keeps this free of `sqrt` for `no_std` builds.
        if delta.x.abs() + delta.y.abs() > self.drag_threshold {
            press.dragged = true;
            tracing::trace!(message = "tap.drag", x = position.x, y = position.y);
            return Some(press.target.clone());
        }
        None
    }

    /// Record a touch end on `current_target` and decide whether it is a tap.
    pub fn on_up(
        &mut self,
        pointer_id: Option<PointerId>,
        current_target: &K,
        timestamp: u64,
    ) -> TapResult<K> {
        let Some(press) = self.presses.remove(&pointer_id.unwrap_or(PRIMARY)) else {
            return TapResult::Suppressed(None);
        };
        if press.dragged || press.target != *current_target {
            tracing::trace!(
                message = "tap.suppressed",
                dragged = press.dragged,
                held_ms = timestamp.saturating_sub(press.down_time)
            );
            return TapResult::Suppressed(Some(press.target));
        }
        TapResult::Tap(press.target)
    }

    /// Cancel the press for a pointer (for example on `touchcancel`).
    ///
    /// Returns `true` if a press was canceled.
    pub fn cancel(&mut self, pointer_id: Option<PointerId>) -> bool {
        self.presses.remove(&pointer_id.unwrap_or(PRIMARY)).is_some()
    }

    /// Check if a pointer has an active press.
    pub fn is_pressed(&self, pointer_id: Option<PointerId>) -> bool {
        self.presses.contains_key(&pointer_id.unwrap_or(PRIMARY))
    }

    /// Get the active press for a pointer.
    pub fn get_press(&self, pointer_id: PointerId) -> Option<&Press<K>> {
        self.presses.get(&pointer_id)
    }

    /// Clear all active presses.
    pub fn clear(&mut self) {
        self.presses.clear();
    }
}

impl<K: PartialEq + Clone> Default for TapState<K> {
    fn default() -> Self {
        Self::new()
    }
}
