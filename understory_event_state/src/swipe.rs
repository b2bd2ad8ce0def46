// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe-to-close recognition for edge-anchored drawers.
//!
//! A drawer anchored to one edge of the viewport can be dismissed by dragging
//! it back toward that edge. [`SwipeTracker`] follows one touch or mouse drag:
//!
//! - Down records the start position and time.
//! - Moves become a drag once horizontal travel dominates vertical travel,
//!   exceeds a noise threshold, and points in the closing direction. While
//!   dragging, each move yields a [`DragUpdate`] with the drawer translation
//!   and the overlay opacity to render.
//! - Release yields a [`SwipeDecision`]. Fast releases (velocity above the
//!   threshold) close when moving in the closing direction. Slow releases close
//!   once the drawer has been dragged past a fraction of its width.
//!
//! Translations follow the drawer's open offset convention: a left drawer is
//! open at `+extent` and closed at `0`, a right drawer is open at `-extent`
//! and closed at `0`.
//!
//! ```
//! use understory_event_state::swipe::{Edge, SwipeConfig, SwipeDecision, SwipeTracker};
//! use kurbo::Point;
//!
//! let mut swipe = SwipeTracker::new(Edge::Left, SwipeConfig::default());
//! swipe.on_down(Point::new(250.0, 100.0), 0);
//! let update = swipe.on_move(Point::new(100.0, 104.0), 300.0).unwrap();
//! assert_eq!(update.translate_x, 150.0);
//! assert_eq!(swipe.on_up(2000, 300.0), Some(SwipeDecision::Close));
//! ```

use kurbo::Point;

/// Edge of the viewport a drawer is anchored to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// Drawer slides in from the left; swiping left closes it.
    Left,
    /// Drawer slides in from the right; swiping right closes it.
    Right,
}

impl Edge {
    /// `true` if a horizontal displacement of `dx` points toward this edge.
    pub fn is_closing(self, dx: f64) -> bool {
        match self {
            Self::Left => dx < 0.0,
            Self::Right => dx > 0.0,
        }
    }

    /// Translation of a fully open drawer of width `extent`.
    pub fn open_offset(self, extent: f64) -> f64 {
        match self {
            Self::Left => extent,
            Self::Right => -extent,
        }
    }

    /// Clamp a translation to the closing range between open and closed.
    pub fn clamp_offset(self, translate_x: f64, extent: f64) -> f64 {
        match self {
            Self::Left => translate_x.clamp(0.0, extent),
            Self::Right => translate_x.clamp(-extent, 0.0),
        }
    }
}

/// Swipe recognition tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SwipeConfig {
    /// Horizontal travel in pixels below which movement is treated as noise.
    pub noise_threshold: f64,
    /// Release velocity in pixels per millisecond above which direction alone decides.
    pub velocity_threshold: f64,
    /// Fraction of the drawer width a slow drag must cover to close.
    pub snap_fraction: f64,
    /// Duration in milliseconds of the snap animation after release.
    pub snap_duration: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            noise_threshold: 10.0,
            velocity_threshold: 0.3,
            snap_fraction: 0.5,
            snap_duration: 300,
        }
    }
}

/// Transient state of one drag, from down to release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeGesture {
    /// Pointer position at down.
    pub start: Point,
    /// Latest pointer position.
    pub current: Point,
    /// Timestamp of the down event in milliseconds.
    pub start_time: u64,
    /// Whether the gesture has become a closing drag.
    pub dragging: bool,
}

/// Render state while a drag is in progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragUpdate {
    /// Drawer translation in pixels, clamped between open and closed.
    pub translate_x: f64,
    /// Overlay opacity in `0.0..=1.0`, proportional to how open the drawer still is.
    pub overlay_opacity: f64,
}

/// Outcome of releasing a drag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwipeDecision {
    /// Animate to closed.
    Close,
    /// Animate back to open.
    SnapBack,
}

/// Swipe-to-close recognizer for one drawer.
#[derive(Clone, Debug)]
pub struct SwipeTracker {
    edge: Edge,
    config: SwipeConfig,
    gesture: Option<SwipeGesture>,
}

impl SwipeTracker {
    /// Create a tracker for a drawer anchored to `edge`.
    pub fn new(edge: Edge, config: SwipeConfig) -> Self {
        Self {
            edge,
            config,
            gesture: None,
        }
    }

    /// Anchored edge.
    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Active configuration.
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Gesture in progress, if any.
    pub fn gesture(&self) -> Option<&SwipeGesture> {
        self.gesture.as_ref()
    }

    /// `true` while a closing drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some_and(|g| g.dragging)
    }

    /// Pointer or touch down. Replaces any gesture in progress.
    pub fn on_down(&mut self, position: Point, now: u64) {
        self.gesture = Some(SwipeGesture {
            start: position,
            current: position,
            start_time: now,
            dragging: false,
        });
    }

    /// Pointer or touch move for a drawer of width `extent`.
    ///
    /// Returns the render state when the move is part of a closing drag.
    pub fn on_move(&mut self, position: Point, extent: f64) -> Option<DragUpdate> {
        let edge = self.edge;
        let noise = self.config.noise_threshold;
        let gesture = self.gesture.as_mut()?;
        gesture.current = position;
        if extent <= 0.0 {
            return None;
        }
        let delta = gesture.current - gesture.start;
        if delta.x.abs() <= delta.y.abs() || delta.x.abs() <= noise || !edge.is_closing(delta.x) {
            return None;
        }
        gesture.dragging = true;
        let translate_x = edge.clamp_offset(edge.open_offset(extent) + delta.x, extent);
        Some(DragUpdate {
            translate_x,
            overlay_opacity: translate_x.abs() / extent,
        })
    }

    /// Release the pointer at `now` and decide how the drawer settles.
    ///
    /// Returns `None` when no closing drag took place, or when the final
    /// displacement is more vertical than horizontal.
    pub fn on_up(&mut self, now: u64, extent: f64) -> Option<SwipeDecision> {
        let gesture = self.gesture.take()?;
        if !gesture.dragging {
            return None;
        }
        let delta = gesture.current - gesture.start;
        if delta.x.abs() <= delta.y.abs() {
            return None;
        }
        let elapsed = now.saturating_sub(gesture.start_time).max(1);
        #[allow(
            clippy::cast_precision_loss,
            reason = "gesture durations are far below 2^52 ms"
        )]
        let velocity = delta.x.abs() / elapsed as f64;
        let closing = self.edge.is_closing(delta.x);
        let decision = if velocity > self.config.velocity_threshold {
            if closing {
                SwipeDecision::Close
            } else {
                SwipeDecision::SnapBack
            }
        } else if closing && extent > 0.0 && delta.x.abs() / extent > self.config.snap_fraction {
            SwipeDecision::Close
        } else {
            SwipeDecision::SnapBack
        };
        tracing::debug!(
            message = "swipe.release",
            dx = delta.x,
            elapsed,
            velocity,
            ?decision
        );
        Some(decision)
    }

    /// Abandon the gesture in progress.
    pub fn cancel(&mut self) {
        self.gesture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: f64 = 300.0;

    fn tracker(edge: Edge) -> SwipeTracker {
        SwipeTracker::new(edge, SwipeConfig::default())
    }

    #[test]
    fn slow_drag_past_half_closes() {
        let mut swipe = tracker(Edge::Left);
        swipe.on_down(Point::new(280.0, 50.0), 0);
        assert!(swipe.on_move(Point::new(120.0, 55.0), WIDTH).is_some());
        // 160px over 1000ms: 0.16 px/ms, slow; 160/300 > 0.5.
        assert_eq!(swipe.on_up(1000, WIDTH), Some(SwipeDecision::Close));
    }

    #[test]
    fn slow_short_drag_snaps_back() {
        let mut swipe = tracker(Edge::Left);
        swipe.on_down(Point::new(280.0, 50.0), 0);
        swipe.on_move(Point::new(200.0, 50.0), WIDTH);
        assert_eq!(swipe.on_up(1000, WIDTH), Some(SwipeDecision::SnapBack));
    }

    #[test]
    fn fast_short_flick_closes() {
        let mut swipe = tracker(Edge::Left);
        swipe.on_down(Point::new(280.0, 50.0), 0);
        swipe.on_move(Point::new(250.0, 50.0), WIDTH);
        // 30px in 50ms = 0.6 px/ms.
        assert_eq!(swipe.on_up(50, WIDTH), Some(SwipeDecision::Close));
    }

    #[test]
    fn right_drawer_closes_toward_the_right() {
        let mut swipe = tracker(Edge::Right);
        swipe.on_down(Point::new(100.0, 50.0), 0);
        assert!(swipe.on_move(Point::new(60.0, 50.0), WIDTH).is_none());
        let update = swipe.on_move(Point::new(190.0, 50.0), WIDTH).unwrap();
        assert_eq!(update.translate_x, -210.0);
        assert!((update.overlay_opacity - 0.7).abs() < 1e-9);
        assert_eq!(swipe.on_up(60, WIDTH), Some(SwipeDecision::Close));
    }

    #[test]
    fn vertical_and_noise_moves_do_not_drag() {
        let mut swipe = tracker(Edge::Left);
        swipe.on_down(Point::new(200.0, 50.0), 0);
        assert!(swipe.on_move(Point::new(195.0, 50.0), WIDTH).is_none(), "noise");
        assert!(swipe.on_move(Point::new(150.0, 150.0), WIDTH).is_none(), "vertical");
        assert!(!swipe.is_dragging());
        assert_eq!(swipe.on_up(100, WIDTH), None);
    }

    #[test]
    fn drag_is_clamped_to_closed() {
        let mut swipe = tracker(Edge::Left);
        swipe.on_down(Point::new(400.0, 0.0), 0);
        let update = swipe.on_move(Point::new(0.0, 0.0), WIDTH).unwrap();
        assert_eq!(update.translate_x, 0.0);
        assert_eq!(update.overlay_opacity, 0.0);
    }

    #[test]
    fn release_without_down_is_ignored() {
        let mut swipe = tracker(Edge::Left);
        assert_eq!(swipe.on_up(10, WIDTH), None);
        assert!(swipe.on_move(Point::ZERO, WIDTH).is_none());
    }

    proptest! {
        #[test]
        fn non_closing_moves_never_decide(
            start in 0.0_f64..400.0,
            dxs in proptest::collection::vec(0.0_f64..400.0, 1..8),
            dy in -50.0_f64..50.0,
            elapsed in 1_u64..2000,
        ) {
            let mut swipe = tracker(Edge::Left);
            swipe.on_down(Point::new(start, 0.0), 0);
            for dx in dxs {
                prop_assert!(swipe.on_move(Point::new(start + dx, dy), WIDTH).is_none());
            }
            prop_assert_eq!(swipe.on_up(elapsed, WIDTH), None);
        }

        #[test]
        fn fast_closing_flick_closes_regardless_of_distance(
            distance in 11.0_f64..150.0,
        ) {
            let mut swipe = tracker(Edge::Left);
            swipe.on_down(Point::new(290.0, 10.0), 1000);
            swipe.on_move(Point::new(290.0 - distance, 10.0), WIDTH);
            // One millisecond per ten pixels keeps the velocity at 10 px/ms.
            let elapsed = (distance / 10.0).ceil().max(1.0);
            #[allow(clippy::cast_possible_truncation, reason = "small positive value")]
            #[allow(clippy::cast_sign_loss, reason = "small positive value")]
            let up = 1000 + elapsed as u64;
            prop_assert_eq!(swipe.on_up(up, WIDTH), Some(SwipeDecision::Close));
        }
    }
}
