// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-application state shared by all menus.

use understory_event_state::debounce::Debounce;
use understory_nav_tree::Viewport;

/// Shared state for every menu of an application.
///
/// - Hands out instance numbers, which prefix generated element ids so ids
///   stay unique across menus.
/// - Debounces viewport resizes once for all menus; feed it every resize and
///   forward the settled viewport to each menu's
///   [`MenuTree::on_resize_settled`](crate::MenuTree::on_resize_settled).
///
/// ```
/// use understory_menu::Registry;
/// use understory_nav_tree::Viewport;
///
/// let mut registry = Registry::new();
/// assert_eq!(registry.next_instance(), 1);
/// assert_eq!(registry.next_instance(), 2);
///
/// registry.on_resize(Viewport::new(900.0, 600.0), 0);
/// assert_eq!(registry.poll(100), None);
/// assert_eq!(registry.poll(150), Some(Viewport::new(900.0, 600.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Registry {
    next: u32,
    resize: Debounce,
    height: f64,
}

impl Registry {
    /// Create a registry whose first instance is numbered 1.
    pub fn new() -> Self {
        Self {
            next: 1,
            resize: Debounce::default(),
            height: 0.0,
        }
    }

    /// Allocate the next instance number.
    pub fn next_instance(&mut self) -> u32 {
        let n = self.next;
        self.next += 1;
        n
    }

    /// Record a viewport resize at `now`.
    ///
    /// Only width changes restart the settle timer.
    pub fn on_resize(&mut self, viewport: Viewport, now: u64) {
        self.height = viewport.height;
        self.resize.on_resize(viewport.width, now);
    }

    /// Settled viewport, once a resize burst has ended.
    pub fn poll(&mut self, now: u64) -> Option<Viewport> {
        let settled = self.resize.poll(now)?;
        Some(Viewport::new(settled.width, self.height))
    }

    /// Timestamp at which [`Registry::poll`] next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.resize.next_deadline()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_only_resize_does_not_settle() {
        let mut registry = Registry::new();
        registry.on_resize(Viewport::new(800.0, 600.0), 0);
        assert!(registry.poll(150).is_some());
        registry.on_resize(Viewport::new(800.0, 500.0), 200);
        assert_eq!(registry.next_deadline(), None);
        assert_eq!(registry.poll(1000), None);
    }
}
