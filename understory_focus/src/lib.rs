// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Focus: sequential focus helpers for navigation widgets.
//!
//! Navigation components only ever move focus along the document's tab order:
//! Tab and Shift+Tab inside a menu, or a trap that keeps focus inside an open
//! drawer or slide-over pane. This crate models that with:
//!
//! - **Navigation intents** ([`Navigation`]): [`Navigation::Next`] (Tab) and
//!   [`Navigation::Prev`] (Shift+Tab).
//! - **Linear traversal** ([`next_in_order`]) over a caller-supplied tab order
//!   with an explicit [`WrapMode`].
//! - **Focus traps** ([`FocusTrap`]) that wrap Tab at the ends of a scope and
//!   remember which element to restore focus to once released.
//! - **Key responses** ([`Key`], [`KeyResponse`]): the keys widgets react to and
//!   the focus move and default prevention they ask the host for.
//!
//! The tab order itself is computed by the host (for example with
//! `understory_nav_tree::Tree::tabbable_within`). All types are generic over a
//! small copyable node identifier `K`.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_focus::{FocusTrap, Navigation, TabOutcome};
//!
//! let order = [10_u32, 11, 12];
//! let trap = FocusTrap::new(1_u32, Some(99));
//!
//! // Tab on the last element wraps to the first.
//! assert_eq!(trap.on_tab(12, Navigation::Next, &order), TabOutcome::Wrap(10));
//! // Tab in the middle is left to the host.
//! assert_eq!(trap.on_tab(10, Navigation::Next, &order), TabOutcome::Default);
//! // Releasing yields the element focused before the trap was installed.
//! assert_eq!(trap.release(), Some(99));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

/// Direction of sequential focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move forward in tab order (Tab).
    Next,
    /// Move backward in tab order (Shift+Tab).
    Prev,
}

impl Navigation {
    /// Intent for a Tab key press with the given Shift state.
    pub const fn from_tab(shift: bool) -> Self {
        if shift { Self::Prev } else { Self::Next }
    }
}

/// Keys navigation widgets react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab, with the Shift modifier state.
    Tab {
        /// Whether Shift was held.
        shift: bool,
    },
    /// Escape.
    Escape,
    /// Any other key.
    Other,
}

impl Key {
    /// Navigation intent of a Tab press.
    pub const fn navigation(self) -> Option<Navigation> {
        match self {
            Self::Tab { shift } => Some(Navigation::from_tab(shift)),
            _ => None,
        }
    }
}

/// What the host should do after a widget handled a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyResponse<K> {
    /// Element to move focus to.
    pub focus: Option<K>,
    /// Cancel the browser or toolkit default for the key.
    pub prevent_default: bool,
}

impl<K> KeyResponse<K> {
    /// Nothing to do.
    pub const fn ignored() -> Self {
        Self {
            focus: None,
            prevent_default: false,
        }
    }

    /// Response for a trap's Tab outcome.
    pub fn from_tab(outcome: TabOutcome<K>) -> Self {
        match outcome {
            TabOutcome::Default => Self::ignored(),
            TabOutcome::Wrap(k) => Self {
                focus: Some(k),
                prevent_default: true,
            },
            TabOutcome::Blocked => Self {
                focus: None,
                prevent_default: true,
            },
        }
    }
}

impl<K> Default for KeyResponse<K> {
    fn default() -> Self {
        Self::ignored()
    }
}

/// Wrap mode for linear traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Reaching either end of the order yields no candidate.
    Never,
    /// Wrap around to the other end of the order.
    Scope,
}

/// Next candidate after `origin` in `order`.
///
/// When `origin` is not part of `order`, the first (for [`Navigation::Next`])
/// or last (for [`Navigation::Prev`]) candidate is returned.
pub fn next_in_order<K>(origin: K, nav: Navigation, order: &[K], wrap: WrapMode) -> Option<K>
where
    K: Copy + Eq,
{
    let first = *order.first()?;
    let last = *order.last()?;
    let Some(pos) = order.iter().position(|&k| k == origin) else {
        return Some(match nav {
            Navigation::Next => first,
            Navigation::Prev => last,
        });
    };
    match nav {
        Navigation::Next => match order.get(pos + 1) {
            Some(&k) => Some(k),
            None => (wrap == WrapMode::Scope).then_some(first),
        },
        Navigation::Prev => match pos.checked_sub(1) {
            Some(prev) => Some(order[prev]),
            None => (wrap == WrapMode::Scope).then_some(last),
        },
    }
}

/// Response of a [`FocusTrap`] to a Tab key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabOutcome<K> {
    /// Let the host perform its default focus move.
    Default,
    /// Prevent the default move and focus this element instead.
    Wrap(K),
    /// Prevent the default move; there is nothing inside the trap to focus.
    Blocked,
}

impl<K> TabOutcome<K> {
    /// `true` when the host must cancel its default Tab handling.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Keeps sequential focus inside a scope.
///
/// The trap does not hold the tab order; callers pass the current order on
/// every query so it stays correct while the scope's content changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusTrap<K> {
    scope: K,
    restore: Option<K>,
}

impl<K: Copy + Eq + core::fmt::Debug> FocusTrap<K> {
    /// Trap focus inside `scope`; `restore` is focused again on release.
    pub fn new(scope: K, restore: Option<K>) -> Self {
        tracing::trace!(message = "focus.trap", ?scope);
        Self { scope, restore }
    }

    /// Scope the trap applies to.
    pub fn scope(&self) -> K {
        self.scope
    }

    /// Element to focus when the trap becomes active.
    pub fn initial_focus(&self, order: &[K]) -> Option<K> {
        order.first().copied()
    }

    /// Handle Tab (or Shift+Tab) while `focused` has focus.
    ///
    /// Wraps from the last element to the first and back. Focus found outside
    /// the order is pulled back to the matching end.
    pub fn on_tab(&self, focused: K, nav: Navigation, order: &[K]) -> TabOutcome<K> {
        let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
            return TabOutcome::Blocked;
        };
        if !order.contains(&focused) {
            return TabOutcome::Wrap(match nav {
                Navigation::Next => first,
                Navigation::Prev => last,
            });
        }
        match nav {
            Navigation::Next if focused == last => TabOutcome::Wrap(first),
            Navigation::Prev if focused == first => TabOutcome::Wrap(last),
            _ => TabOutcome::Default,
        }
    }

    /// Release the trap, returning the element to restore focus to.
    pub fn release(self) -> Option<K> {
        tracing::trace!(message = "focus.release", scope = ?self.scope);
        self.restore
    }
}
