// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The expander: the collapsible container of the whole menu on small screens.

use alloc::string::String;
use understory_nav_tree::{NodeId, Tree, Viewport};

use crate::events::MenuEventKind;
use crate::{Layout, MenuTree};

/// Delay in milliseconds before a hiding expander drops its showing class.
const CLASS_REMOVAL_DELAY: u64 = 10;

/// Open/closed state of the expander.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ExpanderState {
    /// Collapsed.
    #[default]
    Hidden,
    /// Animating open toward `height`.
    Opening {
        /// Inline height to animate to.
        height: f64,
    },
    /// Fully open.
    Shown,
    /// Animating closed from `from`.
    Closing {
        /// Inline height the collapse starts at.
        from: f64,
        /// While set, the showing class is kept until this timestamp so the
        /// collapse starts from the open layout.
        class_until: Option<u64>,
    },
}

bitflags::bitflags! {
    /// Classes of the expander element.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ExpanderClasses: u8 {
        /// Open, or about to start closing.
        const SHOWING       = 0b01;
        /// Height is animating.
        const TRANSITIONING = 0b10;
    }
}

impl ExpanderClasses {
    /// Class names a DOM host applies for the set flags.
    pub fn class_names(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::SHOWING, "mln__expander--showing"),
            (Self::TRANSITIONING, "mln__expander--transitioning"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

/// Attributes and inline style of the expander.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpanderAttributes<'a> {
    /// Element id, referenced by the expand button's `aria-controls`.
    pub id: &'a str,
    /// `aria-hidden`.
    pub aria_hidden: bool,
    /// Inline height while animating.
    pub height: Option<f64>,
}

/// The expander element of a menu.
#[derive(Clone, Debug)]
pub struct Expander {
    /// The expander element.
    pub element: NodeId,
    /// Wrapper around the expander's content, measured for animations.
    pub helper: NodeId,
    /// Button toggling the expander.
    pub button: Option<NodeId>,
    /// Expander element id.
    pub id: String,
    state: ExpanderState,
}

impl Expander {
    pub(crate) fn new(element: NodeId, helper: NodeId, button: Option<NodeId>, id: String) -> Self {
        Self {
            element,
            helper,
            button,
            id,
            state: ExpanderState::Hidden,
        }
    }

    /// Current state.
    pub fn state(&self) -> ExpanderState {
        self.state
    }

    /// Opening or open; mirrored by the button's `aria-expanded`.
    pub fn is_showing(&self) -> bool {
        matches!(
            self.state,
            ExpanderState::Opening { .. } | ExpanderState::Shown
        )
    }

    /// Mid animation.
    pub fn is_transitioning(&self) -> bool {
        matches!(
            self.state,
            ExpanderState::Opening { .. } | ExpanderState::Closing { .. }
        )
    }

    /// Classes of the expander element.
    pub fn classes(&self) -> ExpanderClasses {
        match self.state {
            ExpanderState::Hidden => ExpanderClasses::empty(),
            ExpanderState::Opening { .. } => {
                ExpanderClasses::SHOWING | ExpanderClasses::TRANSITIONING
            }
            ExpanderState::Shown => ExpanderClasses::SHOWING,
            ExpanderState::Closing { class_until, .. } => {
                let mut classes = ExpanderClasses::TRANSITIONING;
                classes.set(ExpanderClasses::SHOWING, class_until.is_some());
                classes
            }
        }
    }

    /// Attributes and inline style of the expander element.
    pub fn attributes(&self) -> ExpanderAttributes<'_> {
        ExpanderAttributes {
            id: &self.id,
            aria_hidden: !self.is_showing(),
            height: match self.state {
                ExpanderState::Opening { height } => Some(height),
                ExpanderState::Closing { from, .. } => Some(from),
                ExpanderState::Hidden | ExpanderState::Shown => None,
            },
        }
    }
}

impl MenuTree {
    /// Open a hidden expander or close a shown one, animated.
    ///
    /// Returns `false` if there is no expander or it is mid-transition.
    pub fn toggle_expander(&mut self, tree: &Tree, now: u64) -> bool {
        let Some(expander) = self.expander.as_mut() else {
            return false;
        };
        if expander.is_transitioning() {
            tracing::trace!(message = "menu.expander_rejected", reason = "transitioning");
            return false;
        }
        let height = tree.bounds(expander.helper).map_or(0.0, |b| b.height());
        let target = expander.element;
        let kind = if expander.is_showing() {
            expander.state = ExpanderState::Closing {
                from: height,
                class_until: Some(now + CLASS_REMOVAL_DELAY),
            };
            MenuEventKind::ExpanderHiding
        } else {
            expander.state = ExpanderState::Opening { height };
            MenuEventKind::ExpanderShowing
        };
        self.push(kind, target);
        tracing::debug!(message = "menu.expander", ?kind, height);
        true
    }

    /// Apply the responsive expander state without animating.
    ///
    /// Navbar and expand-above-breakpoint menus keep the expander open on
    /// desktop and closed on mobile.
    pub fn sync_expander(&mut self, viewport: Viewport) {
        let responsive = self
            .settings
            .layout
            .intersects(Layout::NAVBAR | Layout::EXPAND_ABOVE_BREAKPOINT);
        if !responsive {
            return;
        }
        let mobile = self.is_mobile(viewport);
        let Some(expander) = self.expander.as_mut() else {
            return;
        };
        expander.state = if mobile {
            ExpanderState::Hidden
        } else {
            ExpanderState::Shown
        };
        tracing::trace!(message = "menu.expander_sync", mobile);
    }

    pub(crate) fn finish_expander(&mut self) -> bool {
        let Some(expander) = self.expander.as_mut() else {
            return false;
        };
        let kind = match expander.state {
            ExpanderState::Opening { .. } => {
                expander.state = ExpanderState::Shown;
                MenuEventKind::ExpanderShown
            }
            ExpanderState::Closing { .. } => {
                expander.state = ExpanderState::Hidden;
                MenuEventKind::ExpanderHidden
            }
            ExpanderState::Hidden | ExpanderState::Shown => return false,
        };
        let target = expander.element;
        self.push(kind, target);
        true
    }

    pub(crate) fn poll_expander(&mut self, now: u64) {
        if let Some(Expander {
            state: ExpanderState::Closing { class_until, .. },
            ..
        }) = self.expander.as_mut()
        {
            if class_until.is_some_and(|t| t <= now) {
                *class_until = None;
            }
        }
    }

    pub(crate) fn expander_deadline(&self) -> Option<u64> {
        match self.expander.as_ref()?.state {
            ExpanderState::Closing { class_until, .. } => class_until,
            _ => None,
        }
    }

    pub(crate) fn reset_expander(&mut self) {
        if let Some(expander) = self.expander.as_mut() {
            expander.state = ExpanderState::Hidden;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registry, Settings};
    use alloc::vec::Vec;
    use kurbo::Rect;
    use understory_nav_tree::{Breakpoint, Element, Role};

    fn menu(tree: &mut Tree, settings: Settings, viewport: Viewport) -> MenuTree {
        let root = tree.insert(None, Element::block());
        tree.insert(Some(root), Element::button("Menu").with_role(Role::ExpandButton));
        let expander = tree.insert(Some(root), Element::block().with_role(Role::Expander));
        tree.insert(Some(expander), Element::list().with_role(Role::MenuList));
        let mut menu =
            MenuTree::build(&mut Registry::new(), tree, root, settings, viewport).unwrap();
        menu.take_events();
        menu
    }

    #[test]
    fn toggle_animates_both_ways() {
        let mut tree = Tree::new();
        let mut menu = menu(&mut tree, Settings::default(), Viewport::new(400.0, 800.0));
        let helper = menu.expander().unwrap().helper;
        tree.set_bounds(helper, Rect::new(0.0, 0.0, 400.0, 320.0));

        assert!(menu.toggle_expander(&tree, 0));
        let exp = menu.expander().unwrap();
        assert_eq!(exp.state(), ExpanderState::Opening { height: 320.0 });
        assert!(exp.is_showing());
        assert!(!menu.toggle_expander(&tree, 5), "ignored while opening");

        let element = menu.expander().unwrap().element;
        assert!(menu.on_transition_end(element));
        assert_eq!(menu.expander().unwrap().state(), ExpanderState::Shown);

        assert!(menu.toggle_expander(&tree, 1000));
        let exp = menu.expander().unwrap();
        assert!(!exp.is_showing());
        assert!(exp.attributes().aria_hidden);
        assert!(exp.classes().contains(ExpanderClasses::SHOWING));
        assert_eq!(menu.next_deadline(), Some(1010));
        menu.poll(&tree, Viewport::new(400.0, 800.0), 1010);
        assert_eq!(
            menu.expander().unwrap().classes(),
            ExpanderClasses::TRANSITIONING
        );

        assert!(menu.on_transition_end(element));
        let kinds: Vec<_> = menu.take_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                MenuEventKind::ExpanderShowing,
                MenuEventKind::ExpanderShown,
                MenuEventKind::ExpanderHiding,
                MenuEventKind::ExpanderHidden
            ]
        );
    }

    #[test]
    fn navbar_expander_follows_breakpoint() {
        let mut tree = Tree::new();
        let settings = Settings {
            layout: Layout::NAVBAR,
            breakpoint: Some(Breakpoint(768)),
            ..Settings::default()
        };
        let mut menu = menu(&mut tree, settings, Viewport::new(1024.0, 800.0));
        assert_eq!(menu.expander().unwrap().state(), ExpanderState::Shown);

        menu.sync_expander(Viewport::new(767.0, 800.0));
        assert_eq!(menu.expander().unwrap().state(), ExpanderState::Hidden);
        assert!(menu.take_events().is_empty(), "sync is silent");
    }

    #[test]
    fn plain_layout_leaves_expander_alone() {
        let mut tree = Tree::new();
        let settings = Settings {
            breakpoint: Some(Breakpoint(768)),
            ..Settings::default()
        };
        let menu = menu(&mut tree, settings, Viewport::new(1024.0, 800.0));
        assert_eq!(menu.expander().unwrap().state(), ExpanderState::Hidden);
    }
}
