// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu nodes: items owning a collapsible pane, and the presentation derived from them.
//!
//! A node stores a single [`PaneState`]. Everything a host renders (item
//! classes, pane classes, `aria-*` attributes, inline heights) is derived from
//! it on demand, so visual and semantic state never drift apart.

use alloc::string::String;
use understory_nav_tree::NodeId;

/// Open/closed state of a pane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum PaneState {
    /// Collapsed.
    #[default]
    Hidden,
    /// Animating open toward `height`, the measured content height.
    Opening {
        /// Inline height to animate to.
        height: f64,
    },
    /// Fully open with automatic height.
    Open,
    /// Animating closed from `from`, the content height measured at hide time.
    Closing {
        /// Inline height the collapse animation starts at.
        from: f64,
    },
}

impl PaneState {
    /// Opening or open. Drives the toggle's `aria-expanded` and the item's showing class.
    pub fn is_showing(self) -> bool {
        matches!(self, Self::Opening { .. } | Self::Open)
    }

    /// Mid animation.
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Opening { .. } | Self::Closing { .. })
    }
}

bitflags::bitflags! {
    /// Classes of a menu item.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemClasses: u8 {
        /// The item owns a pane.
        const HAS_CHILD      = 0b0000_0001;
        /// The pane holds a mega menu.
        const MEGA_MENU      = 0b0000_0010;
        /// The pane is opening or open.
        const SHOWING        = 0b0000_0100;
        /// Latest pane shown in a slide-over menu.
        const ACTIVE         = 0b0000_1000;
        /// The pane would overflow the right edge and opens leftward.
        const FLOW_RIGHT     = 0b0001_0000;
        /// The pane is the one currently in view.
        const VISIBLE_MENU   = 0b0010_0000;
        /// The item leads to an active item and is expanded on load.
        const EXPAND_ON_LOAD = 0b0100_0000;
    }
}

impl ItemClasses {
    /// Class names a DOM host applies for the set flags.
    pub fn class_names(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::HAS_CHILD, "mln__has-child"),
            (Self::MEGA_MENU, "mln__has-child--mega-menu"),
            (Self::SHOWING, "mln__has-child--showing"),
            (Self::ACTIVE, "mln__has-child--active"),
            (Self::FLOW_RIGHT, "mln__child--flow-right"),
            (Self::VISIBLE_MENU, "mln__visible-menu"),
            (Self::EXPAND_ON_LOAD, "mln__has-child--expand-on-load"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

bitflags::bitflags! {
    /// Classes of a pane (the collapse element).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PaneClasses: u8 {
        /// Height is animating.
        const TRANSITIONING    = 0b001;
        /// Height follows content.
        const HEIGHT_AUTO      = 0b010;
        /// Content may overflow, for nested flyouts.
        const OVERFLOW_VISIBLE = 0b100;
    }
}

impl PaneClasses {
    /// Class names a DOM host applies for the set flags.
    pub fn class_names(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::TRANSITIONING, "mln__child--transitioning"),
            (Self::HEIGHT_AUTO, "mln--height-auto"),
            (Self::OVERFLOW_VISIBLE, "mln__child--overflow-visible"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

/// Attributes and inline style of a pane.
#[derive(Clone, Debug, PartialEq)]
pub struct PaneAttributes<'a> {
    /// Element id, referenced by the toggle's `aria-controls`.
    pub id: &'a str,
    /// `aria-hidden`.
    pub aria_hidden: bool,
    /// `data-mln-active-status`: the pane was opened by the user and not yet dismissed.
    pub active_status: bool,
    /// Always `-1`: panes take programmatic focus only.
    pub tab_index: i32,
    /// Inline height while opening.
    pub height: Option<f64>,
    /// Height a closing animation starts from.
    pub collapse_from: Option<f64>,
}

/// Attributes of a pane's toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleAttributes<'a> {
    /// `aria-expanded`.
    pub aria_expanded: bool,
    /// `aria-controls`.
    pub aria_controls: &'a str,
    /// `role="button"`; set when a section link acts as the toggle.
    pub role_button: bool,
}

/// A menu item that owns a collapsible pane.
#[derive(Clone, Debug)]
pub struct MenuNode {
    /// The list item.
    pub item: NodeId,
    /// Section link, wrapped in the item's child controls.
    pub link: Option<NodeId>,
    /// Element toggling the pane: a generated button or the section link.
    pub toggle: Option<NodeId>,
    /// The section link is the toggle.
    pub toggle_is_link: bool,
    /// The collapse element.
    pub pane: NodeId,
    /// Wrapper inside the pane used to measure content height.
    pub helper: Option<NodeId>,
    /// Pane element id.
    pub pane_id: String,
    /// Nesting level of the item, starting at 1 for top-level items.
    pub level: usize,
    /// The pane holds a mega menu.
    pub mega: bool,
    pub(crate) state: PaneState,
    pub(crate) active_status: bool,
    pub(crate) active: bool,
    pub(crate) flow_right: bool,
    pub(crate) expand_on_load: bool,
}

impl MenuNode {
    pub(crate) fn new(item: NodeId, pane: NodeId, helper: Option<NodeId>, pane_id: String) -> Self {
        Self {
            item,
            link: None,
            toggle: None,
            toggle_is_link: false,
            pane,
            helper,
            pane_id,
            level: 1,
            mega: false,
            state: PaneState::Hidden,
            active_status: false,
            active: false,
            flow_right: false,
            expand_on_load: false,
        }
    }

    /// Current pane state.
    pub fn state(&self) -> PaneState {
        self.state
    }

    /// Opening or open.
    pub fn is_showing(&self) -> bool {
        self.state.is_showing()
    }

    /// Classes of the item, given whether it is the visible menu.
    pub fn item_classes(&self, visible_menu: bool) -> ItemClasses {
        let mut classes = ItemClasses::HAS_CHILD;
        classes.set(ItemClasses::MEGA_MENU, self.mega);
        classes.set(ItemClasses::SHOWING, self.state.is_showing());
        classes.set(ItemClasses::ACTIVE, self.active);
        classes.set(ItemClasses::FLOW_RIGHT, self.flow_right);
        classes.set(ItemClasses::VISIBLE_MENU, visible_menu);
        classes.set(ItemClasses::EXPAND_ON_LOAD, self.expand_on_load);
        classes
    }

    /// Classes of the pane.
    pub fn pane_classes(&self) -> PaneClasses {
        match self.state {
            PaneState::Hidden => PaneClasses::empty(),
            PaneState::Opening { .. } | PaneState::Closing { .. } => PaneClasses::TRANSITIONING,
            PaneState::Open => PaneClasses::HEIGHT_AUTO | PaneClasses::OVERFLOW_VISIBLE,
        }
    }

    /// Attributes and inline style of the pane.
    pub fn pane_attributes(&self) -> PaneAttributes<'_> {
        PaneAttributes {
            id: &self.pane_id,
            aria_hidden: !self.state.is_showing(),
            active_status: self.active_status,
            tab_index: -1,
            height: match self.state {
                PaneState::Opening { height } => Some(height),
                _ => None,
            },
            collapse_from: match self.state {
                PaneState::Closing { from } => Some(from),
                _ => None,
            },
        }
    }

    /// Attributes of the toggle.
    pub fn toggle_attributes(&self) -> ToggleAttributes<'_> {
        ToggleAttributes {
            aria_expanded: self.state.is_showing(),
            aria_controls: &self.pane_id,
            role_button: self.toggle_is_link,
        }
    }
}
