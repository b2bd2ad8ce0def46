// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Menu: a headless multilevel navigation menu.
//!
//! [`MenuTree::build`] takes an author-supplied menu in an
//! [`understory_nav_tree::Tree`] (a [`Role::MenuList`] of items with nested
//! lists, optional mega menus and an optional expander) and rewrites it into
//! the structure the menu drives:
//!
//! - Every nested list is wrapped in a collapsible pane
//!   ([`Role::Collapse`] > [`Role::CollapseHelper`]).
//! - The item owning a pane becomes a [`MenuNode`]. Its section link is wrapped
//!   in [`Role::ChildControls`] next to a generated [`Role::ToggleButton`].
//! - Panes and the expander get stable ids derived from the instance number
//!   handed out by the [`Registry`].
//!
//! After building, the host forwards input (toggle activation, touch, hover,
//! keys, focus changes, in-page link clicks, transition ends, settled resizes)
//! and renders what the menu derives: [`MenuNode::item_classes`],
//! [`MenuNode::pane_classes`], [`MenuNode::pane_attributes`],
//! [`MenuNode::toggle_attributes`], [`MenuTree::backdrop`] and the
//! [`Expander`] state. State changes are reported as [`MenuEvent`]s, queued
//! after the change is applied and drained with [`MenuTree::take_events`].
//!
//! Nothing here owns a clock. Timed behavior (hover intent, the focus-out
//! grace period, the expander's deferred class removal) runs from
//! [`MenuTree::poll`]; [`MenuTree::next_deadline`] says when to call it.
//!
//! ## Minimal example
//!
//! ```
//! use understory_menu::{MenuEventKind, MenuTree, PaneAction, Registry, Settings};
//! use understory_nav_tree::{Element, Role, Tree, Viewport};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, Element::block());
//! let list = tree.insert(Some(root), Element::list().with_role(Role::MenuList));
//! let item = tree.insert(Some(list), Element::item());
//! tree.insert(Some(item), Element::link("Products", "/products"));
//! let sub = tree.insert(Some(item), Element::list());
//! let leaf = tree.insert(Some(sub), Element::item());
//! tree.insert(Some(leaf), Element::link("Widgets", "/widgets"));
//!
//! let mut registry = Registry::new();
//! let viewport = Viewport::new(1280.0, 800.0);
//! let mut menu = MenuTree::build(&mut registry, &mut tree, root, Settings::default(), viewport)
//!     .unwrap();
//!
//! let node = &menu.nodes()[0];
//! assert_eq!(node.pane_id, "mln1ChildCollapse1");
//! let toggle = node.toggle.unwrap();
//! assert_eq!(tree.element(toggle).unwrap().text, "Toggle items under Products");
//!
//! assert!(menu.set_pane_state(&tree, toggle, PaneAction::Show, false));
//! assert!(menu.nodes()[0].is_showing());
//! let kinds: Vec<_> = menu.take_events().into_iter().map(|e| e.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         MenuEventKind::Initialized,
//!         MenuEventKind::Transition,
//!         MenuEventKind::Show,
//!         MenuEventKind::Shown,
//!         MenuEventKind::Transitioned,
//!     ]
//! );
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies.
//! - `libm`: `no_std` builds relying on `libm` for floating-point math.
//! - `serde`: `Serialize`/`Deserialize` for [`Settings`].
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! [`Role::MenuList`]: understory_nav_tree::Role::MenuList
//! [`Role::Collapse`]: understory_nav_tree::Role::Collapse
//! [`Role::CollapseHelper`]: understory_nav_tree::Role::CollapseHelper
//! [`Role::ChildControls`]: understory_nav_tree::Role::ChildControls
//! [`Role::ToggleButton`]: understory_nav_tree::Role::ToggleButton

#![no_std]

extern crate alloc;

mod build;
mod events;
mod expander;
mod interact;
mod node;
mod pane;
mod registry;
mod settings;

use alloc::vec::Vec;
use hashbrown::HashMap;
use understory_event_state::hover_intent::HoverIntent;
use understory_event_state::queue::EventQueue;
use understory_event_state::tap::TapState;
use understory_nav_tree::{NodeId, Tree, Viewport};

pub use build::BuildError;
pub use events::{Backdrop, MenuEvent, MenuEventKind};
pub use expander::{Expander, ExpanderAttributes, ExpanderClasses, ExpanderState};
pub use node::{
    ItemClasses, MenuNode, PaneAttributes, PaneClasses, PaneState, ToggleAttributes,
};
pub use pane::PaneAction;
pub use registry::Registry;
pub use settings::{Layout, Settings};

bitflags::bitflags! {
    /// Classes of the menu root.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RootClasses: u8 {
        /// The menu has been built.
        const LOADED                      = 0b001;
        /// Every section link toggles its pane.
        const WHOLE_LINK_EXPAND           = 0b010;
        /// Top-level section links toggle their pane.
        const TOP_LEVEL_WHOLE_LINK_EXPAND = 0b100;
    }
}

impl RootClasses {
    /// Class names a DOM host applies for the set flags.
    pub fn class_names(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::LOADED, "mln--js-loaded"),
            (Self::WHOLE_LINK_EXPAND, "mln--whole-link-expand"),
            (Self::TOP_LEVEL_WHOLE_LINK_EXPAND, "mln--top-level-whole-link-expand"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

/// A built multilevel menu.
///
/// The menu does not own the [`Tree`]; operations borrow it from the host.
#[derive(Debug)]
pub struct MenuTree {
    instance: u32,
    settings: Settings,
    root: NodeId,
    list: NodeId,
    nodes: Vec<MenuNode>,
    by_item: HashMap<NodeId, usize>,
    levels: HashMap<NodeId, usize>,
    expander: Option<Expander>,
    root_classes: RootClasses,
    backdrop: Backdrop,
    loaded: bool,
    tap: TapState<NodeId>,
    hover: HashMap<usize, HoverIntent>,
    focused: Option<NodeId>,
    focus_check: Option<u64>,
    events: EventQueue<MenuEvent>,
}

impl MenuTree {
    /// Instance number, as used in generated ids.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    /// Settings the menu was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Menu root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Top-level list.
    pub fn list(&self) -> NodeId {
        self.list
    }

    /// Menu nodes in pane document order.
    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    /// Node owning `item`.
    pub fn node_by_item(&self, item: NodeId) -> Option<&MenuNode> {
        self.by_item.get(&item).map(|&i| &self.nodes[i])
    }

    /// Closest node containing `element`.
    pub fn node_for(&self, tree: &Tree, element: NodeId) -> Option<&MenuNode> {
        self.node_index(tree, element).map(|i| &self.nodes[i])
    }

    pub(crate) fn node_index(&self, tree: &Tree, element: NodeId) -> Option<usize> {
        if !tree.is_alive(element) {
            return None;
        }
        core::iter::once(element)
            .chain(tree.ancestors(element))
            .find_map(|n| self.by_item.get(&n).copied())
    }

    /// Showing nodes in document order.
    pub fn showing(&self) -> impl Iterator<Item = &MenuNode> {
        self.nodes.iter().filter(|n| n.is_showing())
    }

    /// Last showing node in document order.
    pub fn last_showing(&self) -> Option<&MenuNode> {
        self.nodes.iter().rev().find(|n| n.is_showing())
    }

    /// The menu in view: the last showing item, or the top-level list when nothing is showing.
    pub fn visible_menu(&self) -> NodeId {
        self.last_showing().map_or(self.list, |n| n.item)
    }

    /// `false` when `element` lies inside a collapsed pane.
    ///
    /// Panes keep [`NodeFlags::VISIBLE`](understory_nav_tree::NodeFlags::VISIBLE)
    /// untouched; the menu's pane states decide what is on screen. A closing
    /// pane still counts as rendered until its transition ends.
    pub fn is_rendered(&self, tree: &Tree, element: NodeId) -> bool {
        !self
            .nodes
            .iter()
            .any(|n| n.state == PaneState::Hidden && tree.contains(n.pane, element))
    }

    /// Tabbable descendants of `scope` outside collapsed panes, in document order.
    ///
    /// Focus traps over menu content query their order here.
    pub fn tabbable_within(&self, tree: &Tree, scope: NodeId) -> Vec<NodeId> {
        tree.tabbable_within_where(scope, |n| self.is_rendered(tree, n))
    }

    /// Classes of the node owning `item`, including the visible menu marker.
    pub fn item_classes(&self, item: NodeId) -> Option<ItemClasses> {
        let node = self.node_by_item(item)?;
        Some(node.item_classes(self.visible_menu() == item))
    }

    /// Nesting level of a list item (`mln__level-N`), starting at 1.
    ///
    /// Items inside mega menus have no level.
    pub fn item_level(&self, item: NodeId) -> Option<usize> {
        self.levels.get(&item).copied()
    }

    /// Root classes.
    pub fn root_classes(&self) -> RootClasses {
        self.root_classes
    }

    /// Document-level backdrop requests.
    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    /// Expander, when the menu has one.
    pub fn expander(&self) -> Option<&Expander> {
        self.expander.as_ref()
    }

    /// `true` while any pane or the expander is animating.
    pub fn is_transitioning(&self) -> bool {
        self.nodes.iter().any(|n| n.state.is_transitioning())
            || self.expander.as_ref().is_some_and(Expander::is_transitioning)
    }

    /// Mark the node owning `item` as the active slide.
    ///
    /// Returns `false` if `item` owns no node.
    pub fn mark_active(&mut self, item: NodeId) -> bool {
        let Some(&idx) = self.by_item.get(&item) else {
            return false;
        };
        self.nodes[idx].active = true;
        true
    }

    /// Take all queued events in emission order.
    pub fn take_events(&mut self) -> Vec<MenuEvent> {
        self.events.drain()
    }

    /// Queued events, for dispatching in place.
    pub fn events_mut(&mut self) -> &mut EventQueue<MenuEvent> {
        &mut self.events
    }

    pub(crate) fn is_desktop(&self, viewport: Viewport) -> bool {
        viewport.is_desktop(self.settings.breakpoint)
    }

    pub(crate) fn is_mobile(&self, viewport: Viewport) -> bool {
        viewport.is_mobile(self.settings.breakpoint)
    }

    pub(crate) fn is_navbar(&self) -> bool {
        self.settings.layout.contains(Layout::NAVBAR)
    }
}
