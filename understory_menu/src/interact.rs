// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input handling: toggles, touch, hover, keyboard, focus, anchors and resizes.

use alloc::vec::Vec;
use kurbo::Point;
use understory_event_state::hover_intent::{HoverIntent, HoverIntentConfig, HoverIntentEvent};
use understory_event_state::tap::TapResult;
use understory_focus::{Key, KeyResponse};
use understory_nav_tree::{ElementKind, NodeFlags, NodeId, Role, Tree, Viewport};

use crate::node::PaneState;
use crate::pane::PaneAction;
use crate::{Layout, MenuTree};

/// Grace period in milliseconds between focus leaving and the focus check.
const FOCUS_OUT_DELAY: u64 = 150;

impl MenuTree {
    /// Activate the toggle `element` (click, or a touch that was not a drag).
    ///
    /// On desktop navbars with auto-close, every other showing pane under
    /// the same parent list is hidden first, nested ones included. Returns
    /// `false` if nothing changed, including while any pane is opening.
    pub fn activate_toggle(&mut self, tree: &Tree, element: NodeId, viewport: Viewport) -> bool {
        let Some(idx) = self.node_index(tree, element) else {
            return false;
        };
        if self
            .nodes
            .iter()
            .any(|n| matches!(n.state, PaneState::Opening { .. }))
        {
            tracing::trace!(message = "menu.toggle_rejected", reason = "opening");
            return false;
        }

        let auto_close = self.is_desktop(viewport)
            && self.settings.auto_close_navbar_menus
            && !self.settings.layout.contains(Layout::EXPAND_ABOVE_BREAKPOINT)
            && self.is_navbar();
        if auto_close {
            self.nodes[idx].active_status = false;
            let parent = tree.parent_of(self.nodes[idx].item);
            let others: Vec<usize> = (0..self.nodes.len())
                .filter(|&i| i != idx && self.nodes[i].is_showing())
                .filter(|&i| parent.is_some_and(|p| tree.contains(p, self.nodes[i].item)))
                .collect();
            for other in others {
                self.apply(tree, other, PaneAction::Hide, true);
            }
        }

        let action = if self.nodes[idx].is_showing() {
            PaneAction::Hide
        } else {
            PaneAction::Show
        };
        let changed = self.apply(tree, idx, action, true);
        if changed {
            self.nodes[idx].active_status = action == PaneAction::Show;
        }
        changed
    }

    /// A touch started on `toggle`.
    pub fn touch_start(&mut self, toggle: NodeId, position: Point, now: u64) {
        self.tap.on_down(None, toggle, position, now);
    }

    /// The active touch moved; the release will not activate anything.
    pub fn touch_move(&mut self, position: Point) {
        self.tap.on_move(None, position);
    }

    /// The active touch ended on `toggle`.
    ///
    /// Activates the toggle unless the touch was dragged.
    pub fn touch_end(
        &mut self,
        tree: &Tree,
        toggle: NodeId,
        viewport: Viewport,
        now: u64,
    ) -> bool {
        match self.tap.on_up(None, &toggle, now) {
            TapResult::Tap(target) => self.activate_toggle(tree, target, viewport),
            TapResult::Suppressed(_) => false,
        }
    }

    /// The pointer entered `item`.
    pub fn pointer_enter(
        &mut self,
        tree: &Tree,
        item: NodeId,
        position: Point,
        viewport: Viewport,
        now: u64,
    ) {
        if self.settings.toggle_on_click_only {
            return;
        }
        let Some(idx) = self.node_index(tree, item) else {
            return;
        };
        if self.settings.hover_intent {
            let config = HoverIntentConfig {
                timeout: self.settings.hover_intent_timeout,
                ..HoverIntentConfig::default()
            };
            self.hover
                .entry(idx)
                .or_insert_with(|| HoverIntent::new(config))
                .on_enter(position, now);
            return;
        }
        if self.is_desktop(viewport) && self.is_navbar() {
            let show = !self.nodes[idx].is_showing();
            self.nodes[idx].active_status = show;
            let action = if show { PaneAction::Show } else { PaneAction::Hide };
            self.apply(tree, idx, action, true);
        }
    }

    /// The pointer moved inside `item`.
    pub fn pointer_move(&mut self, tree: &Tree, item: NodeId, position: Point) {
        if !self.settings.hover_intent || self.settings.toggle_on_click_only {
            return;
        }
        if let Some(intent) = self
            .node_index(tree, item)
            .and_then(|idx| self.hover.get_mut(&idx))
        {
            intent.on_move(position);
        }
    }

    /// The pointer left `item`.
    pub fn pointer_leave(&mut self, tree: &Tree, item: NodeId, viewport: Viewport, now: u64) {
        if self.settings.toggle_on_click_only {
            return;
        }
        let Some(idx) = self.node_index(tree, item) else {
            return;
        };
        if self.settings.hover_intent {
            let out = self.hover.get_mut(&idx).and_then(|h| h.on_leave(now));
            if out == Some(HoverIntentEvent::Out) {
                self.hover_out(tree, idx, viewport);
            }
            return;
        }
        if self.is_desktop(viewport) && self.is_navbar() {
            self.nodes[idx].active_status = false;
            self.apply(tree, idx, PaneAction::Hide, true);
        }
    }

    fn hover_over(&mut self, tree: &Tree, idx: usize, viewport: Viewport) {
        self.nodes[idx].active_status = true;
        if self.is_desktop(viewport) && self.is_navbar() {
            self.apply(tree, idx, PaneAction::Show, true);
        }
    }

    fn hover_out(&mut self, tree: &Tree, idx: usize, viewport: Viewport) {
        self.nodes[idx].active_status = false;
        if self.is_desktop(viewport) && self.nodes[idx].is_showing() && self.is_navbar() {
            self.apply(tree, idx, PaneAction::Hide, true);
        }
    }

    /// Run timed work due at `now`: hover intent, the focus check and the
    /// expander's deferred class removal.
    pub fn poll(&mut self, tree: &Tree, viewport: Viewport, now: u64) {
        let mut due: Vec<(usize, HoverIntentEvent)> = self
            .hover
            .iter_mut()
            .filter_map(|(&idx, intent)| intent.poll(now).map(|e| (idx, e)))
            .collect();
        due.sort_unstable_by_key(|&(idx, _)| idx);
        for (idx, event) in due {
            match event {
                HoverIntentEvent::Over => self.hover_over(tree, idx, viewport),
                HoverIntentEvent::Out => self.hover_out(tree, idx, viewport),
            }
        }
        if self.focus_check.is_some_and(|t| t <= now) {
            self.focus_check = None;
            self.check_focus(tree, viewport);
        }
        self.poll_expander(now);
    }

    /// Timestamp at which [`MenuTree::poll`] next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.hover
            .values()
            .filter_map(HoverIntent::next_deadline)
            .chain(self.focus_check)
            .chain(self.expander_deadline())
            .min()
    }

    /// A key was pressed with focus on `target`.
    ///
    /// - Escape hides the innermost showing node around `target` and
    ///   focuses its toggle.
    /// - Tab on the toggle of a closing pane skips the collapsing content:
    ///   focus moves to the next item's link, or to the next top-level
    ///   item's link while every pane closes.
    pub fn key_down(&mut self, tree: &Tree, target: NodeId, key: Key) -> KeyResponse<NodeId> {
        match key {
            Key::Escape => {
                let Some(idx) = core::iter::once(target)
                    .chain(tree.ancestors(target))
                    .filter_map(|n| self.by_item.get(&n).copied())
                    .find(|&i| self.nodes[i].is_showing())
                else {
                    return KeyResponse::ignored();
                };
                let focus = self.nodes[idx].toggle;
                self.apply(tree, idx, PaneAction::Hide, true);
                KeyResponse {
                    focus,
                    prevent_default: false,
                }
            }
            Key::Tab { .. } => {
                let Some(idx) = self.nodes.iter().position(|n| n.toggle == Some(target)) else {
                    return KeyResponse::ignored();
                };
                if !matches!(self.nodes[idx].state, PaneState::Closing { .. }) {
                    return KeyResponse::ignored();
                }
                let item = self.nodes[idx].item;
                let mut focus = first_link_after(tree, item);
                if focus.is_none() {
                    focus = core::iter::once(item)
                        .chain(tree.ancestors(item))
                        .find(|a| self.levels.get(a) == Some(&1))
                        .and_then(|top| first_link_after(tree, top));
                    self.hide_all(tree, true);
                }
                tracing::trace!(message = "menu.tab_skip", ?focus);
                KeyResponse {
                    focus,
                    prevent_default: focus.is_some(),
                }
            }
            Key::Other => KeyResponse::ignored(),
        }
    }

    /// A key was released with focus on `target`.
    ///
    /// On desktop navbars, closes every pane when `target` is outside all
    /// showing nodes.
    pub fn key_up(&mut self, tree: &Tree, target: NodeId, viewport: Viewport) {
        if self.is_inside_showing(tree, target) {
            return;
        }
        if self.is_desktop(viewport) && self.settings.auto_close_inactive_menu && self.is_navbar() {
            self.hide_all(tree, true);
        }
    }

    /// Focus moved to `focused`, or left the document.
    pub fn focus_changed(&mut self, focused: Option<NodeId>) {
        self.focused = focused;
    }

    /// Focus left an element of the main list at `now`.
    ///
    /// Schedules the focus check for [`MenuTree::poll`] unless menus stay open
    /// on focus out.
    pub fn focus_out(&mut self, now: u64) {
        if self.settings.keep_menu_open_on_focus_out {
            return;
        }
        self.focus_check = Some(now + FOCUS_OUT_DELAY);
    }

    fn check_focus(&mut self, tree: &Tree, viewport: Viewport) {
        if !self.is_desktop(viewport) || !self.is_navbar() {
            return;
        }
        let focused = self.focused.filter(|&f| tree.is_alive(f));
        let in_root = focused.is_some_and(|f| tree.contains(self.root, f));
        let in_list = focused.is_some_and(|f| tree.contains(self.list, f));
        let in_showing = focused.is_some_and(|f| self.is_inside_showing(tree, f));
        let close = !in_root
            || (!in_list && !in_showing && self.settings.auto_close_navbar_menus);
        if close {
            tracing::debug!(message = "menu.focus_left", in_root, in_list);
            self.hide_all(tree, true);
        }
    }

    fn is_inside_showing(&self, tree: &Tree, element: NodeId) -> bool {
        self.showing().any(|n| tree.contains(n.item, element))
    }

    /// An in-page link was activated.
    ///
    /// Links whose `href` starts with `#` close showing panes on desktop and
    /// the expander, when configured. Section links acting as toggles are
    /// left to [`MenuTree::activate_toggle`]. Returns `true` if anything
    /// started closing.
    pub fn link_activated(
        &mut self,
        tree: &Tree,
        link: NodeId,
        viewport: Viewport,
        now: u64,
    ) -> bool {
        let is_page_anchor = tree
            .element(link)
            .and_then(|e| e.href.as_deref())
            .is_some_and(|href| href.starts_with('#'));
        if !is_page_anchor || tree.closest(link, |e| e.role == Some(Role::ToggleLink)).is_some() {
            return false;
        }
        let mut changed = false;
        if self.settings.menu_close_on_in_page_anchor_click && self.is_desktop(viewport) {
            let before = self.showing().count();
            self.hide_all(tree, true);
            changed |= self.showing().count() != before;
        }
        if self.settings.expander_close_on_in_page_anchor_click
            && self.expander.as_ref().is_some_and(|e| e.is_showing())
        {
            changed |= self.toggle_expander(tree, now);
        }
        changed
    }

    /// Flag nodes whose pane would run off the right edge of `viewport`.
    pub fn assign_flow_direction(&mut self, tree: &Tree, viewport: Viewport) {
        if !self.settings.auto_direction {
            return;
        }
        let desktop = self.is_desktop(viewport);
        for node in &mut self.nodes {
            let Some(bounds) = tree.bounds(node.item) else {
                continue;
            };
            node.flow_right = desktop && bounds.x0 + 2.0 * bounds.width() > viewport.width;
        }
    }

    /// Expand the nodes leading to active elements.
    ///
    /// Panes open instantly on first load; desktop navbars then close them
    /// again so only the markers remain.
    pub fn expand_active_item(&mut self, tree: &Tree, viewport: Viewport) {
        if !self.settings.expand_active_item {
            self.loaded = true;
            return;
        }
        let active: Vec<NodeId> = tree
            .descendants(self.list)
            .filter(|&n| tree.flags(n).is_some_and(|f| f.contains(NodeFlags::ACTIVE)))
            .collect();
        for node in &mut self.nodes {
            if active.iter().any(|&a| tree.contains(node.item, a)) {
                node.expand_on_load = true;
            }
        }
        let desktop_navbar = self.is_navbar() && self.is_desktop(viewport);
        for idx in 0..self.nodes.len() {
            if !self.nodes[idx].expand_on_load {
                continue;
            }
            if !self.loaded {
                self.apply(tree, idx, PaneAction::Show, false);
            }
            if desktop_navbar {
                self.apply(tree, idx, PaneAction::Hide, false);
            }
        }
        self.loaded = true;
    }

    /// Apply a settled viewport size.
    ///
    /// Desktop menus that auto-close and do not expand active items collapse
    /// everything; then active items, the expander and flow directions are
    /// refreshed.
    pub fn on_resize_settled(&mut self, tree: &Tree, viewport: Viewport) {
        if self.is_desktop(viewport)
            && self.settings.auto_close_navbar_menus
            && !self.settings.expand_active_item
        {
            self.hide_all(tree, false);
            self.reset_expander();
        }
        self.expand_active_item(tree, viewport);
        self.sync_expander(viewport);
        self.assign_flow_direction(tree, viewport);
        tracing::debug!(message = "menu.resize", width = viewport.width);
    }
}

fn first_link_after(tree: &Tree, item: NodeId) -> Option<NodeId> {
    let next = tree.next_sibling(item)?;
    tree.find_within(next, |e| e.kind == ElementKind::Link)
}
