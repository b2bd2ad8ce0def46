// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Showing and hiding panes.

use alloc::vec::Vec;
use understory_nav_tree::{NodeId, Tree};

use crate::events::{Backdrop, MenuEvent, MenuEventKind};
use crate::node::PaneState;
use crate::{Layout, MenuTree};

/// Requested pane transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PaneAction {
    /// Open the pane.
    Show,
    /// Close the pane.
    Hide,
}

impl MenuTree {
    /// Show or hide the pane of the node containing `element`.
    ///
    /// `element` may be the item, its toggle, or anything else inside the
    /// node; the closest node wins. With `animate`, the pane enters its
    /// transitioning state and completes on
    /// [`MenuTree::on_transition_end`]; otherwise the end state applies
    /// immediately.
    ///
    /// Returns `false` without touching anything when no node contains
    /// `element`, the node has no toggle, its pane is mid-transition, or the
    /// pane is already in the requested state.
    pub fn set_pane_state(
        &mut self,
        tree: &Tree,
        element: NodeId,
        action: PaneAction,
        animate: bool,
    ) -> bool {
        match self.node_index(tree, element) {
            Some(idx) => self.apply(tree, idx, action, animate),
            None => {
                tracing::trace!(message = "menu.pane_rejected", ?element, reason = "no node");
                false
            }
        }
    }

    pub(crate) fn apply(
        &mut self,
        tree: &Tree,
        idx: usize,
        action: PaneAction,
        animate: bool,
    ) -> bool {
        let node = &self.nodes[idx];
        let reason = if node.toggle.is_none() {
            Some("no toggle")
        } else if node.state.is_transitioning() {
            Some("transitioning")
        } else if node.is_showing() == (action == PaneAction::Show) {
            Some("unchanged")
        } else {
            None
        };
        if let Some(reason) = reason {
            tracing::trace!(message = "menu.pane_rejected", item = ?node.item, reason);
            return false;
        }
        let height = node
            .helper
            .and_then(|h| tree.bounds(h))
            .map_or(0.0, |b| b.height());
        let target = node.item;

        match action {
            PaneAction::Show => {
                self.nodes[idx].state = if animate {
                    PaneState::Opening { height }
                } else {
                    PaneState::Open
                };
                self.raise_backdrop(idx);
                self.push(MenuEventKind::Transition, target);
                self.push(MenuEventKind::Show, target);
                if !animate {
                    self.push(MenuEventKind::Shown, target);
                    self.push(MenuEventKind::Transitioned, target);
                }
                tracing::debug!(message = "menu.show", item = ?target, animate, height);
            }
            PaneAction::Hide => {
                self.nodes[idx].state = if animate {
                    PaneState::Closing { from: height }
                } else {
                    PaneState::Hidden
                };
                self.lower_backdrop(idx);
                self.push(MenuEventKind::Transition, target);
                self.push(MenuEventKind::Hide, target);
                if !animate {
                    self.push(MenuEventKind::Hidden, target);
                    self.push(MenuEventKind::Transitioned, target);
                }
                tracing::debug!(message = "menu.hide", item = ?target, animate, height);
            }
        }
        true
    }

    /// Complete the animation of the pane or expander `element`.
    ///
    /// Returns `false` if `element` is not animating.
    pub fn on_transition_end(&mut self, element: NodeId) -> bool {
        if self.expander.as_ref().is_some_and(|e| e.element == element) {
            return self.finish_expander();
        }
        let Some(idx) = self.nodes.iter().position(|n| n.pane == element) else {
            return false;
        };
        let target = self.nodes[idx].item;
        match self.nodes[idx].state {
            PaneState::Opening { .. } => {
                self.nodes[idx].state = PaneState::Open;
                self.push(MenuEventKind::Shown, target);
            }
            PaneState::Closing { .. } => {
                self.nodes[idx].state = PaneState::Hidden;
                self.push(MenuEventKind::Hidden, target);
            }
            PaneState::Hidden | PaneState::Open => return false,
        }
        self.push(MenuEventKind::Transitioned, target);
        tracing::trace!(message = "menu.transition_end", item = ?target);
        true
    }

    /// Collapse every pane immediately, without events.
    ///
    /// Active statuses and backdrops are cleared too.
    pub fn reset_all(&mut self) {
        for node in &mut self.nodes {
            node.state = PaneState::Hidden;
            node.active_status = false;
        }
        self.backdrop = Backdrop::empty();
        tracing::debug!(message = "menu.reset", instance = self.instance);
    }

    pub(crate) fn hide_all(&mut self, tree: &Tree, animate: bool) {
        let showing: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].is_showing())
            .collect();
        for idx in showing {
            self.apply(tree, idx, PaneAction::Hide, animate);
        }
    }

    pub(crate) fn push(&mut self, kind: MenuEventKind, target: NodeId) {
        self.events.push(MenuEvent { kind, target });
    }

    fn raise_backdrop(&mut self, idx: usize) {
        if !self.settings.layout.contains(Layout::NAVBAR) {
            return;
        }
        if self.settings.navbar_menu_backdrop {
            self.backdrop |= Backdrop::MENU;
        }
        if self.settings.navbar_mega_menu_backdrop && self.nodes[idx].mega {
            self.backdrop |= Backdrop::MEGA_MENU;
        }
    }

    fn lower_backdrop(&mut self, idx: usize) {
        if !self.settings.layout.contains(Layout::NAVBAR) {
            return;
        }
        if !self.nodes.iter().any(|n| n.is_showing()) {
            self.backdrop.remove(Backdrop::MENU);
        }
        if self.nodes[idx].mega && !self.nodes.iter().any(|n| n.mega && n.is_showing()) {
            self.backdrop.remove(Backdrop::MEGA_MENU);
        }
    }
}
