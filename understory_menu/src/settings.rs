// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu configuration.

use alloc::string::String;
use understory_nav_tree::Breakpoint;

bitflags::bitflags! {
    /// Layout modifiers of the menu root.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Layout: u8 {
        /// Horizontal navbar on desktop; panes drop down and close each other.
        const NAVBAR                  = 0b001;
        /// The expander is always open at or above the breakpoint.
        const EXPAND_ABOVE_BREAKPOINT = 0b010;
        /// Panes slide over their parent on mobile.
        const SLIDE_OVER              = 0b100;
    }
}

/// Options of one menu instance.
///
/// `Default` yields the documented defaults; override fields with struct
/// update syntax.
///
/// ```
/// use understory_menu::{Layout, Settings};
///
/// let settings = Settings {
///     hover_intent: true,
///     layout: Layout::NAVBAR,
///     ..Settings::default()
/// };
/// assert_eq!(settings.hover_intent_timeout, 250);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Settings {
    /// Open panes on hover intent rather than plain hover.
    pub hover_intent: bool,
    /// Delay in milliseconds before a hover-intent pane closes after leave.
    pub hover_intent_timeout: u64,
    /// On desktop navbars, opening a pane closes its open siblings.
    pub auto_close_navbar_menus: bool,
    /// Flag panes that would overflow the viewport's right edge.
    pub auto_direction: bool,
    /// Ignore hover entirely.
    pub toggle_on_click_only: bool,
    /// Show the ancestors of active items on load.
    pub expand_active_item: bool,
    /// Every section link toggles its pane instead of navigating.
    pub whole_link_toggler: bool,
    /// Only top-level section links toggle their pane.
    pub top_level_whole_link_toggler: bool,
    /// Raise [`Backdrop::MENU`](crate::Backdrop::MENU) while a navbar pane is showing.
    pub navbar_menu_backdrop: bool,
    /// Raise [`Backdrop::MEGA_MENU`](crate::Backdrop::MEGA_MENU) while a mega menu is showing.
    pub navbar_mega_menu_backdrop: bool,
    /// In-page anchor links close open panes on desktop.
    pub menu_close_on_in_page_anchor_click: bool,
    /// In-page anchor links close the expander.
    pub expander_close_on_in_page_anchor_click: bool,
    /// Close panes on desktop navbars when a key is released outside them.
    pub auto_close_inactive_menu: bool,
    /// Item level whose lists are left uncollapsed.
    pub exclude_level: Option<usize>,
    /// Keep panes open when focus leaves the menu.
    pub keep_menu_open_on_focus_out: bool,
    /// Accessible label prefix of generated toggle buttons.
    pub toggle_label_prefix: String,
    /// Viewport width from which the menu uses its desktop behavior.
    pub breakpoint: Option<Breakpoint>,
    /// Layout modifiers.
    pub layout: Layout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hover_intent: false,
            hover_intent_timeout: 250,
            auto_close_navbar_menus: true,
            auto_direction: true,
            toggle_on_click_only: false,
            expand_active_item: false,
            whole_link_toggler: false,
            top_level_whole_link_toggler: false,
            navbar_menu_backdrop: false,
            navbar_mega_menu_backdrop: false,
            menu_close_on_in_page_anchor_click: false,
            expander_close_on_in_page_anchor_click: false,
            auto_close_inactive_menu: true,
            exclude_level: None,
            keep_menu_open_on_focus_out: false,
            toggle_label_prefix: String::from("Toggle items under"),
            breakpoint: None,
            layout: Layout::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documentation() {
        let s = Settings::default();
        assert!(!s.hover_intent);
        assert!(s.auto_close_navbar_menus && s.auto_direction && s.auto_close_inactive_menu);
        assert_eq!(s.exclude_level, None);
        assert_eq!(s.toggle_label_prefix, "Toggle items under");
        assert!(s.layout.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_keeps_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{ "hover_intent": true, "breakpoint": 960, "layout": "NAVBAR" }"#)
                .unwrap();
        assert!(s.hover_intent);
        assert_eq!(s.breakpoint, Some(Breakpoint(960)));
        assert_eq!(s.layout, Layout::NAVBAR);
        assert_eq!(s.hover_intent_timeout, 250);
    }
}
