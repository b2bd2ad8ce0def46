// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Options of the slide-over presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Settings {
    /// Show the section name next to the back button.
    pub slide_titles: bool,
    /// Render the slide title as a copy of the section link.
    pub slide_title_link: bool,
    /// Decorative symbol before the back label, hidden from assistive technology.
    pub back_button_symbol: Option<String>,
    /// Label back buttons with the section name instead of [`Settings::back_label`].
    pub dynamic_back_button_title: bool,
    /// Collapse every pane once the enclosing off-canvas panel has hidden.
    pub off_canvas_close_all_menus: bool,
    /// Back button label when the section name is not used.
    pub back_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slide_titles: true,
            slide_title_link: false,
            back_button_symbol: Some(String::from("\u{2039}")),
            dynamic_back_button_title: false,
            off_canvas_close_all_menus: false,
            back_label: String::from("Back"),
        }
    }
}
