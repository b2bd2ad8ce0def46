// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use understory_event_state::swipe::SwipeConfig;

/// Options of an off-canvas panel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Settings {
    /// Breakpoint attribute as written in markup, for example `"992"`.
    pub breakpoint: Option<String>,
    /// Allow closing the open panel by swiping it away on mobile.
    pub swipeable: bool,
    /// Width of the sliding menu in pixels.
    pub menu_width: f64,
    /// Swipe tuning.
    pub swipe: SwipeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            breakpoint: None,
            swipeable: false,
            menu_width: 280.0,
            swipe: SwipeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.breakpoint, None);
        assert!(!s.swipeable);
        assert_eq!(s.swipe.snap_duration, 300);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn breakpoint_attribute_from_json() {
        let s: Settings =
            serde_json::from_str(r#"{ "breakpoint": "992px", "swipeable": true }"#).unwrap();
        assert_eq!(s.breakpoint.as_deref(), Some("992px"));
        assert!(s.swipeable);
        assert_eq!(s.menu_width, 280.0);
    }
}
