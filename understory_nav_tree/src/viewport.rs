// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport size and the breakpoint that splits mobile from desktop behavior.

use core::fmt;
use core::str::FromStr;

/// Size of the layout viewport in CSS pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Viewport width, including any scrollbar.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` when the viewport is at or above `breakpoint`.
    ///
    /// Without a breakpoint the viewport is neither desktop nor mobile.
    pub fn is_desktop(&self, breakpoint: Option<Breakpoint>) -> bool {
        breakpoint.is_some_and(|bp| self.width >= f64::from(bp.0))
    }

    /// `true` when the viewport is strictly below `breakpoint`.
    ///
    /// Without a breakpoint the viewport is neither desktop nor mobile.
    pub fn is_mobile(&self, breakpoint: Option<Breakpoint>) -> bool {
        breakpoint.is_some_and(|bp| self.width <= f64::from(bp.0) - 1.0)
    }
}

/// Viewport width threshold in CSS pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Breakpoint(pub u32);

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Error returned when a breakpoint attribute cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseBreakpointError {
    /// The attribute was empty.
    #[error("breakpoint attribute is empty")]
    Empty,
    /// The attribute did not start with a decimal number.
    #[error("breakpoint attribute `{0}` is not a number")]
    NotANumber(alloc::string::String),
}

impl FromStr for Breakpoint {
    type Err = ParseBreakpointError;

    /// Parse a breakpoint attribute such as `"768"` or `"768px"`.
    ///
    /// Like `parseInt`, leading digits are taken and trailing units ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBreakpointError::Empty);
        }
        let end = s
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(s.len(), |(i, _)| i);
        s[..end]
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ParseBreakpointError::NotANumber(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_and_mobile_split_at_breakpoint() {
        let bp = Some(Breakpoint(768));
        assert!(Viewport::new(768.0, 600.0).is_desktop(bp));
        assert!(!Viewport::new(768.0, 600.0).is_mobile(bp));
        assert!(Viewport::new(767.0, 600.0).is_mobile(bp));
        assert!(!Viewport::new(767.0, 600.0).is_desktop(bp));
    }

    #[test]
    fn fractional_widths_between_queries_match_neither() {
        let bp = Some(Breakpoint(768));
        let vp = Viewport::new(767.5, 600.0);
        assert!(!vp.is_desktop(bp));
        assert!(!vp.is_mobile(bp));
    }

    #[test]
    fn missing_breakpoint_is_neither() {
        let vp = Viewport::new(1200.0, 800.0);
        assert!(!vp.is_desktop(None));
        assert!(!vp.is_mobile(None));
    }

    #[test]
    fn parses_like_parse_int() {
        assert_eq!("768".parse(), Ok(Breakpoint(768)));
        assert_eq!(" 1024px ".parse(), Ok(Breakpoint(1024)));
        assert_eq!("".parse::<Breakpoint>(), Err(ParseBreakpointError::Empty));
        assert!(matches!(
            "wide".parse::<Breakpoint>(),
            Err(ParseBreakpointError::NotANumber(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_is_transparent() {
        let bp: Breakpoint = serde_json::from_str("900").unwrap();
        assert_eq!(bp, Breakpoint(900));
    }
}
