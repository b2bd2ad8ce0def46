// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: node identifiers, flags, roles, and element data.

use alloc::string::String;
use kurbo::Rect;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-element state flags supplied by the markup or the host.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Element is rendered (not `display: none` / `visibility: hidden`).
        const VISIBLE          = 0b0000_0001;
        /// Form-style disabled state; removes the element from the tab order.
        const DISABLED         = 0b0000_0010;
        /// Element matches the host's "active item" selector.
        const ACTIVE           = 0b0000_0100;
        /// Section link that should not be offered as a link in slide titles.
        const NOT_LINKABLE     = 0b0000_1000;
        /// Element is content-editable and therefore tabbable.
        const CONTENT_EDITABLE = 0b0001_0000;
        /// Off-canvas menu anchored to the right edge of the viewport.
        const PANEL_RIGHT      = 0b0010_0000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Structural kind of an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Generic container (`div`, `nav`, `span`).
    Block,
    /// Unordered list.
    List,
    /// List item.
    Item,
    /// Anchor; tabbable when it carries an `href`.
    Link,
    /// Button; tabbable unless disabled.
    Button,
    /// Inline text or decoration with no interactive meaning.
    Text,
}

/// Markup role of an element.
///
/// Roles are the closed vocabulary the navigation components use to find
/// and generate structure. A DOM host maps each role to the class name it
/// applies (see [`Role::class_name`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The top-level list of a multilevel menu.
    MenuList,
    /// Collapsible top-level container shown below the breakpoint.
    Expander,
    /// Button that toggles the [`Role::Expander`].
    ExpandButton,
    /// Wrapper generated inside the expander to measure its natural height.
    ExpanderHelper,
    /// Author-provided mega-menu block nested in an item.
    MegaMenu,
    /// Generated collapsible pane around a child list or mega menu.
    Collapse,
    /// Generated wrapper inside a pane used to measure content height.
    CollapseHelper,
    /// Generated wrapper around an item's section link and toggle.
    ChildControls,
    /// Generated toggle button for a pane.
    ToggleButton,
    /// Section link promoted to act as its pane's toggle.
    ToggleLink,
    /// Generated chevron placed in whole-link togglers.
    ToggleIndicator,
    /// Generated container for slide-over back button and title.
    SlideOverControls,
    /// Generated slide-over back button.
    BackButton,
    /// Generated slide-over pane title.
    SlideOverTitle,
    /// Off-canvas sliding menu.
    PanelMenu,
    /// Off-canvas dimming overlay.
    PanelOverlay,
    /// Off-canvas open/close toggle.
    PanelToggle,
    /// Off-canvas close button.
    PanelClose,
}

impl Role {
    /// Class name (or data marker) a DOM host applies for this role.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::MenuList => "mln__list",
            Self::Expander => "mln__expander",
            Self::ExpandButton => "mln__expand-btn",
            Self::ExpanderHelper => "mln__expander__helper",
            Self::MegaMenu => "mln__child__mega-menu",
            Self::Collapse => "mln__child__collapse",
            Self::CollapseHelper => "mln__child__collapse__helper",
            Self::ChildControls => "mln__child-controls",
            Self::ToggleButton => "mln__toggle-btn",
            Self::ToggleLink => "mln__toggle-link",
            Self::ToggleIndicator => "mln__toggle-indicator",
            Self::SlideOverControls => "mln__slide-over-controls",
            Self::BackButton => "mln__back-btn",
            Self::SlideOverTitle => "mln__slide-over-title",
            Self::PanelMenu => "data-oc-menu",
            Self::PanelOverlay => "data-oc-overlay",
            Self::PanelToggle => "data-oc-toggle",
            Self::PanelClose => "data-oc-close",
        }
    }
}

/// Element data stored per node.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Structural kind.
    pub kind: ElementKind,
    /// Optional markup role.
    pub role: Option<Role>,
    /// State flags.
    pub flags: NodeFlags,
    /// Text content (used for labels).
    pub text: String,
    /// Link target, for [`ElementKind::Link`].
    pub href: Option<String>,
    /// Element id attribute.
    pub id: Option<String>,
    /// Explicit `tabindex`, if any.
    pub tab_index: Option<i32>,
    /// Border box reported by the layout collaborator, in viewport coordinates.
    pub bounds: Rect,
}

impl Element {
    /// A new visible element of the given kind.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            role: None,
            flags: NodeFlags::default(),
            text: String::new(),
            href: None,
            id: None,
            tab_index: None,
            bounds: Rect::ZERO,
        }
    }

    /// A generic container.
    pub fn block() -> Self {
        Self::new(ElementKind::Block)
    }

    /// A list.
    pub fn list() -> Self {
        Self::new(ElementKind::List)
    }

    /// A list item.
    pub fn item() -> Self {
        Self::new(ElementKind::Item)
    }

    /// A link with text and target.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: Some(href.into()),
            ..Self::new(ElementKind::Link)
        }
    }

    /// A button with text.
    pub fn button(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(ElementKind::Button)
        }
    }

    /// Set the role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Add flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the layout bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an explicit tab index.
    #[must_use]
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Whether this element, considered on its own, can take sequential focus.
    ///
    /// Ancestor visibility is checked by [`Tree::is_tabbable`](crate::Tree::is_tabbable).
    pub fn is_tabbable(&self) -> bool {
        if !self.flags.contains(NodeFlags::VISIBLE) || self.flags.contains(NodeFlags::DISABLED) {
            return false;
        }
        if self.tab_index.is_some_and(|t| t < 0) {
            return false;
        }
        match self.kind {
            ElementKind::Link => self.href.is_some(),
            ElementKind::Button => true,
            _ => {
                self.tab_index == Some(0) || self.flags.contains(NodeFlags::CONTENT_EDITABLE)
            }
        }
    }
}
