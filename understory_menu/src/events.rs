// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events emitted by a menu.

use understory_nav_tree::NodeId;

/// What happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuEventKind {
    /// A pane is about to change state.
    Transition,
    /// A pane started opening.
    Show,
    /// A pane finished opening.
    Shown,
    /// A pane started closing.
    Hide,
    /// A pane finished closing.
    Hidden,
    /// A pane finished opening or closing.
    Transitioned,
    /// The menu finished building.
    Initialized,
    /// The expander started opening.
    ExpanderShowing,
    /// The expander finished opening.
    ExpanderShown,
    /// The expander started closing.
    ExpanderHiding,
    /// The expander finished closing.
    ExpanderHidden,
}

impl MenuEventKind {
    /// DOM event name a host bridging to custom events would dispatch.
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Transition => "transition.mln.child",
            Self::Show => "show.mln.child",
            Self::Shown => "shown.mln.child",
            Self::Hide => "hide.mln.child",
            Self::Hidden => "hidden.mln.child",
            Self::Transitioned => "transitioned.mln.child",
            Self::Initialized => "initialized.mln",
            Self::ExpanderShowing => "showing.mln.expander",
            Self::ExpanderShown => "shown.mln.expander",
            Self::ExpanderHiding => "hiding.mln.expander",
            Self::ExpanderHidden => "hidden.mln.expander",
        }
    }
}

/// An event with the element it concerns.
///
/// Pane events target the menu item owning the pane, expander events the
/// expander, and [`MenuEventKind::Initialized`] the menu root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MenuEvent {
    /// What happened.
    pub kind: MenuEventKind,
    /// Element the event is dispatched on.
    pub target: NodeId,
}

bitflags::bitflags! {
    /// Document-level backdrop requests.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Backdrop: u8 {
        /// A navbar pane is showing.
        const MENU      = 0b01;
        /// A navbar mega menu is showing.
        const MEGA_MENU = 0b10;
    }
}

impl Backdrop {
    /// Body class a DOM host applies for each raised flag.
    pub fn class_names(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::MENU, "js-mln-menu-showing"),
            (Self::MEGA_MENU, "js-mln-mega-menu-showing"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}
