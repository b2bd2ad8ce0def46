// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Off Canvas: a headless drawer that slides in from the viewport edge.
//!
//! [`OffCanvasPanel::new`] locates the drawer's parts below a root element
//! by [`Role`]: the sliding [`Role::PanelMenu`] (required), and optionally a
//! [`Role::PanelOverlay`], a [`Role::PanelToggle`] and a [`Role::PanelClose`].
//!
//! The panel keeps one [`PanelState`] and derives everything a host applies
//! from it: the `show` class on menu and overlay, `aria-expanded` on the
//! controls, the page scroll lock, the menu's `inert` attribute and, while
//! swiping or snapping, an inline transform.
//!
//! Opening installs a focus trap on the menu; closing releases it and hands
//! back the element that had focus before. On mobile, an open swipeable
//! panel follows closing drags and decides on release whether to close or
//! snap back.
//!
//! ```
//! use understory_focus::Key;
//! use understory_nav_tree::{Element, Role, Tree, Viewport};
//! use understory_off_canvas::{OffCanvasPanel, PanelEvent, Settings};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, Element::block());
//! let toggle = tree.insert(Some(root), Element::button("Menu").with_role(Role::PanelToggle));
//! let menu = tree.insert(Some(root), Element::block().with_role(Role::PanelMenu));
//! let home = tree.insert(Some(menu), Element::link("Home", "/"));
//!
//! let settings = Settings { breakpoint: Some("992".into()), ..Settings::default() };
//! let mut panel = OffCanvasPanel::new(&tree, root, settings).unwrap();
//!
//! assert_eq!(panel.open(&tree, Some(toggle)), Some(home));
//! assert!(panel.aria_expanded());
//! assert!(panel.on_transition_end());
//!
//! let response = panel.key_down(&tree, Key::Escape, home);
//! assert_eq!(response.focus, Some(toggle));
//! panel.on_transition_end();
//! assert_eq!(
//!     panel.take_events(),
//!     [PanelEvent::Show, PanelEvent::Shown, PanelEvent::Hide, PanelEvent::Hidden]
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod settings;

use alloc::vec::Vec;
use kurbo::Point;
use understory_event_state::queue::EventQueue;
use understory_event_state::swipe::{DragUpdate, Edge, SwipeDecision, SwipeTracker};
use understory_focus::{FocusTrap, Key, KeyResponse, Navigation};
use understory_nav_tree::{
    Breakpoint, NodeFlags, NodeId, ParseBreakpointError, Role, Tree, Viewport,
};

pub use settings::Settings;

/// Why a panel could not be created.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    /// The root id does not refer to a live node.
    #[error("panel root {0:?} is not a live node")]
    StaleRoot(NodeId),
    /// No breakpoint was configured.
    #[error("off-canvas panel has no breakpoint")]
    MissingBreakpoint,
    /// The breakpoint attribute could not be parsed.
    #[error("invalid breakpoint: {0}")]
    InvalidBreakpoint(#[from] ParseBreakpointError),
    /// The root contains no element with [`Role::PanelMenu`].
    #[error("no panel menu below the root")]
    MissingMenu,
}

/// Notifications for the host, the typed counterpart of `*.offCanvas` DOM events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanelEvent {
    /// The panel started opening.
    Show,
    /// The panel finished opening.
    Shown,
    /// The panel started closing.
    Hide,
    /// The panel finished closing.
    Hidden,
}

impl PanelEvent {
    /// DOM event name a host bridging to custom events would dispatch.
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Show => "show.offCanvas",
            Self::Shown => "shown.offCanvas",
            Self::Hide => "hide.offCanvas",
            Self::Hidden => "hidden.offCanvas",
        }
    }
}

/// Open/closed state of the panel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum PanelState {
    /// Off screen.
    #[default]
    Closed,
    /// Sliding in.
    Opening,
    /// Fully open.
    Open,
    /// Following a closing drag.
    Dragging(DragUpdate),
    /// Sliding out.
    Closing,
}

bitflags::bitflags! {
    /// Classes of the menu and overlay elements.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PanelClasses: u8 {
        /// The panel is open.
        const SHOW = 0b1;
    }
}

impl PanelClasses {
    /// Class names a DOM host applies for the set flags.
    pub fn class_names(self) -> impl Iterator<Item = &'static str> {
        [(Self::SHOW, "show")]
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

/// Inline transform overriding the stylesheet while swiping or snapping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelTransform {
    /// Horizontal menu translation in pixels.
    pub translate_x: f64,
    /// Overlay opacity in `0.0..=1.0`.
    pub overlay_opacity: f64,
    /// Duration of the transform transition, set while snapping.
    pub transition_ms: Option<u64>,
}

impl PanelTransform {
    /// Whether the overlay is visible at all.
    pub fn overlay_visible(&self) -> bool {
        self.overlay_opacity > 0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Snap {
    translate_x: f64,
    until: u64,
}

/// An off-canvas drawer.
#[derive(Debug)]
pub struct OffCanvasPanel {
    root: NodeId,
    menu: NodeId,
    overlay: Option<NodeId>,
    toggle: Option<NodeId>,
    close: Option<NodeId>,
    breakpoint: Breakpoint,
    settings: Settings,
    state: PanelState,
    swipe: SwipeTracker,
    snap: Option<Snap>,
    trap: Option<FocusTrap<NodeId>>,
    events: EventQueue<PanelEvent>,
}

impl OffCanvasPanel {
    /// Find the panel parts below `root`.
    ///
    /// A menu flagged [`NodeFlags::PANEL_RIGHT`] slides in from the right edge.
    pub fn new(tree: &Tree, root: NodeId, settings: Settings) -> Result<Self, PanelError> {
        if !tree.is_alive(root) {
            tracing::warn!(message = "off_canvas.init_failed", ?root, reason = "stale root");
            return Err(PanelError::StaleRoot(root));
        }
        let breakpoint: Breakpoint = match settings.breakpoint.as_deref() {
            Some(attr) => attr.parse().inspect_err(|err| {
                tracing::warn!(message = "off_canvas.init_failed", %err);
            })?,
            None => {
                tracing::warn!(message = "off_canvas.init_failed", reason = "missing breakpoint");
                return Err(PanelError::MissingBreakpoint);
            }
        };
        let find = |role: Role| tree.find_within(root, |e| e.role == Some(role));
        let Some(menu) = find(Role::PanelMenu) else {
            tracing::warn!(message = "off_canvas.init_failed", reason = "missing menu");
            return Err(PanelError::MissingMenu);
        };
        let edge = if tree.flags(menu).is_some_and(|f| f.contains(NodeFlags::PANEL_RIGHT)) {
            Edge::Right
        } else {
            Edge::Left
        };
        let panel = Self {
            root,
            menu,
            overlay: find(Role::PanelOverlay),
            toggle: find(Role::PanelToggle),
            close: find(Role::PanelClose),
            breakpoint,
            swipe: SwipeTracker::new(edge, settings.swipe),
            settings,
            state: PanelState::Closed,
            snap: None,
            trap: None,
            events: EventQueue::new(),
        };
        tracing::debug!(message = "off_canvas.initialized", %breakpoint, ?edge);
        Ok(panel)
    }

    /// Panel root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The sliding menu.
    pub fn menu(&self) -> NodeId {
        self.menu
    }

    /// The overlay, if present.
    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }

    /// The toggle control, if present.
    pub fn toggle_control(&self) -> Option<NodeId> {
        self.toggle
    }

    /// The close control, if present.
    pub fn close_control(&self) -> Option<NodeId> {
        self.close
    }

    /// Parsed breakpoint.
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Edge the menu slides in from.
    pub fn edge(&self) -> Edge {
        self.swipe.edge()
    }

    /// Current state.
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Opening, open or being dragged.
    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            PanelState::Opening | PanelState::Open | PanelState::Dragging(_)
        )
    }

    /// Classes of the menu and the overlay.
    pub fn classes(&self) -> PanelClasses {
        if self.is_open() {
            PanelClasses::SHOW
        } else {
            PanelClasses::empty()
        }
    }

    /// `aria-expanded` of the toggle and close controls.
    pub fn aria_expanded(&self) -> bool {
        self.is_open()
    }

    /// Page scrolling is locked.
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    /// The menu is hidden from assistive technology and focus: mobile and not open.
    pub fn is_inert(&self, viewport: Viewport) -> bool {
        viewport.is_mobile(Some(self.breakpoint)) && !self.is_open()
    }

    /// Inline transform while dragging or snapping.
    pub fn transform(&self) -> Option<PanelTransform> {
        let width = self.settings.menu_width;
        if let PanelState::Dragging(drag) = self.state {
            return Some(PanelTransform {
                translate_x: drag.translate_x,
                overlay_opacity: drag.overlay_opacity,
                transition_ms: None,
            });
        }
        self.snap.map(|snap| PanelTransform {
            translate_x: snap.translate_x,
            overlay_opacity: if width > 0.0 {
                snap.translate_x.abs() / width
            } else {
                0.0
            },
            transition_ms: Some(self.settings.swipe.snap_duration),
        })
    }

    /// Open a closed panel or close an open one.
    ///
    /// Returns the element to focus.
    pub fn toggle(&mut self, tree: &Tree, focused: Option<NodeId>) -> Option<NodeId> {
        if self.is_open() {
            self.close()
        } else {
            self.open(tree, focused)
        }
    }

    /// Open the panel, remembering `focused` to restore on close.
    ///
    /// Returns the first tabbable element in the menu. Opening an open panel
    /// does nothing.
    pub fn open(&mut self, tree: &Tree, focused: Option<NodeId>) -> Option<NodeId> {
        if self.is_open() {
            tracing::trace!(message = "off_canvas.open_ignored");
            return None;
        }
        self.state = PanelState::Opening;
        self.snap = None;
        let trap = FocusTrap::new(self.menu, focused);
        let focus = trap.initial_focus(&tree.tabbable_within(self.menu));
        self.trap = Some(trap);
        self.events.push(PanelEvent::Show);
        tracing::debug!(message = "off_canvas.open", ?focus);
        focus
    }

    /// Close the panel.
    ///
    /// Returns the element that had focus when the panel opened. Closing a
    /// closed panel does nothing.
    pub fn close(&mut self) -> Option<NodeId> {
        if !self.is_open() {
            tracing::trace!(message = "off_canvas.close_ignored");
            return None;
        }
        self.state = PanelState::Closing;
        self.swipe.cancel();
        self.events.push(PanelEvent::Hide);
        let restore = self.trap.take().and_then(FocusTrap::release);
        tracing::debug!(message = "off_canvas.close", ?restore);
        restore
    }

    /// The menu's slide transition ended.
    ///
    /// Returns `false` if the panel was not sliding.
    pub fn on_transition_end(&mut self) -> bool {
        let (state, event) = match self.state {
            PanelState::Opening => (PanelState::Open, PanelEvent::Shown),
            PanelState::Closing => (PanelState::Closed, PanelEvent::Hidden),
            _ => return false,
        };
        self.state = state;
        self.events.push(event);
        true
    }

    fn accepts_swipe(&self, viewport: Viewport) -> bool {
        self.settings.swipeable && self.is_open() && viewport.is_mobile(Some(self.breakpoint))
    }

    /// Pointer or touch down at `position`.
    ///
    /// A new gesture may start while a snap is still animating; the snap
    /// transform stays until [`OffCanvasPanel::poll`] clears it.
    pub fn pointer_down(&mut self, position: Point, viewport: Viewport, now: u64) {
        if self.accepts_swipe(viewport) {
            self.swipe.on_down(position, now);
        }
    }

    /// Pointer or touch move.
    ///
    /// Returns the drag state when the move is part of a closing drag; the
    /// host should then prevent scrolling.
    pub fn pointer_move(&mut self, position: Point, viewport: Viewport) -> Option<DragUpdate> {
        if !self.accepts_swipe(viewport) {
            return None;
        }
        let update = self.swipe.on_move(position, self.settings.menu_width)?;
        self.state = PanelState::Dragging(update);
        Some(update)
    }

    /// Pointer or touch up at `now`.
    ///
    /// A drag closes the panel or snaps it back open, animating over the
    /// snap duration; [`OffCanvasPanel::poll`] clears the transform
    /// afterwards. Returns the decision and, when closing, the element to
    /// restore focus to.
    pub fn pointer_up(
        &mut self,
        viewport: Viewport,
        now: u64,
    ) -> Option<(SwipeDecision, Option<NodeId>)> {
        let dragging = matches!(self.state, PanelState::Dragging(_));
        if !self.accepts_swipe(viewport) {
            self.swipe.cancel();
            if dragging {
                self.state = PanelState::Open;
            }
            return None;
        }
        let width = self.settings.menu_width;
        let until = now + self.settings.swipe.snap_duration;
        let Some(decision) = self.swipe.on_up(now, width) else {
            if dragging {
                self.state = PanelState::Open;
            }
            return None;
        };
        let restore = match decision {
            SwipeDecision::Close => {
                self.snap = Some(Snap {
                    translate_x: 0.0,
                    until,
                });
                self.close()
            }
            SwipeDecision::SnapBack => {
                self.state = PanelState::Open;
                self.snap = Some(Snap {
                    translate_x: self.swipe.edge().open_offset(width),
                    until,
                });
                None
            }
        };
        Some((decision, restore))
    }

    /// Clear the snap transform once its animation is over.
    pub fn poll(&mut self, now: u64) {
        if self.snap.is_some_and(|s| s.until <= now) {
            self.snap = None;
            tracing::trace!(message = "off_canvas.snap_done");
        }
    }

    /// Timestamp at which [`OffCanvasPanel::poll`] next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.snap.map(|s| s.until)
    }

    /// A key was pressed while `focused` had focus.
    ///
    /// Escape closes an open panel and restores focus. Tab and Shift+Tab
    /// wrap inside the menu while it is open.
    pub fn key_down(&mut self, tree: &Tree, key: Key, focused: NodeId) -> KeyResponse<NodeId> {
        self.key_down_where(tree, key, focused, |_| true)
    }

    /// [`OffCanvasPanel::key_down`] with the tab order limited to elements
    /// accepted by `keep`.
    ///
    /// Panels hosting a collapsible menu pass the menu's visibility here so
    /// focus never wraps to content of a collapsed pane.
    pub fn key_down_where(
        &mut self,
        tree: &Tree,
        key: Key,
        focused: NodeId,
        keep: impl FnMut(NodeId) -> bool,
    ) -> KeyResponse<NodeId> {
        match key {
            Key::Escape if self.is_open() => KeyResponse {
                focus: self.close(),
                prevent_default: true,
            },
            Key::Tab { shift } => {
                let Some(trap) = self.trap.as_ref() else {
                    return KeyResponse::ignored();
                };
                let order: Vec<NodeId> = tree.tabbable_within_where(self.menu, keep);
                let nav = Navigation::from_tab(shift);
                KeyResponse::from_tab(trap.on_tab(focused, nav, &order))
            }
            _ => KeyResponse::ignored(),
        }
    }

    /// The viewport was resized.
    ///
    /// On desktop the panel closes; returns the element to restore focus to.
    pub fn on_resize(&mut self, viewport: Viewport) -> Option<NodeId> {
        if !viewport.is_desktop(Some(self.breakpoint)) {
            return None;
        }
        self.snap = None;
        self.close()
    }

    /// Take all queued events in emission order.
    pub fn take_events(&mut self) -> Vec<PanelEvent> {
        self.events.drain()
    }

    /// Queued events, for dispatching in place.
    pub fn events_mut(&mut self) -> &mut EventQueue<PanelEvent> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_nav_tree::Element;

    const MOBILE: Viewport = Viewport::new(375.0, 700.0);
    const DESKTOP: Viewport = Viewport::new(1200.0, 800.0);

    struct Fixture {
        tree: Tree,
        panel: OffCanvasPanel,
        toggle: NodeId,
        links: [NodeId; 3],
    }

    fn fixture(right: bool, swipeable: bool) -> Fixture {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::block());
        let toggle = tree.insert(Some(root), Element::button("Menu").with_role(Role::PanelToggle));
        let mut flags = NodeFlags::VISIBLE;
        if right {
            flags |= NodeFlags::PANEL_RIGHT;
        }
        let menu = tree.insert(
            Some(root),
            Element::block().with_role(Role::PanelMenu).with_flags(flags),
        );
        let links = ["A", "B", "C"].map(|t| tree.insert(Some(menu), Element::link(t, "/")));
        tree.insert(Some(root), Element::block().with_role(Role::PanelOverlay));
        let settings = Settings {
            breakpoint: Some("992".into()),
            swipeable,
            menu_width: 300.0,
            ..Settings::default()
        };
        let panel = OffCanvasPanel::new(&tree, root, settings).unwrap();
        Fixture {
            tree,
            panel,
            toggle,
            links,
        }
    }

    fn opened(right: bool) -> Fixture {
        let mut f = fixture(right, true);
        f.panel.open(&f.tree, Some(f.toggle));
        f.panel.on_transition_end();
        f.panel.take_events();
        f
    }

    #[test]
    fn construction_errors() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::block());
        assert_eq!(
            OffCanvasPanel::new(&tree, root, Settings::default()).unwrap_err(),
            PanelError::MissingBreakpoint
        );
        let settings = Settings {
            breakpoint: Some("wide".into()),
            ..Settings::default()
        };
        assert!(matches!(
            OffCanvasPanel::new(&tree, root, settings).unwrap_err(),
            PanelError::InvalidBreakpoint(_)
        ));
        let settings = Settings {
            breakpoint: Some("768".into()),
            ..Settings::default()
        };
        assert_eq!(
            OffCanvasPanel::new(&tree, root, settings.clone()).unwrap_err(),
            PanelError::MissingMenu
        );
        tree.insert(Some(root), Element::block().with_role(Role::PanelMenu));
        let panel = OffCanvasPanel::new(&tree, root, settings).unwrap();
        assert_eq!(panel.breakpoint(), Breakpoint(768));
        assert_eq!(panel.toggle_control(), None);
        assert_eq!(panel.edge(), Edge::Left);
    }

    #[test]
    fn second_open_is_a_no_op() {
        let mut f = fixture(false, false);
        assert_eq!(f.panel.open(&f.tree, Some(f.toggle)), Some(f.links[0]));
        assert_eq!(f.panel.open(&f.tree, Some(f.links[0])), None);
        assert_eq!(f.panel.take_events(), [PanelEvent::Show]);
        assert_eq!(f.panel.close(), Some(f.toggle), "first open's focus is restored");
        assert_eq!(f.panel.close(), None);
        assert_eq!(f.panel.take_events(), [PanelEvent::Hide]);
    }

    #[test]
    fn presentation_follows_state() {
        let mut f = fixture(false, false);
        assert!(f.panel.is_inert(MOBILE));
        assert!(!f.panel.is_inert(DESKTOP));
        assert_eq!(f.panel.classes(), PanelClasses::empty());

        f.panel.toggle(&f.tree, None);
        assert!(f.panel.aria_expanded());
        assert!(f.panel.scroll_locked());
        assert!(!f.panel.is_inert(MOBILE));
        assert_eq!(f.panel.classes().class_names().collect::<Vec<_>>(), ["show"]);

        f.panel.toggle(&f.tree, None);
        assert_eq!(f.panel.state(), PanelState::Closing);
        assert!(!f.panel.scroll_locked());
        assert!(f.panel.on_transition_end());
        assert!(!f.panel.on_transition_end());
        assert_eq!(f.panel.state(), PanelState::Closed);
    }

    #[test]
    fn tab_wraps_from_last_to_first() {
        let mut f = opened(false);
        let [first, _, last] = f.links;
        let r = f.panel.key_down(&f.tree, Key::Tab { shift: false }, last);
        assert_eq!(r.focus, Some(first));
        assert!(r.prevent_default);
        let r = f.panel.key_down(&f.tree, Key::Tab { shift: true }, first);
        assert_eq!(r.focus, Some(last));
        let r = f.panel.key_down(&f.tree, Key::Tab { shift: false }, first);
        assert_eq!(r, KeyResponse::ignored());
    }

    #[test]
    fn tab_wrap_skips_rejected_elements() {
        let mut f = opened(false);
        let [first, middle, last] = f.links;
        let r = f
            .panel
            .key_down_where(&f.tree, Key::Tab { shift: false }, middle, |n| n != last);
        assert_eq!(r.focus, Some(first), "middle is the last kept element");
        let r = f
            .panel
            .key_down_where(&f.tree, Key::Tab { shift: true }, first, |n| n != last);
        assert_eq!(r.focus, Some(middle));
    }

    #[test]
    fn escape_closes_and_restores_focus() {
        let mut f = opened(false);
        let r = f.panel.key_down(&f.tree, Key::Escape, f.links[1]);
        assert_eq!(r.focus, Some(f.toggle));
        assert!(!f.panel.is_open());
        let r = f.panel.key_down(&f.tree, Key::Escape, f.toggle);
        assert_eq!(r, KeyResponse::ignored());
    }

    #[test]
    fn desktop_resize_closes() {
        let mut f = opened(false);
        assert_eq!(f.panel.on_resize(MOBILE), None);
        assert!(f.panel.is_open());
        assert_eq!(f.panel.on_resize(DESKTOP), Some(f.toggle));
        assert!(!f.panel.is_open());
        assert!(!f.panel.is_inert(DESKTOP));
    }

    #[test]
    fn slow_drag_past_half_closes() {
        let mut f = opened(false);
        f.panel.pointer_down(Point::new(280.0, 100.0), MOBILE, 0);
        let update = f
            .panel
            .pointer_move(Point::new(100.0, 105.0), MOBILE)
            .unwrap();
        assert_eq!(update.translate_x, 120.0);
        assert!(matches!(f.panel.state(), PanelState::Dragging(_)));
        assert_eq!(f.panel.transform().unwrap().transition_ms, None);

        let (decision, restore) = f.panel.pointer_up(MOBILE, 2000).unwrap();
        assert_eq!(decision, SwipeDecision::Close);
        assert_eq!(restore, Some(f.toggle));
        assert_eq!(f.panel.state(), PanelState::Closing);
        assert_eq!(f.panel.transform().unwrap().translate_x, 0.0);
        assert_eq!(f.panel.next_deadline(), Some(2300));
        f.panel.poll(2300);
        assert_eq!(f.panel.transform(), None);
        assert!(f.panel.on_transition_end());
        assert_eq!(f.panel.state(), PanelState::Closed);
        assert_eq!(
            f.panel.take_events(),
            [PanelEvent::Hide, PanelEvent::Hidden]
        );
    }

    #[test]
    fn slow_short_drag_snaps_back() {
        let mut f = opened(false);
        f.panel.pointer_down(Point::new(280.0, 100.0), MOBILE, 0);
        f.panel.pointer_move(Point::new(230.0, 100.0), MOBILE);
        let (decision, restore) = f.panel.pointer_up(MOBILE, 2000).unwrap();
        assert_eq!(decision, SwipeDecision::SnapBack);
        assert_eq!(restore, None);
        assert_eq!(f.panel.state(), PanelState::Open);
        let transform = f.panel.transform().unwrap();
        assert_eq!(transform.translate_x, 300.0);
        assert_eq!(transform.transition_ms, Some(300));
    }

    #[test]
    fn fast_flick_closes_right_panel() {
        let mut f = opened(true);
        f.panel.pointer_down(Point::new(100.0, 100.0), MOBILE, 0);
        f.panel.pointer_move(Point::new(140.0, 100.0), MOBILE);
        let (decision, _) = f.panel.pointer_up(MOBILE, 50).unwrap();
        assert_eq!(decision, SwipeDecision::Close);
    }

    #[test]
    fn opening_direction_never_drags() {
        let mut f = opened(false);
        f.panel.pointer_down(Point::new(100.0, 100.0), MOBILE, 0);
        assert_eq!(f.panel.pointer_move(Point::new(250.0, 100.0), MOBILE), None);
        assert_eq!(f.panel.pointer_up(MOBILE, 20), None);
        assert_eq!(f.panel.state(), PanelState::Open);
    }

    #[test]
    fn swipe_ignored_on_desktop_and_when_disabled() {
        let mut f = opened(false);
        f.panel.pointer_down(Point::new(280.0, 100.0), DESKTOP, 0);
        assert_eq!(f.panel.pointer_move(Point::new(50.0, 100.0), DESKTOP), None);

        let mut f = fixture(false, false);
        f.panel.open(&f.tree, None);
        f.panel.pointer_down(Point::new(280.0, 100.0), MOBILE, 0);
        assert_eq!(f.panel.pointer_move(Point::new(50.0, 100.0), MOBILE), None);
    }

    #[test]
    fn vertical_release_restores_open_state() {
        let mut f = opened(false);
        f.panel.pointer_down(Point::new(280.0, 100.0), MOBILE, 0);
        f.panel.pointer_move(Point::new(260.0, 105.0), MOBILE);
        f.panel.pointer_move(Point::new(260.0, 400.0), MOBILE);
        assert_eq!(f.panel.pointer_up(MOBILE, 500), None);
        assert_eq!(f.panel.state(), PanelState::Open);
        assert_eq!(f.panel.transform(), None);
    }

    #[test]
    fn release_after_leaving_mobile_drops_the_drag() {
        let mut f = opened(false);
        f.panel.pointer_down(Point::new(280.0, 100.0), MOBILE, 0);
        f.panel.pointer_move(Point::new(150.0, 100.0), MOBILE);
        assert!(f.panel.transform().is_some());
        assert_eq!(f.panel.pointer_up(DESKTOP, 400), None);
        assert_eq!(f.panel.state(), PanelState::Open);
        assert_eq!(f.panel.transform(), None);
    }
}
