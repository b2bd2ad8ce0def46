// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Slide Over: panes that slide over their parent menu on small screens.
//!
//! [`SlideOver::install`] decorates a built [`MenuTree`]: every pane helper
//! gets a [`Role::SlideOverControls`] block as its first child, holding a
//! [`Role::BackButton`] and an optional [`Role::SlideOverTitle`]. The host
//! then forwards:
//!
//! - menu events, through [`SlideOver::on_menu_event`], which keeps the
//!   menu's minimum height equal to the slide in view, marks the newest
//!   slide active and traps focus inside it on mobile;
//! - back button activation, through [`SlideOver::activate_back`];
//! - key presses, through [`SlideOver::key_down`], for the trap's Tab wrap;
//! - off-canvas and resize notifications.
//!
//! Minimum heights are exposed with [`SlideOver::root_min_height`] and
//! [`SlideOver::pane_min_height`] for the host to apply as inline styles.
//!
//! ```
//! use understory_menu::{Layout, MenuTree, Registry, Settings as MenuSettings};
//! use understory_nav_tree::{Element, Role, Tree, Viewport};
//! use understory_slide_over::{Settings, SlideOver};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, Element::block());
//! let list = tree.insert(Some(root), Element::list().with_role(Role::MenuList));
//! let item = tree.insert(Some(list), Element::item());
//! tree.insert(Some(item), Element::link("Shop", "/shop"));
//! let sub = tree.insert(Some(item), Element::list());
//! tree.insert(Some(sub), Element::item());
//!
//! let settings = MenuSettings { layout: Layout::SLIDE_OVER, ..MenuSettings::default() };
//! let viewport = Viewport::new(375.0, 700.0);
//! let menu = MenuTree::build(&mut Registry::new(), &mut tree, root, settings, viewport).unwrap();
//! let slide = SlideOver::install(&mut tree, &menu, Settings::default());
//!
//! let back = slide.controls()[0].back_button;
//! assert_eq!(tree.element(back).unwrap().text, "‹ Back");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod settings;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use understory_focus::{FocusTrap, Key, KeyResponse};
use understory_menu::{Layout, MenuEvent, MenuEventKind, MenuTree};
use understory_nav_tree::{Element, ElementKind, NodeFlags, NodeId, Role, Tree, Viewport};

pub use settings::Settings;

/// Controls generated for one pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideControls {
    /// Item owning the pane.
    pub item: NodeId,
    /// The pane.
    pub pane: NodeId,
    /// The [`Role::SlideOverControls`] container.
    pub container: NodeId,
    /// The back button.
    pub back_button: NodeId,
    /// The slide title, a text span or a copy of the section link.
    pub title: Option<NodeId>,
    /// `aria-controls` of the back button.
    pub aria_controls: String,
}

/// Slide-over state of one menu.
#[derive(Debug)]
pub struct SlideOver {
    settings: Settings,
    controls: Vec<SlideControls>,
    min_heights: HashMap<NodeId, f64>,
    root_min_height: Option<f64>,
    trap: Option<FocusTrap<NodeId>>,
}

impl SlideOver {
    /// Generate back buttons and slide titles for every pane of `menu`.
    ///
    /// Panes without a helper or section link are skipped. The initial
    /// minimum height is computed right away.
    pub fn install(tree: &mut Tree, menu: &MenuTree, settings: Settings) -> Self {
        let mut controls = Vec::new();
        for node in menu.nodes() {
            let (Some(helper), Some(link)) = (node.helper, node.link) else {
                continue;
            };
            let Some(section) = tree.element(link).cloned() else {
                continue;
            };
            let use_section = section.flags.contains(NodeFlags::NOT_LINKABLE)
                || settings.dynamic_back_button_title;
            let name = section.text.trim();
            let label = if use_section {
                name
            } else {
                settings.back_label.as_str()
            };
            let label = match &settings.back_button_symbol {
                Some(symbol) => format!("{symbol} {label}"),
                None => String::from(label),
            };

            let container =
                tree.insert_at(helper, 0, Element::block().with_role(Role::SlideOverControls));
            let back_button = tree.insert(
                Some(container),
                Element::button(label).with_role(Role::BackButton),
            );
            let title = settings.slide_titles.then(|| {
                let title = if settings.slide_title_link {
                    let mut copy = Element::link(name, section.href.clone().unwrap_or_default());
                    copy.flags = section.flags;
                    copy
                } else {
                    Element::new(ElementKind::Text).with_text(name)
                };
                tree.insert(Some(container), title.with_role(Role::SlideOverTitle))
            });
            controls.push(SlideControls {
                item: node.item,
                pane: node.pane,
                container,
                back_button,
                title,
                aria_controls: node.pane_id.clone(),
            });
        }
        tracing::debug!(message = "slide_over.installed", panes = controls.len());

        let mut slide = Self {
            settings,
            controls,
            min_heights: HashMap::new(),
            root_min_height: None,
            trap: None,
        };
        slide.set_dynamic_height(tree, menu);
        slide
    }

    /// Settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generated controls in pane order.
    pub fn controls(&self) -> &[SlideControls] {
        &self.controls
    }

    /// Minimum height of the menu root.
    pub fn root_min_height(&self) -> Option<f64> {
        self.root_min_height
    }

    /// Minimum height of `pane`.
    pub fn pane_min_height(&self, pane: NodeId) -> Option<f64> {
        self.min_heights.get(&pane).copied()
    }

    /// The active focus trap.
    pub fn trap(&self) -> Option<&FocusTrap<NodeId>> {
        self.trap.as_ref()
    }

    /// The back button `button` was activated: toggle its pane closed.
    pub fn activate_back(
        &self,
        tree: &Tree,
        button: NodeId,
        menu: &mut MenuTree,
        viewport: Viewport,
    ) -> bool {
        let Some(controls) = self.controls.iter().find(|c| c.back_button == button) else {
            return false;
        };
        let Some(toggle) = menu.node_by_item(controls.item).and_then(|n| n.toggle) else {
            return false;
        };
        menu.activate_toggle(tree, toggle, viewport)
    }

    /// React to an event drained from `menu`.
    ///
    /// Returns the element to focus, when a slide was shown on mobile and no
    /// active item claims focus. A hiding slide releases the trap; it moves
    /// to the slide still in view, if any.
    pub fn on_menu_event(
        &mut self,
        tree: &Tree,
        event: &MenuEvent,
        menu: &mut MenuTree,
        focused: Option<NodeId>,
        viewport: Viewport,
    ) -> Option<NodeId> {
        match event.kind {
            MenuEventKind::Show | MenuEventKind::Hide => {
                let breakpoint = menu.settings().breakpoint;
                if breakpoint.is_none() || is_mobile_slide_over(menu, viewport) {
                    self.set_dynamic_height(tree, menu);
                }
                if event.kind == MenuEventKind::Hide {
                    self.on_hide(tree, menu, viewport);
                }
                None
            }
            MenuEventKind::Shown => self.on_shown(tree, menu, focused, viewport),
            _ => None,
        }
    }

    fn on_hide(&mut self, tree: &Tree, menu: &MenuTree, viewport: Viewport) {
        let Some(old) = self.trap.take() else {
            return;
        };
        let restore = old.release();
        if !is_mobile_slide_over(menu, viewport) {
            return;
        }
        if let Some(pane) = menu.last_showing().map(|n| n.pane) {
            let scope = trap_scope(tree, pane);
            tracing::debug!(message = "slide_over.trap_moved", ?scope);
            self.trap = Some(FocusTrap::new(scope, restore));
        }
    }

    fn on_shown(
        &mut self,
        tree: &Tree,
        menu: &mut MenuTree,
        focused: Option<NodeId>,
        viewport: Viewport,
    ) -> Option<NodeId> {
        let (item, pane) = menu.last_showing().map(|n| (n.item, n.pane))?;
        menu.mark_active(item);
        if let Some(old) = self.trap.take() {
            old.release();
        }
        if !is_mobile_slide_over(menu, viewport) {
            return None;
        }
        let scope = trap_scope(tree, pane);
        let trap = FocusTrap::new(scope, focused);
        let has_active = tree
            .descendants(menu.list())
            .any(|n| tree.flags(n).is_some_and(|f| f.contains(NodeFlags::ACTIVE)));
        let focus = if has_active {
            None
        } else {
            trap.initial_focus(&menu.tabbable_within(tree, scope))
        };
        tracing::debug!(message = "slide_over.trap", ?scope, ?focus);
        self.trap = Some(trap);
        focus
    }

    /// Match the menu's minimum height to the slide in view.
    ///
    /// The height comes from the last showing pane's helper, or the main list
    /// when nothing is showing. The pane enclosing that slide gets the same
    /// minimum height so its parent slide does not clip it.
    pub fn set_dynamic_height(&mut self, tree: &Tree, menu: &MenuTree) {
        self.min_heights.clear();
        let last = menu.last_showing();
        let source = last.and_then(|n| n.helper).unwrap_or(menu.list());
        let height = tree.bounds(source).map_or(0.0, |b| b.height());
        self.root_min_height = Some(height);
        if let Some(parent) =
            last.and_then(|n| tree.ancestors(n.item).find(|&a| tree.role(a) == Some(Role::Collapse)))
        {
            self.min_heights.insert(parent, height);
        }
        tracing::trace!(message = "slide_over.height", height);
    }

    /// Apply the trap's Tab wrap while `focused` has focus.
    ///
    /// Content of collapsed panes is not part of the tab order.
    pub fn key_down(
        &self,
        tree: &Tree,
        menu: &MenuTree,
        key: Key,
        focused: NodeId,
    ) -> KeyResponse<NodeId> {
        let (Some(trap), Some(nav)) = (self.trap.as_ref(), key.navigation()) else {
            return KeyResponse::ignored();
        };
        let order = menu.tabbable_within(tree, trap.scope());
        KeyResponse::from_tab(trap.on_tab(focused, nav, &order))
    }

    /// The enclosing off-canvas panel finished hiding.
    ///
    /// Collapses every pane when configured, which also drops the trap.
    pub fn on_panel_hidden(&mut self, menu: &mut MenuTree) {
        if !self.settings.off_canvas_close_all_menus
            || !menu.settings().layout.contains(Layout::SLIDE_OVER)
        {
            return;
        }
        menu.reset_all();
        if let Some(trap) = self.trap.take() {
            trap.release();
        }
        self.root_min_height = None;
        tracing::debug!(message = "slide_over.closed_all");
    }

    /// Apply a settled viewport size.
    ///
    /// Desktop slide-over menus drop the trap and the minimum height; other
    /// menus recompute it.
    pub fn on_resize_settled(&mut self, tree: &Tree, menu: &MenuTree, viewport: Viewport) {
        let desktop = viewport.is_desktop(menu.settings().breakpoint);
        if desktop && menu.settings().layout.contains(Layout::SLIDE_OVER) {
            if let Some(trap) = self.trap.take() {
                trap.release();
            }
            self.root_min_height = None;
        } else {
            self.set_dynamic_height(tree, menu);
        }
    }
}

/// The enclosing off-canvas menu, or the pane itself.
fn trap_scope(tree: &Tree, pane: NodeId) -> NodeId {
    tree.closest(pane, |e| e.role == Some(Role::PanelMenu))
        .unwrap_or(pane)
}

fn is_mobile_slide_over(menu: &MenuTree, viewport: Viewport) -> bool {
    menu.settings().layout.contains(Layout::SLIDE_OVER)
        && viewport.is_mobile(menu.settings().breakpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use understory_menu::{PaneAction, Registry, Settings as MenuSettings};
    use understory_nav_tree::Breakpoint;

    const MOBILE: Viewport = Viewport::new(375.0, 700.0);
    const DESKTOP: Viewport = Viewport::new(1280.0, 800.0);

    struct Fixture {
        tree: Tree,
        menu: MenuTree,
        slide: SlideOver,
    }

    /// List > Item(Shop > List > [Item(Shoes > List > Item(Boots)), Item(Hats)])
    fn fixture(settings: Settings) -> Fixture {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::block());
        let list = tree.insert(Some(root), Element::list().with_role(Role::MenuList));
        let shop = tree.insert(Some(list), Element::item());
        tree.insert(Some(shop), Element::link("Shop", "/shop"));
        let sub = tree.insert(Some(shop), Element::list());
        let shoes = tree.insert(Some(sub), Element::item());
        tree.insert(Some(shoes), Element::link("Shoes", "/shoes"));
        let deeper = tree.insert(Some(shoes), Element::list());
        let boots = tree.insert(Some(deeper), Element::item());
        tree.insert(Some(boots), Element::link("Boots", "/boots"));
        let hats = tree.insert(Some(sub), Element::item());
        tree.insert(Some(hats), Element::link("Hats", "/hats"));
        tree.set_bounds(list, Rect::new(0.0, 0.0, 375.0, 120.0));

        let menu_settings = MenuSettings {
            layout: Layout::SLIDE_OVER,
            breakpoint: Some(Breakpoint(1024)),
            ..MenuSettings::default()
        };
        let mut menu =
            MenuTree::build(&mut Registry::new(), &mut tree, root, menu_settings, MOBILE).unwrap();
        menu.take_events();
        let slide = SlideOver::install(&mut tree, &menu, settings);
        Fixture { tree, menu, slide }
    }

    fn pump(f: &mut Fixture, focused: Option<NodeId>) -> Option<NodeId> {
        let mut focus = None;
        for event in f.menu.take_events() {
            focus = f
                .slide
                .on_menu_event(&f.tree, &event, &mut f.menu, focused, MOBILE)
                .or(focus);
        }
        focus
    }

    #[test]
    fn controls_lead_every_helper() {
        let f = fixture(Settings::default());
        assert_eq!(f.slide.controls().len(), 2);
        for (controls, node) in f.slide.controls().iter().zip(f.menu.nodes()) {
            let helper = node.helper.unwrap();
            assert_eq!(f.tree.children_of(helper)[0], controls.container);
            assert_eq!(controls.aria_controls, node.pane_id);
            let title = f.tree.element(controls.title.unwrap()).unwrap();
            assert_eq!(title.kind, ElementKind::Text);
            assert_eq!(title.role, Some(Role::SlideOverTitle));
        }
        let title = f.slide.controls()[1].title.unwrap();
        assert_eq!(f.tree.element(title).unwrap().text, "Shoes");
        assert_eq!(f.slide.root_min_height(), Some(120.0));
    }

    #[test]
    fn back_label_variants() {
        let f = fixture(Settings {
            dynamic_back_button_title: true,
            back_button_symbol: None,
            slide_titles: false,
            ..Settings::default()
        });
        let back = f.slide.controls()[0].back_button;
        assert_eq!(f.tree.element(back).unwrap().text, "Shop");
        assert!(f.slide.controls()[0].title.is_none());
    }

    #[test]
    fn title_link_copies_section_link() {
        let f = fixture(Settings {
            slide_title_link: true,
            ..Settings::default()
        });
        let title = f.slide.controls()[0].title.unwrap();
        let el = f.tree.element(title).unwrap();
        assert_eq!(el.kind, ElementKind::Link);
        assert_eq!(el.href.as_deref(), Some("/shop"));
        assert!(f.tree.children_of(title).is_empty());
    }

    #[test]
    fn dynamic_height_follows_last_slide() {
        let mut f = fixture(Settings::default());
        let (shop, shoes) = (&f.menu.nodes()[0], &f.menu.nodes()[1]);
        let (shop_item, shop_pane, shop_helper) = (shop.item, shop.pane, shop.helper.unwrap());
        let (shoes_item, shoes_helper) = (shoes.item, shoes.helper.unwrap());
        f.tree
            .set_bounds(shop_helper, Rect::new(0.0, 0.0, 375.0, 300.0));
        f.tree
            .set_bounds(shoes_helper, Rect::new(0.0, 0.0, 375.0, 180.0));

        f.menu
            .set_pane_state(&f.tree, shop_item, PaneAction::Show, false);
        pump(&mut f, None);
        assert_eq!(f.slide.root_min_height(), Some(300.0));
        assert_eq!(f.slide.pane_min_height(shop_pane), None);

        f.menu
            .set_pane_state(&f.tree, shoes_item, PaneAction::Show, false);
        pump(&mut f, None);
        assert_eq!(f.slide.root_min_height(), Some(180.0));
        assert_eq!(f.slide.pane_min_height(shop_pane), Some(180.0));

        f.menu
            .set_pane_state(&f.tree, shoes_item, PaneAction::Hide, false);
        pump(&mut f, None);
        assert_eq!(f.slide.root_min_height(), Some(300.0));
        assert_eq!(f.slide.pane_min_height(shop_pane), None);
    }

    #[test]
    fn shown_slide_is_active_and_trapped() {
        let mut f = fixture(Settings::default());
        let toggle = f.menu.nodes()[0].toggle.unwrap();
        f.menu.activate_toggle(&f.tree, toggle, MOBILE);
        let pane = f.menu.nodes()[0].pane;
        f.menu.on_transition_end(pane);
        let focus = pump(&mut f, Some(toggle));

        let item = f.menu.nodes()[0].item;
        assert!(
            f.menu
                .item_classes(item)
                .unwrap()
                .contains(understory_menu::ItemClasses::ACTIVE)
        );
        let trap = f.slide.trap().unwrap();
        assert_eq!(trap.scope(), pane);
        let order = f.tree.tabbable_within(pane);
        assert_eq!(focus, order.first().copied());
        assert_eq!(f.tree.role(order[0]), Some(Role::BackButton));
    }

    #[test]
    fn tab_wraps_inside_the_slide() {
        let mut f = fixture(Settings::default());
        let item = f.menu.nodes()[0].item;
        f.menu.set_pane_state(&f.tree, item, PaneAction::Show, false);
        pump(&mut f, None);

        let pane = f.menu.nodes()[0].pane;
        let boots_pane = f.menu.nodes()[1].pane;
        let order = f.menu.tabbable_within(&f.tree, pane);
        assert!(order.iter().all(|&n| !f.tree.contains(boots_pane, n)));
        assert!(
            f.tree
                .tabbable_within(pane)
                .iter()
                .any(|&n| f.tree.contains(boots_pane, n))
        );

        let (first, last) = (order[0], *order.last().unwrap());
        let tab = Key::Tab { shift: false };
        let response = f.slide.key_down(&f.tree, &f.menu, tab, last);
        assert_eq!(response.focus, Some(first));
        assert!(response.prevent_default);

        let response = f
            .slide
            .key_down(&f.tree, &f.menu, Key::Tab { shift: true }, first);
        assert_eq!(response.focus, Some(last));

        let response = f.slide.key_down(&f.tree, &f.menu, tab, first);
        assert_eq!(response, KeyResponse::ignored());
    }

    #[test]
    fn hiding_the_slide_releases_the_trap() {
        let mut f = fixture(Settings::default());
        let item = f.menu.nodes()[0].item;
        f.menu.set_pane_state(&f.tree, item, PaneAction::Show, false);
        pump(&mut f, None);
        assert!(f.slide.trap().is_some());

        f.menu.set_pane_state(&f.tree, item, PaneAction::Hide, false);
        pump(&mut f, None);
        assert!(f.slide.trap().is_none());
        let top_level = f.menu.nodes()[0].link.unwrap();
        let response = f
            .slide
            .key_down(&f.tree, &f.menu, Key::Tab { shift: false }, top_level);
        assert_eq!(response, KeyResponse::ignored());
    }

    #[test]
    fn trap_moves_to_the_slide_still_in_view() {
        let mut f = fixture(Settings::default());
        let (shop, shop_pane) = (f.menu.nodes()[0].item, f.menu.nodes()[0].pane);
        let (shoes, shoes_pane) = (f.menu.nodes()[1].item, f.menu.nodes()[1].pane);
        f.menu.set_pane_state(&f.tree, shop, PaneAction::Show, false);
        pump(&mut f, None);
        f.menu.set_pane_state(&f.tree, shoes, PaneAction::Show, false);
        pump(&mut f, None);
        assert_eq!(f.slide.trap().map(FocusTrap::scope), Some(shoes_pane));

        f.menu.set_pane_state(&f.tree, shoes, PaneAction::Hide, false);
        pump(&mut f, None);
        assert_eq!(f.slide.trap().map(FocusTrap::scope), Some(shop_pane));
    }

    #[test]
    fn panel_hidden_drops_the_trap() {
        let mut f = fixture(Settings {
            off_canvas_close_all_menus: true,
            ..Settings::default()
        });
        let item = f.menu.nodes()[0].item;
        f.menu.set_pane_state(&f.tree, item, PaneAction::Show, false);
        pump(&mut f, None);
        f.slide.on_panel_hidden(&mut f.menu);
        assert!(f.slide.trap().is_none());
    }

    #[test]
    fn no_trap_on_desktop() {
        let mut f = fixture(Settings::default());
        let item = f.menu.nodes()[0].item;
        f.menu.set_pane_state(&f.tree, item, PaneAction::Show, false);
        for event in f.menu.take_events() {
            f.slide
                .on_menu_event(&f.tree, &event, &mut f.menu, None, DESKTOP);
        }
        assert!(f.slide.trap().is_none());
    }

    #[test]
    fn panel_hidden_collapses_all_when_configured() {
        let mut f = fixture(Settings {
            off_canvas_close_all_menus: true,
            ..Settings::default()
        });
        let item = f.menu.nodes()[0].item;
        f.menu.set_pane_state(&f.tree, item, PaneAction::Show, false);
        pump(&mut f, None);
        f.slide.on_panel_hidden(&mut f.menu);
        assert!(f.menu.showing().next().is_none());
        assert_eq!(f.slide.root_min_height(), None);
        assert!(f.menu.take_events().is_empty());
    }

    #[test]
    fn desktop_resize_drops_trap_and_height() {
        let mut f = fixture(Settings::default());
        let item = f.menu.nodes()[0].item;
        f.menu.set_pane_state(&f.tree, item, PaneAction::Show, false);
        pump(&mut f, None);
        assert!(f.slide.trap().is_some());
        f.slide.on_resize_settled(&f.tree, &f.menu, DESKTOP);
        assert!(f.slide.trap().is_none());
        assert_eq!(f.slide.root_min_height(), None);
    }

    #[test]
    fn back_button_closes_its_slide() {
        let mut f = fixture(Settings::default());
        let item = f.menu.nodes()[0].item;
        f.menu.set_pane_state(&f.tree, item, PaneAction::Show, false);
        let back = f.slide.controls()[0].back_button;
        assert!(f.slide.activate_back(&f.tree, back, &mut f.menu, MOBILE));
        assert!(!f.menu.nodes()[0].is_showing());
    }
}
