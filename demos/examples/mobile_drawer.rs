// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mobile drawer: an off-canvas panel hosting a slide-over menu.
//!
//! Shows how a host:
//! - opens the panel and moves focus into it,
//! - routes menu events through the slide-over for focus trapping,
//! - closes the panel with a swipe and collapses the menu afterwards.
//!
//! Run:
//! - `cargo run -p understory_demos --example mobile_drawer`

use kurbo::{Point, Rect};
use understory_focus::Key;
use understory_menu::{Layout, MenuTree, Registry, Settings as MenuSettings};
use understory_nav_tree::{Breakpoint, Element, NodeId, Role, Tree, Viewport};
use understory_off_canvas::{OffCanvasPanel, PanelEvent, Settings as PanelSettings};
use understory_slide_over::{Settings as SlideSettings, SlideOver};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tree = Tree::new();
    let page = tree.insert(None, Element::block());
    let toggle = tree.insert(Some(page), Element::button("Menu").with_role(Role::PanelToggle));
    let drawer = tree.insert(Some(page), Element::block().with_role(Role::PanelMenu));
    tree.insert(Some(page), Element::block().with_role(Role::PanelOverlay));

    let root = tree.insert(Some(drawer), Element::block());
    let list = tree.insert(
        Some(root),
        Element::list()
            .with_role(Role::MenuList)
            .with_bounds(Rect::new(0.0, 0.0, 280.0, 240.0)),
    );
    for name in ["Shop", "Help"] {
        let item = tree.insert(Some(list), Element::item());
        tree.insert(Some(item), Element::link(name, "/"));
        let sub = tree.insert(Some(item), Element::list());
        for child in ["New", "Popular", "Sale"] {
            let leaf = tree.insert(Some(sub), Element::item());
            tree.insert(Some(leaf), Element::link(child, "/"));
        }
    }

    let viewport = Viewport::new(390.0, 844.0);
    let menu_settings = MenuSettings {
        layout: Layout::SLIDE_OVER,
        breakpoint: Some(Breakpoint(992)),
        ..MenuSettings::default()
    };
    let mut registry = Registry::new();
    let built = MenuTree::build(&mut registry, &mut tree, root, menu_settings, viewport);
    let mut menu = match built {
        Ok(menu) => menu,
        Err(err) => {
            eprintln!("menu could not be built: {err}");
            return;
        }
    };
    let mut slide = SlideOver::install(
        &mut tree,
        &menu,
        SlideSettings {
            off_canvas_close_all_menus: true,
            ..SlideSettings::default()
        },
    );
    let panel_settings = PanelSettings {
        breakpoint: Some("992".into()),
        swipeable: true,
        ..PanelSettings::default()
    };
    let mut panel = match OffCanvasPanel::new(&tree, page, panel_settings) {
        Ok(panel) => panel,
        Err(err) => {
            eprintln!("panel could not be created: {err}");
            return;
        }
    };
    for helper in menu.nodes().iter().filter_map(|n| n.helper) {
        tree.set_bounds(helper, Rect::new(0.0, 0.0, 280.0, 180.0));
    }

    println!("\n== Open the drawer ==");
    let mut focused = panel.open(&tree, Some(toggle)).unwrap_or(toggle);
    panel.on_transition_end();
    println!("focus -> {focused:?}, inert={}", panel.is_inert(viewport));

    println!("\n== Slide into the first section ==");
    let first = menu.nodes()[0].toggle.expect("built nodes have toggles");
    menu.activate_toggle(&tree, first, viewport);
    let pane = menu.nodes()[0].pane;
    menu.on_transition_end(pane);
    focused = route(&mut menu, &mut slide, &tree, focused, viewport);
    println!(
        "focus -> {focused:?}, min-height={:?}",
        slide.root_min_height()
    );

    println!("\n== Tab wraps inside the drawer ==");
    let order = menu.tabbable_within(&tree, drawer);
    if let Some(&last) = order.last() {
        let tab = Key::Tab { shift: false };
        let response = panel.key_down_where(&tree, tab, last, |n| menu.is_rendered(&tree, n));
        println!("Tab from {last:?} -> {:?}", response.focus);
    }

    println!("\n== Swipe the drawer away ==");
    panel.pointer_down(Point::new(260.0, 300.0), viewport, 10_000);
    for x in [220.0, 160.0, 90.0] {
        if let Some(update) = panel.pointer_move(Point::new(x, 304.0), viewport) {
            println!(
                "  drag translate={:.0} overlay={:.2}",
                update.translate_x, update.overlay_opacity
            );
        }
    }
    if let Some((decision, restore)) = panel.pointer_up(viewport, 11_500) {
        println!("release -> {decision:?}, focus -> {restore:?}");
    }
    panel.on_transition_end();
    if let Some(deadline) = panel.next_deadline() {
        panel.poll(deadline);
    }
    for event in panel.take_events() {
        println!("  event {}", event.dom_name());
        if event == PanelEvent::Hidden && slide.settings().off_canvas_close_all_menus {
            slide.on_panel_hidden(&mut menu);
        }
    }
    println!(
        "showing panes after close: {}",
        menu.showing().count()
    );
}

fn route(
    menu: &mut MenuTree,
    slide: &mut SlideOver,
    tree: &Tree,
    mut focused: NodeId,
    viewport: Viewport,
) -> NodeId {
    for event in menu.take_events() {
        println!("  event {} on {:?}", event.kind.dom_name(), event.target);
        if let Some(next) = slide.on_menu_event(tree, &event, menu, Some(focused), viewport) {
            focused = next;
        }
    }
    focused
}
