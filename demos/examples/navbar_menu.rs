// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Desktop navbar menu driven by clicks, hover intent and the keyboard.
//!
//! Shows how a host:
//! - builds a menu from an authored tree,
//! - forwards toggle clicks and pointer hover,
//! - runs timers from `poll` using `next_deadline`,
//! - renders item classes and dispatches the queued events.
//!
//! Run:
//! - `cargo run -p understory_demos --example navbar_menu`

use kurbo::{Point, Rect};
use understory_focus::Key;
use understory_menu::{Layout, MenuTree, Registry, Settings};
use understory_nav_tree::{Breakpoint, Element, Role, Tree, Viewport};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tree = Tree::new();
    let root = tree.insert(None, Element::block());
    let list = tree.insert(Some(root), Element::list().with_role(Role::MenuList));
    for (i, name) in ["Products", "Solutions", "Company"].into_iter().enumerate() {
        let x = 120.0 * i as f64;
        let item = tree.insert(
            Some(list),
            Element::item().with_bounds(Rect::new(x, 0.0, x + 120.0, 48.0)),
        );
        tree.insert(Some(item), Element::link(name, format!("/{}", name.to_lowercase())));
        let sub = tree.insert(Some(item), Element::list());
        for child in ["Overview", "Pricing"] {
            let leaf = tree.insert(Some(sub), Element::item());
            tree.insert(Some(leaf), Element::link(child, "/"));
        }
    }

    let viewport = Viewport::new(1280.0, 800.0);
    let settings = Settings {
        layout: Layout::NAVBAR,
        breakpoint: Some(Breakpoint(992)),
        hover_intent: true,
        navbar_menu_backdrop: true,
        ..Settings::default()
    };
    let mut registry = Registry::new();
    let mut menu = match MenuTree::build(&mut registry, &mut tree, root, settings, viewport) {
        Ok(menu) => menu,
        Err(err) => {
            eprintln!("menu could not be built: {err}");
            return;
        }
    };
    dispatch(&mut menu);

    println!("\n== Click the first toggle ==");
    let first = menu.nodes()[0].toggle.expect("built nodes have toggles");
    menu.activate_toggle(&tree, first, viewport);
    let pane = menu.nodes()[0].pane;
    menu.on_transition_end(pane);
    render(&menu, &tree);
    dispatch(&mut menu);

    println!("\n== Hover the second item ==");
    let second = menu.nodes()[1].item;
    menu.pointer_enter(&tree, second, Point::new(130.0, 10.0), viewport, 0);
    menu.pointer_move(&tree, second, Point::new(132.0, 12.0));
    let mut now = 0;
    while let Some(deadline) = menu.next_deadline() {
        now = deadline;
        menu.poll(&tree, viewport, now);
        if menu.nodes()[1].is_showing() {
            break;
        }
    }
    render(&menu, &tree);
    dispatch(&mut menu);

    println!("\n== Escape from inside the open pane (t={now}) ==");
    let inner = menu
        .tabbable_within(&tree, menu.nodes()[1].pane)
        .first()
        .copied()
        .unwrap_or(second);
    let response = menu.key_down(&tree, inner, Key::Escape);
    println!("focus -> {:?}", response.focus);
    render(&menu, &tree);
    dispatch(&mut menu);
}

fn render(menu: &MenuTree, tree: &Tree) {
    for node in menu.nodes() {
        let name = node
            .link
            .and_then(|l| tree.element(l))
            .map_or("?", |e| e.text.as_str());
        let classes: Vec<_> = menu
            .item_classes(node.item)
            .map(|c| c.class_names().collect())
            .unwrap_or_default();
        println!(
            "  {name:<10} {:?} classes={classes:?} aria-expanded={}",
            node.state(),
            node.toggle_attributes().aria_expanded
        );
    }
    let backdrop: Vec<_> = menu.backdrop().class_names().collect();
    println!("  body classes: {backdrop:?}");
}

fn dispatch(menu: &mut MenuTree) {
    for event in menu.take_events() {
        println!("  event {} on {:?}", event.kind.dom_name(), event.target);
    }
}

