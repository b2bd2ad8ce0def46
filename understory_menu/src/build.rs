// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning author markup into a menu.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};
use understory_event_state::queue::EventQueue;
use understory_event_state::tap::TapState;
use understory_nav_tree::{Element, ElementKind, NodeId, Role, Tree, Viewport};

use crate::events::{Backdrop, MenuEvent, MenuEventKind};
use crate::expander::Expander;
use crate::node::MenuNode;
use crate::registry::Registry;
use crate::settings::Settings;
use crate::{MenuTree, RootClasses};

/// Why a menu could not be built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The root id does not refer to a live node.
    #[error("menu root {0:?} is not a live node")]
    StaleRoot(NodeId),
    /// The root contains no element with [`Role::MenuList`].
    #[error("no menu list below the root")]
    MissingList,
}

fn has_role(role: Role) -> impl Fn(&Element) -> bool {
    move |e: &Element| e.role == Some(role)
}

fn nearest_item(tree: &Tree, id: NodeId) -> Option<NodeId> {
    tree.ancestors(id)
        .find(|&a| tree.element(a).is_some_and(|e| e.kind == ElementKind::Item))
}

fn in_mega_menu(tree: &Tree, id: NodeId, list: NodeId) -> bool {
    tree.ancestors(id)
        .take_while(|&a| a != list)
        .any(|a| tree.role(a) == Some(Role::MegaMenu))
}

impl MenuTree {
    /// Build a menu below `root`.
    ///
    /// Rewrites the tree as described in the crate docs, then applies the
    /// on-load behavior for `viewport`: expanding active items, syncing the
    /// expander and assigning flow directions. Queues
    /// [`MenuEventKind::Initialized`].
    pub fn build(
        registry: &mut Registry,
        tree: &mut Tree,
        root: NodeId,
        settings: Settings,
        viewport: Viewport,
    ) -> Result<Self, BuildError> {
        if !tree.is_alive(root) {
            tracing::warn!(message = "menu.build_failed", ?root, reason = "stale root");
            return Err(BuildError::StaleRoot(root));
        }
        let Some(list) = tree.find_within(root, has_role(Role::MenuList)) else {
            tracing::warn!(message = "menu.build_failed", ?root, reason = "missing list");
            return Err(BuildError::MissingList);
        };
        let instance = registry.next_instance();

        let expander = build_expander(tree, root, instance);
        let levels = assign_levels(tree, list);
        let mega_items = wrap_mega_menus(tree, list);
        wrap_child_lists(tree, list, &levels, settings.exclude_level);
        add_toggles(tree, list, &settings.toggle_label_prefix);

        let mut nodes = Vec::new();
        let mut by_item = HashMap::new();
        let collapses: Vec<NodeId> = tree
            .descendants(list)
            .filter(|&n| tree.role(n) == Some(Role::Collapse))
            .collect();
        for (i, collapse) in collapses.into_iter().enumerate() {
            let pane_id = format!("mln{instance}ChildCollapse{}", i + 1);
            if let Some(el) = tree.element_mut(collapse) {
                el.id = Some(pane_id.clone());
            }
            let Some(item) = nearest_item(tree, collapse) else {
                continue;
            };
            if by_item.contains_key(&item) {
                continue;
            }
            let helper = tree.child_where(collapse, has_role(Role::CollapseHelper));
            let mut node = MenuNode::new(item, collapse, helper, pane_id);
            node.link = tree
                .child_where(item, has_role(Role::ChildControls))
                .and_then(|c| tree.child_where(c, |e| e.kind == ElementKind::Link));
            node.toggle = tree.find_within(item, has_role(Role::ToggleButton));
            node.level = levels.get(&item).copied().unwrap_or(0);
            node.mega = mega_items.contains(&item);
            by_item.insert(item, nodes.len());
            nodes.push(node);
        }

        let mut root_classes = RootClasses::LOADED;
        if settings.whole_link_toggler || settings.top_level_whole_link_toggler {
            let links: Vec<(usize, NodeId)> = if settings.top_level_whole_link_toggler {
                root_classes |= RootClasses::TOP_LEVEL_WHOLE_LINK_EXPAND;
                tree.children_of(list)
                    .iter()
                    .filter_map(|c| by_item.get(c).copied())
                    .filter_map(|i| Some((i, nodes[i].link?)))
                    .collect()
            } else {
                root_classes |= RootClasses::WHOLE_LINK_EXPAND;
                nodes
                    .iter()
                    .enumerate()
                    .filter_map(|(i, n)| Some((i, n.link?)))
                    .collect()
            };
            for (idx, link) in links {
                let Some(button) = nodes[idx].toggle else {
                    continue;
                };
                tree.insert(
                    Some(link),
                    Element::new(ElementKind::Text).with_role(Role::ToggleIndicator),
                );
                if let Some(el) = tree.element_mut(link) {
                    el.role = Some(Role::ToggleLink);
                }
                tree.remove(button);
                nodes[idx].toggle = Some(link);
                nodes[idx].toggle_is_link = true;
            }
        }

        let mut menu = Self {
            instance,
            settings,
            root,
            list,
            nodes,
            by_item,
            levels,
            expander,
            root_classes,
            backdrop: Backdrop::empty(),
            loaded: false,
            tap: TapState::new(),
            hover: HashMap::new(),
            focused: None,
            focus_check: None,
            events: EventQueue::new(),
        };
        menu.expand_active_item(tree, viewport);
        menu.sync_expander(viewport);
        menu.assign_flow_direction(tree, viewport);
        menu.events.push(MenuEvent {
            kind: MenuEventKind::Initialized,
            target: root,
        });
        tracing::debug!(
            message = "menu.initialized",
            instance,
            nodes = menu.nodes.len(),
            expander = menu.expander.is_some()
        );
        Ok(menu)
    }
}

fn build_expander(tree: &mut Tree, root: NodeId, instance: u32) -> Option<Expander> {
    let element = tree.find_within(root, has_role(Role::Expander))?;
    let children: Vec<NodeId> = tree.children_of(element).to_vec();
    let helper = tree.insert(
        Some(element),
        Element::block().with_role(Role::ExpanderHelper),
    );
    for child in children {
        tree.reparent(child, helper, None);
    }
    let id = format!("mln{instance}Expander1");
    if let Some(el) = tree.element_mut(element) {
        el.id = Some(id.clone());
    }
    let button = tree.find_within(root, has_role(Role::ExpandButton));
    Some(Expander::new(element, helper, button, id))
}

/// Level of every item outside mega menus: one more than its item ancestors below the list.
fn assign_levels(tree: &Tree, list: NodeId) -> HashMap<NodeId, usize> {
    tree.descendants(list)
        .filter(|&n| tree.element(n).is_some_and(|e| e.kind == ElementKind::Item))
        .filter(|&n| !in_mega_menu(tree, n, list))
        .map(|n| {
            let depth = tree
                .ancestors(n)
                .take_while(|&a| a != list)
                .filter(|&a| tree.element(a).is_some_and(|e| e.kind == ElementKind::Item))
                .count();
            (n, depth + 1)
        })
        .collect()
}

/// Wrap each mega menu in a pane; returns the items owning one.
fn wrap_mega_menus(tree: &mut Tree, list: NodeId) -> HashSet<NodeId> {
    let megas: Vec<NodeId> = tree
        .descendants(list)
        .filter(|&n| tree.role(n) == Some(Role::MegaMenu))
        .collect();
    let mut items = HashSet::new();
    for mega in megas {
        if let Some(collapse) = wrap_in_pane(tree, mega) {
            items.extend(nearest_item(tree, collapse));
        }
    }
    items
}

fn wrap_in_pane(tree: &mut Tree, id: NodeId) -> Option<NodeId> {
    let helper = tree.wrap(id, Element::block().with_role(Role::CollapseHelper))?;
    tree.wrap(
        helper,
        Element::block()
            .with_role(Role::Collapse)
            .with_tab_index(-1),
    )
}

/// A list is excluded when it sits, directly or nested, in the child list of an
/// item at `exclude_level`.
fn is_excluded(
    tree: &Tree,
    list: NodeId,
    levels: &HashMap<NodeId, usize>,
    exclude_level: Option<usize>,
) -> bool {
    let Some(level) = exclude_level else {
        return false;
    };
    let mut below = list;
    for ancestor in tree.ancestors(list) {
        let child_is_list = tree
            .element(below)
            .is_some_and(|e| e.kind == ElementKind::List);
        if child_is_list && levels.get(&ancestor) == Some(&level) {
            return true;
        }
        below = ancestor;
    }
    false
}

fn wrap_child_lists(
    tree: &mut Tree,
    list: NodeId,
    levels: &HashMap<NodeId, usize>,
    exclude_level: Option<usize>,
) {
    let lists: Vec<NodeId> = tree
        .descendants(list)
        .filter(|&n| tree.element(n).is_some_and(|e| e.kind == ElementKind::List))
        .filter(|&n| !is_excluded(tree, n, levels, exclude_level))
        .collect();
    for child_list in lists {
        let Some(parent) = tree.parent_of(child_list) else {
            continue;
        };
        if tree.find_within(parent, has_role(Role::Collapse)).is_some() {
            // The item already owns a pane (a mega menu or an earlier list): join it.
            if let Some(helper) = tree.find_within(parent, has_role(Role::CollapseHelper)) {
                tree.reparent(child_list, helper, Some(0));
            }
        } else if !in_mega_menu(tree, child_list, list) {
            wrap_in_pane(tree, child_list);
        }
    }
}

/// Wrap section links in child controls and append a toggle button to each.
fn add_toggles(tree: &mut Tree, list: NodeId, prefix: &str) {
    let items: Vec<NodeId> = tree
        .descendants(list)
        .filter(|&n| tree.role(n) == Some(Role::Collapse))
        .filter_map(|c| nearest_item(tree, c))
        .collect();
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            continue;
        }
        let Some(link) = tree.child_where(item, |e| e.kind == ElementKind::Link) else {
            continue;
        };
        let Some(controls) = tree.wrap(link, Element::block().with_role(Role::ChildControls))
        else {
            continue;
        };
        let text = tree.element(link).map(|e| e.text.trim()).unwrap_or_default();
        let label: String = format!("{prefix} {text}");
        tree.insert(
            Some(controls),
            Element::button(label).with_role(Role::ToggleButton),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Root > List > [Item(Home), Item(About > List > Item(Team > List > Item(Alumni)))]
    fn sample(tree: &mut Tree) -> (NodeId, NodeId, NodeId, NodeId) {
        let root = tree.insert(None, Element::block());
        let list = tree.insert(Some(root), Element::list().with_role(Role::MenuList));
        let home = tree.insert(Some(list), Element::item());
        tree.insert(Some(home), Element::link("Home", "/"));
        let about = tree.insert(Some(list), Element::item());
        tree.insert(Some(about), Element::link(" About ", "/about"));
        let sub = tree.insert(Some(about), Element::list());
        let team = tree.insert(Some(sub), Element::item());
        tree.insert(Some(team), Element::link("Team", "/team"));
        let subsub = tree.insert(Some(team), Element::list());
        let alumni = tree.insert(Some(subsub), Element::item());
        tree.insert(Some(alumni), Element::link("Alumni", "/alumni"));
        (root, about, team, alumni)
    }

    fn build(tree: &mut Tree, root: NodeId, settings: Settings) -> MenuTree {
        MenuTree::build(
            &mut Registry::new(),
            tree,
            root,
            settings,
            Viewport::new(1024.0, 768.0),
        )
        .unwrap()
    }

    #[test]
    fn missing_list_is_an_error() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::block());
        let err = MenuTree::build(
            &mut Registry::new(),
            &mut tree,
            root,
            Settings::default(),
            Viewport::default(),
        )
        .unwrap_err();
        assert_eq!(err, BuildError::MissingList);
    }

    #[test]
    fn nested_lists_become_panes() {
        let mut tree = Tree::new();
        let (root, about, team, alumni) = sample(&mut tree);
        let menu = build(&mut tree, root, Settings::default());

        assert_eq!(menu.nodes().len(), 2);
        assert_eq!(menu.nodes()[0].item, about);
        assert_eq!(menu.nodes()[1].item, team);
        assert_eq!(menu.nodes()[0].pane_id, "mln1ChildCollapse1");
        assert_eq!(menu.nodes()[1].pane_id, "mln1ChildCollapse2");
        assert_eq!(menu.item_level(about), Some(1));
        assert_eq!(menu.item_level(team), Some(2));
        assert_eq!(menu.item_level(alumni), Some(3));

        let pane = menu.nodes()[0].pane;
        let el = tree.element(pane).unwrap();
        assert_eq!(el.role, Some(Role::Collapse));
        assert_eq!(el.tab_index, Some(-1));
        assert_eq!(el.id.as_deref(), Some("mln1ChildCollapse1"));
        assert_eq!(tree.parent_of(pane), Some(about));
        assert_eq!(
            tree.role(tree.children_of(pane)[0]),
            Some(Role::CollapseHelper)
        );

        let toggle = menu.nodes()[0].toggle.unwrap();
        assert_eq!(tree.element(toggle).unwrap().text, "Toggle items under About");
        let controls = tree.parent_of(toggle).unwrap();
        assert_eq!(tree.role(controls), Some(Role::ChildControls));
        assert_eq!(tree.children_of(controls)[0], menu.nodes()[0].link.unwrap());
        assert!(menu.root_classes().contains(RootClasses::LOADED));
    }

    #[test]
    fn excluded_level_keeps_lists_inline() {
        let mut tree = Tree::new();
        let (root, about, _, _) = sample(&mut tree);
        let menu = build(
            &mut tree,
            root,
            Settings {
                exclude_level: Some(1),
                ..Settings::default()
            },
        );
        assert!(menu.nodes().is_empty());
        assert!(menu.node_by_item(about).is_none());
    }

    #[test]
    fn mega_menu_gets_a_pane() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::block());
        let list = tree.insert(Some(root), Element::list().with_role(Role::MenuList));
        let item = tree.insert(Some(list), Element::item());
        tree.insert(Some(item), Element::link("Shop", "/shop"));
        let mega = tree.insert(Some(item), Element::block().with_role(Role::MegaMenu));
        let inner = tree.insert(Some(mega), Element::list());
        let inner_item = tree.insert(Some(inner), Element::item());

        let menu = build(&mut tree, root, Settings::default());
        assert_eq!(menu.nodes().len(), 1);
        assert!(menu.nodes()[0].mega);
        assert_eq!(menu.item_level(inner_item), None);
        let helper = tree.parent_of(mega).unwrap();
        assert_eq!(tree.role(helper), Some(Role::CollapseHelper));
        assert_eq!(tree.parent_of(inner), Some(mega), "lists in mega menus stay put");
    }

    #[test]
    fn whole_link_toggler_replaces_buttons() {
        let mut tree = Tree::new();
        let (root, ..) = sample(&mut tree);
        let menu = build(
            &mut tree,
            root,
            Settings {
                whole_link_toggler: true,
                ..Settings::default()
            },
        );
        for node in menu.nodes() {
            assert!(node.toggle_is_link);
            assert_eq!(node.toggle, node.link);
            let link = node.link.unwrap();
            assert_eq!(tree.role(link), Some(Role::ToggleLink));
            assert!(node.toggle_attributes().role_button);
            assert_eq!(
                tree.children_of(link)
                    .iter()
                    .map(|&c| tree.role(c))
                    .collect::<Vec<_>>(),
                vec![Some(Role::ToggleIndicator)]
            );
        }
        assert!(
            tree.find_within(root, |e| e.role == Some(Role::ToggleButton))
                .is_none()
        );
        assert!(menu.root_classes().contains(RootClasses::WHOLE_LINK_EXPAND));
    }

    #[test]
    fn top_level_whole_link_toggler_only_converts_top_level() {
        let mut tree = Tree::new();
        let (root, ..) = sample(&mut tree);
        let menu = build(
            &mut tree,
            root,
            Settings {
                whole_link_toggler: true,
                top_level_whole_link_toggler: true,
                ..Settings::default()
            },
        );
        assert!(menu.nodes()[0].toggle_is_link);
        assert!(!menu.nodes()[1].toggle_is_link);
        assert_eq!(
            menu.root_classes(),
            RootClasses::LOADED | RootClasses::TOP_LEVEL_WHOLE_LINK_EXPAND
        );
    }

    #[test]
    fn expander_gets_helper_and_id() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::block());
        let button = tree.insert(Some(root), Element::button("Menu").with_role(Role::ExpandButton));
        let expander = tree.insert(Some(root), Element::block().with_role(Role::Expander));
        let list = tree.insert(Some(expander), Element::list().with_role(Role::MenuList));

        let mut registry = Registry::new();
        registry.next_instance();
        let menu = MenuTree::build(
            &mut registry,
            &mut tree,
            root,
            Settings::default(),
            Viewport::default(),
        )
        .unwrap();
        let exp = menu.expander().unwrap();
        assert_eq!(exp.id, "mln2Expander1");
        assert_eq!(exp.button, Some(button));
        assert_eq!(tree.parent_of(list), Some(exp.helper));
        assert_eq!(tree.parent_of(exp.helper), Some(expander));
    }
}
