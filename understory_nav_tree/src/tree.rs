// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::types::{Element, NodeFlags, NodeId, Role};

/// Element tree standing in for the DOM subtree a navigation component is bound to.
///
/// Nodes are stored in generational slots, so a [`NodeId`] for a removed node
/// never aliases a node inserted later. Children are ordered; document order is
/// the depth-first pre-order of the tree.
///
/// ## Example
///
/// ```rust
/// use understory_nav_tree::{Element, Role, Tree};
///
/// let mut tree = Tree::new();
/// let nav = tree.insert(None, Element::block());
/// let list = tree.insert(Some(nav), Element::list().with_role(Role::MenuList));
/// let item = tree.insert(Some(list), Element::item());
/// let link = tree.insert(Some(item), Element::link("Home", "/"));
///
/// assert_eq!(tree.closest(link, |e| e.role == Some(Role::MenuList)), Some(list));
/// assert_eq!(tree.tabbable_within(nav), vec![link]);
/// ```
#[derive(Clone, Default)]
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let id = self.alloc(element);
        if let Some(p) = parent {
            self.link_parent(id, p, None);
        }
        id
    }

    /// Insert a new element as a child of `parent` at position `index`.
    ///
    /// `index` is clamped to the number of children.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, element: Element) -> NodeId {
        let id = self.alloc(element);
        self.link_parent(id, parent, Some(index));
        id
    }

    /// Remove a node (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` at position `index` (or last when `None`).
    ///
    /// Moving a node into its own subtree is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId, index: Option<usize>) {
        if !self.is_alive(id) || !self.is_alive(new_parent) || self.contains(id, new_parent) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.link_parent(id, new_parent, index);
    }

    /// Insert `wrapper` where `id` currently sits and move `id` inside it.
    ///
    /// Returns the wrapper's id, or `None` if `id` is stale.
    pub fn wrap(&mut self, id: NodeId, wrapper: Element) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let wrapper_id = match self.node(id).parent {
            Some(parent) => {
                let pos = self.index_in_parent(id).unwrap_or(0);
                self.unlink_parent(id, parent);
                self.insert_at(parent, pos, wrapper)
            }
            None => self.insert(None, wrapper),
        };
        self.link_parent(id, wrapper_id, None);
        Some(wrapper_id)
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Mutable element data of a live node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_opt_mut(id).map(|n| &mut n.element)
    }

    /// Role of a live node.
    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.element(id).and_then(|e| e.role)
    }

    /// Update layout bounds.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.bounds = bounds;
        }
    }

    /// Layout bounds of a live node.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.element(id).map(|e| e.bounds)
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.flags = flags;
        }
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.element(id).map(|e| e.flags)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|node| node.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// Next element sibling, if any.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Previous element sibling, if any.
    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        if pos > 0 {
            siblings.get(pos - 1).copied()
        } else {
            None
        }
    }

    /// Iterate strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.parent_of(id), move |&p| self.parent_of(p))
    }

    /// Nearest inclusive ancestor whose element satisfies `pred`.
    pub fn closest(&self, id: NodeId, mut pred: impl FnMut(&Element) -> bool) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        core::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| pred(&self.node(n).element))
    }

    /// `true` if `node` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Iterate the strict descendants of `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = SmallVec::new();
        for &child in self.children_of(id).iter().rev() {
            stack.push(child);
        }
        Descendants { tree: self, stack }
    }

    /// First strict descendant of `id` (in document order) satisfying `pred`.
    pub fn find_within(
        &self,
        id: NodeId,
        mut pred: impl FnMut(&Element) -> bool,
    ) -> Option<NodeId> {
        self.descendants(id).find(|&n| pred(&self.node(n).element))
    }

    /// First direct child of `id` satisfying `pred`.
    pub fn child_where(
        &self,
        id: NodeId,
        mut pred: impl FnMut(&Element) -> bool,
    ) -> Option<NodeId> {
        self.children_of(id)
            .iter()
            .copied()
            .find(|&c| pred(&self.node(c).element))
    }

    /// `true` when the element can take sequential focus and every ancestor is visible.
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        element.is_tabbable()
            && self
                .ancestors(id)
                .all(|a| self.node(a).element.flags.contains(NodeFlags::VISIBLE))
    }

    /// Tabbable descendants of `scope` in document order.
    pub fn tabbable_within(&self, scope: NodeId) -> Vec<NodeId> {
        self.tabbable_within_where(scope, |_| true)
    }

    /// Tabbable descendants of `scope` accepted by `keep`, in document order.
    ///
    /// Controllers that hide content without clearing [`NodeFlags::VISIBLE`]
    /// use `keep` to drop it.
    pub fn tabbable_within_where(
        &self,
        scope: NodeId,
        mut keep: impl FnMut(NodeId) -> bool,
    ) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&n| self.is_tabbable(n) && keep(n))
            .collect()
    }

    /// Get the next node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }

        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }

        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Get the previous node in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous node exists or if the current node is stale.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }

        if let Some(prev_sibling) = self.prev_sibling(current) {
            return Some(self.last_in_subtree(prev_sibling));
        }

        self.parent_of(current)
    }

    fn last_in_subtree(&self, mut node: NodeId) -> NodeId {
        while let Some(&last_child) = self.node(node).children.last() {
            node = last_child;
        }
        node
    }

    // --- internals ---

    fn alloc(&mut self, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Access a live node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId, index: Option<usize>) {
        let parent_node = self.node_mut(parent);
        match index {
            Some(i) => {
                let i = i.min(parent_node.children.len());
                parent_node.children.insert(i, id);
            }
            None => parent_node.children.push(id),
        }
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

/// Document-order iterator over a subtree, returned by [`Tree::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: SmallVec<[NodeId; 16]>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        for &child in self.tree.children_of(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
