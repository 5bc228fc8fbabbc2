use generational_arena::{Arena, Index};
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};

/// One exported attribute of a node, as shown by [`DocumentTree::dump`].
///
/// Named entries render as `key=value` (just `key=` when the value is
/// empty), positional entries render as the bare value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub key: Option<String>,
    pub value: String,
}

impl ExportEntry {
    pub fn named(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }

    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            key: None,
            value: value.into(),
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if let Some(key) = &self.key {
            out.push_str(key);
            out.push('=');
        }
        out.push_str(&self.value);
        out
    }
}

/// Payload stored on every tree node.
///
/// `label` is the kind tag shown in brackets by [`DocumentTree::dump`].
/// `export` exposes the payload's semantic attributes for dumping;
/// the default implementation exports nothing.
pub trait NodeData {
    fn label(&self) -> &'static str;

    fn export(&self) -> Vec<ExportEntry> {
        Vec::new()
    }
}

/// Tree node in the arena-based document structure.
///
/// Parent and child links are private: they are mutated exclusively
/// through [`DocumentTree`] operations, which keep both edge directions
/// in agreement.
#[derive(Debug)]
pub struct Node<D> {
    /// Payload of this node
    pub data: D,
    /// Index of the parent node in the arena, None for detached/root nodes
    parent: Option<Index>,
    /// Indices of child nodes in the arena, in document order
    children: Vec<Index>,
}

impl<D> Node<D> {
    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena-based document tree.
///
/// Uses a generational arena for memory-safe node references and O(1)
/// lookups. Nodes are created detached and wired up through the attach
/// operations, so a single tree value may hold several independent
/// subtrees (e.g. a document plus not-yet-inserted fragments).
#[derive(Debug)]
pub struct DocumentTree<D> {
    arena: Arena<Node<D>>,
}

impl<D> Default for DocumentTree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DocumentTree<D> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    /// Creates a detached node (no parent, no children).
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert(&mut self, data: D) -> Index {
        self.arena.insert(Node {
            data,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Creates a node and appends it under `parent` when one is given.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: D, parent: Option<Index>) -> TreeResult<Index> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let idx = self.insert(data);
        if let Some(parent) = parent {
            self.append_child(parent, idx)?;
        }
        Ok(idx)
    }

    pub fn get(&self, idx: Index) -> Option<&Node<D>> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut Node<D>> {
        self.arena.get_mut(idx)
    }

    fn node(&self, idx: Index) -> TreeResult<&Node<D>> {
        self.arena.get(idx).ok_or(TreeError::StaleNode(idx))
    }

    fn node_mut(&mut self, idx: Index) -> TreeResult<&mut Node<D>> {
        self.arena.get_mut(idx).ok_or(TreeError::StaleNode(idx))
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.parent)
    }

    pub fn has_parent(&self, idx: Index) -> bool {
        self.parent(idx).is_some()
    }

    /// Follows parent links up to the node without a parent.
    ///
    /// Terminates because the attach operations reject cycles.
    pub fn root_of(&self, idx: Index) -> TreeResult<Index> {
        let mut current = idx;
        loop {
            match self.node(current)?.parent {
                Some(parent) => current = parent,
                None => return Ok(current),
            }
        }
    }

    /// Child indices of `idx` in document order. Empty for stale indices.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_children(&self, idx: Index) -> bool {
        !self.children(idx).is_empty()
    }

    pub fn child_count(&self, idx: Index) -> usize {
        self.children(idx).len()
    }

    /// Identity-based membership test.
    pub fn has_child(&self, parent: Index, child: Index) -> bool {
        self.children(parent).contains(&child)
    }

    pub fn index_of(&self, parent: Index, child: Index) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    fn is_self_or_ancestor(&self, candidate: Index, node: Index) -> bool {
        let mut current = Some(node);
        while let Some(idx) = current {
            if idx == candidate {
                return true;
            }
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        false
    }

    fn check_attach(&self, parent: Index, child: Index) -> TreeResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_self_or_ancestor(child, parent) {
            return Err(TreeError::WouldCycle { parent, child });
        }
        Ok(())
    }

    fn detach_from_parent(&mut self, child: Index) {
        let parent = self.arena.get(child).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent) {
                parent_node.children.retain(|&c| c != child);
            }
        }
    }

    fn insert_child_at(
        &mut self,
        parent: Index,
        child: Index,
        position: Option<usize>,
    ) -> TreeResult<()> {
        self.check_attach(parent, child)?;
        self.detach_from_parent(child);
        if let Some(parent_node) = self.arena.get_mut(parent) {
            let len = parent_node.children.len();
            let at = position.unwrap_or(len).min(len);
            parent_node.children.insert(at, child);
        }
        // The child list above already records the new edge; the
        // back-reference is set directly, without re-entering insertion.
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// Makes `parent` the parent of `child`, appending `child` to
    /// `parent`'s children unless it is already listed there.
    ///
    /// Idempotent when the node is already correctly parented. A child
    /// attached elsewhere is detached from its previous parent first.
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, child: Index, parent: Index) -> TreeResult<()> {
        self.check_attach(parent, child)?;
        if self.has_child(parent, child) {
            if let Some(child_node) = self.arena.get_mut(child) {
                child_node.parent = Some(parent);
            }
            return Ok(());
        }
        self.insert_child_at(parent, child, None)
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// A child already listed under `parent` is moved to the end rather
    /// than duplicated.
    #[instrument(level = "trace", skip(self))]
    pub fn append_child(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        self.insert_child_at(parent, child, None)
    }

    /// Prepends `child` as the first child of `parent`.
    ///
    /// A child already listed under `parent` is moved to the start rather
    /// than duplicated.
    #[instrument(level = "trace", skip(self))]
    pub fn prepend_child(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        self.insert_child_at(parent, child, Some(0))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn append_children(&mut self, parent: Index, children: &[Index]) -> TreeResult<()> {
        for &child in children {
            self.insert_child_at(parent, child, None)?;
        }
        Ok(())
    }

    /// Inserts the batch at the front of `parent`'s children, keeping the
    /// slice's relative order in the final child sequence.
    #[instrument(level = "trace", skip(self))]
    pub fn prepend_children(&mut self, parent: Index, children: &[Index]) -> TreeResult<()> {
        for (slot, &child) in children.iter().enumerate() {
            self.insert_child_at(parent, child, Some(slot))?;
        }
        Ok(())
    }

    /// Replaces the children of `parent`: detaches all current children,
    /// then appends the new list.
    #[instrument(level = "trace", skip(self))]
    pub fn set_children(&mut self, parent: Index, children: &[Index]) -> TreeResult<()> {
        self.remove_children(parent)?;
        self.append_children(parent, children)
    }

    /// Detaches every child of `parent`, clearing each child's parent link.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_children(&mut self, parent: Index) -> TreeResult<()> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for child in children {
            if let Some(child_node) = self.arena.get_mut(child) {
                child_node.parent = None;
            }
        }
        Ok(())
    }

    /// Removes `child` from `parent`'s children. No-op if it is not
    /// listed there. Removal clears the child's parent link so both edge
    /// directions stay in sync.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        let parent_node = self.node_mut(parent)?;
        let Some(position) = parent_node.children.iter().position(|&c| c == child) else {
            return Ok(());
        };
        parent_node.children.remove(position);
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = None;
        }
        Ok(())
    }

    /// Detaches `idx` from its parent and deletes its whole subtree from
    /// the arena. Indices into the removed subtree become stale.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, idx: Index) -> TreeResult<()> {
        self.node(idx)?;
        self.detach_from_parent(idx);
        let subtree: Vec<Index> = self.iter_postorder_from(idx).map(|(i, _)| i).collect();
        for node in subtree {
            self.arena.remove(node);
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_from(&self, start: Index) -> TreeIter<'_, D> {
        TreeIter::new(self, start)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder_from(&self, start: Index) -> PostOrderIter<'_, D> {
        PostOrderIter::new(self, start)
    }

    /// Height of the subtree rooted at `idx`; 0 for stale indices.
    #[instrument(level = "trace", skip(self))]
    pub fn depth_of(&self, idx: Index) -> usize {
        if let Some(node) = self.arena.get(idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.depth_of(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

impl<D: NodeData> DocumentTree<D> {
    /// Renders the subtree at `idx` as indented diagnostic text.
    ///
    /// Each node becomes one line: four spaces of indentation per level,
    /// then the bracketed kind label and the node's exported attributes,
    /// then a newline. Children follow recursively, one level deeper.
    ///
    /// The output is one-way: it is not a parseable representation of the
    /// tree and nothing may rely on reconstructing a tree from it.
    #[instrument(level = "debug", skip(self))]
    pub fn dump(&self, idx: Index) -> TreeResult<String> {
        let mut out = String::new();
        self.dump_level(idx, 0, &mut out)?;
        Ok(out)
    }

    fn dump_level(&self, idx: Index, level: usize, out: &mut String) -> TreeResult<()> {
        let node = self.node(idx)?;
        out.push_str(&"    ".repeat(level));
        out.push('[');
        out.push_str(node.data.label());
        let exports = export_text(&node.data.export());
        if !exports.is_empty() {
            out.push(' ');
            out.push_str(&exports);
        }
        out.push_str("]\n");
        for &child in &node.children {
            self.dump_level(child, level + 1, out)?;
        }
        Ok(())
    }

    /// Box-drawing rendering of the subtree at `idx`, for terminal output.
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree_string(&self, idx: Index) -> TreeResult<Tree<String>> {
        let node = self.node(idx)?;
        let mut label = node.data.label().to_string();
        let exports = export_text(&node.data.export());
        if !exports.is_empty() {
            label.push(' ');
            label.push_str(&exports);
        }
        let leaves = node
            .children
            .iter()
            .map(|&child| self.to_tree_string(child))
            .collect::<TreeResult<Vec<_>>>()?;
        Ok(Tree::new(label).with_leaves(leaves))
    }
}

fn export_text(entries: &[ExportEntry]) -> String {
    entries.iter().map(ExportEntry::render).join(" ")
}

pub struct TreeIter<'a, D> {
    tree: &'a DocumentTree<D>,
    stack: Vec<Index>,
}

impl<'a, D> TreeIter<'a, D> {
    fn new(tree: &'a DocumentTree<D>, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a, D> Iterator for TreeIter<'a, D> {
    type Item = (Index, &'a Node<D>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIter<'a, D> {
    tree: &'a DocumentTree<D>,
    stack: Vec<(Index, bool)>,
}

impl<'a, D> PostOrderIter<'a, D> {
    fn new(tree: &'a DocumentTree<D>, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push((start, false));
        }
        Self { tree, stack }
    }
}

impl<'a, D> Iterator for PostOrderIter<'a, D> {
    type Item = (Index, &'a Node<D>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}
