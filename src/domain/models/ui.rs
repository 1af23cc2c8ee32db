//! Immutable UI-tree snapshot model.
//!
//! The host application's rendered hierarchy is captured as a point-in-time
//! arena of nodes behind a narrow query interface. No ownership of host
//! nodes is implied; a `NodeId` is only meaningful against the snapshot it
//! came from.

use serde::{Deserialize, Serialize};

/// Opaque handle to a node within one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Screen-space rectangle of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Center point, used for coordinate-fallback taps.
    pub fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// One node of a captured UI tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiNode {
    /// Visible text, if any.
    #[serde(default)]
    pub text: Option<String>,

    /// Accessibility description, if any.
    #[serde(default)]
    pub description: Option<String>,

    /// Widget class name as reported by the host toolkit.
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub clickable: bool,

    #[serde(default)]
    pub scrollable: bool,

    #[serde(default)]
    pub bounds: Bounds,

    /// Indexes of child nodes within the owning snapshot.
    #[serde(default)]
    pub children: Vec<usize>,
}

/// A point-in-time, read-only view of the host UI hierarchy.
///
/// Nodes live in an arena with the root at index 0. Traversal order is
/// depth-first preorder following each node's child order; no visual
/// ordering is guaranteed beyond that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub nodes: Vec<UiNode>,
}

impl UiSnapshot {
    pub fn new(nodes: Vec<UiNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.get(id.0)
    }

    /// Direct children of a node, in child order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| n.children.iter().map(|&i| NodeId(i)).collect())
            .unwrap_or_default()
    }

    /// Depth-first preorder traversal from the root.
    pub fn dfs(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root() else {
            return order;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.node(id) {
                for &child in node.children.iter().rev() {
                    if child < self.nodes.len() {
                        stack.push(NodeId(child));
                    }
                }
            }
        }
        order
    }

    /// First node (traversal order) whose text contains `needle`,
    /// case-insensitively.
    pub fn find_by_text(&self, needle: &str) -> Option<NodeId> {
        self.find_matching(needle, |node| node.text.as_deref())
    }

    /// First node (traversal order) whose description contains `needle`,
    /// case-insensitively.
    pub fn find_by_description(&self, needle: &str) -> Option<NodeId> {
        self.find_matching(needle, |node| node.description.as_deref())
    }

    /// Whether any node's text contains `needle`, case-insensitively.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.find_by_text(needle).is_some()
    }

    /// Nearest clickable node walking up from `id`, including `id` itself.
    pub fn clickable_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(cursor) = current {
            if self.node(cursor)?.clickable {
                return Some(cursor);
            }
            current = self.parent(cursor);
        }
        None
    }

    /// Parent of a node. Linear scan over the arena; snapshots are small.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.children.contains(&id.0))
            .map(NodeId)
    }

    /// All text values within the subtree rooted at `id`, preorder.
    pub fn subtree_texts(&self, id: NodeId) -> Vec<&str> {
        let mut texts = Vec::new();
        let mut stack = vec![id];
        while let Some(cursor) = stack.pop() {
            if let Some(node) = self.node(cursor) {
                if let Some(text) = node.text.as_deref() {
                    texts.push(text);
                }
                for &child in node.children.iter().rev() {
                    if child < self.nodes.len() {
                        stack.push(NodeId(child));
                    }
                }
            }
        }
        texts
    }

    fn find_matching<'a>(
        &'a self,
        needle: &str,
        field: impl Fn(&'a UiNode) -> Option<&'a str>,
    ) -> Option<NodeId> {
        let needle = needle.to_lowercase();
        self.dfs().into_iter().find(|&id| {
            self.node(id)
                .and_then(&field)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        })
    }
}
