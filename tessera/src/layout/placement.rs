//! The placement tree produced by a layout pass.
//!
//! Every node visited by the pass appears once per occurrence (a shared
//! subtree placed twice appears twice) in pre-order, with its rectangle in
//! the root's coordinate space. Identity is positional: the path of child
//! indices from the root. An explicit id rides along the positional key and
//! never replaces it, so a host can diff two passes either way.

use indexmap::IndexMap;
use serde::Serialize;

use crate::primitives::{Point, Rect};

use super::arrange::{Pass, SizingEnv};
use super::context::LayoutContext;
use super::proposal::ProposedSize;
use super::tree::{NodeId, NodeKind};

/// Stable identity of a placed node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey {
    /// Child indices from the root; the root's path is empty.
    pub path: Vec<usize>,
    pub explicit: Option<String>,
}

impl NodeKey {
    pub fn root(explicit: Option<String>) -> Self {
        Self { path: Vec::new(), explicit }
    }

    pub fn child(&self, index: usize, explicit: Option<String>) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(index);
        Self { path, explicit }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// A node with its resolved rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub key: NodeKey,
    pub node: NodeId,
    pub kind: &'static str,
    /// Frame in root coordinates.
    pub rect: Rect,
    /// The proposal the node was sized for.
    pub proposal: ProposedSize,
    /// Index of the parent in the placement tree.
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Pre-order list of placed nodes with lookup indexes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlacementTree {
    nodes: Vec<PlacedNode>,
    #[serde(skip)]
    by_path: IndexMap<Vec<usize>, usize>,
    #[serde(skip)]
    by_explicit: IndexMap<String, usize>,
}

impl PlacementTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&PlacedNode> {
        self.nodes.first()
    }

    pub fn get(&self, index: usize) -> Option<&PlacedNode> {
        self.nodes.get(index)
    }

    /// All placed nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter()
    }

    pub fn by_path(&self, path: &[usize]) -> Option<&PlacedNode> {
        self.by_path.get(path).map(|&index| &self.nodes[index])
    }

    /// First placed node carrying `id` (duplicates are logged when placed).
    pub fn by_explicit_id(&self, id: &str) -> Option<&PlacedNode> {
        self.by_explicit.get(id).map(|&index| &self.nodes[index])
    }

    /// Rectangle of the first occurrence of `node`.
    pub fn rect_of(&self, node: NodeId) -> Option<Rect> {
        self.find(node).map(|placed| placed.rect)
    }

    pub fn find(&self, node: NodeId) -> Option<&PlacedNode> {
        self.nodes.iter().find(|placed| placed.node == node)
    }

    /// Every occurrence of `node` (shared subtrees are placed once per parent).
    pub fn find_all(&self, node: NodeId) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter().filter(move |placed| placed.node == node)
    }

    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &PlacedNode> {
        self.nodes
            .get(index)
            .into_iter()
            .flat_map(|placed| placed.children.iter().map(|&child| &self.nodes[child]))
    }

    fn push(&mut self, placed: PlacedNode) -> usize {
        let index = self.nodes.len();
        if let Some(parent) = placed.parent {
            self.nodes[parent].children.push(index);
        }
        self.by_path.insert(placed.key.path.clone(), index);
        if let Some(id) = &placed.key.explicit {
            if self.by_explicit.contains_key(id) {
                tracing::warn!(id = %id, path = ?placed.key.path, "duplicate explicit id; lookups return the first");
            } else {
                self.by_explicit.insert(id.clone(), index);
            }
        }
        self.nodes.push(placed);
        index
    }
}

impl LayoutContext<'_> {
    /// Place `root` at the origin, proposing `proposal`, and everything below it.
    pub(crate) fn place_root(&self, root: NodeId, proposal: ProposedSize) -> PlacementTree {
        let mut tree = PlacementTree::default();
        let key = NodeKey::root(self.tree.data(root).explicit_id.clone());
        self.place(&mut tree, root, key, proposal, SizingEnv::NONE, Point::ORIGIN, None);
        tree
    }

    #[allow(clippy::too_many_arguments)]
    fn place(
        &self,
        out: &mut PlacementTree,
        node: NodeId,
        key: NodeKey,
        proposal: ProposedSize,
        env: SizingEnv,
        origin: Point,
        parent: Option<usize>,
    ) {
        let data = self.tree.data(node);
        let size = self.size_for(node, proposal, env);
        let rect = Rect::from_origin_size(origin, size);
        tracing::trace!(node = %node, path = ?key.path, x = rect.x, y = rect.y, w = rect.width, h = rect.height, "placed");

        // Grids draw with render-pass columns.
        let arrangement = self.arrange_in(node, proposal, env, Pass::Render);
        let shift = match data.kind {
            NodeKind::Offset { offset, .. } => offset,
            _ => Point::ORIGIN,
        };

        let index = out.push(PlacedNode {
            key: key.clone(),
            node,
            kind: data.kind.name(),
            rect,
            proposal,
            parent,
            children: Vec::new(),
        });

        for slot in arrangement.slots {
            let child_key = key.child(slot.index, self.tree.data(slot.node).explicit_id.clone());
            self.place(
                out,
                slot.node,
                child_key,
                slot.proposal,
                slot.env,
                origin + slot.origin + shift,
                Some(index),
            );
        }
    }
}
