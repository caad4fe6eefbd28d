//! The layout entry point.
//!
//! `layout(...)` validates the tree, then runs one pass: sizes flow up,
//! placements flow down, and the result is a [`PlacementTree`]. Everything
//! the pass memoizes is dropped with it.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::primitives::Size;

use super::alignment::AlignmentId;
use super::arrange::SizingEnv;
use super::context::LayoutContext;
use super::leaf::LeafMetrics;
use super::placement::PlacementTree;
use super::proposal::ProposedSize;
use super::sizable::Sizable;
use super::tree::{NodeId, ViewTree};

/// Lay out `root` in `available` and return every node's rectangle.
pub fn layout(
    tree: &ViewTree,
    root: NodeId,
    available: Size,
    metrics: &dyn LeafMetrics,
    config: &LayoutConfig,
) -> Result<PlacementTree> {
    let span = tracing::debug_span!("layout_pass", root = %root);
    let _guard = span.enter();

    tree.validate(root, config.max_depth)?;

    let ctx = LayoutContext::new(tree, metrics, config);
    let placements = ctx.place_root(root, ProposedSize::fixed(available.width, available.height));

    let (hits, misses) = ctx.cache_stats();
    tracing::debug!(
        width = available.width,
        height = available.height,
        nodes = placements.len(),
        cache_hits = hits,
        cache_misses = misses,
        "layout pass complete"
    );
    Ok(placements)
}

/// Leaf metrics and configuration bundled for repeated passes.
#[derive(Debug, Clone, Default)]
pub struct Engine<M: LeafMetrics> {
    metrics: M,
    config: LayoutConfig,
}

impl<M: LeafMetrics> Engine<M> {
    pub fn new(metrics: M) -> Self {
        Self::with_config(metrics, LayoutConfig::default())
    }

    pub fn with_config(metrics: M, config: LayoutConfig) -> Self {
        Self { metrics, config }
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Run a full pass. See [`layout`].
    pub fn layout(&self, tree: &ViewTree, root: NodeId, available: Size) -> Result<PlacementTree> {
        layout(tree, root, available, &self.metrics, &self.config)
    }

    /// A [`Sizable`] view of one node, for querying it outside a full pass.
    ///
    /// The handle owns its own memo; drop it when the tree changes.
    pub fn handle<'a>(&'a self, tree: &'a ViewTree, node: NodeId) -> Result<NodeHandle<'a>> {
        tree.validate(node, self.config.max_depth)?;
        Ok(NodeHandle {
            ctx: LayoutContext::new(tree, &self.metrics, &self.config),
            node,
        })
    }
}

/// A validated node bound to a layout context.
pub struct NodeHandle<'a> {
    ctx: LayoutContext<'a>,
    node: NodeId,
}

impl NodeHandle<'_> {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn context(&self) -> &LayoutContext<'_> {
        &self.ctx
    }
}

impl Sizable for NodeHandle<'_> {
    fn size_for(&self, proposal: ProposedSize) -> Size {
        self.ctx.size_for(self.node, proposal, SizingEnv::NONE)
    }

    /// Guides are evaluated for the proposal that reproduces `size`.
    fn guide(&self, id: AlignmentId, size: Size) -> f64 {
        self.ctx.guide(self.node, id, ProposedSize::from(size), SizingEnv::NONE)
    }
}
