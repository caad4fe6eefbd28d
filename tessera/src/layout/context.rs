//! Layout context shared by every node during one pass.
//!
//! The LayoutContext carries state through the layout tree:
//! - The view tree and the host's leaf metrics
//! - The engine configuration
//! - The per-pass size and guide memo
//!
//! A context lives for exactly one pass. Sizing is pure for its lifetime, so
//! memoizing through a shared reference (`RefCell`) is observationally
//! invisible.

use std::cell::RefCell;

use crate::config::LayoutConfig;
use crate::primitives::Size;

use super::alignment::AlignmentId;
use super::arrange::SizingEnv;
use super::cache::{SizeCache, SizeKey};
use super::leaf::{leaf_size, LeafMetrics};
use super::proposal::ProposedSize;
use super::tree::{NodeId, NodeKind, ViewTree};

/// Layout context passed through the view tree during one pass.
pub struct LayoutContext<'a> {
    pub(crate) tree: &'a ViewTree,
    pub(crate) metrics: &'a dyn LeafMetrics,
    pub(crate) config: &'a LayoutConfig,
    cache: RefCell<SizeCache>,
}

impl<'a> LayoutContext<'a> {
    /// Create a context for a fresh pass.
    ///
    /// The tree is assumed to be validated (see [`ViewTree::validate`]);
    /// sizing an unvalidated cyclic tree would not terminate.
    pub fn new(tree: &'a ViewTree, metrics: &'a dyn LeafMetrics, config: &'a LayoutConfig) -> Self {
        Self {
            tree,
            metrics,
            config,
            cache: RefCell::new(SizeCache::new()),
        }
    }

    pub fn tree(&self) -> &'a ViewTree {
        self.tree
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    /// The reported size of `node` for `proposal`.
    pub fn size_for(&self, node: NodeId, proposal: ProposedSize, env: SizingEnv) -> Size {
        let proposal = proposal.sanitized();
        let key = SizeKey::new(node, env, &proposal);

        if self.config.memoize {
            // Borrow ends with the statement; computing below recurses.
            let cached = self.cache.borrow_mut().get(key);
            if let Some(size) = cached {
                return size;
            }
        }

        let size = self.compute_size(node, proposal, env);
        self.log_size(node, proposal, size);

        if self.config.memoize {
            self.cache.borrow_mut().insert(key, size);
        }
        size
    }

    fn compute_size(&self, node: NodeId, proposal: ProposedSize, env: SizingEnv) -> Size {
        match &self.tree.data(node).kind {
            NodeKind::Leaf(leaf) => leaf_size(leaf, proposal, self.metrics, self.config, env.stack_axis),
            _ => self.arrange(node, proposal, env).size.non_negative(),
        }
    }

    /// Memoized explicit guide lookup; see [`Self::explicit_guide`].
    pub(crate) fn cached_guide(
        &self,
        node: NodeId,
        id: AlignmentId,
        proposal: ProposedSize,
        env: SizingEnv,
        compute: impl FnOnce() -> Option<f64>,
    ) -> Option<f64> {
        if !self.config.memoize {
            return compute();
        }
        let key = SizeKey::new(node, env, &proposal);
        let cached = self.cache.borrow().get_guide(key, id);
        if let Some(value) = cached {
            return value;
        }
        let value = compute();
        self.cache.borrow_mut().insert_guide(key, id, value);
        value
    }

    /// (hits, misses) of the size memo so far.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.borrow().stats()
    }

    fn log_size(&self, node: NodeId, proposal: ProposedSize, size: Size) {
        tracing::trace!(
            node = %node,
            kind = self.tree.data(node).kind.name(),
            proposed_w = ?proposal.width,
            proposed_h = ?proposal.height,
            width = size.width,
            height = size.height,
            "sized"
        );
    }
}
