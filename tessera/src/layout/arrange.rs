//! Arrangements: a node's size plus where each of its children goes.
//!
//! Every non-leaf node is laid out by computing an [`Arrangement`] for a
//! proposal. Sizing keeps only the size; placement walks the slots; guide
//! bubbling reads the slots of nodes that have no explicit guide of their
//! own. This module is the switchboard that routes each node kind to its
//! arrangement code.

use crate::primitives::{Axis, Point, Size};

use super::alignment::{resolve_guide, AlignmentId};
use super::compose;
use super::containers;
use super::context::LayoutContext;
use super::flow;
use super::frame;
use super::grid;
use super::leaf::leaf_explicit_guide;
use super::proposal::ProposedSize;
use super::stack;
use super::tree::{NodeId, NodeKind};

/// Sizing context a parent hands to a child along with the proposal.
///
/// Only spacers read it today: a spacer that is a direct child of a stack
/// grows along the stack axis only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizingEnv {
    pub stack_axis: Option<Axis>,
}

impl SizingEnv {
    pub const NONE: Self = Self { stack_axis: None };

    #[inline]
    pub const fn in_stack(axis: Axis) -> Self {
        Self { stack_axis: Some(axis) }
    }
}

/// One placed child inside its parent's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSlot {
    /// Declaration index among the parent's children.
    pub index: usize,
    pub node: NodeId,
    pub proposal: ProposedSize,
    pub env: SizingEnv,
    /// Origin relative to the parent's top-leading corner.
    pub origin: Point,
    pub size: Size,
}

/// Result of arranging a node for one proposal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrangement {
    pub size: Size,
    /// Slots in declaration order.
    pub slots: Vec<ChildSlot>,
}

impl Arrangement {
    pub fn leaf(size: Size) -> Self {
        Self { size, slots: Vec::new() }
    }
}

/// Which pass an arrangement is computed for. Only grids care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    Layout,
    Render,
}

impl LayoutContext<'_> {
    /// Arrange `node` for `proposal` (layout pass).
    pub fn arrange(&self, node: NodeId, proposal: ProposedSize, env: SizingEnv) -> Arrangement {
        self.arrange_in(node, proposal.sanitized(), env, Pass::Layout)
    }

    pub(crate) fn arrange_in(&self, node: NodeId, proposal: ProposedSize, env: SizingEnv, pass: Pass) -> Arrangement {
        match &self.tree.data(node).kind {
            NodeKind::Leaf(leaf) => Arrangement::leaf(super::leaf::leaf_size(
                leaf,
                proposal,
                self.metrics,
                self.config,
                env.stack_axis,
            )),
            NodeKind::Stack(s) => stack::arrange(self, s, proposal),
            NodeKind::ZStack(z) => compose::arrange_zstack(self, z, proposal),
            NodeKind::Layered(layered) => compose::arrange_layered(self, layered, proposal),
            NodeKind::Grid(g) => grid::arrange(self, g, proposal, pass),
            NodeKind::Flow(f) => flow::arrange(self, f, proposal),
            NodeKind::Frame { spec, alignment, child } => frame::arrange_frame(self, spec, *alignment, *child, proposal),
            NodeKind::Padding { insets, child } => frame::arrange_padding(self, *insets, *child, proposal, env),
            NodeKind::FixedSize { horizontal, vertical, child } => {
                frame::arrange_fixed_size(self, *horizontal, *vertical, *child, proposal)
            }
            NodeKind::AspectRatio { ratio, mode, child } => {
                frame::arrange_aspect_ratio(self, *ratio, *mode, *child, proposal)
            }
            // Offset is applied at placement; priority is read by stacks.
            NodeKind::Offset { child, .. } | NodeKind::LayoutPriority { child, .. } => {
                passthrough(self, *child, proposal, env)
            }
            NodeKind::ScrollView { axes, child } => containers::arrange_scroll(self, *axes, *child, proposal),
            NodeKind::GeometryReader { child } => containers::arrange_geometry_reader(self, *child, proposal),
            NodeKind::ViewThatFits { children } => containers::arrange_view_that_fits(self, children, proposal),
        }
    }

    /// This node's guide for `id`: explicit value if any, else the default.
    pub fn guide(&self, node: NodeId, id: AlignmentId, proposal: ProposedSize, env: SizingEnv) -> f64 {
        let data = self.tree.data(node);
        let size = self.size_for(node, proposal, env);
        resolve_guide(&data.guides, self.tree.alignments(), id, size, || {
            self.explicit_guide(node, id, proposal, env)
        })
    }

    /// An explicit guide value for `node`, if one exists.
    ///
    /// Resolution order:
    /// 1. the node's own override for `id`;
    /// 2. text baselines reported by the metrics;
    /// 3. the first child (declaration order) with an explicit value,
    ///    translated into this node's frame.
    ///
    /// Custom identifiers with no explicit value anywhere are forwarded from
    /// the first child's resolved guide, so they pass through nesting
    /// unchanged. Overlays only consult their primary; scroll views never
    /// forward.
    pub fn explicit_guide(&self, node: NodeId, id: AlignmentId, proposal: ProposedSize, env: SizingEnv) -> Option<f64> {
        let proposal = proposal.sanitized();
        self.cached_guide(node, id, proposal, env, || {
            self.compute_explicit_guide(node, id, proposal, env)
        })
    }

    fn compute_explicit_guide(&self, node: NodeId, id: AlignmentId, proposal: ProposedSize, env: SizingEnv) -> Option<f64> {
        let data = self.tree.data(node);
        let size = self.size_for(node, proposal, env);
        if let Some(value) = data.guides.explicit(id, size) {
            return Some(value);
        }

        let forwarded = match &data.kind {
            NodeKind::Leaf(leaf) => return leaf_explicit_guide(leaf, id, size, self.metrics),
            NodeKind::ScrollView { .. } => return None,
            NodeKind::Layered(_) => 1,
            _ => usize::MAX,
        };

        let arrangement = self.arrange(node, proposal, env);
        let slots = &arrangement.slots[..arrangement.slots.len().min(forwarded)];
        let axis = id.axis();

        for slot in slots {
            if let Some(value) = self.explicit_guide(slot.node, id, slot.proposal, slot.env) {
                return Some(value + slot.origin.along(axis));
            }
        }
        if id.is_custom() {
            return slots
                .first()
                .map(|slot| self.guide(slot.node, id, slot.proposal, slot.env) + slot.origin.along(axis));
        }
        None
    }
}

/// Propose straight through, child at the origin, report the child's size.
fn passthrough(ctx: &LayoutContext<'_>, child: NodeId, proposal: ProposedSize, env: SizingEnv) -> Arrangement {
    let size = ctx.size_for(child, proposal, env);
    Arrangement {
        size,
        slots: vec![ChildSlot {
            index: 0,
            node: child,
            proposal,
            env,
            origin: Point::ORIGIN,
            size,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::alignment::{Alignment, VerticalAlignment};
    use crate::layout::leaf::{MonospaceMetrics, LINE_HEIGHT};
    use crate::layout::tree::ViewTree;
    use crate::primitives::EdgeInsets;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_override_wins_over_default() {
        let mut tree = ViewTree::new();
        let fill = tree.fill();
        tree.alignment_guide(fill, AlignmentId::TOP, |size| size.height / 4.0);
        let metrics = MonospaceMetrics::new();
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&tree, &metrics, &config);

        let p = ProposedSize::fixed(20.0, 40.0);
        assert_eq!(ctx.guide(fill, AlignmentId::TOP, p, SizingEnv::NONE), 10.0);
        assert_eq!(ctx.guide(fill, AlignmentId::BOTTOM, p, SizingEnv::NONE), 40.0);
    }

    #[test]
    fn test_baseline_bubbles_through_padding() {
        let mut tree = ViewTree::new();
        let text = tree.text("Hello");
        let padded = tree.padding(text, EdgeInsets::all(5.0));
        let metrics = MonospaceMetrics::new();
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&tree, &metrics, &config);

        let baseline = ctx.guide(padded, AlignmentId::FIRST_TEXT_BASELINE, ProposedSize::UNSPECIFIED, SizingEnv::NONE);
        assert!((baseline - (5.0 + LINE_HEIGHT * 0.8)).abs() < EPS);
    }

    #[test]
    fn test_overlay_only_forwards_primary() {
        let mut tree = ViewTree::new();
        let primary = tree.fixed(30.0, 30.0);
        let badge = tree.text("3");
        let overlay = tree.overlay(primary, badge, Alignment::TOP_TRAILING);
        let metrics = MonospaceMetrics::new();
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&tree, &metrics, &config);

        let explicit = ctx.explicit_guide(overlay, AlignmentId::FIRST_TEXT_BASELINE, ProposedSize::UNSPECIFIED, SizingEnv::NONE);
        assert_eq!(explicit, None);
    }

    #[test]
    fn test_custom_guide_passes_through_containers() {
        let mut tree = ViewTree::new();
        let rule = tree.register_vertical_alignment("rule", |size| size.height / 3.0);
        let leaf = tree.fixed(10.0, 30.0);
        let padded = tree.padding(leaf, EdgeInsets::new(6.0, 0.0, 0.0, 0.0));
        let metrics = MonospaceMetrics::new();
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&tree, &metrics, &config);

        // The leaf's default (10) shifted by the padding, not the padding's own default.
        let value = ctx.guide(padded, rule.id(), ProposedSize::UNSPECIFIED, SizingEnv::NONE);
        assert!((value - 16.0).abs() < EPS);
        assert_ne!(VerticalAlignment::CENTER, rule);
    }
}
