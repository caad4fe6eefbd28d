//! Union-of-frames composition: ZStack and overlay/background layers.
//!
//! Children are positioned relative to each other by their alignment guides
//! and the container's size is the union of the resulting frames. The
//! container's own guide is wherever the children's guides landed, so every
//! child ends up at `container_guide - child_guide`.

use crate::primitives::{Axis, Point, Size};

use super::alignment::{Alignment, AlignmentId};
use super::arrange::{Arrangement, ChildSlot, SizingEnv};
use super::context::LayoutContext;
use super::proposal::ProposedSize;
use super::tree::NodeId;

/// Children layered back to front, aligned on a 2-D alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ZStack {
    pub alignment: Alignment,
    pub children: Vec<NodeId>,
}

/// Which side of the primary the secondary is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Overlay,
    Background,
}

/// A primary view with a secondary layered over or behind it.
///
/// Only the primary determines the size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layered {
    pub layer: Layer,
    pub alignment: Alignment,
    pub primary: NodeId,
    pub secondary: NodeId,
}

/// A sized child waiting to be aligned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AlignedItem {
    pub node: NodeId,
    pub proposal: ProposedSize,
    pub env: SizingEnv,
    pub size: Size,
}

/// Align `items` on `id` along `axis`.
///
/// Returns the extent of the union and each item's offset from the union's
/// leading edge.
pub(crate) fn align_along(
    ctx: &LayoutContext<'_>,
    axis: Axis,
    id: AlignmentId,
    items: &[AlignedItem],
) -> (f64, Vec<f64>) {
    if items.is_empty() {
        return (0.0, Vec::new());
    }

    // Unbounded children (infinity probes) have no meaningful guide.
    if items.iter().any(|item| !item.size.along(axis).is_finite()) {
        let extent = items.iter().map(|item| item.size.along(axis)).fold(0.0, f64::max);
        return (extent, vec![0.0; items.len()]);
    }

    let guides: Vec<f64> = items
        .iter()
        .map(|item| ctx.guide(item.node, id, item.proposal, item.env))
        .collect();

    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for (item, guide) in items.iter().zip(&guides) {
        low = low.min(-guide);
        high = high.max(item.size.along(axis) - guide);
    }

    let offsets = guides.iter().map(|guide| -guide - low).collect();
    ((high - low).max(0.0), offsets)
}

pub(crate) fn arrange_zstack(ctx: &LayoutContext<'_>, zstack: &ZStack, proposal: ProposedSize) -> Arrangement {
    let items: Vec<AlignedItem> = zstack
        .children
        .iter()
        .map(|&node| AlignedItem {
            node,
            proposal,
            env: SizingEnv::NONE,
            size: ctx.size_for(node, proposal, SizingEnv::NONE),
        })
        .collect();

    let (width, xs) = align_along(ctx, Axis::Horizontal, zstack.alignment.horizontal.id(), &items);
    let (height, ys) = align_along(ctx, Axis::Vertical, zstack.alignment.vertical.id(), &items);

    let slots = items
        .iter()
        .enumerate()
        .map(|(index, item)| ChildSlot {
            index,
            node: item.node,
            proposal: item.proposal,
            env: item.env,
            origin: Point::new(xs[index], ys[index]),
            size: item.size,
        })
        .collect();

    Arrangement { size: Size::new(width, height), slots }
}

pub(crate) fn arrange_layered(ctx: &LayoutContext<'_>, layered: &Layered, proposal: ProposedSize) -> Arrangement {
    let env = SizingEnv::NONE;
    let primary_size = ctx.size_for(layered.primary, proposal, env);
    let secondary_proposal = ProposedSize::from(primary_size);
    let secondary_size = ctx.size_for(layered.secondary, secondary_proposal, env);

    let offset_along = |axis: Axis| {
        let id = layered.alignment.along(axis);
        ctx.guide(layered.primary, id, proposal, env) - ctx.guide(layered.secondary, id, secondary_proposal, env)
    };
    let secondary_origin = Point::new(offset_along(Axis::Horizontal), offset_along(Axis::Vertical));

    Arrangement {
        size: primary_size,
        slots: vec![
            ChildSlot {
                index: 0,
                node: layered.primary,
                proposal,
                env,
                origin: Point::ORIGIN,
                size: primary_size,
            },
            ChildSlot {
                index: 1,
                node: layered.secondary,
                proposal: secondary_proposal,
                env,
                origin: secondary_origin,
                size: secondary_size,
            },
        ],
    }
}
