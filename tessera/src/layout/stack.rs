//! Horizontal and vertical stacks.
//!
//! # Distribution
//!
//! A stack measures how flexible each child is by proposing zero and
//! infinity along the main axis, then hands out the space it was offered to
//! the least flexible children first. Each child is offered an equal share
//! of what is left and whatever it takes is subtracted before the next
//! child is asked. Children with a higher layout priority are served before
//! all lower-priority children; their minimum lengths are reserved up front.
//!
//! Children may take more than they are offered. The stack never truncates a
//! child, so the total can exceed the proposal in that case.
//!
//! # Cross axis
//!
//! Children are aligned with each other on the stack's alignment guide and
//! the stack's cross length is the extent of the resulting union.

use crate::primitives::{Axis, Point, Size};

use super::alignment::{AlignmentId, HorizontalAlignment, VerticalAlignment};
use super::arrange::{Arrangement, ChildSlot, SizingEnv};
use super::compose::{align_along, AlignedItem};
use super::context::LayoutContext;
use super::proposal::ProposedSize;
use super::tree::NodeId;

/// A linear container along `axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub axis: Axis,
    /// Cross-axis alignment identifier.
    pub alignment: AlignmentId,
    /// `None` uses the configured default spacing.
    pub spacing: Option<f64>,
    /// Lazy stacks propose unspecified along the main axis.
    pub lazy: bool,
    pub children: Vec<NodeId>,
}

impl Stack {
    pub fn horizontal(children: Vec<NodeId>) -> Self {
        Self {
            axis: Axis::Horizontal,
            alignment: VerticalAlignment::CENTER.id(),
            spacing: None,
            lazy: false,
            children,
        }
    }

    pub fn vertical(children: Vec<NodeId>) -> Self {
        Self {
            axis: Axis::Vertical,
            alignment: HorizontalAlignment::CENTER.id(),
            spacing: None,
            lazy: false,
            children,
        }
    }

    /// Set the cross-axis alignment. Identifiers on the main axis are ignored.
    pub fn align(mut self, alignment: impl Into<AlignmentId>) -> Self {
        let alignment = alignment.into();
        if alignment.axis() == self.axis.cross() {
            self.alignment = alignment;
        } else {
            tracing::warn!(axis = ?self.axis, "stack alignment must be on the cross axis; ignoring");
        }
        self
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing.max(0.0));
        self
    }

    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }
}

pub(crate) fn arrange(ctx: &LayoutContext<'_>, stack: &Stack, proposal: ProposedSize) -> Arrangement {
    let axis = stack.axis;
    let cross = axis.cross();
    let count = stack.children.len();
    if count == 0 {
        return Arrangement::leaf(Size::ZERO);
    }

    let spacing = stack.spacing.unwrap_or(ctx.config.default_spacing).max(0.0);
    let total_spacing = spacing * (count - 1) as f64;
    let env = SizingEnv::in_stack(axis);
    let cross_proposal = proposal.along(cross);
    let main_proposal = if stack.lazy { None } else { proposal.along(axis) };

    let proposals = match main_proposal {
        // No pressure: every child becomes its ideal length.
        None => vec![ProposedSize::from_axes(axis, None, cross_proposal); count],
        Some(length) => distribute(ctx, stack, length - total_spacing, cross_proposal),
    };

    let items: Vec<AlignedItem> = stack
        .children
        .iter()
        .zip(&proposals)
        .map(|(&node, &proposal)| AlignedItem {
            node,
            proposal,
            env,
            size: ctx.size_for(node, proposal, env),
        })
        .collect();

    let (cross_length, cross_offsets) = align_along(ctx, cross, stack.alignment, &items);

    let mut main = 0.0;
    let mut slots = Vec::with_capacity(count);
    for (index, (item, cross_offset)) in items.iter().zip(cross_offsets).enumerate() {
        if index > 0 {
            main += spacing;
        }
        slots.push(ChildSlot {
            index,
            node: item.node,
            proposal: item.proposal,
            env,
            origin: Point::from_axes(axis, main, cross_offset),
            size: item.size,
        });
        main += item.size.along(axis);
    }

    Arrangement {
        size: Size::from_axes(axis, main, cross_length),
        slots,
    }
}

struct Candidate {
    index: usize,
    node: NodeId,
    priority: f64,
    min: f64,
    flexibility: f64,
}

/// Main-axis proposals for each child, in declaration order.
///
/// `available` is the main-axis proposal minus all spacing.
fn distribute(
    ctx: &LayoutContext<'_>,
    stack: &Stack,
    available: f64,
    cross_proposal: Option<f64>,
) -> Vec<ProposedSize> {
    let axis = stack.axis;
    let env = SizingEnv::in_stack(axis);
    let propose = |main: f64| ProposedSize::from_axes(axis, Some(main), cross_proposal);

    let mut candidates: Vec<Candidate> = stack
        .children
        .iter()
        .enumerate()
        .map(|(index, &node)| {
            let min = ctx.size_for(node, propose(0.0), env).along(axis);
            let max = ctx.size_for(node, propose(f64::INFINITY), env).along(axis);
            let flexibility = max - min;
            Candidate {
                index,
                node,
                priority: ctx.tree.layout_priority_of(node),
                min,
                flexibility: if flexibility.is_nan() { f64::INFINITY } else { flexibility },
            }
        })
        .collect();

    // Stable: equal priority and flexibility keep declaration order.
    candidates.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then(a.flexibility.total_cmp(&b.flexibility))
    });

    let mut remaining = available - candidates.iter().map(|c| c.min).sum::<f64>();
    let mut proposals = vec![ProposedSize::UNSPECIFIED; candidates.len()];

    for group in candidates.chunk_by(|a, b| a.priority == b.priority) {
        remaining += group.iter().map(|c| c.min).sum::<f64>();
        let mut left = group.len();
        for candidate in group {
            let offer = (remaining / left as f64).max(0.0);
            let proposal = propose(offer);
            let taken = ctx.size_for(candidate.node, proposal, env).along(axis);
            proposals[candidate.index] = proposal;
            if remaining.is_finite() {
                remaining -= taken;
            }
            left -= 1;
        }
    }

    proposals
}
