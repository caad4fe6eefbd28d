//! Flow - wrapping layout.
//!
//! Children are laid out horizontally at their ideal sizes until the next
//! one would exceed the proposed width, then wrap to a new line. Items in a
//! line are aligned with each other on the flow's vertical alignment.

use crate::primitives::{Axis, Point, Size};

use super::alignment::VerticalAlignment;
use super::arrange::{Arrangement, ChildSlot, SizingEnv};
use super::compose::{align_along, AlignedItem};
use super::context::LayoutContext;
use super::proposal::ProposedSize;
use super::tree::NodeId;

// =========================================================================
// Flow
// =========================================================================

/// A container that wraps children like CSS `flex-wrap: wrap`.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    /// Horizontal spacing between items; `None` uses the configured default.
    pub spacing: Option<f64>,
    /// Vertical spacing between lines; `None` uses the configured default.
    pub line_spacing: Option<f64>,
    pub alignment: VerticalAlignment,
    pub children: Vec<NodeId>,
}

impl Flow {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self {
            spacing: None,
            line_spacing: None,
            alignment: VerticalAlignment::CENTER,
            children,
        }
    }

    /// Set horizontal spacing between items.
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing.max(0.0));
        self
    }

    /// Set vertical spacing between wrapped lines.
    pub fn line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = Some(spacing.max(0.0));
        self
    }

    pub fn alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

pub(crate) fn arrange(ctx: &LayoutContext<'_>, flow: &Flow, proposal: ProposedSize) -> Arrangement {
    let env = SizingEnv::NONE;
    let spacing = flow.spacing.unwrap_or(ctx.config.default_spacing).max(0.0);
    let line_spacing = flow.line_spacing.unwrap_or(ctx.config.default_spacing).max(0.0);
    let max_width = proposal.width.unwrap_or(f64::INFINITY);

    let items: Vec<AlignedItem> = flow
        .children
        .iter()
        .map(|&node| AlignedItem {
            node,
            proposal: ProposedSize::UNSPECIFIED,
            env,
            size: ctx.size_for(node, ProposedSize::UNSPECIFIED, env),
        })
        .collect();

    // Split into lines: [start, end) ranges of `items`.
    let mut lines = Vec::new();
    let mut start = 0;
    let mut x = 0.0;
    for (index, item) in items.iter().enumerate() {
        let width = item.size.width;
        if index > start && x + spacing + width > max_width {
            lines.push(start..index);
            start = index;
            x = width;
        } else {
            x += if index > start { spacing + width } else { width };
        }
    }
    if start < items.len() {
        lines.push(start..items.len());
    }

    let mut slots = Vec::with_capacity(items.len());
    let mut width: f64 = 0.0;
    let mut y = 0.0;
    for (line_index, range) in lines.into_iter().enumerate() {
        if line_index > 0 {
            y += line_spacing;
        }
        let line = &items[range.clone()];
        let (line_height, offsets) = align_along(ctx, Axis::Vertical, flow.alignment.id(), line);

        let mut x = 0.0;
        for ((index, item), offset) in range.zip(line).zip(offsets) {
            slots.push(ChildSlot {
                index,
                node: item.node,
                proposal: item.proposal,
                env,
                origin: Point::new(x, y + offset),
                size: item.size,
            });
            x += item.size.width + spacing;
        }
        width = width.max(x - spacing);
        y += line_height;
    }

    Arrangement {
        size: Size::new(width, y),
        slots,
    }
}
