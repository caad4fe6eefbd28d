//! Frame modifiers: fixed and flexible frames, padding, fixed size, and
//! aspect ratio.
//!
//! # Flexible frames
//!
//! Per axis, with optional `min`, `ideal`, and `max`:
//!
//! - `ideal` set: the child is proposed `ideal` and the frame reports
//!   `ideal`, whatever the child does.
//! - Otherwise the incoming proposal is clamped into the given bounds and
//!   proposed to the child. An unspecified proposal stays unspecified unless
//!   a bound is given, in which case the child's ideal length is clamped.
//! - The frame reports `max(min ?? child, min(max ?? child, proposed))`.
//!
//! The outbound rule is why `min: 0, max: inf` always reports exactly the
//! proposed length, while `max: inf` alone still reports a child that is
//! larger than the proposal.

use std::cell::OnceCell;

use crate::primitives::{Axis, EdgeInsets, Point, Size};

use super::alignment::Alignment;
use super::arrange::{Arrangement, ChildSlot, SizingEnv};
use super::context::LayoutContext;
use super::leaf::normalize_ratio;
use super::proposal::ProposedSize;
use super::tree::NodeId;

/// Bounds for one axis of a flexible frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBounds {
    pub min: Option<f64>,
    pub ideal: Option<f64>,
    pub max: Option<f64>,
}

impl AxisBounds {
    /// Clamp negatives to zero and swap `min > max`.
    pub fn normalized(self) -> Self {
        let clean = |v: Option<f64>| v.map(|v| v.max(0.0));
        let (mut min, ideal, mut max) = (clean(self.min), clean(self.ideal), clean(self.max));
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                tracing::warn!(min = lo, max = hi, "frame min exceeds max; swapping");
                min = Some(hi);
                max = Some(lo);
            }
        }
        Self { min, ideal, max }
    }

    fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.ideal.is_none() && self.max.is_none()
    }

    /// Clamp into whichever bounds are present.
    fn clamp(&self, value: f64) -> f64 {
        let value = self.max.map_or(value, |max| value.min(max));
        self.min.map_or(value, |min| value.max(min))
    }

    /// Length proposed to the child.
    fn inbound(&self, proposed: Option<f64>, child_ideal: impl FnOnce() -> f64) -> Option<f64> {
        if let Some(ideal) = self.ideal {
            return Some(ideal);
        }
        match proposed {
            Some(length) => Some(self.clamp(length)),
            None if self.is_unbounded() => None,
            None => Some(self.clamp(child_ideal())),
        }
    }

    /// Length the frame reports.
    fn outbound(&self, proposed: Option<f64>, child: f64) -> f64 {
        if let Some(ideal) = self.ideal {
            return ideal;
        }
        let proposed = proposed.unwrap_or(child);
        let upper = self.max.unwrap_or(child).min(proposed);
        self.min.unwrap_or(child).max(upper)
    }
}

/// Per-axis min, ideal and max bounds of a flexible frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexibleFrame {
    pub width: AxisBounds,
    pub height: AxisBounds,
}

impl FlexibleFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// `min: 0, max: inf` on both axes: always exactly the proposal.
    pub fn fill() -> Self {
        Self::new()
            .min_width(0.0)
            .max_width(f64::INFINITY)
            .min_height(0.0)
            .max_height(f64::INFINITY)
    }

    pub fn min_width(mut self, value: f64) -> Self {
        self.width.min = Some(value);
        self
    }

    pub fn ideal_width(mut self, value: f64) -> Self {
        self.width.ideal = Some(value);
        self
    }

    pub fn max_width(mut self, value: f64) -> Self {
        self.width.max = Some(value);
        self
    }

    pub fn min_height(mut self, value: f64) -> Self {
        self.height.min = Some(value);
        self
    }

    pub fn ideal_height(mut self, value: f64) -> Self {
        self.height.ideal = Some(value);
        self
    }

    pub fn max_height(mut self, value: f64) -> Self {
        self.height.max = Some(value);
        self
    }

    pub fn along(&self, axis: Axis) -> &AxisBounds {
        match axis {
            Axis::Horizontal => &self.width,
            Axis::Vertical => &self.height,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            width: self.width.normalized(),
            height: self.height.normalized(),
        }
    }
}

/// A frame modifier's parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameSpec {
    /// Absent dimensions pass the proposal through and report the child.
    Fixed { width: Option<f64>, height: Option<f64> },
    Flexible(FlexibleFrame),
}

/// How an aspect-ratio modifier fits its rectangle into the proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    #[default]
    Fit,
    Fill,
}

// =========================================================================
// Arrangements
// =========================================================================

pub(crate) fn arrange_frame(
    ctx: &LayoutContext<'_>,
    spec: &FrameSpec,
    alignment: Alignment,
    child: NodeId,
    proposal: ProposedSize,
) -> Arrangement {
    let env = SizingEnv::NONE;
    let (child_proposal, child_size, size) = match spec {
        FrameSpec::Fixed { width, height } => {
            let child_proposal = ProposedSize::new(width.or(proposal.width), height.or(proposal.height));
            let child_size = ctx.size_for(child, child_proposal, env);
            let size = Size::new(width.unwrap_or(child_size.width), height.unwrap_or(child_size.height));
            (child_proposal, child_size, size)
        }
        FrameSpec::Flexible(frame) => {
            let ideal = OnceCell::new();
            let child_ideal = || *ideal.get_or_init(|| ctx.size_for(child, ProposedSize::UNSPECIFIED, env));
            let child_proposal = ProposedSize::new(
                frame.width.inbound(proposal.width, || child_ideal().width),
                frame.height.inbound(proposal.height, || child_ideal().height),
            );
            let child_size = ctx.size_for(child, child_proposal, env);
            let size = Size::new(
                frame.width.outbound(child_proposal.width, child_size.width),
                frame.height.outbound(child_proposal.height, child_size.height),
            );
            (child_proposal, child_size, size)
        }
    };

    let registry = ctx.tree.alignments();
    let offset_along = |axis: Axis| {
        let id = alignment.along(axis);
        id.default_value(size, registry) - ctx.guide(child, id, child_proposal, env)
    };
    let origin = Point::new(offset_along(Axis::Horizontal), offset_along(Axis::Vertical));

    single(child, child_proposal, env, origin, child_size, size)
}

pub(crate) fn arrange_padding(
    ctx: &LayoutContext<'_>,
    insets: Option<EdgeInsets>,
    child: NodeId,
    proposal: ProposedSize,
    env: SizingEnv,
) -> Arrangement {
    let insets = insets.unwrap_or_else(|| EdgeInsets::all(ctx.config.default_padding.max(0.0)));
    let child_proposal = proposal.inset(&insets);
    let child_size = ctx.size_for(child, child_proposal, env);
    let size = Size::new(
        child_size.width + insets.along(Axis::Horizontal),
        child_size.height + insets.along(Axis::Vertical),
    );
    let origin = Point::new(insets.leading, insets.top);
    single(child, child_proposal, env, origin, child_size, size)
}

pub(crate) fn arrange_fixed_size(
    ctx: &LayoutContext<'_>,
    horizontal: bool,
    vertical: bool,
    child: NodeId,
    proposal: ProposedSize,
) -> Arrangement {
    let child_proposal = ProposedSize::new(
        if horizontal { None } else { proposal.width },
        if vertical { None } else { proposal.height },
    );
    let size = ctx.size_for(child, child_proposal, SizingEnv::NONE);
    single(child, child_proposal, SizingEnv::NONE, Point::ORIGIN, size, size)
}

pub(crate) fn arrange_aspect_ratio(
    ctx: &LayoutContext<'_>,
    ratio: Option<f64>,
    mode: ContentMode,
    child: NodeId,
    proposal: ProposedSize,
) -> Arrangement {
    let env = SizingEnv::NONE;
    let ratio = match ratio {
        Some(ratio) => normalize_ratio(ratio),
        None => {
            let ideal = ctx.size_for(child, ProposedSize::UNSPECIFIED, env);
            normalize_ratio(ideal.width / ideal.height)
        }
    };

    let child_proposal = match (proposal.width, proposal.height) {
        (Some(width), Some(height)) => ProposedSize::from(ratio_rect(width, height, ratio, mode)),
        (Some(width), None) => ProposedSize::fixed(width, width / ratio),
        (None, Some(height)) => ProposedSize::fixed(height * ratio, height),
        (None, None) => ProposedSize::UNSPECIFIED,
    };
    let size = ctx.size_for(child, child_proposal, env);
    single(child, child_proposal, env, Point::ORIGIN, size, size)
}

/// The `ratio`-exact rectangle that fits inside (or fills) `width x height`.
pub fn ratio_rect(width: f64, height: f64, ratio: f64, mode: ContentMode) -> Size {
    let wider_than_ratio = width > height * ratio;
    match (mode, wider_than_ratio) {
        (ContentMode::Fit, true) | (ContentMode::Fill, false) => Size::new(height * ratio, height),
        (ContentMode::Fit, false) | (ContentMode::Fill, true) => Size::new(width, width / ratio),
    }
}

fn single(
    child: NodeId,
    proposal: ProposedSize,
    env: SizingEnv,
    origin: Point,
    child_size: Size,
    size: Size,
) -> Arrangement {
    Arrangement {
        size,
        slots: vec![ChildSlot {
            index: 0,
            node: child,
            proposal,
            env,
            origin,
            size: child_size,
        }],
    }
}
