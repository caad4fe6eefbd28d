//! Grid - column tracks, row heights, and the two-pass track solver.
//!
//! Columns are declared as tracks:
//! - `Fixed(w)` always takes `w`;
//! - `Flexible { min, max }` takes an equal share of what is left, clamped;
//! - `Adaptive { min, max }` packs as many subcolumns of at least `min` as
//!   fit into its share.
//!
//! Tracks are resolved in declaration order. Each non-fixed track is offered
//! `remaining / tracks_left` and whatever it takes is subtracted before the
//! next track is offered its share.
//!
//! A grid is resolved twice. The layout pass is seeded with the proposed
//! width and decides the grid's reported size. The render pass is seeded
//! with the width the layout pass produced and decides where cells are
//! drawn. When an ancestor proposed a width the grid could not honor, the
//! two passes disagree and the drawn columns drift from the reported frame.
//! The drift is observable in placements.

use crate::primitives::{Point, Size};

use super::alignment::Alignment;
use super::arrange::{Arrangement, ChildSlot, Pass, SizingEnv};
use super::context::LayoutContext;
use super::proposal::ProposedSize;
use super::tree::NodeId;

/// Minimum width of a flexible track declared without one.
pub const DEFAULT_FLEXIBLE_MIN: f64 = 10.0;

// =========================================================================
// Tracks
// =========================================================================

/// One column declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridTrack {
    Fixed(f64),
    Flexible { min: f64, max: f64 },
    Adaptive { min: f64, max: f64 },
}

impl GridTrack {
    pub fn fixed(width: f64) -> Self {
        GridTrack::Fixed(width)
    }

    /// Flexible with the default bounds `[10, inf)`.
    pub fn flexible() -> Self {
        GridTrack::Flexible { min: DEFAULT_FLEXIBLE_MIN, max: f64::INFINITY }
    }

    pub fn flexible_range(min: f64, max: f64) -> Self {
        GridTrack::Flexible { min, max }
    }

    pub fn adaptive(min: f64) -> Self {
        GridTrack::Adaptive { min, max: f64::INFINITY }
    }

    pub fn adaptive_range(min: f64, max: f64) -> Self {
        GridTrack::Adaptive { min, max }
    }

    /// Clamp negatives to zero and swap `min > max`.
    pub fn normalized(self) -> Self {
        let bounds = |min: f64, max: f64| {
            let (min, max) = (min.max(0.0), max.max(0.0));
            if min > max {
                tracing::warn!(min, max, "grid track min exceeds max; swapping");
                (max, min)
            } else {
                (min, max)
            }
        };
        match self {
            GridTrack::Fixed(width) => GridTrack::Fixed(width.max(0.0)),
            GridTrack::Flexible { min, max } => {
                let (min, max) = bounds(min, max);
                GridTrack::Flexible { min, max }
            }
            GridTrack::Adaptive { min, max } => {
                let (min, max) = bounds(min, max);
                GridTrack::Adaptive { min, max }
            }
        }
    }
}

/// Resolved column widths (adaptive tracks flattened into subcolumns).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridColumns {
    pub widths: Vec<f64>,
    pub spacing: f64,
}

impl GridColumns {
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of the widths plus inter-column spacing.
    pub fn total_width(&self) -> f64 {
        let gaps = self.widths.len().saturating_sub(1) as f64;
        self.widths.iter().sum::<f64>() + self.spacing * gaps
    }

    /// Leading x of each column.
    pub fn offsets(&self) -> Vec<f64> {
        let mut x = 0.0;
        self.widths
            .iter()
            .map(|width| {
                let start = x;
                x += width + self.spacing;
                start
            })
            .collect()
    }
}

/// The column track solver.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTracks {
    tracks: Vec<GridTrack>,
    spacing: f64,
    pixel_scale: Option<f64>,
}

impl GridTracks {
    pub fn new(tracks: Vec<GridTrack>, spacing: f64) -> Self {
        Self {
            tracks: tracks.into_iter().map(GridTrack::normalized).collect(),
            spacing: spacing.max(0.0),
            pixel_scale: None,
        }
    }

    /// Round resolved widths to `1 / scale` points.
    pub fn with_pixel_scale(mut self, scale: Option<f64>) -> Self {
        self.pixel_scale = scale.filter(|s| s.is_finite() && *s > 0.0);
        self
    }

    /// Resolve columns for the layout pass, seeded with the proposed width.
    pub fn layout_pass(&self, seed: Option<f64>) -> GridColumns {
        self.resolve(seed)
    }

    /// Resolve columns for the render pass, seeded with the layout-pass width.
    pub fn render_pass(&self, layout_width: f64) -> GridColumns {
        self.resolve(Some(layout_width))
    }

    fn resolve(&self, seed: Option<f64>) -> GridColumns {
        let spacing = self.spacing;
        let mut widths = Vec::with_capacity(self.tracks.len());

        let Some(seed) = seed else {
            for track in &self.tracks {
                widths.push(match *track {
                    GridTrack::Fixed(width) => width,
                    GridTrack::Flexible { min, .. } | GridTrack::Adaptive { min, .. } => min,
                });
            }
            return GridColumns { widths, spacing };
        };

        let gaps = self.tracks.len().saturating_sub(1) as f64;
        let fixed: f64 = self
            .tracks
            .iter()
            .filter_map(|t| match t {
                GridTrack::Fixed(width) => Some(*width),
                _ => None,
            })
            .sum();
        let mut remaining = seed - fixed - spacing * gaps;
        let mut left = self.tracks.iter().filter(|t| !matches!(t, GridTrack::Fixed(_))).count();

        for track in &self.tracks {
            match *track {
                GridTrack::Fixed(width) => widths.push(width),
                GridTrack::Flexible { min, max } => {
                    let offer = remaining / left as f64;
                    let width = self.round(clamp_soft(offer, min, max));
                    widths.push(width);
                    remaining -= width;
                    left -= 1;
                }
                GridTrack::Adaptive { min, max } => {
                    let offer = (remaining / left as f64).max(0.0);
                    let count = adaptive_count(offer, min, spacing);
                    let gaps = (count - 1) as f64;
                    let width = self.round(clamp_soft((offer - spacing * gaps) / count as f64, min, max));
                    widths.extend(std::iter::repeat_n(width, count));
                    remaining -= width * count as f64 + spacing * gaps;
                    left -= 1;
                }
            }
        }

        GridColumns { widths, spacing }
    }

    fn round(&self, width: f64) -> f64 {
        match self.pixel_scale {
            Some(scale) if width.is_finite() => (width * scale).round() / scale,
            _ => width,
        }
    }
}

/// `max(min, min(max, value))`; never panics on inverted bounds.
#[inline]
fn clamp_soft(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// How many subcolumns of at least `min` (plus spacing) fit into `width`.
fn adaptive_count(width: f64, min: f64, spacing: f64) -> usize {
    let per_column = min + spacing;
    if !width.is_finite() || per_column <= 0.0 {
        return 1;
    }
    ((width + spacing) / per_column).floor().max(1.0) as usize
}

// =========================================================================
// Grid container
// =========================================================================

/// A grid of cells filled row-major into resolved columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub tracks: Vec<GridTrack>,
    /// Column spacing; `None` uses the configured default.
    pub spacing: Option<f64>,
    /// Row spacing; `None` uses the configured default.
    pub row_spacing: Option<f64>,
    /// Alignment of each cell's content inside its cell.
    pub alignment: Alignment,
    pub children: Vec<NodeId>,
}

impl Grid {
    pub fn new(tracks: Vec<GridTrack>, children: Vec<NodeId>) -> Self {
        Self {
            tracks,
            spacing: None,
            row_spacing: None,
            alignment: Alignment::CENTER,
            children,
        }
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn row_spacing(mut self, spacing: f64) -> Self {
        self.row_spacing = Some(spacing);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// The track solver for this grid under `default_spacing` and `pixel_scale`.
    pub fn solver(&self, default_spacing: f64, pixel_scale: Option<f64>) -> GridTracks {
        GridTracks::new(self.tracks.clone(), self.spacing.unwrap_or(default_spacing))
            .with_pixel_scale(pixel_scale)
    }
}

pub(crate) fn arrange(ctx: &LayoutContext<'_>, grid: &Grid, proposal: ProposedSize, pass: Pass) -> Arrangement {
    let solver = grid.solver(ctx.config.default_spacing, ctx.config.grid_pixel_scale);
    let layout_columns = solver.layout_pass(proposal.width);
    let row_spacing = grid.row_spacing.unwrap_or(ctx.config.default_spacing).max(0.0);

    let layout = fill_cells(ctx, grid, &layout_columns, row_spacing);
    if pass == Pass::Layout {
        return layout;
    }

    let render_columns = solver.render_pass(layout.size.width);
    tracing::trace!(
        layout = ?layout_columns.widths,
        render = ?render_columns.widths,
        "grid columns"
    );
    Arrangement {
        size: layout.size,
        slots: fill_cells(ctx, grid, &render_columns, row_spacing).slots,
    }
}

fn fill_cells(ctx: &LayoutContext<'_>, grid: &Grid, columns: &GridColumns, row_spacing: f64) -> Arrangement {
    let env = SizingEnv::NONE;
    if columns.is_empty() || grid.children.is_empty() {
        return Arrangement::leaf(Size::new(columns.total_width(), 0.0));
    }

    let registry = ctx.tree.alignments();
    let xs = columns.offsets();
    let mut slots = Vec::with_capacity(grid.children.len());
    let mut y = 0.0;

    for (row, cells) in grid.children.chunks(columns.len()).enumerate() {
        if row > 0 {
            y += row_spacing;
        }
        let sized: Vec<(ProposedSize, Size)> = cells
            .iter()
            .zip(&columns.widths)
            .map(|(&node, &width)| {
                let proposal = ProposedSize::new(Some(width), None);
                (proposal, ctx.size_for(node, proposal, env))
            })
            .collect();
        let row_height = sized.iter().map(|(_, size)| size.height).fold(0.0, f64::max);

        for (column, (&node, (proposal, size))) in cells.iter().zip(sized).enumerate() {
            let cell = Size::new(columns.widths[column], row_height);
            let h = grid.alignment.horizontal.id();
            let v = grid.alignment.vertical.id();
            let origin = Point::new(
                xs[column] + h.default_value(cell, registry) - ctx.guide(node, h, proposal, env),
                y + v.default_value(cell, registry) - ctx.guide(node, v, proposal, env),
            );
            slots.push(ChildSlot {
                index: row * columns.len() + column,
                node,
                proposal,
                env,
                origin,
                size,
            });
        }
        y += row_height;
    }

    Arrangement {
        size: Size::new(columns.total_width(), y),
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn worked_example() -> GridTracks {
        GridTracks::new(
            vec![GridTrack::flexible_range(60.0, f64::INFINITY), GridTrack::flexible_range(120.0, f64::INFINITY)],
            10.0,
        )
        .with_pixel_scale(Some(1.0))
    }

    #[test]
    fn test_layout_and_render_passes_diverge() {
        let tracks = worked_example();

        let layout = tracks.layout_pass(Some(200.0));
        assert_eq!(layout.widths, vec![95.0, 120.0]);
        assert_eq!(layout.total_width(), 225.0);

        let render = tracks.render_pass(layout.total_width());
        assert_eq!(render.widths, vec![108.0, 120.0]);
        assert_eq!(render.offsets(), vec![0.0, 118.0]);
    }

    #[test]
    fn test_rounding_can_be_disabled() {
        let tracks = worked_example().with_pixel_scale(None);
        let render = tracks.render_pass(225.0);
        assert!((render.widths[0] - 107.5).abs() < EPS);
    }

    #[test]
    fn test_fixed_tracks_are_subtracted_first() {
        let tracks = GridTracks::new(vec![GridTrack::flexible(), GridTrack::fixed(50.0), GridTrack::flexible()], 0.0);
        let columns = tracks.layout_pass(Some(250.0));
        assert_eq!(columns.widths, vec![100.0, 50.0, 100.0]);
    }

    #[test]
    fn test_flexible_max_caps_width() {
        let tracks = GridTracks::new(vec![GridTrack::flexible_range(10.0, 40.0), GridTrack::flexible()], 0.0);
        let columns = tracks.layout_pass(Some(200.0));
        assert_eq!(columns.widths, vec![40.0, 160.0]);
    }

    #[test]
    fn test_adaptive_packs_subcolumns() {
        let tracks = GridTracks::new(vec![GridTrack::adaptive(50.0)], 0.0);
        let columns = tracks.layout_pass(Some(230.0));
        assert_eq!(columns.len(), 4);
        for width in &columns.widths {
            assert!((width - 57.5).abs() < EPS);
        }

        let spaced = GridTracks::new(vec![GridTrack::adaptive(50.0)], 10.0).layout_pass(Some(230.0));
        // (230 + 10) / 60 = 4 subcolumns of (230 - 30) / 4.
        assert_eq!(spaced.widths, vec![50.0; 4]);
    }

    #[test]
    fn test_adaptive_always_has_one_subcolumn() {
        let tracks = GridTracks::new(vec![GridTrack::adaptive(80.0)], 0.0);
        assert_eq!(tracks.layout_pass(Some(30.0)).widths, vec![80.0]);
        assert_eq!(tracks.layout_pass(Some(f64::INFINITY)).len(), 1);
    }

    #[test]
    fn test_adaptive_max_caps_subcolumns() {
        let tracks = GridTracks::new(vec![GridTrack::adaptive_range(50.0, 60.0)], 0.0);
        let columns = tracks.layout_pass(Some(140.0));
        assert_eq!(columns.widths, vec![60.0, 60.0]);
    }

    #[test]
    fn test_unspecified_seed_uses_minimums() {
        let tracks = GridTracks::new(
            vec![GridTrack::fixed(30.0), GridTrack::flexible(), GridTrack::adaptive(25.0)],
            5.0,
        );
        let columns = tracks.layout_pass(None);
        assert_eq!(columns.widths, vec![30.0, 10.0, 25.0]);
        assert_eq!(columns.total_width(), 75.0);
    }

    #[test]
    fn test_track_normalization() {
        assert_eq!(
            GridTrack::flexible_range(90.0, 30.0).normalized(),
            GridTrack::Flexible { min: 30.0, max: 90.0 }
        );
        assert_eq!(GridTrack::fixed(-4.0).normalized(), GridTrack::Fixed(0.0));
    }
}
