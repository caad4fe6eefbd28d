//! Leaf sizing policies and the host-supplied measurement oracle.
//!
//! Leaves never have children. Each policy turns a proposal into a reported
//! size without side effects:
//!
//! - `Fixed`: ignores the proposal (intrinsic-size content).
//! - `Fill`: becomes the proposal, unspecified axes become the fill fallback.
//! - `Shape`: largest size with an exact aspect ratio inside the proposal.
//! - `Text`: wraps to the proposed width, at least one line tall.
//! - `Image`: intrinsic size, or flexible when resizable.
//! - `Spacer`: flexible along the enclosing stack's axis, zero across it.

use indexmap::IndexMap;
use unicode_width::UnicodeWidthChar;

use crate::config::LayoutConfig;
use crate::primitives::{Axis, Size};

use super::alignment::{resolve_guide, AlignmentId, AlignmentRegistry, GuideOverrides};
use super::proposal::ProposedSize;
use super::sizable::Sizable;

// Metrics for the built-in monospace approximation.
pub const CHAR_WIDTH: f64 = 8.4;
pub const LINE_HEIGHT: f64 = 18.0;

/// A leaf sizing policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// Always reports this size.
    Fixed(Size),
    /// Fully flexible fill (colors, rectangles).
    Fill,
    /// Fixed aspect ratio (`width / height`) fitted into the proposal.
    Shape { ratio: f64 },
    /// Text measured by the host oracle.
    Text(String),
    /// Image with an intrinsic size looked up by name.
    Image { name: String, resizable: bool },
    /// Stack spacer with a minimum length (config default when `None`).
    Spacer { min_length: Option<f64> },
}

// =========================================================================
// Host oracle
// =========================================================================

/// Measurement capability supplied by the host.
///
/// Implementations must be pure for the duration of a layout pass.
pub trait LeafMetrics {
    /// Size of `text` laid out at `width` (`None` = single-line ideal size).
    fn text_size(&self, text: &str, width: Option<f64>) -> Size;

    /// Height of one line of `text`.
    fn line_height(&self, text: &str) -> f64;

    /// Distance from the top of the text frame to the first baseline.
    fn first_baseline(&self, text: &str, _size: Size) -> f64 {
        self.line_height(text) * 0.8
    }

    /// Distance from the top of the text frame to the last baseline.
    fn last_baseline(&self, text: &str, size: Size) -> f64 {
        size.height - self.line_height(text) * 0.2
    }

    /// Intrinsic size of the image called `name`.
    fn image_size(&self, name: &str) -> Size;
}

/// Fixed-advance text metrics with greedy word wrapping.
///
/// Good enough for tests and headless hosts; real hosts supply shaped metrics.
#[derive(Debug, Clone)]
pub struct MonospaceMetrics {
    pub char_width: f64,
    pub line_height: f64,
    images: IndexMap<String, Size>,
    pub default_image_size: Size,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: CHAR_WIDTH,
            line_height: LINE_HEIGHT,
            images: IndexMap::new(),
            default_image_size: Size::new(20.0, 20.0),
        }
    }
}

impl MonospaceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image's intrinsic size.
    pub fn with_image(mut self, name: impl Into<String>, size: Size) -> Self {
        self.images.insert(name.into(), size);
        self
    }

    /// Column counts of each wrapped line.
    fn wrap(&self, text: &str, width: Option<f64>) -> Vec<usize> {
        let max_chars = match width {
            Some(w) if w.is_finite() => ((w / self.char_width).floor() as usize).max(1),
            _ => usize::MAX,
        };

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = 0usize;
            for word in paragraph.split_whitespace() {
                let mut len = display_columns(word);
                if current > 0 && current + 1 + len <= max_chars {
                    current += 1 + len;
                    continue;
                }
                if current > 0 {
                    lines.push(current);
                }
                // Words longer than a line are broken at the line length.
                while len > max_chars {
                    lines.push(max_chars);
                    len -= max_chars;
                }
                current = len;
            }
            lines.push(current);
        }
        lines
    }
}

/// Terminal-style cell count: wide glyphs take two columns, controls none.
fn display_columns(text: &str) -> usize {
    text.chars().map(|c| UnicodeWidthChar::width(c).unwrap_or(0)).sum()
}

impl LeafMetrics for MonospaceMetrics {
    fn text_size(&self, text: &str, width: Option<f64>) -> Size {
        let lines = self.wrap(text, width);
        let longest = lines.iter().copied().max().unwrap_or(0);
        Size::new(
            longest as f64 * self.char_width,
            lines.len() as f64 * self.line_height,
        )
    }

    fn line_height(&self, _text: &str) -> f64 {
        self.line_height
    }

    fn image_size(&self, name: &str) -> Size {
        self.images.get(name).copied().unwrap_or(self.default_image_size)
    }
}

// =========================================================================
// Sizing policies
// =========================================================================

/// Fully flexible: the proposal, with unspecified axes set to `fallback`.
#[inline]
pub fn fill_size(proposal: ProposedSize, fallback: f64) -> Size {
    proposal.replacing_unspecified_with(fallback)
}

/// Aspect-constrained: the largest `ratio`-exact size inside the proposal.
pub fn aspect_fit_size(proposal: ProposedSize, ratio: f64, fallback: f64) -> Size {
    let ratio = normalize_ratio(ratio);
    let resolved = proposal.replacing_unspecified_with(fallback);
    let width_for_height = resolved.height * ratio;
    if resolved.width >= width_for_height {
        Size::new(width_for_height, resolved.height)
    } else {
        Size::new(resolved.width, resolved.width / ratio)
    }
}

/// Wrap-then-truncate text: at most the proposed width, at least one line tall.
pub fn text_size(proposal: ProposedSize, text: &str, metrics: &dyn LeafMetrics) -> Size {
    if proposal == ProposedSize::ZERO {
        return Size::ZERO;
    }
    let line = metrics.line_height(text).max(0.0);
    match proposal.width {
        None => {
            let ideal = metrics.text_size(text, None);
            Size::new(ideal.width, ideal.height.max(line))
        }
        Some(width) => {
            let wrapped = metrics.text_size(text, Some(width));
            Size::new(wrapped.width.min(width), wrapped.height.max(line))
        }
    }
}

/// Spacer sizing. Inside a stack it only grows along the stack axis.
pub fn spacer_size(proposal: ProposedSize, min_length: f64, stack_axis: Option<Axis>) -> Size {
    let min_length = min_length.max(0.0);
    match stack_axis {
        Some(axis) => {
            let main = proposal.along(axis).unwrap_or(min_length).max(min_length);
            Size::from_axes(axis, main, 0.0)
        }
        None => proposal.replacing_unspecified_with(min_length),
    }
}

/// Size any leaf policy.
pub fn leaf_size(
    leaf: &Leaf,
    proposal: ProposedSize,
    metrics: &dyn LeafMetrics,
    config: &LayoutConfig,
    stack_axis: Option<Axis>,
) -> Size {
    let size = match leaf {
        Leaf::Fixed(size) => *size,
        Leaf::Fill => fill_size(proposal, config.fill_fallback),
        Leaf::Shape { ratio } => aspect_fit_size(proposal, *ratio, config.fill_fallback),
        Leaf::Text(text) => text_size(proposal, text, metrics),
        Leaf::Image { name, resizable: false } => metrics.image_size(name),
        Leaf::Image { name, resizable: true } => proposal.replacing_unspecified(metrics.image_size(name)),
        Leaf::Spacer { min_length } => spacer_size(
            proposal,
            min_length.unwrap_or(config.spacer_min_length),
            stack_axis,
        ),
    };
    size.non_negative()
}

/// Guides a leaf defines on its own (text baselines).
pub fn leaf_explicit_guide(
    leaf: &Leaf,
    id: AlignmentId,
    size: Size,
    metrics: &dyn LeafMetrics,
) -> Option<f64> {
    match leaf {
        Leaf::Text(text) if id.is_first_baseline() => Some(metrics.first_baseline(text, size)),
        Leaf::Text(text) if id.is_last_baseline() => Some(metrics.last_baseline(text, size)),
        _ => None,
    }
}

/// Non-positive or non-finite ratios are treated as square.
#[inline]
pub(crate) fn normalize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 }
}

// =========================================================================
// Standalone leaf handle
// =========================================================================

/// A leaf bound to its metrics and config, usable on its own as a [`Sizable`].
///
/// Custom guide defaults come from `registry`, normally the owning tree's
/// [`ViewTree::alignments`](super::tree::ViewTree::alignments).
pub struct LeafView<'a> {
    leaf: &'a Leaf,
    metrics: &'a dyn LeafMetrics,
    config: &'a LayoutConfig,
    registry: &'a AlignmentRegistry,
    stack_axis: Option<Axis>,
    overrides: Option<&'a GuideOverrides>,
}

impl<'a> LeafView<'a> {
    pub fn new(
        leaf: &'a Leaf,
        metrics: &'a dyn LeafMetrics,
        config: &'a LayoutConfig,
        registry: &'a AlignmentRegistry,
    ) -> Self {
        Self {
            leaf,
            metrics,
            config,
            registry,
            stack_axis: None,
            overrides: None,
        }
    }

    /// Size as a direct child of a stack along `axis`.
    pub fn in_stack(mut self, axis: Axis) -> Self {
        self.stack_axis = Some(axis);
        self
    }

    /// Attach explicit guide overrides.
    pub fn with_overrides(mut self, overrides: &'a GuideOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }
}

impl Sizable for LeafView<'_> {
    fn size_for(&self, proposal: ProposedSize) -> Size {
        leaf_size(self.leaf, proposal.sanitized(), self.metrics, self.config, self.stack_axis)
    }

    fn guide(&self, id: AlignmentId, size: Size) -> f64 {
        let none = GuideOverrides::default();
        resolve_guide(self.overrides.unwrap_or(&none), self.registry, id, size, || {
            leaf_explicit_guide(self.leaf, id, size, self.metrics)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_fill_replaces_unspecified() {
        assert_eq!(fill_size(ProposedSize::new(Some(30.0), None), 10.0), Size::new(30.0, 10.0));
        assert_eq!(fill_size(ProposedSize::UNSPECIFIED, 10.0), Size::new(10.0, 10.0));
        assert_eq!(fill_size(ProposedSize::ZERO, 10.0), Size::ZERO);
    }

    #[test]
    fn test_aspect_fit_keeps_ratio_within_proposal() {
        let ratio = 0.5;
        for (w, h) in [(100.0, 100.0), (10.0, 300.0), (300.0, 10.0), (0.0, 50.0), (7.5, 3.25)] {
            let size = aspect_fit_size(ProposedSize::fixed(w, h), ratio, 10.0);
            assert!(size.width <= w + EPS, "{size:?} wider than {w}");
            assert!(size.height <= h + EPS, "{size:?} taller than {h}");
            if size.height > 0.0 {
                assert!(approx(size.width / size.height, ratio));
            }
        }
    }

    #[test]
    fn test_aspect_fit_unspecified_uses_fallback() {
        let size = aspect_fit_size(ProposedSize::UNSPECIFIED, 2.0, 10.0);
        assert_eq!(size, Size::new(10.0, 5.0));
    }

    #[test]
    fn test_aspect_fit_zero_and_bad_ratio() {
        assert_eq!(aspect_fit_size(ProposedSize::ZERO, 0.5, 10.0), Size::ZERO);
        // Negative ratio is treated as square.
        assert_eq!(aspect_fit_size(ProposedSize::fixed(40.0, 20.0), -3.0, 10.0), Size::new(20.0, 20.0));
    }

    #[test]
    fn test_text_ideal_and_wrapped() {
        let metrics = MonospaceMetrics::new();
        let ideal = text_size(ProposedSize::UNSPECIFIED, "Hello World", &metrics);
        assert!(approx(ideal.width, 11.0 * CHAR_WIDTH));
        assert_eq!(ideal.height, LINE_HEIGHT);

        let wrapped = text_size(ProposedSize::new(Some(6.0 * CHAR_WIDTH), None), "Hello World", &metrics);
        assert!(approx(wrapped.width, 5.0 * CHAR_WIDTH));
        assert_eq!(wrapped.height, 2.0 * LINE_HEIGHT);
    }

    #[test]
    fn test_text_never_zero_unless_zero_proposed() {
        let metrics = MonospaceMetrics::new();
        assert_eq!(text_size(ProposedSize::ZERO, "Hello", &metrics), Size::ZERO);

        let narrow = text_size(ProposedSize::fixed(0.0, 100.0), "Hello", &metrics);
        assert_eq!(narrow.width, 0.0);
        assert!(narrow.height >= LINE_HEIGHT);

        let empty = text_size(ProposedSize::UNSPECIFIED, "", &metrics);
        assert_eq!(empty.height, LINE_HEIGHT);
    }

    #[test]
    fn test_monospace_breaks_long_words() {
        let metrics = MonospaceMetrics::new();
        let size = metrics.text_size("abcdefghij", Some(4.0 * CHAR_WIDTH));
        // 4 + 4 + 2 characters.
        assert_eq!(size.height, 3.0 * LINE_HEIGHT);
        assert!(approx(size.width, 4.0 * CHAR_WIDTH));
    }

    #[test]
    fn test_monospace_counts_wide_glyphs_twice() {
        let metrics = MonospaceMetrics::new();
        let size = metrics.text_size("日本", None);
        assert!(approx(size.width, 4.0 * CHAR_WIDTH));
    }

    #[test]
    fn test_spacer_in_and_out_of_stack() {
        let p = ProposedSize::fixed(50.0, 40.0);
        assert_eq!(spacer_size(p, 8.0, Some(Axis::Horizontal)), Size::new(50.0, 0.0));
        assert_eq!(spacer_size(p, 8.0, Some(Axis::Vertical)), Size::new(0.0, 40.0));
        assert_eq!(spacer_size(ProposedSize::ZERO, 8.0, Some(Axis::Horizontal)), Size::new(8.0, 0.0));
        assert_eq!(spacer_size(ProposedSize::UNSPECIFIED, 8.0, None), Size::new(8.0, 8.0));
    }

    #[test]
    fn test_images() {
        let metrics = MonospaceMetrics::new().with_image("globe", Size::new(24.0, 22.0));
        let config = LayoutConfig::default();
        let fixed = Leaf::Image { name: "globe".into(), resizable: false };
        let resizable = Leaf::Image { name: "globe".into(), resizable: true };

        let p = ProposedSize::new(Some(100.0), None);
        assert_eq!(leaf_size(&fixed, p, &metrics, &config, None), Size::new(24.0, 22.0));
        assert_eq!(leaf_size(&resizable, p, &metrics, &config, None), Size::new(100.0, 22.0));
    }

    #[test]
    fn test_leaf_view_guides() {
        let metrics = MonospaceMetrics::new();
        let config = LayoutConfig::default();
        let registry = AlignmentRegistry::new();
        let text = Leaf::Text("Doggo".into());
        let view = LeafView::new(&text, &metrics, &config, &registry);

        let size = view.size_for(ProposedSize::UNSPECIFIED);
        assert!(approx(view.guide(AlignmentId::FIRST_TEXT_BASELINE, size), LINE_HEIGHT * 0.8));
        assert_eq!(view.guide(AlignmentId::TRAILING, size), size.width);
    }

    #[test]
    fn test_leaf_view_uses_registered_custom_default() {
        let metrics = MonospaceMetrics::new();
        let config = LayoutConfig::default();
        let mut registry = AlignmentRegistry::new();
        let quarter = registry.register_horizontal("quarter", |size| size.width / 4.0);
        let fixed = Leaf::Fixed(Size::new(40.0, 10.0));

        let mut overrides = GuideOverrides::default();
        overrides.insert(AlignmentId::TOP, std::sync::Arc::new(|_: Size| 3.0));
        let view = LeafView::new(&fixed, &metrics, &config, &registry).with_overrides(&overrides);

        let size = view.size_for(ProposedSize::UNSPECIFIED);
        assert_eq!(view.guide(quarter.id(), size), 10.0);
        assert_eq!(view.guide(AlignmentId::TOP, size), 3.0);
    }
}
