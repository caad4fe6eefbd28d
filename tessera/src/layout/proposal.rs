//! Size proposals.
//!
//! Proposals flow down the view tree. Each axis is either a concrete length
//! or unspecified, where unspecified means "become your ideal size in this
//! axis" and is never the same thing as zero.

use serde::{Deserialize, Serialize};

use crate::primitives::{Axis, EdgeInsets, Size};

/// A size offered by a parent to a child before the child sizes itself.
///
/// Values are normalized on construction: negative lengths (and NaN) become 0.
/// Infinity is a legal proposal and is used for flexibility probing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProposedSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ProposedSize {
    /// Both axes unspecified: "become your ideal size".
    pub const UNSPECIFIED: Self = Self {
        width: None,
        height: None,
    };

    /// Zero in both axes.
    pub const ZERO: Self = Self {
        width: Some(0.0),
        height: Some(0.0),
    };

    /// Infinity in both axes.
    pub const INFINITY: Self = Self {
        width: Some(f64::INFINITY),
        height: Some(f64::INFINITY),
    };

    /// Create a proposal, clamping negative components to zero.
    #[inline]
    pub fn new(width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            width: width.map(clamp_length),
            height: height.map(clamp_length),
        }
    }

    /// Create a proposal with both axes specified.
    #[inline]
    pub fn fixed(width: f64, height: f64) -> Self {
        Self::new(Some(width), Some(height))
    }

    /// Build a proposal from main/cross components relative to `axis`.
    #[inline]
    pub fn from_axes(axis: Axis, main: Option<f64>, cross: Option<f64>) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    /// The component along `axis`.
    #[inline]
    pub fn along(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Replace the component along `axis`.
    #[inline]
    pub fn with_along(self, axis: Axis, value: Option<f64>) -> Self {
        match axis {
            Axis::Horizontal => Self::new(value, self.height),
            Axis::Vertical => Self::new(self.width, value),
        }
    }

    /// Re-apply the non-negative normalization (for values built by hand).
    #[inline]
    pub fn sanitized(self) -> Self {
        Self::new(self.width, self.height)
    }

    /// Resolve unspecified axes with the same fallback length.
    #[inline]
    pub fn replacing_unspecified_with(&self, fallback: f64) -> Size {
        self.replacing_unspecified(Size::new(fallback, fallback))
    }

    /// Resolve unspecified axes with the matching axis of `fallback`.
    #[inline]
    pub fn replacing_unspecified(&self, fallback: Size) -> Size {
        Size {
            width: self.width.unwrap_or(fallback.width),
            height: self.height.unwrap_or(fallback.height),
        }
    }

    /// Shrink specified axes by insets; unspecified axes stay unspecified.
    #[inline]
    pub fn inset(&self, insets: &EdgeInsets) -> Self {
        Self::new(
            self.width.map(|w| w - insets.along(Axis::Horizontal)),
            self.height.map(|h| h - insets.along(Axis::Vertical)),
        )
    }

    /// Bit pattern for hashing, distinguishing unspecified from every length.
    #[inline]
    pub(crate) fn key_bits(&self) -> (Option<u64>, Option<u64>) {
        (self.width.map(f64::to_bits), self.height.map(f64::to_bits))
    }
}

impl From<Size> for ProposedSize {
    fn from(size: Size) -> Self {
        Self::fixed(size.width, size.height)
    }
}

/// Negative and NaN lengths become 0; +infinity is preserved.
#[inline]
fn clamp_length(value: f64) -> f64 {
    value.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_components_clamp_to_zero() {
        let p = ProposedSize::new(Some(-5.0), Some(f64::NAN));
        assert_eq!(p, ProposedSize::ZERO);
    }

    #[test]
    fn test_unspecified_is_not_zero() {
        assert_ne!(ProposedSize::UNSPECIFIED, ProposedSize::ZERO);
        assert_ne!(ProposedSize::UNSPECIFIED.key_bits(), ProposedSize::ZERO.key_bits());
    }

    #[test]
    fn test_replacing_unspecified() {
        let p = ProposedSize::new(Some(40.0), None);
        assert_eq!(p.replacing_unspecified_with(10.0), Size::new(40.0, 10.0));
        assert_eq!(p.replacing_unspecified(Size::new(1.0, 2.0)), Size::new(40.0, 2.0));
    }

    #[test]
    fn test_axes() {
        let p = ProposedSize::from_axes(Axis::Vertical, Some(100.0), None);
        assert_eq!(p.height, Some(100.0));
        assert_eq!(p.width, None);
        assert_eq!(p.along(Axis::Vertical), Some(100.0));

        let q = p.with_along(Axis::Horizontal, Some(f64::INFINITY));
        assert_eq!(q.width, Some(f64::INFINITY));
    }

    #[test]
    fn test_inset() {
        let p = ProposedSize::new(Some(100.0), None);
        let inset = p.inset(&EdgeInsets::all(10.0));
        assert_eq!(inset.width, Some(80.0));
        assert_eq!(inset.height, None);

        let tiny = ProposedSize::fixed(5.0, 5.0).inset(&EdgeInsets::all(10.0));
        assert_eq!(tiny, ProposedSize::ZERO);
    }
}
