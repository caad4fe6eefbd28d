//! Alignment identifiers, guide overrides, and the guide resolver.
//!
//! An alignment guide is a coordinate along one axis, in a node's own frame,
//! that containers line up across siblings. Every identifier has a structural
//! default (`leading -> 0`, `center -> length / 2`, ...). Custom identifiers
//! are registered with their own default function. A node may carry explicit
//! overrides that win over the default for that node only.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::primitives::{Axis, Size};

/// Computes a guide value from a node's reported size.
pub type GuideFn = Arc<dyn Fn(Size) -> f64 + Send + Sync>;

/// Identifier of one alignment guide on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AlignmentId {
    axis: Axis,
    key: GuideKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
enum GuideKey {
    Start,
    Center,
    End,
    FirstTextBaseline,
    LastTextBaseline,
    Custom(u32),
}

impl AlignmentId {
    pub const LEADING: Self = Self::builtin(Axis::Horizontal, GuideKey::Start);
    pub const HORIZONTAL_CENTER: Self = Self::builtin(Axis::Horizontal, GuideKey::Center);
    pub const TRAILING: Self = Self::builtin(Axis::Horizontal, GuideKey::End);
    pub const TOP: Self = Self::builtin(Axis::Vertical, GuideKey::Start);
    pub const VERTICAL_CENTER: Self = Self::builtin(Axis::Vertical, GuideKey::Center);
    pub const BOTTOM: Self = Self::builtin(Axis::Vertical, GuideKey::End);
    pub const FIRST_TEXT_BASELINE: Self = Self::builtin(Axis::Vertical, GuideKey::FirstTextBaseline);
    pub const LAST_TEXT_BASELINE: Self = Self::builtin(Axis::Vertical, GuideKey::LastTextBaseline);

    const fn builtin(axis: Axis, key: GuideKey) -> Self {
        Self { axis, key }
    }

    /// The axis this guide measures along.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(self.key, GuideKey::Custom(_))
    }

    #[inline]
    pub(crate) fn is_first_baseline(&self) -> bool {
        matches!(self.key, GuideKey::FirstTextBaseline)
    }

    #[inline]
    pub(crate) fn is_last_baseline(&self) -> bool {
        matches!(self.key, GuideKey::LastTextBaseline)
    }

    /// Structural default for this identifier given a node's size.
    ///
    /// Baselines default to the bottom edge (nodes without text have no
    /// baseline). Unknown custom identifiers fall back to the center.
    pub fn default_value(&self, size: Size, registry: &AlignmentRegistry) -> f64 {
        let length = size.along(self.axis);
        match self.key {
            GuideKey::Start => 0.0,
            GuideKey::Center => length / 2.0,
            GuideKey::End => length,
            GuideKey::FirstTextBaseline | GuideKey::LastTextBaseline => size.height,
            GuideKey::Custom(index) => registry
                .default_fn(index)
                .map(|f| f(size))
                .unwrap_or(length / 2.0),
        }
    }
}

// =========================================================================
// Typed wrappers
// =========================================================================

/// An alignment identifier on the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HorizontalAlignment(AlignmentId);

impl HorizontalAlignment {
    pub const LEADING: Self = Self(AlignmentId::LEADING);
    pub const CENTER: Self = Self(AlignmentId::HORIZONTAL_CENTER);
    pub const TRAILING: Self = Self(AlignmentId::TRAILING);

    #[inline]
    pub fn id(self) -> AlignmentId {
        self.0
    }
}

impl Default for HorizontalAlignment {
    fn default() -> Self {
        Self::CENTER
    }
}

/// An alignment identifier on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VerticalAlignment(AlignmentId);

impl VerticalAlignment {
    pub const TOP: Self = Self(AlignmentId::TOP);
    pub const CENTER: Self = Self(AlignmentId::VERTICAL_CENTER);
    pub const BOTTOM: Self = Self(AlignmentId::BOTTOM);
    pub const FIRST_TEXT_BASELINE: Self = Self(AlignmentId::FIRST_TEXT_BASELINE);
    pub const LAST_TEXT_BASELINE: Self = Self(AlignmentId::LAST_TEXT_BASELINE);

    #[inline]
    pub fn id(self) -> AlignmentId {
        self.0
    }
}

impl Default for VerticalAlignment {
    fn default() -> Self {
        Self::CENTER
    }
}

impl From<HorizontalAlignment> for AlignmentId {
    fn from(alignment: HorizontalAlignment) -> Self {
        alignment.0
    }
}

impl From<VerticalAlignment> for AlignmentId {
    fn from(alignment: VerticalAlignment) -> Self {
        alignment.0
    }
}

/// A pair of horizontal and vertical alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl Alignment {
    pub const CENTER: Self = Self::new(HorizontalAlignment::CENTER, VerticalAlignment::CENTER);
    pub const TOP_LEADING: Self = Self::new(HorizontalAlignment::LEADING, VerticalAlignment::TOP);
    pub const TOP: Self = Self::new(HorizontalAlignment::CENTER, VerticalAlignment::TOP);
    pub const TOP_TRAILING: Self = Self::new(HorizontalAlignment::TRAILING, VerticalAlignment::TOP);
    pub const LEADING: Self = Self::new(HorizontalAlignment::LEADING, VerticalAlignment::CENTER);
    pub const TRAILING: Self = Self::new(HorizontalAlignment::TRAILING, VerticalAlignment::CENTER);
    pub const BOTTOM_LEADING: Self = Self::new(HorizontalAlignment::LEADING, VerticalAlignment::BOTTOM);
    pub const BOTTOM: Self = Self::new(HorizontalAlignment::CENTER, VerticalAlignment::BOTTOM);
    pub const BOTTOM_TRAILING: Self = Self::new(HorizontalAlignment::TRAILING, VerticalAlignment::BOTTOM);

    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self { horizontal, vertical }
    }

    /// The identifier used on `axis`.
    #[inline]
    pub fn along(&self, axis: Axis) -> AlignmentId {
        match axis {
            Axis::Horizontal => self.horizontal.id(),
            Axis::Vertical => self.vertical.id(),
        }
    }
}

// =========================================================================
// Registry of custom identifiers
// =========================================================================

struct CustomAlignment {
    id: AlignmentId,
    default: GuideFn,
}

/// Custom alignment identifiers and their default-value functions.
#[derive(Default)]
pub struct AlignmentRegistry {
    custom: IndexMap<String, CustomAlignment>,
}

impl AlignmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or redefine) a custom identifier on `axis`.
    ///
    /// Registering an existing name again keeps its identifier and replaces
    /// the default function.
    pub fn register(
        &mut self,
        name: &str,
        axis: Axis,
        default: impl Fn(Size) -> f64 + Send + Sync + 'static,
    ) -> AlignmentId {
        if let Some(existing) = self.custom.get_mut(name) {
            if existing.id.axis != axis {
                tracing::warn!(name, ?axis, "custom alignment re-registered on a different axis; keeping original axis");
            }
            existing.default = Arc::new(default);
            return existing.id;
        }
        let id = AlignmentId {
            axis,
            key: GuideKey::Custom(self.custom.len() as u32),
        };
        self.custom.insert(name.to_string(), CustomAlignment { id, default: Arc::new(default) });
        id
    }

    /// Register a custom horizontal identifier.
    pub fn register_horizontal(
        &mut self,
        name: &str,
        default: impl Fn(Size) -> f64 + Send + Sync + 'static,
    ) -> HorizontalAlignment {
        HorizontalAlignment(self.register(name, Axis::Horizontal, default))
    }

    /// Register a custom vertical identifier.
    pub fn register_vertical(
        &mut self,
        name: &str,
        default: impl Fn(Size) -> f64 + Send + Sync + 'static,
    ) -> VerticalAlignment {
        VerticalAlignment(self.register(name, Axis::Vertical, default))
    }

    /// Name a custom identifier was registered under.
    pub fn name_of(&self, id: AlignmentId) -> Option<&str> {
        match id.key {
            GuideKey::Custom(index) => self.custom.get_index(index as usize).map(|(name, _)| name.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }

    fn default_fn(&self, index: u32) -> Option<&GuideFn> {
        self.custom.get_index(index as usize).map(|(_, custom)| &custom.default)
    }
}

impl fmt::Debug for AlignmentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.custom.keys()).finish()
    }
}

// =========================================================================
// Per-node overrides
// =========================================================================

/// Explicit alignment guides attached to a single node.
#[derive(Clone, Default)]
pub struct GuideOverrides {
    entries: IndexMap<AlignmentId, GuideFn>,
}

impl GuideOverrides {
    pub fn insert(&mut self, id: AlignmentId, f: GuideFn) {
        self.entries.insert(id, f);
    }

    pub fn get(&self, id: AlignmentId) -> Option<&GuideFn> {
        self.entries.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate the override for `id`, if any.
    #[inline]
    pub fn explicit(&self, id: AlignmentId, size: Size) -> Option<f64> {
        self.entries.get(&id).map(|f| f(size))
    }
}

impl fmt::Debug for GuideOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Resolve a node's guide.
///
/// The node's own override wins, then whatever `inherited` reports (text
/// baselines, values bubbled up from children), then the identifier's
/// default from `registry`.
pub fn resolve_guide(
    overrides: &GuideOverrides,
    registry: &AlignmentRegistry,
    id: AlignmentId,
    size: Size,
    inherited: impl FnOnce() -> Option<f64>,
) -> f64 {
    overrides
        .explicit(id, size)
        .or_else(inherited)
        .unwrap_or_else(|| id.default_value(size, registry))
}
