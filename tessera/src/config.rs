//! Engine configuration.
//!
//! Every field has a default, so a host can pass `LayoutConfig::default()` or
//! load a partial JSON document and only override what it cares about.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Size used by flexible leaves for an unspecified axis.
    pub fill_fallback: f64,
    /// Stack and grid spacing when a container does not set one.
    pub default_spacing: f64,
    /// Minimum length of a spacer that does not set one.
    pub spacer_min_length: f64,
    /// Padding applied by `padding_default`.
    pub default_padding: f64,
    /// Grid track widths are rounded to `1 / scale` points. `None` disables rounding.
    pub grid_pixel_scale: Option<f64>,
    /// Deepest nesting accepted before validation fails. Sizing recurses once
    /// per level, so the default leaves headroom on a 2 MiB thread stack.
    pub max_depth: usize,
    /// Memoize `size_for` results within a pass.
    pub memoize: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fill_fallback: 10.0,
            default_spacing: 8.0,
            spacer_min_length: 8.0,
            default_padding: 16.0,
            grid_pixel_scale: Some(1.0),
            max_depth: 160,
            memoize: true,
        }
    }
}

impl LayoutConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Clamp out-of-range values instead of rejecting them.
    pub(crate) fn normalized(mut self) -> Self {
        self.fill_fallback = self.fill_fallback.max(0.0);
        self.default_spacing = self.default_spacing.max(0.0);
        self.spacer_min_length = self.spacer_min_length.max(0.0);
        self.default_padding = self.default_padding.max(0.0);
        self.grid_pixel_scale = self.grid_pixel_scale.filter(|s| s.is_finite() && *s > 0.0);
        self
    }
}
