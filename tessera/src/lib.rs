//! Tessera: declarative layout resolution.
//!
//! Tessera resolves the size and position of every node in a tree of
//! declaratively composed views:
//! - Parents propose sizes, each axis optionally unspecified
//! - Children report a concrete size of their own choosing
//! - Parents place children by lining up alignment guides
//!
//! # Architecture
//!
//! A host builds a [`ViewTree`] (an arena of nodes addressed by [`NodeId`]),
//! supplies [`LeafMetrics`] for text and images, and calls [`layout`]. The
//! result is a [`PlacementTree`] of rectangles in root coordinates, keyed by
//! position in the tree with optional explicit ids layered on top.
//!
//! # Usage
//!
//! ```
//! use tessera::{layout, LayoutConfig, MonospaceMetrics, Size, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let title = tree.text("Hello");
//! let fill = tree.fill();
//! let root = tree.hstack([title, fill]);
//!
//! let placements = layout(
//!     &tree,
//!     root,
//!     Size::new(320.0, 44.0),
//!     &MonospaceMetrics::new(),
//!     &LayoutConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(placements.len(), 3);
//! ```

// Core primitives
pub mod primitives;

// Configuration and errors
pub mod config;
pub mod error;

// Layout system
pub mod layout;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use layout::*;
pub use primitives::{Axis, EdgeInsets, Point, Rect, Size};
