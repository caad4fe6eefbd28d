//! Layout system for Tessera.
//!
//! A layout pass is a negotiation between parents and children:
//!
//! ```text
//! proposal (maybe unspecified) -> child sizes itself -> parent places child by guides
//! ```
//!
//! Nothing here paints, owns application state, or handles input. The pass
//! consumes a [`ViewTree`] plus host [`LeafMetrics`] and produces a
//! [`PlacementTree`].

pub mod alignment;
pub mod arrange;
pub mod cache;
pub mod compose;
pub mod containers;
pub mod context;
pub mod engine;
pub mod flow;
pub mod frame;
pub mod grid;
pub mod leaf;
pub mod placement;
pub mod proposal;
pub mod sizable;
pub mod stack;
pub mod tree;

// Re-export core types
pub use alignment::{
    resolve_guide, Alignment, AlignmentId, AlignmentRegistry, GuideFn, GuideOverrides, HorizontalAlignment,
    VerticalAlignment,
};
pub use arrange::{Arrangement, ChildSlot, SizingEnv};
pub use context::LayoutContext;
pub use engine::{layout, Engine, NodeHandle};
pub use leaf::{Leaf, LeafMetrics, LeafView, MonospaceMetrics};
pub use placement::{NodeKey, PlacedNode, PlacementTree};
pub use proposal::ProposedSize;
pub use sizable::Sizable;
pub use tree::{NodeData, NodeId, NodeKind, ViewTree};

// Re-export containers and modifiers
pub use compose::{Layer, Layered, ZStack};
pub use containers::ScrollAxes;
pub use flow::Flow;
pub use frame::{AxisBounds, ContentMode, FlexibleFrame, FrameSpec};
pub use grid::{Grid, GridColumns, GridTrack, GridTracks};
pub use stack::Stack;
