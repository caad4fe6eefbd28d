//! The view description tree.
//!
//! Nodes live in an arena owned by [`ViewTree`] and refer to their children
//! by [`NodeId`]. The tree is immutable during a layout pass; a host builds
//! (or edits) it between passes. Because children are plain ids, subtrees
//! can be shared and a host can accidentally build a cycle, which
//! [`ViewTree::validate`] reports before any sizing happens.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::primitives::{Axis, EdgeInsets, Point, Size};

use super::alignment::{
    Alignment, AlignmentId, AlignmentRegistry, GuideOverrides, HorizontalAlignment,
    VerticalAlignment,
};
use super::compose::{Layer, Layered, ZStack};
use super::containers::ScrollAxes;
use super::flow::Flow;
use super::frame::{ContentMode, FlexibleFrame, FrameSpec};
use super::grid::Grid;
use super::leaf::Leaf;
use super::stack::Stack;

/// Handle to a node in a [`ViewTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is and how it lays out its children.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf(Leaf),
    Stack(Stack),
    ZStack(ZStack),
    Layered(Layered),
    Grid(Grid),
    Flow(Flow),
    Frame { spec: FrameSpec, alignment: Alignment, child: NodeId },
    /// `None` insets use the configured default padding on every edge.
    Padding { insets: Option<EdgeInsets>, child: NodeId },
    FixedSize { horizontal: bool, vertical: bool, child: NodeId },
    AspectRatio { ratio: Option<f64>, mode: ContentMode, child: NodeId },
    /// Render-only translation; does not affect sizing or alignment.
    Offset { offset: Point, child: NodeId },
    LayoutPriority { priority: f64, child: NodeId },
    ScrollView { axes: ScrollAxes, child: NodeId },
    GeometryReader { child: Option<NodeId> },
    ViewThatFits { children: Vec<NodeId> },
}

impl NodeKind {
    /// Children in declaration order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Leaf(_) => Vec::new(),
            NodeKind::Stack(stack) => stack.children.clone(),
            NodeKind::ZStack(zstack) => zstack.children.clone(),
            NodeKind::Layered(layered) => vec![layered.primary, layered.secondary],
            NodeKind::Grid(grid) => grid.children.clone(),
            NodeKind::Flow(flow) => flow.children.clone(),
            NodeKind::ViewThatFits { children } => children.clone(),
            NodeKind::GeometryReader { child } => child.iter().copied().collect(),
            NodeKind::Frame { child, .. }
            | NodeKind::Padding { child, .. }
            | NodeKind::FixedSize { child, .. }
            | NodeKind::AspectRatio { child, .. }
            | NodeKind::Offset { child, .. }
            | NodeKind::LayoutPriority { child, .. }
            | NodeKind::ScrollView { child, .. } => vec![*child],
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Leaf(Leaf::Fixed(_)) => "Fixed",
            NodeKind::Leaf(Leaf::Fill) => "Fill",
            NodeKind::Leaf(Leaf::Shape { .. }) => "Shape",
            NodeKind::Leaf(Leaf::Text(_)) => "Text",
            NodeKind::Leaf(Leaf::Image { .. }) => "Image",
            NodeKind::Leaf(Leaf::Spacer { .. }) => "Spacer",
            NodeKind::Stack(Stack { axis: Axis::Horizontal, .. }) => "HStack",
            NodeKind::Stack(Stack { axis: Axis::Vertical, .. }) => "VStack",
            NodeKind::ZStack(_) => "ZStack",
            NodeKind::Layered(Layered { layer: Layer::Overlay, .. }) => "Overlay",
            NodeKind::Layered(Layered { layer: Layer::Background, .. }) => "Background",
            NodeKind::Grid(_) => "Grid",
            NodeKind::Flow(_) => "Flow",
            NodeKind::Frame { .. } => "Frame",
            NodeKind::Padding { .. } => "Padding",
            NodeKind::FixedSize { .. } => "FixedSize",
            NodeKind::AspectRatio { .. } => "AspectRatio",
            NodeKind::Offset { .. } => "Offset",
            NodeKind::LayoutPriority { .. } => "LayoutPriority",
            NodeKind::ScrollView { .. } => "ScrollView",
            NodeKind::GeometryReader { .. } => "GeometryReader",
            NodeKind::ViewThatFits { .. } => "ViewThatFits",
        }
    }
}

/// A node plus its identity and guide overrides.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub explicit_id: Option<String>,
    pub guides: GuideOverrides,
}

/// Arena of view nodes plus the custom alignment registry they use.
#[derive(Debug, Default)]
pub struct ViewTree {
    nodes: Vec<NodeData>,
    alignments: AlignmentRegistry,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Access a node known to exist (validated before every pass).
    #[inline]
    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn alignments(&self) -> &AlignmentRegistry {
        &self.alignments
    }

    /// Add a node of any kind.
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            explicit_id: None,
            guides: GuideOverrides::default(),
        });
        id
    }

    // =====================================================================
    // Leaves
    // =====================================================================

    pub fn fill(&mut self) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Fill))
    }

    pub fn fixed(&mut self, width: f64, height: f64) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Fixed(Size::new(width, height).non_negative())))
    }

    /// A shape locked to `ratio = width / height`.
    pub fn shape(&mut self, ratio: f64) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Shape { ratio }))
    }

    pub fn circle(&mut self) -> NodeId {
        self.shape(1.0)
    }

    pub fn text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Text(text.into())))
    }

    pub fn image(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Image { name: name.into(), resizable: false }))
    }

    pub fn resizable_image(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Image { name: name.into(), resizable: true }))
    }

    pub fn spacer(&mut self) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Spacer { min_length: None }))
    }

    pub fn spacer_min(&mut self, min_length: f64) -> NodeId {
        self.push(NodeKind::Leaf(Leaf::Spacer { min_length: Some(min_length) }))
    }

    // =====================================================================
    // Containers
    // =====================================================================

    pub fn stack(&mut self, stack: Stack) -> NodeId {
        self.push(NodeKind::Stack(stack))
    }

    /// Horizontal stack, vertically centered, default spacing.
    pub fn hstack(&mut self, children: impl Into<Vec<NodeId>>) -> NodeId {
        self.stack(Stack::horizontal(children.into()))
    }

    pub fn hstack_with(
        &mut self,
        alignment: VerticalAlignment,
        spacing: Option<f64>,
        children: impl Into<Vec<NodeId>>,
    ) -> NodeId {
        let mut stack = Stack::horizontal(children.into()).align(alignment);
        stack.spacing = spacing;
        self.stack(stack)
    }

    /// Vertical stack, horizontally centered, default spacing.
    pub fn vstack(&mut self, children: impl Into<Vec<NodeId>>) -> NodeId {
        self.stack(Stack::vertical(children.into()))
    }

    pub fn vstack_with(
        &mut self,
        alignment: HorizontalAlignment,
        spacing: Option<f64>,
        children: impl Into<Vec<NodeId>>,
    ) -> NodeId {
        let mut stack = Stack::vertical(children.into()).align(alignment);
        stack.spacing = spacing;
        self.stack(stack)
    }

    pub fn zstack(&mut self, children: impl Into<Vec<NodeId>>) -> NodeId {
        self.zstack_aligned(Alignment::CENTER, children)
    }

    pub fn zstack_aligned(&mut self, alignment: Alignment, children: impl Into<Vec<NodeId>>) -> NodeId {
        self.push(NodeKind::ZStack(ZStack { alignment, children: children.into() }))
    }

    /// `secondary` drawn over `primary`; only `primary` determines the size.
    pub fn overlay(&mut self, primary: NodeId, secondary: NodeId, alignment: Alignment) -> NodeId {
        self.push(NodeKind::Layered(Layered { layer: Layer::Overlay, alignment, primary, secondary }))
    }

    /// `secondary` drawn behind `primary`; only `primary` determines the size.
    pub fn background(&mut self, primary: NodeId, secondary: NodeId, alignment: Alignment) -> NodeId {
        self.push(NodeKind::Layered(Layered { layer: Layer::Background, alignment, primary, secondary }))
    }

    pub fn grid(&mut self, grid: Grid) -> NodeId {
        self.push(NodeKind::Grid(grid))
    }

    pub fn flow(&mut self, flow: Flow) -> NodeId {
        self.push(NodeKind::Flow(flow))
    }

    pub fn scroll_view(&mut self, child: NodeId, axes: ScrollAxes) -> NodeId {
        self.push(NodeKind::ScrollView { axes, child })
    }

    pub fn geometry_reader(&mut self, child: Option<NodeId>) -> NodeId {
        self.push(NodeKind::GeometryReader { child })
    }

    pub fn view_that_fits(&mut self, children: impl Into<Vec<NodeId>>) -> NodeId {
        self.push(NodeKind::ViewThatFits { children: children.into() })
    }

    // =====================================================================
    // Modifiers
    // =====================================================================

    /// Fixed frame; absent dimensions pass the proposal through.
    pub fn frame(&mut self, child: NodeId, width: Option<f64>, height: Option<f64>, alignment: Alignment) -> NodeId {
        let spec = FrameSpec::Fixed {
            width: width.map(|w| w.max(0.0)),
            height: height.map(|h| h.max(0.0)),
        };
        self.push(NodeKind::Frame { spec, alignment, child })
    }

    pub fn flexible_frame(&mut self, child: NodeId, frame: FlexibleFrame, alignment: Alignment) -> NodeId {
        self.push(NodeKind::Frame { spec: FrameSpec::Flexible(frame.normalized()), alignment, child })
    }

    pub fn padding(&mut self, child: NodeId, insets: EdgeInsets) -> NodeId {
        self.push(NodeKind::Padding { insets: Some(insets.normalized()), child })
    }

    /// Padding with the configured default on every edge.
    pub fn padding_default(&mut self, child: NodeId) -> NodeId {
        self.push(NodeKind::Padding { insets: None, child })
    }

    pub fn fixed_size(&mut self, child: NodeId) -> NodeId {
        self.fixed_size_axes(child, true, true)
    }

    pub fn fixed_size_axes(&mut self, child: NodeId, horizontal: bool, vertical: bool) -> NodeId {
        self.push(NodeKind::FixedSize { horizontal, vertical, child })
    }

    /// `ratio = None` uses the child's ideal aspect ratio.
    pub fn aspect_ratio(&mut self, child: NodeId, ratio: Option<f64>, mode: ContentMode) -> NodeId {
        self.push(NodeKind::AspectRatio { ratio, mode, child })
    }

    pub fn offset(&mut self, child: NodeId, dx: f64, dy: f64) -> NodeId {
        self.push(NodeKind::Offset { offset: Point::new(dx, dy), child })
    }

    pub fn layout_priority(&mut self, child: NodeId, priority: f64) -> NodeId {
        let priority = if priority.is_nan() { 0.0 } else { priority };
        self.push(NodeKind::LayoutPriority { priority, child })
    }

    // =====================================================================
    // Identity, guides, editing
    // =====================================================================

    /// Attach an explicit id. The positional key is kept alongside it.
    pub fn set_explicit_id(&mut self, node: NodeId, id: impl Into<String>) -> bool {
        match self.nodes.get_mut(node.index()) {
            Some(data) => {
                data.explicit_id = Some(id.into());
                true
            }
            None => false,
        }
    }

    /// Override `id`'s guide for `node` only.
    pub fn alignment_guide(
        &mut self,
        node: NodeId,
        id: impl Into<AlignmentId>,
        compute: impl Fn(Size) -> f64 + Send + Sync + 'static,
    ) -> bool {
        match self.nodes.get_mut(node.index()) {
            Some(data) => {
                data.guides.insert(id.into(), Arc::new(compute));
                true
            }
            None => false,
        }
    }

    pub fn register_horizontal_alignment(
        &mut self,
        name: &str,
        default: impl Fn(Size) -> f64 + Send + Sync + 'static,
    ) -> HorizontalAlignment {
        self.alignments.register_horizontal(name, default)
    }

    pub fn register_vertical_alignment(
        &mut self,
        name: &str,
        default: impl Fn(Size) -> f64 + Send + Sync + 'static,
    ) -> VerticalAlignment {
        self.alignments.register_vertical(name, default)
    }

    /// Replace a multi-child container's children. Returns false for other kinds.
    pub fn set_children(&mut self, node: NodeId, children: Vec<NodeId>) -> bool {
        let Some(data) = self.nodes.get_mut(node.index()) else {
            return false;
        };
        match &mut data.kind {
            NodeKind::Stack(stack) => stack.children = children,
            NodeKind::ZStack(zstack) => zstack.children = children,
            NodeKind::Grid(grid) => grid.children = children,
            NodeKind::Flow(flow) => flow.children = children,
            NodeKind::ViewThatFits { children: existing } => *existing = children,
            other => {
                tracing::warn!(node = %node, kind = other.name(), "set_children on a node without a child list");
                return false;
            }
        }
        true
    }

    /// Replace a single-child modifier's child (the primary for overlays).
    pub fn set_child(&mut self, node: NodeId, new_child: NodeId) -> bool {
        let Some(data) = self.nodes.get_mut(node.index()) else {
            return false;
        };
        match &mut data.kind {
            NodeKind::Frame { child, .. }
            | NodeKind::Padding { child, .. }
            | NodeKind::FixedSize { child, .. }
            | NodeKind::AspectRatio { child, .. }
            | NodeKind::Offset { child, .. }
            | NodeKind::LayoutPriority { child, .. }
            | NodeKind::ScrollView { child, .. } => *child = new_child,
            NodeKind::Layered(layered) => layered.primary = new_child,
            NodeKind::GeometryReader { child } => *child = Some(new_child),
            other => {
                tracing::warn!(node = %node, kind = other.name(), "set_child on a node without a single child");
                return false;
            }
        }
        true
    }

    /// Priority a stack uses for `node` (only the outermost wrapper counts).
    pub(crate) fn layout_priority_of(&self, node: NodeId) -> f64 {
        match self.data(node).kind {
            NodeKind::LayoutPriority { priority, .. } => priority,
            _ => 0.0,
        }
    }

    // =====================================================================
    // Validation
    // =====================================================================

    /// Check that everything reachable from `root` exists, is acyclic, and
    /// nests no deeper than `max_depth`.
    pub fn validate(&self, root: NodeId, max_depth: usize) -> Result<()> {
        if !self.contains(root) {
            return Err(LayoutError::UnknownNode(root));
        }
        let mut on_path = HashSet::new();
        let mut heights = HashMap::new();
        self.visit(root, 1, max_depth, &mut on_path, &mut heights)?;
        Ok(())
    }

    /// Returns the height of the subtree at `id`.
    fn visit(
        &self,
        id: NodeId,
        depth: usize,
        limit: usize,
        on_path: &mut HashSet<NodeId>,
        heights: &mut HashMap<NodeId, usize>,
    ) -> Result<usize> {
        if depth > limit {
            return Err(LayoutError::DepthExceeded { depth, limit });
        }
        if let Some(&height) = heights.get(&id) {
            let reached = depth - 1 + height;
            if reached > limit {
                return Err(LayoutError::DepthExceeded { depth: reached, limit });
            }
            return Ok(height);
        }

        on_path.insert(id);
        let mut height = 1;
        for child in self.data(id).kind.children() {
            if !self.contains(child) {
                return Err(LayoutError::UnknownNode(child));
            }
            if on_path.contains(&child) {
                return Err(LayoutError::Cycle { node: child, ancestor: id });
            }
            height = height.max(1 + self.visit(child, depth + 1, limit, on_path, heights)?);
        }
        on_path.remove(&id);
        heights.insert(id, height);
        Ok(height)
    }
}
