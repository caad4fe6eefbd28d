//! Single-purpose containers: scroll views, geometry readers, and
//! view-that-fits.

use crate::primitives::{Point, Size};

use super::arrange::{Arrangement, ChildSlot, SizingEnv};
use super::context::LayoutContext;
use super::proposal::ProposedSize;
use super::tree::NodeId;

/// Axes a scroll view scrolls along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollAxes {
    pub horizontal: bool,
    pub vertical: bool,
}

impl ScrollAxes {
    pub const VERTICAL: Self = Self { horizontal: false, vertical: true };
    pub const HORIZONTAL: Self = Self { horizontal: true, vertical: false };
    pub const BOTH: Self = Self { horizontal: true, vertical: true };
}

impl Default for ScrollAxes {
    fn default() -> Self {
        Self::VERTICAL
    }
}

/// Content is proposed unspecified along scrolling axes and placed at the
/// top-leading corner. The scroll view takes the proposal along scrolling
/// axes and the content's size across them.
pub(crate) fn arrange_scroll(
    ctx: &LayoutContext<'_>,
    axes: ScrollAxes,
    child: NodeId,
    proposal: ProposedSize,
) -> Arrangement {
    let child_proposal = ProposedSize::new(
        if axes.horizontal { None } else { proposal.width },
        if axes.vertical { None } else { proposal.height },
    );
    let content = ctx.size_for(child, child_proposal, SizingEnv::NONE);
    let size = Size::new(
        if axes.horizontal { proposal.width.unwrap_or(content.width) } else { content.width },
        if axes.vertical { proposal.height.unwrap_or(content.height) } else { content.height },
    );
    Arrangement {
        size,
        slots: vec![ChildSlot {
            index: 0,
            node: child,
            proposal: child_proposal,
            env: SizingEnv::NONE,
            origin: Point::ORIGIN,
            size: content,
        }],
    }
}

/// Takes all the space offered and proposes exactly that to its content.
pub(crate) fn arrange_geometry_reader(
    ctx: &LayoutContext<'_>,
    child: Option<NodeId>,
    proposal: ProposedSize,
) -> Arrangement {
    let size = proposal.replacing_unspecified_with(ctx.config.fill_fallback);
    let Some(child) = child else {
        return Arrangement::leaf(size);
    };
    let child_proposal = ProposedSize::from(size);
    Arrangement {
        size,
        slots: vec![ChildSlot {
            index: 0,
            node: child,
            proposal: child_proposal,
            env: SizingEnv::NONE,
            origin: Point::ORIGIN,
            size: ctx.size_for(child, child_proposal, SizingEnv::NONE),
        }],
    }
}

/// Picks the first child whose ideal size fits the proposal, else the last.
pub(crate) fn arrange_view_that_fits(
    ctx: &LayoutContext<'_>,
    children: &[NodeId],
    proposal: ProposedSize,
) -> Arrangement {
    let fits = |ideal: Size| {
        proposal.width.is_none_or(|w| ideal.width <= w) && proposal.height.is_none_or(|h| ideal.height <= h)
    };

    let chosen = children
        .iter()
        .position(|&child| fits(ctx.size_for(child, ProposedSize::UNSPECIFIED, SizingEnv::NONE)))
        .or(children.len().checked_sub(1));

    let Some(index) = chosen else {
        return Arrangement::leaf(Size::ZERO);
    };
    let node = children[index];
    tracing::trace!(chosen = index, of = children.len(), "view that fits");

    let size = ctx.size_for(node, proposal, SizingEnv::NONE);
    Arrangement {
        size,
        slots: vec![ChildSlot {
            index,
            node,
            proposal,
            env: SizingEnv::NONE,
            origin: Point::ORIGIN,
            size,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::leaf::MonospaceMetrics;
    use crate::layout::tree::ViewTree;

    fn arrange(tree: &ViewTree, node: NodeId, proposal: ProposedSize) -> Arrangement {
        let metrics = MonospaceMetrics::new();
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(tree, &metrics, &config);
        ctx.arrange(node, proposal, SizingEnv::NONE)
    }

    #[test]
    fn test_vertical_scroll_takes_proposed_height() {
        let mut tree = ViewTree::new();
        let items: Vec<NodeId> = (0..20).map(|_| tree.fixed(50.0, 40.0)).collect();
        let column = tree.vstack_with(Default::default(), Some(0.0), items);
        let scroll = tree.scroll_view(column, ScrollAxes::VERTICAL);

        let arrangement = arrange(&tree, scroll, ProposedSize::fixed(300.0, 200.0));
        assert_eq!(arrangement.size, Size::new(50.0, 200.0));
        assert_eq!(arrangement.slots[0].size.height, 800.0);
        assert_eq!(arrangement.slots[0].proposal, ProposedSize::new(Some(300.0), None));
    }

    #[test]
    fn test_geometry_reader_fills_proposal() {
        let mut tree = ViewTree::new();
        let content = tree.fixed(10.0, 10.0);
        let reader = tree.geometry_reader(Some(content));
        let empty = tree.geometry_reader(None);

        let arrangement = arrange(&tree, reader, ProposedSize::new(Some(120.0), None));
        assert_eq!(arrangement.size, Size::new(120.0, 10.0));
        assert_eq!(arrangement.slots[0].proposal, ProposedSize::fixed(120.0, 10.0));
        assert_eq!(arrange(&tree, empty, ProposedSize::fixed(7.0, 9.0)).size, Size::new(7.0, 9.0));
    }

    #[test]
    fn test_view_that_fits_picks_first_fitting() {
        let mut tree = ViewTree::new();
        let wide = tree.fixed(300.0, 20.0);
        let narrow = tree.fixed(100.0, 20.0);
        let fits = tree.view_that_fits([wide, narrow]);

        let roomy = arrange(&tree, fits, ProposedSize::fixed(400.0, 50.0));
        assert_eq!(roomy.slots[0].node, wide);

        let tight = arrange(&tree, fits, ProposedSize::fixed(200.0, 50.0));
        assert_eq!(tight.slots[0].node, narrow);
        assert_eq!(tight.slots[0].index, 1);

        let hopeless = arrange(&tree, fits, ProposedSize::fixed(50.0, 50.0));
        assert_eq!(hopeless.slots[0].node, narrow);
        assert_eq!(hopeless.slots.len(), 1);
    }
}
