//! The contract every layout participant implements.

use crate::primitives::Size;

use super::alignment::AlignmentId;
use super::proposal::ProposedSize;

/// Something that can size itself for a proposal and report alignment guides.
///
/// `size_for` must be pure within a pass: the same proposal always yields the
/// same size. It is total; a node may report a size larger than proposed.
pub trait Sizable {
    /// Report a concrete size for `proposal`.
    fn size_for(&self, proposal: ProposedSize) -> Size;

    /// This node's guide for `id`, in its own frame, given its reported size.
    ///
    /// Unsupported identifiers fall back to their structural default.
    fn guide(&self, id: AlignmentId, size: Size) -> f64;
}
