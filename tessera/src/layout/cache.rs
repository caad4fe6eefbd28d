//! Per-pass memo of `size_for` results.
//!
//! Stacks probe every child at least three times (zero, infinity, the real
//! proposal) and nested stacks multiply that. The memo keys on
//! (node, sizing environment, proposal bits) and lives for exactly one pass,
//! so separate passes never share entries. Explicit guide lookups
//! are memoized next to sizes under the same key plus the identifier.

use std::collections::HashMap;

use crate::primitives::Size;

use super::alignment::AlignmentId;
use super::arrange::SizingEnv;
use super::proposal::ProposedSize;
use super::tree::NodeId;

/// The key for a memoized size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeKey {
    pub node: NodeId,
    pub env: SizingEnv,
    pub proposal: (Option<u64>, Option<u64>),
}

impl SizeKey {
    #[inline]
    pub fn new(node: NodeId, env: SizingEnv, proposal: &ProposedSize) -> Self {
        Self {
            node,
            env,
            proposal: proposal.key_bits(),
        }
    }
}

/// Size memo for a single pass.
#[derive(Debug, Default)]
pub struct SizeCache {
    entries: HashMap<SizeKey, Size>,
    guides: HashMap<(SizeKey, AlignmentId), Option<f64>>,
    hits: u64,
    misses: u64,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a memoized size, counting hits and misses.
    #[inline]
    pub fn get(&mut self, key: SizeKey) -> Option<Size> {
        match self.entries.get(&key) {
            Some(size) => {
                self.hits += 1;
                Some(*size)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    #[inline]
    pub fn insert(&mut self, key: SizeKey, size: Size) {
        self.entries.insert(key, size);
    }

    /// Memoized explicit guide. The outer `Option` is the cache miss.
    #[inline]
    pub fn get_guide(&self, key: SizeKey, id: AlignmentId) -> Option<Option<f64>> {
        self.guides.get(&(key, id)).copied()
    }

    #[inline]
    pub fn insert_guide(&mut self, key: SizeKey, id: AlignmentId, value: Option<f64>) {
        self.guides.insert((key, id), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
