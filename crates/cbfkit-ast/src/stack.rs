//! Cone stacks
//!
//! A stack partitions the scalar variables (or the scalar constraints) into
//! consecutive cone-typed blocks. The total length is always the sum of the
//! block dimensions, so an in-memory stack can never disagree with its count.

use serde::{Deserialize, Serialize};

use crate::cone::Cone;

/// One `(cone, size)` entry of a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConeBlock {
    pub cone: Cone,
    pub dim: usize,
}

impl ConeBlock {
    pub fn new(cone: Cone, dim: usize) -> Self {
        Self { cone, dim }
    }
}

/// Ordered sequence of cone blocks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConeStack {
    blocks: Vec<ConeBlock>,
}

impl ConeStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack with room for `capacity` blocks
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: Vec::with_capacity(capacity),
        }
    }

    /// Append a block
    pub fn push(&mut self, cone: Cone, dim: usize) {
        self.blocks.push(ConeBlock::new(cone, dim));
    }

    /// Total number of scalar entries covered by the stack
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.dim).sum()
    }

    /// True when the stack covers no entries (it may still hold zero-sized blocks)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of blocks, including zero-sized ones
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[ConeBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConeBlock> {
        self.blocks.iter()
    }

    /// Cone of the block containing scalar `index`
    pub fn cone_of(&self, index: usize) -> Option<Cone> {
        let mut start = 0;
        for block in &self.blocks {
            if index < start + block.dim {
                return Some(block.cone);
            }
            start += block.dim;
        }
        None
    }
}

impl FromIterator<ConeBlock> for ConeStack {
    fn from_iter<I: IntoIterator<Item = ConeBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<ConeBlock>> for ConeStack {
    fn from(blocks: Vec<ConeBlock>) -> Self {
        Self { blocks }
    }
}
