//! Basic Block Management
//!
//! Defines basic blocks - ordered instruction sequences with a single
//! entry and exit. A block only lists handles; the instruction data lives
//! in the owning function's arena.

use serde::{Deserialize, Serialize};
use sift_common::{BlockId, InstId};

/// Basic Block - an ordered sequence of instruction handles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub instructions: Vec<InstId>,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            instructions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
