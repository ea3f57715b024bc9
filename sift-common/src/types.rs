//! Common identifier types
//!
//! Instructions and basic blocks are addressed by stable integer handles
//! rather than references, so identity comparison, use-list updates, and
//! erasure are all bounds-checked operations.

/// Instruction handle - indexes a function's instruction arena
pub type InstId = u32;

/// Basic block identifier
pub type BlockId = u32;
