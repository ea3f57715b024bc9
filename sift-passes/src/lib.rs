//! Sift IR Toolkit - Rewrite Passes
//!
//! The passes operate on one function at a time and mutate it in place:
//! - `forwarding` - store-to-load forwarding within an instruction range
//! - `phi` - phi-node synthesis at block heads
//! - `local` - block-local stack slot promotion built on both

pub mod forwarding;
pub mod local;
pub mod phi;

pub use forwarding::{replace_between, replace_loads};
pub use local::{forward_block_locals, store_sites, ForwardingStats, StoreSite};
pub use phi::{synthesize_phi, Incoming};
