//! Sift Intermediate Representation
//!
//! This crate defines the IR manipulated by the Sift rewrite passes:
//! modules, functions, basic blocks, and instructions held in a
//! per-function arena and addressed by stable integer handles.
//!
//! ## Architecture
//!
//! The crate is structured as follows:
//! - `types` - Type system (IrType)
//! - `values` - Value representations
//! - `ops` - Binary and unary operations
//! - `instructions` - IR instructions and the arena entry
//! - `blocks` - Basic block management
//! - `function` - Function definitions and the instruction arena
//! - `module` - Module and global variables
//! - `builder` - IR construction utilities
//! - `verify` - Structural invariant checks

// Public exports - clean API surface
pub use self::types::IrType;
pub use self::values::Value;
pub use self::ops::{IrBinaryOp, IrUnaryOp};
pub use self::instructions::{Inst, InstKind};
pub use self::blocks::BasicBlock;
pub use self::function::Function;
pub use self::module::{GlobalVariable, Linkage, Module};
pub use self::builder::IrBuilder;
pub use self::verify::{verify_function, verify_module};
pub use sift_common::{BlockId, InstId, SiftError};

// Internal modules
mod types;
mod values;
mod ops;
mod instructions;
mod blocks;
mod function;
mod module;
mod builder;
mod verify;
