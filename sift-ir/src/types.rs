//! IR Type System
//!
//! Defines the type system for the IR: void, integer types, and pointers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// IR Type system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrType {
    /// Void type
    Void,

    /// Integer types with bit width
    I1, // Boolean
    I8,   // 8-bit integer
    I16,  // 16-bit integer
    I32,  // 32-bit integer
    I64,  // 64-bit integer

    /// Pointer type
    Ptr(Box<IrType>),
}

impl IrType {
    /// Wrap this type in a pointer
    pub fn pointer_to(self) -> IrType {
        IrType::Ptr(Box::new(self))
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::I1 => write!(f, "i1"),
            IrType::I8 => write!(f, "i8"),
            IrType::I16 => write!(f, "i16"),
            IrType::I32 => write!(f, "i32"),
            IrType::I64 => write!(f, "i64"),
            IrType::Ptr(_) => write!(f, "ptr"),
        }
    }
}
