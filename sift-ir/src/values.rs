//! IR Value Representations
//!
//! Defines values that can be used as operands in IR instructions:
//! instruction results, function parameters, constants, globals, and the
//! typed undefined placeholder.

use serde::{Deserialize, Serialize};
use sift_common::InstId;
use std::fmt;
use crate::IrType;

/// IR Value - represents operands in IR instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Result of an instruction, by handle
    Inst(InstId),

    /// Function parameter, by position
    Param(u32),

    /// Constant integer
    Constant(i64),

    /// Global symbol reference
    Global(String),

    /// Undefined value of the given type (for uninitialized slots)
    Undef(IrType),
}

impl Value {
    /// The instruction handle behind this value, if it is one
    pub fn as_inst(&self) -> Option<InstId> {
        match self {
            Value::Inst(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Inst(id) => write!(f, "%{id}"),
            Value::Param(index) => write!(f, "%arg{index}"),
            Value::Constant(val) => write!(f, "{val}"),
            Value::Global(name) => write!(f, "@{name}"),
            Value::Undef(_) => write!(f, "undef"),
        }
    }
}
