//! IR Instructions
//!
//! Defines all instruction kinds available in the IR, plus the arena entry
//! that ties a kind to its handle, containing block, and use list.

use serde::{Deserialize, Serialize};
use sift_common::{BlockId, InstId};
use std::fmt;
use crate::{IrBinaryOp, IrType, IrUnaryOp, Value};

/// An instruction in a function's arena.
///
/// Identity is the handle: two structurally equal instructions are still
/// distinct entities. `uses` holds one entry per operand occurrence and is
/// maintained by `Function`; do not edit it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inst {
    pub id: InstId,
    pub block: BlockId,
    pub kind: InstKind,
    pub uses: Vec<InstId>,
}

/// IR Instruction kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstKind {
    /// Binary operation: result = op lhs, rhs
    Binary {
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
        ty: IrType,
    },

    /// Unary operation: result = op operand
    Unary {
        op: IrUnaryOp,
        operand: Value,
        ty: IrType,
    },

    /// Load from memory: result = load ptr
    Load { ptr: Value, ty: IrType },

    /// Store to memory: store value, ptr
    Store { value: Value, ptr: Value },

    /// Allocate a stack slot: result = alloca type, count
    Alloca {
        allocated_type: IrType,
        count: Option<Value>,
    },

    /// Function call: result = call callee(args...)
    Call {
        callee: String,
        args: Vec<Value>,
        ty: IrType,
    },

    /// Phi node: result = phi [val1, block1], [val2, block2], ...
    Phi {
        incoming: Vec<(Value, BlockId)>,
        ty: IrType,
    },

    /// Return: ret value or ret void
    Return(Option<Value>),

    /// Unconditional branch: br block
    Branch(BlockId),

    /// Conditional branch: br condition, true_block, false_block
    BranchCond {
        condition: Value,
        true_block: BlockId,
        false_block: BlockId,
    },
}

impl InstKind {
    pub fn is_load(&self) -> bool {
        matches!(self, InstKind::Load { .. })
    }

    pub fn is_store(&self) -> bool {
        matches!(self, InstKind::Store { .. })
    }

    pub fn is_alloca(&self) -> bool {
        matches!(self, InstKind::Alloca { .. })
    }

    pub fn is_phi(&self) -> bool {
        matches!(self, InstKind::Phi { .. })
    }

    /// Control-transfer instructions that must terminate a block
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            InstKind::Return(_) | InstKind::Branch(_) | InstKind::BranchCond { .. }
        )
    }

    /// The type of the value this instruction produces, if any.
    /// Allocas produce a pointer to their allocated type.
    pub fn result_type(&self) -> Option<IrType> {
        match self {
            InstKind::Binary { ty, .. }
            | InstKind::Unary { ty, .. }
            | InstKind::Load { ty, .. }
            | InstKind::Phi { ty, .. } => Some(ty.clone()),
            InstKind::Alloca { allocated_type, .. } => {
                Some(allocated_type.clone().pointer_to())
            }
            InstKind::Call { ty, .. } => {
                if *ty == IrType::Void {
                    None
                } else {
                    Some(ty.clone())
                }
            }
            InstKind::Store { .. }
            | InstKind::Return(_)
            | InstKind::Branch(_)
            | InstKind::BranchCond { .. } => None,
        }
    }

    pub fn has_result(&self) -> bool {
        self.result_type().is_some()
    }

    /// The type of values held by this stack slot, if this is an alloca
    pub fn allocated_type(&self) -> Option<&IrType> {
        match self {
            InstKind::Alloca { allocated_type, .. } => Some(allocated_type),
            _ => None,
        }
    }

    /// All value operands, in a fixed order per kind.
    /// Stores yield the stored value first, then the address.
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            InstKind::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            InstKind::Unary { operand, .. } => vec![operand],
            InstKind::Load { ptr, .. } => vec![ptr],
            InstKind::Store { value, ptr } => vec![value, ptr],
            InstKind::Alloca { count, .. } => count.iter().collect(),
            InstKind::Call { args, .. } => args.iter().collect(),
            InstKind::Phi { incoming, .. } => incoming.iter().map(|(v, _)| v).collect(),
            InstKind::Return(value) => value.iter().collect(),
            InstKind::Branch(_) => Vec::new(),
            InstKind::BranchCond { condition, .. } => vec![condition],
        }
    }

    /// Mutable view of all value operands, same order as `operands`
    pub fn operands_mut(&mut self) -> Vec<&mut Value> {
        match self {
            InstKind::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            InstKind::Unary { operand, .. } => vec![operand],
            InstKind::Load { ptr, .. } => vec![ptr],
            InstKind::Store { value, ptr } => vec![value, ptr],
            InstKind::Alloca { count, .. } => count.iter_mut().collect(),
            InstKind::Call { args, .. } => args.iter_mut().collect(),
            InstKind::Phi { incoming, .. } => {
                incoming.iter_mut().map(|(v, _)| v).collect()
            }
            InstKind::Return(value) => value.iter_mut().collect(),
            InstKind::Branch(_) => Vec::new(),
            InstKind::BranchCond { condition, .. } => vec![condition],
        }
    }
}

impl fmt::Display for InstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstKind::Binary { op, lhs, rhs, ty } => {
                write!(f, "{op} {ty} {lhs}, {rhs}")
            }
            InstKind::Unary { op, operand, ty } => {
                write!(f, "{op} {ty} {operand}")
            }
            InstKind::Load { ptr, ty } => {
                write!(f, "load {ty}, ptr {ptr}")
            }
            InstKind::Store { value, ptr } => {
                write!(f, "store {value}, ptr {ptr}")
            }
            InstKind::Alloca {
                allocated_type,
                count,
            } => {
                write!(f, "alloca {allocated_type}")?;
                if let Some(count) = count {
                    write!(f, ", {count}")?;
                }
                Ok(())
            }
            InstKind::Call { callee, args, ty } => {
                write!(f, "call {ty} @{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            InstKind::Phi { incoming, ty } => {
                write!(f, "phi {ty} ")?;
                for (i, (value, block)) in incoming.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[{value}, bb{block}]")?;
                }
                Ok(())
            }
            InstKind::Return(Some(value)) => write!(f, "ret {value}"),
            InstKind::Return(None) => write!(f, "ret void"),
            InstKind::Branch(block) => write!(f, "br bb{block}"),
            InstKind::BranchCond {
                condition,
                true_block,
                false_block,
            } => {
                write!(f, "br {condition}, bb{true_block}, bb{false_block}")
            }
        }
    }
}
