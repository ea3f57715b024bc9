//! Structural invariant checks
//!
//! A well-formed function has exactly one terminator per block, positioned
//! last; phis only in a leading run at a block head; and operands that
//! refer to live instructions of the same function. The verifier reports
//! through the recoverable error channel because the driver surfaces its
//! findings to users - unlike in-pass contract violations, which panic.

use sift_common::SiftError;
use crate::{Function, InstKind, Module, Value};

/// Verify every function of a module
pub fn verify_module(module: &Module) -> Result<(), SiftError> {
    for function in &module.functions {
        verify_function(function)?;
    }
    Ok(())
}

/// Verify the structural invariants of a single function
pub fn verify_function(func: &Function) -> Result<(), SiftError> {
    for block in &func.blocks {
        if func.terminator(block.id).is_none() {
            return Err(SiftError::verify(
                &func.name,
                format!("block bb{} has no terminator", block.id),
            ));
        }
        for (pos, &id) in block.instructions.iter().enumerate() {
            if !func.is_live(id) {
                return Err(SiftError::verify(
                    &func.name,
                    format!("block bb{} lists erased instruction %{id}", block.id),
                ));
            }
            let inst = func.inst(id);
            if inst.block != block.id {
                return Err(SiftError::verify(
                    &func.name,
                    format!("instruction %{id} is listed in bb{} but claims bb{}", block.id, inst.block),
                ));
            }
            if inst.kind.is_terminator() && pos + 1 != block.instructions.len() {
                return Err(SiftError::verify(
                    &func.name,
                    format!("terminator %{id} is not the last instruction of bb{}", block.id),
                ));
            }
            if inst.kind.is_phi()
                && block.instructions[..pos]
                    .iter()
                    .any(|&prev| !func.inst(prev).kind.is_phi())
            {
                return Err(SiftError::verify(
                    &func.name,
                    format!("phi %{id} is not at the head of bb{}", block.id),
                ));
            }
            for operand in inst.kind.operands() {
                if let Value::Inst(op_id) = operand {
                    if !func.is_live(*op_id) {
                        return Err(SiftError::verify(
                            &func.name,
                            format!("instruction %{id} uses erased instruction %{op_id}"),
                        ));
                    }
                }
                if let Value::Param(index) = operand {
                    if *index as usize >= func.parameters.len() {
                        return Err(SiftError::verify(
                            &func.name,
                            format!("instruction %{id} uses missing parameter %arg{index}"),
                        ));
                    }
                }
            }
            let mut named_blocks = Vec::new();
            match &inst.kind {
                InstKind::Branch(target) => named_blocks.push(*target),
                InstKind::BranchCond {
                    true_block,
                    false_block,
                    ..
                } => named_blocks.extend([*true_block, *false_block]),
                InstKind::Phi { incoming, .. } => {
                    named_blocks.extend(incoming.iter().map(|(_, b)| *b))
                }
                _ => {}
            }
            for named in named_blocks {
                if func.get_block(named).is_none() {
                    return Err(SiftError::verify(
                        &func.name,
                        format!("instruction %{id} names missing block bb{named}"),
                    ));
                }
            }
        }
    }
    Ok(())
}
