//! IR Builder
//!
//! Provides utilities for constructing IR programmatically. The builder
//! owns the function under construction and hands it back with
//! `finish_function`; every build method returns the handle of the
//! instruction it appended.

use sift_common::{BlockId, InstId};
use crate::{BasicBlock, Function, InstKind, IrBinaryOp, IrType, IrUnaryOp, Value};

/// Builder for constructing IR
pub struct IrBuilder {
    current_function: Option<Function>,
    current_block: Option<BlockId>,
    next_block_id: BlockId,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self {
            current_function: None,
            current_block: None,
            next_block_id: 0,
        }
    }

    pub fn create_function(&mut self, name: String, return_type: IrType) -> &mut Function {
        self.current_function = Some(Function::new(name, return_type));
        self.current_block = None;
        self.next_block_id = 0;
        self.current_function.as_mut().unwrap()
    }

    pub fn add_parameter(&mut self, param_type: IrType) -> Result<Value, String> {
        let function = self
            .current_function
            .as_mut()
            .ok_or_else(|| "No current function".to_string())?;
        Ok(function.add_parameter(param_type))
    }

    /// Create a fresh block and position the builder at its end
    pub fn create_block(&mut self) -> Result<BlockId, String> {
        let id = self.next_block_id;
        self.next_block_id += 1;
        let function = self
            .current_function
            .as_mut()
            .ok_or_else(|| "No current function".to_string())?;
        function.add_block(BasicBlock::new(id));
        self.current_block = Some(id);
        Ok(id)
    }

    /// Position the builder at the end of an existing block
    pub fn position_at_end(&mut self, block: BlockId) -> Result<(), String> {
        let function = self
            .current_function
            .as_ref()
            .ok_or_else(|| "No current function".to_string())?;
        if function.get_block(block).is_none() {
            return Err(format!("No block bb{block} in current function"));
        }
        self.current_block = Some(block);
        Ok(())
    }

    pub fn build_binary(
        &mut self,
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
        ty: IrType,
    ) -> Result<InstId, String> {
        self.add_instruction(InstKind::Binary { op, lhs, rhs, ty })
    }

    pub fn build_unary(
        &mut self,
        op: IrUnaryOp,
        operand: Value,
        ty: IrType,
    ) -> Result<InstId, String> {
        self.add_instruction(InstKind::Unary { op, operand, ty })
    }

    pub fn build_load(&mut self, ptr: Value, ty: IrType) -> Result<InstId, String> {
        self.add_instruction(InstKind::Load { ptr, ty })
    }

    pub fn build_store(&mut self, value: Value, ptr: Value) -> Result<InstId, String> {
        self.add_instruction(InstKind::Store { value, ptr })
    }

    pub fn build_alloca(
        &mut self,
        allocated_type: IrType,
        count: Option<Value>,
    ) -> Result<InstId, String> {
        self.add_instruction(InstKind::Alloca {
            allocated_type,
            count,
        })
    }

    pub fn build_call(
        &mut self,
        callee: String,
        args: Vec<Value>,
        ty: IrType,
    ) -> Result<InstId, String> {
        self.add_instruction(InstKind::Call { callee, args, ty })
    }

    pub fn build_return(&mut self, value: Option<Value>) -> Result<InstId, String> {
        self.add_instruction(InstKind::Return(value))
    }

    pub fn build_branch(&mut self, target: BlockId) -> Result<InstId, String> {
        self.add_instruction(InstKind::Branch(target))
    }

    pub fn build_branch_cond(
        &mut self,
        condition: Value,
        true_block: BlockId,
        false_block: BlockId,
    ) -> Result<InstId, String> {
        self.add_instruction(InstKind::BranchCond {
            condition,
            true_block,
            false_block,
        })
    }

    fn add_instruction(&mut self, kind: InstKind) -> Result<InstId, String> {
        let function = self
            .current_function
            .as_mut()
            .ok_or_else(|| "No current function".to_string())?;
        let block = self
            .current_block
            .ok_or_else(|| "No current block".to_string())?;
        if function.get_block(block).is_none() {
            return Err("Current block not found".to_string());
        }
        Ok(function.new_inst(block, kind))
    }

    pub fn current_block_has_terminator(&self) -> bool {
        if let (Some(function), Some(block)) = (&self.current_function, self.current_block) {
            return function.has_terminator(block);
        }
        false
    }

    pub fn finish_function(&mut self) -> Option<Function> {
        self.current_block = None;
        self.current_function.take()
    }
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}
