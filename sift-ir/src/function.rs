//! Function Definitions
//!
//! Defines IR functions: parameter and block lists plus the instruction
//! arena. All instruction creation, use-list maintenance, use replacement,
//! and erasure go through methods here so the arena stays consistent.
//!
//! Contract violations - accessing an erased handle, erasing twice,
//! erasing an instruction that still has uses - panic rather than corrupt
//! the graph.

use serde::{Deserialize, Serialize};
use sift_common::{BlockId, InstId};
use std::fmt;
use crate::{BasicBlock, Inst, InstKind, IrType, Value};

/// Function in IR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type: IrType,
    pub parameters: Vec<IrType>,
    pub blocks: Vec<BasicBlock>,
    /// Instruction arena; erased handles leave a tombstone behind
    insts: Vec<Option<Inst>>,
}

impl Function {
    pub fn new(name: String, return_type: IrType) -> Self {
        Self {
            name,
            return_type,
            parameters: Vec::new(),
            blocks: Vec::new(),
            insts: Vec::new(),
        }
    }

    /// Declare a parameter and get the value that refers to it
    pub fn add_parameter(&mut self, param_type: IrType) -> Value {
        self.parameters.push(param_type);
        Value::Param((self.parameters.len() - 1) as u32)
    }

    pub fn add_block(&mut self, block: BasicBlock) {
        self.blocks.push(block);
    }

    pub fn get_block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn get_block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    /// Look up a live instruction. Panics on an out-of-range or erased
    /// handle - both are contract violations, not runtime conditions.
    pub fn inst(&self, id: InstId) -> &Inst {
        self.insts
            .get(id as usize)
            .unwrap_or_else(|| panic!("instruction handle %{id} out of range"))
            .as_ref()
            .unwrap_or_else(|| panic!("instruction %{id} has been erased"))
    }

    fn inst_mut(&mut self, id: InstId) -> &mut Inst {
        self.insts
            .get_mut(id as usize)
            .unwrap_or_else(|| panic!("instruction handle %{id} out of range"))
            .as_mut()
            .unwrap_or_else(|| panic!("instruction %{id} has been erased"))
    }

    /// Whether a handle refers to a live (not erased) instruction
    pub fn is_live(&self, id: InstId) -> bool {
        self.insts
            .get(id as usize)
            .is_some_and(|slot| slot.is_some())
    }

    /// Append a new instruction to the end of a block
    pub fn new_inst(&mut self, block: BlockId, kind: InstKind) -> InstId {
        let id = self.insts.len() as InstId;
        let operand_ids: Vec<InstId> =
            kind.operands().into_iter().filter_map(Value::as_inst).collect();
        self.insts.push(Some(Inst {
            id,
            block,
            kind,
            uses: Vec::new(),
        }));
        for op in operand_ids {
            self.inst_mut(op).uses.push(id);
        }
        self.get_block_mut(block)
            .unwrap_or_else(|| panic!("no block bb{block} in function"))
            .instructions
            .push(id);
        id
    }

    /// Insert an empty phi node before the block's current first
    /// instruction. Incoming pairs are attached with `add_incoming`.
    pub fn insert_phi_at_head(&mut self, block: BlockId, ty: IrType) -> InstId {
        let id = self.insts.len() as InstId;
        self.insts.push(Some(Inst {
            id,
            block,
            kind: InstKind::Phi {
                incoming: Vec::new(),
                ty,
            },
            uses: Vec::new(),
        }));
        self.get_block_mut(block)
            .unwrap_or_else(|| panic!("no block bb{block} in function"))
            .instructions
            .insert(0, id);
        id
    }

    /// Attach incoming (value, predecessor) pairs to a phi node
    pub fn add_incoming(&mut self, phi: InstId, values: &[Value], blocks: &[BlockId]) {
        assert_eq!(
            values.len(),
            blocks.len(),
            "mismatched incoming value/block counts on phi %{phi}"
        );
        for value in values {
            if let Some(op) = value.as_inst() {
                self.inst_mut(op).uses.push(phi);
            }
        }
        match &mut self.inst_mut(phi).kind {
            InstKind::Phi { incoming, .. } => {
                incoming.extend(values.iter().cloned().zip(blocks.iter().copied()));
            }
            other => panic!("add_incoming on non-phi instruction %{phi}: {other}"),
        }
    }

    /// First instruction of a block, if any
    pub fn first_instruction(&self, block: BlockId) -> Option<InstId> {
        self.get_block(block)?.instructions.first().copied()
    }

    /// The instruction following `id` in its block, if any
    pub fn next_instruction(&self, id: InstId) -> Option<InstId> {
        let block = self.inst(id).block;
        let instructions = &self
            .get_block(block)
            .unwrap_or_else(|| panic!("instruction %{id} names missing block bb{block}"))
            .instructions;
        let pos = instructions
            .iter()
            .position(|&i| i == id)
            .unwrap_or_else(|| panic!("instruction %{id} not listed in its block"));
        instructions.get(pos + 1).copied()
    }

    /// Instructions using `id` as an operand, one entry per occurrence
    pub fn uses(&self, id: InstId) -> &[InstId] {
        &self.inst(id).uses
    }

    /// Redirect every use of `old` to reference `new` instead.
    /// Returns the number of operand occurrences rewritten.
    pub fn replace_all_uses(&mut self, old: InstId, new: &Value) -> usize {
        assert!(
            new.as_inst() != Some(old),
            "cannot replace instruction %{old} with itself"
        );
        let users = std::mem::take(&mut self.inst_mut(old).uses);
        let mut replaced = 0;
        for &user in &users {
            let mut hits = 0;
            for operand in self.inst_mut(user).kind.operands_mut() {
                if operand.as_inst() == Some(old) {
                    *operand = new.clone();
                    hits += 1;
                }
            }
            // a user with several occurrences appears several times in
            // `users` but is fully rewritten on its first visit
            if hits > 0 {
                if let Some(new_id) = new.as_inst() {
                    for _ in 0..hits {
                        self.inst_mut(new_id).uses.push(user);
                    }
                }
                replaced += hits;
            }
        }
        replaced
    }

    /// Remove an instruction from its block and tombstone its arena slot.
    /// Panics if the handle was already erased or still has uses.
    pub fn erase(&mut self, id: InstId) {
        let inst = self
            .insts
            .get_mut(id as usize)
            .unwrap_or_else(|| panic!("instruction handle %{id} out of range"))
            .take()
            .unwrap_or_else(|| panic!("instruction %{id} erased twice"));
        assert!(
            inst.uses.is_empty(),
            "erasing instruction %{id} that still has uses"
        );
        for operand in inst.kind.operands() {
            if let Some(op_id) = operand.as_inst() {
                let uses = &mut self.inst_mut(op_id).uses;
                let pos = uses
                    .iter()
                    .position(|&u| u == id)
                    .unwrap_or_else(|| panic!("use list of %{op_id} is missing %{id}"));
                uses.remove(pos);
            }
        }
        let block = self
            .get_block_mut(inst.block)
            .unwrap_or_else(|| panic!("instruction %{id} names a missing block"));
        let pos = block
            .instructions
            .iter()
            .position(|&i| i == id)
            .unwrap_or_else(|| panic!("instruction %{id} not listed in its block"));
        block.instructions.remove(pos);
    }

    /// The block's terminator, if its last instruction is one
    pub fn terminator(&self, block: BlockId) -> Option<InstId> {
        let last = *self.get_block(block)?.instructions.last()?;
        self.inst(last).kind.is_terminator().then_some(last)
    }

    pub fn has_terminator(&self, block: BlockId) -> bool {
        self.terminator(block).is_some()
    }

    /// Successor blocks named by the terminator, in branch order
    pub fn successors(&self, block: BlockId) -> Vec<BlockId> {
        match self.terminator(block) {
            Some(term) => match &self.inst(term).kind {
                InstKind::Branch(target) => vec![*target],
                InstKind::BranchCond {
                    true_block,
                    false_block,
                    ..
                } => vec![*true_block, *false_block],
                _ => Vec::new(),
            },
            None => Vec::new(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn @{}(", self.name)?;
        for (i, param_type) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param_type} %arg{i}")?;
        }
        writeln!(f, ") -> {} {{", self.return_type)?;
        for block in &self.blocks {
            writeln!(f, "bb{}:", block.id)?;
            for &id in &block.instructions {
                let inst = self.inst(id);
                if inst.kind.has_result() {
                    writeln!(f, "  %{} = {}", id, inst.kind)?;
                } else {
                    writeln!(f, "  {}", inst.kind)?;
                }
            }
        }
        write!(f, "}}")
    }
}
