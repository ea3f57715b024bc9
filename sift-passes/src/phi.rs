//! Phi-node synthesis at block heads
//!
//! Builds a phi that merges the values a stack slot holds on entry from
//! each predecessor. Descriptors without a value contribute a typed
//! undefined placeholder; the phi's type is the slot's allocated type, so
//! it can stand in for any load of that slot.

use log::debug;
use sift_ir::{BlockId, Function, InstId, Value};

/// One incoming edge of a synthesized phi
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// An undefined value flows in from this predecessor
    Undef(BlockId),
    /// This value flows in from this predecessor
    Value(Value, BlockId),
}

/// Insert a phi at the head of `block` merging the given incomings for
/// `alloca`, and return its handle so it can feed further rewrites.
///
/// All incoming pairs are attached before returning. Panics if `alloca`
/// is not an alloca instruction.
pub fn synthesize_phi(
    func: &mut Function,
    block: BlockId,
    alloca: InstId,
    incomings: &[Incoming],
) -> InstId {
    let ty = func
        .inst(alloca)
        .kind
        .allocated_type()
        .unwrap_or_else(|| panic!("synthesize_phi target %{alloca} is not an alloca"))
        .clone();
    debug!(
        "synthesize_phi: bb{block} slot=%{alloca} ty={ty} incoming={}",
        incomings.len()
    );

    let mut values = Vec::with_capacity(incomings.len());
    let mut blocks = Vec::with_capacity(incomings.len());
    for incoming in incomings {
        match incoming {
            Incoming::Undef(pred) => {
                values.push(Value::Undef(ty.clone()));
                blocks.push(*pred);
            }
            Incoming::Value(value, pred) => {
                values.push(value.clone());
                blocks.push(*pred);
            }
        }
    }

    let phi = func.insert_phi_at_head(block, ty);
    func.add_incoming(phi, &values, &blocks);
    phi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forwarding::replace_loads;
    use sift_ir::{BasicBlock, Function, InstKind, IrType};

    fn diamond_tail() -> (Function, InstId, InstId) {
        // bb0 and bb1 both branch to bb2, which loads the slot
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        func.add_block(BasicBlock::new(1));
        func.add_block(BasicBlock::new(2));
        let slot = func.new_inst(
            0,
            InstKind::Alloca {
                allocated_type: IrType::I16,
                count: None,
            },
        );
        func.new_inst(0, InstKind::Branch(2));
        func.new_inst(1, InstKind::Branch(2));
        let load = func.new_inst(
            2,
            InstKind::Load {
                ptr: Value::Inst(slot),
                ty: IrType::I16,
            },
        );
        func.new_inst(2, InstKind::Return(Some(Value::Inst(load))));
        (func, slot, load)
    }

    #[test]
    fn builds_incoming_pairs_in_order() {
        let (mut func, slot, load) = diamond_tail();
        let phi = synthesize_phi(
            &mut func,
            2,
            slot,
            &[
                Incoming::Value(Value::Constant(1), 0),
                Incoming::Undef(1),
            ],
        );
        match &func.inst(phi).kind {
            InstKind::Phi { incoming, ty } => {
                assert_eq!(*ty, IrType::I16);
                assert_eq!(
                    *incoming,
                    vec![
                        (Value::Constant(1), 0),
                        (Value::Undef(IrType::I16), 1),
                    ]
                );
            }
            other => panic!("unexpected kind: {other}"),
        }
        // positioned strictly before the block's previous first instruction
        assert_eq!(func.first_instruction(2), Some(phi));
        assert_eq!(func.next_instruction(phi), Some(load));
    }

    #[test]
    fn phi_feeds_load_rewriting() {
        let (mut func, slot, load) = diamond_tail();
        let phi = synthesize_phi(
            &mut func,
            2,
            slot,
            &[
                Incoming::Value(Value::Constant(1), 0),
                Incoming::Value(Value::Constant(2), 1),
            ],
        );
        let replaced = replace_loads(&mut func, 2, slot, &Value::Inst(phi));
        assert_eq!(replaced, 1);
        assert!(!func.is_live(load));
        // the return now consumes the phi directly
        let ret = func.terminator(2).unwrap();
        assert_eq!(
            func.inst(ret).kind,
            InstKind::Return(Some(Value::Inst(phi)))
        );
        assert_eq!(func.uses(phi), &[ret]);
    }

    #[test]
    #[should_panic(expected = "is not an alloca")]
    fn rejects_non_alloca_slot() {
        let (mut func, _slot, load) = diamond_tail();
        synthesize_phi(&mut func, 2, load, &[Incoming::Undef(0)]);
    }
}
