//! Store-to-load forwarding over a single basic block
//!
//! Rewrites loads from one stack slot into direct uses of the value most
//! recently stored to it, within a bounded instruction range, then drops
//! the now-dead defining store. Loads from other slots are left alone.

use log::{debug, trace};
use sift_ir::{BlockId, Function, InstId, InstKind, Value};

/// Forward `value` into every load of `alloca` between `a1` (exclusive)
/// and `a2` (exclusive; `None` scans to the end of the block), erasing
/// each rewritten load. If `a1` is itself a store it is erased afterwards:
/// its value has been propagated to every load it could reach.
///
/// Returns the number of loads rewritten. The scan starts at the
/// instruction after `a1`; the defining assignment is never a candidate.
///
/// Panics if `alloca` is not an alloca, or if the markers are not in the
/// stated order within a single block.
pub fn replace_between(
    func: &mut Function,
    a1: InstId,
    a2: Option<InstId>,
    value: &Value,
    alloca: InstId,
) -> usize {
    assert!(
        func.inst(alloca).kind.is_alloca(),
        "replace_between target %{alloca} is not an alloca"
    );
    let block = func.inst(a1).block;
    if let Some(a2) = a2 {
        assert_eq!(
            func.inst(a2).block,
            block,
            "range markers %{a1} and %{a2} are in different blocks"
        );
        let instructions = &func.get_block(block).expect("marker block missing").instructions;
        let p1 = position_of(instructions, a1);
        let p2 = position_of(instructions, a2);
        assert!(
            p1 < p2,
            "range start %{a1} does not precede range end %{a2}"
        );
    }
    debug!("replace_between: a1=%{a1} a2={a2:?} slot=%{alloca} value={value}");

    let mut replaced = 0;
    let mut cursor = func.next_instruction(a1);
    while let Some(inst) = cursor {
        if Some(inst) == a2 {
            break;
        }
        // capture the forward link before erasure invalidates it
        let next = func.next_instruction(inst);
        if let InstKind::Load { ptr, .. } = &func.inst(inst).kind {
            if ptr.as_inst() == Some(alloca) {
                trace!("  forwarding load %{inst} -> {value}");
                func.replace_all_uses(inst, value);
                func.erase(inst);
                replaced += 1;
            }
        }
        cursor = next;
    }

    if func.inst(a1).kind.is_store() {
        trace!("  erasing dead store %{a1}");
        func.erase(a1);
    }
    replaced
}

/// Forward `value` into every load of `alloca` in `block`, from the first
/// instruction onward. No store is erased; the caller decides which
/// definitions are dead.
pub fn replace_loads(
    func: &mut Function,
    block: BlockId,
    alloca: InstId,
    value: &Value,
) -> usize {
    assert!(
        func.inst(alloca).kind.is_alloca(),
        "replace_loads target %{alloca} is not an alloca"
    );
    debug!("replace_loads: bb{block} slot=%{alloca} value={value}");

    let mut replaced = 0;
    let mut cursor = func.first_instruction(block);
    while let Some(inst) = cursor {
        let next = func.next_instruction(inst);
        if let InstKind::Load { ptr, .. } = &func.inst(inst).kind {
            if ptr.as_inst() == Some(alloca) {
                trace!("  rewriting {}", func.inst(inst).kind);
                func.replace_all_uses(inst, value);
                func.erase(inst);
                replaced += 1;
            }
        }
        cursor = next;
    }
    replaced
}

fn position_of(instructions: &[InstId], id: InstId) -> usize {
    instructions
        .iter()
        .position(|&i| i == id)
        .unwrap_or_else(|| panic!("instruction %{id} not listed in its block"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_ir::{BasicBlock, Function, IrBinaryOp, IrType};

    fn slot_in(func: &mut Function, block: BlockId) -> InstId {
        func.new_inst(
            block,
            InstKind::Alloca {
                allocated_type: IrType::I16,
                count: None,
            },
        )
    }

    fn store_to(func: &mut Function, block: BlockId, value: Value, slot: InstId) -> InstId {
        func.new_inst(
            block,
            InstKind::Store {
                value,
                ptr: Value::Inst(slot),
            },
        )
    }

    fn load_from(func: &mut Function, block: BlockId, slot: InstId) -> InstId {
        func.new_inst(
            block,
            InstKind::Load {
                ptr: Value::Inst(slot),
                ty: IrType::I16,
            },
        )
    }

    #[test]
    fn forwards_load_and_drops_dead_store() {
        // bb0: %0 = alloca; store 1, %0; %2 = load %0; %3 = add %2, %2; ret %3
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let store = store_to(&mut func, 0, Value::Constant(1), slot);
        let load = load_from(&mut func, 0, slot);
        let add = func.new_inst(
            0,
            InstKind::Binary {
                op: IrBinaryOp::Add,
                lhs: Value::Inst(load),
                rhs: Value::Inst(load),
                ty: IrType::I16,
            },
        );
        let ret = func.new_inst(0, InstKind::Return(Some(Value::Inst(add))));

        let replaced = replace_between(&mut func, store, None, &Value::Constant(1), slot);

        assert_eq!(replaced, 1);
        assert!(!func.is_live(load));
        assert!(!func.is_live(store));
        assert_eq!(func.get_block(0).unwrap().instructions, vec![slot, add, ret]);
        match &func.inst(add).kind {
            InstKind::Binary { lhs, rhs, .. } => {
                assert_eq!(*lhs, Value::Constant(1));
                assert_eq!(*rhs, Value::Constant(1));
            }
            other => panic!("unexpected kind: {other}"),
        }
    }

    #[test]
    fn leaves_other_slots_alone() {
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let other = slot_in(&mut func, 0);
        let store = store_to(&mut func, 0, Value::Constant(1), slot);
        let other_load = load_from(&mut func, 0, other);
        let load = load_from(&mut func, 0, slot);
        func.new_inst(0, InstKind::Return(Some(Value::Inst(load))));

        let replaced = replace_between(&mut func, store, None, &Value::Constant(1), slot);

        assert_eq!(replaced, 1);
        assert!(func.is_live(other_load));
        match &func.inst(other_load).kind {
            InstKind::Load { ptr, .. } => assert_eq!(*ptr, Value::Inst(other)),
            other => panic!("unexpected kind: {other}"),
        }
    }

    #[test]
    fn upper_bound_is_exclusive() {
        // store 1; %l1 = load; store 2; %l2 = load; ret %l2
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let first = store_to(&mut func, 0, Value::Constant(1), slot);
        let reached = load_from(&mut func, 0, slot);
        let second = store_to(&mut func, 0, Value::Constant(2), slot);
        let beyond = load_from(&mut func, 0, slot);
        func.new_inst(0, InstKind::Return(Some(Value::Inst(beyond))));

        let replaced =
            replace_between(&mut func, first, Some(second), &Value::Constant(1), slot);

        assert_eq!(replaced, 1);
        assert!(!func.is_live(reached));
        assert!(!func.is_live(first));
        // at and past the upper bound nothing changes
        assert!(func.is_live(second));
        assert!(func.is_live(beyond));
    }

    #[test]
    fn non_store_range_start_is_kept() {
        // scanning from the alloca itself forwards the load but keeps a1
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let load = load_from(&mut func, 0, slot);
        func.new_inst(0, InstKind::Return(Some(Value::Inst(load))));

        let replaced = replace_between(&mut func, slot, None, &Value::Constant(9), slot);

        assert_eq!(replaced, 1);
        assert!(func.is_live(slot));
        assert!(!func.is_live(load));
    }

    #[test]
    fn no_matches_is_a_noop_except_dead_store() {
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let store = store_to(&mut func, 0, Value::Constant(1), slot);
        let ret = func.new_inst(0, InstKind::Return(None));

        let replaced = replace_between(&mut func, store, None, &Value::Constant(1), slot);

        assert_eq!(replaced, 0);
        assert!(!func.is_live(store));
        assert_eq!(func.get_block(0).unwrap().instructions, vec![slot, ret]);
    }

    #[test]
    #[should_panic(expected = "is not an alloca")]
    fn rejects_non_alloca_slot() {
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let store = store_to(&mut func, 0, Value::Constant(1), slot);
        replace_between(&mut func, store, None, &Value::Constant(1), store);
    }

    #[test]
    #[should_panic(expected = "different blocks")]
    fn rejects_markers_in_different_blocks() {
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        func.add_block(BasicBlock::new(1));
        let slot = slot_in(&mut func, 0);
        let store = store_to(&mut func, 0, Value::Constant(1), slot);
        let far = store_to(&mut func, 1, Value::Constant(2), slot);
        replace_between(&mut func, store, Some(far), &Value::Constant(1), slot);
    }

    #[test]
    #[should_panic(expected = "does not precede")]
    fn rejects_reversed_markers() {
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let first = store_to(&mut func, 0, Value::Constant(1), slot);
        let second = store_to(&mut func, 0, Value::Constant(2), slot);
        replace_between(&mut func, second, Some(first), &Value::Constant(2), slot);
    }

    #[test]
    fn replace_loads_scans_whole_block() {
        // loads both before and after the store are rewritten
        let mut func = Function::new("f".to_string(), IrType::I16);
        func.add_block(BasicBlock::new(0));
        let slot = slot_in(&mut func, 0);
        let early = load_from(&mut func, 0, slot);
        let store = store_to(&mut func, 0, Value::Constant(1), slot);
        let late = load_from(&mut func, 0, slot);
        let add = func.new_inst(
            0,
            InstKind::Binary {
                op: IrBinaryOp::Add,
                lhs: Value::Inst(early),
                rhs: Value::Inst(late),
                ty: IrType::I16,
            },
        );
        func.new_inst(0, InstKind::Return(Some(Value::Inst(add))));

        let replaced = replace_loads(&mut func, 0, slot, &Value::Constant(5));

        assert_eq!(replaced, 2);
        assert!(!func.is_live(early));
        assert!(!func.is_live(late));
        assert!(func.is_live(store));
        match &func.inst(add).kind {
            InstKind::Binary { lhs, rhs, .. } => {
                assert_eq!(*lhs, Value::Constant(5));
                assert_eq!(*rhs, Value::Constant(5));
            }
            other => panic!("unexpected kind: {other}"),
        }
    }
}
