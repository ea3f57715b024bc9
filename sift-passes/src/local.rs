//! Block-local stack slot promotion
//!
//! Drives `replace_between` over the stores of a block. A slot qualifies
//! when it is a scalar alloca and every use is a load or store address
//! within one block; storing the slot's own address anywhere disqualifies
//! it (the address escapes). Qualifying slots get their loads forwarded,
//! their stores erased, and finally the slot itself dropped once nothing
//! references it.
//!
//! Loads that precede the first store survive: they read an undefined
//! value either way, and erasing the stores behind them changes nothing
//! they can observe.

use log::{debug, trace};
use sift_ir::{BlockId, Function, InstId, InstKind, Value};
use crate::forwarding::replace_between;

/// A store instruction viewed as (instruction, stored value, target slot)
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSite {
    pub inst: InstId,
    pub value: Value,
    pub slot: Value,
}

/// Enumerate the store instructions of a block in program order
pub fn store_sites(func: &Function, block: BlockId) -> Vec<StoreSite> {
    let mut sites = Vec::new();
    let mut cursor = func.first_instruction(block);
    while let Some(inst) = cursor {
        if let InstKind::Store { value, ptr } = &func.inst(inst).kind {
            sites.push(StoreSite {
                inst,
                value: value.clone(),
                slot: ptr.clone(),
            });
        }
        cursor = func.next_instruction(inst);
    }
    sites
}

/// Counters reported by `forward_block_locals`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardingStats {
    pub loads_forwarded: usize,
    pub stores_removed: usize,
    pub slots_removed: usize,
}

/// Forward stores to loads for every block-local slot of a function
pub fn forward_block_locals(func: &mut Function) -> ForwardingStats {
    let candidates: Vec<(InstId, BlockId)> = func
        .blocks
        .iter()
        .flat_map(|b| b.instructions.iter().copied())
        .filter_map(|id| promotable_slot_block(func, id).map(|block| (id, block)))
        .collect();
    debug!(
        "forward_block_locals: fn @{} with {} candidate slots",
        func.name,
        candidates.len()
    );

    let mut stats = ForwardingStats::default();
    for (slot, block) in candidates {
        let stores: Vec<InstId> = store_sites(func, block)
            .into_iter()
            .filter(|site| site.slot.as_inst() == Some(slot))
            .map(|site| site.inst)
            .collect();
        for (i, &store) in stores.iter().enumerate() {
            let end = stores.get(i + 1).copied();
            // re-read the stored value: forwarding the previous range may
            // have rewritten this store's operand
            let value = match &func.inst(store).kind {
                InstKind::Store { value, .. } => value.clone(),
                other => panic!("store site %{store} changed kind: {other}"),
            };
            stats.loads_forwarded += replace_between(func, store, end, &value, slot);
            stats.stores_removed += 1;
        }
        if func.uses(slot).is_empty() {
            trace!("  dropping dead slot %{slot}");
            func.erase(slot);
            stats.slots_removed += 1;
        }
    }
    stats
}

/// The single block in which a promotable slot is accessed, if the slot
/// qualifies: scalar alloca, every use a load or store address, all uses
/// in one block.
fn promotable_slot_block(func: &Function, id: InstId) -> Option<BlockId> {
    let inst = func.inst(id);
    if !matches!(inst.kind, InstKind::Alloca { count: None, .. }) {
        return None;
    }
    if inst.uses.is_empty() {
        return None;
    }
    let mut home: Option<BlockId> = None;
    for &user in &inst.uses {
        let user_inst = func.inst(user);
        let addressed = match &user_inst.kind {
            InstKind::Load { ptr, .. } => ptr.as_inst() == Some(id),
            InstKind::Store { value, ptr } => {
                ptr.as_inst() == Some(id) && value.as_inst() != Some(id)
            }
            _ => false,
        };
        if !addressed {
            return None;
        }
        match home {
            None => home = Some(user_inst.block),
            Some(block) if block == user_inst.block => {}
            Some(_) => return None,
        }
    }
    home
}
