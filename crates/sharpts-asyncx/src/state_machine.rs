//! `StateMachinePlan` — the lowering of one async/generator function into an
//! explicit `move_next`-style state object.

use crate::lock::LockReentrancy;
use crate::suspension::SuspensionPoint;
use sharpts_ast::{FunctionId, VarId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineKind {
    Async,
    Generator,
    AsyncGenerator,
}

/// One hoisted field: a local that is live across at least one suspension
/// point and so cannot stay a stack local in `move_next`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoistedField {
    pub var: VarId,
    pub field_index: u32,
}

/// One slot holding the awaiter object for an `await`/`yield*` site, read
/// back on resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AwaiterSlot {
    pub state_id: crate::suspension::StateId,
    pub field_index: u32,
}

/// A try region whose body spans at least one suspension point, and so
/// needs an explicit exception slot rather than a native exception-region
/// frame (which cannot span a `move_next` return).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExceptionSlot {
    pub region: crate::suspension::TryRegionId,
    pub field_index: u32,
}

/// The full lowering of one function body.
#[derive(Clone, Debug)]
pub struct StateMachinePlan {
    pub source_function: FunctionId,
    pub kind: MachineKind,
    pub suspensions: Vec<SuspensionPoint>,
    pub hoisted_fields: Vec<HoistedField>,
    pub awaiter_slots: Vec<AwaiterSlot>,
    pub exception_slots: Vec<ExceptionSlot>,
    /// `this` is hoisted whenever the body uses it, since `move_next` is a
    /// method on a distinct state object rather than the original instance.
    pub this_hoisted: bool,
    pub lock_reentrancy: Option<LockReentrancy>,
}

impl StateMachinePlan {
    /// Total resume-point count: `-1`=running, `-2`=completed, `0..N-1` are
    /// the entries in `suspensions`.
    pub fn resume_point_count(&self) -> usize {
        self.suspensions.len()
    }

    pub fn exception_slot_for(&self, region: crate::suspension::TryRegionId) -> Option<&ExceptionSlot> {
        self.exception_slots.iter().find(|s| s.region == region)
    }
}
