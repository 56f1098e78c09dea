//! `DisplayClass` — the heap environment synthesized for a lexical scope
//! with captures.
//!
//! Display classes are allocated lazily: a scope only gets one if some inner
//! function actually captures one of its locals. Display class references
//! form a DAG by construction (inner scopes reference outer environments,
//! never the reverse); this module only builds the slot layout, leaving any
//! genuinely cyclic user capture (e.g. a captured object that loops back
//! into its own closure) to be resolved at runtime by the host's collector.

use rustc_hash::FxHashMap;
use sharpts_ast::{FunctionId, VarId};

/// A single captured-variable slot inside a `DisplayClass`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot(pub u32);

/// The synthesized heap record for one capturing scope.
#[derive(Debug)]
pub struct DisplayClass {
    pub owner: FunctionId,
    slots: FxHashMap<VarId, Slot>,
    pub has_this_slot: bool,
}

impl DisplayClass {
    fn new(owner: FunctionId) -> Self {
        Self { owner, slots: FxHashMap::default(), has_this_slot: false }
    }

    pub fn slot_of(&self, var: VarId) -> Option<Slot> {
        self.slots.get(&var).copied()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len() + usize::from(self.has_this_slot)
    }
}

/// Synthesizes a `DisplayClass` per scope that has at least one captured
/// local, from the `CaptureMap` produced by `ClosureAnalyzer`.
///
/// Spec.md scopes captures by function; a function's `DisplayClass` holds
/// every local of that function that some *other*, more deeply nested
/// function captures, plus a `this` slot when `CaptureMap::uses_this`
/// reports the function is referenced lexically by a nested arrow.
pub struct DisplayClassSynthesizer {
    classes: FxHashMap<FunctionId, DisplayClass>,
}

impl DisplayClassSynthesizer {
    pub fn new() -> Self {
        Self { classes: FxHashMap::default() }
    }

    /// Register that `owner`'s local `var` is captured by some nested
    /// function, allocating `owner`'s display class on first use.
    pub fn capture(&mut self, owner: FunctionId, var: VarId) -> Slot {
        let class = self.classes.entry(owner).or_insert_with(|| DisplayClass::new(owner));
        if let Some(slot) = class.slot_of(var) {
            return slot;
        }
        let slot = Slot(class.slots.len() as u32);
        class.slots.insert(var, slot);
        slot
    }

    pub fn mark_this_captured(&mut self, owner: FunctionId) {
        let class = self.classes.entry(owner).or_insert_with(|| DisplayClass::new(owner));
        class.has_this_slot = true;
    }

    pub fn get(&self, owner: FunctionId) -> Option<&DisplayClass> {
        self.classes.get(&owner)
    }

    pub fn into_map(self) -> FxHashMap<FunctionId, DisplayClass> {
        self.classes
    }
}

impl Default for DisplayClassSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_capture_reuses_slot() {
        let mut synth = DisplayClassSynthesizer::new();
        let owner = FunctionId(0);
        let var = VarId(1);
        let a = synth.capture(owner, var);
        let b = synth.capture(owner, var);
        assert_eq!(a, b);
        assert_eq!(synth.get(owner).unwrap().slot_count(), 1);
    }

    #[test]
    fn distinct_vars_get_distinct_slots() {
        let mut synth = DisplayClassSynthesizer::new();
        let owner = FunctionId(0);
        let a = synth.capture(owner, VarId(1));
        let b = synth.capture(owner, VarId(2));
        assert_ne!(a, b);
    }
}
