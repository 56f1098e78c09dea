//! `CaptureMap` — the output of `ClosureAnalyzer::analyze`.

use rustc_hash::{FxHashMap, FxHashSet};
use sharpts_ast::{FunctionId, VarId};

#[derive(Default, Debug)]
struct FunctionCaptureInfo {
    captures: FxHashSet<VarId>,
    uses_this: bool,
}

/// Answers `captures_of(fn)` and `is_captured(var_decl)` queries for the
/// emitter's display-class synthesis pass.
#[derive(Default, Debug)]
pub struct CaptureMap {
    by_function: FxHashMap<FunctionId, FunctionCaptureInfo>,
    captured_vars: FxHashSet<VarId>,
    /// The function that declares each captured variable (`None` for
    /// module-top-level variables, which don't need a `DisplayClass` since
    /// they already live in module-wide storage).
    owners: FxHashMap<VarId, Option<FunctionId>>,
    /// Functions whose `this` is accessed by a nested arrow and therefore
    /// needs a `this` slot in their `DisplayClass`.
    this_hoisted: FxHashSet<FunctionId>,
}

impl CaptureMap {
    pub(crate) fn record_capture(&mut self, function: FunctionId, var: VarId, owner: Option<FunctionId>) {
        self.by_function.entry(function).or_default().captures.insert(var);
        self.captured_vars.insert(var);
        self.owners.insert(var, owner);
    }

    /// The function that declares `var`, if `var` is captured and declared
    /// inside a function (as opposed to at module top level).
    pub fn owner_of(&self, var: VarId) -> Option<FunctionId> {
        self.owners.get(&var).copied().flatten()
    }

    /// Every `(owner, var)` pair that needs a `DisplayClass` slot, in
    /// insertion order is not guaranteed — callers needing determinism
    /// should sort by `VarId`.
    pub fn captured_owned_vars(&self) -> impl Iterator<Item = (FunctionId, VarId)> + '_ {
        self.owners.iter().filter_map(|(var, owner)| owner.map(|o| (o, *var)))
    }

    pub(crate) fn record_this_usage(&mut self, function: FunctionId) {
        self.by_function.entry(function).or_default().uses_this = true;
    }

    pub(crate) fn record_this_hoist(&mut self, owner: FunctionId) {
        self.this_hoisted.insert(owner);
    }

    pub fn this_hoisted_owners(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.this_hoisted.iter().copied()
    }

    /// The set of outer-scope variables `function` references.
    pub fn captures_of(&self, function: FunctionId) -> FxHashSet<VarId> {
        self.by_function.get(&function).map(|info| info.captures.clone()).unwrap_or_default()
    }

    /// Whether `var` is captured by *any* function (determines whether it
    /// must be hoisted into a `DisplayClass` slot instead of staying a plain
    /// local).
    pub fn is_captured(&self, var: VarId) -> bool {
        self.captured_vars.contains(&var)
    }

    /// Whether `function`'s body (directly, or transitively through nested
    /// arrow functions whose `this` is lexically its own) uses `this`.
    pub fn uses_this(&self, function: FunctionId) -> bool {
        self.by_function.get(&function).is_some_and(|info| info.uses_this)
    }
}
