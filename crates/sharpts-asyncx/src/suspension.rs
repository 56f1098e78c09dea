//! `SuspensionPoint` — a single `await` or `yield` site, numbered in source
//! order as the state machine's resume points.

use sharpts_ast::VarId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TryRegionId(pub u32);

#[derive(Clone, Debug)]
pub struct SuspensionPoint {
    pub state_id: StateId,
    pub is_yield: bool,
    pub is_delegating: bool,
    pub enclosing_try_region: Option<TryRegionId>,
    /// Variables read anywhere after this point, in source order, computed
    /// once the whole function has been walked.
    pub live_vars: Vec<VarId>,
}
