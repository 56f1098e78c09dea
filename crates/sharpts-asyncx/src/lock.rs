//! `@lock` reentrancy modeling for state-machine bodies. The decorator is
//! handled by `sharpts-emit::emitter::SyncEmitter` for ordinary (non-async)
//! methods via plain `LockEnter`/`LockExit`; an async or generator method
//! carrying `@lock` needs its reentrancy counter to survive a suspension,
//! since control returns to the scheduler between `move_next` calls.

/// Flow-local reentrancy counter threaded through a `StateMachinePlan`
/// rather than a thread-local: the continuation that resumes a suspended
/// `move_next` may run on a different worker than the one that suspended
/// it, so the counter travels with the state object itself. See DESIGN.md
/// for why this resolves the reentrancy-across-suspension open question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockReentrancy {
    /// Field index on the state object holding the reentrancy count.
    pub counter_field: u32,
    /// Field index holding the per-instance monitor handle.
    pub monitor_field: u32,
}

impl LockReentrancy {
    pub fn new(counter_field: u32, monitor_field: u32) -> Self {
        Self { counter_field, monitor_field }
    }
}
