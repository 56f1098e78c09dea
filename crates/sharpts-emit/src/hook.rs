//! Pluggable strategy for what an `await`/`yield` expression lowers to.
//! Ordinary synchronous emission never suspends, so `EmitContext` leaves
//! this unset; `sharpts-asyncx::AsyncXformer` installs one while driving
//! `SyncEmitter` over a state machine's straight-line segments, so the
//! same statement/expression walk emits `Jump`/`Label`/state-field
//! instructions at each suspension point instead of falling through.

use crate::context::EmitContext;
use crate::stack_repr::StackRepr;

pub trait SuspensionHook {
    /// Called once the awaited/yielded operand's value has already been
    /// emitted onto the stack. `is_yield` distinguishes `yield` from
    /// `await`; `is_delegating` marks `yield*`. Returns the `StackRepr` of
    /// the value the suspension resumes with.
    fn on_suspend(&self, ctx: &mut EmitContext, is_yield: bool, is_delegating: bool) -> StackRepr;
}
