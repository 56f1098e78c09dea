//! Async/generator state-machine lowering.
//!
//! Functions containing `await`/`yield` are rewritten into an explicit
//! `move_next`-style state object rather than relying on native coroutine
//! support, so the emitted code needs nothing from the host runtime beyond
//! an ordinary method call and a handful of runtime entry points
//! (`sharpts-runtime::RuntimeFn::Promise*`).

pub mod hoist;
pub mod lock;
pub mod state_machine;
pub mod suspension;
pub mod xformer;

pub use lock::LockReentrancy;
pub use state_machine::{AwaiterSlot, ExceptionSlot, HoistedField, MachineKind, StateMachinePlan};
pub use suspension::{StateId, SuspensionPoint, TryRegionId};
pub use xformer::AsyncXformer;
