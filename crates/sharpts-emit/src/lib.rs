//! Typed-stack code emitter: lowers a typed AST (`sharpts-ast`) into
//! `Instruction` streams, one per function, using boxing-elision-aware
//! operator lowering and the ordered method/call dispatch chain.

pub mod context;
pub mod dispatch;
pub mod emitter;
pub mod hook;
pub mod instr;
pub mod operators;
pub mod stack_repr;

pub use context::{EmitContext, EmitFlags};
pub use dispatch::{dispatch_indirect_call, dispatch_method_call, DispatchPlan, Receiver};
pub use emitter::SyncEmitter;
pub use hook::SuspensionHook;
pub use instr::{Const, Instruction, Label, StateFieldKind};
pub use operators::{emit_binary, lower_binary, needs_double_coercion, BinaryLowering};
pub use stack_repr::StackRepr;
