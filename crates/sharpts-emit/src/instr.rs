//! `Instruction` — the emitter's output: a typed-stack bytecode, not source
//! text. `sharpts-link` concatenates each function's instruction stream into
//! the final `BinaryImage`.

use crate::stack_repr::StackRepr;
use sharpts_ast::{AssignOp, BinaryOp, ClassId, FunctionId, IncDecOp, UnaryOp, VarId};
use sharpts_common::Atom;
use sharpts_runtime::RuntimeFn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label(pub u32);

#[derive(Clone, Debug)]
pub enum Const {
    Number(u64), // bit pattern of an f64, so Instruction stays `Eq`-able in tests
    String(Atom),
    Bool(bool),
    Null,
    Undefined,
}

/// Which field of a state machine's hoisted storage an instruction targets;
/// `sharpts-asyncx` is the only producer of `LoadStateField`/`StoreStateField`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateFieldKind {
    Hoisted,
    Awaiter,
    Exception,
}

#[derive(Clone, Debug)]
pub enum Instruction {
    LoadConst(Const),
    LoadLocal(VarId),
    StoreLocal(VarId),
    LoadDisplaySlot { owner: FunctionId, slot: u32 },
    StoreDisplaySlot { owner: FunctionId, slot: u32 },
    LoadThisSlot { owner: FunctionId },
    /// Direct slot load for a statically-resolved static class field.
    LoadStaticField { class: ClassId, slot: u32 },
    /// Read/write a named module's export slot, resolved by
    /// `sharpts-modules::ModuleGraph` at link time.
    LoadExportSlot { module: u32, slot: u32 },
    StoreExportSlot { module: u32, slot: u32 },
    /// `import * as ns from 'm'` — binds the whole module's export table.
    LoadModuleNamespace { module: u32 },
    /// A function value by identity, for exporting/assigning a callable
    /// without invoking it.
    LoadFunctionRef(FunctionId),
    /// Read/write one field of the current async/generator state-machine
    /// record.
    LoadStateField { kind: StateFieldKind, index: u32 },
    StoreStateField { kind: StateFieldKind, index: u32 },
    /// Suspend the current state machine, recording `resume_state` as the
    /// value `LoadStateField { kind: Hoisted, .. }`'s resume dispatch reads
    /// on the next `move_next` call.
    Suspend { resume_state: u32 },
    /// Box a value currently in `from` up to `Unknown`.
    Box { from: StackRepr },
    /// Unbox an `Unknown` value down to `to`, for a fast-path consumer.
    Unbox { to: StackRepr },
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    IncDec(IncDecOp),
    Assign(AssignOp),
    /// Tag a value as union member `tag` of the union at `union_type`.
    UnionBox { tag: u32 },
    /// Unbox a union value, asserting it currently holds member `tag`.
    UnionUnbox { tag: u32 },
    CallRuntime(RuntimeFn),
    CallDirect { function: FunctionId, arg_count: u32 },
    CallIndirect { arg_count: u32 },
    NewObject { class: ClassId, arg_count: u32 },
    GetProperty(Atom),
    SetProperty(Atom),
    GetIndex,
    SetIndex,
    MakeArray { len: u32 },
    MakeRecord { entry_count: u32 },
    /// Acquire the `@lock` critical-section guard for the current state
    /// machine; see `sharpts-asyncx::lock_lowering` for the reentrancy
    /// counter this pairs with.
    LockEnter,
    LockExit,
    Jump(Label),
    JumpIfFalse(Label),
    JumpIfTrue(Label),
    Label(Label),
    Dup,
    Pop,
    Throw,
    Return,
    ReturnVoid,
}
