//! `EmitContext` — per-function emission state: the instruction buffer, the
//! label counter, and the current `StackRepr` bound to each local (so a
//! later read of the same local doesn't need to re-derive its shape).

use crate::hook::SuspensionHook;
use crate::instr::{Instruction, Label};
use crate::stack_repr::StackRepr;
use rustc_hash::FxHashMap;
use sharpts_ast::VarId;
use sharpts_common::CompileOptions;

#[derive(Default, Debug, Clone, Copy)]
pub struct EmitFlags {
    pub boxing_elision: bool,
}

impl EmitFlags {
    pub fn from_options(options: &CompileOptions) -> Self {
        Self { boxing_elision: options.boxing_elision }
    }
}

pub struct EmitContext<'o> {
    pub options: &'o CompileOptions,
    pub flags: EmitFlags,
    instructions: Vec<Instruction>,
    local_reprs: FxHashMap<VarId, StackRepr>,
    next_label: u32,
    /// The shared exit label `@lock` methods jump to on `return`, so
    /// `LockExit` runs exactly once regardless of which `return` fired.
    /// Set by `begin_lock_region` once a locked function's body starts.
    lock_exit_label: Option<Label>,
    /// Installed by `sharpts-asyncx::AsyncXformer::emit` while emitting a
    /// state machine's straight-line body; `None` for every ordinary
    /// synchronous function, in which case `await`/`yield` pass their
    /// operand through unchanged (there is nothing to suspend).
    pub suspension_hook: Option<&'o dyn SuspensionHook>,
}

impl<'o> EmitContext<'o> {
    pub fn new(options: &'o CompileOptions) -> Self {
        Self {
            options,
            flags: EmitFlags::from_options(options),
            instructions: Vec::new(),
            local_reprs: FxHashMap::default(),
            next_label: 0,
            lock_exit_label: None,
            suspension_hook: None,
        }
    }

    /// Allocate the exit label for an `@lock` region and remember it so
    /// `StmtKind::Return` can route through it instead of returning directly.
    pub fn begin_lock_region(&mut self) -> Label {
        let label = self.fresh_label();
        self.lock_exit_label = Some(label);
        label
    }

    pub fn lock_exit_label(&self) -> Option<Label> {
        self.lock_exit_label
    }

    pub fn set_suspension_hook(&mut self, hook: &'o dyn SuspensionHook) {
        self.suspension_hook = Some(hook);
    }

    pub fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    pub fn emit_all(&mut self, instrs: impl IntoIterator<Item = Instruction>) {
        self.instructions.extend(instrs);
    }

    pub fn fresh_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    /// When `CompileOptions::boxing_elision` is off, every read/write goes
    /// through `Unknown` instead of a tracked representation — used for
    /// differential testing against the canonical boxed reference
    /// execution.
    pub fn repr_of(&self, var: VarId) -> StackRepr {
        if !self.flags.boxing_elision {
            return StackRepr::Unknown;
        }
        self.local_reprs.get(&var).copied().unwrap_or(StackRepr::Unknown)
    }

    pub fn set_repr(&mut self, var: VarId, repr: StackRepr) {
        if self.flags.boxing_elision {
            self.local_reprs.insert(var, repr);
        }
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
