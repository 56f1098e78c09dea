//! `AsyncXformer` — lowers one async/generator `FunctionPlan` into a
//! `StateMachinePlan`. Straight-line fragments between suspension points are
//! ordinary expression/statement trees, unpacked into the same
//! `Instruction` stream `sharpts-emit::SyncEmitter` would produce for a
//! synchronous function; only the suspension sites and the hoisted fields
//! around them are specific to this crate.

use crate::hoist;
use crate::lock::LockReentrancy;
use crate::state_machine::{AwaiterSlot, ExceptionSlot, HoistedField, MachineKind, StateMachinePlan};
use rustc_hash::FxHashSet;
use sharpts_ast::{FunctionKind, FunctionPlan};
use sharpts_common::CompileOptions;
use sharpts_emit::{Const, EmitContext, Instruction, Label, StackRepr, StateFieldKind, SuspensionHook, SyncEmitter};
use sharpts_runtime::RuntimeFn;
use std::cell::Cell;
use tracing::instrument;

/// Installed on the `EmitContext` while `AsyncXformer::emit` drives
/// `SyncEmitter` over a state machine's body, so every `await`/`yield` the
/// ordinary expression walk reaches interleaves the suspend/resume
/// instructions for that site instead of passing its operand straight
/// through.
struct StateMachineHook {
    resume_labels: Vec<Label>,
    awaiter_slots: Vec<AwaiterSlot>,
    cursor: Cell<usize>,
}

impl SuspensionHook for StateMachineHook {
    fn on_suspend(&self, ctx: &mut EmitContext, _is_yield: bool, _is_delegating: bool) -> StackRepr {
        let i = self.cursor.get();
        self.cursor.set(i + 1);
        let field_index = self.awaiter_slots[i].field_index;
        ctx.emit(Instruction::StoreStateField { kind: StateFieldKind::Awaiter, index: field_index });
        ctx.emit(Instruction::Suspend { resume_state: (i + 1) as u32 });
        ctx.emit(Instruction::Label(self.resume_labels[i]));
        ctx.emit(Instruction::LoadStateField { kind: StateFieldKind::Awaiter, index: field_index });
        ctx.emit(Instruction::CallRuntime(RuntimeFn::AwaitResume));
        StackRepr::Unknown
    }
}

pub struct AsyncXformer;

impl AsyncXformer {
    /// Lower `plan`. Panics if `plan` is neither async nor a generator;
    /// callers are expected to route synchronous functions to
    /// `sharpts-emit::SyncEmitter` instead.
    #[instrument(skip_all, fields(function = plan.qualified_name.as_str()))]
    pub fn lower(plan: &FunctionPlan) -> StateMachinePlan {
        let kind = match plan.kind {
            FunctionKind::Async => MachineKind::Async,
            FunctionKind::Generator => MachineKind::Generator,
            FunctionKind::AsyncGenerator => MachineKind::AsyncGenerator,
            FunctionKind::Sync => panic!("AsyncXformer::lower called on a synchronous function"),
        };

        let analysis = hoist::analyze(&plan.body);

        let hoisted_fields = analysis
            .hoisted_locals
            .iter()
            .enumerate()
            .map(|(i, var)| HoistedField { var: *var, field_index: i as u32 })
            .collect();

        let awaiter_slots = analysis
            .suspensions
            .iter()
            .enumerate()
            .map(|(i, s)| AwaiterSlot { state_id: s.state_id, field_index: i as u32 })
            .collect();

        let mut regions_with_suspension: Vec<_> =
            analysis.suspensions.iter().filter_map(|s| s.enclosing_try_region).collect::<FxHashSet<_>>().into_iter().collect();
        regions_with_suspension.sort_by_key(|r| r.0);
        let exception_slots = regions_with_suspension
            .into_iter()
            .enumerate()
            .map(|(i, region)| ExceptionSlot { region, field_index: i as u32 })
            .collect();

        let this_hoisted = plan.this_id.is_some();

        let lock_reentrancy = plan.has_lock_decorator().then(|| {
            let counter_field = hoisted_fields.len() as u32;
            LockReentrancy::new(counter_field, counter_field + 1)
        });

        StateMachinePlan {
            source_function: plan.id,
            kind,
            suspensions: analysis.suspensions,
            hoisted_fields,
            awaiter_slots,
            exception_slots,
            this_hoisted,
            lock_reentrancy,
        }
    }

    /// Lower `plan` and actually drive `emitter` over its body, so the
    /// returned instruction stream carries real `Jump`/`Label`/state-field
    /// instructions at each suspension point rather than only the
    /// `StateMachinePlan` metadata `lower` produces on its own. The body walk
    /// is the same `SyncEmitter::emit_stmt` straight-line emission a
    /// synchronous function gets; a `StateMachineHook` installed on the
    /// `EmitContext` is what makes `await`/`yield` suspend instead of
    /// passing through.
    #[instrument(skip_all, fields(function = plan.qualified_name.as_str()))]
    pub fn emit(plan: &FunctionPlan, emitter: &SyncEmitter, options: &CompileOptions) -> (StateMachinePlan, Vec<Instruction>) {
        let state_machine = Self::lower(plan);

        let mut ctx = EmitContext::new(options);
        let resume_labels: Vec<_> = (0..state_machine.resume_point_count()).map(|_| ctx.fresh_label()).collect();
        let hook = StateMachineHook {
            resume_labels: resume_labels.clone(),
            awaiter_slots: state_machine.awaiter_slots.clone(),
            cursor: Cell::new(0),
        };

        // Resume dispatch: on entry, jump straight to the resume point the
        // last suspension left the state machine at. `0` means "start from
        // the top", so the preamble only needs an arm per recorded point.
        if !resume_labels.is_empty() {
            let dispatch_done = ctx.fresh_label();
            for (i, label) in resume_labels.iter().enumerate() {
                ctx.emit(Instruction::LoadStateField { kind: StateFieldKind::Hoisted, index: 0 });
                ctx.emit(Instruction::LoadConst(Const::Number(((i + 1) as f64).to_bits())));
                ctx.emit(Instruction::BinaryOp(sharpts_ast::BinaryOp::StrictEq));
                ctx.emit(Instruction::JumpIfTrue(*label));
            }
            ctx.emit(Instruction::Jump(dispatch_done));
            ctx.emit(Instruction::Label(dispatch_done));
        }

        if state_machine.lock_reentrancy.is_some() {
            ctx.emit(Instruction::LockEnter);
        }

        ctx.set_suspension_hook(&hook);
        for stmt in &plan.body {
            emitter.emit_stmt(&mut ctx, stmt);
        }

        if state_machine.lock_reentrancy.is_some() {
            ctx.emit(Instruction::LockExit);
        }
        ctx.emit(Instruction::ReturnVoid);

        (state_machine, ctx.into_instructions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpts_ast::{AstBuilder, Decorator, FunctionId, VarId};

    fn plan_with(kind: FunctionKind, body: Vec<sharpts_ast::TypedStmt>, decorators: Vec<Decorator>) -> FunctionPlan {
        let ast = AstBuilder::new();
        FunctionPlan {
            id: FunctionId(0),
            qualified_name: sharpts_common::Interner::new().intern("step"),
            params: vec![],
            return_ty: ast.any,
            body,
            kind,
            decorators,
            this_id: None,
            is_method: false,
        }
    }

    #[test]
    fn single_await_produces_one_resume_point() {
        let ast = AstBuilder::new();
        let p = VarId(0);
        let body = vec![ast.expr_stmt(ast.await_expr(ast.ident(p, "p", ast.any), ast.any))];
        let plan = plan_with(FunctionKind::Async, body, vec![]);
        let sm = AsyncXformer::lower(&plan);
        assert_eq!(sm.resume_point_count(), 1);
        assert!(matches!(sm.kind, MachineKind::Async));
    }

    #[test]
    fn lock_decorator_allocates_reentrancy_counter() {
        let ast = AstBuilder::new();
        let p = VarId(0);
        let body = vec![ast.expr_stmt(ast.await_expr(ast.ident(p, "p", ast.any), ast.any))];
        let plan = plan_with(FunctionKind::Async, body, vec![Decorator::Lock]);
        let sm = AsyncXformer::lower(&plan);
        assert!(sm.lock_reentrancy.is_some());
    }

    #[test]
    fn try_region_with_suspension_gets_exception_slot() {
        let ast = AstBuilder::new();
        let p = VarId(0);
        let try_block = sharpts_ast::TypedStmt::new(
            sharpts_ast::StmtKind::Block(vec![ast.expr_stmt(ast.await_expr(ast.ident(p, "p", ast.any), ast.any))]),
            Default::default(),
        );
        let try_stmt = sharpts_ast::TypedStmt::new(
            sharpts_ast::StmtKind::Try { block: Box::new(try_block), catch: None, finally: None },
            Default::default(),
        );
        let plan = plan_with(FunctionKind::Async, vec![try_stmt], vec![]);
        let sm = AsyncXformer::lower(&plan);
        assert_eq!(sm.exception_slots.len(), 1);
    }

    #[test]
    fn emit_interleaves_suspend_and_resume_label_around_the_await() {
        let ast = AstBuilder::new();
        let p = VarId(0);
        let body = vec![ast.expr_stmt(ast.await_expr(ast.ident(p, "p", ast.any), ast.any))];
        let plan = plan_with(FunctionKind::Async, body, vec![]);

        let mut program = sharpts_ast::Program::new();
        program.define_function(plan.clone());
        let unions = sharpts_unions::UnionSynthesizer::new();
        let module_graph = sharpts_modules::ModuleGraph::empty();
        let emitter = SyncEmitter::new(&program, &unions, &module_graph);
        let options = CompileOptions::default();

        let (sm, instructions) = AsyncXformer::emit(&plan, &emitter, &options);
        assert_eq!(sm.resume_point_count(), 1);

        let suspend_at = instructions.iter().position(|i| matches!(i, Instruction::Suspend { .. })).expect("one Suspend");
        let label_at = instructions.iter().position(|i| matches!(i, Instruction::Label(_))).expect("one resume Label");
        assert!(label_at > suspend_at, "resume Label must follow Suspend: {instructions:?}");
        assert!(instructions.iter().any(|i| matches!(i, Instruction::CallRuntime(RuntimeFn::AwaitResume))));
    }
}
