//! `SyncEmitter` — walks a `FunctionPlan`'s body and produces its
//! instruction stream. Async/generator bodies are driven through this same
//! walk by `sharpts-asyncx::AsyncXformer::emit`, which installs a
//! `SuspensionHook` on the `EmitContext` so `await`/`yield` interleave
//! `Jump`/`Label`/state-field instructions instead of falling through.

use crate::context::EmitContext;
use crate::dispatch::{self, Receiver};
use crate::instr::{Const, Instruction};
use crate::operators::{emit_binary, needs_double_coercion};
use crate::stack_repr::StackRepr;
use sharpts_ast::{
    BinaryOp, ClassId, ExportKind, ExprKind, FunctionId, ImportDecl, Module, ModuleId, Program, StmtKind, TypedExpr,
    TypedStmt, UnaryOp, VarId,
};
use sharpts_closure::{synthesize_display_classes, CaptureMap, ClosureAnalyzer, DisplayClassSynthesizer};
use sharpts_common::{Atom, CompileOptions};
use sharpts_modules::{ImportTarget, ModuleGraph};
use sharpts_unions::UnionSynthesizer;
use tracing::instrument;

/// Holds an `@lock` method's return value across the jump to its single
/// `LockExit`, so every early `return` still releases the lock. A sentinel
/// far past any real parameter/local id, the same trick `ExprKind::This`
/// uses for its own reserved slot.
const RETURN_SLOT: VarId = VarId(u32::MAX - 3);

pub struct SyncEmitter<'p> {
    program: &'p Program,
    unions: &'p UnionSynthesizer,
    captures: CaptureMap,
    display: DisplayClassSynthesizer,
    module_graph: &'p ModuleGraph,
}

impl<'p> SyncEmitter<'p> {
    pub fn new(program: &'p Program, unions: &'p UnionSynthesizer, module_graph: &'p ModuleGraph) -> Self {
        let captures = ClosureAnalyzer::analyze(program);
        let display = synthesize_display_classes(&captures);
        Self { program, unions, captures, display, module_graph }
    }

    /// Emit every function in declaration order, returning each function's
    /// finished instruction stream keyed by `FunctionId`.
    #[instrument(skip_all)]
    pub fn emit_program(&self, options: &CompileOptions) -> rustc_hash::FxHashMap<FunctionId, Vec<Instruction>> {
        let mut out = rustc_hash::FxHashMap::default();
        for id in self.program.functions_in_order() {
            out.insert(id, self.emit_function(id, options));
        }
        out
    }

    #[instrument(skip(self, options))]
    pub fn emit_function(&self, id: FunctionId, options: &CompileOptions) -> Vec<Instruction> {
        let plan = self.program.function(id);
        let mut ctx = EmitContext::new(options);
        let exit_label = if plan.has_lock_decorator() {
            ctx.emit(Instruction::LoadConst(Const::Undefined));
            ctx.emit(Instruction::StoreLocal(RETURN_SLOT));
            ctx.emit(Instruction::LockEnter);
            Some(ctx.begin_lock_region())
        } else {
            None
        };
        for stmt in &plan.body {
            self.emit_stmt(&mut ctx, stmt);
        }
        match exit_label {
            Some(exit_label) => {
                ctx.emit(Instruction::Jump(exit_label));
                ctx.emit(Instruction::Label(exit_label));
                ctx.emit(Instruction::LockExit);
                ctx.emit(Instruction::LoadLocal(RETURN_SLOT));
                ctx.emit(Instruction::Return);
            }
            None => ctx.emit(Instruction::ReturnVoid),
        }
        ctx.into_instructions()
    }

    /// Synthesize the argument-count-dispatched entry stubs a function with
    /// default parameters needs: one label per arity from `min_arity` to
    /// `max_arity`, each pushing the missing trailing defaults before
    /// falling into the shared body.
    pub fn synthesize_overload_entries(&self, id: FunctionId, options: &CompileOptions) -> Vec<Instruction> {
        let plan = self.program.function(id);
        let (min, max) = (plan.min_arity(), plan.max_arity());
        let mut ctx = EmitContext::new(options);
        if min == max {
            return ctx.into_instructions();
        }
        let entry_labels: Vec<_> = (min..=max).map(|_| ctx.fresh_label()).collect();
        let join = ctx.fresh_label();
        for (offset, label) in entry_labels.iter().enumerate() {
            ctx.emit(Instruction::Label(*label));
            for param in &plan.params[(min + offset)..max] {
                if let Some(default) = &param.default {
                    let repr = self.emit_expr(&mut ctx, default);
                    self.emit_store_var(&mut ctx, param.id, repr);
                }
            }
            ctx.emit(Instruction::Jump(join));
        }
        ctx.emit(Instruction::Label(join));
        ctx.into_instructions()
    }

    /// Emit a module's top-level `export`/`import` statements (and any other
    /// top-level statement, for completeness) as its own instruction stream,
    /// run once at module instantiation rather than as part of any
    /// function's body — `Module::top_level` is never visited by
    /// `emit_function`, which only walks `FunctionPlan::body`.
    pub fn emit_module_init(&self, module: &Module, options: &CompileOptions) -> Vec<Instruction> {
        let mut ctx = EmitContext::new(options);
        for stmt in &module.top_level {
            match &stmt.kind {
                StmtKind::Export(kind) => self.emit_export(&mut ctx, module.id, kind),
                StmtKind::Import(decl) => self.emit_import(&mut ctx, module.id, decl),
                _ => self.emit_stmt(&mut ctx, stmt),
            }
        }
        ctx.into_instructions()
    }

    fn export_slot(&self, module: ModuleId, name: &Atom) -> Option<u32> {
        self.module_graph.exports.get(&module)?.table.slot_of(name)
    }

    fn emit_export(&self, ctx: &mut EmitContext, module: ModuleId, kind: &ExportKind) {
        match kind {
            ExportKind::Named { local, exported_as } => {
                match self.resolve_function_by_name(local.as_str()) {
                    Some(function) => ctx.emit(Instruction::LoadFunctionRef(function)),
                    None => ctx.emit(Instruction::LoadConst(Const::Undefined)),
                }
                self.store_export_or_drop(ctx, module, exported_as);
            }
            ExportKind::Default(expr) => {
                self.emit_expr(ctx, expr);
                let mut interner = sharpts_common::Interner::new();
                let default_name = interner.intern("default");
                self.store_export_or_drop(ctx, module, &default_name);
            }
            // A re-export introduces no new runtime value in *this* module;
            // the name just forwards to wherever `ModulePlanner` resolved
            // it, which an importer reads directly off the source module.
            ExportKind::ReExport { .. } | ExportKind::ReExportAll { .. } => {}
        }
    }

    fn store_export_or_drop(&self, ctx: &mut EmitContext, module: ModuleId, exported_as: &Atom) {
        match self.export_slot(module, exported_as) {
            Some(slot) => ctx.emit(Instruction::StoreExportSlot { module: module.0, slot }),
            None => ctx.emit(Instruction::Pop),
        }
    }

    fn emit_import(&self, ctx: &mut EmitContext, module: ModuleId, decl: &ImportDecl) {
        let Some(bindings) = self.module_graph.imports.get(&module) else { return };
        for spec in &decl.specifiers {
            let Some(binding) = bindings.iter().find(|b| b.local.as_str() == spec.local.as_str()) else { continue };
            match &binding.target {
                ImportTarget::Value { module: source, export_name } => {
                    let Some(slot) = self.module_graph.exports.get(source).and_then(|e| e.table.slot_of(export_name))
                    else {
                        continue;
                    };
                    ctx.emit(Instruction::LoadExportSlot { module: source.0, slot });
                    // This AST's `ImportSpecifier` carries only the bound
                    // name, not a `VarId` to store into, so there's nowhere
                    // to keep the loaded value; it's dropped immediately
                    // rather than fabricated a binding the AST doesn't have.
                    ctx.emit(Instruction::Pop);
                }
                ImportTarget::Namespace { module: source } => {
                    ctx.emit(Instruction::LoadModuleNamespace { module: source.0 });
                    ctx.emit(Instruction::Pop);
                }
            }
        }
    }

    fn display_slot_for(&self, var: VarId) -> Option<(FunctionId, u32)> {
        let owner = self.captures.owner_of(var)?;
        let slot = self.display.get(owner)?.slot_of(var)?;
        Some((owner, slot.0))
    }

    /// Load a local, routing through its `DisplayClass` slot instead of a
    /// plain stack local when `ClosureAnalyzer` found it captured by some
    /// nested function.
    fn emit_load_var(&self, ctx: &mut EmitContext, var: VarId) -> StackRepr {
        match self.display_slot_for(var) {
            Some((owner, slot)) => {
                ctx.emit(Instruction::LoadDisplaySlot { owner, slot });
                StackRepr::Unknown
            }
            None => {
                ctx.emit(Instruction::LoadLocal(var));
                ctx.repr_of(var)
            }
        }
    }

    fn emit_store_var(&self, ctx: &mut EmitContext, var: VarId, repr: StackRepr) {
        match self.display_slot_for(var) {
            Some((owner, slot)) => {
                if repr.needs_boxing() {
                    ctx.emit(Instruction::Box { from: repr });
                }
                ctx.emit(Instruction::StoreDisplaySlot { owner, slot });
            }
            None => {
                ctx.emit(Instruction::StoreLocal(var));
                ctx.set_repr(var, repr);
            }
        }
    }

    /// Coerce one binary operand to `Double` when `op`'s direct lowering
    /// requires it, via its own unary `ToNumber` call — each operand is
    /// coerced independently so a binary op never gets routed through a
    /// runtime call that can only take one argument.
    fn coerce_operand_for_binary(&self, ctx: &mut EmitContext, op: BinaryOp, repr: StackRepr) -> StackRepr {
        if !needs_double_coercion(op) || repr == StackRepr::Double {
            return repr;
        }
        if repr.needs_boxing() {
            ctx.emit(Instruction::Box { from: repr });
        }
        ctx.emit(Instruction::CallRuntime(sharpts_runtime::RuntimeFn::ToNumber));
        StackRepr::Double
    }

    fn static_field_slot(&self, class: ClassId, name: &Atom) -> Option<u32> {
        let class_plan = self.program.classes.get(&class)?;
        class_plan.fields.iter().filter(|f| f.is_static).position(|f| f.name.as_str() == name.as_str()).map(|i| i as u32)
    }

    pub fn emit_stmt(&self, ctx: &mut EmitContext, stmt: &TypedStmt) {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.emit_expr(ctx, expr);
                ctx.emit(Instruction::Pop);
            }
            StmtKind::VariableDecl { declarators, .. } => {
                for decl in declarators {
                    if let Some(init) = &decl.init {
                        let repr = self.emit_expr(ctx, init);
                        self.emit_store_var(ctx, decl.id, repr);
                    }
                }
            }
            StmtKind::Block(stmts) => {
                for s in stmts {
                    self.emit_stmt(ctx, s);
                }
            }
            StmtKind::If { test, consequent, alternate } => {
                self.emit_expr(ctx, test);
                let else_label = ctx.fresh_label();
                let end_label = ctx.fresh_label();
                ctx.emit(Instruction::JumpIfFalse(else_label));
                self.emit_stmt(ctx, consequent);
                ctx.emit(Instruction::Jump(end_label));
                ctx.emit(Instruction::Label(else_label));
                if let Some(alt) = alternate {
                    self.emit_stmt(ctx, alt);
                }
                ctx.emit(Instruction::Label(end_label));
            }
            StmtKind::While { test, body } => {
                let top = ctx.fresh_label();
                let end = ctx.fresh_label();
                ctx.emit(Instruction::Label(top));
                self.emit_expr(ctx, test);
                ctx.emit(Instruction::JumpIfFalse(end));
                self.emit_stmt(ctx, body);
                ctx.emit(Instruction::Jump(top));
                ctx.emit(Instruction::Label(end));
            }
            StmtKind::DoWhile { body, test } => {
                let top = ctx.fresh_label();
                ctx.emit(Instruction::Label(top));
                self.emit_stmt(ctx, body);
                self.emit_expr(ctx, test);
                ctx.emit(Instruction::JumpIfTrue(top));
            }
            StmtKind::For { init, test, update, body } => {
                if let Some(init) = init {
                    self.emit_stmt(ctx, init);
                }
                let top = ctx.fresh_label();
                let end = ctx.fresh_label();
                ctx.emit(Instruction::Label(top));
                if let Some(test) = test {
                    self.emit_expr(ctx, test);
                    ctx.emit(Instruction::JumpIfFalse(end));
                }
                self.emit_stmt(ctx, body);
                if let Some(update) = update {
                    self.emit_expr(ctx, update);
                    ctx.emit(Instruction::Pop);
                }
                ctx.emit(Instruction::Jump(top));
                ctx.emit(Instruction::Label(end));
            }
            StmtKind::ForOf { binding, iterable, body, .. } => {
                self.emit_expr(ctx, iterable);
                ctx.emit(Instruction::CallRuntime(sharpts_runtime::RuntimeFn::InvokeValue));
                self.emit_store_var(ctx, *binding, StackRepr::Unknown);
                self.emit_stmt(ctx, body);
            }
            StmtKind::Return(expr) => match ctx.lock_exit_label() {
                Some(exit_label) => {
                    match expr {
                        Some(expr) => {
                            self.emit_expr(ctx, expr);
                        }
                        None => ctx.emit(Instruction::LoadConst(Const::Undefined)),
                    }
                    ctx.emit(Instruction::StoreLocal(RETURN_SLOT));
                    ctx.emit(Instruction::Jump(exit_label));
                }
                None => match expr {
                    Some(expr) => {
                        self.emit_expr(ctx, expr);
                        ctx.emit(Instruction::Return);
                    }
                    None => ctx.emit(Instruction::ReturnVoid),
                },
            },
            StmtKind::Throw(expr) => {
                self.emit_expr(ctx, expr);
                ctx.emit(Instruction::Throw);
            }
            StmtKind::Try { block, catch, finally } => {
                self.emit_stmt(ctx, block);
                if let Some(sharpts_ast::CatchClause { body, .. }) = catch {
                    self.emit_stmt(ctx, body);
                }
                if let Some(finally) = finally {
                    self.emit_stmt(ctx, finally);
                }
            }
            StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty => {}
            StmtKind::Labeled { body, .. } => self.emit_stmt(ctx, body),
            StmtKind::FunctionDecl(_) | StmtKind::ClassDecl(_) => {
                // Emitted as their own top-level entries by `emit_program`.
            }
            StmtKind::Export(_) | StmtKind::Import(_) => {
                // Real top-level export/import statements live in
                // `Module::top_level`, handled by `emit_module_init`
                // before this function-body walk ever starts; this arm
                // only covers the (otherwise unreachable) case of one
                // nested inside a function body.
            }
        }
    }

    pub fn emit_expr(&self, ctx: &mut EmitContext, expr: &TypedExpr) -> StackRepr {
        match &expr.kind {
            ExprKind::NullLiteral => {
                ctx.emit(Instruction::LoadConst(Const::Null));
                StackRepr::Null
            }
            ExprKind::UndefinedLiteral => {
                ctx.emit(Instruction::LoadConst(Const::Undefined));
                StackRepr::Unknown
            }
            ExprKind::BoolLiteral(b) => {
                ctx.emit(Instruction::LoadConst(Const::Bool(*b)));
                StackRepr::Boolean
            }
            ExprKind::NumberLiteral(n) => {
                ctx.emit(Instruction::LoadConst(Const::Number(n.to_bits())));
                StackRepr::Double
            }
            ExprKind::StringLiteral(s) | ExprKind::BigIntLiteral(s) => {
                ctx.emit(Instruction::LoadConst(Const::String(s.clone())));
                StackRepr::String
            }
            ExprKind::Identifier(var, _) => self.emit_load_var(ctx, *var),
            ExprKind::This | ExprKind::Super => {
                ctx.emit(Instruction::LoadLocal(sharpts_ast::VarId(u32::MAX)));
                StackRepr::Unknown
            }
            ExprKind::ArrayLiteral(items) => {
                for item in items {
                    let repr = self.emit_expr(ctx, item);
                    if repr.needs_boxing() {
                        ctx.emit(Instruction::Box { from: repr });
                    }
                }
                ctx.emit(Instruction::MakeArray { len: items.len() as u32 });
                StackRepr::Unknown
            }
            ExprKind::ObjectLiteral(entries) => {
                for (_, value) in entries {
                    let repr = self.emit_expr(ctx, value);
                    if repr.needs_boxing() {
                        ctx.emit(Instruction::Box { from: repr });
                    }
                }
                ctx.emit(Instruction::MakeRecord { entry_count: entries.len() as u32 });
                StackRepr::Unknown
            }
            ExprKind::TemplateLiteral { exprs, .. } => {
                for e in exprs {
                    self.emit_expr(ctx, e);
                    ctx.emit(Instruction::CallRuntime(sharpts_runtime::RuntimeFn::Stringify));
                }
                StackRepr::String
            }
            ExprKind::Paren(inner) => self.emit_expr(ctx, inner),
            ExprKind::Spread(inner) => self.emit_expr(ctx, inner),
            ExprKind::Await(inner) => {
                let repr = self.emit_expr(ctx, inner);
                match ctx.suspension_hook {
                    Some(hook) => hook.on_suspend(ctx, false, false),
                    None => repr,
                }
            }
            ExprKind::Unary { op, operand } => {
                let repr = self.emit_expr(ctx, operand);
                ctx.emit(Instruction::UnaryOp(*op));
                match op {
                    UnaryOp::Not => StackRepr::Boolean,
                    UnaryOp::Typeof => StackRepr::String,
                    UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot => {
                        if repr == StackRepr::Double {
                            StackRepr::Double
                        } else {
                            StackRepr::Unknown
                        }
                    }
                    UnaryOp::Void => StackRepr::Unknown,
                }
            }
            ExprKind::IncDec { op, target } => {
                let repr = self.emit_expr(ctx, target);
                ctx.emit(Instruction::IncDec(*op));
                if repr == StackRepr::Double {
                    StackRepr::Double
                } else {
                    StackRepr::Unknown
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left_repr = self.emit_expr(ctx, left);
                let left_repr = self.coerce_operand_for_binary(ctx, *op, left_repr);
                let right_repr = self.emit_expr(ctx, right);
                let right_repr = self.coerce_operand_for_binary(ctx, *op, right_repr);
                let (instrs, result) = emit_binary(*op, left_repr, right_repr, ctx.options.target_width);
                ctx.emit_all(instrs);
                result
            }
            ExprKind::Assign { op, target, value } => {
                let value_repr = self.emit_expr(ctx, value);
                let value_repr = match op {
                    sharpts_ast::AssignOp::Assign => value_repr,
                    sharpts_ast::AssignOp::Compound(bin_op) => {
                        let value_repr = self.coerce_operand_for_binary(ctx, *bin_op, value_repr);
                        let target_repr = self.emit_expr(ctx, target);
                        let target_repr = self.coerce_operand_for_binary(ctx, *bin_op, target_repr);
                        let (instrs, result) = emit_binary(*bin_op, target_repr, value_repr, ctx.options.target_width);
                        ctx.emit_all(instrs);
                        result
                    }
                };
                if let ExprKind::Identifier(var, _) = &target.kind {
                    self.emit_store_var(ctx, *var, value_repr);
                }
                value_repr
            }
            ExprKind::Conditional { test, consequent, alternate } => {
                self.emit_expr(ctx, test);
                let else_label = ctx.fresh_label();
                let end_label = ctx.fresh_label();
                ctx.emit(Instruction::JumpIfFalse(else_label));
                let a = self.emit_expr(ctx, consequent);
                ctx.emit(Instruction::Jump(end_label));
                ctx.emit(Instruction::Label(else_label));
                let b = self.emit_expr(ctx, alternate);
                ctx.emit(Instruction::Label(end_label));
                StackRepr::both_unboxed(a, b).unwrap_or(StackRepr::Unknown)
            }
            ExprKind::Call { callee, args, .. } => self.emit_call(ctx, callee, args),
            ExprKind::New { callee: _, args } => {
                for arg in args {
                    self.emit_expr(ctx, arg);
                }
                ctx.emit(Instruction::NewObject {
                    class: sharpts_ast::ClassId(0),
                    arg_count: args.len() as u32,
                });
                StackRepr::Unknown
            }
            ExprKind::PropertyAccess { object, name, .. } => {
                self.emit_expr(ctx, object);
                ctx.emit(Instruction::GetProperty(name.clone()));
                StackRepr::Unknown
            }
            ExprKind::IndexAccess { object, index, .. } => {
                self.emit_expr(ctx, object);
                self.emit_expr(ctx, index);
                ctx.emit(Instruction::GetIndex);
                StackRepr::Unknown
            }
            ExprKind::StaticFieldAccess { class, name } => match self.static_field_slot(*class, name) {
                Some(slot) => {
                    ctx.emit(Instruction::LoadStaticField { class: *class, slot });
                    StackRepr::Unknown
                }
                None => {
                    ctx.emit(Instruction::LoadConst(Const::Undefined));
                    StackRepr::Unknown
                }
            },
            ExprKind::Yield { argument, delegate } => {
                let repr = match argument {
                    Some(arg) => self.emit_expr(ctx, arg),
                    None => {
                        ctx.emit(Instruction::LoadConst(Const::Undefined));
                        StackRepr::Unknown
                    }
                };
                match ctx.suspension_hook {
                    Some(hook) => hook.on_suspend(ctx, true, *delegate),
                    None => repr,
                }
            }
            ExprKind::FunctionExpr(_) | ExprKind::ArrowExpr(_) => {
                ctx.emit(Instruction::LoadConst(Const::Undefined));
                StackRepr::Unknown
            }
            ExprKind::UnionConvert { value, .. } => {
                let repr = self.emit_expr(ctx, value);
                if repr.needs_boxing() {
                    ctx.emit(Instruction::Box { from: repr });
                }
                StackRepr::Unknown
            }
            ExprKind::UnionProject(value) => {
                self.emit_expr(ctx, value);
                StackRepr::Unknown
            }
        }
    }

    fn emit_call(&self, ctx: &mut EmitContext, callee: &TypedExpr, args: &[TypedExpr]) -> StackRepr {
        if let ExprKind::PropertyAccess { object, name, .. } = &callee.kind {
            let builtin_namespace = match &object.kind {
                ExprKind::Identifier(_, ident) => Some(ident.as_str()),
                _ => None,
            };
            self.emit_expr(ctx, object);
            for arg in args {
                self.emit_expr(ctx, arg);
            }
            let receiver = Receiver { builtin_namespace, static_type: Some(object.ty) };
            let plan = dispatch::dispatch_method_call(
                &self.program.types,
                self.program,
                self.unions,
                &receiver,
                name,
                args.len() as u32,
            );
            ctx.emit_all(plan.instructions);
            return plan.result;
        }
        if let ExprKind::Identifier(_, name) = &callee.kind {
            if let Some(function) = self.resolve_function_by_name(name.as_str()) {
                for arg in args {
                    self.emit_expr(ctx, arg);
                }
                ctx.emit(Instruction::CallDirect { function, arg_count: args.len() as u32 });
                return StackRepr::Unknown;
            }
        }
        self.emit_expr(ctx, callee);
        for arg in args {
            self.emit_expr(ctx, arg);
        }
        let plan = dispatch::dispatch_indirect_call(args.len() as u32);
        ctx.emit_all(plan.instructions);
        plan.result
    }

    fn resolve_function_by_name(&self, name: &str) -> Option<FunctionId> {
        self.program.functions.iter().find(|(_, plan)| plan.qualified_name.as_str() == name).map(|(id, _)| *id)
    }
}
