//! `ClosureAnalyzer` — computes the `CaptureMap` for every function in a
//! `Program`.

use crate::builtins::is_builtin;
use crate::capture_map::CaptureMap;
use rustc_hash::FxHashSet;
use sharpts_ast::{
    CatchClause, ExprKind, FunctionId, Param, Program, StmtKind, TypedExpr, TypedStmt, VarId,
};

struct Scope {
    locals: FxHashSet<VarId>,
    /// True for a function's own top scope (and the implicit module scope);
    /// marks where "the function's own local set" stops when walking the
    /// frame stack outward.
    function_boundary: bool,
    /// The function that owns variables declared directly in this scope
    /// (`None` at module top level).
    owner: Option<FunctionId>,
}

struct FnContext {
    id: FunctionId,
    is_arrow: bool,
}

pub struct ClosureAnalyzer<'p> {
    program: &'p Program,
    scopes: Vec<Scope>,
    fn_stack: Vec<FnContext>,
    map: CaptureMap,
}

impl<'p> ClosureAnalyzer<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program, scopes: Vec::new(), fn_stack: Vec::new(), map: CaptureMap::default() }
    }

    /// Run the analysis over every module's top-level statements, recursing
    /// into every function/arrow reachable from them.
    pub fn analyze(program: &'p Program) -> CaptureMap {
        let mut analyzer = Self::new(program);
        for module in &program.modules {
            analyzer.scopes.push(Scope { locals: FxHashSet::default(), function_boundary: true, owner: None });
            for stmt in &module.top_level {
                analyzer.visit_stmt(stmt);
            }
            analyzer.scopes.pop();
        }
        analyzer.map
    }

    fn declare(&mut self, var: VarId) {
        self.scopes.last_mut().expect("at least one scope is always active").locals.insert(var);
    }

    fn push_block(&mut self) {
        let owner = self.current_function();
        self.scopes.push(Scope { locals: FxHashSet::default(), function_boundary: false, owner });
    }

    fn pop_block(&mut self) {
        self.scopes.pop();
    }

    fn current_function(&self) -> Option<FunctionId> {
        self.fn_stack.last().map(|f| f.id)
    }

    /// Resolve an identifier reference: local (no-op), capture (recorded
    /// against the current function), or untracked (global/builtin/unknown).
    fn reference(&mut self, var: VarId, name: &str) {
        if is_builtin(name) {
            return;
        }
        let mut crossed_boundary = false;
        for scope in self.scopes.iter().rev() {
            if scope.locals.contains(&var) {
                if crossed_boundary {
                    if let Some(func) = self.current_function() {
                        self.map.record_capture(func, var, scope.owner);
                    }
                }
                return;
            }
            if scope.function_boundary {
                crossed_boundary = true;
            }
        }
        // Not found in any scope: global reference, out of capture scope.
    }

    fn reference_this(&mut self) {
        let mut crossed_arrow = false;
        let mut owner = None;
        for ctx in self.fn_stack.iter().rev() {
            self.map.record_this_usage(ctx.id);
            if !ctx.is_arrow {
                owner = Some(ctx.id);
                break;
            }
            crossed_arrow = true;
        }
        if crossed_arrow {
            if let Some(owner) = owner {
                self.map.record_this_hoist(owner);
            }
        }
    }

    fn enter_function(&mut self, id: FunctionId, is_arrow: bool, params: &[Param]) {
        self.fn_stack.push(FnContext { id, is_arrow });
        self.scopes.push(Scope { locals: FxHashSet::default(), function_boundary: true, owner: Some(id) });
        for param in params {
            self.declare(param.id);
            if let Some(default) = &param.default {
                self.visit_expr(default);
            }
        }
    }

    fn exit_function(&mut self) {
        self.scopes.pop();
        self.fn_stack.pop();
    }

    fn visit_function(&mut self, id: FunctionId, is_arrow: bool) {
        let plan = self.program.function(id);
        let params = plan.params.clone();
        let body = plan.body.clone();
        self.enter_function(id, is_arrow, &params);
        for stmt in &body {
            self.visit_stmt(stmt);
        }
        self.exit_function();
    }

    fn visit_stmt(&mut self, stmt: &TypedStmt) {
        match &stmt.kind {
            StmtKind::Expression(expr) => self.visit_expr(expr),
            StmtKind::VariableDecl { declarators, .. } => {
                for decl in declarators {
                    self.declare(decl.id);
                    if let Some(init) = &decl.init {
                        self.visit_expr(init);
                    }
                }
            }
            StmtKind::Block(stmts) => {
                self.push_block();
                for s in stmts {
                    self.visit_stmt(s);
                }
                self.pop_block();
            }
            StmtKind::If { test, consequent, alternate } => {
                self.visit_expr(test);
                self.visit_stmt(consequent);
                if let Some(alt) = alternate {
                    self.visit_stmt(alt);
                }
            }
            StmtKind::While { test, body } => {
                self.visit_expr(test);
                self.visit_stmt(body);
            }
            StmtKind::DoWhile { body, test } => {
                self.visit_stmt(body);
                self.visit_expr(test);
            }
            StmtKind::For { init, test, update, body } => {
                self.push_block();
                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                if let Some(test) = test {
                    self.visit_expr(test);
                }
                if let Some(update) = update {
                    self.visit_expr(update);
                }
                self.visit_stmt(body);
                self.pop_block();
            }
            StmtKind::ForOf { binding, iterable, body, .. } => {
                self.visit_expr(iterable);
                // Per-iteration binding scope (edge case).
                self.push_block();
                self.declare(*binding);
                self.visit_stmt(body);
                self.pop_block();
            }
            StmtKind::Return(expr) => {
                if let Some(expr) = expr {
                    self.visit_expr(expr);
                }
            }
            StmtKind::Throw(expr) => self.visit_expr(expr),
            StmtKind::Try { block, catch, finally } => {
                self.visit_stmt(block);
                if let Some(CatchClause { binding, body }) = catch {
                    self.push_block();
                    if let Some((id, _)) = binding {
                        self.declare(*id);
                    }
                    self.visit_stmt(body);
                    self.pop_block();
                }
                if let Some(finally) = finally {
                    self.visit_stmt(finally);
                }
            }
            StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty => {}
            StmtKind::Labeled { body, .. } => self.visit_stmt(body),
            StmtKind::FunctionDecl(id) => self.visit_function(*id, false),
            StmtKind::ClassDecl(_) => {
                // Class member bodies are functions in their own right and
                // are visited when the Linker walks `Program::functions`
                // directly; nothing here captures across a class boundary.
            }
            StmtKind::Export(_) | StmtKind::Import(_) => {}
        }
    }

    fn visit_expr(&mut self, expr: &TypedExpr) {
        match &expr.kind {
            ExprKind::NullLiteral
            | ExprKind::UndefinedLiteral
            | ExprKind::BoolLiteral(_)
            | ExprKind::NumberLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::BigIntLiteral(_)
            | ExprKind::Super => {}
            ExprKind::This => self.reference_this(),
            ExprKind::Identifier(id, name) => self.reference(*id, name.as_str()),
            ExprKind::ArrayLiteral(items) => items.iter().for_each(|e| self.visit_expr(e)),
            ExprKind::ObjectLiteral(entries) => entries.iter().for_each(|(_, e)| self.visit_expr(e)),
            ExprKind::TemplateLiteral { exprs, .. } => exprs.iter().for_each(|e| self.visit_expr(e)),
            ExprKind::Paren(inner)
            | ExprKind::Spread(inner)
            | ExprKind::Await(inner)
            | ExprKind::UnionProject(inner) => self.visit_expr(inner),
            ExprKind::UnionConvert { value, .. } => self.visit_expr(value),
            ExprKind::Unary { operand, .. } => self.visit_expr(operand),
            ExprKind::IncDec { target, .. } => self.visit_expr(target),
            ExprKind::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            ExprKind::Assign { target, value, .. } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            ExprKind::Conditional { test, consequent, alternate } => {
                self.visit_expr(test);
                self.visit_expr(consequent);
                self.visit_expr(alternate);
            }
            ExprKind::Call { callee, args, .. } => {
                self.visit_expr(callee);
                args.iter().for_each(|a| self.visit_expr(a));
            }
            ExprKind::New { callee, args } => {
                self.visit_expr(callee);
                args.iter().for_each(|a| self.visit_expr(a));
            }
            ExprKind::PropertyAccess { object, .. } => self.visit_expr(object),
            ExprKind::IndexAccess { object, index, .. } => {
                self.visit_expr(object);
                self.visit_expr(index);
            }
            ExprKind::StaticFieldAccess { .. } => {}
            ExprKind::Yield { argument, .. } => {
                if let Some(arg) = argument {
                    self.visit_expr(arg);
                }
            }
            ExprKind::FunctionExpr(id) => self.visit_function(*id, false),
            ExprKind::ArrowExpr(id) => self.visit_function(*id, true),
        }
    }
}
