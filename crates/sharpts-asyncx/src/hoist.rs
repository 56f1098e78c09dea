//! Live-variable-across-suspension analysis: a post-order walk that tracks
//! whether a `yield`/`await` has been crossed, recording any variable read
//! after a crossing as a field the state machine must hoist rather than
//! keep as an ordinary local.

use crate::suspension::{StateId, SuspensionPoint, TryRegionId};
use rustc_hash::{FxHashMap, FxHashSet};
use sharpts_ast::{ExprKind, StmtKind, TypedExpr, TypedStmt, VarId};

struct Draft {
    state_id: StateId,
    is_yield: bool,
    is_delegating: bool,
    enclosing_try_region: Option<TryRegionId>,
}

struct Walker {
    next_state: u32,
    next_try_region: u32,
    crossed: bool,
    try_stack: Vec<TryRegionId>,
    seen_suspensions: Vec<StateId>,
    hoisted: FxHashSet<VarId>,
    live_by_suspension: FxHashMap<StateId, FxHashSet<VarId>>,
    drafts: Vec<Draft>,
}

impl Walker {
    fn new() -> Self {
        Self {
            next_state: 0,
            next_try_region: 0,
            crossed: false,
            try_stack: Vec::new(),
            seen_suspensions: Vec::new(),
            hoisted: FxHashSet::default(),
            live_by_suspension: FxHashMap::default(),
            drafts: Vec::new(),
        }
    }

    fn record_suspension(&mut self, is_yield: bool, is_delegating: bool) -> StateId {
        let id = StateId(self.next_state);
        self.next_state += 1;
        self.drafts.push(Draft {
            state_id: id,
            is_yield,
            is_delegating,
            enclosing_try_region: self.try_stack.last().copied(),
        });
        self.seen_suspensions.push(id);
        self.crossed = true;
        id
    }

    fn read(&mut self, var: VarId) {
        if self.crossed {
            self.hoisted.insert(var);
            for sid in &self.seen_suspensions {
                self.live_by_suspension.entry(*sid).or_default().insert(var);
            }
        }
    }

    fn walk_stmts(&mut self, stmts: &[TypedStmt]) {
        for s in stmts {
            self.walk_stmt(s);
        }
    }

    fn walk_stmt(&mut self, stmt: &TypedStmt) {
        match &stmt.kind {
            StmtKind::Expression(e) => self.walk_expr(e),
            StmtKind::VariableDecl { declarators, .. } => {
                for d in declarators {
                    if let Some(init) = &d.init {
                        self.walk_expr(init);
                    }
                }
            }
            StmtKind::Block(stmts) => self.walk_stmts(stmts),
            StmtKind::If { test, consequent, alternate } => {
                self.walk_expr(test);
                self.walk_stmt(consequent);
                if let Some(alt) = alternate {
                    self.walk_stmt(alt);
                }
            }
            StmtKind::While { test, body } | StmtKind::DoWhile { body, test } => {
                self.walk_expr(test);
                self.walk_stmt(body);
            }
            StmtKind::For { init, test, update, body } => {
                if let Some(init) = init {
                    self.walk_stmt(init);
                }
                if let Some(test) = test {
                    self.walk_expr(test);
                }
                self.walk_stmt(body);
                if let Some(update) = update {
                    self.walk_expr(update);
                }
            }
            StmtKind::ForOf { iterable, body, .. } => {
                self.walk_expr(iterable);
                self.walk_stmt(body);
            }
            StmtKind::Return(expr) => {
                if let Some(e) = expr {
                    self.walk_expr(e);
                }
            }
            StmtKind::Throw(e) => self.walk_expr(e),
            StmtKind::Try { block, catch, finally } => {
                let region = TryRegionId(self.next_try_region);
                self.next_try_region += 1;
                self.try_stack.push(region);
                self.walk_stmt(block);
                self.try_stack.pop();
                if let Some(catch) = catch {
                    self.walk_stmt(&catch.body);
                }
                if let Some(f) = finally {
                    self.walk_stmt(f);
                }
            }
            StmtKind::Labeled { body, .. } => self.walk_stmt(body),
            StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Empty
            | StmtKind::FunctionDecl(_)
            | StmtKind::ClassDecl(_)
            | StmtKind::Export(_)
            | StmtKind::Import(_) => {}
        }
    }

    fn walk_expr(&mut self, expr: &TypedExpr) {
        match &expr.kind {
            ExprKind::Identifier(var, _) => self.read(*var),
            ExprKind::NullLiteral
            | ExprKind::UndefinedLiteral
            | ExprKind::BoolLiteral(_)
            | ExprKind::NumberLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::BigIntLiteral(_)
            | ExprKind::This
            | ExprKind::Super
            | ExprKind::FunctionExpr(_)
            | ExprKind::ArrowExpr(_) => {}
            ExprKind::ArrayLiteral(items) => {
                for item in items {
                    self.walk_expr(item);
                }
            }
            ExprKind::ObjectLiteral(entries) => {
                for (_, v) in entries {
                    self.walk_expr(v);
                }
            }
            ExprKind::TemplateLiteral { exprs, .. } => {
                for e in exprs {
                    self.walk_expr(e);
                }
            }
            ExprKind::Paren(inner)
            | ExprKind::Spread(inner)
            | ExprKind::UnionProject(inner)
            | ExprKind::UnionConvert { value: inner, .. } => self.walk_expr(inner),
            ExprKind::Unary { operand, .. } => self.walk_expr(operand),
            ExprKind::IncDec { target, .. } => self.walk_expr(target),
            ExprKind::Binary { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            ExprKind::Assign { target, value, .. } => {
                self.walk_expr(value);
                self.walk_expr(target);
            }
            ExprKind::Conditional { test, consequent, alternate } => {
                self.walk_expr(test);
                self.walk_expr(consequent);
                self.walk_expr(alternate);
            }
            ExprKind::Call { callee, args, .. } => {
                self.walk_expr(callee);
                for a in args {
                    self.walk_expr(a);
                }
            }
            ExprKind::New { callee, args } => {
                self.walk_expr(callee);
                for a in args {
                    self.walk_expr(a);
                }
            }
            ExprKind::PropertyAccess { object, .. } => self.walk_expr(object),
            ExprKind::IndexAccess { object, index, .. } => {
                self.walk_expr(object);
                self.walk_expr(index);
            }
            ExprKind::StaticFieldAccess { .. } => {}
            ExprKind::Await(inner) => {
                self.walk_expr(inner);
                self.record_suspension(false, false);
            }
            ExprKind::Yield { argument, delegate } => {
                if let Some(arg) = argument {
                    self.walk_expr(arg);
                }
                self.record_suspension(true, *delegate);
            }
        }
    }
}

/// Outcome of hoisting analysis for one function body: every suspension
/// point in source order, plus the set of locals that must become
/// state-machine fields.
pub struct HoistAnalysis {
    pub suspensions: Vec<SuspensionPoint>,
    pub hoisted_locals: Vec<VarId>,
}

pub fn analyze(body: &[TypedStmt]) -> HoistAnalysis {
    let mut walker = Walker::new();
    walker.walk_stmts(body);
    let Walker { hoisted, live_by_suspension, drafts, .. } = walker;
    let suspensions = drafts
        .into_iter()
        .map(|d| {
            let mut live_vars: Vec<_> = live_by_suspension.get(&d.state_id).into_iter().flatten().copied().collect();
            live_vars.sort_by_key(|v| v.0);
            SuspensionPoint {
                state_id: d.state_id,
                is_yield: d.is_yield,
                is_delegating: d.is_delegating,
                enclosing_try_region: d.enclosing_try_region,
                live_vars,
            }
        })
        .collect();
    let mut hoisted_locals: Vec<_> = hoisted.into_iter().collect();
    hoisted_locals.sort_by_key(|v| v.0);
    HoistAnalysis { suspensions, hoisted_locals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpts_ast::{AstBuilder, IncDecOp};

    #[test]
    fn variable_read_after_await_is_hoisted() {
        let ast = AstBuilder::new();
        let x = VarId(0);
        // let x = 1; await p; x + 1;
        let decl = ast.let_decl(x, "x", Some(ast.num(1.0)));
        let await_stmt = TypedStmt::new(
            StmtKind::Expression(TypedExpr::new(ExprKind::Await(Box::new(ast.ident(VarId(1), "p", ast.any))), Default::default(), ast.any)),
            Default::default(),
        );
        let use_stmt = TypedStmt::new(
            StmtKind::Expression(TypedExpr::new(
                ExprKind::IncDec { op: IncDecOp::PostfixIncrement, target: Box::new(ast.ident(x, "x", ast.number)) },
                Default::default(),
                ast.number,
            )),
            Default::default(),
        );
        let analysis = analyze(&[decl, await_stmt, use_stmt]);
        assert_eq!(analysis.suspensions.len(), 1);
        assert!(analysis.hoisted_locals.contains(&x));
        assert!(analysis.suspensions[0].live_vars.contains(&x));
    }

    #[test]
    fn variable_used_only_before_await_stays_local() {
        let ast = AstBuilder::new();
        let x = VarId(0);
        let decl = ast.let_decl(x, "x", Some(ast.num(1.0)));
        let use_before = TypedStmt::new(
            StmtKind::Expression(TypedExpr::new(
                ExprKind::IncDec { op: IncDecOp::PostfixIncrement, target: Box::new(ast.ident(x, "x", ast.number)) },
                Default::default(),
                ast.number,
            )),
            Default::default(),
        );
        let await_stmt = TypedStmt::new(
            StmtKind::Expression(TypedExpr::new(ExprKind::Await(Box::new(ast.ident(VarId(1), "p", ast.any))), Default::default(), ast.any)),
            Default::default(),
        );
        let analysis = analyze(&[decl, use_before, await_stmt]);
        assert!(!analysis.hoisted_locals.contains(&x));
    }
}
