//! Boundary scenario: `f` awaits `g()` then `h()` as operands of the same
//! `+` expression; both awaits must suspend in left-to-right source order
//! regardless of where they sit in the expression tree, and each `console.log`
//! call inside `g`/`h` dispatches through the built-in runtime entry rather
//! than a generic property call.
//!
//! ```text
//! async function f() { return 1 + await g() + await h(); }
//! async function g() { console.log("g"); return 2; }
//! async function h() { console.log("h"); return 3; }
//! ```

use sharpts_asyncx::AsyncXformer;
use sharpts_ast::{AstBuilder, BinaryOp, ExprKind, FunctionId, FunctionKind, FunctionPlan, TypedExpr, VarId};
use sharpts_common::{CompileOptions, Interner};
use sharpts_emit::{Instruction, SyncEmitter};
use sharpts_modules::ModuleGraph;
use sharpts_runtime::RuntimeFn;
use sharpts_unions::UnionSynthesizer;

fn interned(s: &str) -> sharpts_common::Atom {
    Interner::new().intern(s)
}

fn console_log(ast: &AstBuilder, message: &str) -> TypedExpr {
    let callee = TypedExpr::new(
        ExprKind::PropertyAccess {
            object: Box::new(ast.ident(VarId(u32::MAX - 1), "console", ast.any)),
            name: interned("log"),
            optional: false,
        },
        Default::default(),
        ast.any,
    );
    ast.call(callee, vec![ast.str_lit(message)], ast.void)
}

fn logging_function(id: FunctionId, name: &str, message: &str, return_value: f64) -> FunctionPlan {
    let ast = AstBuilder::new();
    FunctionPlan {
        id,
        qualified_name: interned(name),
        params: vec![],
        return_ty: ast.number,
        body: vec![ast.expr_stmt(console_log(&ast, message)), ast.return_stmt(Some(ast.num(return_value)))],
        kind: FunctionKind::Async,
        decorators: vec![],
        this_id: None,
        is_method: false,
    }
}

#[test]
fn both_await_sites_suspend_and_resume_in_source_order() {
    let ast = AstBuilder::new();
    let p = VarId(0);

    let await_g = ast.await_expr(ast.call(ast.ident(p, "g", ast.any), vec![], ast.number), ast.number);
    let await_h = ast.await_expr(ast.call(ast.ident(p, "h", ast.any), vec![], ast.number), ast.number);
    let one_plus_g = ast.binary(BinaryOp::Add, ast.num(1.0), await_g, ast.number);
    let sum = ast.binary(BinaryOp::Add, one_plus_g, await_h, ast.number);

    let f_plan = FunctionPlan {
        id: FunctionId(0),
        qualified_name: interned("f"),
        params: vec![],
        return_ty: ast.number,
        body: vec![ast.return_stmt(Some(sum))],
        kind: FunctionKind::Async,
        decorators: vec![],
        this_id: None,
        is_method: false,
    };

    let mut program = sharpts_ast::Program::new();
    program.define_function(f_plan.clone());
    let unions = UnionSynthesizer::new();
    let module_graph = ModuleGraph::empty();
    let emitter = SyncEmitter::new(&program, &unions, &module_graph);
    let options = CompileOptions::default();

    let (state_machine, instructions) = AsyncXformer::emit(&f_plan, &emitter, &options);

    assert_eq!(state_machine.resume_point_count(), 2);
    let suspend_positions: Vec<_> =
        instructions.iter().enumerate().filter(|(_, i)| matches!(i, Instruction::Suspend { .. })).map(|(i, _)| i).collect();
    assert_eq!(suspend_positions.len(), 2, "expected exactly one Suspend per await: {instructions:?}");
    assert!(suspend_positions[0] < suspend_positions[1], "await g() must suspend before await h(): {instructions:?}");
}

#[test]
fn console_log_dispatches_through_the_builtin_runtime_entry() {
    let g_plan = logging_function(FunctionId(0), "g", "g", 2.0);
    let mut program = sharpts_ast::Program::new();
    program.define_function(g_plan.clone());
    let unions = UnionSynthesizer::new();
    let module_graph = ModuleGraph::empty();
    let emitter = SyncEmitter::new(&program, &unions, &module_graph);
    let options = CompileOptions::default();

    let body = emitter.emit_function(g_plan.id, &options);
    assert!(
        body.iter().any(|i| matches!(i, Instruction::CallRuntime(RuntimeFn::ConsoleLog))),
        "console.log(\"g\") must dispatch through RuntimeFn::ConsoleLog: {body:?}"
    );
}
