//! Boundary scenario: a top-level `console.log(await x())` lives directly in
//! a module's top-level statements, not inside any function body — exactly
//! the statement shape `SyncEmitter::emit_function` never visits, which is
//! why `emit_module_init` exists.
//!
//! ```text
//! async function x() { return 42; }
//! console.log(await x());
//! ```

use sharpts_ast::{AstBuilder, ExprKind, FunctionId, FunctionKind, FunctionPlan, Module, ModuleId, Program, TypedExpr, VarId};
use sharpts_common::{Atom, CompileOptions, Interner};
use sharpts_emit::{Instruction, SyncEmitter};
use sharpts_modules::ModuleGraph;
use sharpts_runtime::RuntimeFn;
use sharpts_unions::UnionSynthesizer;

fn interned(s: &str) -> Atom {
    Interner::new().intern(s)
}

#[test]
fn module_init_emits_the_await_and_the_console_log_call() {
    let ast = AstBuilder::new();

    let x_id = FunctionId(0);
    let x_plan = FunctionPlan {
        id: x_id,
        qualified_name: interned("x"),
        params: vec![],
        return_ty: ast.number,
        body: vec![ast.return_stmt(Some(ast.num(42.0)))],
        kind: FunctionKind::Async,
        decorators: vec![],
        this_id: None,
        is_method: false,
    };

    let call_x = ast.call(ast.ident(VarId(0), "x", ast.any), vec![], ast.number);
    let awaited = ast.await_expr(call_x, ast.number);
    let callee = TypedExpr::new(
        ExprKind::PropertyAccess {
            object: Box::new(ast.ident(VarId(u32::MAX - 1), "console", ast.any)),
            name: interned("log"),
            optional: false,
        },
        Default::default(),
        ast.any,
    );
    let log_call = ast.call(callee, vec![awaited], ast.void);

    let mut program = Program::new();
    program.define_function(x_plan);
    program.modules.push(Module {
        id: ModuleId(0),
        path: interned("main"),
        top_level: vec![ast.expr_stmt(log_call)],
    });

    let unions = UnionSynthesizer::new();
    let module_graph = ModuleGraph::empty();
    let emitter = SyncEmitter::new(&program, &unions, &module_graph);
    let options = CompileOptions::default();

    let init = emitter.emit_module_init(&program.modules[0], &options);

    assert!(init.iter().any(|i| matches!(i, Instruction::CallDirect { function, .. } if *function == x_id)));
    assert!(init.iter().any(|i| matches!(i, Instruction::CallRuntime(RuntimeFn::ConsoleLog))));
}
