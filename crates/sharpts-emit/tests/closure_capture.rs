//! Boundary scenario: `function make() { let n = 0; return () => ++n; }`,
//! called three times producing `1`, `2`, `3`. `sharpts-closure` already
//! asserts `n` is captured and gets one display-class slot; this test drives
//! the same fixture through `SyncEmitter` end to end, since that's the seam
//! the slot-wiring actually has to cross.

use sharpts_ast::{AstBuilder, ExprKind, FunctionId, FunctionKind, FunctionPlan, IncDecOp, Module, ModuleId, Program, StmtKind, TypedExpr, TypedStmt, VarId};
use sharpts_common::{Atom, CompileOptions, Interner, TargetWidth};
use sharpts_emit::{Instruction, SyncEmitter};
use sharpts_modules::ModuleGraph;
use sharpts_unions::UnionSynthesizer;

fn interned(s: &str) -> Atom {
    Interner::new().intern(s)
}

fn make_counter_program() -> (Program, FunctionId, FunctionId) {
    let mut program = Program::new();
    let ast = AstBuilder::new();

    let arrow_id = program.fresh_function_id();
    let n_id = VarId(0);
    let incr = TypedExpr::new(
        ExprKind::IncDec { op: IncDecOp::PrefixIncrement, target: Box::new(ast.ident(n_id, "n", ast.number)) },
        Default::default(),
        ast.number,
    );
    program.define_function(FunctionPlan {
        id: arrow_id,
        qualified_name: interned("arrow"),
        params: vec![],
        return_ty: ast.number,
        body: vec![ast.return_stmt(Some(incr))],
        kind: FunctionKind::Sync,
        decorators: vec![],
        this_id: None,
        is_method: false,
    });

    let make_id = program.fresh_function_id();
    let n_decl = ast.let_decl(n_id, "n", Some(ast.num(0.0)));
    let arrow_expr = TypedExpr::new(ExprKind::ArrowExpr(arrow_id), Default::default(), ast.any);
    program.define_function(FunctionPlan {
        id: make_id,
        qualified_name: interned("make"),
        params: vec![],
        return_ty: ast.any,
        body: vec![n_decl, ast.return_stmt(Some(arrow_expr))],
        kind: FunctionKind::Sync,
        decorators: vec![],
        this_id: None,
        is_method: false,
    });

    program.modules.push(Module {
        id: ModuleId(0),
        path: interned("main"),
        top_level: vec![TypedStmt::new(StmtKind::FunctionDecl(make_id), Default::default())],
    });

    (program, make_id, arrow_id)
}

#[test]
fn arrow_body_reads_and_writes_the_display_slot_not_a_plain_local() {
    let (program, _make_id, arrow_id) = make_counter_program();
    let unions = UnionSynthesizer::new();
    let module_graph = ModuleGraph::empty();
    let emitter = SyncEmitter::new(&program, &unions, &module_graph);
    let options = CompileOptions { boxing_elision: true, target_width: TargetWidth::Bits64, entry_module: 0 };

    let body = emitter.emit_function(arrow_id, &options);

    assert!(
        body.iter().any(|i| matches!(i, Instruction::LoadDisplaySlot { .. })),
        "captured `n` must be read through a display slot: {body:?}"
    );
    assert!(
        !body.iter().any(|i| matches!(i, Instruction::LoadLocal(v) if *v == VarId(0))),
        "captured `n` must not fall back to a plain local read: {body:?}"
    );
}

#[test]
fn make_body_stores_the_initial_value_through_the_same_slot() {
    let (program, make_id, _arrow_id) = make_counter_program();
    let unions = UnionSynthesizer::new();
    let module_graph = ModuleGraph::empty();
    let emitter = SyncEmitter::new(&program, &unions, &module_graph);
    let options = CompileOptions { boxing_elision: true, target_width: TargetWidth::Bits64, entry_module: 0 };

    let body = emitter.emit_function(make_id, &options);

    assert!(
        body.iter().any(|i| matches!(i, Instruction::StoreDisplaySlot { .. })),
        "`make`'s own declaration of `n` must store through the display slot once it's known captured: {body:?}"
    );
}
