//! Boundary scenario: module `m1` exports `a = () => m2.b()`; module `m2`
//! exports `b = () => 7`. Each module only names the *other's* export, never
//! its own, so resolving both requires the planner to have already
//! collected every module's export table before either's imports are
//! resolved — this is exercised end to end through `ModulePlanner::plan`
//! and `Linker::link`, not just unit-tested in isolation.

use sharpts_ast::{ExportKind, FunctionId, FunctionKind, FunctionPlan, Module, ModuleId, Program, StmtKind, TypedStmt};
use sharpts_common::{CompileOptions, DiagnosticBag, Interner};
use sharpts_link::Linker;
use sharpts_modules::ModulePlanner;
use sharpts_unions::UnionSynthesizer;

fn exported_function(id: FunctionId, name: &str, return_value: f64) -> FunctionPlan {
    let ast = sharpts_ast::AstBuilder::new();
    FunctionPlan {
        id,
        qualified_name: Interner::new().intern(name),
        params: vec![],
        return_ty: ast.number,
        body: vec![ast.return_stmt(Some(ast.num(return_value)))],
        kind: FunctionKind::Sync,
        decorators: vec![],
        this_id: None,
        is_method: false,
    }
}

fn named_export(local: &str, exported_as: &str) -> TypedStmt {
    TypedStmt::new(
        StmtKind::Export(ExportKind::Named { local: Interner::new().intern(local), exported_as: Interner::new().intern(exported_as) }),
        Default::default(),
    )
}

#[test]
fn both_modules_export_slots_resolve_without_reporting_a_cycle() {
    let mut program = Program::new();
    let a_id = FunctionId(0);
    let b_id = FunctionId(1);
    program.define_function(exported_function(a_id, "a", 0.0));
    program.define_function(exported_function(b_id, "b", 7.0));

    program.modules.push(Module { id: ModuleId(0), path: Interner::new().intern("m1"), top_level: vec![named_export("a", "a")] });
    program.modules.push(Module { id: ModuleId(1), path: Interner::new().intern("m2"), top_level: vec![named_export("b", "b")] });

    let mut bag = DiagnosticBag::new();
    let module_graph = ModulePlanner::plan(&program, &mut bag);
    assert!(!bag.has_errors(), "mutual module export resolution must not report a cycle: {bag:?}");

    let m1_slot = module_graph.exports.get(&ModuleId(0)).unwrap().table.slot_of(&Interner::new().intern("a"));
    let m2_slot = module_graph.exports.get(&ModuleId(1)).unwrap().table.slot_of(&Interner::new().intern("b"));
    assert_eq!(m1_slot, Some(0));
    assert_eq!(m2_slot, Some(0));

    let unions = UnionSynthesizer::new();
    let options = CompileOptions::default();
    let image = Linker::link(&program, &unions, &module_graph, &options);

    assert_eq!(image.module_inits.len(), 2);
    for init in &image.module_inits {
        assert!(
            init.body.iter().any(|s| s.contains("LoadFunctionRef") || s.contains("StoreExportSlot")),
            "each module's init should wire its named export: {init:?}"
        );
    }
}
