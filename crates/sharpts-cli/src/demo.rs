//! A toy front end: the lexer/parser/type checker that would normally
//! produce a typed AST from source text are out of scope for this
//! workspace, so the CLI builds one fixed demonstration `Program` directly
//! with `sharpts_ast::AstBuilder`, the same construction path the test
//! suites use, and runs it through the real pipeline.

use sharpts_ast::{
    AstBuilder, BinaryOp, Decorator, ExportKind, FunctionKind, FunctionPlan, ImportBindingKind, ImportDecl,
    ImportSpecifier, Module, ModuleId, Param, Program, StmtKind, TypedStmt,
};
use sharpts_common::Interner;

pub fn build() -> Program {
    let ast = AstBuilder::new();
    let mut program = Program::new();
    let mut interner = Interner::new();

    // module "math": export function add(a, b) { return a + b; }
    let add_id = program.fresh_function_id();
    let a = program.fresh_var_id();
    let b = program.fresh_var_id();
    let add_plan = FunctionPlan {
        id: add_id,
        qualified_name: interner.intern("math.add"),
        params: vec![
            Param { id: a, name: interner.intern("a"), ty: ast.number, default: None, rest: false },
            Param { id: b, name: interner.intern("b"), ty: ast.number, default: None, rest: false },
        ],
        return_ty: ast.number,
        body: vec![ast.return_stmt(Some(ast.binary(BinaryOp::Add, ast.ident(a, "a", ast.number), ast.ident(b, "b", ast.number), ast.number)))],
        kind: FunctionKind::Sync,
        decorators: vec![],
        this_id: None,
        is_method: false,
    };
    program.define_function(add_plan);

    let math_module_id = ModuleId(0);
    program.modules.push(Module {
        id: math_module_id,
        path: interner.intern("math"),
        top_level: vec![
            TypedStmt::new(StmtKind::FunctionDecl(add_id), Default::default()),
            TypedStmt::new(
                StmtKind::Export(ExportKind::Named { local: interner.intern("add"), exported_as: interner.intern("add") }),
                Default::default(),
            ),
        ],
    });

    // module "main": async function fetchTotal() { return await add(1, 2); }
    // function main(args: string[]): void {}
    let fetch_id = program.fresh_function_id();
    let call_add = ast.call(ast.ident(fetch_var_id(), "add", ast.any), vec![ast.num(1.0), ast.num(2.0)], ast.number);
    let fetch_plan = FunctionPlan {
        id: fetch_id,
        qualified_name: interner.intern("main.fetchTotal"),
        params: vec![],
        return_ty: ast.number,
        body: vec![ast.return_stmt(Some(ast.await_expr(call_add, ast.number)))],
        kind: FunctionKind::Async,
        decorators: vec![Decorator::Lock],
        this_id: None,
        is_method: false,
    };
    program.define_function(fetch_plan);

    let main_id = program.fresh_function_id();
    let args_var = program.fresh_var_id();
    let main_plan = FunctionPlan {
        id: main_id,
        qualified_name: interner.intern("main"),
        params: vec![Param {
            id: args_var,
            name: interner.intern("args"),
            ty: ast.any,
            default: None,
            rest: false,
        }],
        return_ty: ast.void,
        body: vec![],
        kind: FunctionKind::Sync,
        decorators: vec![],
        this_id: None,
        is_method: false,
    };
    program.define_function(main_plan);

    program.modules.push(Module {
        id: ModuleId(1),
        path: interner.intern("main"),
        top_level: vec![
            TypedStmt::new(
                StmtKind::Import(ImportDecl {
                    from_module: interner.intern("math"),
                    specifiers: vec![ImportSpecifier {
                        kind: ImportBindingKind::Named,
                        local: interner.intern("add"),
                        remote: interner.intern("add"),
                    }],
                }),
                Default::default(),
            ),
            TypedStmt::new(StmtKind::FunctionDecl(fetch_id), Default::default()),
            TypedStmt::new(StmtKind::FunctionDecl(main_id), Default::default()),
        ],
    });

    program
}

/// The demo's `add` import binds to a local var id distinct from the
/// `math` module's own parameter ids; used only to build the identifier
/// expression the toy body calls through.
fn fetch_var_id() -> sharpts_ast::VarId {
    sharpts_ast::VarId(u32::MAX - 1)
}

pub const ENTRY_FUNCTION_NAME: &str = "main";
