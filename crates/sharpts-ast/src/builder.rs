//! Minimal construction helpers for typed-AST fixtures.
//!
//! The lexer, parser, and type checker that would normally produce a typed
//! AST are out of scope for this workspace; this module plays
//! their role for tests and for the CLI's toy front end, the way
//! `tsz`'s `test_fixtures.rs` builds ASTs directly for emitter unit tests
//! rather than always round-tripping through the scanner.

use crate::expr::{BinaryOp, ExprKind, FunctionId, TypedExpr, VarId};
use crate::stmt::{DeclKind, StmtKind, TypedStmt, VarDeclarator};
use crate::types::{Primitive, TypeArena, TypeDescriptor, TypeId};
use sharpts_common::{Atom, Span};

pub struct AstBuilder {
    pub types: TypeArena,
    pub number: TypeId,
    pub string: TypeId,
    pub boolean: TypeId,
    pub any: TypeId,
    pub void: TypeId,
    pub null: TypeId,
}

impl Default for AstBuilder {
    fn default() -> Self {
        let mut types = TypeArena::new();
        let number = types.intern(TypeDescriptor::Primitive(Primitive::Number));
        let string = types.intern(TypeDescriptor::Primitive(Primitive::String));
        let boolean = types.intern(TypeDescriptor::Primitive(Primitive::Bool));
        let any = types.intern(TypeDescriptor::Any);
        let void = types.intern(TypeDescriptor::Void);
        let null = types.intern(TypeDescriptor::Null);
        Self { types, number, string, boolean, any, void, null }
    }
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num(&self, value: f64) -> TypedExpr {
        TypedExpr::new(ExprKind::NumberLiteral(value), Span::dummy(), self.number)
    }

    pub fn str_lit(&self, value: &str) -> TypedExpr {
        TypedExpr::new(ExprKind::StringLiteral(Atom::fake(value)), Span::dummy(), self.string)
    }

    pub fn ident(&self, id: VarId, name: &str, ty: TypeId) -> TypedExpr {
        TypedExpr::new(ExprKind::Identifier(id, Atom::fake(name)), Span::dummy(), ty)
    }

    pub fn binary(&self, op: BinaryOp, left: TypedExpr, right: TypedExpr, ty: TypeId) -> TypedExpr {
        TypedExpr::new(
            ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
            Span::dummy(),
            ty,
        )
    }

    pub fn call(&self, callee: TypedExpr, args: Vec<TypedExpr>, ty: TypeId) -> TypedExpr {
        TypedExpr::new(ExprKind::Call { callee: Box::new(callee), args, optional: false }, Span::dummy(), ty)
    }

    pub fn await_expr(&self, value: TypedExpr, ty: TypeId) -> TypedExpr {
        TypedExpr::new(ExprKind::Await(Box::new(value)), Span::dummy(), ty)
    }

    pub fn yield_expr(&self, value: Option<TypedExpr>, ty: TypeId) -> TypedExpr {
        TypedExpr::new(
            ExprKind::Yield { argument: value.map(Box::new), delegate: false },
            Span::dummy(),
            ty,
        )
    }

    pub fn let_decl(&self, id: VarId, name: &str, init: Option<TypedExpr>) -> TypedStmt {
        TypedStmt::new(
            StmtKind::VariableDecl {
                kind: DeclKind::Let,
                declarators: vec![VarDeclarator { id, name: Atom::fake(name), init }],
            },
            Span::dummy(),
        )
    }

    pub fn expr_stmt(&self, expr: TypedExpr) -> TypedStmt {
        TypedStmt::new(StmtKind::Expression(expr), Span::dummy())
    }

    pub fn return_stmt(&self, expr: Option<TypedExpr>) -> TypedStmt {
        TypedStmt::new(StmtKind::Return(expr), Span::dummy())
    }
}

/// Test-only convenience: `Interner` requires `&mut self`, which is awkward
/// to thread through fixture builders. Fixtures don't need real
/// deduplication, only a stable `Atom`, so this leaks a tiny `Rc<str>` per
/// call — acceptable in test code, never used by the real pipeline.
trait FakeAtom {
    fn fake(s: &str) -> Atom;
}

impl FakeAtom for Atom {
    fn fake(s: &str) -> Atom {
        let mut interner = sharpts_common::Interner::new();
        interner.intern(s)
    }
}

pub fn fresh_function_id(n: u32) -> FunctionId {
    FunctionId(n)
}
