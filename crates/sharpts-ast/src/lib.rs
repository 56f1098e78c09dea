//! Typed AST data model for the SharpTS emitter core.
//!
//! This crate defines the typed AST: `TypedExpr`,
//! `TypedStmt`, `TypeDescriptor`, `FunctionPlan`, `ClassPlan`. Producing this
//! AST from source text (lexing, parsing, type checking) is out of scope —
//! this crate only defines the shape and a minimal test-fixture builder.

pub mod builder;
pub mod decl;
pub mod expr;
pub mod program;
pub mod stmt;
pub mod types;

pub use builder::AstBuilder;
pub use decl::{
    ClassId, ClassPlan, Decorator, FieldPlan, FunctionKind, FunctionPlan, MethodPlan, Param, Visibility,
};
pub use expr::{AssignOp, BinaryOp, ExprKind, FunctionId, IncDecOp, TypedExpr, UnaryOp, VarId};
pub use program::{Module, ModuleId, Program};
pub use stmt::{CatchClause, DeclKind, ExportKind, ImportDecl, StmtKind, TypedStmt, VarDeclarator};
pub use types::{Primitive, TypeArena, TypeDescriptor, TypeId};
