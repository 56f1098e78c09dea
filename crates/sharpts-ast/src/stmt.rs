//! `TypedStmt` — the control-flow-site entity .

use crate::expr::{FunctionId, TypedExpr, VarId};
use sharpts_common::{Atom, Span};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug)]
pub struct VarDeclarator {
    pub id: VarId,
    pub name: Atom,
    pub init: Option<TypedExpr>,
}

#[derive(Clone, Debug)]
pub struct CatchClause {
    /// `catch` binds a one-name scope per edge cases.
    pub binding: Option<(VarId, Atom)>,
    pub body: Box<TypedStmt>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForOfKind {
    Of,
    In,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Expression(TypedExpr),
    VariableDecl { kind: DeclKind, declarators: Vec<VarDeclarator> },
    Block(Vec<TypedStmt>),
    If { test: TypedExpr, consequent: Box<TypedStmt>, alternate: Option<Box<TypedStmt>> },
    While { test: TypedExpr, body: Box<TypedStmt> },
    DoWhile { body: Box<TypedStmt>, test: TypedExpr },
    For {
        init: Option<Box<TypedStmt>>,
        test: Option<TypedExpr>,
        update: Option<TypedExpr>,
        body: Box<TypedStmt>,
    },
    /// `for (let x of/in ...)`: gets a fresh binding scope per iteration.
    ForOf {
        kind: ForOfKind,
        binding: VarId,
        name: Atom,
        iterable: TypedExpr,
        body: Box<TypedStmt>,
    },
    Return(Option<TypedExpr>),
    Throw(TypedExpr),
    Try {
        block: Box<TypedStmt>,
        catch: Option<CatchClause>,
        finally: Option<Box<TypedStmt>>,
    },
    Break(Option<Atom>),
    Continue(Option<Atom>),
    Labeled { label: Atom, body: Box<TypedStmt> },
    FunctionDecl(FunctionId),
    ClassDecl(crate::decl::ClassId),
    Empty,
    /// `export { x }`, `export default expr`, `export * from 'm'`, handled
    /// by `sharpts-modules`' `ModulePlanner`; the typed-AST representation
    /// just records intent so planning can see it without re-parsing.
    Export(ExportKind),
    Import(ImportDecl),
}

#[derive(Clone, Debug)]
pub enum ExportKind {
    Named { local: Atom, exported_as: Atom },
    Default(TypedExpr),
    ReExport { remote: Atom, exported_as: Atom, from_module: Atom },
    ReExportAll { from_module: Atom },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportBindingKind {
    Named,
    Default,
    Namespace,
}

#[derive(Clone, Debug)]
pub struct ImportSpecifier {
    pub kind: ImportBindingKind,
    pub local: Atom,
    /// Remote export name; unused (equal to `local`) for namespace imports.
    pub remote: Atom,
}

#[derive(Clone, Debug)]
pub struct ImportDecl {
    pub from_module: Atom,
    pub specifiers: Vec<ImportSpecifier>,
}

#[derive(Clone, Debug)]
pub struct TypedStmt {
    pub kind: StmtKind,
    pub span: Span,
    /// Labels attached directly ahead of this statement (besides the
    /// `Labeled` wrapper, kept for quick lookup by `break`/`continue`).
    pub labels: Rc<[Atom]>,
}

impl TypedStmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span, labels: Rc::from(Vec::new()) }
    }
}
