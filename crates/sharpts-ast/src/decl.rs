//! `FunctionPlan` and `ClassPlan` — the function/class entities of the
//! typed AST.

use crate::expr::{FunctionId, TypedExpr, VarId};
use crate::stmt::TypedStmt;
use crate::types::TypeId;
use sharpts_common::Atom;

pub use crate::types::ClassId;

/// Decorators recognised by the core emitter. Attribute *encoding* for
/// arbitrary user decorators is out of scope; `@lock` is the one
/// decorator whose lowering the emitter itself performs, so it
/// gets a first-class variant. Anything else passes through opaquely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decorator {
    Lock,
    Other(Atom),
}

#[derive(Clone, Debug)]
pub struct Param {
    pub id: VarId,
    pub name: Atom,
    pub ty: TypeId,
    pub default: Option<TypedExpr>,
    pub rest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    Sync,
    Async,
    Generator,
    AsyncGenerator,
}

/// A function or method being emitted (`FunctionPlan`).
#[derive(Clone, Debug)]
pub struct FunctionPlan {
    pub id: FunctionId,
    pub qualified_name: Atom,
    pub params: Vec<Param>,
    pub return_ty: TypeId,
    pub body: Vec<TypedStmt>,
    pub kind: FunctionKind,
    pub decorators: Vec<Decorator>,
    /// `this` parameter id, present for methods and for functions whose body
    /// is known (by the `ClosureAnalyzer`) to reference `this`.
    pub this_id: Option<VarId>,
    pub is_method: bool,
}

impl FunctionPlan {
    pub const fn is_async(&self) -> bool {
        matches!(self.kind, FunctionKind::Async | FunctionKind::AsyncGenerator)
    }

    pub const fn is_generator(&self) -> bool {
        matches!(self.kind, FunctionKind::Generator | FunctionKind::AsyncGenerator)
    }

    pub fn has_lock_decorator(&self) -> bool {
        self.decorators.contains(&Decorator::Lock)
    }

    /// Smallest legal call arity: the count of leading parameters with no
    /// default and no rest, used to synthesize the overload entry points
    /// requires for functions with default parameters.
    pub fn min_arity(&self) -> usize {
        self.params.iter().take_while(|p| p.default.is_none() && !p.rest).count()
    }

    pub fn max_arity(&self) -> usize {
        self.params.iter().filter(|p| !p.rest).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

#[derive(Clone, Debug)]
pub struct FieldPlan {
    pub name: Atom,
    pub ty: TypeId,
    pub is_static: bool,
    pub visibility: Visibility,
    pub initializer: Option<TypedExpr>,
}

#[derive(Clone, Debug)]
pub struct MethodPlan {
    pub function: FunctionId,
    pub is_static: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
}

/// A class being emitted (`ClassPlan`).
#[derive(Clone, Debug)]
pub struct ClassPlan {
    pub id: ClassId,
    pub qualified_name: Atom,
    pub base_class: Option<ClassId>,
    pub fields: Vec<FieldPlan>,
    pub methods: Vec<MethodPlan>,
    pub is_abstract: bool,
    /// Generic parameter names; the emitter erases them (no reified
    /// generics), matching the "no JIT/tiered optimisation" non-goal's
    /// sibling assumption that generics are compile-time only.
    pub generic_params: Vec<Atom>,
}

impl ClassPlan {
    /// Whether any method is declared abstract while the class itself is
    /// concrete — the `UnsupportedAbstractInConcreteClass` diagnostic kind.
    pub fn has_unsupported_abstract_member(&self) -> bool {
        !self.is_abstract && self.methods.iter().any(|m| m.is_abstract)
    }
}
