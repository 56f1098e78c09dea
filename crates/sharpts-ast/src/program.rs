//! `Program` — the whole typed-AST input to the emitter pipeline: a set of
//! modules plus the function/class/type tables they reference.

use crate::decl::{ClassId, ClassPlan, FunctionId, FunctionPlan};
use crate::stmt::TypedStmt;
use crate::types::TypeArena;
use rustc_hash::FxHashMap;
use sharpts_common::Atom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

#[derive(Clone, Debug)]
pub struct Module {
    pub id: ModuleId,
    pub path: Atom,
    pub top_level: Vec<TypedStmt>,
}

/// The full typed-AST input, owning the function/class/type tables every
/// entity refers to by id. The AST is shared-immutable input to the
/// emitter — nothing downstream mutates it.
#[derive(Default)]
pub struct Program {
    pub modules: Vec<Module>,
    pub functions: FxHashMap<FunctionId, FunctionPlan>,
    pub classes: FxHashMap<ClassId, ClassPlan>,
    pub types: TypeArena,
    next_function_id: u32,
    next_class_id: u32,
    next_var_id: u32,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_function_id(&mut self) -> FunctionId {
        let id = FunctionId(self.next_function_id);
        self.next_function_id += 1;
        id
    }

    pub fn fresh_class_id(&mut self) -> ClassId {
        let id = ClassId(self.next_class_id);
        self.next_class_id += 1;
        id
    }

    pub fn fresh_var_id(&mut self) -> crate::expr::VarId {
        let id = crate::expr::VarId(self.next_var_id);
        self.next_var_id += 1;
        id
    }

    pub fn define_function(&mut self, plan: FunctionPlan) -> FunctionId {
        let id = plan.id;
        self.functions.insert(id, plan);
        id
    }

    pub fn define_class(&mut self, plan: ClassPlan) -> ClassId {
        let id = plan.id;
        self.classes.insert(id, plan);
        id
    }

    pub fn function(&self, id: FunctionId) -> &FunctionPlan {
        self.functions.get(&id).expect("function id must reference a defined function")
    }

    pub fn class(&self, id: ClassId) -> &ClassPlan {
        self.classes.get(&id).expect("class id must reference a defined class")
    }

    /// Every function in declaration order across every module's functions
    /// table, used by passes that must visit every function once
    /// (`ClosureAnalyzer`, `UnionSynth` discovery, `Linker` signature pass).
    pub fn functions_in_order(&self) -> Vec<FunctionId> {
        let mut ids: Vec<_> = self.functions.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    pub fn classes_in_order(&self) -> Vec<ClassId> {
        let mut ids: Vec<_> = self.classes.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }
}
