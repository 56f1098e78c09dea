//! Per-class/per-function metadata recorded in a `BinaryImage`. Function
//! bodies are recorded as their `Debug`-formatted instruction stream rather
//! than a real encoding: `BinaryImage` stands in for "the emitted binary"
//! without pinning a wire format, so a human/JSON-inspectable summary is
//! enough to exercise the Linker's ordering guarantees in tests.

use serde::Serialize;
use sharpts_ast::FunctionId;

#[derive(Clone, Debug, Serialize)]
pub struct FieldMetadata {
    pub name: String,
    pub is_static: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct MethodMetadata {
    pub function: u32,
    pub is_static: bool,
}

/// A class type defined with empty metadata before any method body is
/// emitted, so recursive and cross-class calls resolve during emission.
#[derive(Clone, Debug, Serialize)]
pub struct ClassMetadata {
    pub id: u32,
    pub qualified_name: String,
    pub base_class: Option<u32>,
    pub fields: Vec<FieldMetadata>,
    pub methods: Vec<MethodMetadata>,
}

impl ClassMetadata {
    pub fn from_plan(plan: &sharpts_ast::ClassPlan) -> Self {
        Self {
            id: plan.id.0,
            qualified_name: plan.qualified_name.to_string(),
            base_class: plan.base_class.map(|c| c.0),
            fields: plan.fields.iter().map(|f| FieldMetadata { name: f.name.to_string(), is_static: f.is_static }).collect(),
            methods: plan.methods.iter().map(|m| MethodMetadata { function: m.function.0, is_static: m.is_static }).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionMetadata {
    pub id: u32,
    pub qualified_name: String,
    pub is_async: bool,
    pub is_generator: bool,
    /// `Debug`-formatted instructions, one entry per `Instruction`, in
    /// emission order. Present once the body pass has run; empty for the
    /// signature-only placeholder recorded in the signatures pass.
    pub body: Vec<String>,
    /// Argument-count-dispatched overload entry stubs from
    /// `SyncEmitter::synthesize_overload_entries`; empty when the function
    /// has no default parameters (`min_arity == max_arity`).
    pub overload_entries: Vec<String>,
}

impl FunctionMetadata {
    pub fn signature_only(id: FunctionId, plan: &sharpts_ast::FunctionPlan) -> Self {
        Self {
            id: id.0,
            qualified_name: plan.qualified_name.to_string(),
            is_async: plan.is_async(),
            is_generator: plan.is_generator(),
            body: Vec::new(),
            overload_entries: Vec::new(),
        }
    }
}

/// One module's top-level `export`/`import` wiring, run once at module
/// instantiation — see `SyncEmitter::emit_module_init`.
#[derive(Clone, Debug, Serialize)]
pub struct ModuleInit {
    pub module: u32,
    pub body: Vec<String>,
}
