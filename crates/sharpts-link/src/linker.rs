//! The Linker: assembles class metadata, function signatures, and bodies in
//! dependency order, then picks an entry point.
//!
//! **Metadata ordering.** Class types are defined (empty) before any method
//! body is emitted; method signatures are defined before any other method
//! body, so recursive, mutually-recursive, and cross-class calls resolve
//! during emission; union descriptors are finalized before any method that
//! references them. Each of those is its own pass below, run strictly in
//! order.

use crate::entry::EntryPoint;
use crate::image::BinaryImage;
use crate::metadata::{ClassMetadata, FunctionMetadata, ModuleInit};
use sharpts_ast::{FunctionKind, Program};
use sharpts_asyncx::AsyncXformer;
use sharpts_common::CompileOptions;
use sharpts_emit::SyncEmitter;
use sharpts_modules::ModuleGraph;
use sharpts_unions::UnionSynthesizer;
use tracing::instrument;

pub struct Linker;

impl Linker {
    #[instrument(skip_all)]
    pub fn link(program: &Program, unions: &UnionSynthesizer, module_graph: &ModuleGraph, options: &CompileOptions) -> BinaryImage {
        // Pass 1: class metadata, empty of body content.
        let classes: Vec<_> = program.classes_in_order().into_iter().map(|id| ClassMetadata::from_plan(program.class(id))).collect();

        // Pass 2: function signatures, no bodies yet.
        let function_order = program.functions_in_order();
        let mut functions: Vec<_> =
            function_order.iter().map(|id| FunctionMetadata::signature_only(*id, program.function(*id))).collect();

        // Pass 3: finalize every union descriptor discovered so far, before
        // any body that might reference one is emitted.
        let _finalized = unions.finalize_all();

        // Pass 4: emit bodies. Synchronous functions go through the
        // typed-stack emitter directly; async/generator functions are
        // driven through the same emitter by `AsyncXformer::emit`, which
        // interleaves suspension-point instructions into the walk.
        let emitter = SyncEmitter::new(program, unions, module_graph);
        for (index, id) in function_order.iter().enumerate() {
            let plan = program.function(*id);
            let body = if plan.kind == FunctionKind::Sync {
                emitter.emit_function(*id, options).iter().map(|i| format!("{i:?}")).collect()
            } else {
                let (_sm, instructions) = AsyncXformer::emit(plan, &emitter, options);
                instructions.iter().map(|i| format!("{i:?}")).collect()
            };
            functions[index].body = body;
            if plan.kind == FunctionKind::Sync {
                functions[index].overload_entries =
                    emitter.synthesize_overload_entries(*id, options).iter().map(|i| format!("{i:?}")).collect();
            }
        }

        // Pass 5: each module's top-level `export`/`import` wiring, run
        // once at instantiation rather than folded into any function body.
        let module_inits: Vec<_> = program
            .modules
            .iter()
            .map(|module| ModuleInit {
                module: module.id.0,
                body: emitter.emit_module_init(module, options).iter().map(|i| format!("{i:?}")).collect(),
            })
            .collect();

        let module_order: Vec<u32> = program.modules.iter().map(|m| m.id.0).collect();
        let entry_point = match function_order.iter().find(|id| program.function(**id).qualified_name.as_str() == "main") {
            Some(id) => {
                let plan = program.function(*id);
                EntryPoint::Main { function: id.0, is_async: plan.is_async(), module_order }
            }
            None => EntryPoint::Synthetic { module_order },
        };

        BinaryImage { classes, functions, module_inits, entry_point }
    }
}
