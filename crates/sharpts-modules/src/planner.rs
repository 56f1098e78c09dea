//! `ModulePlanner` — two-phase export/import resolution across a `Program`.
//!
//! Phase one collects each module's direct exports independently (parallel,
//! since no module needs another's table yet). Phase two resolves imports
//! and `export *` wildcards sequentially, since a re-export can chain
//! through other modules and the planner needs to detect cycles as it
//! walks.

use crate::export_table::{ExportEntry, ExportTable};
use crate::import_binding::{ImportTarget, ResolvedImport};
use crate::snapshot::{self, SnapshotEntryKind};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use sharpts_ast::{ImportBindingKind, Program};
use sharpts_common::{Atom, Diagnostic, DiagnosticBag, DiagnosticKind, Interner, Span};

pub struct ModuleExports {
    pub table: ExportTable,
    pub wildcard_from: Vec<Atom>,
}

/// The combined result of both planning phases, threaded into `sharpts-link`
/// so the linker can emit real export/import slot instructions instead of
/// discarding the planner's work after logging a count.
#[derive(Default)]
pub struct ModuleGraph {
    pub exports: FxHashMap<sharpts_ast::ModuleId, ModuleExports>,
    pub imports: FxHashMap<sharpts_ast::ModuleId, Vec<ResolvedImport>>,
}

impl ModuleGraph {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Build every module's export table, then fully resolve `export *` and
/// `import` declarations against the combined set.
pub struct ModulePlanner;

impl ModulePlanner {
    /// Run both phases and bundle their output into one `ModuleGraph`.
    pub fn plan(program: &Program, bag: &mut DiagnosticBag) -> ModuleGraph {
        let exports = Self::collect_exports(program);
        let imports = Self::resolve_imports(program, &exports, bag);
        ModuleGraph { exports, imports }
    }

    /// Phase one: per-module export collection. Runs one task per module on
    /// the `rayon` global pool.
    pub fn collect_exports(program: &Program) -> FxHashMap<sharpts_ast::ModuleId, ModuleExports> {
        let snapshots: Vec<_> =
            program.modules.iter().map(|module| (module.id, snapshot::capture(module))).collect();

        snapshots
            .into_par_iter()
            .map(|(id, snapshot)| {
                let mut interner = Interner::new();
                let mut table = ExportTable::new();
                for entry in snapshot.entries {
                    let exported_as = interner.intern(&entry.exported_as);
                    let resolved = match entry.kind {
                        SnapshotEntryKind::Named { local } => ExportEntry::Named(interner.intern(&local)),
                        SnapshotEntryKind::Default => ExportEntry::Default,
                        SnapshotEntryKind::ReExport { remote, from_module } => ExportEntry::ReExport {
                            from_module: interner.intern(&from_module),
                            remote: interner.intern(&remote),
                        },
                    };
                    table.insert(exported_as, resolved);
                }
                let wildcard_from =
                    snapshot.re_export_all.into_iter().map(|w| interner.intern(&w.from_module)).collect();
                (id, ModuleExports { table, wildcard_from })
            })
            .collect()
    }

    /// Phase two: expand `export *` wildcards and resolve every `import`
    /// declaration to a concrete `(ModuleId, export name)` pair, following
    /// re-export chains and reporting cycles.
    pub fn resolve_imports(
        program: &Program,
        exports: &FxHashMap<sharpts_ast::ModuleId, ModuleExports>,
        bag: &mut DiagnosticBag,
    ) -> FxHashMap<sharpts_ast::ModuleId, Vec<ResolvedImport>> {
        let path_index: FxHashMap<Atom, sharpts_ast::ModuleId> =
            program.modules.iter().map(|m| (m.path.clone(), m.id)).collect();

        let mut resolved = FxHashMap::default();
        for module in &program.modules {
            let mut bindings = Vec::new();
            for stmt in &module.top_level {
                let sharpts_ast::StmtKind::Import(decl) = &stmt.kind else { continue };
                let Some(&target_module) = path_index.get(&decl.from_module) else {
                    bag.push(Diagnostic::error(
                        stmt.span,
                        DiagnosticKind::UnresolvedImport,
                        format!("module '{}' not found", decl.from_module),
                    ));
                    continue;
                };
                for spec in &decl.specifiers {
                    let target = match spec.kind {
                        ImportBindingKind::Namespace => ImportTarget::Namespace { module: target_module },
                        ImportBindingKind::Default | ImportBindingKind::Named => {
                            match resolve_export_chain(
                                exports,
                                &path_index,
                                target_module,
                                &spec.remote,
                                stmt.span,
                                bag,
                            ) {
                                Some(target) => target,
                                None => continue,
                            }
                        }
                    };
                    bindings.push(ResolvedImport { local: spec.local.clone(), target });
                }
            }
            resolved.insert(module.id, bindings);
        }
        resolved
    }
}

/// Follow a chain of `export { x } from 'm'` re-exports (and wildcard
/// re-exports) to the module that actually declares `name`, reporting a
/// `CyclicReExport` diagnostic if the chain loops back on itself.
#[allow(clippy::too_many_arguments)]
fn resolve_export_chain(
    exports: &FxHashMap<sharpts_ast::ModuleId, ModuleExports>,
    path_index: &FxHashMap<Atom, sharpts_ast::ModuleId>,
    mut module: sharpts_ast::ModuleId,
    name: &Atom,
    span: Span,
    bag: &mut DiagnosticBag,
) -> Option<ImportTarget> {
    let mut visited = vec![module];
    let mut current_name = name.clone();
    loop {
        let module_exports = exports.get(&module)?;
        match module_exports.table.get(&current_name) {
            Some(ExportEntry::Named(_)) | Some(ExportEntry::Default) => {
                return Some(ImportTarget::Value { module, export_name: current_name });
            }
            Some(ExportEntry::ReExport { from_module, remote }) => {
                let Some(&next_module) = path_index.get(from_module) else {
                    bag.push(Diagnostic::error(
                        span,
                        DiagnosticKind::UnresolvedImport,
                        format!("re-exported module '{from_module}' not found"),
                    ));
                    return None;
                };
                if visited.contains(&next_module) {
                    bag.push(Diagnostic::error(
                        span,
                        DiagnosticKind::CyclicReExport,
                        format!("re-export of '{current_name}' cycles back through an already-visited module"),
                    ));
                    return None;
                }
                visited.push(next_module);
                current_name = remote.clone();
                module = next_module;
            }
            None => {
                if module_exports.wildcard_from.is_empty() {
                    bag.push(Diagnostic::error(
                        span,
                        DiagnosticKind::UnknownExportedName,
                        format!("module has no export named '{current_name}'"),
                    ));
                    return None;
                }
                // `export * from 'm'` re-exports everything `m` exports
                // under the same name; try each wildcard source in order.
                for wildcard_source in module_exports.wildcard_from.clone() {
                    let Some(&next_module) = path_index.get(&wildcard_source) else { continue };
                    if visited.contains(&next_module) {
                        continue;
                    }
                    visited.push(next_module);
                    if let Some(found) =
                        resolve_export_chain(exports, path_index, next_module, &current_name, span, bag)
                    {
                        return Some(found);
                    }
                }
                return None;
            }
        }
    }
}
