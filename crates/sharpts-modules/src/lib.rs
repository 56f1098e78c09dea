//! Cross-module export/import resolution.
//!
//! A module's direct exports are independent of every other module, so
//! collecting them fans out over `rayon`. Resolving imports needs the full
//! picture (an import can point through a chain of re-exports into a module
//! that hasn't been visited yet), so that pass runs sequentially after every
//! export table exists. A plain cyclic import — two modules each importing
//! a concrete binding from the other — is not an error here: each side
//! resolves to the other's already-known export name, and what to do if the
//! binding's initializer hasn't run yet is a question for the runtime's
//! module instantiation, not for planning. Only a re-export chain that
//! never reaches a concrete binding is rejected, as `CyclicReExport`.

mod export_table;
mod import_binding;
mod planner;
mod snapshot;

pub use export_table::{ExportEntry, ExportTable};
pub use import_binding::{ImportTarget, ResolvedImport};
pub use planner::{ModuleExports, ModuleGraph, ModulePlanner};

#[cfg(test)]
mod tests {
    use super::*;
    use sharpts_ast::{ExportKind, ImportBindingKind, ImportDecl, ImportSpecifier, Module, ModuleId, Program, StmtKind, TypedStmt};
    use sharpts_common::{DiagnosticBag, Interner, Span};

    fn atom(interner: &mut Interner, s: &str) -> sharpts_common::Atom {
        interner.intern(s)
    }

    #[test]
    fn named_export_resolves_through_one_import() {
        let mut interner = Interner::new();
        let mut program = Program::new();

        let math_path = atom(&mut interner, "math");
        let export_stmt = TypedStmt::new(
            StmtKind::Export(ExportKind::Named {
                local: atom(&mut interner, "add"),
                exported_as: atom(&mut interner, "add"),
            }),
            Span::dummy(),
        );
        program.modules.push(Module { id: ModuleId(0), path: math_path, top_level: vec![export_stmt] });

        let main_path = atom(&mut interner, "main");
        let import_stmt = TypedStmt::new(
            StmtKind::Import(ImportDecl {
                from_module: atom(&mut interner, "math"),
                specifiers: vec![ImportSpecifier {
                    kind: ImportBindingKind::Named,
                    local: atom(&mut interner, "add"),
                    remote: atom(&mut interner, "add"),
                }],
            }),
            Span::dummy(),
        );
        program.modules.push(Module { id: ModuleId(1), path: main_path, top_level: vec![import_stmt] });

        let exports = ModulePlanner::collect_exports(&program);
        let mut bag = DiagnosticBag::new();
        let imports = ModulePlanner::resolve_imports(&program, &exports, &mut bag);

        assert!(bag.is_empty());
        let main_imports = &imports[&ModuleId(1)];
        assert_eq!(main_imports.len(), 1);
        match &main_imports[0].target {
            ImportTarget::Value { module, export_name } => {
                assert_eq!(*module, ModuleId(0));
                assert_eq!(export_name.as_str(), "add");
            }
            _ => panic!("expected a value import"),
        }
    }

    #[test]
    fn unresolved_module_is_reported() {
        let mut interner = Interner::new();
        let mut program = Program::new();
        let import_stmt = TypedStmt::new(
            StmtKind::Import(ImportDecl {
                from_module: atom(&mut interner, "missing"),
                specifiers: vec![ImportSpecifier {
                    kind: ImportBindingKind::Named,
                    local: atom(&mut interner, "x"),
                    remote: atom(&mut interner, "x"),
                }],
            }),
            Span::dummy(),
        );
        program.modules.push(Module {
            id: ModuleId(0),
            path: atom(&mut interner, "main"),
            top_level: vec![import_stmt],
        });

        let exports = ModulePlanner::collect_exports(&program);
        let mut bag = DiagnosticBag::new();
        ModulePlanner::resolve_imports(&program, &exports, &mut bag);
        assert!(bag.has_errors());
    }
}
