//! Owned-`String` snapshots of a module's export declarations.
//!
//! `Atom` wraps an `Rc<str>` and is intentionally `!Send` (one interner per
//! compilation context). Collecting exports in parallel across modules with
//! `rayon` therefore can't move `Atom`s between threads directly; this
//! module copies the handful of names each export statement needs into
//! plain `String`s first, so only `Send` data crosses into the thread pool.

use sharpts_ast::{ExportKind, Module, StmtKind};

pub struct ExportSnapshotEntry {
    pub exported_as: String,
    pub kind: SnapshotEntryKind,
}

pub enum SnapshotEntryKind {
    Named { local: String },
    Default,
    ReExport { remote: String, from_module: String },
}

pub struct ReExportAllSnapshot {
    pub from_module: String,
}

#[derive(Default)]
pub struct ModuleExportSnapshot {
    pub entries: Vec<ExportSnapshotEntry>,
    pub re_export_all: Vec<ReExportAllSnapshot>,
}

pub fn capture(module: &Module) -> ModuleExportSnapshot {
    let mut snapshot = ModuleExportSnapshot::default();
    for stmt in &module.top_level {
        let StmtKind::Export(kind) = &stmt.kind else { continue };
        match kind {
            ExportKind::Named { local, exported_as } => {
                snapshot.entries.push(ExportSnapshotEntry {
                    exported_as: exported_as.as_str().to_owned(),
                    kind: SnapshotEntryKind::Named { local: local.as_str().to_owned() },
                });
            }
            ExportKind::Default(_) => {
                snapshot.entries.push(ExportSnapshotEntry {
                    exported_as: "default".to_owned(),
                    kind: SnapshotEntryKind::Default,
                });
            }
            ExportKind::ReExport { remote, exported_as, from_module } => {
                snapshot.entries.push(ExportSnapshotEntry {
                    exported_as: exported_as.as_str().to_owned(),
                    kind: SnapshotEntryKind::ReExport {
                        remote: remote.as_str().to_owned(),
                        from_module: from_module.as_str().to_owned(),
                    },
                });
            }
            ExportKind::ReExportAll { from_module } => {
                snapshot.re_export_all.push(ReExportAllSnapshot { from_module: from_module.as_str().to_owned() });
            }
        }
    }
    snapshot
}
