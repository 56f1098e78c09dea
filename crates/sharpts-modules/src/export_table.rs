//! `ExportTable` — the resolved set of names one module exposes to
//! importers, in declaration order.

use indexmap::IndexMap;
use sharpts_common::Atom;

#[derive(Clone, Debug)]
pub enum ExportEntry {
    /// `export { local as exported_as }` / `export function f() {}`.
    Named(Atom),
    /// `export default <expr>`; the expression itself is emitted by the
    /// emitter, this table only records that the slot exists.
    Default,
    /// `export { x } from 'other'` — resolved to the concrete source module
    /// and name by `ModulePlanner::resolve_imports`.
    ReExport { from_module: Atom, remote: Atom },
}

/// Exported names in declaration order, keyed by the name importers see
/// (`exported_as`), preserving order the way `IndexMap` does — needed
/// because a `Linker` entry-point pass walks exports in source order.
#[derive(Default, Debug)]
pub struct ExportTable {
    entries: IndexMap<Atom, ExportEntry>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an export, returning the name again if one was already
    /// registered under it (duplicate export).
    pub fn insert(&mut self, exported_as: Atom, entry: ExportEntry) -> Option<Atom> {
        if self.entries.contains_key(&exported_as) {
            return Some(exported_as);
        }
        self.entries.insert(exported_as, entry);
        None
    }

    pub fn get(&self, name: &Atom) -> Option<&ExportEntry> {
        self.entries.get(name)
    }

    /// The slot index a linked module stores this export's value at,
    /// matching declaration order (`IndexMap` insertion order).
    pub fn slot_of(&self, name: &Atom) -> Option<u32> {
        self.entries.get_index_of(name).map(|i| i as u32)
    }

    pub fn names(&self) -> impl Iterator<Item = &Atom> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &ExportEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
