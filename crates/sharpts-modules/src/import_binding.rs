//! The resolved target of one `import` specifier.

use sharpts_ast::ModuleId;
use sharpts_common::Atom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportTarget {
    /// A single named or default binding, resolved past any re-export
    /// chain to the module that actually declares it.
    Value { module: ModuleId, export_name: Atom },
    /// `import * as ns from 'm'` — binds the whole export table.
    Namespace { module: ModuleId },
}

#[derive(Clone, Debug)]
pub struct ResolvedImport {
    pub local: Atom,
    pub target: ImportTarget,
}
