//! Entry-point policy: a `main(args: string[])` (or its async form) becomes
//! the program entry; otherwise a synthetic entry just runs every module's
//! top-level statements.

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub enum EntryPoint {
    /// Runs every module's top-level statements in module order (awaiting
    /// any top-level expression statement whose result is a task), then
    /// calls `main(args)`, awaiting its result if `main` is async.
    Main { function: u32, is_async: bool, module_order: Vec<u32> },
    /// No `main` found: a synthetic entry that only runs top-level
    /// statements with the same top-level-await handling.
    Synthetic { module_order: Vec<u32> },
}
