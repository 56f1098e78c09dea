//! `BinaryImage` — the Linker's output. An in-memory struct standing in for
//! the emitted binary; `write_to` serializes it via `serde_json` purely so
//! the CLI and tests have something concrete to inspect.

use crate::entry::EntryPoint;
use crate::metadata::{ClassMetadata, FunctionMetadata, ModuleInit};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Clone, Debug, Serialize)]
pub struct BinaryImage {
    pub classes: Vec<ClassMetadata>,
    pub functions: Vec<FunctionMetadata>,
    pub module_inits: Vec<ModuleInit>,
    pub entry_point: EntryPoint,
}

impl BinaryImage {
    pub fn write_to<W: Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(io::Error::other)
    }
}
