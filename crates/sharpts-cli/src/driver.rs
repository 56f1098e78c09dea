//! Ties the pipeline together: module planning, closure/union discovery,
//! linking, and diagnostic reporting. Kept thin and free of pipeline logic
//! of its own, matching the instruction that the CLI surface stay a
//! minimal front end over the library crates.

use crate::args::CliArgs;
use anyhow::{bail, Result};
use sharpts_ast::Program;
use sharpts_common::{CompileOptions, DiagnosticBag, TargetWidth};
use sharpts_link::{BinaryImage, Linker};
use sharpts_modules::ModulePlanner;
use sharpts_unions::UnionSynthesizer;
use std::io::Write;
use tracing::{error, info, instrument};

#[instrument(skip_all)]
pub fn run(program: &Program, args: &CliArgs) -> Result<()> {
    let options = CompileOptions {
        boxing_elision: !args.no_boxing_elision,
        target_width: if args.target_width_32 { TargetWidth::Bits32 } else { TargetWidth::Bits64 },
        entry_module: 0,
    };

    let mut bag = DiagnosticBag::new();
    let module_graph = ModulePlanner::plan(program, &mut bag);
    let import_count: usize = module_graph.imports.values().map(Vec::len).sum();
    info!(modules = program.modules.len(), imports = import_count, "resolved module graph");

    for diagnostic in bag.iter() {
        error!(code = diagnostic.code(), %diagnostic.kind, "{}", diagnostic.message);
    }
    if bag.has_errors() {
        bail!("{} diagnostic(s) reported during module planning", bag.len());
    }

    let unions = UnionSynthesizer::new();
    let image = Linker::link(program, &unions, &module_graph, &options);
    write_image(&image, args)
}

fn write_image(image: &BinaryImage, args: &CliArgs) -> Result<()> {
    match &args.out {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            image.write_to(file)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            image.write_to(&mut stdout)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
