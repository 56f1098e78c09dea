use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the `sharpts` binary.
#[derive(Parser, Debug)]
#[command(name = "sharpts", version, about = "SharpTS ahead-of-time compiler")]
pub struct CliArgs {
    /// Where to write the linked `BinaryImage` as JSON. Defaults to stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Disable the typed-stack boxing-elision optimization.
    #[arg(long = "no-boxing-elision")]
    pub no_boxing_elision: bool,

    /// Use a 32-bit target width for `>>>` lowering instead of 64-bit.
    #[arg(long = "target-width-32")]
    pub target_width_32: bool,
}
