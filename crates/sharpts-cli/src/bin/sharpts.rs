use anyhow::Result;
use clap::Parser;
use sharpts_cli::{demo, driver, CliArgs};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_target(false).init();

    let args = CliArgs::parse();
    let program = demo::build();
    driver::run(&program, &args)
}
