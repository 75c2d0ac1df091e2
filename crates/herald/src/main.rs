//! Herald: a OneBot webhook bot.
//!
//! ```text
//! herald --config herald.toml --profile production
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use herald_framework::builtin::register_builtins;
use herald_framework::{CommandRegistry, RegistryBuilder};
use herald_runtime::HeraldRuntime;

#[derive(Parser, Debug)]
#[command(name = "herald", version, about = "A OneBot webhook bot")]
struct Args {
    /// Runtime configuration file (defaults to herald.toml lookup)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Configuration profile, overrides HERALD_PROFILE
    #[arg(short, long)]
    profile: Option<String>,

    /// Ignore HERALD_* environment variables
    #[arg(long)]
    no_env: bool,
}

/// Builds the registry, or prints every registration defect.
fn build_registry() -> Option<CommandRegistry> {
    let mut builder = RegistryBuilder::new();
    register_builtins(&mut builder);
    commands::register(&mut builder);

    match builder.build() {
        Ok(registry) => Some(registry),
        Err(errors) => {
            eprintln!("Herald cannot start: {} registration error(s)", errors.errors().len());
            for err in errors.errors() {
                eprintln!("  [x] {err}");
                eprintln!("      [+] {}", err.remediation());
            }
            None
        }
    }
}

async fn run(args: Args, registry: CommandRegistry) -> Result<()> {
    let mut builder = HeraldRuntime::builder();
    if let Some(path) = args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = args.profile {
        builder = builder.profile(profile);
    }
    if args.no_env {
        builder = builder.without_env();
    }

    let runtime = builder.build().context("loading runtime configuration")?;
    runtime.run(registry).await.context("running Herald")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let Some(registry) = build_registry() else {
        return ExitCode::FAILURE;
    };

    match run(args, registry).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
