//! # kiln
//!
//! Kiln - Staged JavaScript and TypeScript transpilation in Rust.
//!
//! ## Name Origin
//!
//! A **kiln** turns shaped clay into finished ware. This binary takes a
//! tree of scripts and modules, stages one target per file, and fires them
//! into an output directory with their source maps.

use clap::{Parser, Subcommand};
use kiln::commands;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Staged JavaScript and TypeScript transpilation", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile sources into the output directory (default command)
    #[command(visible_alias = "fire")]
    Build(commands::build::BuildArgs),

    /// Report diagnostics without writing anything
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    kiln::logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Build(args)) => commands::build::run(args),
        Some(Commands::Check(args)) => commands::check::run(args),
        None => {
            // Default to build command with default args
            commands::build::run(commands::build::BuildArgs::default());
        }
    }
}
