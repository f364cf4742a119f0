//! Command implementations and dispatch.

pub mod annotations;
pub mod build;
pub mod check;
pub mod config;
pub mod init;
pub mod search;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config => config::run(ctx),
        Commands::Build(cmd) => build::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Annotations(cmd) => annotations::run(ctx, &cmd),
    }
}
