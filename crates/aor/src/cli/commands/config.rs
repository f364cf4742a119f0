//! Implementation of `aor config`.

use std::process::ExitCode;

use crate::cli::{context::CommandContext, output::print_highlighted};

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    match ctx.config.to_toml() {
        Ok(toml) => {
            print_highlighted(&toml, "toml");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
