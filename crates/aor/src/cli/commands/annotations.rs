//! Implementation of `aor annotations`.

use std::process::ExitCode;

use crate::cli::{args::AnnotationsCommand, context::CommandContext, output::print_json};

/// Prints the annotation list of one page as JSON.
pub fn run(ctx: &CommandContext, cmd: &AnnotationsCommand) -> ExitCode {
    let service = ctx.service();
    let list = match service.annotation_list(
        &cmd.collection,
        &cmd.book,
        &cmd.page,
        cmd.illustrations,
    ) {
        Ok(list) => list,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_value(list.to_json()) {
        Ok(value) => print_json(&value),
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            ExitCode::FAILURE
        }
    }
}
