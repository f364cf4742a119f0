//! Implementation of `aor build`.

use std::process::ExitCode;

use aor_index::{BuildIssue, TracingReporter};
use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};

use crate::cli::{
    args::BuildCommand,
    context::CommandContext,
    output::{dim, subheader, success, warning},
};

/// Rebuilds the index of one collection and prints a summary.
pub fn run(ctx: &CommandContext, cmd: &BuildCommand) -> ExitCode {
    let service = ctx.service();
    let report = match service.build(&cmd.collection, &mut TracingReporter) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: indexing failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} {} annotations from {} books",
        success("Indexed"),
        report.annotations,
        report.books
    );
    println!(
        "   {}",
        dim(&format!("-> {}", ctx.config.index_dir(&cmd.collection).display()))
    );

    if !report.is_clean() {
        println!();
        println!(
            "{}",
            subheader(&format!("Skipped ({}):", report.issues.len()))
        );
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["Book", "Kind", "Problem"]);
        for issue in &report.issues {
            let (book, kind, problem) = match issue {
                BuildIssue::Book { book, error } => (book, "book", error.to_string()),
                BuildIssue::Record { book, error } => (book, "record", error.to_string()),
            };
            table.add_row(vec![Cell::new(book), Cell::new(kind), Cell::new(problem)]);
        }
        println!("{table}");
        println!("{}", warning("Skipped items are left out of the index."));
    }

    ExitCode::SUCCESS
}
