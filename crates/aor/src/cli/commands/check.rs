//! Implementation of `aor check`.

use std::{fs, path::Path, process::ExitCode};

use aor_config::{Config, ConfigWarning, discover_config_files};
use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};

use crate::cli::{
    context::CommandContext,
    output::{dim, header, subheader, success, warning},
};

/// Exit codes for `aor check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
}

/// A collection found in the archive.
struct CollectionStatus {
    /// Collection id.
    id: String,
    /// Number of book files.
    books: usize,
    /// Whether an index has been built.
    indexed: bool,
}

/// Validates configuration and reports archive and index status.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    println!("{}", header("Configuration"));
    println!();
    println!("{}", subheader("Config files:"));
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("   {}", dim("(none, using defaults)"));
    }
    for path in &config_files {
        println!("   {}", path.display());
    }
    println!();

    println!("{}", subheader("Archive:"));
    println!("   {}", config.archive.root.display());
    let collections = collections(config);
    if collections.is_empty() {
        println!("   {}", dim("(no collections)"));
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["Collection", "Books", "Index"]);
        for collection in &collections {
            let index = if collection.indexed { "built" } else { "missing" };
            table.add_row(vec![
                Cell::new(&collection.id),
                Cell::new(collection.books.to_string()),
                Cell::new(index),
            ]);
        }
        println!("{table}");
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("{}", success("No issues found."));
        return exit_codes::OK;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   - {}", warning(&w.to_string()));
    }
    println!();
    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Collections below the archive root, sorted by id.
fn collections(config: &Config) -> Vec<CollectionStatus> {
    let Ok(entries) = fs::read_dir(&config.archive.root) else {
        return Vec::new();
    };
    let mut found: Vec<CollectionStatus> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| {
            let id = entry.file_name().to_string_lossy().into_owned();
            CollectionStatus {
                books: count_books(&entry.path()),
                indexed: config.index_dir(&id).exists(),
                id,
            }
        })
        .collect();
    found.sort_by(|a, b| a.id.cmp(&b.id));
    found
}

/// Number of book documents in a collection directory.
fn count_books(dir: &Path) -> usize {
    fs::read_dir(dir).map_or(0, |entries| {
        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .count()
    })
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::ArchiveRootMissing { .. } => {
                "Create the archive directory or set [archive] root."
            }
            ConfigWarning::ArchiveRootNotDirectory { .. } => {
                "The archive root must be a directory with one subdirectory per collection."
            }
            ConfigWarning::LookupTableMissing { .. } => {
                "Create the lookup table or remove it from [lookup]; missing tables link nothing."
            }
            ConfigWarning::BaseUriNotHttp { .. } => {
                "Set [presentation] base_uri to an absolute http(s) URI."
            }
            ConfigWarning::ZeroPageSize => "Set [search] page_size to at least 1.",
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("{}", subheader("Hints:"));
        for hint in hints {
            println!("   - {hint}");
        }
    }
}
