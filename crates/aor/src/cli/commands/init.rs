//! Implementation of `aor init`.

use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use aor_config::{CONFIG_FILENAME, local_template};

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{Highlighter, subheader},
};

/// Index directory entry added to `.gitignore`.
const INDEX_PATTERN: &str = ".aor-index/";

/// Initializes a `.aor.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let config_path = ctx.cwd.join(CONFIG_FILENAME);

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = local_template();
    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    print!("{}", Highlighter::new().highlight(&template, "toml"));

    if let Err(e) = update_gitignore(&config_path) {
        eprintln!("warning: could not update .gitignore: {e}");
    }

    ExitCode::SUCCESS
}

/// Adds the index directory to `.gitignore` if the file exists and doesn't
/// already contain it.
fn update_gitignore(config_path: &Path) -> io::Result<()> {
    let Some(parent) = config_path.parent() else {
        return Ok(());
    };

    let gitignore_path = parent.join(".gitignore");
    if !gitignore_path.exists() {
        return Ok(());
    }

    let contents = fs::read_to_string(&gitignore_path)?;
    let bare = INDEX_PATTERN.trim_end_matches('/');
    if contents
        .lines()
        .map(str::trim)
        .any(|line| line == INDEX_PATTERN || line == bare)
    {
        return Ok(());
    }

    let mut file = fs::OpenOptions::new().append(true).open(&gitignore_path)?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{INDEX_PATTERN}")?;
    println!("Added {INDEX_PATTERN} to .gitignore");

    Ok(())
}
