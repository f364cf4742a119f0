//! Clap argument definitions for the `aor` CLI.

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "aor")]
#[command(about = "Searchable IIIF annotation layer for a manuscript archive")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); AOR_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `aor init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `aor build`.
#[derive(Args, Debug, Clone)]
pub struct BuildCommand {
    /// Collection to index
    pub collection: String,
}

/// Arguments for `aor search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Scope: collection, collection.book or collection.book.page
    pub scope: String,

    /// Search terms; quote a phrase to match it exactly
    pub terms: Vec<String>,

    /// Restrict to motivations (e.g. aor:Symbol, marginalia)
    #[arg(long = "motivation", value_name = "MOTIVATION")]
    pub motivations: Vec<String>,

    /// Restrict to annotating users
    #[arg(long = "user", value_name = "USER")]
    pub users: Vec<String>,

    /// Restrict to dates
    #[arg(long = "date", value_name = "DATE")]
    pub dates: Vec<String>,

    /// Restrict to a canvas region
    #[arg(long = "box", value_name = "X,Y,W,H")]
    pub region: Option<String>,

    /// Zero-based result page
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Serialize as a nested resource, without context and annotations
    #[arg(long)]
    pub nested: bool,

    /// Show the request and the translated query tree without searching
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `aor annotations`.
#[derive(Args, Debug, Clone)]
pub struct AnnotationsCommand {
    /// Collection id
    pub collection: String,

    /// Book id
    pub book: String,

    /// Page id or image name
    pub page: String,

    /// List the printed illustrations instead of the reader annotations
    #[arg(long)]
    pub illustrations: bool,
}

/// Supported `aor` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize aor configuration in current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Show effective configuration settings
    Config,

    /// Rebuild the search index of a collection
    Build(BuildCommand),

    /// Search a collection, book or page and print the result as JSON
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term must appear in some field
  term1 term2       Both terms (implicit AND)
  \"phrase\"          Exact phrase match

SCOPES:
  demo                      Whole collection
  demo.Castiglione          One book
  demo.Castiglione.1r       One page (image names such as
                            Castiglione.001r.tif also work)

EXAMPLES:
  aor search demo sun
  aor search demo '\"if you wish, you may command\"'
  aor search demo.Castiglione.1r sun --nested
  aor search demo rome --explain")]
    Search(SearchCommand),

    /// Print the annotation list of one page as JSON
    Annotations(AnnotationsCommand),
}
