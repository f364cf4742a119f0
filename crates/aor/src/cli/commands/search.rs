//! Implementation of `aor search`.

use std::process::ExitCode;

use aor_iiif::Depth;
use aor_index::{SearchError, serialize};
use aor_query::{SearchRequest, translate};

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{dim, print_json, subheader},
};

/// Searches a scope and prints the result page as JSON.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let query = query_string(cmd);
    if cmd.explain {
        return explain(ctx, &cmd.scope, &query);
    }

    let service = ctx.service();
    let page = match service.search_query_string(&cmd.scope, &query) {
        Ok(page) => page,
        Err(SearchError::UnknownScope { collection }) => {
            eprintln!("error: no index for collection {collection:?}");
            eprintln!("Run 'aor build {collection}' first.");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: search failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let depth = if cmd.nested { Depth::Nested } else { Depth::Top };
    match serialize(&page, depth) {
        Ok(value) => print_json(&value),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Encodes the command arguments as a search query string.
fn query_string(cmd: &SearchCommand) -> String {
    let page = (cmd.page > 0).then(|| cmd.page.to_string());
    let params = [
        ("q", cmd.terms.join(" ")),
        ("motivation", cmd.motivations.join(" ")),
        ("user", cmd.users.join(" ")),
        ("date", cmd.dates.join(" ")),
        ("box", cmd.region.clone().unwrap_or_default()),
        ("page", page.unwrap_or_default()),
    ];
    params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Prints the parsed request and its query tree without searching.
fn explain(ctx: &CommandContext, scope: &str, query: &str) -> ExitCode {
    let request = match SearchRequest::from_query_string(scope, query) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let service = ctx.service();
    let id = service
        .uris()
        .search(&request.scope.to_string(), &request.to_query_string());
    println!("{}", subheader("Request:"));
    println!("   {id}");
    println!();

    println!("{}", subheader("Scope:"));
    println!("   collection: {}", request.scope.collection);
    if let Some(book) = &request.scope.book {
        println!("   book:       {book}");
    }
    if let Some(page) = &request.scope.page {
        println!("   page:       {page}");
    }
    println!();

    let tree = translate(&request);
    println!("{}", subheader("Query tree:"));
    if tree.is_empty() {
        println!("   {}", dim("(empty query, matches nothing)"));
    } else {
        for line in tree.to_string().lines() {
            println!("   {line}");
        }
    }
    println!();

    let restricted = !request.motivations.is_empty()
        || !request.users.is_empty()
        || !request.dates.is_empty()
        || request.region.is_some();
    if restricted {
        println!(
            "{}",
            dim("Restrictions (motivation, user, date, box) are parsed but not applied.")
        );
    }

    ExitCode::SUCCESS
}
