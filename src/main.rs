// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr) and parse command-line arguments
// 2. Fetch every repository of the organization from GitHub
// 3. Enrich each one with demo/preview links from its README
// 4. Filter, sort and page the result, then print it (or browse it)
// 5. Exit with proper code (0 = page shown, 1 = nothing to show, 2 = error)
//
// Rust concepts used:
// - async/await: Network requests run on the tokio runtime
// - Result<T, E>: anyhow for the app layer, FetchError for the fetcher
// - match: Pattern matching to handle different subcommands and errors
// =============================================================================

mod browse;
mod catalog;
mod cli;
mod enrich;
mod github;
mod render;

use std::num::NonZeroUsize;
use std::time::Duration;

use anyhow::{Context, Result};
use catalog::{DashboardSession, FilterCriteria};
use clap::Parser;
use cli::{Cli, Commands, SourceArgs};
use enrich::{EnrichedRecord, ReadmeScanner};
use github::{FetchError, GithubClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected error (bad config, broken stdout, ...)
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with the table / JSON on stdout
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_showcase=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Returns:
//   Ok(0) = a page of repositories was shown
//   Ok(1) = nothing to show (no repositories, or no matches)
//   Ok(2) = fetching from GitHub failed
//   Err   = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            source,
            filters,
            page,
            json,
        } => {
            handle_list(&source, filters.criteria(), filters.page_size, page, json).await
        }
        Commands::Browse { source, filters } => {
            handle_browse(&source, filters.criteria(), filters.page_size).await
        }
    }
}

// Handles the 'list' subcommand: one page, then exit
async fn handle_list(
    source: &SourceArgs,
    criteria: FilterCriteria,
    page_size: NonZeroUsize,
    page: usize,
    json: bool,
) -> Result<i32> {
    // Progress lines would break JSON output, so stay quiet in that mode
    let records = match load_records(source, !json).await? {
        Ok(records) => records,
        Err(error) => return Ok(report_fetch_failure(&error)),
    };

    // Filters first (that resets to page 1), then jump to the requested page
    let mut session = DashboardSession::new(records, page_size);
    session.set_criteria(criteria);
    session.go_to_page(page);

    // Out-of-range pages are clamped silently; log it for RUST_LOG=info runs
    let shown = session.page_state().current();
    if shown != page {
        tracing::info!(requested = page, shown, "requested page was out of range");
    }

    let view = session.view();
    render::print_view(&view, json)?;

    // An empty grid is not an error, but scripts can still tell it apart
    if view.empty.is_some() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Handles the 'browse' subcommand: interactive loop on stdin
async fn handle_browse(
    source: &SourceArgs,
    criteria: FilterCriteria,
    page_size: NonZeroUsize,
) -> Result<i32> {
    let records = match load_records(source, true).await? {
        Ok(records) => records,
        Err(error) => return Ok(report_fetch_failure(&error)),
    };

    // Flags give the starting filters; the prompt can change them afterwards
    let mut session = DashboardSession::new(records, page_size);
    session.set_criteria(criteria);
    browse::run(session).await?;

    Ok(0)
}

// Fetches and enriches the organization's repositories
//
// The outer Result is for setup problems (bad patterns); the inner one is the
// fetch outcome, which the caller reports to the user instead of the grid.
async fn load_records(
    source: &SourceArgs,
    chatty: bool,
) -> Result<Result<Vec<EnrichedRecord>, FetchError>> {
    let client = match GithubClient::new(
        &source.api_base,
        source.token.as_deref(),
        Duration::from_secs(source.timeout_secs),
    ) {
        Ok(client) => client,
        Err(error) => return Ok(Err(error)),
    };

    if chatty {
        println!("🔍 Fetching repositories for organization: {}", source.org);
    }

    let records = match client.list_org_repositories(&source.org).await {
        Ok(records) => records,
        Err(error) => return Ok(Err(error)),
    };

    if chatty {
        println!("📦 Found {} repositor(ies)", records.len());
    }

    // --no-enrich: skip the README requests entirely
    if source.no_enrich {
        return Ok(Ok(records.into_iter().map(EnrichedRecord::unenriched).collect()));
    }

    // Pattern compile errors are bugs, not fetch failures: outer Result
    let scanner = ReadmeScanner::new().context("failed to compile README patterns")?;

    if chatty {
        println!(
            "📖 Reading READMEs ({} at a time)...\n",
            source.concurrency
        );
    }

    // Enrichment never fails as a whole; per-repo problems are recorded inside
    let enriched =
        enrich::enrich_records(&client, &scanner, source.org.trim(), records, source.concurrency)
            .await;
    Ok(Ok(enriched))
}

// Prints why the fetch failed and returns the exit code
fn report_fetch_failure(error: &FetchError) -> i32 {
    tracing::debug!(?error, "repository fetch failed");
    eprintln!("❌ Could not load repositories: {}", error);
    eprintln!("   {}", error.hint());
    2
}
