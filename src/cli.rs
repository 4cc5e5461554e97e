// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands share the same options:
// - list:   fetch once, print one page, exit
// - browse: fetch once, then page/filter interactively from stdin
//
// Source options (where data comes from) and filter options (what to show)
// live in their own structs and are flattened into each subcommand.
//
// Rust concepts:
// - Derive macros: Parser/Subcommand/Args generate the parsing code
// - #[command(flatten)]: Reuse a group of arguments in several places
// - env = "...": Fall back to an environment variable when the flag is absent
// =============================================================================

use std::num::NonZeroUsize;

use clap::{Args, Parser, Subcommand};

use crate::catalog::{FilterCriteria, SortKey, VisibilityFilter, DEFAULT_PAGE_SIZE};
use crate::enrich::DEFAULT_CONCURRENCY;
use crate::github::DEFAULT_API_BASE;

#[derive(Parser, Debug)]
#[command(
    name = "repo-showcase",
    version,
    about = "Browse a GitHub organization's repositories as a searchable, paged catalog",
    long_about = "repo-showcase lists every repository of a GitHub organization, mines each README \
                  for a live-demo link and a preview image, and lets you search, filter, sort \
                  and page through the result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one page of the catalog
    ///
    /// Example: repo-showcase list --org rust-lang --search async --page 2
    List {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Page to show (out-of-range values snap to the nearest page)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output the page in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Page and filter through the catalog interactively
    ///
    /// Example: repo-showcase browse --org rust-lang
    Browse {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Where repositories are fetched from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// GitHub organization to list
    #[arg(long, env = "SHOWCASE_ORG", default_value = "alphatechlogics")]
    pub org: String,

    /// Token used for private repositories and higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API root (change for GitHub Enterprise)
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout_secs: u64,

    /// Maximum README downloads in flight at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Skip README enrichment (no demo links or preview images)
    #[arg(long)]
    pub no_enrich: bool,
}

/// What to show and in which order.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Sort order
    #[arg(long, value_enum, default_value_t = SortKey::RecentlyUpdated)]
    pub sort: SortKey,

    /// Which repositories to show by visibility
    #[arg(long, value_enum, default_value_t = VisibilityFilter::All)]
    pub visibility: VisibilityFilter,

    /// Only show repositories whose name or description contains this text
    #[arg(long, default_value = "")]
    pub search: String,

    /// Repositories per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: NonZeroUsize,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            sort: self.sort,
            visibility: self.visibility,
            query: self.search.clone(),
        }
    }
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    let parsed: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if (1..=32).contains(&parsed) {
        Ok(parsed)
    } else {
        Err("concurrency must be between 1 and 32".to_string())
    }
}
