// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to GitHub.
//
// Currently implements:
// - Listing every repository of an organization (paged)
// - Downloading a repository's README (base64 decoded)
// - Normalizing API entries into RepositoryRecord
// - A typed error for auth / rate limit / network failures
// =============================================================================

mod error;
mod fetch;
mod models;

pub use error::FetchError;
pub use fetch::{GithubClient, DEFAULT_API_BASE};
pub use models::{RepositoryRecord, Visibility};
