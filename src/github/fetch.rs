// src/github/fetch.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Two calls are used:
// - GET /orgs/{org}/repos      : paged listing of the organization's repos
// - GET /repos/{org}/{repo}/readme : one README per repo, base64 encoded
//
// Strategy:
// - One reqwest Client is built up front with the auth/accept headers and a
//   timeout, then reused for every request (connection pooling)
// - The listing is walked page by page until GitHub returns an empty page
// - Any failed listing page ends the whole fetch; nothing partial is returned
//
// Rust concepts:
// - async functions: For network I/O
// - Result<T, FetchError>: Typed errors so callers can tell auth from network
// - HashSet: To drop duplicate names across pages
// =============================================================================

use std::collections::HashSet;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use super::error::FetchError;
use super::models::{ApiRepository, RepositoryRecord};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

// GitHub's maximum page size for the listing endpoint
pub const LISTING_PAGE_SIZE: u32 = 100;

// Hard stop for the page loop in case an endpoint never returns an empty page
pub const MAX_LISTING_PAGES: u32 = 1000;

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repo-showcase/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the handful of GitHub endpoints we need.
///
/// Cloning is cheap: `reqwest::Client` is reference counted internally.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: Url,
    // Page loop limit for the listing, normally MAX_LISTING_PAGES
    max_pages: u32,
}

// Shape of GET /repos/{org}/{repo}/readme (only the fields we read)
#[derive(Debug, Deserialize)]
struct ReadmePayload {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl GithubClient {
    // Creates a client for `api_base`
    //
    // Parameters:
    //   api_base: e.g. "https://api.github.com" or a GitHub Enterprise API root
    //   token: optional bearer token; blank tokens count as "no token"
    //   timeout: applied to every request
    pub fn new(api_base: &str, token: Option<&str>, timeout: Duration) -> Result<Self, FetchError> {
        let api_base = parse_api_base(api_base)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                FetchError::Authentication {
                    message: "token contains characters that cannot be sent in a header"
                        .to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(GithubClient {
            http,
            api_base,
            max_pages: MAX_LISTING_PAGES,
        })
    }

    // Lowers the page limit so tests can reach it with a few mocked pages
    #[cfg(test)]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    // Fetches every repository of `org` visible to our credential
    //
    // Returns records in the order GitHub sends them (most recently updated
    // first). Names are unique in the result.
    pub async fn list_org_repositories(&self, org: &str) -> Result<Vec<RepositoryRecord>, FetchError> {
        let org = org.trim();
        if org.is_empty() {
            return Err(FetchError::InvalidOrganization);
        }

        let mut records = Vec::new();
        // Lowercased names already kept, to drop repeats from later pages
        let mut seen = HashSet::new();

        for page in 1..=self.max_pages {
            // Any page error ends the whole fetch (the `?`)
            let entries = self.fetch_listing_page(org, page).await?;

            // An empty page means we've walked past the last repository
            if entries.is_empty() {
                tracing::debug!(org, page, total = records.len(), "reached end of repository listing");
                return Ok(records);
            }

            tracing::debug!(org, page, entries = entries.len(), "fetched repository page");

            for entry in entries {
                // One odd entry only costs that entry, not the page
                let repo = match serde_json::from_value::<ApiRepository>(entry) {
                    Ok(repo) => repo,
                    Err(error) => {
                        tracing::warn!(org, page, %error, "skipping malformed repository entry");
                        continue;
                    }
                };

                if !seen.insert(repo.name.to_lowercase()) {
                    tracing::debug!(org, name = %repo.name, "skipping duplicate repository");
                    continue;
                }

                records.push(RepositoryRecord::from(repo));
            }
        }

        // Only reached if no empty page showed up within the limit
        tracing::warn!(
            org,
            max_pages = self.max_pages,
            total = records.len(),
            "stopped listing at the page limit; results may be incomplete"
        );
        Ok(records)
    }

    // Fetches one page of the listing as raw JSON values
    //
    // Entries are kept raw so one malformed entry doesn't fail the page.
    async fn fetch_listing_page(&self, org: &str, page: u32) -> Result<Vec<serde_json::Value>, FetchError> {
        let mut url = self.endpoint(&["orgs", org, "repos"])?;
        url.query_pairs_mut()
            .append_pair("type", "all")
            .append_pair("sort", "updated")
            .append_pair("direction", "desc")
            .append_pair("per_page", &LISTING_PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());

        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;

        match response.json::<serde_json::Value>().await? {
            serde_json::Value::Array(entries) => Ok(entries),
            other => Err(FetchError::Decode {
                message: format!("expected a JSON array of repositories, got {}", json_kind(&other)),
            }),
        }
    }

    // Downloads and decodes the README of `org/repo`
    //
    // Returns:
    //   Ok(Some(text)) - README found and decoded
    //   Ok(None)       - repository has no README (HTTP 404)
    //   Err(..)        - anything else went wrong
    pub async fn fetch_readme(&self, org: &str, repo: &str) -> Result<Option<String>, FetchError> {
        let url = self.endpoint(&["repos", org, repo, "readme"])?;
        let response = self.http.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let payload: ReadmePayload = check_status(response).await?.json().await?;

        if let Some(encoding) = payload.encoding.as_deref() {
            if !encoding.eq_ignore_ascii_case("base64") {
                return Err(FetchError::Decode {
                    message: format!("unsupported README encoding '{encoding}'"),
                });
            }
        }

        match payload.content {
            Some(content) => decode_readme_content(&content).map(Some),
            None => Ok(None),
        }
    }

    // Appends escaped path segments to the API base
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidApiBase {
                url: self.api_base.to_string(),
                message: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn parse_api_base(api_base: &str) -> Result<Url, FetchError> {
    let url = Url::parse(api_base.trim()).map_err(|e| FetchError::InvalidApiBase {
        url: api_base.to_string(),
        message: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidApiBase {
            url: api_base.to_string(),
            message: "expected an http(s) URL".to_string(),
        });
    }

    Ok(url)
}

// Turns non-success statuses into the matching FetchError
//
// HTTP status codes:
// - 401: bad or missing credential
// - 403 / 429: rate limit or forbidden (GitHub uses 403 for both)
// - anything else non-2xx: generic API error
async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_github_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("no details").to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED => FetchError::Authentication { message },
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimit {
            status: status.as_u16(),
            message,
        },
        _ => FetchError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

// GitHub error bodies look like {"message": "...", "documentation_url": "..."}
fn extract_github_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

// Decodes README content as sent by GitHub
//
// GitHub wraps the base64 text at 60 columns, so whitespace is removed first.
pub fn decode_readme_content(content: &str) -> Result<String, FetchError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD.decode(compact).map_err(|e| FetchError::Decode {
        message: format!("README is not valid base64: {e}"),
    })?;

    String::from_utf8(bytes).map_err(|e| FetchError::Decode {
        message: format!("README is not valid UTF-8: {e}"),
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a typed error (FetchError) instead of anyhow here?
//    - The caller needs to tell "bad token" from "rate limited" from "offline"
//    - An enum lets it match on the variant and pick a hint for the user
//    - main.rs still uses anyhow for everything else
//
// 2. What does `?` do with a reqwest::Error here?
//    - It calls From<reqwest::Error> for FetchError (see error.rs)
//    - So send().await? turns transport failures into FetchError::Network
//
// 3. Why serde_json::Value for listing entries?
//    - Deserializing straight into Vec<ApiRepository> fails the WHOLE page
//      if one entry is odd
//    - Going through Value lets us skip just that entry
//
// 4. What is path_segments_mut()?
//    - A url crate API to append path pieces safely
//    - A repo called "my repo" becomes "my%20repo" automatically
// -----------------------------------------------------------------------------
