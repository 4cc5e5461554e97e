// src/github/error.rs
// =============================================================================
// Errors that can stop a repository fetch.
//
// Every variant is terminal for the current run: the caller shows the message
// (and the hint) instead of the project grid. README downloads reuse the same
// type, but the enricher swallows those errors.
//
// Rust concepts:
// - thiserror: derives std::error::Error + Display from the #[error] strings
// - From trait: lets `?` turn a reqwest::Error into a FetchError
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The organization name was empty or only whitespace
    #[error("organization name must not be empty")]
    InvalidOrganization,

    /// The configured API base could not be used to build endpoint URLs
    #[error("invalid API base URL '{url}': {message}")]
    InvalidApiBase { url: String, message: String },

    /// GitHub answered 401: the token is missing, expired or wrong
    #[error("GitHub rejected the credential: {message}")]
    Authentication { message: String },

    /// GitHub answered 403/429: quota exhausted or access forbidden
    #[error("GitHub API rate limit exceeded or access forbidden (HTTP {status}): {message}")]
    RateLimit { status: u16, message: String },

    /// Any other non-success status
    #[error("GitHub API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Connection, TLS or timeout failure
    #[error("network error talking to GitHub: {message}")]
    Network { message: String },

    /// The response body was not what we expected
    #[error("could not decode GitHub response: {message}")]
    Decode { message: String },
}

impl FetchError {
    // A short suggestion shown under the error message
    pub fn hint(&self) -> &'static str {
        match self {
            FetchError::InvalidOrganization => "Pass an organization with --org or SHOWCASE_ORG.",
            FetchError::InvalidApiBase { .. } => "Check the --api-base value.",
            FetchError::Authentication { .. } => {
                "Check that GITHUB_TOKEN is set to a valid, unexpired token."
            }
            FetchError::RateLimit { .. } => {
                "Wait for the rate limit to reset, or supply a token with access to this organization."
            }
            FetchError::Api { .. } => "Check that the organization exists and is spelled correctly.",
            FetchError::Network { .. } => "Check your network connection and try again.",
            FetchError::Decode { .. } => "The API answered with an unexpected payload.",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::Decode {
                message: error.to_string(),
            }
        } else if error.is_timeout() {
            FetchError::Network {
                message: format!("request timed out ({error})"),
            }
        } else {
            FetchError::Network {
                message: error.to_string(),
            }
        }
    }
}
