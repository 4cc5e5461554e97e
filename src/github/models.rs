// src/github/models.rs
// =============================================================================
// Data types for repositories coming back from the GitHub API.
//
// There are two layers:
// - ApiRepository: exactly what the listing endpoint sends (serde-friendly,
//   lots of Option because GitHub may send null)
// - RepositoryRecord: the normalized record the rest of the app works with
//
// Rust concepts:
// - serde derive: Generates JSON (de)serialization code
// - From trait: Converting one type into another with .into()
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

// Branch assumed when GitHub does not report one
pub const FALLBACK_BRANCH: &str = "main";

/// One entry of `GET /orgs/{org}/repos`, as sent by GitHub.
///
/// Only the fields we use are listed; serde ignores the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    // The only two fields an entry must have; without them it is skipped
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    // `private: true` is all we need to tell visibility apart
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    // Older API versions leave this out entirely
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Whether a repository is visible to everyone or only to org members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A repository's normalized metadata.
///
/// `updated_at` is kept as the raw ISO-8601 string: sorting compares it
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRecord {
    pub name: String,
    /// Never `Some("")`: blank descriptions are stored as `None`
    pub description: Option<String>,
    pub url: String,
    pub visibility: Visibility,
    pub updated_at: String,
    pub is_fork: bool,
    pub default_branch: String,
    // Extra metadata, shown in JSON output only when GitHub sent it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

// Lets the filter work on plain records and enriched ones alike
impl AsRef<RepositoryRecord> for RepositoryRecord {
    fn as_ref(&self) -> &RepositoryRecord {
        self
    }
}

impl From<ApiRepository> for RepositoryRecord {
    fn from(api: ApiRepository) -> Self {
        // GitHub's boolean flag -> our enum
        let visibility = if api.private {
            Visibility::Private
        } else {
            Visibility::Public
        };

        RepositoryRecord {
            name: api.name,
            description: non_blank(api.description),
            url: api.html_url,
            visibility,
            // Missing timestamps sort as the oldest (empty string)
            updated_at: api.updated_at.unwrap_or_default(),
            is_fork: api.fork,
            default_branch: non_blank(api.default_branch)
                .unwrap_or_else(|| FALLBACK_BRANCH.to_string()),
            created_at: api.created_at,
            homepage: non_blank(api.homepage),
            topics: api.topics.unwrap_or_default(),
            language: api.language,
        }
    }
}

// Treats "", "   " and null the same way
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(json: serde_json::Value) -> ApiRepository {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalizes_full_entry() {
        let record: RepositoryRecord = api(serde_json::json!({
            "name": "StockMarketPricePrediction",
            "description": "Forecasts prices",
            "html_url": "https://github.com/bar/StockMarketPricePrediction",
            "private": true,
            "fork": false,
            "updated_at": "2024-05-01T10:00:00Z",
            "default_branch": "develop",
            "topics": ["ml", "finance"],
            "language": "Python"
        }))
        .into();

        assert_eq!(record.visibility, Visibility::Private);
        assert_eq!(record.description.as_deref(), Some("Forecasts prices"));
        assert_eq!(record.default_branch, "develop");
        assert_eq!(record.topics, vec!["ml", "finance"]);
        assert!(!record.is_fork);
    }

    #[test]
    fn test_blank_description_becomes_none() {
        let record: RepositoryRecord = api(serde_json::json!({
            "name": "Alpha",
            "description": "   ",
            "html_url": "https://github.com/bar/Alpha",
            "homepage": ""
        }))
        .into();

        assert_eq!(record.description, None);
        assert_eq!(record.homepage, None);
        assert_eq!(record.visibility, Visibility::Public);
    }

    #[test]
    fn test_missing_branch_and_nulls_fall_back() {
        let record: RepositoryRecord = api(serde_json::json!({
            "name": "Beta",
            "description": null,
            "html_url": "https://github.com/bar/Beta",
            "default_branch": null,
            "topics": null
        }))
        .into();

        assert_eq!(record.default_branch, FALLBACK_BRANCH);
        assert!(record.topics.is_empty());
        assert_eq!(record.updated_at, "");
    }

    #[test]
    fn test_entry_without_name_is_rejected() {
        let result = serde_json::from_value::<ApiRepository>(serde_json::json!({
            "html_url": "https://github.com/bar/nameless"
        }));
        assert!(result.is_err());
    }
}
