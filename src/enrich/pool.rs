// src/enrich/pool.rs
// =============================================================================
// This module enriches every repository with its README demo/preview links.
//
// Key functionality:
// - Downloads each README concurrently, with a cap on in-flight requests
// - Never fails: a missing README or a network error just means "no links"
// - Results are matched back to records by name, so completion order does
//   not matter and the input order is preserved
//
// Rust concepts:
// - Streams: stream::iter + buffer_unordered for bounded concurrency
// - Enums with data: ReadmeOutcome records what happened to each README
// =============================================================================

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use super::readme::ReadmeScanner;
use crate::github::{GithubClient, RepositoryRecord};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// What happened when we looked for a README.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "readme", content = "reason", rename_all = "snake_case")]
pub enum ReadmeOutcome {
    /// README downloaded and scanned (links may still be absent)
    Scanned,
    /// Repository has no README
    Missing,
    /// Download or decoding failed
    Failed(String),
    /// Enrichment was skipped for this run
    #[default]
    NotAttempted,
}

/// Links mined from a README plus how we got (or didn't get) them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Enrichment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,
    #[serde(flatten)]
    pub outcome: ReadmeOutcome,
}

impl Enrichment {
    fn without_links(outcome: ReadmeOutcome) -> Self {
        Enrichment {
            demo_url: None,
            preview_image_url: None,
            outcome,
        }
    }
}

/// A repository record together with its README enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: RepositoryRecord,
    #[serde(flatten)]
    pub enrichment: Enrichment,
}

impl EnrichedRecord {
    // Wraps a record without looking at its README
    pub fn unenriched(record: RepositoryRecord) -> Self {
        EnrichedRecord {
            record,
            enrichment: Enrichment::default(),
        }
    }
}

impl AsRef<RepositoryRecord> for EnrichedRecord {
    fn as_ref(&self) -> &RepositoryRecord {
        &self.record
    }
}

// Enriches all records, at most `concurrency` README downloads at a time
//
// Parameters:
//   client: shared GitHub client (connection pooling)
//   scanner: compiled README patterns
//   org: organization the records belong to
//   records: the fetched repositories
//   concurrency: max in-flight README requests (0 is treated as 1)
//
// Returns: one EnrichedRecord per input record, in input order
pub async fn enrich_records(
    client: &GithubClient,
    scanner: &ReadmeScanner,
    org: &str,
    records: Vec<RepositoryRecord>,
    concurrency: usize,
) -> Vec<EnrichedRecord> {
    let tasks = records.iter().map(|record| async move {
        let enrichment = enrich_one(client, scanner, org, record).await;
        (record.name.clone(), enrichment)
    });

    let mut by_name: HashMap<String, Enrichment> = stream::iter(tasks)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    records
        .into_iter()
        .map(|record| {
            let enrichment = by_name.remove(&record.name).unwrap_or_default();
            EnrichedRecord { record, enrichment }
        })
        .collect()
}

// Enriches a single record; every failure degrades to "no links"
async fn enrich_one(
    client: &GithubClient,
    scanner: &ReadmeScanner,
    org: &str,
    record: &RepositoryRecord,
) -> Enrichment {
    match client.fetch_readme(org, &record.name).await {
        Ok(Some(readme)) => Enrichment {
            demo_url: scanner.find_demo_url(&readme),
            preview_image_url: scanner.find_preview_image(
                &readme,
                org,
                &record.name,
                &record.default_branch,
            ),
            outcome: ReadmeOutcome::Scanned,
        },
        Ok(None) => {
            tracing::debug!(repo = %record.name, "repository has no README");
            Enrichment::without_links(ReadmeOutcome::Missing)
        }
        Err(error) => {
            tracing::debug!(repo = %record.name, %error, "README enrichment failed");
            Enrichment::without_links(ReadmeOutcome::Failed(error.to_string()))
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is buffer_unordered(N)?
//    - Runs up to N futures at once and yields results as they finish
//    - Finish order is random, which is why we key results by repo name
//
// 2. Why `async move` inside the map?
//    - Each future needs its own copy of the references it uses
//    - The references are Copy, so "moving" them is free
//
// 3. Why does enrich_one return Enrichment and not Result?
//    - A README is nice to have, never required
//    - Failures are recorded in ReadmeOutcome instead of being bubbled up
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Visibility;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(name: &str, branch: &str) -> RepositoryRecord {
        RepositoryRecord {
            name: name.to_string(),
            description: None,
            url: format!("https://github.com/bar/{name}"),
            visibility: Visibility::Public,
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            is_fork: false,
            default_branch: branch.to_string(),
            created_at: None,
            homepage: None,
            topics: Vec::new(),
            language: None,
        }
    }

    async fn mount_readme(server: &MockServer, repo: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/bar/{repo}/readme")))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn readme_body(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": STANDARD.encode(text),
            "encoding": "base64"
        }))
    }

    #[tokio::test]
    async fn test_enriches_and_keeps_input_order() {
        let server = MockServer::start().await;
        mount_readme(
            &server,
            "Foo",
            readme_body("[demo](https://foo.streamlit.app)\n![preview](./img/demo.png)"),
        )
        .await;
        mount_readme(&server, "NoReadme", ResponseTemplate::new(404)).await;
        mount_readme(&server, "Broken", ResponseTemplate::new(500)).await;

        let client = GithubClient::new(&server.uri(), None, Duration::from_secs(5)).unwrap();
        let scanner = ReadmeScanner::new().unwrap();
        let records = vec![
            record("Broken", "main"),
            record("Foo", "main"),
            record("NoReadme", "main"),
        ];

        let enriched = enrich_records(&client, &scanner, "bar", records, 2).await;

        let names: Vec<_> = enriched.iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(names, vec!["Broken", "Foo", "NoReadme"]);

        assert!(matches!(enriched[0].enrichment.outcome, ReadmeOutcome::Failed(_)));
        assert_eq!(enriched[0].enrichment.demo_url, None);

        assert_eq!(enriched[1].enrichment.outcome, ReadmeOutcome::Scanned);
        assert_eq!(
            enriched[1].enrichment.demo_url.as_deref(),
            Some("https://foo.streamlit.app")
        );
        assert_eq!(
            enriched[1].enrichment.preview_image_url.as_deref(),
            Some("https://raw.githubusercontent.com/bar/Foo/main/img/demo.png")
        );

        assert_eq!(enriched[2].enrichment.outcome, ReadmeOutcome::Missing);
        assert_eq!(enriched[2].enrichment.preview_image_url, None);
    }

    #[tokio::test]
    async fn test_undecodable_readme_degrades_to_no_links() {
        let server = MockServer::start().await;
        mount_readme(
            &server,
            "Garbled",
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"content": "%%%", "encoding": "base64"})),
        )
        .await;

        let client = GithubClient::new(&server.uri(), None, Duration::from_secs(5)).unwrap();
        let scanner = ReadmeScanner::new().unwrap();

        let enriched =
            enrich_records(&client, &scanner, "bar", vec![record("Garbled", "main")], 0).await;

        assert_eq!(enriched.len(), 1);
        assert!(matches!(enriched[0].enrichment.outcome, ReadmeOutcome::Failed(_)));
        assert_eq!(enriched[0].enrichment.demo_url, None);
        assert_eq!(enriched[0].enrichment.preview_image_url, None);
    }

    #[test]
    fn test_unenriched_is_not_attempted() {
        let enriched = EnrichedRecord::unenriched(record("Foo", "main"));
        assert_eq!(enriched.enrichment.outcome, ReadmeOutcome::NotAttempted);
    }
}
