// src/catalog/filter.rs
// =============================================================================
// Filtering and sorting of the repository list.
//
// The steps always run in this order:
// 1. Hide forks that have no description of their own
// 2. Visibility filter (all / public / private)
// 3. Free-text search on name or description (case-insensitive)
// 4. Sort (stable, so ties keep their fetched order)
//
// Everything here is pure: same records + same criteria = same output.
// =============================================================================

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::Serialize;

use crate::github::{RepositoryRecord, Visibility};

/// Order in which repositories are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    RecentlyUpdated,
    /// Least recently updated first
    LeastRecentlyUpdated,
    /// Name, A to Z (case-insensitive)
    NameAsc,
    /// Name, Z to A (case-insensitive)
    NameDesc,
}

/// Which repositories to show by visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityFilter {
    #[default]
    All,
    Public,
    Private,
}

impl VisibilityFilter {
    fn allows(self, visibility: Visibility) -> bool {
        match self {
            VisibilityFilter::All => true,
            VisibilityFilter::Public => visibility == Visibility::Public,
            VisibilityFilter::Private => visibility == Visibility::Private,
        }
    }
}

/// The user's current filter selections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterCriteria {
    pub sort: SortKey,
    pub visibility: VisibilityFilter,
    /// Search text; blank means "match everything"
    pub query: String,
}

// Applies `criteria` to `records`
//
// Works on anything that can be viewed as a RepositoryRecord, so it is used
// both for plain and enriched records. Returns references in display order.
pub fn apply<'a, T: AsRef<RepositoryRecord>>(records: &'a [T], criteria: &FilterCriteria) -> Vec<&'a T> {
    let needle = criteria.query.trim().to_lowercase();

    let mut matches: Vec<&T> = records
        .iter()
        .filter(|item| is_listed(item.as_ref()))
        .filter(|item| criteria.visibility.allows(item.as_ref().visibility))
        .filter(|item| matches_query(item.as_ref(), &needle))
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| compare(a.as_ref(), b.as_ref(), criteria.sort));
    matches
}

// Forks only show up when they carry their own description
fn is_listed(record: &RepositoryRecord) -> bool {
    !record.is_fork || record.description.is_some()
}

// `needle` must already be lowercased
fn matches_query(record: &RepositoryRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    record.name.to_lowercase().contains(needle)
        || record
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

fn compare(a: &RepositoryRecord, b: &RepositoryRecord, sort: SortKey) -> Ordering {
    match sort {
        SortKey::RecentlyUpdated => b.updated_at.cmp(&a.updated_at),
        SortKey::LeastRecentlyUpdated => a.updated_at.cmp(&b.updated_at),
        SortKey::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
    }
}
