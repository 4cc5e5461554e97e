// src/catalog/session.rs
// =============================================================================
// The state one user interacts with: records, filter selections, page.
//
// - Changing any filter selection sends the user back to page 1
// - view() always clamps the page to what the current filters leave
// - An empty view says WHY it is empty (nothing fetched vs. nothing matched)
// =============================================================================

use std::num::NonZeroUsize;

use serde::Serialize;

use super::filter::{self, FilterCriteria, SortKey, VisibilityFilter};
use super::paginate::{self, PageState};
use crate::enrich::EnrichedRecord;

/// Why a view has no items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The organization has no (visible) repositories at all
    NoRepositories,
    /// Repositories exist, but none pass the current filters
    NoMatches,
}

/// Everything the presentation side needs to draw one screen.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub items: Vec<&'a EnrichedRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub total_repositories: usize,
    pub criteria: &'a FilterCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyReason>,
}

/// One user's view of the catalog.
///
/// Owns the fetched records; filtering and paging only ever borrow them.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    // Everything fetched (and enriched), in listing order
    records: Vec<EnrichedRecord>,
    // Current sort / visibility / search selections
    criteria: FilterCriteria,
    // Requested page; may be out of range until view() clamps it
    page: PageState,
}

impl DashboardSession {
    // Starts with default filters on page 1
    pub fn new(records: Vec<EnrichedRecord>, page_size: NonZeroUsize) -> Self {
        DashboardSession {
            records,
            criteria: FilterCriteria::default(),
            page: PageState::new(page_size),
        }
    }

    // The page as last requested or clamped
    pub fn page_state(&self) -> PageState {
        self.page
    }

    // ---- Filter selections: every setter goes back to page 1 ----

    // Replaces all selections at once (used for the command-line flags)
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.page = self.page.first();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.criteria.sort = sort;
        self.page = self.page.first();
    }

    pub fn set_visibility(&mut self, visibility: VisibilityFilter) {
        self.criteria.visibility = visibility;
        self.page = self.page.first();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
        self.page = self.page.first();
    }

    // ---- Navigation: always relative to the CURRENT filtered count ----

    // Jumps to `page`, clamped into 1..=total_pages
    pub fn go_to_page(&mut self, page: usize) {
        self.page = self.page.go_to(page).clamped(self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.page = self.page.next(self.total_pages());
    }

    pub fn previous_page(&mut self) {
        // Clamp first so "previous" from a stale page lands next to the end
        self.page = self.page.clamped(self.total_pages()).previous();
    }

    pub fn first_page(&mut self) {
        self.page = self.page.first();
    }

    pub fn last_page(&mut self) {
        self.page = self.page.last(self.total_pages());
    }

    // Page count for the current filters (at least 1)
    pub fn total_pages(&self) -> usize {
        let matches = filter::apply(&self.records, &self.criteria).len();
        paginate::total_pages(matches, self.page.page_size())
    }

    // Builds the current screen and stores the clamped page
    pub fn view(&mut self) -> DashboardView<'_> {
        // Filter + sort, then cut out the requested page
        let matches = filter::apply(&self.records, &self.criteria);
        let (page, state) = paginate::paginate(&matches, self.page);
        // Remember the clamped page so navigation continues from what was shown
        self.page = state;

        // Nothing fetched at all is a different message from nothing matching
        let empty = if self.records.is_empty() {
            Some(EmptyReason::NoRepositories)
        } else if matches.is_empty() {
            Some(EmptyReason::NoMatches)
        } else {
            None
        };

        DashboardView {
            items: page.items.to_vec(),
            page: page.number,
            total_pages: page.total_pages,
            total_matches: page.total_items,
            total_repositories: self.records.len(),
            criteria: &self.criteria,
            empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{RepositoryRecord, Visibility};

    fn enriched(name: &str, updated_at: &str) -> EnrichedRecord {
        EnrichedRecord::unenriched(RepositoryRecord {
            name: name.to_string(),
            description: None,
            url: format!("https://github.com/bar/{name}"),
            visibility: Visibility::Public,
            updated_at: updated_at.to_string(),
            is_fork: false,
            default_branch: "main".to_string(),
            created_at: None,
            homepage: None,
            topics: Vec::new(),
            language: None,
        })
    }

    fn session(count: usize, page_size: usize) -> DashboardSession {
        let records = (0..count)
            .map(|i| enriched(&format!("repo-{i:02}"), &format!("2024-01-{:02}T00:00:00Z", i + 1)))
            .collect();
        DashboardSession::new(records, NonZeroUsize::new(page_size).unwrap())
    }

    #[test]
    fn test_navigation_and_clamping() {
        let mut session = session(10, 8);
        assert_eq!(session.total_pages(), 2);

        session.next_page();
        let view = session.view();
        assert_eq!(view.page, 2);
        assert_eq!(view.items.len(), 2);

        session.next_page();
        assert_eq!(session.view().page, 2);

        session.go_to_page(3);
        assert_eq!(session.view().page, 2);

        session.first_page();
        assert_eq!(session.view().page, 1);
        session.previous_page();
        assert_eq!(session.view().page, 1);

        session.last_page();
        assert_eq!(session.view().page, 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = session(20, 8);
        session.last_page();
        assert_eq!(session.page_state().current(), 3);

        session.set_sort(SortKey::NameAsc);
        assert_eq!(session.page_state().current(), 1);

        session.last_page();
        session.set_visibility(VisibilityFilter::Public);
        assert_eq!(session.page_state().current(), 1);

        session.last_page();
        session.set_query("repo-1");
        assert_eq!(session.page_state().current(), 1);
    }

    #[test]
    fn test_go_to_page_past_end_lands_on_last_page() {
        let mut session = session(10, 8);

        session.go_to_page(99);
        assert_eq!(session.page_state().current(), 2);

        session.go_to_page(0);
        assert_eq!(session.page_state().current(), 1);
    }

    #[test]
    fn test_view_respects_sort() {
        let mut session = session(3, 8);
        let view = session.view();
        let names: Vec<_> = view.items.iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(names, vec!["repo-02", "repo-01", "repo-00"]);
    }

    #[test]
    fn test_no_matches_is_distinct_from_no_repositories() {
        let mut session = session(3, 8);
        session.set_query("does-not-exist");
        let view = session.view();
        assert_eq!(view.empty, Some(EmptyReason::NoMatches));
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.total_repositories, 3);

        let mut empty = DashboardSession::new(Vec::new(), NonZeroUsize::new(8).unwrap());
        assert_eq!(empty.view().empty, Some(EmptyReason::NoRepositories));
    }

    #[test]
    fn test_view_serializes_for_json_output() {
        let mut session = session(1, 8);
        let json = serde_json::to_value(session.view()).unwrap();

        assert_eq!(json["page"], 1);
        assert_eq!(json["criteria"]["sort"], "recently-updated");
        assert_eq!(json["items"][0]["name"], "repo-00");
        assert_eq!(json["items"][0]["readme"], "not_attempted");
        assert!(json.get("empty").is_none());
    }
}
