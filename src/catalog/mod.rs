// src/catalog/mod.rs
// =============================================================================
// In-memory catalog of repositories: filter, sort, page.
//
// Submodules:
// - filter: Fork rule, visibility, search, sort (pure functions)
// - paginate: Page math and page-state transitions
// - session: Ties records + criteria + page state together for one user
//
// Nothing in here does I/O; it all works on records already fetched.
// =============================================================================

mod filter;
mod paginate;
mod session;

pub use filter::{FilterCriteria, SortKey, VisibilityFilter};
pub use paginate::DEFAULT_PAGE_SIZE;
pub use session::{DashboardSession, DashboardView, EmptyReason};
