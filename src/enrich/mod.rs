// src/enrich/mod.rs
// =============================================================================
// Best-effort README enrichment.
//
// Submodules:
// - readme: Regex extraction of demo links and preview images
// - pool: Concurrent README downloads, merged back onto the records
//
// Enrichment is advisory: nothing in here returns an error to the caller.
// =============================================================================

mod pool;
mod readme;

pub use pool::{enrich_records, EnrichedRecord, DEFAULT_CONCURRENCY};
pub use readme::ReadmeScanner;
