//! Property-based tests for the compendium server
//!
//! This module contains property-based tests using the proptest framework.
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Test Modules
//!
//! - `query_props`: Tests for the compendium query engine
//!   - Identical calls yield identical pages (idempotence)
//!   - Concatenated pages reconstruct the full ordered result set
//!   - `hasMore` always equals `page * limit < total`
//!   - Limit is clamped on the high side, never below 1
//!
//! ## Configuration
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```

mod query_props;
