//! Travel Match - matching and faceted search for group travel
//!
//! This library ranks travel groups and fellow travelers for a user from their
//! preference profile, and serves faceted, paginated search over both.
//! Candidates come from a [`services::CandidateStore`]; PostgreSQL in
//! production, an in-memory store for tests.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{FilterBuilder, FilterPredicate, Matcher, MatchingConfig, RatingSummary};
pub use error::MatchError;
pub use models::{GroupCandidate, GroupCard, Page, PreferenceProfile, UserAvatar};
pub use services::{CandidateStore, InMemoryStore, PostgresStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.config().pool_size, 10);
        assert!(FilterBuilder::new().build().is_match_all());
    }
}
