// Core algorithm exports
pub mod age;
pub mod backfill;
pub mod facets;
pub mod filters;
pub mod matcher;
pub mod ratings;
pub mod scoring;
pub mod search;

pub use age::age_on;
pub use facets::{overlap_count, Entity, Facet, FacetKind, FacetValue, Relation};
pub use filters::{build_predicate, FacetSelection, FilterBuilder, FilterPredicate, Filterable, ScalarFilter};
pub use matcher::{group_eligibility, user_eligibility, Matcher, MatchingConfig, Scored, DEFAULT_POOL_SIZE};
pub use ratings::RatingSummary;
pub use scoring::{score_group, score_user, ScoreBreakdown};
pub use search::{latest_groups, latest_profiles, search_groups, search_users, GroupSearch, Pagination, UserSearch};
