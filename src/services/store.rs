use crate::core::filters::FilterPredicate;
use crate::models::{GroupCandidate, PreferenceProfile, UnknownVariant, UserId};
use async_trait::async_trait;
use thiserror::Error;

/// Accepted members previewed on each fetched group
pub const MEMBER_PREVIEW_LIMIT: usize = 3;

/// Errors raised by a candidate store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid stored value: {0}")]
    Decode(#[from] UnknownVariant),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Ordering applied before `offset`/`limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most recently created first
    #[default]
    CreatedDesc,
    /// Earliest window start first (group dateFrom, profile availableFrom)
    WindowStartAsc,
}

/// One page of candidates matching a predicate
#[derive(Debug, Clone)]
pub struct FetchQuery {
    pub predicate: FilterPredicate,
    pub order: SortOrder,
    pub limit: usize,
    pub offset: usize,
    /// Identity keys never returned, whatever the predicate says
    pub exclude_ids: Vec<i64>,
}

impl FetchQuery {
    pub fn new(predicate: FilterPredicate) -> Self {
        Self {
            predicate,
            order: SortOrder::CreatedDesc,
            limit: 10,
            offset: 0,
            exclude_ids: Vec::new(),
        }
    }

    /// Most recent entities with no filter applied
    pub fn latest(limit: usize) -> Self {
        Self::new(FilterPredicate::match_all()).limit(limit)
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn exclude(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        for id in ids {
            if !self.exclude_ids.contains(&id) {
                self.exclude_ids.push(id);
            }
        }
        self
    }
}

/// Read access to profiles, groups and ratings
///
/// Groups are returned with their facet sets and up to
/// [`MEMBER_PREVIEW_LIMIT`] accepted members attached; profiles with all five
/// facet sets. Failures are returned as-is, the store never retries.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Load a subject's profile, `None` when the user has none
    async fn load_profile(&self, user_id: UserId) -> Result<Option<PreferenceProfile>, StoreError>;

    async fn fetch_groups(&self, query: &FetchQuery) -> Result<Vec<GroupCandidate>, StoreError>;

    async fn count_groups(&self, predicate: &FilterPredicate) -> Result<u64, StoreError>;

    async fn fetch_profiles(&self, query: &FetchQuery) -> Result<Vec<PreferenceProfile>, StoreError>;

    async fn count_profiles(&self, predicate: &FilterPredicate) -> Result<u64, StoreError>;

    /// Values of every rating the user has received
    async fn ratings_received(&self, user_id: UserId) -> Result<Vec<i16>, StoreError>;

    /// Get the backend name for logging/debugging
    fn backend_name(&self) -> &'static str;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
