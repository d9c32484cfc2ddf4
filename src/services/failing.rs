//! Store that wraps [`InMemoryStore`] and starts failing after a set number of
//! candidate fetches. Test-only.

use crate::core::filters::FilterPredicate;
use crate::models::{GroupCandidate, PreferenceProfile, UserId};
use crate::services::memory::InMemoryStore;
use crate::services::store::{CandidateStore, FetchQuery, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) struct FailingStore {
    pub inner: InMemoryStore,
    /// Fetches that succeed before every later one fails
    healthy_fetches: usize,
    fetches: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: InMemoryStore, healthy_fetches: usize) -> Self {
        Self {
            inner,
            healthy_fetches,
            fetches: AtomicUsize::new(0),
        }
    }

    fn next_fetch(&self) -> Result<(), StoreError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        if n >= self.healthy_fetches {
            Err(StoreError::Unavailable(format!("fetch #{} refused", n + 1)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CandidateStore for FailingStore {
    async fn load_profile(&self, user_id: UserId) -> Result<Option<PreferenceProfile>, StoreError> {
        self.inner.load_profile(user_id).await
    }

    async fn fetch_groups(&self, query: &FetchQuery) -> Result<Vec<GroupCandidate>, StoreError> {
        self.next_fetch()?;
        self.inner.fetch_groups(query).await
    }

    async fn count_groups(&self, predicate: &FilterPredicate) -> Result<u64, StoreError> {
        self.inner.count_groups(predicate).await
    }

    async fn fetch_profiles(&self, query: &FetchQuery) -> Result<Vec<PreferenceProfile>, StoreError> {
        self.next_fetch()?;
        self.inner.fetch_profiles(query).await
    }

    async fn count_profiles(&self, predicate: &FilterPredicate) -> Result<u64, StoreError> {
        self.inner.count_profiles(predicate).await
    }

    async fn ratings_received(&self, user_id: UserId) -> Result<Vec<i16>, StoreError> {
        self.inner.ratings_received(user_id).await
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(false)
    }
}
