use crate::core::filters::{FilterPredicate, Filterable};
use crate::models::{GroupCandidate, PreferenceProfile, UserId};
use crate::services::store::{CandidateStore, FetchQuery, SortOrder, StoreError, MEMBER_PREVIEW_LIMIT};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

/// A rating left by one user on another
#[derive(Debug, Clone, Copy)]
struct RatingRow {
    rated_id: UserId,
    value: i16,
}

/// Candidate store held entirely in memory
///
/// Predicates are evaluated with [`FilterPredicate::matches`], so this store
/// behaves like the SQL one without a database. Rows keep insertion order,
/// which is the tie-break whenever the sort key is equal.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: RwLock<Vec<PreferenceProfile>>,
    groups: RwLock<Vec<GroupCandidate>>,
    ratings: RwLock<Vec<RatingRow>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile keyed by user id
    pub fn insert_profile(&self, profile: PreferenceProfile) {
        let mut profiles = self.profiles.write();
        match profiles.iter_mut().find(|p| p.user_id == profile.user_id) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
    }

    /// Insert or replace a group keyed by id
    pub fn insert_group(&self, mut group: GroupCandidate) {
        group.members.truncate(MEMBER_PREVIEW_LIMIT);
        let mut groups = self.groups.write();
        match groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group,
            None => groups.push(group),
        }
    }

    pub fn insert_rating(&self, rated_id: UserId, value: i16) {
        self.ratings.write().push(RatingRow { rated_id, value });
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.read().len()
    }
}

/// Sort key shared by groups and profiles
trait Sortable {
    fn id(&self) -> i64;
    fn created_at(&self) -> DateTime<Utc>;
    fn window_start(&self) -> Option<NaiveDate>;
}

impl Sortable for GroupCandidate {
    fn id(&self) -> i64 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn window_start(&self) -> Option<NaiveDate> {
        Some(self.date_from)
    }
}

impl Sortable for PreferenceProfile {
    fn id(&self) -> i64 {
        self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn window_start(&self) -> Option<NaiveDate> {
        self.available_from
    }
}

fn run_query<T>(rows: &[T], query: &FetchQuery) -> Vec<T>
where
    T: Filterable + Sortable + Clone,
{
    let mut selected: Vec<&T> = rows
        .iter()
        .filter(|row| !query.exclude_ids.contains(&row.id()))
        .filter(|row| query.predicate.matches(*row))
        .collect();

    match query.order {
        SortOrder::CreatedDesc => selected.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        // Missing starts sort last, as NULLS LAST would
        SortOrder::WindowStartAsc => selected.sort_by(|a, b| {
            match (a.window_start(), b.window_start()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        }),
    }

    selected
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .cloned()
        .collect()
}

fn count_matching<T: Filterable>(rows: &[T], predicate: &FilterPredicate) -> u64 {
    rows.iter().filter(|row| predicate.matches(*row)).count() as u64
}

#[async_trait]
impl CandidateStore for InMemoryStore {
    async fn load_profile(&self, user_id: UserId) -> Result<Option<PreferenceProfile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn fetch_groups(&self, query: &FetchQuery) -> Result<Vec<GroupCandidate>, StoreError> {
        Ok(run_query(&self.groups.read(), query))
    }

    async fn count_groups(&self, predicate: &FilterPredicate) -> Result<u64, StoreError> {
        Ok(count_matching(&self.groups.read(), predicate))
    }

    async fn fetch_profiles(&self, query: &FetchQuery) -> Result<Vec<PreferenceProfile>, StoreError> {
        Ok(run_query(&self.profiles.read(), query))
    }

    async fn count_profiles(&self, predicate: &FilterPredicate) -> Result<u64, StoreError> {
        Ok(count_matching(&self.profiles.read(), predicate))
    }

    async fn ratings_received(&self, user_id: UserId) -> Result<Vec<i16>, StoreError> {
        Ok(self
            .ratings
            .read()
            .iter()
            .filter(|r| r.rated_id == user_id)
            .map(|r| r.value)
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
