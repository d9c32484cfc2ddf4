use crate::core::backfill;
use crate::core::filters::{FilterBuilder, FilterPredicate, ScalarFilter};
use crate::core::scoring::{score_group, score_user, ScoreBreakdown};
use crate::error::MatchError;
use crate::models::{AgeRange, Gender, GroupCandidate, GroupCard, PreferenceProfile, UserAvatar, UserId};
use crate::services::store::{CandidateStore, FetchQuery, SortOrder};
use chrono::{NaiveDate, Utc};

/// Size of the candidate pool scored per request
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Tunables for the matching pipeline
#[derive(Debug, Clone, Copy)]
pub struct MatchingConfig {
    pub pool_size: usize,
    /// Keep primary results out of the backfill fetch
    pub exclude_primary_from_backfill: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            exclude_primary_from_backfill: true,
        }
    }
}

/// A candidate paired with its score
#[derive(Debug, Clone)]
pub struct Scored<T> {
    pub candidate: T,
    pub breakdown: ScoreBreakdown,
}

impl<T> Scored<T> {
    pub fn score(&self) -> u32 {
        self.breakdown.total()
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility filters derived from the subject profile
/// 2. Primary fetch, most recently created first
/// 3. Backfill with the most recent entities up to the pool size
/// 4. Scoring and stable ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchingConfig,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(MatchingConfig::default())
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rank groups for a subject, using today's UTC date for age bracketing
    pub async fn match_groups<S>(&self, store: &S, subject_id: UserId) -> Result<Vec<GroupCard>, MatchError>
    where
        S: CandidateStore + ?Sized,
    {
        self.match_groups_on(store, subject_id, Utc::now().date_naive())
            .await
    }

    pub async fn match_groups_on<S>(
        &self,
        store: &S,
        subject_id: UserId,
        today: NaiveDate,
    ) -> Result<Vec<GroupCard>, MatchError>
    where
        S: CandidateStore + ?Sized,
    {
        let subject = load_subject(store, subject_id).await?;
        let bracket = subject
            .birthdate
            .map(|birthdate| AgeRange::for_birthdate(birthdate, today));

        let eligibility = group_eligibility(&subject, bracket);
        tracing::debug!(subject_id, ?bracket, ?eligibility, "Group eligibility filters built");

        let primary_query = FetchQuery::new(eligibility)
            .order(SortOrder::CreatedDesc)
            .limit(self.config.pool_size);
        let primary = store.fetch_groups(&primary_query).await?;
        let primary_count = primary.len();

        let primary_ids: Vec<i64> = primary.iter().map(|g| g.id).collect();
        let pool = match backfill::plan(
            &primary_ids,
            self.config.pool_size,
            self.config.exclude_primary_from_backfill,
            &[],
        ) {
            Some(query) => {
                let extra = store.fetch_groups(&query).await?;
                backfill::merge(primary, extra, self.config.pool_size)
            }
            None => primary,
        };

        let ranked = self.rank_groups(&subject, bracket, pool);

        tracing::info!(
            "Ranked {} groups for user {} ({} eligible, {} backfilled)",
            ranked.len(),
            subject_id,
            primary_count,
            ranked.len() - primary_count
        );

        Ok(ranked
            .into_iter()
            .map(|scored| GroupCard::from(scored.candidate))
            .collect())
    }

    /// Rank other users for a subject
    pub async fn match_users<S>(&self, store: &S, subject_id: UserId) -> Result<Vec<UserAvatar>, MatchError>
    where
        S: CandidateStore + ?Sized,
    {
        let subject = load_subject(store, subject_id).await?;

        let eligibility = user_eligibility(&subject);
        tracing::debug!(subject_id, ?eligibility, "User eligibility filters built");

        let primary_query = FetchQuery::new(eligibility)
            .order(SortOrder::CreatedDesc)
            .limit(self.config.pool_size)
            .exclude([subject_id]);
        let primary = store.fetch_profiles(&primary_query).await?;
        let primary_count = primary.len();

        let primary_ids: Vec<i64> = primary.iter().map(|p| p.user_id).collect();
        let pool = match backfill::plan(
            &primary_ids,
            self.config.pool_size,
            self.config.exclude_primary_from_backfill,
            &[subject_id],
        ) {
            Some(query) => {
                let extra = store.fetch_profiles(&query).await?;
                backfill::merge(primary, extra, self.config.pool_size)
            }
            None => primary,
        };

        let ranked = self.rank_users(&subject, pool);

        tracing::info!(
            "Ranked {} users for user {} ({} eligible, {} backfilled)",
            ranked.len(),
            subject_id,
            primary_count,
            ranked.len() - primary_count
        );

        Ok(ranked
            .into_iter()
            .map(|scored| UserAvatar::from(scored.candidate))
            .collect())
    }

    /// Score and sort groups, highest first
    ///
    /// Equal scores keep the input (fetch) order.
    pub fn rank_groups(
        &self,
        subject: &PreferenceProfile,
        bracket: Option<AgeRange>,
        candidates: Vec<GroupCandidate>,
    ) -> Vec<Scored<GroupCandidate>> {
        rank(candidates, |group| {
            let breakdown = score_group(subject, bracket, group);
            tracing::debug!(group_id = group.id, score = breakdown.total(), ?breakdown, "Scored group");
            breakdown
        })
    }

    /// Score and sort user profiles, highest first
    pub fn rank_users(
        &self,
        subject: &PreferenceProfile,
        candidates: Vec<PreferenceProfile>,
    ) -> Vec<Scored<PreferenceProfile>> {
        rank(candidates, |candidate| {
            let breakdown = score_user(subject, candidate);
            tracing::debug!(user_id = candidate.user_id, score = breakdown.total(), ?breakdown, "Scored user");
            breakdown
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

async fn load_subject<S>(store: &S, subject_id: UserId) -> Result<PreferenceProfile, MatchError>
where
    S: CandidateStore + ?Sized,
{
    store
        .load_profile(subject_id)
        .await?
        .ok_or(MatchError::NotFound(subject_id))
}

/// Stable descending sort by total score
fn rank<T, F>(candidates: Vec<T>, mut score: F) -> Vec<Scored<T>>
where
    F: FnMut(&T) -> ScoreBreakdown,
{
    let mut scored: Vec<Scored<T>> = candidates
        .into_iter()
        .map(|candidate| {
            let breakdown = score(&candidate);
            Scored { candidate, breakdown }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score().cmp(&a.score()));
    scored
}

/// Hard filters for group matching
///
/// - the group accepts the subject's age bracket (when a birthdate is known)
/// - the group's gender equals the subject's, unless the subject is OTHER or unset
/// - the group's dates fit the subject's availability, when both bounds are set
pub fn group_eligibility(subject: &PreferenceProfile, bracket: Option<AgeRange>) -> FilterPredicate {
    let mut builder = FilterBuilder::new();

    if let Some(bracket) = bracket {
        builder = builder.facet(&[bracket]);
    }

    if let Some(gender) = subject.gender.filter(|g| *g != Gender::Other) {
        builder = builder.scalar(ScalarFilter::GroupGenderIs(gender.as_group_gender()));
    }

    if let Some(window) = subject.availability() {
        builder = builder
            .scalar(ScalarFilter::WindowStartsOnOrAfter(window.from))
            .scalar(ScalarFilter::WindowEndsOnOrBefore(window.to));
    }

    builder.build()
}

/// Hard filters for user matching
///
/// - the candidate's availability fits the subject's, when both bounds are set
/// - the candidate shares at least one trip duration with the subject
pub fn user_eligibility(subject: &PreferenceProfile) -> FilterPredicate {
    let durations: Vec<_> = subject.trip_durations.iter().copied().collect();
    let mut builder = FilterBuilder::new().facet(&durations);

    if let Some(window) = subject.availability() {
        builder = builder
            .scalar(ScalarFilter::WindowStartsOnOrAfter(window.from))
            .scalar(ScalarFilter::WindowEndsOnOrBefore(window.to));
    }

    builder.build()
}
