//! Faceted search over groups and profiles.
//!
//! Uses the same filter builder as matching; results are paginated and come
//! with a total count from the store.

use crate::core::filters::{FilterBuilder, FilterPredicate, ScalarFilter};
use crate::error::MatchError;
use crate::models::{
    AgeRange, Budget, Gender, GroupCard, GroupGender, Interest, Language, Lodging, Page,
    TravelType, TripDuration, UserAvatar,
};
use crate::services::store::{CandidateStore, FetchQuery, SortOrder};
use chrono::NaiveDate;

/// 1-based page request, both values at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Clamp both values to at least 1
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    fn page_of<T>(&self, items: Vec<T>, total: u64) -> Page<T> {
        let limit = self.limit as u64;
        Page {
            items,
            total,
            current_page: self.page,
            total_pages: total.div_ceil(limit),
            has_next_page: (self.offset() as u64 + limit) < total,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Group search criteria, every field optional
#[derive(Debug, Clone, Default)]
pub struct GroupSearch {
    pub location: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub travel_types: Vec<TravelType>,
    pub lodgings: Vec<Lodging>,
    pub languages: Vec<Language>,
    pub age_ranges: Vec<AgeRange>,
    pub budget: Option<Budget>,
    pub gender: Option<GroupGender>,
}

/// User search criteria, every field optional
#[derive(Debug, Clone, Default)]
pub struct UserSearch {
    pub travel_types: Vec<TravelType>,
    pub interests: Vec<Interest>,
    pub trip_durations: Vec<TripDuration>,
    pub lodgings: Vec<Lodging>,
    pub languages: Vec<Language>,
    pub budget: Option<Budget>,
    pub gender: Option<Gender>,
}

/// Reject a date range whose end does not come after its start
pub fn validate_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), MatchError> {
    match (from, to) {
        (Some(from), Some(to)) if to <= from => Err(MatchError::InvalidRange { from, to }),
        _ => Ok(()),
    }
}

impl GroupSearch {
    /// Validate the criteria and build the store predicate
    pub fn predicate(&self) -> Result<FilterPredicate, MatchError> {
        validate_range(self.date_from, self.date_to)?;

        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Ok(FilterBuilder::new()
            .scalar_opt(location, ScalarFilter::LocationContains)
            .scalar_opt(self.date_from, ScalarFilter::WindowStartsOnOrAfter)
            .scalar_opt(self.date_to, ScalarFilter::WindowEndsOnOrBefore)
            .facet(&self.travel_types)
            .facet(&self.lodgings)
            .facet(&self.languages)
            .facet(&self.age_ranges)
            .scalar_opt(self.budget, ScalarFilter::BudgetIs)
            .scalar_opt(self.gender, ScalarFilter::GroupGenderIs)
            .build())
    }
}

impl UserSearch {
    pub fn predicate(&self) -> FilterPredicate {
        FilterBuilder::new()
            .facet(&self.travel_types)
            .facet(&self.interests)
            .facet(&self.trip_durations)
            .facet(&self.lodgings)
            .facet(&self.languages)
            .scalar_opt(self.budget, ScalarFilter::BudgetIs)
            .scalar_opt(self.gender, ScalarFilter::ProfileGenderIs)
            .build()
    }
}

/// Search groups, soonest departure first
pub async fn search_groups<S>(
    store: &S,
    criteria: &GroupSearch,
    pagination: Pagination,
) -> Result<Page<GroupCard>, MatchError>
where
    S: CandidateStore + ?Sized,
{
    let predicate = criteria.predicate()?;
    let query = FetchQuery::new(predicate.clone())
        .order(SortOrder::WindowStartAsc)
        .limit(pagination.limit() as usize)
        .offset(pagination.offset());

    let (groups, total) = tokio::try_join!(store.fetch_groups(&query), store.count_groups(&predicate))?;

    tracing::debug!("Group search matched {} groups (page {})", total, pagination.page());

    let cards = groups.into_iter().map(GroupCard::from).collect();
    Ok(pagination.page_of(cards, total))
}

/// Search users, most recently joined first
pub async fn search_users<S>(
    store: &S,
    criteria: &UserSearch,
    pagination: Pagination,
) -> Result<Page<UserAvatar>, MatchError>
where
    S: CandidateStore + ?Sized,
{
    let predicate = criteria.predicate();
    let query = FetchQuery::new(predicate.clone())
        .order(SortOrder::CreatedDesc)
        .limit(pagination.limit() as usize)
        .offset(pagination.offset());

    let (profiles, total) =
        tokio::try_join!(store.fetch_profiles(&query), store.count_profiles(&predicate))?;

    tracing::debug!("User search matched {} users (page {})", total, pagination.page());

    let avatars = profiles.into_iter().map(UserAvatar::from).collect();
    Ok(pagination.page_of(avatars, total))
}

/// Most recently created groups, unfiltered
pub async fn latest_groups<S>(store: &S, limit: usize) -> Result<Vec<GroupCard>, MatchError>
where
    S: CandidateStore + ?Sized,
{
    let groups = store.fetch_groups(&FetchQuery::latest(limit)).await?;
    Ok(groups.into_iter().map(GroupCard::from).collect())
}

/// Most recently created profiles, unfiltered
pub async fn latest_profiles<S>(store: &S, limit: usize) -> Result<Vec<UserAvatar>, MatchError>
where
    S: CandidateStore + ?Sized,
{
    let profiles = store.fetch_profiles(&FetchQuery::latest(limit)).await?;
    Ok(profiles.into_iter().map(UserAvatar::from).collect())
}
