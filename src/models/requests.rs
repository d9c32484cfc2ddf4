use crate::core::search::{GroupSearch, Pagination, UserSearch};
use crate::models::domain::{UnknownVariant, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Query for the matching endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: UserId,
}

/// Query for the group search endpoint
///
/// Facet lists are comma separated wire names, e.g. `travelTypes=HIKING,BEACH`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchGroupsRequest {
    pub location: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub travel_types: Option<String>,
    pub lodgings: Option<String>,
    pub languages: Option<String>,
    pub age_ranges: Option<String>,
    pub budget: Option<String>,
    pub gender: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
}

/// Query for the user search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchUsersRequest {
    pub travel_types: Option<String>,
    pub interests: Option<String>,
    pub trip_durations: Option<String>,
    pub lodgings: Option<String>,
    pub languages: Option<String>,
    pub budget: Option<String>,
    pub gender: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
}

/// Query for the latest listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LatestRequest {
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
}

fn default_page() -> u32 {
    1
}

/// Split a comma separated list of wire names, skipping blanks
fn parse_list<T>(raw: Option<&str>) -> Result<Vec<T>, UnknownVariant>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::parse)
            .collect()
    })
    .unwrap_or_else(|| Ok(Vec::new()))
}

fn parse_one<T>(raw: Option<&str>) -> Result<Option<T>, UnknownVariant>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse)
        .transpose()
}

impl SearchGroupsRequest {
    /// Page request, with the limit capped at `max_limit`
    pub fn pagination(&self, default_limit: u32, max_limit: u32) -> Pagination {
        Pagination::new(self.page, self.limit.unwrap_or(default_limit).min(max_limit))
    }
}

impl SearchUsersRequest {
    pub fn pagination(&self, default_limit: u32, max_limit: u32) -> Pagination {
        Pagination::new(self.page, self.limit.unwrap_or(default_limit).min(max_limit))
    }
}

impl TryFrom<&SearchGroupsRequest> for GroupSearch {
    type Error = UnknownVariant;

    fn try_from(req: &SearchGroupsRequest) -> Result<Self, Self::Error> {
        Ok(GroupSearch {
            location: req.location.clone(),
            date_from: req.date_from,
            date_to: req.date_to,
            travel_types: parse_list(req.travel_types.as_deref())?,
            lodgings: parse_list(req.lodgings.as_deref())?,
            languages: parse_list(req.languages.as_deref())?,
            age_ranges: parse_list(req.age_ranges.as_deref())?,
            budget: parse_one(req.budget.as_deref())?,
            gender: parse_one(req.gender.as_deref())?,
        })
    }
}

impl TryFrom<&SearchUsersRequest> for UserSearch {
    type Error = UnknownVariant;

    fn try_from(req: &SearchUsersRequest) -> Result<Self, Self::Error> {
        Ok(UserSearch {
            travel_types: parse_list(req.travel_types.as_deref())?,
            interests: parse_list(req.interests.as_deref())?,
            trip_durations: parse_list(req.trip_durations.as_deref())?,
            lodgings: parse_list(req.lodgings.as_deref())?,
            languages: parse_list(req.languages.as_deref())?,
            budget: parse_one(req.budget.as_deref())?,
            gender: parse_one(req.gender.as_deref())?,
        })
    }
}
