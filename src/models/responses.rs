use crate::models::domain::{GroupCandidate, GroupId, MemberAvatar, PreferenceProfile, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Group summary returned by matching and search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCard {
    pub id: GroupId,
    pub title: String,
    pub location: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub path_picture: Option<String>,
    pub members: Vec<MemberAvatar>,
}

impl From<GroupCandidate> for GroupCard {
    fn from(group: GroupCandidate) -> Self {
        Self {
            id: group.id,
            title: group.title,
            location: group.location,
            date_from: group.date_from,
            date_to: group.date_to,
            path_picture: group.path_picture,
            members: group.members,
        }
    }
}

/// User summary returned by matching and search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAvatar {
    pub user_id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub path_picture: Option<String>,
}

impl From<PreferenceProfile> for UserAvatar {
    fn from(profile: PreferenceProfile) -> Self {
        Self {
            user_id: profile.user_id,
            firstname: profile.firstname,
            lastname: profile.lastname,
            path_picture: profile.path_picture,
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u64,
    pub has_next_page: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
