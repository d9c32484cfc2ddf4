// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeRange, Budget, DateWindow, Gender, GroupCandidate, GroupGender, GroupId, GroupRole, Interest, Language,
    Lodging, MemberAvatar, MemberStatus, PreferenceProfile, TravelType, TripDuration, UnknownVariant, UserId,
};
pub use requests::{LatestRequest, MatchRequest, SearchGroupsRequest, SearchUsersRequest};
pub use responses::{ErrorResponse, GroupCard, HealthResponse, Page, UserAvatar};
