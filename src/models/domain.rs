use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Identity key of a user (and of their preference profile)
pub type UserId = i64;

/// Identity key of a travel group
pub type GroupId = i64;

/// Raised when a wire string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed enum together with its wire names.
///
/// The wire name is used for serde, `Display`, `FromStr` and the text columns
/// the persistence layer stores.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Gender declared on a user profile
    Gender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

wire_enum! {
    /// Gender policy of a group. `Mixed` accepts anyone.
    GroupGender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
        Mixed => "MIXED",
    }
}

wire_enum! {
    Budget {
        Low => "LOW",
        Middle => "MIDDLE",
        High => "HIGH",
        Luxury => "LUXURY",
    }
}

wire_enum! {
    /// Fixed age buckets, ordered youngest first
    AgeRange {
        First => "FIRST_AGE_RANGE",
        Second => "SECOND_AGE_RANGE",
        Third => "THIRD_AGE_RANGE",
        Fourth => "FOURTH_AGE_RANGE",
    }
}

wire_enum! {
    TravelType {
        Relaxation => "RELAXATION",
        Adventure => "ADVENTURE",
        Cultural => "CULTURAL",
        Hiking => "HIKING",
        Beach => "BEACH",
        Gastronomic => "GASTRONOMIC",
        RoadTrip => "ROAD_TRIP",
        Cruise => "CRUISE",
        FamilyTrip => "FAMILY_TRIP",
        FriendsTrip => "FRIENDS_TRIP",
        EcoFriendly => "ECO_FRIENDLY",
    }
}

wire_enum! {
    Lodging {
        YouthHotel => "YOUTH_HOTEL",
        Hotel => "HOTEL",
        Airbnb => "AIRBNB",
        Camping => "CAMPING",
        Ecolodge => "ECOLODGE",
        Luxury => "LUXURY",
    }
}

wire_enum! {
    Language {
        French => "FRENCH",
        English => "ENGLISH",
        Spanish => "SPANISH",
        Portuguese => "PORTUGUESE",
        Arabic => "ARABIC",
        Italian => "ITALIAN",
        Japanese => "JAPANESE",
        Mandarin => "MANDARIN",
        Deutsch => "DEUTSCH",
        Dutch => "DUTCH",
        Russian => "RUSSIAN",
        Hindi => "HINDI",
        Greek => "GREEK",
    }
}

wire_enum! {
    Interest {
        AdventureSports => "ADVENTURE_SPORTS",
        CulturalArts => "CULTURAL_ARTS",
        Gastronomic => "GASTRONOMIC",
        Nature => "NATURE",
        Wellness => "WELLNESS",
        Party => "PARTY",
        AmusementPark => "AMUSEMENT_PARK",
        BoardGames => "BOARD_GAMES",
        Technologies => "TECHNOLOGIES",
        History => "HISTORY",
        WaterActivities => "WATER_ACTIVITIES",
        Shopping => "SHOPPING",
        FamilyActivities => "FAMILY_ACTIVITIES",
    }
}

wire_enum! {
    TripDuration {
        ShortTrip => "SHORT_TRIP",
        MediumTrip => "MEDIUM_TRIP",
        LongTrip => "LONG_TRIP",
    }
}

wire_enum! {
    GroupRole {
        Author => "AUTHOR",
        Organizer => "ORGANIZER",
        Traveler => "TRAVELER",
    }
}

wire_enum! {
    MemberStatus {
        Pending => "PENDING",
        Accepted => "ACCEPTED",
        Denied => "DENIED",
    }
}

impl Gender {
    /// The group policy that admits exactly this gender
    pub fn as_group_gender(&self) -> GroupGender {
        match self {
            Gender::Male => GroupGender::Male,
            Gender::Female => GroupGender::Female,
            Gender::Other => GroupGender::Other,
        }
    }
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Whether `inner` lies entirely within this window
    #[inline]
    pub fn contains(&self, inner: &DateWindow) -> bool {
        inner.from >= self.from && inner.to <= self.to
    }
}

/// A user's travel preferences, the subject of matching and a candidate for
/// user-to-user matching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
    pub user_id: UserId,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
    #[serde(default)]
    pub available_to: Option<NaiveDate>,
    #[serde(default)]
    pub path_picture: Option<String>,
    #[serde(default)]
    pub travel_types: BTreeSet<TravelType>,
    #[serde(default)]
    pub lodgings: BTreeSet<Lodging>,
    #[serde(default)]
    pub languages: BTreeSet<Language>,
    #[serde(default)]
    pub interests: BTreeSet<Interest>,
    #[serde(default)]
    pub trip_durations: BTreeSet<TripDuration>,
    pub created_at: DateTime<Utc>,
}

impl PreferenceProfile {
    /// Availability window, only when both bounds are set
    pub fn availability(&self) -> Option<DateWindow> {
        match (self.available_from, self.available_to) {
            (Some(from), Some(to)) => Some(DateWindow::new(from, to)),
            _ => None,
        }
    }
}

/// Preview of an accepted group member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAvatar {
    pub path_picture: Option<String>,
    pub role: GroupRole,
}

/// A travel group scored against a subject profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCandidate {
    pub id: GroupId,
    pub title: String,
    pub location: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub gender: GroupGender,
    pub budget: Budget,
    #[serde(default)]
    pub path_picture: Option<String>,
    #[serde(default)]
    pub age_ranges: BTreeSet<AgeRange>,
    #[serde(default)]
    pub travel_types: BTreeSet<TravelType>,
    #[serde(default)]
    pub lodgings: BTreeSet<Lodging>,
    #[serde(default)]
    pub languages: BTreeSet<Language>,
    /// Accepted members only, at most three
    #[serde(default)]
    pub members: Vec<MemberAvatar>,
    pub created_at: DateTime<Utc>,
}

impl GroupCandidate {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.date_from, self.date_to)
    }
}
