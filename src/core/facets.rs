//! Facet dimensions shared by profiles and groups.
//!
//! Every multi-valued preference dimension is addressed through [`FacetKind`].
//! The kind resolves to the relation that stores it for a given entity, so the
//! filter builder, the in-memory evaluator and the SQL renderer all go through
//! one table instead of looking relations up by name.

use crate::models::{AgeRange, Interest, Language, Lodging, TravelType, TripDuration, UnknownVariant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Entity a predicate is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Group,
    Profile,
}

/// Relation table holding one facet for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub table: &'static str,
    /// Foreign key back to the owning row
    pub owner_column: &'static str,
    /// Column holding the enum value
    pub value_column: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetKind {
    TravelTypes,
    Lodgings,
    Languages,
    Interests,
    TripDurations,
    AgeRanges,
}

impl FacetKind {
    pub const ALL: [FacetKind; 6] = [
        FacetKind::TravelTypes,
        FacetKind::Lodgings,
        FacetKind::Languages,
        FacetKind::Interests,
        FacetKind::TripDurations,
        FacetKind::AgeRanges,
    ];

    /// Relation storing this facet for `entity`, `None` when the facet does
    /// not apply (interests and trip durations on groups, age ranges on
    /// profiles)
    pub fn relation(&self, entity: Entity) -> Option<Relation> {
        let (table, value_column) = match (entity, *self) {
            (Entity::Group, FacetKind::TravelTypes) => ("group_travel_types", "travel_type"),
            (Entity::Group, FacetKind::Lodgings) => ("group_lodgings", "lodging"),
            (Entity::Group, FacetKind::Languages) => ("group_languages", "language"),
            (Entity::Group, FacetKind::AgeRanges) => ("group_age_ranges", "age_range"),
            (Entity::Group, FacetKind::Interests | FacetKind::TripDurations) => return None,
            (Entity::Profile, FacetKind::TravelTypes) => ("profile_travel_types", "travel_type"),
            (Entity::Profile, FacetKind::Lodgings) => ("profile_lodgings", "lodging"),
            (Entity::Profile, FacetKind::Languages) => ("profile_languages", "language"),
            (Entity::Profile, FacetKind::Interests) => ("profile_interests", "interest"),
            (Entity::Profile, FacetKind::TripDurations) => {
                ("profile_trip_durations", "trip_duration")
            }
            (Entity::Profile, FacetKind::AgeRanges) => return None,
        };

        let owner_column = match entity {
            Entity::Group => "group_id",
            Entity::Profile => "user_id",
        };

        Some(Relation {
            table,
            owner_column,
            value_column,
        })
    }

    /// Parse a stored wire name as a value of this facet
    pub fn parse_value(&self, raw: &str) -> Result<FacetValue, UnknownVariant> {
        Ok(match self {
            FacetKind::TravelTypes => FacetValue::TravelType(raw.parse()?),
            FacetKind::Lodgings => FacetValue::Lodging(raw.parse()?),
            FacetKind::Languages => FacetValue::Language(raw.parse()?),
            FacetKind::Interests => FacetValue::Interest(raw.parse()?),
            FacetKind::TripDurations => FacetValue::TripDuration(raw.parse()?),
            FacetKind::AgeRanges => FacetValue::AgeRange(raw.parse()?),
        })
    }
}

/// One typed value of one facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "facet", content = "value", rename_all = "camelCase")]
pub enum FacetValue {
    TravelType(TravelType),
    Lodging(Lodging),
    Language(Language),
    Interest(Interest),
    TripDuration(TripDuration),
    AgeRange(AgeRange),
}

impl FacetValue {
    pub fn kind(&self) -> FacetKind {
        match self {
            FacetValue::TravelType(_) => FacetKind::TravelTypes,
            FacetValue::Lodging(_) => FacetKind::Lodgings,
            FacetValue::Language(_) => FacetKind::Languages,
            FacetValue::Interest(_) => FacetKind::Interests,
            FacetValue::TripDuration(_) => FacetKind::TripDurations,
            FacetValue::AgeRange(_) => FacetKind::AgeRanges,
        }
    }

    /// Wire name as stored in the relation's value column
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetValue::TravelType(v) => v.as_str(),
            FacetValue::Lodging(v) => v.as_str(),
            FacetValue::Language(v) => v.as_str(),
            FacetValue::Interest(v) => v.as_str(),
            FacetValue::TripDuration(v) => v.as_str(),
            FacetValue::AgeRange(v) => v.as_str(),
        }
    }
}

/// Implemented by every facet enum
pub trait Facet: Copy + Ord {
    const KIND: FacetKind;

    fn into_value(self) -> FacetValue;
}

macro_rules! impl_facet {
    ($($ty:ident => $kind:ident),+ $(,)?) => {
        $(
            impl Facet for $ty {
                const KIND: FacetKind = FacetKind::$kind;

                #[inline]
                fn into_value(self) -> FacetValue {
                    FacetValue::$ty(self)
                }
            }
        )+
    };
}

impl_facet! {
    TravelType => TravelTypes,
    Lodging => Lodgings,
    Language => Languages,
    Interest => Interests,
    TripDuration => TripDurations,
    AgeRange => AgeRanges,
}

/// Number of values present in both sets
///
/// Each shared value counts once; there is no cap.
#[inline]
pub fn overlap_count<T: Ord>(subject: &BTreeSet<T>, candidate: &BTreeSet<T>) -> u32 {
    subject.intersection(candidate).count() as u32
}
