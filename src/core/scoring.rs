use crate::core::facets::overlap_count;
use crate::models::{AgeRange, DateWindow, GroupCandidate, GroupGender, PreferenceProfile};
use serde::Serialize;

/// Per-term contribution to a compatibility score
///
/// Scoring formula (every term starts at 0):
/// score = (
///     age           # 1 if the candidate accepts the subject's bracket
///   + gender        # 1 if the candidate's gender equals the subject's, or is MIXED
///   + budget        # 1 if both budgets are set and equal
///   + availability  # 1 if the candidate window sits inside the subject's availability
///   + travel_types  # one point per shared value
///   + lodgings
///   + languages
///   + interests     # users only
///   + trip_durations # users only
/// )
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub age: u32,
    pub gender: u32,
    pub budget: u32,
    pub availability: u32,
    pub travel_types: u32,
    pub lodgings: u32,
    pub languages: u32,
    pub interests: u32,
    pub trip_durations: u32,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> u32 {
        self.age
            + self.gender
            + self.budget
            + self.availability
            + self.travel_types
            + self.lodgings
            + self.languages
            + self.interests
            + self.trip_durations
    }
}

/// Score a group against the subject profile
///
/// `bracket` is the subject's age bracket, `None` when no birthdate is known.
/// Every term is recomputed here regardless of which eligibility filters the
/// candidate passed; a backfilled group can still earn every point.
pub fn score_group(
    subject: &PreferenceProfile,
    bracket: Option<AgeRange>,
    group: &GroupCandidate,
) -> ScoreBreakdown {
    let age = bracket.is_some_and(|b| group.age_ranges.contains(&b));

    let gender = group.gender == GroupGender::Mixed
        || subject
            .gender
            .is_some_and(|g| g.as_group_gender() == group.gender);

    ScoreBreakdown {
        age: age as u32,
        gender: gender as u32,
        budget: (subject.budget == Some(group.budget)) as u32,
        availability: window_point(subject, Some(group.window())),
        travel_types: overlap_count(&subject.travel_types, &group.travel_types),
        lodgings: overlap_count(&subject.lodgings, &group.lodgings),
        languages: overlap_count(&subject.languages, &group.languages),
        interests: 0,
        trip_durations: 0,
    }
}

/// Score another user's profile against the subject profile
///
/// The budget point needs the subject's budget to be set: two profiles that
/// both leave their budget empty do not earn it. Gender and age carry no
/// points between users.
pub fn score_user(subject: &PreferenceProfile, candidate: &PreferenceProfile) -> ScoreBreakdown {
    let budget = subject.budget.is_some() && subject.budget == candidate.budget;

    ScoreBreakdown {
        age: 0,
        gender: 0,
        budget: budget as u32,
        availability: window_point(subject, candidate.availability()),
        travel_types: overlap_count(&subject.travel_types, &candidate.travel_types),
        lodgings: overlap_count(&subject.lodgings, &candidate.lodgings),
        languages: overlap_count(&subject.languages, &candidate.languages),
        interests: overlap_count(&subject.interests, &candidate.interests),
        trip_durations: overlap_count(&subject.trip_durations, &candidate.trip_durations),
    }
}

/// 1 when the subject has both availability bounds and the candidate window
/// lies within them
#[inline]
fn window_point(subject: &PreferenceProfile, candidate: Option<DateWindow>) -> u32 {
    match (subject.availability(), candidate) {
        (Some(available), Some(window)) => available.contains(&window) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Gender, Interest, Language, Lodging, TravelType, TripDuration};
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeSet;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn create_test_profile(user_id: i64) -> PreferenceProfile {
        PreferenceProfile {
            user_id,
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
            birthdate: None,
            gender: None,
            budget: None,
            available_from: None,
            available_to: None,
            path_picture: None,
            travel_types: BTreeSet::new(),
            lodgings: BTreeSet::new(),
            languages: BTreeSet::new(),
            interests: BTreeSet::new(),
            trip_durations: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    fn create_test_group(gender: GroupGender, budget: Budget) -> GroupCandidate {
        GroupCandidate {
            id: 1,
            title: "Test Group".to_string(),
            location: "Porto".to_string(),
            date_from: date(7, 1),
            date_to: date(7, 10),
            gender,
            budget,
            path_picture: None,
            age_ranges: [AgeRange::Second].into(),
            travel_types: BTreeSet::new(),
            lodgings: BTreeSet::new(),
            languages: BTreeSet::new(),
            members: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_score_scenario() {
        let mut subject = create_test_profile(1);
        subject.travel_types = [TravelType::Hiking, TravelType::Beach].into();
        subject.budget = Some(Budget::Middle);

        let mut group = create_test_group(GroupGender::Mixed, Budget::Middle);
        group.travel_types = [TravelType::Hiking, TravelType::Cultural].into();

        let breakdown = score_group(&subject, Some(AgeRange::Second), &group);

        assert_eq!(breakdown.age, 1);
        assert_eq!(breakdown.gender, 1);
        assert_eq!(breakdown.budget, 1);
        // no availability on the subject, never awarded
        assert_eq!(breakdown.availability, 0);
        assert_eq!(breakdown.travel_types, 1);
        assert_eq!(breakdown.total(), 4);
    }

    #[test]
    fn test_group_score_age_only() {
        let mut subject = create_test_profile(1);
        subject.budget = Some(Budget::Low);
        subject.gender = Some(Gender::Male);

        let group = create_test_group(GroupGender::Female, Budget::Luxury);

        assert_eq!(score_group(&subject, Some(AgeRange::Second), &group).total(), 1);
        assert_eq!(score_group(&subject, Some(AgeRange::Fourth), &group).total(), 0);
        assert_eq!(score_group(&subject, None, &group).total(), 0);
    }

    #[test]
    fn test_group_gender_equality() {
        let mut subject = create_test_profile(1);
        subject.gender = Some(Gender::Female);

        let female = create_test_group(GroupGender::Female, Budget::Low);
        let male = create_test_group(GroupGender::Male, Budget::Low);

        assert_eq!(score_group(&subject, None, &female).gender, 1);
        assert_eq!(score_group(&subject, None, &male).gender, 0);
    }

    #[test]
    fn test_group_availability_containment() {
        let mut subject = create_test_profile(1);
        subject.available_from = Some(date(6, 15));
        subject.available_to = Some(date(7, 10));

        let inside = create_test_group(GroupGender::Male, Budget::Low);
        assert_eq!(score_group(&subject, None, &inside).availability, 1);

        let mut overflowing = create_test_group(GroupGender::Male, Budget::Low);
        overflowing.date_to = date(7, 11);
        assert_eq!(score_group(&subject, None, &overflowing).availability, 0);
    }

    #[test]
    fn test_user_score_counts_all_five_facets() {
        let mut subject = create_test_profile(1);
        subject.budget = Some(Budget::High);
        subject.available_from = Some(date(6, 1));
        subject.available_to = Some(date(8, 31));
        subject.travel_types = [TravelType::Cruise, TravelType::Beach].into();
        subject.lodgings = [Lodging::Hotel].into();
        subject.languages = [Language::French, Language::English].into();
        subject.interests = [Interest::Nature].into();
        subject.trip_durations = [TripDuration::ShortTrip].into();

        let mut candidate = create_test_profile(2);
        candidate.budget = Some(Budget::High);
        candidate.available_from = Some(date(7, 1));
        candidate.available_to = Some(date(7, 20));
        candidate.travel_types = [TravelType::Cruise, TravelType::Beach].into();
        candidate.lodgings = [Lodging::Camping].into();
        candidate.languages = [Language::English, Language::French].into();
        candidate.interests = [Interest::Nature, Interest::Party].into();
        candidate.trip_durations = [TripDuration::ShortTrip].into();

        let breakdown = score_user(&subject, &candidate);

        assert_eq!(breakdown.budget, 1);
        assert_eq!(breakdown.availability, 1);
        assert_eq!(breakdown.travel_types, 2);
        assert_eq!(breakdown.lodgings, 0);
        assert_eq!(breakdown.languages, 2);
        assert_eq!(breakdown.interests, 1);
        assert_eq!(breakdown.trip_durations, 1);
        assert_eq!(breakdown.total(), 8);
    }

    #[test]
    fn test_user_score_missing_budgets_do_not_match() {
        let subject = create_test_profile(1);
        let candidate = create_test_profile(2);

        assert_eq!(score_user(&subject, &candidate).total(), 0);
    }
}
