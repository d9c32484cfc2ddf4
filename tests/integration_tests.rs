// Integration tests for Travel Match

use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeSet;
use travel_match::core::search::{search_groups, GroupSearch, Pagination};
use travel_match::core::{FilterBuilder, FilterPredicate, Matcher, MatchingConfig, ScalarFilter};
use travel_match::models::{
    AgeRange, Budget, Gender, GroupCandidate, GroupGender, Language, Lodging, PreferenceProfile, TravelType,
    TripDuration,
};
use travel_match::services::{CandidateStore, FetchQuery, InMemoryStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

fn create_test_profile(user_id: i64, gender: Gender, durations: &[TripDuration]) -> PreferenceProfile {
    PreferenceProfile {
        user_id,
        firstname: format!("Traveler{}", user_id),
        lastname: "Test".to_string(),
        birthdate: NaiveDate::from_ymd_opt(1990, 5, 20),
        gender: Some(gender),
        budget: Some(if user_id % 2 == 0 { Budget::Low } else { Budget::High }),
        available_from: None,
        available_to: None,
        path_picture: Some(format!("/avatars/{}.png", user_id)),
        travel_types: [TravelType::ALL[user_id as usize % TravelType::ALL.len()]].into(),
        lodgings: BTreeSet::new(),
        languages: [Language::English].into(),
        interests: BTreeSet::new(),
        trip_durations: durations.iter().copied().collect(),
        created_at: Utc::now() - Duration::hours(user_id),
    }
}

fn create_test_group(id: i64, gender: GroupGender, travel_types: &[TravelType]) -> GroupCandidate {
    GroupCandidate {
        id,
        title: format!("Trip {}", id),
        location: if id % 2 == 0 { "Bergen, Norway" } else { "Cusco, Peru" }.to_string(),
        date_from: today() + Duration::days(30 + id),
        date_to: today() + Duration::days(40 + id),
        gender,
        budget: if id % 3 == 0 { Budget::High } else { Budget::Middle },
        path_picture: None,
        age_ranges: [AgeRange::Second, AgeRange::Third].into(),
        travel_types: travel_types.iter().copied().collect(),
        lodgings: [Lodging::Hotel].into(),
        languages: BTreeSet::new(),
        members: vec![],
        created_at: Utc::now() - Duration::hours(id),
    }
}

fn diverse_groups(store: &InMemoryStore, count: i64) {
    for id in 1..=count {
        let gender = match id % 3 {
            0 => GroupGender::Mixed,
            1 => GroupGender::Male,
            _ => GroupGender::Female,
        };
        let travel_types = if id % 2 == 0 {
            vec![TravelType::Hiking, TravelType::Cultural]
        } else {
            vec![TravelType::Beach]
        };
        store.insert_group(create_test_group(id, gender, &travel_types));
    }
}

#[test]
fn test_integration_backfill_when_nothing_is_eligible() {
    tokio_test::block_on(async {
        let matcher = Matcher::with_defaults();

        for population in [4, 15] {
            let store = InMemoryStore::new();
            store.insert_profile(create_test_profile(1, Gender::Male, &[]));
            for id in 1..=population {
                store.insert_group(create_test_group(id, GroupGender::Female, &[]));
            }

            let cards = matcher.match_groups_on(&store, 1, today()).await.unwrap();
            assert_eq!(cards.len(), population.min(10) as usize);
        }
    });
}

#[test]
fn test_integration_user_backfill_skips_subject() {
    tokio_test::block_on(async {
        let store = InMemoryStore::new();
        store.insert_profile(create_test_profile(1, Gender::Female, &[TripDuration::LongTrip]));
        for id in 2..=7 {
            store.insert_profile(create_test_profile(id, Gender::Male, &[TripDuration::ShortTrip]));
        }

        let avatars = Matcher::with_defaults().match_users(&store, 1).await.unwrap();

        assert_eq!(avatars.len(), 6);
        assert!(avatars.iter().all(|a| a.user_id != 1));
    });
}

#[test]
fn test_integration_results_sorted_by_score() {
    tokio_test::block_on(async {
        let store = InMemoryStore::new();
        let mut subject = create_test_profile(1, Gender::Other, &[]);
        subject.travel_types = [TravelType::Hiking, TravelType::Cultural].into();
        subject.budget = Some(Budget::Middle);
        store.insert_profile(subject.clone());
        diverse_groups(&store, 20);

        let matcher = Matcher::with_defaults();
        let cards = matcher.match_groups_on(&store, 1, today()).await.unwrap();
        assert_eq!(cards.len(), 10);

        // recompute the scores of what came back
        let groups = store.fetch_groups(&FetchQuery::latest(100)).await.unwrap();
        let bracket = Some(AgeRange::for_birthdate(NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(), today()));
        let scores: Vec<u32> = cards
            .iter()
            .map(|card| {
                let group = groups.iter().find(|g| g.id == card.id).unwrap();
                travel_match::core::score_group(&subject, bracket, group).total()
            })
            .collect();

        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1], "Scores not sorted: {:?}", scores);
        }
    });
}

#[test]
fn test_integration_matching_is_idempotent() {
    tokio_test::block_on(async {
        let store = InMemoryStore::new();
        store.insert_profile(create_test_profile(1, Gender::Female, &[]));
        diverse_groups(&store, 25);

        let matcher = Matcher::with_defaults();
        let first = matcher.match_groups_on(&store, 1, today()).await.unwrap();
        let second = matcher.match_groups_on(&store, 1, today()).await.unwrap();

        assert_eq!(first, second);
    });
}

#[test]
fn test_integration_backfill_can_repeat_primary_when_configured() {
    tokio_test::block_on(async {
        let store = InMemoryStore::new();
        store.insert_profile(create_test_profile(1, Gender::Female, &[]));
        // the two newest groups are the only eligible ones
        store.insert_group(create_test_group(1, GroupGender::Female, &[]));
        store.insert_group(create_test_group(2, GroupGender::Female, &[]));
        for id in 3..=6 {
            store.insert_group(create_test_group(id, GroupGender::Male, &[]));
        }

        let matcher = Matcher::new(MatchingConfig {
            pool_size: 10,
            exclude_primary_from_backfill: false,
        });
        let cards = matcher.match_groups_on(&store, 1, today()).await.unwrap();

        // 2 primary + the 6 most recent groups, primary ids included again
        assert_eq!(cards.len(), 8);
        assert_eq!(cards.iter().filter(|c| c.id == 1).count(), 2);
    });
}

#[test]
fn test_integration_predicate_survives_serialization() {
    tokio_test::block_on(async {
        let store = InMemoryStore::new();
        diverse_groups(&store, 12);

        let predicate = FilterBuilder::new()
            .facet(&[TravelType::Hiking])
            .scalar(ScalarFilter::LocationContains("Norway".to_string()))
            .scalar(ScalarFilter::BudgetIs(Budget::Middle))
            .build();

        let json = serde_json::to_string(&predicate).unwrap();
        let restored: FilterPredicate = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, predicate);

        let groups = store
            .fetch_groups(&FetchQuery::new(restored).limit(100))
            .await
            .unwrap();
        let mut ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
        ids.sort();

        // even ids are hiking in Norway, multiples of 3 are HIGH budget
        assert_eq!(ids, vec![2, 4, 8, 10]);
    });
}

#[test]
fn test_integration_search_pages_through_everything() {
    tokio_test::block_on(async {
        let store = InMemoryStore::new();
        diverse_groups(&store, 23);

        let criteria = GroupSearch {
            lodgings: vec![Lodging::Hotel],
            ..Default::default()
        };

        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let result = search_groups(&store, &criteria, Pagination::new(page, 5)).await.unwrap();
            assert_eq!(result.total, 23);
            assert_eq!(result.total_pages, 5);
            seen.extend(result.items.iter().map(|g| g.id));
            if !result.has_next_page {
                break;
            }
            page += 1;
        }

        assert_eq!(page, 5);
        assert_eq!(seen, (1..=23).collect::<Vec<i64>>());
    });
}
