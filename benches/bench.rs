// Criterion benchmarks for Travel Match

use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeSet;
use travel_match::core::{FilterBuilder, Matcher, ScalarFilter};
use travel_match::models::{
    AgeRange, Budget, Gender, GroupCandidate, GroupGender, Language, Lodging, PreferenceProfile, TravelType,
};

fn create_group(id: usize) -> GroupCandidate {
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + Duration::days((id % 60) as i64);
    GroupCandidate {
        id: id as i64,
        title: format!("Trip {}", id),
        location: if id % 2 == 0 { "Bergen, Norway" } else { "Cusco, Peru" }.to_string(),
        date_from: start,
        date_to: start + Duration::days(7),
        gender: if id % 3 == 0 { GroupGender::Mixed } else { GroupGender::Female },
        budget: Budget::ALL[id % Budget::ALL.len()],
        path_picture: None,
        age_ranges: [AgeRange::ALL[id % AgeRange::ALL.len()]].into(),
        travel_types: [
            TravelType::ALL[id % TravelType::ALL.len()],
            TravelType::ALL[(id + 3) % TravelType::ALL.len()],
        ]
        .into(),
        lodgings: [Lodging::ALL[id % Lodging::ALL.len()]].into(),
        languages: [Language::ALL[id % Language::ALL.len()]].into(),
        members: vec![],
        created_at: Utc::now() - Duration::minutes(id as i64),
    }
}

fn create_subject() -> PreferenceProfile {
    PreferenceProfile {
        user_id: 0,
        firstname: "Bench".to_string(),
        lastname: "Subject".to_string(),
        birthdate: NaiveDate::from_ymd_opt(1992, 9, 9),
        gender: Some(Gender::Female),
        budget: Some(Budget::Middle),
        available_from: NaiveDate::from_ymd_opt(2025, 6, 1),
        available_to: NaiveDate::from_ymd_opt(2025, 9, 1),
        path_picture: None,
        travel_types: [TravelType::Hiking, TravelType::Cultural, TravelType::Beach].into(),
        lodgings: [Lodging::Hotel, Lodging::Camping].into(),
        languages: [Language::English, Language::Spanish].into(),
        interests: BTreeSet::new(),
        trip_durations: BTreeSet::new(),
        created_at: Utc::now(),
    }
}

fn bench_build_predicate(c: &mut Criterion) {
    c.bench_function("build_predicate", |b| {
        b.iter(|| {
            FilterBuilder::new()
                .facet(black_box(&[TravelType::Hiking, TravelType::Beach, TravelType::Cruise]))
                .facet(black_box(&[Lodging::Hotel, Lodging::Airbnb]))
                .facet(black_box(&[Language::English]))
                .scalar(ScalarFilter::LocationContains("Norway".to_string()))
                .scalar(ScalarFilter::BudgetIs(Budget::Middle))
                .build()
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_defaults();
    let subject = create_subject();
    let bracket = Some(AgeRange::Second);

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<GroupCandidate> = (0..*candidate_count).map(create_group).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_groups", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| matcher.rank_groups(black_box(&subject), bracket, black_box(candidates.clone())));
            },
        );
    }

    group.finish();
}

fn bench_predicate_evaluation(c: &mut Criterion) {
    let candidates: Vec<GroupCandidate> = (0..1000).map(create_group).collect();
    let predicate = FilterBuilder::new()
        .facet(&[TravelType::Hiking, TravelType::Beach])
        .facet(&[AgeRange::Second])
        .scalar(ScalarFilter::GroupGenderIs(GroupGender::Female))
        .build();

    c.bench_function("predicate_evaluation_1000_groups", |b| {
        b.iter(|| {
            let matched = candidates.iter().filter(|g| predicate.matches(*g)).count();
            black_box(matched)
        });
    });
}

criterion_group!(benches, bench_build_predicate, bench_ranking, bench_predicate_evaluation);

criterion_main!(benches);
