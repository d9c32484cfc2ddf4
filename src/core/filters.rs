use crate::core::facets::{Facet, FacetKind, FacetValue};
use crate::models::{Budget, Gender, GroupCandidate, GroupGender, PreferenceProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Predicate tree consumed by the candidate store
///
/// Built by [`build_predicate`] as a conjunction of per-facet disjunctions
/// plus scalar clauses. `All(vec![])` matches everything, `Any(vec![])`
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterPredicate {
    All(Vec<FilterPredicate>),
    Any(Vec<FilterPredicate>),
    /// The candidate has at least one related row holding this value
    Has(FacetValue),
    Scalar(ScalarFilter),
}

/// Single-row constraints ANDed next to the facet clauses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarFilter {
    /// Case-sensitive substring of the group location
    LocationContains(String),
    /// Candidate window starts on or after the date
    WindowStartsOnOrAfter(NaiveDate),
    /// Candidate window ends on or before the date
    WindowEndsOnOrBefore(NaiveDate),
    BudgetIs(Budget),
    GroupGenderIs(GroupGender),
    ProfileGenderIs(Gender),
}

impl FilterPredicate {
    pub fn match_all() -> Self {
        FilterPredicate::All(Vec::new())
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, FilterPredicate::All(clauses) if clauses.is_empty())
    }

    /// Evaluate the tree against a candidate held in memory
    pub fn matches<T: Filterable + ?Sized>(&self, candidate: &T) -> bool {
        match self {
            FilterPredicate::All(clauses) => clauses.iter().all(|c| c.matches(candidate)),
            FilterPredicate::Any(clauses) => clauses.iter().any(|c| c.matches(candidate)),
            FilterPredicate::Has(value) => candidate.has_facet_value(value),
            FilterPredicate::Scalar(filter) => candidate.matches_scalar(filter),
        }
    }
}

/// Anything a [`FilterPredicate`] can be evaluated against
pub trait Filterable {
    fn has_facet_value(&self, value: &FacetValue) -> bool;

    fn matches_scalar(&self, filter: &ScalarFilter) -> bool;
}

impl Filterable for GroupCandidate {
    fn has_facet_value(&self, value: &FacetValue) -> bool {
        match value {
            FacetValue::TravelType(v) => self.travel_types.contains(v),
            FacetValue::Lodging(v) => self.lodgings.contains(v),
            FacetValue::Language(v) => self.languages.contains(v),
            FacetValue::AgeRange(v) => self.age_ranges.contains(v),
            FacetValue::Interest(_) | FacetValue::TripDuration(_) => false,
        }
    }

    fn matches_scalar(&self, filter: &ScalarFilter) -> bool {
        match filter {
            ScalarFilter::LocationContains(needle) => self.location.contains(needle.as_str()),
            ScalarFilter::WindowStartsOnOrAfter(date) => self.date_from >= *date,
            ScalarFilter::WindowEndsOnOrBefore(date) => self.date_to <= *date,
            ScalarFilter::BudgetIs(budget) => self.budget == *budget,
            ScalarFilter::GroupGenderIs(gender) => self.gender == *gender,
            ScalarFilter::ProfileGenderIs(_) => false,
        }
    }
}

impl Filterable for PreferenceProfile {
    fn has_facet_value(&self, value: &FacetValue) -> bool {
        match value {
            FacetValue::TravelType(v) => self.travel_types.contains(v),
            FacetValue::Lodging(v) => self.lodgings.contains(v),
            FacetValue::Language(v) => self.languages.contains(v),
            FacetValue::Interest(v) => self.interests.contains(v),
            FacetValue::TripDuration(v) => self.trip_durations.contains(v),
            FacetValue::AgeRange(_) => false,
        }
    }

    fn matches_scalar(&self, filter: &ScalarFilter) -> bool {
        match filter {
            ScalarFilter::LocationContains(_) | ScalarFilter::GroupGenderIs(_) => false,
            ScalarFilter::WindowStartsOnOrAfter(date) => {
                self.available_from.is_some_and(|from| from >= *date)
            }
            ScalarFilter::WindowEndsOnOrBefore(date) => {
                self.available_to.is_some_and(|to| to <= *date)
            }
            ScalarFilter::BudgetIs(budget) => self.budget == Some(*budget),
            ScalarFilter::ProfileGenderIs(gender) => self.gender == Some(*gender),
        }
    }
}

/// Accepted values for one facet, in caller order without duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSelection {
    kind: FacetKind,
    values: Vec<FacetValue>,
}

impl FacetSelection {
    pub fn of<T: Facet>(values: &[T]) -> Self {
        let mut selected: Vec<FacetValue> = Vec::with_capacity(values.len());
        for value in values {
            let value = value.into_value();
            if !selected.contains(&value) {
                selected.push(value);
            }
        }

        Self {
            kind: T::KIND,
            values: selected,
        }
    }

    pub fn kind(&self) -> FacetKind {
        self.kind
    }

    pub fn values(&self) -> &[FacetValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build the predicate for a set of facet selections and scalar filters
///
/// Each non-empty selection becomes an OR over existential checks, one per
/// accepted value. Empty selections add nothing. All clauses are ANDed, so
/// no input at all yields the match-everything predicate.
///
/// Date bounds must already have been validated by the caller.
pub fn build_predicate(facets: &[FacetSelection], scalars: &[ScalarFilter]) -> FilterPredicate {
    let mut clauses: Vec<FilterPredicate> = facets
        .iter()
        .filter(|selection| !selection.is_empty())
        .map(|selection| {
            FilterPredicate::Any(
                selection
                    .values
                    .iter()
                    .copied()
                    .map(FilterPredicate::Has)
                    .collect(),
            )
        })
        .collect();

    clauses.extend(scalars.iter().cloned().map(FilterPredicate::Scalar));

    FilterPredicate::All(clauses)
}

/// Fluent front-end over [`build_predicate`]
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    facets: Vec<FacetSelection>,
    scalars: Vec<ScalarFilter>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facet<T: Facet>(mut self, values: &[T]) -> Self {
        self.facets.push(FacetSelection::of(values));
        self
    }

    pub fn scalar(mut self, filter: ScalarFilter) -> Self {
        self.scalars.push(filter);
        self
    }

    /// Add a scalar filter only when a value is present
    pub fn scalar_opt<V>(self, value: Option<V>, filter: impl FnOnce(V) -> ScalarFilter) -> Self {
        match value {
            Some(value) => self.scalar(filter(value)),
            None => self,
        }
    }

    pub fn build(&self) -> FilterPredicate {
        build_predicate(&self.facets, &self.scalars)
    }
}
