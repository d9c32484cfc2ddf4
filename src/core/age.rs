use crate::models::AgeRange;
use chrono::{Datelike, NaiveDate};

/// Whole years elapsed between `birthdate` and `today`
///
/// One year is subtracted when today's month/day precedes the birth
/// month/day, so a birthday counts only once it has been reached.
#[inline]
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

impl AgeRange {
    /// Bucket for an age in whole years. Upper bounds are inclusive.
    pub fn for_age(age: i32) -> AgeRange {
        match age {
            i32::MIN..=25 => AgeRange::First,
            26..=35 => AgeRange::Second,
            36..=50 => AgeRange::Third,
            _ => AgeRange::Fourth,
        }
    }

    pub fn for_birthdate(birthdate: NaiveDate, today: NaiveDate) -> AgeRange {
        AgeRange::for_age(age_on(birthdate, today))
    }
}
