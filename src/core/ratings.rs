use serde::{Deserialize, Serialize};

/// Average of the ratings a user has received
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// `None` when the user has not been rated yet
    pub average_rating: Option<f64>,
    pub ratings: u64,
}

impl RatingSummary {
    pub fn from_values(values: &[i16]) -> Self {
        let count = values.len() as u64;
        let average_rating = if count > 0 {
            let sum: i64 = values.iter().map(|v| *v as i64).sum();
            Some(sum as f64 / count as f64)
        } else {
            None
        };

        Self {
            average_rating,
            ratings: count,
        }
    }
}
