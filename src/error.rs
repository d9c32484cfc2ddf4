use crate::models::{UnknownVariant, UserId};
use crate::services::StoreError;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by matching and search
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Profile not found for user {0}")]
    NotFound(UserId),

    #[error("dateTo ({to}) must be later than dateFrom ({from})")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] UnknownVariant),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl MatchError {
    /// HTTP status the error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            MatchError::NotFound(_) => 404,
            MatchError::InvalidRange { .. } | MatchError::InvalidFilter(_) => 400,
            MatchError::Persistence(_) => 500,
        }
    }

    /// Short machine-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MatchError::NotFound(_) => "not_found",
            MatchError::InvalidRange { .. } => "invalid_range",
            MatchError::InvalidFilter(_) => "invalid_filter",
            MatchError::Persistence(_) => "persistence_failure",
        }
    }
}
