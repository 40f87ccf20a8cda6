use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Need {remaining} more scores")]
    InsufficientData { remaining: usize },

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Invalid distance: {0}")]
    InvalidDistance(f64),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid course rating: {0}")]
    InvalidRating(String),

    #[error("Unknown club: {0}")]
    UnknownClub(String),

    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("No shot in progress")]
    NoShotInProgress,

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] StoreError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
