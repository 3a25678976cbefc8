use mindtrack_model::journal::mood::InvalidMood;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("stored value is invalid: {0}")]
    InvalidMood(#[from] InvalidMood),
}
