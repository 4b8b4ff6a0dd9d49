use cs_core::CityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    City(#[from] CityError),
}

impl SimError {
    /// Lift a validation failure into `Config`; anything else stays a
    /// `City` error.
    pub(crate) fn from_validation(err: CityError) -> Self {
        match err {
            CityError::Config(msg) => SimError::Config(msg),
            other => SimError::City(other),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
