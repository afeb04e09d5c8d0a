/// Convenience result type used across deskpet.
pub type PetResult<T> = Result<T, PetError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PetError {
    /// Invalid caller-provided data (malformed identifiers, bad frame sequences).
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset exists but could not be decoded into frames.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rejected configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PetError {
    /// Build a [`PetError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PetError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PetError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
