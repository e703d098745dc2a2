use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("loan amount and term must be positive")]
    InvalidAmount,
    #[error("invalid birth date")]
    InvalidBirthDate,
    #[error("simulation not found for id: {0}")]
    NotFound(String),
    #[error("payment calculation overflowed")]
    ArithmeticOverflow,
    #[error("persistence error: {0}")]
    Persistence(Box<dyn std::error::Error + Send + Sync>),
    #[error("notification error: {0}")]
    Notification(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl SimulationError {
    /// Wraps any storage backend error as an opaque persistence failure.
    pub fn persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Persistence(Box::new(err))
    }

    /// Whether the error was caused by the caller's input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidAmount | Self::InvalidBirthDate)
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for SimulationError {
    fn from(err: rocksdb::Error) -> Self {
        Self::persistence(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            SimulationError::InvalidAmount.to_string(),
            "loan amount and term must be positive"
        );
        assert_eq!(
            SimulationError::InvalidBirthDate.to_string(),
            "invalid birth date"
        );
        assert_eq!(
            SimulationError::NotFound("abc".into()).to_string(),
            "simulation not found for id: abc"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(SimulationError::InvalidAmount.is_validation());
        assert!(SimulationError::InvalidBirthDate.is_validation());
        assert!(!SimulationError::NotFound("x".into()).is_validation());
        assert!(!SimulationError::persistence(std::io::Error::other("disk")).is_validation());
    }
}
