use crate::config_manager::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalogyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid rating: {0} (expected 1-5)")]
    InvalidRating(u8),

    #[error("Request superseded by a newer generation request")]
    Superseded,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalogyError {
    /// True for any failed or rejected request to the analogy service.
    pub fn is_network_or_server(&self) -> bool {
        matches!(
            self,
            AnalogyError::Network(_)
                | AnalogyError::Service { .. }
                | AnalogyError::InvalidResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalogyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_or_server_kind() {
        assert!(AnalogyError::Network("refused".into()).is_network_or_server());
        assert!(AnalogyError::Service {
            status: 500,
            message: "boom".into()
        }
        .is_network_or_server());
        assert!(AnalogyError::InvalidResponse("not json".into()).is_network_or_server());
        assert!(!AnalogyError::InvalidRating(7).is_network_or_server());
        assert!(!AnalogyError::Superseded.is_network_or_server());
    }

    #[test]
    fn test_service_error_display() {
        let err = AnalogyError::Service {
            status: 400,
            message: "No concept provided.".into(),
        };
        assert_eq!(err.to_string(), "Service error (400): No concept provided.");
    }
}
