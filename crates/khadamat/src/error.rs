use crate::api::{ApiError, SignInError};
use crate::config::ConfigError;
use crate::search::ProviderError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Api(ApiError),
    Session(SessionError),
    Storage(StorageError),
    Geocoder(ProviderError),
    Output(serde_json::Error),
    Usage(String),
}

impl AppError {
    /// True when the API refused the stored credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Api(err) if err.is_unauthorized())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Api(err) => write!(f, "api error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Geocoder(err) => write!(f, "geocoder error: {}", err),
            AppError::Output(err) => write!(f, "could not render output: {}", err),
            AppError::Usage(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Api(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Geocoder(err) => Some(err),
            AppError::Output(err) => Some(err),
            AppError::Usage(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        Self::Geocoder(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

impl From<SignInError> for AppError {
    fn from(value: SignInError) -> Self {
        match value {
            SignInError::Api(err) => Self::Api(err),
            SignInError::Session(err) => Self::Session(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_errors_flatten_into_their_layer() {
        let err: AppError = SignInError::Api(ApiError::Rejected {
            status: Some(401),
            message: "Invalid credentials".to_string(),
        })
        .into();
        assert!(matches!(err, AppError::Api(_)));
        assert!(err.is_unauthorized());
        assert!(err.to_string().starts_with("api error: "));
    }
}
