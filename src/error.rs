use std::fmt;
use std::io;

/// Errors that can occur in the policy guard crate.
///
/// None of these are fatal to a running surface. Storage failures are
/// recovered inside [`ZoomController`](crate::ZoomController) and only
/// reach callers that talk to a [`PreferenceStore`](crate::PreferenceStore)
/// directly.
#[derive(Debug)]
pub enum Error {
    /// A preference store failed
    Store(StoreError),
    /// A guard configuration value was rejected
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "Preference store error: {}", e),
            Error::Config(e) => write!(f, "Invalid guard configuration: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => Some(e),
            Error::Config(e) => Some(e),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

/// A failure reading from or writing to a preference store.
#[derive(Debug)]
pub enum StoreError {
    /// Storage is disabled or otherwise unreachable
    Unavailable,
    /// The backing file could not be read or written
    Io(io::Error),
    /// The stored document could not be encoded or decoded
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "storage unavailable"),
            StoreError::Io(e) => write!(f, "i/o failure: {}", e),
            StoreError::Serialization(msg) => write!(f, "serialization failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// A rejected [`GuardConfig`](crate::GuardConfig) value.
#[derive(Debug, PartialEq)]
pub struct ConfigError {
    /// The offending field
    pub field: &'static str,
    /// Human-readable message explaining the rejection
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        assert_eq!(StoreError::Unavailable.to_string(), "storage unavailable");
        let err = StoreError::Serialization("bad json".into());
        assert_eq!(err.to_string(), "serialization failure: bad json");
    }

    #[test]
    fn config_error_wraps_into_crate_error() {
        let err: Error = ConfigError::new("exempt_marker", "must not be empty").into();
        assert_eq!(
            err.to_string(),
            "Invalid guard configuration: exempt_marker: must not be empty"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn io_error_converts_to_store_error() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
