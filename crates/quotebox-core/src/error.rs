use thiserror::Error;

/// All the ways things can go wrong in quotebox
///
/// None of these are fatal to a session. Fetch failures degrade to a
/// placeholder message and storage failures leave the display as it was.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch quotes: {0}")]
    FetchError(String),

    #[error("Storage operation failed: {0}")]
    StorageError(String),

    #[error("Unknown action: {0}")]
    UnknownIntent(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<quotebox_store::StoreError> for Error {
    fn from(err: quotebox_store::StoreError) -> Self {
        Error::StorageError(err.to_string())
    }
}

impl From<quotebox_api::ZenQuotesError> for Error {
    fn from(err: quotebox_api::ZenQuotesError) -> Self {
        Error::FetchError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebox_api::ZenQuotesError;

    #[test]
    fn test_throttled_response_is_a_fetch_error() {
        let status = "Status 429 Too Many Requests: ".to_string();
        let err: Error = ZenQuotesError::RequestFailed(status).into();
        match err {
            Error::FetchError(msg) => assert!(msg.contains("429")),
            other => panic!("expected FetchError, got {:?}", other),
        }
    }

    #[test]
    fn test_store_error_is_a_storage_error() {
        let err: Error = quotebox_store::StoreError::LockPoisoned.into();
        assert!(matches!(err, Error::StorageError(_)));
    }
}
