//! Error types for catalog fetches and configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used by the controllers to pick a terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, transport, non-2xx or parse failure
    FetchFailure,
    /// The response was valid but did not contain the requested record
    NotFound,
}

/// Failure of a single request against the metadata API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record not found")]
    NotFound,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::FetchFailure,
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(404) => ApiError::NotFound,
            ureq::Error::StatusCode(code) => ApiError::Status(code),
            ureq::Error::Timeout(_) => ApiError::Timeout,
            other => ApiError::Transport(other.to_string()),
        }
    }
}

/// Failure to read the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kind() {
        assert_eq!(ApiError::NotFound.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_fetch_failure_kinds() {
        assert_eq!(ApiError::Timeout.kind(), ErrorKind::FetchFailure);
        assert_eq!(ApiError::Status(500).kind(), ErrorKind::FetchFailure);
        assert_eq!(ApiError::Transport("reset".into()).kind(), ErrorKind::FetchFailure);

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::from(parse).kind(), ErrorKind::FetchFailure);
    }

    #[test]
    fn test_status_404_maps_to_not_found() {
        let err = ApiError::from(ureq::Error::StatusCode(404));
        assert!(matches!(err, ApiError::NotFound));

        let err = ApiError::from(ureq::Error::StatusCode(503));
        assert!(matches!(err, ApiError::Status(503)));
        assert_eq!(err.to_string(), "HTTP error: 503");
    }

    #[test]
    fn test_ureq_timeout_maps_to_timeout() {
        let err = ApiError::from(ureq::Error::Timeout(ureq::Timeout::Global));
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(err.kind(), ErrorKind::FetchFailure);

        let err = ApiError::from(ureq::Error::Timeout(ureq::Timeout::Connect));
        assert!(matches!(err, ApiError::Timeout));
    }
}
