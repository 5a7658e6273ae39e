//! Error types for API access

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),
}

impl Error {
    /// Text for an inline dialog error or the status bar
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::NotFound(message) | Error::Validation(message) => message.clone(),
            Error::Http(e) if e.is_timeout() => "Request timed out".to_string(),
            Error::Http(e) if e.is_connect() => "Could not reach the tracker API".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<taskboard_core::Error> for Error {
    fn from(err: taskboard_core::Error) -> Self {
        match err {
            taskboard_core::Error::Json(e) => Error::Json(e),
            other => Error::Validation(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_validation_keeps_message() {
        let err: Error = taskboard_core::Error::Validation("Name and Key are required".into()).into();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.user_message(), "Name and Key are required");
    }

    #[test]
    fn test_api_message_is_detail() {
        let err = Error::Api {
            status: 400,
            message: "Project key 'DTB' already exists".to_string(),
        };
        assert_eq!(err.user_message(), "Project key 'DTB' already exists");
        assert_eq!(
            err.to_string(),
            "API error (400): Project key 'DTB' already exists"
        );
    }
}
