use crate::types::RecordRef;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeoError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream fetch failed: {message}")]
    Fetch { status: Option<u16>, message: String },

    #[error("Malformed record ({record}): missing or invalid {field}")]
    MalformedRecord { record: RecordRef, field: &'static str },

    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NeoError {
    /// HTTP status used when this error reaches the server boundary
    pub fn status_code(&self) -> u16 {
        match self {
            NeoError::Validation(_) => 400,
            NeoError::NotFound(_) => 404,
            NeoError::Fetch { status: Some(code), .. } => *code,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, NeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(NeoError::Validation("x".into()).status_code(), 400);
        assert_eq!(NeoError::NotFound("x".into()).status_code(), 404);
        let upstream = NeoError::Fetch { status: Some(503), message: "down".into() };
        assert_eq!(upstream.status_code(), 503);
        let transport = NeoError::Fetch { status: None, message: "timeout".into() };
        assert_eq!(transport.status_code(), 500);
        assert_eq!(NeoError::MalformedFeed("x".into()).status_code(), 500);
    }

    #[test]
    fn test_malformed_record_message_names_record_and_field() {
        let err = NeoError::MalformedRecord {
            record: RecordRef::Id("2465633".into()),
            field: "estimated_diameter",
        };
        assert_eq!(
            err.to_string(),
            "Malformed record (id 2465633): missing or invalid estimated_diameter"
        );
    }
}
