//! Decode error types
//!
//! Errors raised while turning a response body into typed records.

use thiserror::Error;

/// Errors that can occur while decoding a backend response
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Body was not valid JSON or did not match the expected shape
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// Body parsed, but a field carries a value the client cannot use
    #[error("Invalid {entity} field `{field}`: {reason}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl DecodeError {
    pub(crate) fn invalid(entity: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::InvalidField {
            entity,
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::invalid("party", "id", "must be positive");
        assert_eq!(err.to_string(), "Invalid party field `id`: must be positive");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u64>("nope").unwrap_err();
        let err: DecodeError = json_err.into();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}
