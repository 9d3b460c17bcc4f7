use thiserror::Error;

/// Top-level error type for Disputare.
///
/// Failures talking to the completion service are not represented here: the
/// chat crate has its own error type and absorbs those failures into reply
/// text before they reach a caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DisputareError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown depth: {0}")]
    InvalidDepth(String),
}

impl From<toml::de::Error> for DisputareError {
    fn from(err: toml::de::Error) -> Self {
        DisputareError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DisputareError {
    fn from(err: toml::ser::Error) -> Self {
        DisputareError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DisputareError {
    fn from(err: serde_json::Error) -> Self {
        DisputareError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Disputare operations.
pub type Result<T> = std::result::Result<T, DisputareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DisputareError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = DisputareError::InvalidDepth("profound".to_string());
        assert_eq!(err.to_string(), "Unknown depth: profound");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DisputareError = io_err.into();
        assert!(matches!(err, DisputareError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: DisputareError = err.unwrap_err().into();
        assert!(matches!(err, DisputareError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: DisputareError = err.unwrap_err().into();
        assert!(matches!(err, DisputareError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
