//! Error types for the gallery

use thiserror::Error;

/// The main error type for gallery operations
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Unknown resource handle: {0}")]
    UnknownHandle(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

impl From<toml::de::Error> for GalleryError {
    fn from(err: toml::de::Error) -> Self {
        GalleryError::TomlParseError(err.to_string())
    }
}

impl GalleryError {
    /// Shorthand for an `InvalidConfig` error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GalleryError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_converts() {
        let err: GalleryError = toml::from_str::<toml::Table>("a = ").unwrap_err().into();
        assert!(matches!(err, GalleryError::TomlParseError(_)));
    }

    #[test]
    fn test_invalid_message() {
        let err = GalleryError::invalid("bullets.pool_size", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for bullets.pool_size: must be at least 1"
        );
    }
}
