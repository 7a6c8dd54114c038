use thiserror::Error;

// =============================================================================
// Fill errors
// =============================================================================

/// Rejections raised before a single byte is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillError {
    #[error("Fill of {requested} bytes exceeds buffer capacity of {capacity} bytes")]
    InvalidLength { requested: usize, capacity: usize },

    #[error("Byte length of {count} elements of {element_size} bytes overflows usize")]
    LengthOverflow { count: usize, element_size: usize },

    #[error("Buffer is unbound but {requested} bytes were requested")]
    NullBuffer { requested: usize },

    #[error("Type '{type_name}' is zero-sized and has no bytes to fill")]
    ZeroSizedElement { type_name: &'static str },
}

impl FillError {
    pub fn invalid_length(requested: usize, capacity: usize) -> Self {
        Self::InvalidLength { requested, capacity }
    }

    pub fn length_overflow(count: usize, element_size: usize) -> Self {
        Self::LengthOverflow { count, element_size }
    }

    /// Both an over-capacity request and an overflowing size product are
    /// length errors from the caller's point of view.
    pub fn is_invalid_length(&self) -> bool {
        matches!(self, Self::InvalidLength { .. } | Self::LengthOverflow { .. })
    }
}

// =============================================================================
// Configuration errors
// =============================================================================

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to parse lesson config: {message}")]
    ParseError { message: String },

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Lesson errors
// =============================================================================

#[derive(Error, Debug)]
pub enum LessonError {
    #[error(transparent)]
    Fill(#[from] FillError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Step '{step}' left {remaining} non-zero elements")]
    Mismatch { step: &'static str, remaining: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_length_display() {
        let error = FillError::invalid_length(41, 40);
        let display = format!("{}", error);
        assert!(display.contains("41 bytes"));
        assert!(display.contains("capacity of 40"));
    }

    #[test]
    fn test_overflow_counts_as_invalid_length() {
        assert!(FillError::length_overflow(usize::MAX, 4).is_invalid_length());
        assert!(FillError::invalid_length(2, 1).is_invalid_length());
        assert!(!FillError::NullBuffer { requested: 8 }.is_invalid_length());
    }

    #[test]
    fn test_config_error_from_toml() {
        let err = toml::from_str::<toml::Value>("elements = ").unwrap_err();
        let error = ConfigError::from(err);
        assert!(matches!(error, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_lesson_error_wraps_fill_error() {
        let error: LessonError = FillError::NullBuffer { requested: 4 }.into();
        assert_eq!(format!("{}", error), "Buffer is unbound but 4 bytes were requested");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<FillError>();
        assert_sync::<FillError>();
        assert_send::<LessonError>();
    }
}
