//! Configuration error types.

use cavern_storage::StorageError;
use thiserror::Error;

/// Configuration operation result type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration not found.
    #[error("Configuration not found: {key}")]
    NotFound {
        /// The configuration key that was not found.
        key: String,
    },

    /// Validation error.
    #[error("Validation error: {field}: {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// Validation error message.
        message: String,
    },

    /// Multiple validation errors.
    #[error("Multiple validation errors: {0:?}")]
    MultipleValidationErrors(Vec<ValidationError>),

    /// Registry state conflict (e.g., poisoned lock).
    #[error("Configuration conflict: {0}")]
    Conflict(String),

    /// File extension does not name a supported format.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Building constraints from a configuration failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ConfigError::Deserialization(err.to_string())
        } else {
            ConfigError::Serialization(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Deserialization(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> ConfigResult<()> {
        let mut errors = self.validate();
        match errors.len() {
            0 => Ok(()),
            1 => {
                let err = errors.remove(0);
                Err(ConfigError::Validation {
                    field: err.field,
                    message: err.message,
                })
            }
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(Vec<ValidationError>);

    impl Validate for Always {
        fn validate(&self) -> Vec<ValidationError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_validate_or_error() {
        assert!(Always(vec![]).validate_or_error().is_ok());

        let single = Always(vec![ValidationError::new("name", "must not be empty")]);
        assert!(matches!(
            single.validate_or_error(),
            Err(ConfigError::Validation { ref field, .. }) if field == "name"
        ));

        let many = Always(vec![
            ValidationError::new("a", "bad"),
            ValidationError::new("b", "bad"),
        ]);
        assert!(matches!(
            many.validate_or_error(),
            Err(ConfigError::MultipleValidationErrors(ref e)) if e.len() == 2
        ));
    }

    #[test]
    fn test_json_error_conversion() {
        let err: ConfigError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, ConfigError::Deserialization(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ValidationError::new("ratchets", "too few points").to_string(),
            "ratchets: too few points"
        );
    }
}
