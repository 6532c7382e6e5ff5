//! Error types and handling for the `TripTime` application

use thiserror::Error;

/// Main error type for the `TripTime` application
#[derive(Error, Debug)]
pub enum TripTimeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Language-model service errors
    #[error("Language model error: {message}")]
    Llm { message: String },

    /// Maps service errors (geocoding, directions, nearby places)
    #[error("Maps service error: {message}")]
    Maps { message: String },

    /// The model reply could not be parsed into a structured query
    #[error("Interpretation error: {message}")]
    Interpretation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TripTimeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new language-model error
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// Create a new maps service error
    pub fn maps<S: Into<String>>(message: S) -> Self {
        Self::Maps {
            message: message.into(),
        }
    }

    /// Create a new interpretation error
    pub fn interpretation<S: Into<String>>(message: S) -> Self {
        Self::Interpretation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripTimeError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripTimeError::Llm { .. } => {
                "Unable to reach the language model service. Please try again later.".to_string()
            }
            TripTimeError::Maps { .. } => {
                "Unable to reach the maps service. Please check your internet connection."
                    .to_string()
            }
            TripTimeError::Interpretation { .. } => {
                "I'm sorry, I couldn't understand the query. Please try rephrasing it.".to_string()
            }
            TripTimeError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            TripTimeError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TripTimeError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TripTimeError::config("missing API key");
        assert!(matches!(config_err, TripTimeError::Config { .. }));

        let maps_err = TripTimeError::maps("connection failed");
        assert!(matches!(maps_err, TripTimeError::Maps { .. }));

        let interp_err = TripTimeError::interpretation("reply was not JSON");
        assert!(matches!(interp_err, TripTimeError::Interpretation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = TripTimeError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let maps_err = TripTimeError::maps("test");
        assert!(maps_err.user_message().contains("Unable to reach"));

        let interp_err = TripTimeError::interpretation("test");
        assert!(interp_err.user_message().contains("rephrasing"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let trip_err: TripTimeError = io_err.into();
        assert!(matches!(trip_err, TripTimeError::Io { .. }));
    }
}
