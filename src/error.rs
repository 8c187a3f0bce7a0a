//! Error types and handling for teslabridge
//!
//! This module defines the error types used throughout the bridge,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for teslabridge
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Transport failures talking to the vehicle or token API
    #[error("Network error: {message}")]
    Network { message: String },

    /// Token exchange failures
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Malformed or unexpected API responses
    #[error("API error: {message}")]
    Api { message: String },

    /// The vehicle answered a command with a rejection reason
    #[error("Error setting {operation}. {reason}")]
    Rejected { operation: String, reason: String },

    /// A command failed in transport; details are logged at the call site
    #[error("Error setting {operation}.")]
    Command { operation: String },

    /// The request cannot be honored in the current vehicle state
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// A snapshot did not carry a field a handler needs
    #[error("Missing field: {field}")]
    MissingField { field: String },

    /// The (service, characteristic) pair has no handler
    #[error("Unsupported characteristic: {service}/{characteristic}")]
    Unsupported {
        service: String,
        characteristic: String,
    },

    /// HTTP host errors
    #[error("Web server error: {message}")]
    Web { message: String },
}

impl BridgeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        BridgeError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        BridgeError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        BridgeError::Io {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        BridgeError::Network {
            message: message.into(),
        }
    }

    /// Create a new auth error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        BridgeError::Auth {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        BridgeError::Api {
            message: message.into(),
        }
    }

    /// Create a new rejection error carrying the vehicle's reason text
    pub fn rejected<S: Into<String>, R: Into<String>>(operation: S, reason: R) -> Self {
        BridgeError::Rejected {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a new generic command failure
    pub fn command<S: Into<String>>(operation: S) -> Self {
        BridgeError::Command {
            operation: operation.into(),
        }
    }

    /// Create a new precondition error
    pub fn precondition<S: Into<String>>(message: S) -> Self {
        BridgeError::Precondition {
            message: message.into(),
        }
    }

    /// Create a new missing-field error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        BridgeError::MissingField {
            field: field.into(),
        }
    }

    /// Create a new unsupported-characteristic error
    pub fn unsupported<S: Into<String>, C: Into<String>>(service: S, characteristic: C) -> Self {
        BridgeError::Unsupported {
            service: service.into(),
            characteristic: characteristic.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        BridgeError::Web {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(err: serde_yaml::Error) -> Self {
        BridgeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        BridgeError::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BridgeError::config("test config error");
        assert!(matches!(err, BridgeError::Config { .. }));

        let err = BridgeError::rejected("horn state", "vehicle_unavailable");
        assert!(matches!(err, BridgeError::Rejected { .. }));

        let err = BridgeError::validation("field", "test validation error");
        assert!(matches!(err, BridgeError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = BridgeError::config("test error");
        assert_eq!(err.to_string(), "Configuration error: test error");

        let err = BridgeError::rejected("climate state", "user_present");
        assert_eq!(err.to_string(), "Error setting climate state. user_present");

        let err = BridgeError::command("horn state");
        assert_eq!(err.to_string(), "Error setting horn state.");
    }
}
