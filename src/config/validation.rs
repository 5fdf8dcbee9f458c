use std::net::SocketAddr;

use crate::config::models::ReceiverConfig;

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Receiver configuration validator
pub struct ReceiverConfigValidator;

impl ReceiverConfigValidator {
    /// Validate the entire receiver configuration
    pub fn validate(config: &ReceiverConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_endpoint(&config.endpoint) {
            errors.push(e);
        }

        if config.name.trim().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "name".to_string(),
            });
        }

        if config.server_timeout_secs == 0 {
            errors.push(ValidationError::InvalidField {
                field: "server_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if config.max_body_bytes == 0 {
            errors.push(ValidationError::InvalidField {
                field: "max_body_bytes".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(ValidationError::ValidationFailed { message })
        }
    }

    /// Validate the bind endpoint
    pub fn validate_endpoint(endpoint: &str) -> ValidationResult<()> {
        if endpoint.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "endpoint".to_string(),
            });
        }

        endpoint.parse::<SocketAddr>().map_err(|e| {
            ValidationError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        let config = ReceiverConfig {
            endpoint: "127.0.0.1:9943".to_string(),
            ..ReceiverConfig::default()
        };
        assert!(ReceiverConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let config = ReceiverConfig {
            endpoint: String::new(),
            ..ReceiverConfig::default()
        };
        let err = ReceiverConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn test_unparseable_endpoint_rejected() {
        let err = ReceiverConfigValidator::validate_endpoint("not-an-address").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let config = ReceiverConfig {
            endpoint: "127.0.0.1:9943".to_string(),
            name: "  ".to_string(),
            ..ReceiverConfig::default()
        };
        assert!(ReceiverConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_zero_body_limit_rejected() {
        let config = ReceiverConfig {
            endpoint: "127.0.0.1:9943".to_string(),
            max_body_bytes: 0,
            ..ReceiverConfig::default()
        };
        assert!(ReceiverConfigValidator::validate(&config).is_err());
    }
}
