//! Error taxonomy for the hosted checkout gateway
//!
//! Every variant is terminal for the request that produced it: nothing here is
//! retried automatically and no payment record exists when one is returned.

use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// A required merchant credential is missing or blank.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Order data rejected locally, before anything is sent to the processor.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// A correlation token from the return request does not match the stored session.
    #[error("Integrity error: {message}")]
    Integrity { message: String },

    /// The processor rejected the request payload; message is the processor's own.
    #[error("{message}")]
    UpstreamValidation { message: String },

    #[error("Upstream error: {message}")]
    Upstream { message: String },

    #[error("Payment not completed: {message}")]
    NotCompleted { message: String },

    #[error("Payment not authorized: {message}")]
    NotAuthorized { message: String },

    /// The host persistence layer failed to save an order or payment.
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl GatewayError {
    pub fn integrity(message: impl Into<String>) -> Self {
        GatewayError::Integrity {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        GatewayError::Upstream {
            message: message.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Configuration { .. } => "configuration_error",
            GatewayError::Validation { .. } => "validation_error",
            GatewayError::Integrity { .. } => "integrity_error",
            GatewayError::UpstreamValidation { .. } => "upstream_validation_error",
            GatewayError::Upstream { .. } => "upstream_error",
            GatewayError::NotCompleted { .. } => "not_completed_error",
            GatewayError::NotAuthorized { .. } => "not_authorized_error",
            GatewayError::Storage { .. } => "storage_error",
        }
    }

    pub fn is_retryable(&self) -> bool {
        false
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            GatewayError::Configuration { .. } => 500,
            GatewayError::Validation { .. } => 400,
            GatewayError::Integrity { .. } => 400,
            GatewayError::UpstreamValidation { .. } => 422,
            GatewayError::Upstream { .. } => 502,
            GatewayError::NotCompleted { .. } => 402,
            GatewayError::NotAuthorized { .. } => 402,
            GatewayError::Storage { .. } => 500,
        }
    }

    /// Text safe to render on the shopper-facing payment failure page.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Configuration { .. } | GatewayError::Storage { .. } => {
                "The payment gateway is not available right now".to_string()
            }
            GatewayError::Validation { message, .. } => message.clone(),
            GatewayError::Integrity { .. } => {
                "The payment could not be verified. Please try again".to_string()
            }
            GatewayError::UpstreamValidation { message } => message.clone(),
            GatewayError::Upstream { .. } => {
                "Payment provider is temporarily unavailable".to_string()
            }
            GatewayError::NotCompleted { .. } => "The payment was not completed".to_string(),
            GatewayError::NotAuthorized { .. } => {
                "The payment was not authorized by the provider".to_string()
            }
        }
    }
}
