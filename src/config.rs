//! Gateway configuration module
//! Handles environment variable loading, credential validation, and logging settings

use crate::error::{GatewayError, GatewayResult};
use std::env;
use std::fmt;
use std::str::FromStr;

const SANDBOX_ENDPOINT: &str = "https://eu.sandbox.api-ingenico.com";
const PRODUCTION_ENDPOINT: &str = "https://world.api-ingenico.com";

/// Processor environment selected by the merchant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayMode {
    #[default]
    Test,
    Live,
}

impl GatewayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::Test => "test",
            GatewayMode::Live => "live",
        }
    }

    /// Base URL of the processor API for this mode.
    pub fn endpoint(&self) -> &'static str {
        match self {
            GatewayMode::Test => SANDBOX_ENDPOINT,
            GatewayMode::Live => PRODUCTION_ENDPOINT,
        }
    }
}

impl fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GatewayMode {
    type Err = std::convert::Infallible;

    /// Only the literal `test` selects the sandbox; everything else is live.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim() {
            "test" => GatewayMode::Test,
            _ => GatewayMode::Live,
        })
    }
}

/// Merchant account configuration as entered by the store administrator.
///
/// Credentials may be blank here; [`GatewayConfig::credentials`] is the gate
/// every outbound call goes through.
#[derive(Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub api_secret: String,
    pub integrator: String,
    pub merchant_id: String,
    pub subdomain: String,
    pub mode: GatewayMode,
    pub timeout_secs: u64,
    /// Replaces the mode-derived endpoint, e.g. for a local mock server.
    pub endpoint_override: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            integrator: String::new(),
            merchant_id: String::new(),
            subdomain: "payment".to_string(),
            mode: GatewayMode::Test,
            timeout_secs: 30,
            endpoint_override: None,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("integrator", &self.integrator)
            .field("merchant_id", &self.merchant_id)
            .field("subdomain", &self.subdomain)
            .field("mode", &self.mode)
            .field("timeout_secs", &self.timeout_secs)
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenv::dotenv().ok();

        let defaults = GatewayConfig::default();
        Ok(GatewayConfig {
            api_key: env::var("INGENICO_API_KEY").unwrap_or_default(),
            api_secret: env::var("INGENICO_API_SECRET").unwrap_or_default(),
            integrator: env::var("INGENICO_INTEGRATOR").unwrap_or_default(),
            merchant_id: env::var("INGENICO_MERCHANT_ID").unwrap_or_default(),
            subdomain: env::var("INGENICO_SUBDOMAIN").unwrap_or(defaults.subdomain),
            mode: env::var("INGENICO_MODE")
                .unwrap_or_else(|_| "test".to_string())
                .parse()
                .unwrap_or_default(),
            timeout_secs: parse_timeout(
                &env::var("INGENICO_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string()),
            )?,
            endpoint_override: env::var("INGENICO_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }

    /// Resolve the processor endpoint. Pure function of `mode` unless overridden.
    pub fn endpoint(&self) -> &str {
        self.endpoint_override
            .as_deref()
            .unwrap_or_else(|| self.mode.endpoint())
    }

    /// Check that every required credential is populated.
    pub fn credentials(&self) -> GatewayResult<MerchantCredentials> {
        let required = [
            ("api_key", &self.api_key, "API Key not provided."),
            ("api_secret", &self.api_secret, "API Secret not provided."),
            ("integrator", &self.integrator, "Integrator not provided."),
            ("merchant_id", &self.merchant_id, "Merchant ID not provided."),
            ("subdomain", &self.subdomain, "Subdomain not provided."),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                return Err(GatewayError::Configuration {
                    message: message.to_string(),
                    field: Some(field.to_string()),
                });
            }
        }

        Ok(MerchantCredentials {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            integrator: self.integrator.clone(),
            merchant_id: self.merchant_id.clone(),
            subdomain: self.subdomain.clone(),
            endpoint: self.endpoint().trim_end_matches('/').to_string(),
        })
    }
}

/// Request timeout in whole seconds; must be non-zero.
fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue("INGENICO_TIMEOUT_SECS".to_string())),
    }
}

/// Fully populated credentials. Only [`GatewayConfig::credentials`] builds one.
#[derive(Clone)]
pub struct MerchantCredentials {
    api_key: String,
    api_secret: String,
    integrator: String,
    merchant_id: String,
    subdomain: String,
    endpoint: String,
}

impl MerchantCredentials {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    pub fn integrator(&self) -> &str {
        &self.integrator
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("integrator", &self.integrator)
            .field("subdomain", &self.subdomain)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Plain,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            format: LogFormat::Plain,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "plain".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Plain,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
        if !valid_levels.contains(&self.level.to_uppercase().as_str()) {
            return Err(ConfigError::InvalidValue("LOG_LEVEL".to_string()));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for configuration: {0}")]
    InvalidValue(String),
}

impl From<ConfigError> for GatewayError {
    fn from(err: ConfigError) -> Self {
        let field = match &err {
            ConfigError::InvalidValue(name) => name.clone(),
        };
        GatewayError::Configuration {
            message: err.to_string(),
            field: Some(field),
        }
    }
}
