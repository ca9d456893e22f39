//! # Engine Configuration
//!
//! Engine-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_MAX_API_CALL_RETRIES, DEFAULT_NAMESPACE, DEFAULT_TERRAFORM_BINARY,
    SECRET_NAME_CLOUD_PROVIDER,
};

/// Engine configuration
///
/// All settings have defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Terraform (or OpenTofu) binary used to read state outputs
    pub terraform_binary: String,
    /// Retries of the Terraform OpenStack provider for failed API calls
    pub max_api_call_retries: u32,
    /// Name of the secret carrying the OpenStack credentials
    pub cloud_provider_secret_name: String,
    /// Namespace secrets are read from when none is given
    pub namespace: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            terraform_binary: DEFAULT_TERRAFORM_BINARY.to_string(),
            max_api_call_retries: DEFAULT_MAX_API_CALL_RETRIES,
            cloud_provider_secret_name: SECRET_NAME_CLOUD_PROVIDER.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env_var_or_default_str("LOG_LEVEL", "info"),
            log_format: env_var_or_default_str("LOG_FORMAT", "text"),
            terraform_binary: env_var_or_default_str("TERRAFORM_BINARY", DEFAULT_TERRAFORM_BINARY),
            max_api_call_retries: env_var_or_default(
                "MAX_API_CALL_RETRIES",
                DEFAULT_MAX_API_CALL_RETRIES,
            ),
            cloud_provider_secret_name: env_var_or_default_str(
                "CLOUD_PROVIDER_SECRET_NAME",
                SECRET_NAME_CLOUD_PROVIDER,
            ),
            namespace: env_var_or_default_str("POD_NAMESPACE", DEFAULT_NAMESPACE),
        }
    }

    /// Whether logs are emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
