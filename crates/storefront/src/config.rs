//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `RAZORPAY_KEY_ID` - Gateway key id (publishable; safe in the browser)
//! - `RAZORPAY_KEY_SECRET` - Gateway key secret (server-side only)
//! - `RAZORPAY_WEBHOOK_SECRET` - Shared secret for webhook signatures
//! - `DELHIVERY_API_KEY` - Logistics provider API token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `RAZORPAY_API_BASE` - Gateway API base URL override
//! - `DELHIVERY_ENDPOINT` - Shipment creation endpoint override
//! - `PICKUP_NAME` / `PICKUP_ADDRESS` / `PICKUP_CITY` / `PICKUP_STATE` /
//!   `PICKUP_PIN` / `PICKUP_PHONE` - Warehouse pickup location
//! - `DEMO_MODE` - When `true`, shipment failures return a simulated,
//!   clearly-marked tracking id instead of an error (never set in production)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! There are no literal credential fallbacks anywhere: a missing secret is a
//! startup error, and only the publishable key id is ever handed to clients.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_SECRET_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Payment gateway configuration
    pub razorpay: RazorpayConfig,
    /// Logistics provider configuration
    pub delhivery: DelhiveryConfig,
    /// Simulate shipment success on provider failure (non-production only)
    pub demo_mode: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Payment gateway (Razorpay) configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Key id; publishable, prefills the gateway popup client-side
    pub key_id: String,
    /// Key secret for the server-side orders API
    pub key_secret: SecretString,
    /// Shared secret for verifying webhook signatures
    pub webhook_secret: SecretString,
    /// API base URL (overridable for tests)
    pub api_base: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Logistics provider (Delhivery) configuration.
#[derive(Clone)]
pub struct DelhiveryConfig {
    /// API token sent as `Authorization: Token ...`
    pub api_key: SecretString,
    /// Shipment creation endpoint (overridable for tests)
    pub endpoint: String,
    /// Warehouse pickup location included in every shipment
    pub pickup: PickupLocation,
}

impl std::fmt::Debug for DelhiveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelhiveryConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("pickup", &self.pickup)
            .finish()
    }
}

/// The warehouse the provider picks shipments up from.
#[derive(Debug, Clone)]
pub struct PickupLocation {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin: String,
    pub phone: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;

        let razorpay = RazorpayConfig::from_env()?;
        let delhivery = DelhiveryConfig::from_env()?;
        let demo_mode = get_bool_env("DEMO_MODE");
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            razorpay,
            delhivery,
            demo_mode,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RazorpayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_base = get_env_or_default("RAZORPAY_API_BASE", "https://api.razorpay.com/v1");
        validate_endpoint_url(&api_base, "RAZORPAY_API_BASE")?;

        Ok(Self {
            key_id: get_required_env("RAZORPAY_KEY_ID")?,
            key_secret: get_validated_secret("RAZORPAY_KEY_SECRET")?,
            webhook_secret: get_validated_secret("RAZORPAY_WEBHOOK_SECRET")?,
            api_base,
        })
    }
}

impl DelhiveryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = get_env_or_default(
            "DELHIVERY_ENDPOINT",
            "https://track-api.delhivery.com/api/cmu/create.json",
        );
        validate_endpoint_url(&endpoint, "DELHIVERY_ENDPOINT")?;

        Ok(Self {
            api_key: get_validated_secret("DELHIVERY_API_KEY")?,
            endpoint,
            pickup: PickupLocation::from_env(),
        })
    }
}

impl PickupLocation {
    fn from_env() -> Self {
        Self {
            name: get_env_or_default("PICKUP_NAME", "Dynasty HQ"),
            address: get_env_or_default("PICKUP_ADDRESS", "Dynasty Warehouse, Delhi NCR"),
            city: get_env_or_default("PICKUP_CITY", "Delhi"),
            state: get_env_or_default("PICKUP_STATE", "Delhi"),
            country: "India".to_string(),
            pin: get_env_or_default("PICKUP_PIN", "110001"),
            phone: get_env_or_default("PICKUP_PHONE", "9876543210"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean flag; only `1`, `true`, and `yes` count as set.
fn get_bool_env(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Validate that an endpoint override is an absolute http(s) URL.
fn validate_endpoint_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API credentials have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_SECRET_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_SECRET_ENTROPY_BITS_PER_CHAR:.1}). Use the real credential."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your_test_api_key", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_endpoint_url() {
        assert!(validate_endpoint_url("https://api.razorpay.com/v1", "V").is_ok());
        assert!(validate_endpoint_url("http://127.0.0.1:9999", "V").is_ok());
        assert!(validate_endpoint_url("not a url", "V").is_err());
        assert!(validate_endpoint_url("ftp://example.com", "V").is_err());
    }

    #[test]
    fn test_bool_env_parsing() {
        // get_bool_env reads the process environment; exercise the matcher
        // through the same matching expression instead.
        for v in ["1", "true", "yes", "TRUE", "Yes"] {
            assert!(matches!(
                v.to_lowercase().as_str(),
                "1" | "true" | "yes"
            ));
        }
        assert!(!matches!("0".to_lowercase().as_str(), "1" | "true" | "yes"));
    }

    #[test]
    fn test_razorpay_config_debug_redacts_secrets() {
        let config = RazorpayConfig {
            key_id: "rzp_test_public_key".to_string(),
            key_secret: SecretString::from("super_private_value"),
            webhook_secret: SecretString::from("webhook_private_value"),
            api_base: "https://api.razorpay.com/v1".to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("rzp_test_public_key"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_private_value"));
        assert!(!debug_output.contains("webhook_private_value"));
    }

    #[test]
    fn test_delhivery_config_debug_redacts_secrets() {
        let config = DelhiveryConfig {
            api_key: SecretString::from("token_private_value"),
            endpoint: "https://track-api.delhivery.com/api/cmu/create.json".to_string(),
            pickup: PickupLocation {
                name: "Dynasty HQ".to_string(),
                address: "Dynasty Warehouse, Delhi NCR".to_string(),
                city: "Delhi".to_string(),
                state: "Delhi".to_string(),
                country: "India".to_string(),
                pin: "110001".to_string(),
                phone: "9876543210".to_string(),
            },
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("token_private_value"));
        assert!(debug_output.contains("Dynasty HQ"));
    }
}
