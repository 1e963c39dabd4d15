//! Configuration for webhook verification

use crate::signature::headers;
use crate::{DEFAULT_TOLERANCE, Result, Tolerance, WebhookError};
use std::time::Duration;

/// Environment variable holding the tolerance window in seconds
pub const ENV_TOLERANCE_SECS: &str = "GOCANCEL_WEBHOOK_TOLERANCE_SECS";

/// Environment variable toggling the freshness check (`true`/`false`)
pub const ENV_ENFORCE_TOLERANCE: &str = "GOCANCEL_WEBHOOK_ENFORCE_TOLERANCE";

/// Environment variable overriding the signature header name
pub const ENV_SIGNATURE_HEADER: &str = "GOCANCEL_WEBHOOK_SIGNATURE_HEADER";

/// Configuration for webhook verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Maximum accepted age of a signature
    pub tolerance: Duration,

    /// Whether the tolerance window is checked at all
    pub enforce_tolerance: bool,

    /// Name of the header carrying the signature
    pub signature_header: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            enforce_tolerance: true,
            signature_header: headers::SIGNATURE.to_string(),
        }
    }
}

impl WebhookConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> WebhookConfigBuilder {
        WebhookConfigBuilder::new()
    }

    /// Load overrides from `GOCANCEL_WEBHOOK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secs) = lookup(ENV_TOLERANCE_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                WebhookError::Config(format!("{} must be a number of seconds", ENV_TOLERANCE_SECS))
            })?;
            config.tolerance = Duration::from_secs(secs);
        }

        if let Some(enforce) = lookup(ENV_ENFORCE_TOLERANCE) {
            config.enforce_tolerance = match enforce.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(WebhookError::Config(format!(
                        "{} has invalid value '{}'",
                        ENV_ENFORCE_TOLERANCE, other
                    )));
                }
            };
        }

        if let Some(name) = lookup(ENV_SIGNATURE_HEADER) {
            let name = name.trim();
            if name.is_empty() {
                return Err(WebhookError::Config(format!(
                    "{} must not be empty",
                    ENV_SIGNATURE_HEADER
                )));
            }
            config.signature_header = name.to_string();
        }

        Ok(config)
    }

    /// The freshness policy this configuration describes
    pub fn tolerance_policy(&self) -> Tolerance {
        if self.enforce_tolerance {
            Tolerance::Enforce(self.tolerance)
        } else {
            Tolerance::Ignore
        }
    }
}

/// Builder for WebhookConfig
#[derive(Debug, Clone, Default)]
pub struct WebhookConfigBuilder {
    config: WebhookConfig,
}

impl WebhookConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: WebhookConfig::default(),
        }
    }

    /// Set the tolerance window
    pub fn tolerance(mut self, tolerance: Duration) -> Self {
        self.config.tolerance = tolerance;
        self.config.enforce_tolerance = true;
        self
    }

    /// Set the tolerance window in seconds
    pub fn tolerance_secs(self, secs: u64) -> Self {
        self.tolerance(Duration::from_secs(secs))
    }

    /// Disable the freshness check
    pub fn ignore_tolerance(mut self) -> Self {
        self.config.enforce_tolerance = false;
        self
    }

    /// Set the signature header name
    pub fn signature_header(mut self, name: impl Into<String>) -> Self {
        self.config.signature_header = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> WebhookConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = WebhookConfig::default();
        assert_eq!(config.tolerance, Duration::from_secs(300));
        assert!(config.enforce_tolerance);
        assert_eq!(config.signature_header, "Gocxl-Signature");
        assert_eq!(config.tolerance_policy(), Tolerance::default());
    }

    #[test]
    fn test_builder() {
        let config = WebhookConfig::builder()
            .tolerance_secs(60)
            .signature_header("X-Test-Signature")
            .build();

        assert_eq!(config.tolerance, Duration::from_secs(60));
        assert_eq!(config.signature_header, "X-Test-Signature");
        assert_eq!(
            config.tolerance_policy(),
            Tolerance::Enforce(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_builder_ignore_tolerance() {
        let config = WebhookConfig::builder().ignore_tolerance().build();
        assert_eq!(config.tolerance_policy(), Tolerance::Ignore);
    }

    #[test]
    fn test_from_lookup_without_overrides() {
        let config = WebhookConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, WebhookConfig::default());
    }

    #[test]
    fn test_from_lookup_with_overrides() {
        let config = WebhookConfig::from_lookup(lookup_from(&[
            (ENV_TOLERANCE_SECS, "45"),
            (ENV_ENFORCE_TOLERANCE, "off"),
            (ENV_SIGNATURE_HEADER, "X-Gocxl-Signature"),
        ]))
        .unwrap();

        assert_eq!(config.tolerance, Duration::from_secs(45));
        assert!(!config.enforce_tolerance);
        assert_eq!(config.signature_header, "X-Gocxl-Signature");
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = WebhookConfig::from_lookup(lookup_from(&[(ENV_TOLERANCE_SECS, "five")]))
            .unwrap_err();
        assert_eq!(err.kind(), "config");

        let err = WebhookConfig::from_lookup(lookup_from(&[(ENV_ENFORCE_TOLERANCE, "maybe")]))
            .unwrap_err();
        assert_eq!(err.kind(), "config");

        let err = WebhookConfig::from_lookup(lookup_from(&[(ENV_SIGNATURE_HEADER, "  ")]))
            .unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}
