//! Engine configuration
//!
//! Sources, in increasing precedence: built-in defaults, an optional TOML
//! file, and `QUOTE_`-prefixed environment variables (`__` separates nested
//! keys, e.g. `QUOTE_ROUNDING__DEFAULT_SCALE=0`).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use core_kernel::{Currency, RoundingMode, RoundingPolicy};
use domain_pricing::RoundingService;

/// File read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "quote-engine";

/// Longest accepted quote lifetime: 365 days
pub const MAX_QUOTE_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Rounding table configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoundingConfig {
    pub default_scale: u32,
    pub default_mode: RoundingMode,
    /// Per-currency policies keyed by ISO code
    pub overrides: HashMap<String, RoundingPolicy>,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            default_scale: RoundingPolicy::DEFAULT.scale,
            default_mode: RoundingPolicy::DEFAULT.mode,
            overrides: HashMap::new(),
        }
    }
}

impl RoundingConfig {
    /// Builds the rounding service, rejecting unknown currency codes
    pub fn rounding_service(&self) -> Result<RoundingService, config::ConfigError> {
        let mut service = RoundingService::new()
            .with_default(RoundingPolicy::new(self.default_scale, self.default_mode));
        for (code, policy) in &self.overrides {
            let currency: Currency = code
                .parse()
                .map_err(|e| config::ConfigError::Message(format!("rounding.overrides: {}", e)))?;
            service = service.with_override(currency, *policy);
        }
        Ok(service)
    }
}

/// Quote engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quote lifetime, also used as the cache TTL
    pub quote_ttl_minutes: i64,
    /// Fail on a rejected promo code instead of ignoring it
    pub strict_promo_codes: bool,
    pub rounding: RoundingConfig,
    /// Fallback log filter when `RUST_LOG` is not set
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quote_ttl_minutes: 30,
            strict_promo_codes: false,
            rounding: RoundingConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `path` (or `quote-engine.toml` if present) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("QUOTE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if !(0..=MAX_QUOTE_TTL_MINUTES).contains(&self.quote_ttl_minutes) {
            return Err(config::ConfigError::Message(format!(
                "quote_ttl_minutes must be between 0 and {}, got {}",
                MAX_QUOTE_TTL_MINUTES, self.quote_ttl_minutes
            )));
        }
        self.rounding.rounding_service()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.quote_ttl_minutes, 30);
        assert!(!config.strict_promo_codes);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(
            config.rounding.rounding_service().unwrap().policy_for(Currency::RUB),
            RoundingPolicy::DEFAULT
        );
    }

    #[test]
    fn test_overrides_from_toml() {
        let config: EngineConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                quote_ttl_minutes = 15
                strict_promo_codes = true

                [rounding]
                default_mode = "half_even"

                [rounding.overrides.jpy]
                scale = 0
                mode = "down"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.quote_ttl_minutes, 15);
        assert!(config.strict_promo_codes);
        assert_eq!(config.log_level, "info");

        let rounding = config.rounding.rounding_service().unwrap();
        assert_eq!(rounding.policy_for(Currency::RUB).mode, RoundingMode::HalfEven);
        assert_eq!(rounding.policy_for(Currency::JPY), RoundingPolicy::new(0, RoundingMode::Down));
    }

    #[test]
    fn test_unknown_override_currency_is_rejected() {
        let mut config = EngineConfig::default();
        config
            .rounding
            .overrides
            .insert("XXX".to_string(), RoundingPolicy::DEFAULT);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quote_ttl_bounds() {
        let mut config = EngineConfig::default();
        config.quote_ttl_minutes = MAX_QUOTE_TTL_MINUTES;
        assert!(config.validate().is_ok());

        for bad in [-1, MAX_QUOTE_TTL_MINUTES + 1, i64::MAX / 60_000] {
            config.quote_ttl_minutes = bad;
            assert!(config.validate().is_err(), "{}", bad);
        }
    }
}
