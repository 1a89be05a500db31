//! Application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::SimulatedOutcome;

/// Storefront configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root URL of the product catalog
    pub catalog_base_url: String,

    /// Products requested per catalog page
    pub catalog_page_size: u32,

    /// Catalog request timeout in milliseconds
    pub catalog_timeout_ms: u64,

    /// Cart actor mailbox size
    pub cart_buffer_size: usize,

    /// Simulated order round-trip in milliseconds
    pub checkout_latency_ms: u64,

    /// Upper bound on a checkout attempt in milliseconds
    pub checkout_timeout_ms: u64,

    /// How the simulated order service answers
    pub checkout_outcome: SimulatedOutcome,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: "https://dummyjson.com".to_string(),
            catalog_page_size: 30,
            catalog_timeout_ms: 10_000,
            cart_buffer_size: 100,
            checkout_latency_ms: 1_000,
            checkout_timeout_ms: 5_000,
            checkout_outcome: SimulatedOutcome::AlwaysSucceed,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = AppConfig {
            catalog_base_url: lookup("CATALOG_BASE_URL").unwrap_or(defaults.catalog_base_url),
            catalog_page_size: parse_or(&lookup, "CATALOG_PAGE_SIZE", defaults.catalog_page_size)?,
            catalog_timeout_ms: parse_or(&lookup, "CATALOG_TIMEOUT_MS", defaults.catalog_timeout_ms)?,
            cart_buffer_size: parse_or(&lookup, "CART_BUFFER_SIZE", defaults.cart_buffer_size)?,
            checkout_latency_ms: parse_or(&lookup, "CHECKOUT_LATENCY_MS", defaults.checkout_latency_ms)?,
            checkout_timeout_ms: parse_or(&lookup, "CHECKOUT_TIMEOUT_MS", defaults.checkout_timeout_ms)?,
            checkout_outcome: parse_or(&lookup, "CHECKOUT_OUTCOME", defaults.checkout_outcome)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("CATALOG_BASE_URL must not be empty".to_string()));
        }
        if self.cart_buffer_size == 0 {
            return Err(ConfigError::Invalid("CART_BUFFER_SIZE must be greater than 0".to_string()));
        }
        if self.checkout_timeout_ms == 0 {
            return Err(ConfigError::Invalid("CHECKOUT_TIMEOUT_MS must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn checkout_latency(&self) -> Duration {
        Duration::from_millis(self.checkout_latency_ms)
    }

    pub fn checkout_timeout(&self) -> Duration {
        Duration::from_millis(self.checkout_timeout_ms)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
