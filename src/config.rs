//! # Configuration Module
//!
//! This module defines configuration structures for the scanner bot,
//! including OCR provider settings and message lifecycle parameters.
//! Everything except the bot token has a working default; values can be
//! overridden through environment variables.

use std::time::Duration;

// Constants for message lifecycle
pub const DEFAULT_TTL_SECS: u64 = 120; // 2 minutes before tracked messages expire
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5;

// Constants for the OCR provider
pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";
pub const DEFAULT_OCR_API_KEY: &str = "helloworld"; // free-tier key
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;

// UI constraint: Telegram keyboards get unwieldy past this
pub const DEFAULT_MAX_KEYBOARD_RESULTS: usize = 15;

/// Configuration for the remote OCR provider
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// OCR API endpoint URL
    pub endpoint: String,
    /// API key sent with every request
    pub api_key: String,
    /// OCR language code (e.g., "eng")
    pub language: String,
    /// Timeout for OCR requests in seconds
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
            api_key: DEFAULT_OCR_API_KEY.to_string(),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OCR provider configuration
    pub ocr: OcrConfig,
    /// Time-to-live for tracked messages
    pub message_ttl: Duration,
    /// Interval between cleanup sweeps
    pub sweep_interval: Duration,
    /// Maximum number of results rendered as keyboard buttons
    pub max_results: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            message_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            max_results: DEFAULT_MAX_KEYBOARD_RESULTS,
        }
    }
}

impl AppConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            ocr: OcrConfig {
                endpoint: env_or("OCR_API_URL", defaults.ocr.endpoint),
                api_key: env_or("OCR_API_KEY", defaults.ocr.api_key),
                language: env_or("OCR_LANGUAGE", defaults.ocr.language),
                timeout_secs: env_parsed("OCR_TIMEOUT_SECS", defaults.ocr.timeout_secs),
            },
            message_ttl: Duration::from_secs(env_parsed("MESSAGE_TTL_SECS", DEFAULT_TTL_SECS)),
            sweep_interval: Duration::from_secs(env_parsed(
                "SWEEP_INTERVAL_SECS",
                DEFAULT_SWEEP_INTERVAL_SECS,
            )),
            max_results: env_parsed("MAX_KEYBOARD_RESULTS", defaults.max_results),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = AppConfig::default();

        assert_eq!(config.message_ttl, Duration::from_secs(120));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert_eq!(config.max_results, 15);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.timeout_secs, 30);
        assert!(config.ocr.endpoint.starts_with("https://"));
    }

    #[test]
    fn test_config_cloning() {
        let config = AppConfig::default();
        let cloned = config.clone();

        assert_eq!(config.ocr.endpoint, cloned.ocr.endpoint);
        assert_eq!(config.message_ttl, cloned.message_ttl);
    }

    #[test]
    fn test_env_parsed_falls_back_on_garbage() {
        std::env::set_var("NUMSCAN_TEST_BAD_NUMBER", "not-a-number");
        let parsed: u64 = env_parsed("NUMSCAN_TEST_BAD_NUMBER", 42);
        assert_eq!(parsed, 42);
        std::env::remove_var("NUMSCAN_TEST_BAD_NUMBER");
    }
}
