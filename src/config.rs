// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact intake service.
//!
//! Every field has a default; environment variables override them. See
//! [`Config::from_env`] for the variable names.

use crate::models::Locale;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Missing required setting: {0}")]
    MissingValue(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration for the contact intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Cooldown ledger configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Notification delivery configuration
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Cross-origin configuration for the website front end
    #[serde(default)]
    pub cors: CorsConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Per-client cooldown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum interval between accepted submissions per client, in milliseconds (default: 60000)
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Interval between ledger sweeps in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Which notifier receives accepted submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Log,
    Email,
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "email" => Ok(Self::Email),
            other => Err(format!("unknown notifier: {other}")),
        }
    }
}

/// Notification delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,

    /// Address that receives every inquiry
    #[serde(default = "default_recipient")]
    pub recipient: String,

    /// `From` address of outgoing notification emails
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Language of outgoing notification emails
    #[serde(default)]
    pub locale: Locale,

    /// Transactional email API key; required when `kind` is `email`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Transactional email API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Outbound request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to post the contact form; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_cooldown_ms() -> u64 {
    60_000
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_recipient() -> String {
    "wiselake@wiselake.ai".to_string()
}

fn default_sender() -> String {
    "noreply@wiselake.ai".to_string()
}

fn default_api_base() -> String {
    "https://api.resend.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            notifier: NotifierConfig::default(),
            cors: CorsConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::default(),
            recipient: default_recipient(),
            sender: default_sender(),
            locale: Locale::default(),
            api_key: None,
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl RateLimitConfig {
    /// Get the cooldown duration
    pub fn cooldown_duration(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Get the sweep interval, never shorter than one second
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl NotifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// - `BIND_ADDR`: Server bind address
    /// - `COOLDOWN_MS`: Cooldown between accepted submissions per client
    /// - `SWEEP_INTERVAL_SECS`: Ledger sweep interval
    /// - `ALLOWED_ORIGINS`: Comma-separated CORS origins
    /// - `NOTIFIER`: `log` or `email`
    /// - `CONTACT_RECIPIENT`, `CONTACT_SENDER`, `CONTACT_LOCALE`
    /// - `RESEND_API_KEY`, `EMAIL_API_BASE`, `EMAIL_TIMEOUT_SECS`
    /// - `METRICS_ENABLED`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(ms) = parse_var(&lookup, "COOLDOWN_MS")? {
            config.rate_limit.cooldown_ms = ms;
        }
        if let Some(secs) = parse_var(&lookup, "SWEEP_INTERVAL_SECS")? {
            config.rate_limit.sweep_interval_secs = secs;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(kind) = parse_var(&lookup, "NOTIFIER")? {
            config.notifier.kind = kind;
        }
        if let Some(recipient) = lookup("CONTACT_RECIPIENT") {
            config.notifier.recipient = recipient;
        }
        if let Some(sender) = lookup("CONTACT_SENDER") {
            config.notifier.sender = sender;
        }
        if let Some(locale) = parse_var(&lookup, "CONTACT_LOCALE")? {
            config.notifier.locale = locale;
        }
        config.notifier.api_key = lookup("RESEND_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(base) = lookup("EMAIL_API_BASE") {
            config.notifier.api_base = base;
        }
        if let Some(secs) = parse_var(&lookup, "EMAIL_TIMEOUT_SECS")? {
            config.notifier.timeout_secs = secs;
        }
        if let Some(enabled) = parse_var(&lookup, "METRICS_ENABLED")? {
            config.metrics.enabled = enabled;
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.rate_limit.cooldown_ms, 60_000);
        assert_eq!(config.rate_limit.cooldown_duration(), Duration::from_secs(60));
        assert_eq!(config.notifier.kind, NotifierKind::Log);
        assert_eq!(config.notifier.recipient, "wiselake@wiselake.ai");
        assert_eq!(config.notifier.locale, Locale::Ko);
        assert!(config.notifier.api_key.is_none());
        assert!(config.cors.allowed_origins.is_empty());
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("COOLDOWN_MS", "5000"),
            ("NOTIFIER", "email"),
            ("CONTACT_LOCALE", "en"),
            ("RESEND_API_KEY", "re_test"),
            ("ALLOWED_ORIGINS", "https://wiselake.co.kr, https://www.wiselake.co.kr,"),
            ("METRICS_ENABLED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.rate_limit.cooldown_ms, 5000);
        assert_eq!(config.notifier.kind, NotifierKind::Email);
        assert_eq!(config.notifier.locale, Locale::En);
        assert_eq!(config.notifier.api_key.as_deref(), Some("re_test"));
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://wiselake.co.kr", "https://www.wiselake.co.kr"]
        );
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let err = Config::from_lookup(lookup_from(&[("COOLDOWN_MS", "one minute")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "COOLDOWN_MS", .. }));

        let err = Config::from_lookup(lookup_from(&[("NOTIFIER", "carrier-pigeon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "NOTIFIER", .. }));
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let config = Config::from_lookup(lookup_from(&[("RESEND_API_KEY", "  ")])).unwrap();
        assert!(config.notifier.api_key.is_none());
    }

    #[test]
    fn test_sweep_interval_floor() {
        let config = RateLimitConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }
}
