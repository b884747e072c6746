//! Server configuration from environment variables

use lapse_core::DayMode;
use std::env;

pub const LOG_VAR: &str = "LAPSE_LOG";
pub const INCLUDE_DAYS_VAR: &str = "LAPSE_INCLUDE_DAYS";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Filter directive for the tracing subscriber
    pub log_filter: String,
    /// Day mode used when a call omits `include_days`
    pub default_day_mode: DayMode,
    /// Problems found while reading the environment, logged once tracing is up
    pub warnings: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            default_day_mode: DayMode::default(),
            warnings: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(filter) = get(LOG_VAR).or_else(|| get("RUST_LOG")) {
            config.log_filter = filter;
        }

        if let Some(raw) = get(INCLUDE_DAYS_VAR) {
            match parse_flag(&raw) {
                Some(include_days) => config.default_day_mode = DayMode::from(include_days),
                None => config.warnings.push(format!(
                    "{}='{}' is not a boolean, using {:?}",
                    INCLUDE_DAYS_VAR, raw, config.default_day_mode
                )),
            }
        }

        config
    }
}

/// Parse a boolean-ish flag (`true/1/yes/on`, `false/0/no/off`)
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.default_day_mode, DayMode::Hours);
    }

    #[test]
    fn test_log_filter_precedence() {
        let config = config_from(&[("RUST_LOG", "warn")]);
        assert_eq!(config.log_filter, "warn");

        let config = config_from(&[("RUST_LOG", "warn"), ("LAPSE_LOG", "lapse_plugin=debug")]);
        assert_eq!(config.log_filter, "lapse_plugin=debug");

        let config = config_from(&[("LAPSE_LOG", "  ")]);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_include_days() {
        assert_eq!(config_from(&[("LAPSE_INCLUDE_DAYS", "yes")]).default_day_mode, DayMode::Calendar);
        assert_eq!(config_from(&[("LAPSE_INCLUDE_DAYS", "1")]).default_day_mode, DayMode::Calendar);
        assert_eq!(config_from(&[("LAPSE_INCLUDE_DAYS", "False")]).default_day_mode, DayMode::Hours);
    }

    #[test]
    fn test_invalid_include_days_warns() {
        let config = config_from(&[("LAPSE_INCLUDE_DAYS", "sometimes")]);
        assert_eq!(config.default_day_mode, DayMode::Hours);
        assert_eq!(config.warnings.len(), 1);
        assert!(config.warnings[0].contains("sometimes"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("2"), None);
    }
}
