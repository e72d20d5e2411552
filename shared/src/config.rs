use crate::{Error, Result};
use std::str::FromStr;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub cache_max_entries: Option<u64>, // None = unbounded
    pub event_channel_capacity: usize,
    pub fixtures_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            cache_max_entries: None,
            event_channel_capacity: Self::DEFAULT_EVENT_CHANNEL_CAPACITY,
            fixtures_path: None,
        }
    }
}

impl Config {
    const DEFAULT_LOG_LEVEL: &str = "info";
    const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Invalid values fall back
    /// to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_max_entries = match parse_optional::<u64>(&lookup, "ASIDE_CACHE_MAX_ENTRIES") {
            Ok(Some(0)) => {
                warn!("ASIDE_CACHE_MAX_ENTRIES=0 would disable caching, using an unbounded cache");
                None
            }
            Ok(value) => value,
            Err(e) => {
                warn!("{}, using an unbounded cache", e);
                None
            }
        };

        let event_channel_capacity =
            match parse_optional::<usize>(&lookup, "ASIDE_EVENT_CHANNEL_CAPACITY") {
                Ok(Some(capacity)) if capacity > 0 => capacity,
                Ok(Some(_)) => {
                    warn!(
                        "ASIDE_EVENT_CHANNEL_CAPACITY must be positive, using {}",
                        defaults.event_channel_capacity
                    );
                    defaults.event_channel_capacity
                }
                Ok(None) => defaults.event_channel_capacity,
                Err(e) => {
                    warn!("{}, using {}", e, defaults.event_channel_capacity);
                    defaults.event_channel_capacity
                }
            };

        Self {
            log_level: lookup("ASIDE_LOG_LEVEL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.log_level),
            cache_max_entries,
            event_channel_capacity,
            fixtures_path: lookup("ASIDE_FIXTURES_PATH").filter(|s| !s.trim().is_empty()),
        }
    }
}

fn parse_optional<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.cache_max_entries, None);
        assert_eq!(config.event_channel_capacity, 64);
        assert_eq!(config.fixtures_path, None);
    }

    #[test]
    fn test_values_are_read() {
        let config = config_from(&[
            ("ASIDE_LOG_LEVEL", "debug"),
            ("ASIDE_CACHE_MAX_ENTRIES", "500"),
            ("ASIDE_EVENT_CHANNEL_CAPACITY", " 16 "),
            ("ASIDE_FIXTURES_PATH", "./fixtures.json"),
        ]);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.cache_max_entries, Some(500));
        assert_eq!(config.event_channel_capacity, 16);
        assert_eq!(config.fixtures_path.as_deref(), Some("./fixtures.json"));
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("ASIDE_CACHE_MAX_ENTRIES", "lots"),
            ("ASIDE_EVENT_CHANNEL_CAPACITY", "0"),
            ("ASIDE_LOG_LEVEL", "   "),
        ]);
        assert_eq!(config.cache_max_entries, None);
        assert_eq!(config.event_channel_capacity, 64);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_zero_capacity_means_unbounded() {
        let config = config_from(&[("ASIDE_CACHE_MAX_ENTRIES", "0")]);
        assert_eq!(config.cache_max_entries, None);
    }

    #[test]
    fn test_parse_optional_reports_key_and_value() {
        let lookup = |_: &str| Some("abc".to_string());
        let err = parse_optional::<u64>(&lookup, "SOME_KEY").unwrap_err();
        assert_eq!(err.to_string(), "invalid value 'abc' for SOME_KEY");
    }
}
