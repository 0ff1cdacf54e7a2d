use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("JOBTRACK_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("JOBTRACK_URL must start with http:// or https://, got '{base_url}'");
        }

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .with_context(|| {
            format!("REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'")
        })?;
    if secs == 0 {
        bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_reads_all_variables() {
        let config = config_from(&[
            ("JOBTRACK_URL", "https://tracker.example.com"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "https://tracker.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.rust_log, "debug");
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        let err = config_from(&[("REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        assert!(config_from(&[("JOBTRACK_URL", "localhost:5000")]).is_err());
    }
}
