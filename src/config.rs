use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "course_catalog=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub log_filter: String,
}

#[cfg(feature = "cli")]
#[derive(Debug, clap::Parser)]
#[command(name = "course-catalog", about = "Browse and edit a remote course catalog")]
struct Args {
    /// Base URL of the course service (overrides COURSES_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Per-request timeout in seconds (overrides COURSES_API_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        #[allow(unused_mut)]
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;

        #[cfg(feature = "cli")]
        {
            use clap::Parser;
            let args = Args::parse();
            if let Some(url) = args.api_url {
                config.api_base_url = normalize_base_url(&url)?;
            }
            if let Some(secs) = args.timeout_secs {
                config.request_timeout = timeout_from_secs(secs)?;
            }
        }

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = match lookup("COURSES_API_URL") {
            Some(url) => normalize_base_url(&url)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let request_timeout = match lookup("COURSES_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("COURSES_API_TIMEOUT_SECS is not a number: {}", raw))?;
                timeout_from_secs(secs)?
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_filter = lookup("COURSES_LOG")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            api_base_url,
            request_timeout,
            log_filter,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        anyhow::bail!("COURSES_API_URL is empty");
    }

    let url = reqwest::Url::parse(trimmed)
        .with_context(|| format!("COURSES_API_URL is not a valid URL: {}", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("COURSES_API_URL must use http or https, got {}", url.scheme());
    }

    Ok(trimmed.to_string())
}

fn timeout_from_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        anyhow::bail!("Request timeout must be at least one second");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            ("COURSES_API_URL", "https://catalog.example.org/api/"),
            ("COURSES_API_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://catalog.example.org/api");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[("COURSES_API_URL", "")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("COURSES_API_URL", "ftp://host")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("COURSES_API_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("COURSES_API_TIMEOUT_SECS", "soon")])).is_err());
    }
}
