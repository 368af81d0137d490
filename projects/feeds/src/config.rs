use std::net::SocketAddr;

use interfaces_github_trending::TrendingConfig;
use thiserror::Error;
use utils_trace::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidValue: {name}={value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Host settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub github_token: Option<String>,
    pub trending: TrendingConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr = parse(
            "BIND_ADDR",
            var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
        )?;

        let mut trending = TrendingConfig::default();
        if let Some(endpoint) = var("GITHUB_GRAPHQL_URL") {
            trending.endpoint = endpoint;
        }
        if let Some(page_size) = var("GITHUB_PAGE_SIZE") {
            trending.page_size = Some(parse("GITHUB_PAGE_SIZE", page_size)?);
        }

        let log_format = match var("LOG_FORMAT") {
            Some(format) => parse("LOG_FORMAT", format)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            github_token: var("GITHUB_TOKEN"),
            trending,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            log_format,
        })
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.github_token, None);
        assert_eq!(config.trending.endpoint, "https://api.github.com/graphql");
        assert_eq!(config.trending.page_size, Some(25));
        assert_eq!(config.trending.min_stars, 50);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("GITHUB_TOKEN", "ghp_token"),
            ("GITHUB_GRAPHQL_URL", "http://localhost:4000/graphql"),
            ("GITHUB_PAGE_SIZE", "40"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.github_token.as_deref(), Some("ghp_token"));
        assert_eq!(config.trending.endpoint, "http://localhost:4000/graphql");
        assert_eq!(config.trending.page_size, Some(40));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = config(&[("GITHUB_PAGE_SIZE", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "GITHUB_PAGE_SIZE", .. }));
        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn blank_token_is_no_token() {
        assert_eq!(config(&[("GITHUB_TOKEN", " ")]).unwrap().github_token, None);
    }
}
