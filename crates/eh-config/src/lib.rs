use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;
use url::Url;

/// Variable holding the database connection string. Required.
pub const DATABASE_URL: &str = "DATABASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set (e.g. DATABASE_URL=sqlite://eventhub.db)")]
    Missing(&'static str),

    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub max_connections: u32,
    /// Browser origins allowed to call the API. Localhost is always allowed.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty(DATABASE_URL).ok_or(ConfigError::Missing(DATABASE_URL))?;

        let bind_addr = non_empty("EH_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".into());

        let max_connections = match non_empty("EH_DB_MAX_CONNECTIONS") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "EH_DB_MAX_CONNECTIONS",
                        reason: format!("expected a positive integer, got '{}'", v),
                    })
                }
            },
            None => 5,
        };

        let mut allowed_origins = Vec::new();
        if let Some(v) = non_empty("EH_ALLOWED_ORIGINS") {
            for raw in v.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
                    var: "EH_ALLOWED_ORIGINS",
                    reason: format!("'{}': {}", raw, e),
                })?;
                allowed_origins.push(url.origin().ascii_serialization());
            }
        }

        debug!(bind_addr = %bind_addr, max_connections, origins = allowed_origins.len(), "config loaded");

        Ok(Self {
            bind_addr,
            database_url,
            max_connections,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));

        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite://events.db")])).unwrap();
        assert_eq!(cfg.database_url, "sqlite://events.db");
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.max_connections, 5);
        assert!(cfg.allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("EH_BIND_ADDR", "127.0.0.1:9000"),
            ("EH_DB_MAX_CONNECTIONS", "2"),
            ("EH_ALLOWED_ORIGINS", "https://events.example.com/, http://192.168.1.10:3000"),
        ]))
        .unwrap();

        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.max_connections, 2);
        assert_eq!(
            cfg.allowed_origins,
            vec!["https://events.example.com", "http://192.168.1.10:3000"]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("EH_DB_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "EH_DB_MAX_CONNECTIONS", .. }));

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("EH_ALLOWED_ORIGINS", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "EH_ALLOWED_ORIGINS", .. }));
    }

    #[test]
    fn test_config_serializes_for_logging() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite://events.db")])).unwrap();
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["database_url"], "sqlite://events.db");
        assert_eq!(json["max_connections"], 5);

        let back: Config = serde_json::from_value(json).unwrap();
        assert_eq!(back.bind_addr, cfg.bind_addr);
    }
}
