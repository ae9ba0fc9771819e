//! Server configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `CRM_HOST` | `0.0.0.0` |
//! | `CRM_PORT` | `4000` |
//! | `CRM_FIXTURE_PATH` | `./demo-data.json` |
//! | `CRM_CORS_ORIGINS` | `http://localhost:5173,http://localhost:5174,http://localhost:3000` |

use std::path::PathBuf;

/// Origins allowed by CORS when `CRM_CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:3000",
];

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to.
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// Path of the fixture file loaded at startup.
    pub fixture_path: PathBuf,
    /// Browser origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 4000,
            fixture_path: PathBuf::from("./demo-data.json"),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|&o| o.to_owned()).collect(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("CRM_HOST").unwrap_or(defaults.host);

        let port = match lookup("CRM_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "CRM_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let fixture_path = lookup("CRM_FIXTURE_PATH").map_or(defaults.fixture_path, PathBuf::from);

        let cors_origins = match lookup("CRM_CORS_ORIGINS") {
            Some(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_owned)
                    .collect();
                if origins.is_empty() {
                    return Err(ConfigError::Invalid {
                        name: "CRM_CORS_ORIGINS",
                        value: raw,
                        reason: String::from("no origins listed"),
                    });
                }
                origins
            }
            None => defaults.cors_origins,
        };

        Ok(Self {
            host,
            port,
            fixture_path,
            cors_origins,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 4000);
        assert_eq!(config.cors_origins.len(), 3);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("CRM_HOST", "127.0.0.1"),
            ("CRM_PORT", "8081"),
            ("CRM_FIXTURE_PATH", "/tmp/data.json"),
            ("CRM_CORS_ORIGINS", "https://a.test, https://b.test,"),
        ]))
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.fixture_path, PathBuf::from("/tmp/data.json"));
        assert_eq!(config.cors_origins, ["https://a.test", "https://b.test"]);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("CRM_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("CRM_PORT"));
    }

    #[test]
    fn empty_origin_list_is_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("CRM_CORS_ORIGINS", " , ")])).is_err());
    }
}
