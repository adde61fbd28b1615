use std::collections::HashMap;
use std::fmt;

use anyhow::Context;

use crate::error::TrackError;

pub const API_TOKEN_KEY: &str = "FIRSTPROMOTER_API_TOKEN";
pub const ACCOUNT_ID_KEY: &str = "FIRSTPROMOTER_ACCOUNT_ID";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 80;

/// Read-only key/value source for process configuration.
///
/// Empty values are reported as absent.
pub trait ConfigProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConfig;

impl ConfigProvider for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }
}

/// Fixed in-memory configuration, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct StaticConfig {
    values: HashMap<String, String>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Both FirstPromoter credentials set.
    pub fn with_credentials(token: &str, account_id: &str) -> Self {
        Self::new()
            .with(API_TOKEN_KEY, token)
            .with(ACCOUNT_ID_KEY, account_id)
    }
}

impl ConfigProvider for StaticConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|value| !value.is_empty()).cloned()
    }
}

/// FirstPromoter API credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub account_id: String,
}

impl Credentials {
    /// Looks up both credentials, failing with `ServerMisconfigured` if either is missing.
    pub fn load(config: &dyn ConfigProvider) -> Result<Self, TrackError> {
        let api_token = config.get(API_TOKEN_KEY);
        let account_id = config.get(ACCOUNT_ID_KEY);

        match (api_token, account_id) {
            (Some(api_token), Some(account_id)) => Ok(Self {
                api_token,
                account_id,
            }),
            (api_token, account_id) => {
                let missing: Vec<&str> = [
                    (API_TOKEN_KEY, api_token.is_none()),
                    (ACCOUNT_ID_KEY, account_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, is_missing)| is_missing.then_some(key))
                .collect();

                Err(TrackError::ServerMisconfigured { missing })
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Bind address for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn load(config: &dyn ConfigProvider) -> anyhow::Result<Self> {
        let host = config.get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match config.get("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_credentials_when_both_present() {
        let config = StaticConfig::with_credentials("tok", "acc");
        let credentials = Credentials::load(&config).unwrap();

        assert_eq!(credentials.api_token, "tok");
        assert_eq!(credentials.account_id, "acc");
    }

    #[test]
    fn missing_token_is_misconfiguration() {
        let config = StaticConfig::new().with(ACCOUNT_ID_KEY, "acc");

        match Credentials::load(&config) {
            Err(TrackError::ServerMisconfigured { missing }) => {
                assert_eq!(missing, vec![API_TOKEN_KEY]);
            }
            other => panic!("expected misconfiguration, got {other:?}"),
        }
    }

    #[test]
    fn empty_values_count_as_missing() {
        let config = StaticConfig::with_credentials("", "");

        match Credentials::load(&config) {
            Err(TrackError::ServerMisconfigured { missing }) => {
                assert_eq!(missing, vec![API_TOKEN_KEY, ACCOUNT_ID_KEY]);
            }
            other => panic!("expected misconfiguration, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_hides_token() {
        let credentials = Credentials {
            api_token: "super-secret".to_string(),
            account_id: "acc".to_string(),
        };

        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("acc"));
    }

    #[test]
    fn server_config_defaults() {
        let server = ServerConfig::load(&StaticConfig::new()).unwrap();

        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 80);
    }

    #[test]
    fn server_config_rejects_bad_port() {
        let config = StaticConfig::new().with("PORT", "eighty");

        assert!(ServerConfig::load(&config).is_err());
    }
}
