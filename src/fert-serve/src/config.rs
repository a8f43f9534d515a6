//! Proxy configuration read from the process environment

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_REGION: &str = "us-central1";
pub const DEFAULT_EMULATOR_HOST: &str = "localhost:5001";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

pub const ENV_PROJECT: &str = "GCLOUD_PROJECT";
pub const ENV_REGION: &str = "FUNCTION_REGION";
pub const ENV_MODE: &str = "APP_ENV";
pub const ENV_SERVICE_ACCOUNT: &str = "FIREBASE_SERVICE_ACCOUNT_KEY";
pub const ENV_EMULATOR_HOST: &str = "FUNCTIONS_EMULATOR_HOST";
pub const ENV_LISTEN_ADDR: &str = "PROXY_ADDR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("APP_ENV must be 'development' or 'production', got '{0}'")]
    UnknownMode(String),

    #[error("PROXY_ADDR is not a socket address: '{0}'")]
    BadListenAddr(String),
}

/// Development talks to the local functions emulator and tolerates
/// credential failures; production talks to the hosted functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    pub fn is_development(&self) -> bool {
        *self == RuntimeMode::Development
    }
}

impl Default for RuntimeMode {
    fn default() -> Self {
        RuntimeMode::Production
    }
}

impl FromStr for RuntimeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            _ => Err(ConfigError::UnknownMode(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Cloud project hosting the classification functions
    pub project_id: Option<String>,

    /// Region the functions are deployed to
    pub region: String,

    pub mode: RuntimeMode,

    /// Raw service account JSON for the admin credential
    pub service_account_key: Option<String>,

    /// `host:port` of the local functions emulator
    pub emulator_host: String,

    pub listen_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_id: None,
            region: DEFAULT_REGION.to_owned(),
            mode: RuntimeMode::default(),
            service_account_key: None,
            emulator_host: DEFAULT_EMULATOR_HOST.to_owned(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source. Values are trimmed and empty
    /// ones count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        let mode = match get(ENV_MODE) {
            Some(raw) => raw.parse()?,
            None => defaults.mode,
        };

        let listen_addr = match get(ENV_LISTEN_ADDR) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::BadListenAddr(raw.clone()))?,
            None => defaults.listen_addr,
        };

        Ok(Config {
            project_id: get(ENV_PROJECT),
            region: get(ENV_REGION).unwrap_or(defaults.region),
            mode,
            service_account_key: get(ENV_SERVICE_ACCOUNT),
            emulator_host: get(ENV_EMULATOR_HOST).unwrap_or(defaults.emulator_host),
            listen_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.project_id, None);
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.mode, RuntimeMode::Production);
        assert_eq!(config.emulator_host, DEFAULT_EMULATOR_HOST);
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            (ENV_PROJECT, "smart-fert"),
            (ENV_REGION, "asia-northeast1"),
            (ENV_MODE, "development"),
            (ENV_SERVICE_ACCOUNT, "{}"),
            (ENV_EMULATOR_HOST, "127.0.0.1:5002"),
            (ENV_LISTEN_ADDR, "0.0.0.0:8080"),
        ]))
        .unwrap();

        assert_eq!(config.project_id.as_deref(), Some("smart-fert"));
        assert_eq!(config.region, "asia-northeast1");
        assert!(config.mode.is_development());
        assert_eq!(config.service_account_key.as_deref(), Some("{}"));
        assert_eq!(config.emulator_host, "127.0.0.1:5002");
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn empty_region_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[(ENV_REGION, "")])).unwrap();
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn values_are_trimmed() {
        let config = Config::from_lookup(lookup(&[
            (ENV_PROJECT, " smart-fert\n"),
            (ENV_REGION, " us-east1"),
            (ENV_EMULATOR_HOST, "127.0.0.1:5002 "),
        ]))
        .unwrap();

        assert_eq!(config.project_id.as_deref(), Some("smart-fert"));
        assert_eq!(config.region, "us-east1");
        assert_eq!(config.emulator_host, "127.0.0.1:5002");
        assert_eq!(
            crate::backend::function_url(&config, "smart-fert", "classify_rice"),
            "https://us-east1-smart-fert.cloudfunctions.net/classify_rice"
        );
    }

    #[test]
    fn rejects_unknown_mode_and_bad_address() {
        assert_eq!(
            Config::from_lookup(lookup(&[(ENV_MODE, "staging")])).unwrap_err(),
            ConfigError::UnknownMode("staging".to_owned())
        );
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_LISTEN_ADDR, "localhost")])),
            Err(ConfigError::BadListenAddr(_))
        ));
    }
}
