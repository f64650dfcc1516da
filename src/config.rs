//! Process configuration loaded from the environment.
//!
//! `.env` is loaded by the binary before [`Config::from_env`] runs, so
//! values there behave exactly like exported variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::error::ConfigError;

/// Default port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5001;

/// Default bind host when `HOST` is not set.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Environment variables that must be present at startup.
const REQUIRED_VARS: [&str; 2] = ["HTTP_USERNAME", "HTTP_PASSWORD"];

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub credentials: BasicCredentials,
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Resolve the socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e| ConfigError::InvalidValue {
            key: "HOST".to_string(),
            reason: format!("'{}' is not an IP address: {}", self.host, e),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Shared-secret credential pair for HTTP basic auth.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: SecretString,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Constant-time check of a presented username/password pair.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self
            .password
            .expose_secret()
            .as_bytes()
            .ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

/// Logging options.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Raise the default filter to `debug`.
    pub debug: bool,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Append dispatch payload events to this file.
    pub payload_log: Option<PathBuf>,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|&&key| get(key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        let port = match get("PORT") {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let username = get("HTTP_USERNAME").unwrap_or_default();
        let password = get("HTTP_PASSWORD").unwrap_or_default();

        Ok(Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            credentials: BasicCredentials::new(username, password),
            logging: LoggingConfig {
                debug: get("DEBUG").is_some_and(|v| is_truthy(&v)),
                json: get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
                payload_log: get("SWAIG_PAYLOAD_LOG").map(PathBuf::from),
            },
        })
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidPort(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("HTTP_USERNAME", "admin"),
            ("HTTP_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert!(!config.logging.debug);
        assert!(config.logging.payload_log.is_none());
        assert!(config.credentials.matches("admin", "secret"));
    }

    #[test]
    fn test_missing_credentials_reported_together() {
        let err = Config::from_lookup(lookup(&[("PORT", "8080")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: HTTP_USERNAME, HTTP_PASSWORD"
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[
            ("HTTP_USERNAME", "admin"),
            ("HTTP_PASSWORD", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(ref v) if v == &["HTTP_PASSWORD"]));
    }

    #[test]
    fn test_port_must_be_numeric() {
        let err = Config::from_lookup(lookup(&[
            ("HTTP_USERNAME", "admin"),
            ("HTTP_PASSWORD", "secret"),
            ("PORT", "50a1"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "PORT environment variable must be a number");

        let err = Config::from_lookup(lookup(&[
            ("HTTP_USERNAME", "admin"),
            ("HTTP_PASSWORD", "secret"),
            ("PORT", "99999"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_logging_options() {
        let config = Config::from_lookup(lookup(&[
            ("HTTP_USERNAME", "admin"),
            ("HTTP_PASSWORD", "secret"),
            ("DEBUG", "1"),
            ("LOG_FORMAT", "JSON"),
            ("SWAIG_PAYLOAD_LOG", "/tmp/payload.log"),
        ]))
        .unwrap();

        assert!(config.logging.debug);
        assert!(config.logging.json);
        assert_eq!(
            config.logging.payload_log,
            Some(PathBuf::from("/tmp/payload.log"))
        );
    }

    #[test]
    fn test_credentials_reject_mismatch() {
        let creds = BasicCredentials::new("admin", "secret");
        assert!(!creds.matches("admin", "wrong"));
        assert!(!creds.matches("root", "secret"));
        assert!(!creds.matches("", ""));
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:5001");

        let bad = ServerConfig {
            host: "not-an-ip".to_string(),
            port: 5001,
        };
        assert!(bad.socket_addr().is_err());
    }
}
