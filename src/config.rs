use dotenvy::dotenv;
use std::env;

use crate::form::FormLimits;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_FORM_BYTES: usize = 256 * 1024;
pub const DEFAULT_MAX_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Server settings, built once at startup and handed to the app factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Cap on URL-encoded request bodies.
    pub max_form_bytes: usize,
    /// Cap on each multipart text field.
    pub max_field_bytes: usize,
    /// CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_form_bytes: DEFAULT_MAX_FORM_BYTES,
            max_field_bytes: DEFAULT_MAX_FIELD_BYTES,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read settings from the process environment, loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v.clone(),
                expected: "port number",
            })?,
            None => defaults.port,
        };

        let max_form_bytes = parse_size(get("MAX_FORM_BYTES"), "MAX_FORM_BYTES", defaults.max_form_bytes)?;
        let max_field_bytes = parse_size(get("MAX_FIELD_BYTES"), "MAX_FIELD_BYTES", defaults.max_field_bytes)?;

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            max_form_bytes,
            max_field_bytes,
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Caps applied to multipart bodies; the form cap also bounds URL-encoded ones.
    pub fn form_limits(&self) -> FormLimits {
        FormLimits {
            max_field_bytes: self.max_field_bytes,
            max_form_bytes: self.max_form_bytes,
        }
    }
}

fn parse_size(value: Option<String>, name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match value {
        Some(v) => match v.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid {
                name,
                value: v,
                expected: "positive byte count",
            }),
        },
        None => Ok(default),
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 8080));
    }

    #[test]
    fn test_reads_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("MAX_FORM_BYTES", "1024"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, https://example.com,"),
        ]))
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_form_bytes, 1024);
        assert_eq!(config.max_field_bytes, DEFAULT_MAX_FIELD_BYTES);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000".to_string(), "https://example.com".to_string()]
        );
    }

    #[test]
    fn test_invalid_port_is_error() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_size_is_error() {
        assert!(ServerConfig::from_lookup(lookup(&[("MAX_FIELD_BYTES", "0")])).is_err());
    }
}
