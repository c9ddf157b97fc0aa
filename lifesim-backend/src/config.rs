use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 10000;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Public base URL for links handed back to clients; derived from the
    /// request `Host` header when unset.
    pub base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset, the same way `${PORT:-10000}` does.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::ConfigError(format!("Invalid PORT: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://life_sim.db?mode=rwc".to_string()),

            port,

            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),

            base_url: var("BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// Bound on all interfaces.
    pub fn server_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.static_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_port() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.server_address(), "0.0.0.0:10000");
    }

    #[test]
    fn test_port_override() {
        let config = config_from(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_port_falls_back_to_default() {
        let config = config_from(&[("PORT", "")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config_from(&[("PORT", "70000")]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_log_dir_lives_under_static_dir() {
        let config = config_from(&[("STATIC_DIR", "/srv/www")]).unwrap();
        assert_eq!(config.log_dir(), PathBuf::from("/srv/www/logs"));

        let config = config_from(&[]).unwrap();
        assert_eq!(config.log_dir(), PathBuf::from("static").join("logs"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = config_from(&[("BASE_URL", "https://sim.example.com/")]).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://sim.example.com"));
    }
}
