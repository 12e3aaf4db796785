use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::SessionError;

/// Server used when neither the config nor the user picked one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    15
}

fn default_settle_delay() -> u64 {
    800
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            data_dir: None,
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

impl Settings {
    /// Load from `config_path` (optional) overlaid by `COINVERSE__*`
    /// environment variables.
    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("COINVERSE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server_url.trim().is_empty() {
            return Err("server_url is required".to_string());
        }
        match Url::parse(self.server_url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err("server_url must be a valid HTTP(S) URL".to_string()),
        }
        if self.connect_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err("timeouts must be at least one second".to_string());
        }
        Ok(())
    }

    /// Directory holding the persisted token and server address.
    pub fn data_dir(&self) -> Result<PathBuf, SessionError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("coinverse"))
            .ok_or_else(|| SessionError::Configuration("Could not find config directory".to_string()))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_recommended_values() {
        let settings = Settings::default();
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.read_timeout(), Duration::from_secs(15));
        assert_eq!(settings.settle_delay(), Duration::from_millis(800));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn loads_overrides_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "server_url = \"https://ledger.example.com\"").unwrap();
        writeln!(file, "settle_delay_ms = 0").unwrap();

        let settings = Settings::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.server_url, "https://ledger.example.com");
        assert_eq!(settings.settle_delay(), Duration::ZERO);
        assert_eq!(settings.read_timeout_secs, 15);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load("/nonexistent/coinverse-test-config.toml").unwrap();
        assert_eq!(settings.connect_timeout_secs, 10);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut settings = Settings {
            server_url: "ftp://example.com".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        settings.server_url = "  ".to_string();
        assert!(settings.validate().is_err());

        settings.server_url = "httpfoo://example.com".to_string();
        assert!(settings.validate().is_err());

        settings.server_url = "https://ledger.example.com/".to_string();
        assert!(settings.validate().is_ok());

        settings.server_url = DEFAULT_SERVER_URL.to_string();
        settings.read_timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/tmp/coinverse-data")),
            ..Settings::default()
        };
        assert_eq!(settings.data_dir().unwrap(), PathBuf::from("/tmp/coinverse-data"));
    }
}
