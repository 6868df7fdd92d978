//! CLI configuration

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration, read from `<config dir>/hostel/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Daemon endpoint
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,

    /// Shared secret used to sign webhook submissions
    pub webhook_secret: Option<String>,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("hostel").join("config.toml"))
    }

    /// Request timeout, defaulting to 30 seconds
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds.unwrap_or(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.endpoint.is_none());
        assert!(config.webhook_secret.is_none());
        assert_eq!(config.timeout().as_secs(), 30);
    }

    #[test]
    fn test_load_missing_config() {
        let config = CliConfig::load(Some("/nonexistent/path/config.toml")).unwrap();
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "endpoint = \"http://hostel.local:9000\"\ntimeout_seconds = 5\nwebhook_secret = \"s3cret\""
        )
        .unwrap();

        let config = CliConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://hostel.local:9000"));
        assert_eq!(config.timeout().as_secs(), 5);
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_seconds = \"soon\"").unwrap();

        assert!(matches!(
            CliConfig::load(file.path().to_str()),
            Err(CliError::Config(_))
        ));
    }
}
