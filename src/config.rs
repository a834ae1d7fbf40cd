use crate::models::{DEFAULT_OUT_SR, DEFAULT_SERVICE_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ArcGIS services root holding the boundary layers
    pub service_url: String,
    pub timeout_secs: u64,
    /// Spatial reference (WKID) requested for geometry
    pub out_sr: u32,
    pub user_agent: String,
    pub tls: TlsConfig,
}

/// Trust settings for the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TlsConfig {
    /// Skip certificate verification entirely
    pub accept_invalid_certs: bool,
    /// Extra PEM root certificate to trust
    pub root_certificate: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: 30,
            out_sr: DEFAULT_OUT_SR,
            user_agent: format!("boundaries/{}", env!("CARGO_PKG_VERSION")),
            tls: TlsConfig::default(),
        }
    }
}

impl Config {
    /// Load from the user config directory, or defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push("boundaries");
        path.push("config.toml");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/boundaries.toml")).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.out_sr, 4326);
        assert!(!config.tls.accept_invalid_certs);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "timeout_secs = 5\n\n[tls]\nroot_certificate = \"/etc/ssl/corp.pem\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(
            config.tls.root_certificate,
            Some(PathBuf::from("/etc/ssl/corp.pem"))
        );
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
