//! Configuration management for meander.
//!
//! Configuration is read from `~/.config/meander/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub preload: PreloadConfig,
}

/// Encyclopedia API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Query endpoint, a MediaWiki `api.php` URL.
    pub endpoint: String,
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Pages requested per random discovery batch.
    pub random_batch_size: u32,
    /// Maximum search index hits hydrated per submitted term.
    pub search_limit: u32,
    /// Maximum linked pages per related lookup.
    pub related_limit: u32,
    /// Character budget for the plain-text intro extract.
    pub extract_chars: u32,
    /// Bounding pixel size for thumbnails.
    pub thumb_size: u32,
    /// Maximum concurrent API requests.
    pub workers: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://en.wikipedia.org/w/api.php".into(),
            user_agent: "meander/0.1.0".into(),
            timeout_secs: 10,
            random_batch_size: 40,
            search_limit: 10,
            related_limit: 10,
            extract_chars: 1000,
            thumb_size: 400,
            workers: 8,
        }
    }
}

/// Thumbnail preloader settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum concurrent image probes.
    pub workers: usize,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            workers: 8,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file fall back to default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/meander/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("meander").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Meander Configuration

[api]
# MediaWiki query endpoint
endpoint = "https://en.wikipedia.org/w/api.php"

# User agent sent with every request
user_agent = "meander/0.1.0"

# Per-request timeout in seconds
timeout_secs = 10

# Pages requested per random discovery batch
random_batch_size = 40

# Maximum search hits hydrated per submitted term
search_limit = 10

# Maximum linked pages per related lookup
related_limit = 10

# Character budget for the plain-text intro extract
extract_chars = 1000

# Bounding pixel size for thumbnails
thumb_size = 400

# Maximum concurrent API requests
workers = 8

[preload]
# Per-probe timeout in seconds
timeout_secs = 10

# Maximum concurrent image probes
workers = 8
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.api.random_batch_size, 40);
        assert_eq!(config.api.thumb_size, 400);
        assert_eq!(config.preload.workers, 8);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[api]
random_batch_size = 15
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom value
        assert_eq!(config.api.random_batch_size, 15);
        // Default values
        assert_eq!(config.api.extract_chars, 1000);
        assert_eq!(config.preload.timeout_secs, 10);
    }

    #[test]
    fn test_empty_config() {
        let content = "";
        let config: Config = toml::from_str(content).expect("Empty config should work");

        assert_eq!(config.api.endpoint, "https://en.wikipedia.org/w/api.php");
        assert_eq!(config.api.search_limit, 10);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nuser_agent = \"meander-test/0\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.user_agent, "meander-test/0");
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nnot toml").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
