use crate::error::{Result, ShelfError};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://audioteka.com";
pub const DEFAULT_LOCALE: &str = "cz";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: default_base_url(),
            locale: default_locale(),
            output_dir: default_output_dir(),
            username: None,
            user_agent: None,
        }
    }
}

impl Config {
    /// Loads the config from `~/.shelfdl/config.json`, writing the defaults on first use.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::ensure_dir_exists(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ShelfError::config_error(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ShelfError::config_error(format!(
                "base_url must be http or https, got '{}'",
                self.base_url
            )));
        }
        if self.locale.is_empty() || self.locale.contains('/') {
            return Err(ShelfError::config_error(format!(
                "invalid locale '{}'",
                self.locale
            )));
        }
        Ok(())
    }

    /// `{base_url}/{locale}/{path}`
    pub fn page_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.locale,
            path.trim_start_matches('/')
        )
    }
}

pub fn get_shelfdl_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".shelfdl"))
        .ok_or(ShelfError::HomeDirectoryNotFound)
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_shelfdl_dir()?.join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_writes_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "locale": "sk", "username": "reader" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.locale, "sk");
        assert_eq!(config.username.as_deref(), Some("reader"));
    }

    #[test]
    fn test_invalid_base_url() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "base_url": "ftp://example.com" }"#).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ShelfError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_page_url() {
        let config = Config {
            base_url: "https://audioteka.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.page_url("/my-shelf"),
            "https://audioteka.com/cz/my-shelf"
        );
    }
}
