use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, Result};

pub const DEFAULT_HOMEPAGE_URL: &str = "https://thehackernews.com/";
const DEFAULT_DB_FILE: &str = "the_hacker_news.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Unset means `the_hacker_news.db` in the working directory of each run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,

    #[serde(default = "default_homepage_url")]
    pub homepage_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_homepage_url() -> String {
    DEFAULT_HOMEPAGE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("hn-tracker/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            homepage_url: default_homepage_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.homepage()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The store file: the configured path, or the default file name inside
    /// `working_dir`.
    pub fn db_path_in(&self, working_dir: &Path) -> PathBuf {
        match &self.db_path {
            Some(path) => PathBuf::from(path),
            None => working_dir.join(DEFAULT_DB_FILE),
        }
    }

    /// The store file, resolved against the current working directory.
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(self.db_path_in(&cwd))
    }

    pub fn homepage(&self) -> Result<Url> {
        let url = Url::parse(&self.homepage_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AppError::Config(format!(
                "homepage_url must be http or https, got {other}"
            ))),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hn-tracker")
            .join("config.toml")
    }
}
