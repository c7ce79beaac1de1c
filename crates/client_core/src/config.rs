use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::domain::OwnerId;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://mate.academy/students-api";
pub const DEFAULT_CONFIG_FILE: &str = "todo.toml";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no owner id configured; set TODO_OWNER_ID or owner_id in todo.toml")]
    MissingOwnerId,
    #[error("invalid owner id '{0}': expected a positive integer")]
    InvalidOwnerId(String),
    #[error("invalid api url '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid request timeout '{0}'")]
    InvalidTimeout(String),
    #[error("failed to read config file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub owner_id: Option<i64>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            owner_id: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_url: Option<String>,
    owner_id: Option<i64>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Defaults, then the config file, then the process environment.
    ///
    /// An explicit `config_path` must exist. The default `todo.toml` is
    /// optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        match config_path {
            Some(path) => settings.apply_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    settings.apply_file(path)?;
                }
            }
        }
        settings.apply_env(|name| std::env::var(name).ok())?;
        Ok(settings)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_toml(&mut self, raw: &str) -> Result<(), toml::de::Error> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_url {
            self.api_url = v;
        }
        if let Some(v) = file_cfg.owner_id {
            self.owner_id = Some(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    /// `APP__*` variables win over the short `TODO_*` names.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = read("TODO_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = read("APP__API_URL") {
            self.api_url = v;
        }

        for name in ["TODO_OWNER_ID", "APP__OWNER_ID"] {
            if let Some(v) = read(name) {
                self.owner_id = Some(parse_owner_id(&v)?);
            }
        }

        if let Some(v) = read("APP__REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(v.clone()))?;
        }

        Ok(())
    }

    pub fn with_overrides(mut self, api_url: Option<String>, owner_id: Option<i64>) -> Self {
        if let Some(v) = api_url {
            self.api_url = v;
        }
        if let Some(v) = owner_id {
            self.owner_id = Some(v);
        }
        self
    }

    /// The owner id is a hard precondition: without it no view can start.
    pub fn require_owner(&self) -> Result<OwnerId, ConfigError> {
        match self.owner_id {
            None => Err(ConfigError::MissingOwnerId),
            Some(id) if id <= 0 => Err(ConfigError::InvalidOwnerId(id.to_string())),
            Some(id) => Ok(OwnerId(id)),
        }
    }

    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_url.trim();
        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(raw.to_string()));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn parse_owner_id(raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::InvalidOwnerId(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
