use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "LATTICE_CONFIG";
pub const DEFAULT_CONFIG_DIR: &str = ".lattice";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeConfig {
    pub file_path: PathBuf,
    pub target: Option<TargetConfig>,
    pub logging: LoggingConfig,
}

impl LatticeConfig {
    /// Configuration used when no file exists yet.
    pub fn empty(file_path: PathBuf) -> Self {
        Self {
            file_path,
            target: None,
            logging: LoggingConfig::default(),
        }
    }

    pub fn require_target(&self) -> Result<&TargetConfig> {
        self.target.as_ref().ok_or(Error::NoTarget)
    }
}

/// Backend installation the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// System domain; app routes are `<process guid>.<domain>`.
    pub domain: String,
    pub receptor_url: String,
    pub log_url: String,
}

impl TargetConfig {
    /// Derive the conventional receptor and log endpoints from a system domain.
    pub fn from_domain(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            receptor_url: format!("http://receptor.{domain}"),
            log_url: format!("http://doppler.{domain}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when `LATTICE_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<RawTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logging: Option<RawLogging>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    receptor_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLogging {
    #[serde(default)]
    level: Option<String>,
}

impl RawConfig {
    fn into_validated(self, path: &Path) -> Result<LatticeConfig> {
        let target = match self.target {
            Some(raw) => Some(raw.into_validated(path)?),
            None => None,
        };

        let level = self
            .logging
            .and_then(|logging| logging.level)
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(LatticeConfig {
            file_path: path.to_path_buf(),
            target,
            logging: LoggingConfig { level },
        })
    }

    fn from_config(config: &LatticeConfig) -> Self {
        let defaults = config
            .target
            .as_ref()
            .map(|target| TargetConfig::from_domain(&target.domain));
        let target = config.target.as_ref().map(|target| RawTarget {
            domain: target.domain.clone(),
            receptor_url: Some(target.receptor_url.clone())
                .filter(|url| defaults.as_ref().map(|d| &d.receptor_url) != Some(url)),
            log_url: Some(target.log_url.clone())
                .filter(|url| defaults.as_ref().map(|d| &d.log_url) != Some(url)),
        });
        let logging = (config.logging != LoggingConfig::default()).then(|| RawLogging {
            level: Some(config.logging.level.clone()),
        });
        Self { target, logging }
    }
}

impl RawTarget {
    fn into_validated(self, path: &Path) -> Result<TargetConfig> {
        let domain = self.domain.trim().to_string();
        validate_domain(&domain).map_err(|message| invalid_config(path, message))?;

        let mut target = TargetConfig::from_domain(&domain);
        if let Some(url) = self.receptor_url {
            validate_url(&url).map_err(|message| {
                invalid_config(path, format!("[target].receptor_url {message}"))
            })?;
            target.receptor_url = url;
        }
        if let Some(url) = self.log_url {
            validate_url(&url)
                .map_err(|message| invalid_config(path, format!("[target].log_url {message}")))?;
            target.log_url = url;
        }
        Ok(target)
    }
}

fn invalid_config(path: &Path, message: impl Into<String>) -> Error {
    Error::InvalidConfig {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Check that `domain` is a bare host name suitable for building routes.
pub fn validate_domain(domain: &str) -> std::result::Result<(), String> {
    if domain.is_empty() {
        return Err("target domain must not be empty".to_string());
    }
    if domain.contains("://") {
        return Err(format!(
            "target domain `{domain}` must not include a scheme (use e.g. `example.com`)"
        ));
    }
    if domain.contains('/') || domain.chars().any(char::is_whitespace) {
        return Err(format!(
            "target domain `{domain}` must be a bare host name without paths or spaces"
        ));
    }
    Ok(())
}

fn validate_url(url: &str) -> std::result::Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("`{url}` must start with http:// or https://"))
    }
}

/// Resolve the configuration path: `$LATTICE_CONFIG`, else `~/.lattice/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    user_home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILE)
}

/// Load configuration from `path`. A missing file yields an empty configuration.
pub fn load_config(path: &Path) -> Result<LatticeConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(LatticeConfig::empty(path.to_path_buf()));
        }
        Err(source) => {
            return Err(Error::ReadConfig {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let raw: RawConfig = toml::from_str(&contents).map_err(|source| Error::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;

    raw.into_validated(path)
}

/// Persist `config` to its `file_path`, creating the parent directory when needed.
pub fn write_config(config: &LatticeConfig) -> Result<()> {
    let path = &config.file_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let contents = toml::to_string(&RawConfig::from_config(config))
        .map_err(|source| Error::SerializeConfig { source })?;
    fs::write(path, contents).map_err(|source| Error::WriteConfig {
        path: path.clone(),
        source,
    })
}

pub(crate) fn user_home_dir() -> Option<PathBuf> {
    if let Some(home) = env::var_os("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    #[cfg(windows)]
    {
        if let Some(profile) = env::var_os("USERPROFILE") {
            if !profile.is_empty() {
                return Some(PathBuf::from(profile));
            }
        }
    }

    None
}
