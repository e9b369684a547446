//! Front-end settings, resolved once at start-up.
//!
//! Precedence, highest first: command-line flags, `DOCLINE_*` environment
//! variables, `<data_dir>/config.yaml`, built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use docline_core::{DEFAULT_BASE_URL, DispatcherConfig};

pub const ENV_BACKEND_URL: &str = "DOCLINE_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "DOCLINE_TIMEOUT_SECS";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command that starts the bundled backend when `--spawn-backend` is given
pub fn default_backend_command() -> Vec<String> {
    ["go", "run", "modes/server.go"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Default data directory (`~/.docline/`)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".docline")
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
    InvalidEnv { name: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ConfigError::InvalidEnv { name, value } => {
                write!(f, "Invalid value for {}: {:?}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Contents of `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.yaml")
    }

    /// Load `config.yaml`; a missing or empty file yields the defaults.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_saphyr::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        let yaml = serde_saphyr::to_string(self)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize config: {}", e)))?;

        fs::create_dir_all(data_dir).map_err(|e| ConfigError::Io(e.to_string()))?;
        fs::write(Self::path(data_dir), yaml)
            .map_err(|e| ConfigError::Io(format!("Failed to write config: {}", e)))
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved front-end settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub backend_url: String,
    /// `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub log_level: String,
    pub backend_command: Vec<String>,
}

impl Settings {
    /// Read `config.yaml` from `data_dir` and resolve against the process environment.
    pub fn load(data_dir: PathBuf, overrides: Overrides) -> Result<Self, ConfigError> {
        let file = FileConfig::load(&data_dir)?;
        Self::resolve(data_dir, overrides, file, |name| std::env::var(name).ok())
    }

    /// Merge every source; `env` looks up an environment variable by name.
    pub fn resolve(
        data_dir: PathBuf,
        overrides: Overrides,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env_timeout = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_SECS,
                value: raw,
            })?),
            None => None,
        };

        let backend_url = overrides
            .backend_url
            .or_else(|| env(ENV_BACKEND_URL))
            .or(file.backend_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Zero disables the timeout
        let timeout = overrides
            .timeout_secs
            .or(env_timeout)
            .or(file.timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let log_level = overrides
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let backend_command = file
            .backend_command
            .filter(|cmd| !cmd.is_empty())
            .unwrap_or_else(default_backend_command);

        Ok(Self {
            data_dir,
            backend_url,
            timeout,
            log_level,
            backend_command,
        })
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            base_url: self.backend_url.clone(),
            timeout: self.timeout,
        }
    }
}
