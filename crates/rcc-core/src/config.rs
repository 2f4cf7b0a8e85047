//! rcc configuration
//!
//! Defaults may be overridden by `config.toml` in the cache root. The cache root
//! itself is resolved from `--cache-dir`, then `RCC_CACHE_DIR`, then the platform
//! cache directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RccError, Result};

pub const CONFIG_FILE: &str = "config.toml";
pub const CACHE_DIR_ENV_VAR: &str = "RCC_CACHE_DIR";
const CACHE_DIR_NAME: &str = "rcc";

pub const DEFAULT_COMPILER: &str = "g++";
pub const DEFAULT_STD: &str = "c++17";

fn default_compiler() -> String {
    DEFAULT_COMPILER.to_string()
}

fn default_std() -> String {
    DEFAULT_STD.to_string()
}

fn default_cxxflags() -> Vec<String> {
    [
        "-Wall",
        "-Wextra",
        "-Wno-unused-variable",
        "-Wno-unused-parameter",
        "-Wno-unused-function",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RccConfig {
    /// Compiler used when none is given on the command line
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Language standard, e.g. `c++17`
    #[serde(default = "default_std")]
    pub std: String,

    /// Compiler flags placed before any given on the command line
    #[serde(default = "default_cxxflags")]
    pub cxxflags: Vec<String>,

    #[serde(default)]
    pub janitor: JanitorConfig,
}

impl Default for RccConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            std: default_std(),
            cxxflags: default_cxxflags(),
            janitor: JanitorConfig::default(),
        }
    }
}

/// Background eviction of ephemeral artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Artifacts not accessed for this many days are deleted
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,

    /// A sweep runs on average once every `one_in` invocations (0 disables)
    #[serde(default = "default_one_in")]
    pub one_in: u32,
}

fn default_max_age_days() -> u32 {
    30
}

fn default_one_in() -> u32 {
    256
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            max_age_days: default_max_age_days(),
            one_in: default_one_in(),
        }
    }
}

impl RccConfig {
    /// Load `config.toml` from the cache root, or defaults if absent
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RccError::io_operation("read config", path.display(), e))?;
        let config: RccConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), compiler = %config.compiler, "config_loaded");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| RccError::FailedOperation {
            operation: "serialize config".to_string(),
            reason: e.to_string(),
        })?;
        fs::write(path, content)
            .map_err(|e| RccError::io_operation("write config", path.display(), e))?;
        Ok(())
    }
}

/// Resolve the cache root: explicit path, `RCC_CACHE_DIR`, then `<cache dir>/rcc`
pub fn resolve_cache_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_dir) = std::env::var(CACHE_DIR_ENV_VAR) {
        if !env_dir.is_empty() {
            return Ok(PathBuf::from(env_dir));
        }
    }
    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_DIR_NAME))
        .ok_or_else(|| RccError::Other("unable to determine cache directory".to_string()))
}
