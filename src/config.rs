//! Configuration loading for prflow
//!
//! Settings live in `~/.prflowrc.toml`. The file is optional; when it is
//! absent, the token falls back to the `GITHUB_TOKEN` / `GH_TOKEN`
//! environment variables.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the config file within the home directory
const CONFIG_FILE: &str = ".prflowrc.toml";

/// User configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GitHub personal access token
    pub token: Option<String>,
    /// Labels applied to PRs created by `prflow upload --title`
    #[serde(default)]
    pub pr_labels: Vec<String>,
}

impl Config {
    /// Load configuration from the user's home directory.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        let Some(home) = dirs::home_dir() else {
            return Ok(Self::default());
        };
        Self::load_from(&home.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Resolve the GitHub token.
    ///
    /// Priority:
    /// 1. `token` in the config file
    /// 2. `GITHUB_TOKEN` environment variable
    /// 3. `GH_TOKEN` environment variable
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = &self.token
            && !token.is_empty()
        {
            return Ok(token.clone());
        }

        for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
            if let Ok(token) = env::var(var)
                && !token.is_empty()
            {
                return Ok(token);
            }
        }

        Err(Error::Auth(format!(
            "no GitHub token found. Set \"token\" in ~/{CONFIG_FILE} or export GITHUB_TOKEN"
        )))
    }

    /// Path the config would be loaded from, for diagnostics
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_FILE))
    }
}
