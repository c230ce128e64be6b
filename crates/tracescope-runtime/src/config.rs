use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. TRACESCOPE_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.tracescope
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("TRACESCOPE_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("tracescope"));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".tracescope"));
    }

    Err(Error::Config(
        "Could not determine data directory: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// `config.toml` in the data directory. Relative paths are relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON rule catalog
    pub catalog_path: PathBuf,
    /// Root of the session store
    pub sessions_dir: PathBuf,
    pub escalation_template: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("exceptions_data.json"),
            sessions_dir: PathBuf::from("sessions"),
            escalation_template: PathBuf::from("EscalationTemplate.md"),
        }
    }
}

/// Absolute locations derived from a [`Config`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspacePaths {
    pub data_dir: PathBuf,
    pub config: PathBuf,
    pub catalog: PathBuf,
    pub sessions: PathBuf,
    pub template: PathBuf,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(Error::at(path))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(Error::at(path))?;
        Ok(())
    }

    pub fn resolve(&self, data_dir: &Path) -> WorkspacePaths {
        let resolve = |p: &Path| {
            let p = p.to_str().map(expand_tilde).unwrap_or_else(|| p.to_path_buf());
            if p.is_absolute() { p } else { data_dir.join(p) }
        };

        WorkspacePaths {
            data_dir: data_dir.to_path_buf(),
            config: data_dir.join(CONFIG_FILE),
            catalog: resolve(&self.catalog_path),
            sessions: resolve(&self.sessions_dir),
            template: resolve(&self.escalation_template),
        }
    }
}
