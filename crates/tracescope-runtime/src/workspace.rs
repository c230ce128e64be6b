use std::path::{Path, PathBuf};
use tracescope_engine::RuleCatalog;

use crate::config::{Config, WorkspacePaths};
use crate::notes::{DEFAULT_TEMPLATE, EscalationTemplate};
use crate::store::SessionStore;
use crate::{Error, Result};

/// Starter catalog written by `init`
pub const DEFAULT_CATALOG: &str = include_str!("../assets/default_catalog.json");

/// Loaded configuration, catalog and session store for one data directory
pub struct Workspace {
    paths: WorkspacePaths,
    catalog: RuleCatalog,
    store: SessionStore,
}

/// Files written (or found) by [`Workspace::init`]
#[derive(Debug, Clone, Default)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
}

impl Workspace {
    /// Read `config.toml` and resolve every path against `data_dir`.
    pub fn locate(data_dir: &Path) -> Result<(Config, WorkspacePaths)> {
        let config = Config::load_from(&data_dir.join(crate::config::CONFIG_FILE))?;
        let paths = config.resolve(data_dir);
        Ok((config, paths))
    }

    /// Open an initialized workspace. A catalog that fails to load is fatal.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let (_, paths) = Self::locate(data_dir)?;
        let catalog = RuleCatalog::load(&paths.catalog)?;
        let store = SessionStore::open(paths.sessions.clone())?;

        tracing::debug!(
            data_dir = %data_dir.display(),
            rules = catalog.len(),
            "workspace opened"
        );
        Ok(Self {
            paths,
            catalog,
            store,
        })
    }

    /// Write default config, catalog and template where missing.
    pub fn init(data_dir: &Path) -> Result<InitReport> {
        std::fs::create_dir_all(data_dir).map_err(Error::at(data_dir))?;
        let (config, paths) = Self::locate(data_dir)?;
        let mut report = InitReport::default();

        if paths.config.exists() {
            report.existing.push(paths.config.clone());
        } else {
            config.save_to(&paths.config)?;
            report.created.push(paths.config.clone());
        }

        for (path, content) in [
            (&paths.catalog, DEFAULT_CATALOG),
            (&paths.template, DEFAULT_TEMPLATE),
        ] {
            if path.exists() {
                report.existing.push(path.clone());
                continue;
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(Error::at(parent))?;
            }
            std::fs::write(path, content).map_err(Error::at(path))?;
            report.created.push(path.clone());
        }

        std::fs::create_dir_all(&paths.sessions).map_err(Error::at(&paths.sessions))?;
        tracing::info!(data_dir = %data_dir.display(), created = report.created.len(), "workspace initialized");
        Ok(report)
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.store
    }

    pub fn escalation_template(&self) -> Result<EscalationTemplate> {
        Ok(EscalationTemplate::load(&self.paths.template)?)
    }
}
