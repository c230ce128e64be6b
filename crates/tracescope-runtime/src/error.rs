use std::path::{Path, PathBuf};
use tracescope_engine::CatalogLoadError;

use crate::notes::TemplateError;

/// Result type for tracescope-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rule catalog could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),

    /// Escalation template could not be loaded
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO failure on a known path
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("A session named '{0}' already exists")]
    SessionExists(String),

    #[error("Invalid session name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("No readable log content found among the given files")]
    NoReadableContent,

    #[error("No trace matches '{0}'")]
    TraceNotFound(String),

    #[error("Failed to scan directory: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    /// Adapter for `map_err` that attaches `path` to an IO error
    pub(crate) fn at(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::File {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
