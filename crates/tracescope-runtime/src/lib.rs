pub mod config;
pub mod error;
pub mod ingest;
pub mod notes;
pub mod store;
pub mod workspace;

pub use config::{Config, WorkspacePaths, resolve_data_dir};
pub use error::{Error, Result};
pub use notes::{EscalationTemplate, TemplateError, export_file_name, export_notes};
pub use store::{Reanalysis, SessionStore};
pub use workspace::{InitReport, Workspace};
