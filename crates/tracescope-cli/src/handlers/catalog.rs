use crate::output::print_json;
use crate::types::OutputFormat;
use anyhow::Result;
use serde_json::json;
use std::path::Path;
use tracescope_engine::RuleCatalog;
use tracescope_runtime::Workspace;

/// Load the configured catalog without opening the rest of the workspace.
pub fn check(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let (_, paths) = Workspace::locate(data_dir)?;
    let catalog = RuleCatalog::load(&paths.catalog)?;

    let terminal = catalog.terminal_count();
    let packages = catalog.len() - terminal;

    if format == OutputFormat::Json {
        return print_json(&json!({
            "path": paths.catalog,
            "rules": catalog.len(),
            "terminal": terminal,
            "package_prefixes": packages,
        }));
    }

    println!("Catalog OK: {}", paths.catalog.display());
    println!("  {} rules ({terminal} exception classes, {packages} package prefixes)", catalog.len());
    Ok(())
}
