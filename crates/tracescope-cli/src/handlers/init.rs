use crate::output::print_json;
use crate::types::OutputFormat;
use anyhow::Result;
use serde_json::json;
use std::path::Path;
use tracescope_runtime::Workspace;

pub fn handle(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let report = Workspace::init(data_dir)?;

    if format == OutputFormat::Json {
        return print_json(&json!({
            "data_dir": data_dir,
            "created": report.created,
            "existing": report.existing,
        }));
    }

    println!("Data directory: {}", data_dir.display());
    for path in &report.created {
        println!("  created  {}", path.display());
    }
    for path in &report.existing {
        println!("  exists   {}", path.display());
    }
    Ok(())
}
