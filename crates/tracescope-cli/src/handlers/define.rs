use crate::output::{Style, print_json};
use crate::types::OutputFormat;
use anyhow::{Result, bail};
use serde_json::json;
use tracescope_engine::find_ranked;
use tracescope_runtime::{Error, Workspace};

/// Print the combined class and package definition for one trace.
pub fn handle(
    workspace: &Workspace,
    session_name: &str,
    trace: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let session = workspace.sessions().load(session_name)?;

    let (trace, record) = match trace {
        Some(reference) => {
            let found = find_ranked(&session.traces, reference)
                .ok_or_else(|| Error::TraceNotFound(reference.to_string()))?;
            (found.trace, found.record)
        }
        None => match session.selected() {
            Some(selected) => selected,
            None => bail!(
                "No trace selected in session '{}'; pass a rank position or select one first",
                session_name
            ),
        },
    };

    let definition = workspace.catalog().definition_for(record);

    if format == OutputFormat::Json {
        return print_json(&json!({
            "trace": trace,
            "display_name": record.display_name,
            "class_key": record.class_key,
            "package_key": record.package_key,
            "definition": definition,
        }));
    }

    let style = Style::detect();
    println!("{}", style.weighted(&record.title(), record.weight));
    println!();
    println!("{definition}");
    Ok(())
}
