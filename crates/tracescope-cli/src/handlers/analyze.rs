use crate::output::{Style, print_json, print_lines, ranked_lines};
use crate::types::OutputFormat;
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use tracescope_engine::{analyze, rank};
use tracescope_runtime::{Error, Workspace, ingest};

pub fn handle(
    workspace: &Workspace,
    files: &[PathBuf],
    name: Option<&str>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    if dry_run {
        return preview(workspace, files, format);
    }

    let session = workspace.sessions().create(files, name, workspace.catalog())?;
    let ranked = rank(&session.traces);

    if format == OutputFormat::Json {
        return print_json(&json!({
            "session": session.session_name,
            "path": session.files_path,
            "traces": ranked,
        }));
    }

    let style = Style::detect();
    println!(
        "Created session {} ({} distinct traces)",
        style.heading(&session.session_name),
        ranked.len()
    );
    println!("  {}", session.files_path.display());
    if !ranked.is_empty() {
        println!();
        print_lines(&ranked_lines(&ranked, style));
    }
    Ok(())
}

fn preview(workspace: &Workspace, files: &[PathBuf], format: OutputFormat) -> Result<()> {
    let logs = ingest::read_logs(files);
    if logs.is_empty() {
        return Err(Error::NoReadableContent.into());
    }

    let traces = analyze(logs.iter().map(|l| l.content.as_str()), workspace.catalog());
    let ranked = rank(&traces);

    if format == OutputFormat::Json {
        let names: Vec<&str> = logs.iter().map(|l| l.name.as_str()).collect();
        return print_json(&json!({
            "session": null,
            "files": names,
            "traces": ranked,
        }));
    }

    println!(
        "Analyzed {} file(s): {} distinct traces (dry run, nothing saved)",
        logs.len(),
        ranked.len()
    );
    if !ranked.is_empty() {
        println!();
        print_lines(&ranked_lines(&ranked, Style::detect()));
    }
    Ok(())
}
