use crate::output::{
    Style, print_json, print_lines, ranked_lines, session_header_lines, session_list_lines,
};
use crate::types::OutputFormat;
use anyhow::Result;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracescope_engine::{find_ranked, rank, search};
use tracescope_runtime::{Error, Workspace, export_file_name, export_notes};

pub fn list(workspace: &Workspace, format: OutputFormat) -> Result<()> {
    let sessions = workspace.sessions().list()?;

    if format == OutputFormat::Json {
        return print_json(&sessions);
    }

    print_lines(&session_list_lines(&sessions, Style::detect()));
    Ok(())
}

pub fn show(
    workspace: &Workspace,
    name: &str,
    term: Option<&str>,
    trace: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let session = workspace.sessions().load(name)?;

    if let Some(reference) = trace {
        let found = find_ranked(&session.traces, reference)
            .ok_or_else(|| Error::TraceNotFound(reference.to_string()))?;
        if format == OutputFormat::Json {
            return print_json(&found);
        }
        let style = Style::detect();
        println!("{}", style.weighted(&found.record.title(), found.record.weight));
        println!();
        println!("{}", found.trace);
        return Ok(());
    }

    let ranked = match term {
        Some(term) => search(&session.traces, term),
        None => rank(&session.traces),
    };

    if format == OutputFormat::Json {
        return print_json(&json!({
            "session_name": session.session_name,
            "files_path": session.files_path,
            "created_at": session.created_at,
            "log_files": session.log_files,
            "selected_trace": session.selected_trace,
            "notes": session.notes,
            "traces": ranked,
        }));
    }

    let style = Style::detect();
    print_lines(&session_header_lines(&session, style));
    println!();
    if ranked.is_empty() {
        match term {
            Some(term) => println!("No traces match '{term}'."),
            None => println!("No traces found."),
        }
    } else {
        print_lines(&ranked_lines(&ranked, style));
    }
    Ok(())
}

pub fn select(workspace: &Workspace, name: &str, reference: &str, format: OutputFormat) -> Result<()> {
    let session = workspace.sessions().select(name, reference)?;
    let Some((trace, record)) = session.selected() else {
        return Err(Error::TraceNotFound(reference.to_string()).into());
    };

    if format == OutputFormat::Json {
        return print_json(&json!({
            "session": session.session_name,
            "selected_trace": trace,
            "display_name": record.display_name,
        }));
    }

    println!("Selected {}", record.title());
    Ok(())
}

pub fn notes(
    workspace: &Workspace,
    name: &str,
    text: Option<String>,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let replacement = match (text, file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(std::fs::read_to_string(&path).map_err(|source| {
            Error::File {
                path: path.clone(),
                source,
            }
        })?),
        (None, None) => None,
    };

    let session = match replacement {
        Some(text) => workspace.sessions().set_notes(name, &text)?,
        None => workspace.sessions().load(name)?,
    };

    if format == OutputFormat::Json {
        return print_json(&json!({
            "session": session.session_name,
            "notes": session.notes,
        }));
    }

    if !session.notes.is_empty() {
        println!("{}", session.notes);
    }
    Ok(())
}

pub fn template(workspace: &Workspace, name: &str, dry_run: bool, format: OutputFormat) -> Result<()> {
    let template = workspace.escalation_template()?;
    let mut session = workspace.sessions().load(name)?;
    let filled = template.apply(&session.notes);

    if !dry_run {
        session.notes = filled.clone();
        workspace.sessions().save(&session)?;
    }

    if format == OutputFormat::Json {
        return print_json(&json!({
            "session": session.session_name,
            "notes": filled,
            "saved": !dry_run,
        }));
    }

    println!("{filled}");
    Ok(())
}

pub fn rename(workspace: &Workspace, name: &str, new_name: &str, format: OutputFormat) -> Result<()> {
    let session = workspace.sessions().rename(name, new_name)?;

    if format == OutputFormat::Json {
        return print_json(&json!({
            "session": session.session_name,
            "path": session.files_path,
        }));
    }

    println!("Renamed '{}' to '{}'", name, session.session_name);
    Ok(())
}

pub fn delete(workspace: &Workspace, name: &str, format: OutputFormat) -> Result<()> {
    workspace.sessions().delete(name)?;

    if format == OutputFormat::Json {
        return print_json(&json!({ "deleted": name }));
    }

    println!("Deleted session '{name}'");
    Ok(())
}

pub fn reanalyze(workspace: &Workspace, name: &str, format: OutputFormat) -> Result<()> {
    let outcome = workspace.sessions().reanalyze(name, workspace.catalog())?;
    let ranked = rank(&outcome.session.traces);

    if format == OutputFormat::Json {
        return print_json(&json!({
            "session": outcome.session.session_name,
            "files_read": outcome.files_read,
            "selected_trace": outcome.session.selected_trace,
            "traces": ranked,
        }));
    }

    if outcome.files_read == 0 {
        println!("No readable logs in the session; traces left unchanged.");
        return Ok(());
    }

    let style = Style::detect();
    println!(
        "Re-analyzed {} file(s): {} distinct traces",
        outcome.files_read,
        ranked.len()
    );
    if !ranked.is_empty() {
        println!();
        print_lines(&ranked_lines(&ranked, style));
    }
    Ok(())
}

pub fn export(
    workspace: &Workspace,
    name: &str,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let session = workspace.sessions().load(name)?;
    let document = export_notes(&session);

    let Some(output) = output else {
        if format == OutputFormat::Json {
            return print_json(&json!({
                "file_name": export_file_name(&session),
                "content": document,
            }));
        }
        print!("{document}");
        return Ok(());
    };

    std::fs::write(output, &document).map_err(|source| Error::File {
        path: output.to_path_buf(),
        source,
    })?;

    if format == OutputFormat::Json {
        return print_json(&json!({ "written": output }));
    }
    println!("Notes exported to {}", output.display());
    Ok(())
}

pub fn attach(workspace: &Workspace, name: &str, files: &[PathBuf], format: OutputFormat) -> Result<()> {
    let copied = workspace.sessions().attach(name, files)?;

    if format == OutputFormat::Json {
        return print_json(&json!({ "copied": copied }));
    }

    println!("Copied {} of {} file(s)", copied.len(), files.len());
    for path in &copied {
        println!("  {}", path.display());
    }
    Ok(())
}
