//! Escalation template and Jira export for session notes.

use std::path::{Path, PathBuf};
use tracescope_types::SessionData;

/// Line of the template that is replaced by the session notes
pub const PLACEHOLDER: &str = "# Place contents of Note Here after clicking \"Escalation Template\"";

/// Template written by `init` when none exists
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/EscalationTemplate.md");

const NO_TRACE_SELECTED: &str = "No specific stack trace selected for this export.";
const NO_NOTES: &str = "No notes taken for this session.";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("escalation template not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read escalation template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("escalation template {origin} is missing the notes placeholder line")]
    MissingPlaceholder { origin: String },
}

/// Validated escalation template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationTemplate {
    content: String,
}

impl Default for EscalationTemplate {
    fn default() -> Self {
        Self {
            content: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

fn is_placeholder(line: &str) -> bool {
    line.trim() == PLACEHOLDER
}

impl EscalationTemplate {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(TemplateError::Missing(path.to_path_buf()));
            }
            Err(source) => {
                return Err(TemplateError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(content, path.display().to_string())
    }

    pub fn parse(content: String, origin: String) -> Result<Self, TemplateError> {
        if !content.split('\n').any(is_placeholder) {
            return Err(TemplateError::MissingPlaceholder { origin });
        }
        Ok(Self { content })
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Fill the template with `notes`.
    ///
    /// The placeholder line becomes the trimmed notes. Before it, `## Heading:`
    /// lines lose their `## ` marker; everything after it is copied unchanged.
    pub fn apply(&self, notes: &str) -> String {
        let notes = notes.trim();
        let mut out: Vec<&str> = Vec::new();
        let mut lines = self.content.split('\n');

        for line in lines.by_ref() {
            if is_placeholder(line) {
                out.push(notes);
                break;
            }
            let stripped = line.trim();
            match stripped.strip_prefix("## ") {
                Some(heading) if stripped.ends_with(':') => out.push(heading),
                _ => out.push(line),
            }
        }
        out.extend(lines);

        out.join("\n")
    }
}

/// Jira-markup summary of a session: selected trace, notes and file location.
pub fn export_notes(session: &SessionData) -> String {
    let (exception_name, trace) = match session.selected() {
        Some((trace, record)) => (record.display_name.as_str(), trace),
        None => ("N/A", NO_TRACE_SELECTED),
    };
    let notes = if session.notes.trim().is_empty() {
        NO_NOTES
    } else {
        session.notes.as_str()
    };

    format!(
        "h1. Troubleshooting Notes: {name}

h2. Selected Exception Type
{exception_name}

h2. Selected Stack Trace
{{code:python}}
{trace}
{{code}}

h2. Session Notes
{notes}

h2. Relevant Files Location
Local Path: {path}
(Files copied to this directory)
",
        name = session.session_name,
        path = session.files_path.display(),
    )
}

/// Default file name for an exported session
pub fn export_file_name(session: &SessionData) -> String {
    format!("Export_{}.md", session.session_name)
}
