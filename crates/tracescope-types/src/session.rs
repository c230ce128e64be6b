use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::record::{ClassificationRecord, TraceMap};

const NOTES_PREVIEW_CHARS: usize = 50;

/// Persisted state of one troubleshooting session (`session.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_name: String,

    #[serde(default)]
    pub notes: String,

    /// Session directory holding `session.json`, `logs/` and attached files
    pub files_path: PathBuf,

    #[serde(default)]
    pub traces: TraceMap,

    /// Copy names under `logs/`, in the order they were joined for analysis
    #[serde(default)]
    pub log_files: Vec<String>,

    /// Trace text the operator is currently looking at
    #[serde(default)]
    pub selected_trace: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(session_name: impl Into<String>, files_path: PathBuf, traces: TraceMap) -> Self {
        Self {
            session_name: session_name.into(),
            notes: String::new(),
            files_path,
            traces,
            log_files: Vec::new(),
            selected_trace: None,
            created_at: Utc::now(),
        }
    }

    /// The selected trace and its record, if the selection still exists
    pub fn selected(&self) -> Option<(&str, &ClassificationRecord)> {
        let trace = self.selected_trace.as_deref()?;
        self.traces
            .get_key_value(trace)
            .map(|(text, record)| (text.as_str(), record))
    }

    /// Point the selection at `trace`, keeping every record's flag in sync.
    /// Returns false (and changes nothing) when `trace` is not a known key.
    pub fn select(&mut self, trace: &str) -> bool {
        if !self.traces.contains_key(trace) {
            return false;
        }
        for (text, record) in self.traces.iter_mut() {
            record.selected = text == trace;
        }
        self.selected_trace = Some(trace.to_string());
        true
    }

    /// First line of the notes, cut to 50 characters
    pub fn notes_preview(&self) -> String {
        self.notes
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(NOTES_PREVIEW_CHARS)
            .collect()
    }
}

/// Session name -> session directory (`sessions.json`)
pub type SessionIndex = BTreeMap<String, PathBuf>;

/// One line of a session listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub path: PathBuf,
    /// `None` when the session file could not be read
    pub trace_count: Option<usize>,
    pub notes_preview: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(traces: &[&str]) -> SessionData {
        let traces = traces
            .iter()
            .map(|t| (t.to_string(), ClassificationRecord::unknown(1)))
            .collect();
        SessionData::new("Session_1", PathBuf::from("/tmp/Session_1"), traces)
    }

    #[test]
    fn test_select_marks_single_record() {
        let mut session = session_with(&["AError: a", "BError: b"]);
        assert!(session.select("BError: b"));
        assert!(!session.traces["AError: a"].selected);
        assert!(session.traces["BError: b"].selected);

        assert!(session.select("AError: a"));
        assert!(session.traces["AError: a"].selected);
        assert!(!session.traces["BError: b"].selected);
        assert_eq!(session.selected().map(|(t, _)| t), Some("AError: a"));
    }

    #[test]
    fn test_select_unknown_trace_is_noop() {
        let mut session = session_with(&["AError: a"]);
        assert!(!session.select("nope"));
        assert!(session.selected_trace.is_none());
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_notes_preview() {
        let mut session = session_with(&[]);
        assert_eq!(session.notes_preview(), "");

        session.notes = format!("{}\nsecond line", "x".repeat(80));
        assert_eq!(session.notes_preview(), "x".repeat(50));

        session.notes = "short\nmore".to_string();
        assert_eq!(session.notes_preview(), "short");
    }

    #[test]
    fn test_session_roundtrip_with_missing_optional_fields() {
        let json = r#"{
            "session_name": "Imported",
            "files_path": "/data/Imported",
            "created_at": "2025-01-02T03:04:05Z"
        }"#;
        let session: SessionData = serde_json::from_str(json).unwrap();
        assert_eq!(session.session_name, "Imported");
        assert!(session.traces.is_empty());
        assert!(session.notes.is_empty());
        assert!(session.selected_trace.is_none());
        assert!(session.log_files.is_empty());
    }
}
