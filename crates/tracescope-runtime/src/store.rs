use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracescope_engine::{RuleCatalog, analyze, find_ranked};
use tracescope_types::{SessionData, SessionIndex, SessionSummary};

use crate::ingest::{self, LogFile};
use crate::{Error, Result};

pub const INDEX_FILE: &str = "sessions.json";
pub const SESSION_FILE: &str = "session.json";
pub const LOGS_DIR: &str = "logs";

/// Outcome of [`SessionStore::reanalyze`]
#[derive(Debug, Clone)]
pub struct Reanalysis {
    pub session: SessionData,
    /// Log files that were read; zero means the traces were left untouched
    pub files_read: usize,
}

/// Directory of persisted sessions.
///
/// ```text
/// <root>/sessions.json            name -> session directory
/// <root>/<name>/session.json      SessionData
/// <root>/<name>/logs/<file>       copies of the analysed logs
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn open(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root).map_err(Error::at(&root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Current index. A corrupt index file is reported and treated as empty.
    pub fn index(&self) -> Result<SessionIndex> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(SessionIndex::new());
        }

        let content = std::fs::read_to_string(&path).map_err(Error::at(&path))?;
        match serde_json::from_str(&content) {
            Ok(index) => Ok(index),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "session index is unreadable, starting empty");
                Ok(SessionIndex::new())
            }
        }
    }

    fn save_index(&self, index: &SessionIndex) -> Result<()> {
        write_json(&self.index_path(), index)
    }

    fn locate(&self, index: &SessionIndex, name: &str) -> Result<PathBuf> {
        index
            .get(name)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound(name.to_string()))
    }

    /// Analyse `paths` into a new session.
    ///
    /// Unreadable and blank files are skipped; the rest are copied into the
    /// session's `logs/` directory. Without `name` the session is called
    /// `Session_<timestamp>`, suffixed `_1`, `_2`, ... on collision.
    pub fn create<P: AsRef<Path>>(
        &self,
        paths: &[P],
        name: Option<&str>,
        catalog: &RuleCatalog,
    ) -> Result<SessionData> {
        let mut index = self.index()?;
        let name = match name {
            Some(name) => {
                let name = validate_name(name)?;
                if index.contains_key(name) || self.root.join(name).exists() {
                    return Err(Error::SessionExists(name.to_string()));
                }
                name.to_string()
            }
            None => default_session_name(&index, &self.root, Local::now().naive_local()),
        };

        let logs = ingest::read_logs(paths);
        if logs.is_empty() {
            return Err(Error::NoReadableContent);
        }

        let dir = self.root.join(&name);
        let session = match self.populate(&dir, &name, &logs, catalog) {
            Ok(session) => session,
            Err(err) => {
                if let Err(cleanup) = std::fs::remove_dir_all(&dir) {
                    tracing::warn!(dir = %dir.display(), error = %cleanup, "failed to clean up session directory");
                }
                return Err(err);
            }
        };

        index.insert(name.clone(), dir);
        self.save_index(&index)?;

        tracing::info!(
            session = %name,
            files = logs.len(),
            traces = session.traces.len(),
            "session created"
        );
        Ok(session)
    }

    fn populate(
        &self,
        dir: &Path,
        name: &str,
        logs: &[LogFile],
        catalog: &RuleCatalog,
    ) -> Result<SessionData> {
        let logs_dir = dir.join(LOGS_DIR);
        std::fs::create_dir_all(&logs_dir).map_err(Error::at(&logs_dir))?;

        for log in logs {
            let dest = logs_dir.join(&log.name);
            std::fs::write(&dest, &log.content).map_err(Error::at(&dest))?;
        }

        let traces = analyze(logs.iter().map(|l| l.content.as_str()), catalog);
        tracing::debug!(session = %name, traces = traces.len(), "classified traces");

        let mut session = SessionData::new(name, dir.to_path_buf(), traces);
        session.log_files = logs.iter().map(|l| l.name.clone()).collect();
        write_json(&dir.join(SESSION_FILE), &session)?;
        Ok(session)
    }

    /// Every indexed session, newest name first
    pub fn list(&self) -> Result<Vec<SessionSummary>> {
        let index = self.index()?;
        let summaries = index
            .into_iter()
            .rev()
            .map(|(name, path)| match read_session(&path) {
                Ok(session) => SessionSummary {
                    name,
                    trace_count: Some(session.traces.len()),
                    notes_preview: Some(session.notes_preview()),
                    path,
                },
                Err(err) => {
                    tracing::debug!(session = %name, error = %err, "session file unreadable");
                    SessionSummary {
                        name,
                        path,
                        trace_count: None,
                        notes_preview: None,
                    }
                }
            })
            .collect();
        Ok(summaries)
    }

    pub fn load(&self, name: &str) -> Result<SessionData> {
        let index = self.index()?;
        let dir = self.locate(&index, name)?;
        read_session(&dir)
    }

    /// Write `session.json` and make sure the index points at it.
    pub fn save(&self, session: &SessionData) -> Result<()> {
        write_json(&session.files_path.join(SESSION_FILE), session)?;

        let mut index = self.index()?;
        if index.get(&session.session_name) != Some(&session.files_path) {
            index.insert(session.session_name.clone(), session.files_path.clone());
            self.save_index(&index)?;
        }
        Ok(())
    }

    /// Select a trace by 1-based rank position or exact text.
    pub fn select(&self, name: &str, reference: &str) -> Result<SessionData> {
        let mut session = self.load(name)?;
        let trace = find_ranked(&session.traces, reference)
            .map(|ranked| ranked.trace.to_string())
            .ok_or_else(|| Error::TraceNotFound(reference.to_string()))?;

        session.select(&trace);
        self.save(&session)?;
        Ok(session)
    }

    pub fn set_notes(&self, name: &str, notes: &str) -> Result<SessionData> {
        let mut session = self.load(name)?;
        session.notes = notes.trim().to_string();
        self.save(&session)?;
        Ok(session)
    }

    pub fn rename(&self, old: &str, new: &str) -> Result<SessionData> {
        let new = validate_name(new)?;
        if new == old {
            return Err(Error::InvalidName {
                name: new.to_string(),
                reason: "session already has this name".to_string(),
            });
        }

        let mut index = self.index()?;
        let old_dir = self.locate(&index, old)?;
        let new_dir = self.root.join(new);
        if index.contains_key(new) || new_dir.exists() {
            return Err(Error::SessionExists(new.to_string()));
        }

        let mut session = read_session(&old_dir)?;
        std::fs::rename(&old_dir, &new_dir).map_err(Error::at(&old_dir))?;

        session.session_name = new.to_string();
        session.files_path = new_dir.clone();
        write_json(&new_dir.join(SESSION_FILE), &session)?;

        index.remove(old);
        index.insert(new.to_string(), new_dir);
        self.save_index(&index)?;

        tracing::info!(from = %old, to = %new, "session renamed");
        Ok(session)
    }

    /// Remove a session from the index and delete its directory.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut index = self.index()?;
        let dir = index
            .remove(name)
            .ok_or_else(|| Error::SessionNotFound(name.to_string()))?;

        match std::fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(Error::at(&dir)(err)),
        }

        self.save_index(&index)?;
        tracing::info!(session = %name, "session deleted");
        Ok(())
    }

    /// Re-run the engine over the logs stored with a session.
    ///
    /// Logs are joined in the order recorded at creation, so unchanged logs
    /// yield the same trace keys. The selection survives only if the same
    /// trace text is still present.
    pub fn reanalyze(&self, name: &str, catalog: &RuleCatalog) -> Result<Reanalysis> {
        let mut session = self.load(name)?;
        let files = ingest::collect_log_files(&session.files_path.join(LOGS_DIR))?;
        let files = in_recorded_order(files, &session.log_files);
        let logs = ingest::read_logs(&files);

        if logs.is_empty() {
            tracing::warn!(session = %name, "no readable logs to re-analyse, traces left unchanged");
            return Ok(Reanalysis {
                session,
                files_read: 0,
            });
        }

        session.traces = analyze(logs.iter().map(|l| l.content.as_str()), catalog);
        session.log_files = logs.iter().map(|l| l.name.clone()).collect();
        match session.selected_trace.take() {
            Some(previous) if session.select(&previous) => {}
            Some(previous) => {
                tracing::info!(session = %name, trace = %previous.lines().next().unwrap_or_default(), "selected trace no longer present");
            }
            None => {}
        }

        self.save(&session)?;
        tracing::info!(session = %name, files = logs.len(), traces = session.traces.len(), "session re-analysed");
        Ok(Reanalysis {
            session,
            files_read: logs.len(),
        })
    }

    /// Copy extra files into the session directory. Failed copies are logged and skipped.
    pub fn attach<P: AsRef<Path>>(&self, name: &str, paths: &[P]) -> Result<Vec<PathBuf>> {
        let session = self.load(name)?;
        let mut copied = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let Some(file_name) = path.file_name() else {
                tracing::warn!(path = %path.display(), "skipping path without a file name");
                continue;
            };
            let dest = session.files_path.join(file_name);
            match std::fs::copy(path, &dest) {
                Ok(_) => copied.push(dest),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to copy file into session");
                }
            }
        }
        Ok(copied)
    }
}

/// `files` reordered to follow `recorded`; unlisted files keep their sorted
/// order after the listed ones.
fn in_recorded_order(mut files: Vec<PathBuf>, recorded: &[String]) -> Vec<PathBuf> {
    files.sort_by_key(|path| {
        path.file_name()
            .and_then(|name| recorded.iter().position(|r| name.to_string_lossy() == r.as_str()))
            .unwrap_or(recorded.len())
    });
    files
}

fn read_session(dir: &Path) -> Result<SessionData> {
    let path = dir.join(SESSION_FILE);
    let content = std::fs::read_to_string(&path).map_err(Error::at(&path))?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(Error::at(path))?;
    Ok(())
}

/// Trimmed name, rejected when empty or not usable as a single directory name.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let reason = if trimmed.is_empty() {
        Some("name cannot be empty")
    } else if trimmed == "." || trimmed == ".." {
        Some("name cannot be a relative directory")
    } else if trimmed.contains(['/', '\\']) {
        Some("name cannot contain path separators")
    } else if trimmed == INDEX_FILE {
        Some("name is reserved")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(trimmed),
    }
}

/// `Session_YYYYmmdd_HHMMSS`, with `_1`, `_2`, ... appended until unused.
pub fn default_session_name(index: &SessionIndex, root: &Path, now: NaiveDateTime) -> String {
    let base = format!("Session_{}", now.format("%Y%m%d_%H%M%S"));
    let taken = |candidate: &str| index.contains_key(candidate) || root.join(candidate).exists();

    let mut candidate = base.clone();
    let mut suffix = 1;
    while taken(&candidate) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    candidate
}
