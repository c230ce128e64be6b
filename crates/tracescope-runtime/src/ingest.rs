use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::Result;

/// Extensions picked up when re-reading a session's `logs/` directory
pub const LOG_EXTENSIONS: [&str; 2] = ["log", "txt"];

/// One input log, decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// File name without directories, used as the copy name inside a session
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Read `path` as text, replacing invalid UTF-8 with U+FFFD.
pub fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read every path, skipping unreadable and blank files.
///
/// Inputs sharing a file name (`node1/server.log`, `node2/server.log`) are all
/// kept; later ones are renamed `server_1.log`, `server_2.log`, ... so every
/// copy fits in a session's flat `logs/` directory.
pub fn read_logs<P: AsRef<Path>>(paths: &[P]) -> Vec<LogFile> {
    let mut files: Vec<LogFile> = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            tracing::warn!(path = %path.display(), "skipping path without a file name");
            continue;
        };

        let content = match read_lossy(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not read log file, skipping");
                continue;
            }
        };

        if content.trim().is_empty() {
            tracing::warn!(path = %path.display(), "log file is empty, skipping");
            continue;
        }

        let name = unique_name(&name, &files);
        tracing::debug!(path = %path.display(), copy = %name, bytes = content.len(), "read log file");
        files.push(LogFile {
            name,
            path: path.to_path_buf(),
            content,
        });
    }

    files
}

/// `name`, or `stem_N.ext` with the smallest `N` no earlier file uses
fn unique_name(name: &str, files: &[LogFile]) -> String {
    let taken = |candidate: &str| files.iter().any(|f| f.name == candidate);
    if !taken(name) {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
        _ => (name, String::new()),
    };
    let mut suffix = 1;
    loop {
        let candidate = format!("{stem}_{suffix}{ext}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// `*.log` and `*.txt` files directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn collect_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_log = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| LOG_EXTENSIONS.contains(&ext));
        if is_log {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}
