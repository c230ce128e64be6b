use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracescope_types::{RankedTrace, SessionData, SessionSummary};

/// Weight at or above which a trace is shown in red
pub const HIGH_WEIGHT: u32 = 5;
/// Weight at or above which a trace is shown in yellow
pub const MEDIUM_WEIGHT: u32 = 3;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Console styling. Colors are used only when stdout is a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn detect() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn weighted(&self, text: &str, weight: u32) -> String {
        if !self.color {
            return text.to_string();
        }
        if weight >= HIGH_WEIGHT {
            text.red().bold().to_string()
        } else if weight >= MEDIUM_WEIGHT {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// ` 1. * NullPointerException (Count: 2, Weight: 5)` followed by the trace's first line
pub fn ranked_lines(ranked: &[RankedTrace<'_>], style: Style) -> Vec<String> {
    let width = ranked.last().map_or(1, |r| r.position.to_string().len());
    let mut lines = Vec::with_capacity(ranked.len() * 2);
    for entry in ranked {
        let marker = if entry.record.selected { "*" } else { " " };
        lines.push(format!(
            "{:>width$}. {} {}",
            entry.position,
            marker,
            style.weighted(&entry.record.title(), entry.record.weight),
        ));
        lines.push(format!(
            "{:>width$}     {}",
            "",
            style.dim(first_line(entry.trace)),
        ));
    }
    lines
}

pub fn session_list_lines(sessions: &[SessionSummary], style: Style) -> Vec<String> {
    if sessions.is_empty() {
        return vec!["No sessions found.".to_string()];
    }

    sessions
        .iter()
        .map(|s| {
            let count = match s.trace_count {
                Some(n) => format!("{n} traces"),
                None => "unreadable".to_string(),
            };
            let notes = s.notes_preview.as_deref().filter(|n| !n.is_empty());
            match notes {
                Some(notes) => format!("{}  ({count})  {}", style.heading(&s.name), style.dim(notes)),
                None => format!("{}  ({count})", style.heading(&s.name)),
            }
        })
        .collect()
}

pub fn session_header_lines(session: &SessionData, style: Style) -> Vec<String> {
    let selected = session
        .selected()
        .map(|(_, record)| record.title())
        .unwrap_or_else(|| "none".to_string());

    vec![
        format!("Session:  {}", style.heading(&session.session_name)),
        format!("Path:     {}", session.files_path.display()),
        format!("Created:  {}", session.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Traces:   {}", session.traces.len()),
        format!("Selected: {selected}"),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
