use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{LogLevel, OutputFormat};

#[derive(Parser)]
#[command(name = "tracescope")]
#[command(about = "Extract, rank and annotate exception traces from raw logs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory [default: $TRACESCOPE_PATH, then the platform data dir]
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Write default config, rule catalog and escalation template")]
    Init,

    #[command(about = "Analyze log files into a new session")]
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, help = "Session name (default: Session_<timestamp>)")]
        name: Option<String>,

        #[arg(long, help = "Print the ranking without creating a session")]
        dry_run: bool,
    },

    #[command(about = "Manage saved sessions")]
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    #[command(about = "Show the catalog definition for a session's trace")]
    Define {
        session: String,

        #[arg(help = "Rank position or exact trace text (default: selected trace)")]
        trace: Option<String>,
    },

    #[command(about = "Rule catalog operations")]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    #[command(about = "List sessions, newest first")]
    List,

    #[command(about = "Show a session's ranked traces")]
    Show {
        name: String,

        #[arg(long, help = "Only traces containing this text (case-insensitive)")]
        search: Option<String>,

        #[arg(long, help = "Print one trace in full (rank position or exact text)")]
        trace: Option<String>,
    },

    #[command(about = "Mark a trace as selected")]
    Select {
        name: String,

        #[arg(help = "Rank position or exact trace text")]
        trace: String,
    },

    #[command(about = "Print or replace a session's notes")]
    Notes {
        name: String,

        #[arg(help = "New notes text; omit to print the current notes")]
        text: Option<String>,

        #[arg(long, conflicts_with = "text", help = "Read the new notes from a file")]
        file: Option<PathBuf>,
    },

    #[command(about = "Fill the escalation template with the session notes")]
    Template {
        name: String,

        #[arg(long, help = "Print the result without saving it as the notes")]
        dry_run: bool,
    },

    #[command(about = "Rename a session and its directory")]
    Rename { name: String, new_name: String },

    #[command(about = "Delete a session and its files")]
    Delete { name: String },

    #[command(about = "Re-run analysis over the session's stored logs")]
    Reanalyze { name: String },

    #[command(about = "Export notes and the selected trace as Jira markup")]
    Export {
        name: String,

        #[arg(long, short, help = "Write to this file instead of stdout")]
        output: Option<PathBuf>,
    },

    #[command(about = "Copy additional files into the session directory")]
    Attach {
        name: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    #[command(about = "Validate the configured rule catalog")]
    Check,
}
