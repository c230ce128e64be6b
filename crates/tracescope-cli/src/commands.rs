use super::args::{CatalogCommand, Cli, Commands, SessionCommand};
use super::handlers;
use crate::logging;
use anyhow::Result;
use tracescope_runtime::{Workspace, resolve_data_dir};

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    let format = cli.format;
    // Everything except `init` and `catalog check` needs a loadable catalog.
    let open = || Workspace::open(&data_dir);

    match cli.command {
        Commands::Init => handlers::init::handle(&data_dir, format),

        Commands::Catalog {
            command: CatalogCommand::Check,
        } => handlers::catalog::check(&data_dir, format),

        Commands::Analyze {
            files,
            name,
            dry_run,
        } => handlers::analyze::handle(&open()?, &files, name.as_deref(), dry_run, format),

        Commands::Define { session, trace } => {
            handlers::define::handle(&open()?, &session, trace.as_deref(), format)
        }

        Commands::Session { command } => {
            let workspace = open()?;
            match command {
                SessionCommand::List => handlers::session::list(&workspace, format),
                SessionCommand::Show {
                    name,
                    search,
                    trace,
                } => handlers::session::show(
                    &workspace,
                    &name,
                    search.as_deref(),
                    trace.as_deref(),
                    format,
                ),
                SessionCommand::Select { name, trace } => {
                    handlers::session::select(&workspace, &name, &trace, format)
                }
                SessionCommand::Notes { name, text, file } => {
                    handlers::session::notes(&workspace, &name, text, file, format)
                }
                SessionCommand::Template { name, dry_run } => {
                    handlers::session::template(&workspace, &name, dry_run, format)
                }
                SessionCommand::Rename { name, new_name } => {
                    handlers::session::rename(&workspace, &name, &new_name, format)
                }
                SessionCommand::Delete { name } => {
                    handlers::session::delete(&workspace, &name, format)
                }
                SessionCommand::Reanalyze { name } => {
                    handlers::session::reanalyze(&workspace, &name, format)
                }
                SessionCommand::Export { name, output } => {
                    handlers::session::export(&workspace, &name, output.as_deref(), format)
                }
                SessionCommand::Attach { name, files } => {
                    handlers::session::attach(&workspace, &name, &files, format)
                }
            }
        }
    }
}
