mod args;
mod commands;
mod handlers;
pub mod logging;
pub mod output;
pub mod types;

pub use args::{CatalogCommand, Cli, Commands, SessionCommand};
pub use commands::run;
