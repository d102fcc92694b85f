//! CLI tooling namespace.

pub mod cli;

pub use cli::{BookmarkCommands, Cli, CliContext, Commands, ConfigCommands};
