//! CLI command definitions for configsmith
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod bindings;
pub mod materialize;

use clap::{Parser, Subcommand, ValueEnum};
use bindings::BindingsArgs;
use materialize::MaterializeArgs;

/// Policy for an existing serverconfig file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerConfigMode {
    /// Rewrite it with overrides applied (default)
    Overwrite,
    /// Never replace an existing file
    Preserve,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
}

/// Materialize JSON configuration documents from defaults and environment overrides
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default_<name>.json templates (overrides config)
    #[arg(long, global = true)]
    pub defaults_dir: Option<String>,

    /// Directory holding the live <name>.json documents (overrides config)
    #[arg(short, long, global = true)]
    pub config_dir: Option<String>,

    /// What to do with an existing serverconfig.json (overrides config)
    #[arg(long, value_enum, global = true)]
    pub server_config: Option<ServerConfigMode>,

    /// Abort without writing if any environment override is invalid
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write every configuration document (default if no subcommand given)
    Materialize(MaterializeArgs),

    /// List the environment variables each document accepts
    Bindings(BindingsArgs),
}
