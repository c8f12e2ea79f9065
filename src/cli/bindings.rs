//! Bindings subcommand: print the environment variable catalog.

use super::FormatArg;
use clap::Args;

/// Arguments for the bindings subcommand
#[derive(Args, Debug)]
pub struct BindingsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Only list bindings for this document (e.g. settings)
    #[arg(short, long, value_name = "NAME")]
    pub document: Option<String>,
}
