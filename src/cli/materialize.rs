//! Materialize subcommand.

use super::FormatArg;
use clap::Args;

/// Arguments for the materialize subcommand
#[derive(Args, Debug, Default)]
pub struct MaterializeArgs {
    /// Format of the run summary printed to stdout
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Print nothing on success
    #[arg(short, long)]
    pub quiet: bool,
}
