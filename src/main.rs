//! configsmith
//!
//! Writes the JSON configuration documents a downstream application reads,
//! from default templates plus environment overrides. Run once at startup;
//! a non-zero exit means the application must not be started.

use anyhow::{Context, Result, bail};
use clap::Parser;
use configsmith::catalog::DocumentKind;
use configsmith::cli::{Cli, Command, FormatArg, ServerConfigMode};
use configsmith::cli::bindings::BindingsArgs;
use configsmith::cli::materialize::MaterializeArgs;
use configsmith::config::{RunConfig, ServerConfigPolicy};
use configsmith::env::ProcessEnv;
use configsmith::format::{OutputFormat, format_bindings, format_report};
use configsmith::materialize::Materializer;
use std::fs::OpenOptions;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Convert CLI ServerConfigMode to config ServerConfigPolicy
fn cli_server_config_to_policy(mode: ServerConfigMode) -> ServerConfigPolicy {
    match mode {
        ServerConfigMode::Overwrite => ServerConfigPolicy::Overwrite,
        ServerConfigMode::Preserve => ServerConfigPolicy::Preserve,
    }
}

fn cli_format_to_output(format: FormatArg) -> OutputFormat {
    match format {
        FormatArg::Text => OutputFormat::Text,
        FormatArg::Json => OutputFormat::Json,
    }
}

/// Install the tracing subscriber selected by `--log`.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("cannot open log file {}", filename))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Some(Command::Bindings(ref args)) => run_bindings(args),
        Some(Command::Materialize(ref args)) => run_materialize(&cli, args),
        None => run_materialize(&cli, &MaterializeArgs::default()),
    }
}

fn run_bindings(args: &BindingsArgs) -> Result<()> {
    let kinds: Vec<DocumentKind> = match args.document {
        Some(ref name) => match DocumentKind::from_name(name) {
            Some(kind) => vec![kind],
            None => bail!(
                "unknown document '{}'; expected one of: {}",
                name,
                DocumentKind::ALL.map(|k| k.name()).join(", ")
            ),
        },
        None => DocumentKind::ALL.to_vec(),
    };
    let output = format_bindings(cli_format_to_output(args.format), &kinds)
        .context("failed to render binding catalog")?;
    print!("{}", output);
    Ok(())
}

fn run_materialize(cli: &Cli, args: &MaterializeArgs) -> Result<()> {
    let env = ProcessEnv;

    // Layer CLI flags over file and environment settings
    let mut config = RunConfig::discover(&env).context("failed to load run configuration")?;
    if let Some(ref dir) = cli.defaults_dir {
        config.paths.defaults_dir = dir.into();
    }
    if let Some(ref dir) = cli.config_dir {
        config.paths.config_dir = dir.into();
    }
    if let Some(mode) = cli.server_config {
        config.server_config = cli_server_config_to_policy(mode);
    }
    if cli.strict {
        config.strict = true;
    }

    info!(
        defaults_dir = %config.paths.defaults_dir.display(),
        config_dir = %config.paths.config_dir.display(),
        server_config = %config.server_config,
        strict = config.strict,
        "Writing configuration files"
    );

    let report = Materializer::new(config)
        .run(&env)
        .context("configuration was not materialized")?;

    for err in report.rejected() {
        eprintln!("Ignored invalid override: {}", err);
    }
    if !args.quiet {
        let output = format_report(cli_format_to_output(args.format), &report)
            .context("failed to render run report")?;
        print!("{}", output);
    }
    Ok(())
}
