mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{backup, completions, filter, layers, Context};
use crate::error::{exit_code_for, report_error};
use stylefilter_config as config;
use stylefilter_store::paths;

#[derive(Debug, Parser)]
#[command(name = "stylefilter", version, about = "stylefilter CLI")]
struct Cli {
    #[arg(long, global = true)]
    style: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List layers and the state of their filters
    Layers(layers::LayersArgs),
    /// List the operators available to the filter editor
    Operators(layers::OperatorsArgs),
    Show(filter::ShowArgs),
    #[command(name = "set-combining")]
    SetCombining(filter::SetCombiningArgs),
    #[command(name = "set-operator")]
    SetOperator(filter::SetOperatorArgs),
    #[command(name = "set-property")]
    SetProperty(filter::SetPropertyArgs),
    #[command(name = "set-args")]
    SetArgs(filter::SetArgsArgs),
    #[command(name = "add-clause")]
    AddClause(filter::AddClauseArgs),
    #[command(name = "rm-clause")]
    RmClause(filter::RmClauseArgs),
    Clear(filter::ClearArgs),
    Suggest(filter::SuggestArgs),
    Backup(backup::BackupArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        style,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let style_path = paths::resolve_style_path(style, app_config.style_path.clone())
        .with_context(|| "resolve style document path")?;
    debug!(path = %style_path.display(), "style document resolved");

    let catalog = util::load_catalog(&app_config)?;

    let ctx = Context {
        style_path: &style_path,
        json,
        config: &app_config,
        catalog: &catalog,
    };

    match command {
        Command::Layers(args) => layers::list_layers(&ctx, args),
        Command::Operators(args) => layers::list_operators(&ctx, args),
        Command::Show(args) => filter::show_filter(&ctx, args),
        Command::SetCombining(args) => filter::set_combining(&ctx, args),
        Command::SetOperator(args) => filter::set_operator(&ctx, args),
        Command::SetProperty(args) => filter::set_property(&ctx, args),
        Command::SetArgs(args) => filter::set_arguments(&ctx, args),
        Command::AddClause(args) => filter::add_clause(&ctx, args),
        Command::RmClause(args) => filter::remove_clause(&ctx, args),
        Command::Clear(args) => filter::clear_filter(&ctx, args),
        Command::Suggest(args) => filter::suggest(&ctx, args),
        Command::Backup(args) => backup::backup(&ctx, args),
        Command::Completions(_) => {
            unreachable!("completions command handled before loading the style")
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
