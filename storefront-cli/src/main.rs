//! storefront CLI
//!
//! Command-line interface for turning a product catalog into a static
//! storefront site with QR codes.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_site::{ConfigSource, SiteConfig};

use cli_types::{Cli, Commands, ConfigAction, GenerateArgs};
pub(crate) use error::CliError;

/// Shared state for every command.
pub(crate) struct Context {
    pub cwd: PathBuf,
    /// `--config`, if given.
    pub config_path: Option<PathBuf>,
    pub quiet: bool,
}

impl Context {
    /// Resolve the configuration file and apply environment overrides.
    pub(crate) fn load_config(&self) -> Result<(SiteConfig, ConfigSource), CliError> {
        let (mut config, source) = SiteConfig::resolve(self.config_path.as_deref(), &self.cwd)?;
        config.apply_env();
        log::debug!("Using config from {source}");
        Ok((config, source))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let ctx = Context {
        cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        config_path: cli.config,
        quiet: cli.quiet,
    };

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Generate(GenerateArgs::default()));

    let result = match command {
        Commands::Generate(args) => commands::generate::run_generate(&ctx, args),
        Commands::FixLinks { catalog, persist } => {
            commands::fix_links::run_fix_links(&ctx, catalog, persist)
        }
        Commands::RepairColumns {
            catalog,
            defaults,
            prices,
            persist,
        } => commands::repair_columns::run_repair_columns(
            &ctx, catalog, defaults, prices, persist,
        ),
        Commands::InitCatalog { catalog, force } => {
            commands::init_catalog::run_init_catalog(&ctx, catalog, force)
        }
        Commands::Check { catalog } => commands::check::run_check(&ctx, catalog),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => commands::config::run_config_path(&ctx),
            ConfigAction::Init { force } => commands::config::run_config_init(&ctx, force),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            if let Some(hint) = e.hint() {
                log::error!("  {}", hint.if_supports_color(Stdout, |t| t.dimmed()));
            }
            ExitCode::FAILURE
        }
    }
}

/// Install the logger. Normal output goes through `log::info!`, so `--quiet`
/// hides everything but warnings and errors.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stdout);

    if verbose {
        builder.format_timestamp_millis().format_target(false);
    } else {
        builder.format(|buf, record| match record.level() {
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            Level::Warn if record.target().starts_with("storefront_") => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            _ => writeln!(buf, "{}", record.args()),
        });
    }

    builder.init();
}

/// Emit an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
