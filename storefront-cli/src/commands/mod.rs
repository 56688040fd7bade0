pub(crate) mod check;
pub(crate) mod config;
pub(crate) mod fix_links;
pub(crate) mod generate;
pub(crate) mod init_catalog;
pub(crate) mod repair_columns;

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use storefront_catalog::repair::{PersistOptions, PersistOutcome};

use crate::cli_types::PersistArgs;

/// The catalog path from the command line, else from config.
pub(crate) fn catalog_path(arg: Option<PathBuf>, configured: &Path) -> PathBuf {
    arg.unwrap_or_else(|| configured.to_path_buf())
}

pub(crate) fn persist_options(args: &PersistArgs) -> PersistOptions {
    PersistOptions {
        in_place: args.in_place,
        create_backup: !args.no_backup,
        output: args.out.clone(),
    }
}

pub(crate) fn log_persist_outcome(outcome: &PersistOutcome) {
    if let Some(backup) = &outcome.backup {
        log::info!(
            "  {} Backup: {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            backup.display().if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  {} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        outcome.written.display().if_supports_color(Stdout, |t| t.cyan()),
    );
}
