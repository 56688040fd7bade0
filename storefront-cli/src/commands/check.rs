use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::{
    LinkOutcome, ProductRecord, build_catalog, normalize_image_link, plan_column_repair,
    read_table,
};

use crate::commands::catalog_path;
use crate::{CliError, Context};

/// Characters of description shown per record.
const PREVIEW_CHARS: usize = 50;

/// Run the check command: a read-only diagnosis of the catalog.
pub(crate) fn run_check(ctx: &Context, catalog: Option<PathBuf>) -> Result<(), CliError> {
    let (config, _) = ctx.load_config()?;
    let path = catalog_path(catalog, &config.catalog.path);

    log::info!(
        "Checking catalog: {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    crate::log_blank();

    let table = read_table(&path)?;
    log::info!(
        "  {} rows, columns: {}",
        table.len(),
        table.headers.join(", ").if_supports_color(Stdout, |t| t.dimmed()),
    );

    let columns = plan_column_repair(&table, &config.catalog.column_defaults());
    for (column, _) in &columns.backfill {
        log::warn!(
            "  {} optional column {} is missing; `storefront repair-columns` can add it",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            column.if_supports_color(Stdout, |t| t.bold()),
        );
    }

    let catalog = build_catalog(&table, &path)?;
    crate::log_blank();

    let mut problems = catalog.skipped.len();
    let mut share_links = 0usize;
    for record in &catalog.records {
        log_record(record);
        match normalize_image_link(&record.image_url) {
            LinkOutcome::Unchanged if record.image_url.is_empty() => {
                log::warn!(
                    "      {} no image link",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                );
                problems += 1;
            }
            LinkOutcome::Unchanged => {}
            LinkOutcome::Rewritten(_) => {
                log::warn!(
                    "      {} share link, run `storefront fix-links`",
                    "?".if_supports_color(Stdout, |t| t.yellow()),
                );
                share_links += 1;
            }
            LinkOutcome::Unextractable => {
                log::warn!(
                    "      {} share link without a file id: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    record.image_url,
                );
                problems += 1;
            }
        }
        if !record.id.is_filename_safe() {
            log::warn!(
                "      {} id cannot be used in a filename",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            );
            problems += 1;
        }
    }

    for skipped in &catalog.skipped {
        log::warn!(
            "  {} Row {} skipped: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            skipped.row,
            skipped.reason,
        );
    }

    let duplicates = catalog.duplicate_ids();
    for id in &duplicates {
        log::warn!(
            "  {} product_id {} is used more than once; only the first is published",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            id.if_supports_color(Stdout, |t| t.bold()),
        );
    }
    problems += duplicates.len();

    crate::log_blank();
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} products",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        catalog.len(),
    );
    if share_links > 0 {
        log::warn!(
            "  {} {} share links to rewrite",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            share_links,
        );
    }

    if problems == 0 {
        log::info!(
            "  {} Catalog is ready to publish",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        );
        Ok(())
    } else {
        Err(CliError::incomplete(format!("Found {problems} problem(s) in the catalog")))
    }
}

fn log_record(record: &ProductRecord) {
    log::info!(
        "  {} {} {}",
        record.id.if_supports_color(Stdout, |t| t.bold()),
        record.name,
        record.price.if_supports_color(Stdout, |t| t.green()),
    );
    if !record.description.is_empty() {
        log::info!(
            "      {}",
            record
                .description_preview(PREVIEW_CHARS)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
