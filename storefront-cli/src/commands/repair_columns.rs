use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::repair::persist;
use storefront_catalog::{
    ColumnDefaults, PriceChange, apply_column_repair, plan_column_repair, read_table,
    repair_prices,
};

use crate::cli_types::{PersistArgs, PriceArgs};
use crate::commands::{catalog_path, log_persist_outcome, persist_options};
use crate::{CliError, Context};

/// Run the repair-columns command.
pub(crate) fn run_repair_columns(
    ctx: &Context,
    catalog: Option<PathBuf>,
    defaults: Vec<(String, String)>,
    prices: PriceArgs,
    args: PersistArgs,
) -> Result<(), CliError> {
    let (config, _) = ctx.load_config()?;
    let path = catalog_path(catalog, &config.catalog.path);

    // Command-line defaults win over configured ones.
    let defaults: ColumnDefaults = defaults
        .into_iter()
        .fold(config.catalog.column_defaults(), |d, (column, value)| {
            d.with(column, value)
        });
    let marker = prices.price_marker.unwrap_or(config.catalog.price_marker);
    let symbol = prices.currency.unwrap_or(config.catalog.currency_symbol);

    log::info!(
        "Checking columns in: {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if args.dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be modified".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let mut table = read_table(&path)?;
    let report = plan_column_repair(&table, &defaults);

    log::info!(
        "  Columns: {}",
        table.headers.join(", ").if_supports_color(Stdout, |t| t.dimmed()),
    );
    for (column, value) in &report.backfill {
        log::info!(
            "  {} add {} = \"{}\" to {} rows",
            "\u{1F527}".if_supports_color(Stdout, |t| t.green()),
            column.if_supports_color(Stdout, |t| t.bold()),
            value,
            table.len(),
        );
    }
    for column in &report.missing_required {
        log::warn!(
            "  {} {} is missing and has no safe default; add it by hand",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            column.if_supports_color(Stdout, |t| t.bold()),
        );
    }

    let price_changes = if prices.keep_prices {
        Vec::new()
    } else {
        repair_prices(&mut table, &marker, &symbol)
    };
    for change in &price_changes {
        log_price_change(change);
    }

    if report.is_clean() && price_changes.is_empty() {
        log::info!(
            "  {} All expected columns present, prices clean",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        );
        return Ok(());
    }

    if (report.needs_backfill() || !price_changes.is_empty()) && !args.dry_run {
        let added = apply_column_repair(&mut table, &report);
        let outcome = persist(&table, &path, &persist_options(&args))?;
        log::info!(
            "  {} {} columns added, {} prices fixed",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            added,
            price_changes.len(),
        );
        log_persist_outcome(&outcome);
    }

    if report.missing_required.is_empty() {
        Ok(())
    } else {
        Err(CliError::incomplete(format!(
            "Catalog still lacks required columns: {}",
            report.missing_required.join(", ")
        )))
    }
}

fn log_price_change(change: &PriceChange) {
    log::info!(
        "  {} Row {}: price {} {} {}",
        "\u{1F527}".if_supports_color(Stdout, |t| t.green()),
        change.row,
        change.before.if_supports_color(Stdout, |t| t.dimmed()),
        "\u{2192}".if_supports_color(Stdout, |t| t.green()),
        change.after,
    );
}
