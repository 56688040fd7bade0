use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::{template_table, write_table};

use crate::commands::catalog_path;
use crate::{CliError, Context};

/// Write a starter catalog to `--catalog` or catalog.path.
pub(crate) fn run_init_catalog(
    ctx: &Context,
    catalog: Option<PathBuf>,
    force: bool,
) -> Result<(), CliError> {
    let (config, _) = ctx.load_config()?;
    let path = catalog_path(catalog, &config.catalog.path);

    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let table = template_table();
    write_table(&table, &path)?;
    log::info!(
        "{} Wrote {} with {} sample products",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        table.len(),
    );
    log::info!("  Replace the sample rows with your products, then run `storefront generate`");
    Ok(())
}
