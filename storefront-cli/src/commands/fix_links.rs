use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::links::LinkChange;
use storefront_catalog::repair::persist;
use storefront_catalog::{COL_IMAGE_URL, LinkOutcome, normalize_table, read_table};

use crate::cli_types::PersistArgs;
use crate::commands::{catalog_path, log_persist_outcome, persist_options};
use crate::{CliError, Context};

/// Run the fix-links command.
pub(crate) fn run_fix_links(
    ctx: &Context,
    catalog: Option<PathBuf>,
    args: PersistArgs,
) -> Result<(), CliError> {
    let (config, _) = ctx.load_config()?;
    let path = catalog_path(catalog, &config.catalog.path);

    log::info!(
        "Checking image links in: {}",
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
    let report = normalize_table(&mut table);

    for change in &report.changes {
        log_change(change);
    }
    if !table.has_column(COL_IMAGE_URL) {
        log::warn!(
            "  {} No {COL_IMAGE_URL} column found",
            "?".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else if table.is_empty() {
        log::info!(
            "  {}",
            "No product rows".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    crate::log_blank();
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} rewritten, {} already direct",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.rewritten(),
        report.unchanged(),
    );
    if report.unextractable() > 0 {
        log::warn!(
            "  {} {} share links without a file id (left unchanged)",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            report.unextractable(),
        );
    }

    if !report.has_rewrites() {
        log::info!(
            "  {}",
            "Nothing to write".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }
    if args.dry_run {
        return Ok(());
    }

    let outcome = persist(&table, &path, &persist_options(&args))?;
    log_persist_outcome(&outcome);
    Ok(())
}

fn log_change(change: &LinkChange) {
    match &change.outcome {
        LinkOutcome::Rewritten(direct) => {
            log::info!(
                "  {} Row {}: {}",
                "\u{1F527}".if_supports_color(Stdout, |t| t.green()),
                change.row,
                change.before.if_supports_color(Stdout, |t| t.dimmed()),
            );
            log::info!(
                "      {} {}",
                "\u{2192}".if_supports_color(Stdout, |t| t.green()),
                direct,
            );
        }
        LinkOutcome::Unextractable => {
            log::warn!(
                "  {} Row {}: no file id in {}",
                "?".if_supports_color(Stdout, |t| t.yellow()),
                change.row,
                change.before,
            );
        }
        LinkOutcome::Unchanged => {
            log::debug!("Row {}: unchanged", change.row);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn context(dir: &std::path::Path) -> Context {
        let config_path = dir.join("storefront.toml");
        fs::write(&config_path, "").unwrap();
        Context {
            cwd: dir.to_path_buf(),
            config_path: Some(config_path),
            quiet: true,
        }
    }

    #[test]
    fn test_default_writes_fixed_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("products.csv");
        let before = "product_id,image_url\n101,https://drive.google.com/file/d/XYZ/view\n";
        fs::write(&source, before).unwrap();

        run_fix_links(&context(tmp.path()), Some(source.clone()), PersistArgs::default()).unwrap();

        assert_eq!(fs::read_to_string(&source).unwrap(), before);
        let fixed = fs::read_to_string(tmp.path().join("products_fixed.csv")).unwrap();
        assert!(fixed.contains("https://drive.google.com/uc?export=view&id=XYZ"));
    }

    #[test]
    fn test_in_place_keeps_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("products.csv");
        let before = "product_id,image_url\n101,https://drive.google.com/file/d/XYZ/view\n";
        fs::write(&source, before).unwrap();

        let args = PersistArgs {
            in_place: true,
            ..Default::default()
        };
        run_fix_links(&context(tmp.path()), Some(source.clone()), args).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("products.csv.bak")).unwrap(),
            before
        );
        assert!(fs::read_to_string(&source).unwrap().contains("uc?export=view&id=XYZ"));
    }

    #[test]
    fn test_header_only_catalog_has_image_column() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("products.csv");
        fs::write(&source, "product_id,image_url\n").unwrap();

        let table = read_table(&source).unwrap();
        assert!(table.has_column(COL_IMAGE_URL));
        assert!(table.is_empty());

        run_fix_links(&context(tmp.path()), Some(source), PersistArgs::default()).unwrap();
        assert!(!tmp.path().join("products_fixed.csv").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("products.csv");
        fs::write(&source, "product_id,image_url\n1,https://drive.google.com/file/d/Q/view\n")
            .unwrap();
        let args = PersistArgs {
            dry_run: true,
            ..Default::default()
        };
        run_fix_links(&context(tmp.path()), Some(source), args).unwrap();
        assert!(!tmp.path().join("products_fixed.csv").exists());
    }
}
