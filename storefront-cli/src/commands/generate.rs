use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::{Catalog, build_catalog, is_direct_link, normalize_table, read_table};
use storefront_site::{BuildOptions, SiteProgress, SiteReport, build_site};

use crate::cli_types::GenerateArgs;
use crate::commands::catalog_path;
use crate::{CliError, Context};

/// Run the generate command.
pub(crate) fn run_generate(ctx: &Context, args: GenerateArgs) -> Result<(), CliError> {
    let (mut config, source) = ctx.load_config()?;
    if let Some(account) = args.account {
        config.deploy.account = Some(account);
    }

    let catalog_file = catalog_path(args.catalog, &config.catalog.path);
    let mut options = BuildOptions::from_config(&config);
    if let Some(output) = args.output {
        options.output_dir = output;
    }
    options.qr_codes &= !args.no_qr;

    log::info!(
        "Catalog: {}",
        catalog_file.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "Output:  {}",
        options.output_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "{}",
        format!("Config:  {source}").if_supports_color(Stdout, |t| t.dimmed()),
    );
    crate::log_blank();

    let mut table = read_table(&catalog_file)?;
    if !args.keep_share_links {
        let report = normalize_table(&mut table);
        if report.has_rewrites() {
            log::info!(
                "  {} Rewrote {} share links (catalog file unchanged)",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                report.rewritten(),
            );
        }
    }
    let catalog = build_catalog(&table, &catalog_file)?;
    log_catalog_warnings(&catalog);

    let pb = crate::spinner::spinner(ctx.quiet);
    let progress_callback = |progress: SiteProgress| match progress {
        SiteProgress::Started { records } => {
            pb.set_message(format!("Generating site for {records} products"));
        }
        SiteProgress::Writing { file, index, total } => {
            pb.set_message(format!("[{}/{}] {}", index + 1, total, file));
        }
        SiteProgress::Done => pb.finish_and_clear(),
    };

    let result = build_site(&catalog.records, &config, &options, &progress_callback);
    pb.finish_and_clear();
    let report = result?;

    log_report(&report);

    if let Some(base_url) = config.deploy.resolve_base_url() {
        log::info!(
            "  Live site: {}",
            format!("{base_url}/").if_supports_color(Stdout, |t| t.cyan()),
        );
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::incomplete(format!(
            "Site generated with {} problem(s)",
            report.failures.len()
        )))
    }
}

fn log_catalog_warnings(catalog: &Catalog) {
    log::info!(
        "Loaded {} products",
        catalog.len().if_supports_color(Stdout, |t| t.bold()),
    );
    for skipped in &catalog.skipped {
        log::warn!(
            "  {} Row {} skipped: {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            skipped.row,
            skipped.reason,
        );
    }
    let share_links = catalog
        .records
        .iter()
        .filter(|r| !is_direct_link(&r.image_url))
        .count();
    if share_links > 0 {
        log::warn!(
            "  {} {} image links are share links and may not display; \
             run `storefront fix-links` to repair the catalog",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            share_links,
        );
    }
}

fn log_report(report: &SiteReport) {
    crate::log_blank();
    let level = if report.is_clean() { Level::Info } else { Level::Warn };
    log::log!(
        level,
        "{} {}",
        "Summary:".if_supports_color(Stdout, |t| t.bold()),
        format!("({})", report.output_dir.display()).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "  {} {} products generated",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.records_generated,
    );
    log::info!(
        "  {} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        files_written(report),
    );
    for failure in &report.failures {
        log::warn!(
            "  {} [{}] {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            failure.kind,
            failure.message,
        );
    }
}

fn files_written(report: &SiteReport) -> String {
    format!(
        "{} pages, {} QR codes, {} stylesheet",
        report.pages_written,
        report.images_written,
        usize::from(report.stylesheet_written),
    )
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use storefront_catalog::CatalogError;

    use super::*;

    const SHARE: &str = "https://drive.google.com/file/d/AbC123/view?usp=sharing";

    fn setup(dir: &Path, account: Option<&str>) -> Context {
        let csv = format!(
            "product_id,product_name,price,description,image_url\n\
             101,Kilishi,₦2500,Spicy dried beef,{SHARE}\n\
             102,Chin Chin,₦1500,Crunchy,https://img.example/2.jpg\n"
        );
        fs::write(dir.join("products.csv"), csv).unwrap();

        let mut toml = format!(
            "[catalog]\npath = '{}'\n\n[output]\ndir = '{}'\n",
            dir.join("products.csv").display(),
            dir.join("docs").display(),
        );
        if let Some(account) = account {
            toml.push_str(&format!("\n[deploy]\naccount = '{account}'\n"));
        }
        let config_path = dir.join("storefront.toml");
        fs::write(&config_path, toml).unwrap();

        Context {
            cwd: dir.to_path_buf(),
            config_path: Some(config_path),
            quiet: true,
        }
    }

    #[test]
    fn test_generate_normalizes_in_memory_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = setup(tmp.path(), Some("shop"));
        let before = fs::read(tmp.path().join("products.csv")).unwrap();

        run_generate(&ctx, GenerateArgs::default()).unwrap();

        let docs = tmp.path().join("docs");
        for file in ["index.html", "styles.css", "product-101.html", "qr-102.png"] {
            assert!(docs.join(file).is_file(), "{file}");
        }
        let page = fs::read_to_string(docs.join("product-101.html")).unwrap();
        assert!(page.contains("https://drive.google.com/uc?export=view&amp;id=AbC123"));
        assert!(!page.contains("/file/d/AbC123"));
        assert_eq!(fs::read(tmp.path().join("products.csv")).unwrap(), before);
    }

    #[test]
    fn test_keep_share_links_renders_links_as_given() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = setup(tmp.path(), Some("shop"));
        let args = GenerateArgs {
            keep_share_links: true,
            ..Default::default()
        };
        run_generate(&ctx, args).unwrap();

        let page = fs::read_to_string(tmp.path().join("docs").join("product-101.html")).unwrap();
        assert!(page.contains("/file/d/AbC123/view"));
        assert!(!page.contains("uc?export=view"));
    }

    #[test]
    fn test_missing_price_column_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = setup(tmp.path(), Some("shop"));
        fs::write(
            tmp.path().join("products.csv"),
            "product_id,product_name,description,image_url\n101,Kilishi,Spicy,x\n",
        )
        .unwrap();

        let err = run_generate(&ctx, GenerateArgs::default()).unwrap_err();
        match &err {
            CliError::Catalog(CatalogError::Malformed { missing, .. }) => {
                assert_eq!(missing, &vec!["price".to_string()]);
            }
            other => panic!("expected malformed catalog, got {other:?}"),
        }
        assert!(err.hint().is_some());
        assert!(!tmp.path().join("docs").exists());
    }

    #[test]
    fn test_files_written_counts_stylesheet_from_report() {
        let mut report = SiteReport {
            pages_written: 4,
            images_written: 2,
            stylesheet_written: true,
            ..Default::default()
        };
        assert_eq!(files_written(&report), "4 pages, 2 QR codes, 1 stylesheet");
        report.stylesheet_written = false;
        assert_eq!(files_written(&report), "4 pages, 2 QR codes, 0 stylesheet");
    }

    #[test]
    fn test_account_flag_supplies_deploy_target() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = setup(tmp.path(), None);
        let args = GenerateArgs {
            account: Some("flagged".to_string()),
            ..Default::default()
        };
        run_generate(&ctx, args).unwrap();
        assert!(tmp.path().join("docs").join("qr-101.png").is_file());
    }

    #[test]
    fn test_no_qr_skips_images() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = setup(tmp.path(), None);
        let args = GenerateArgs {
            no_qr: true,
            ..Default::default()
        };
        run_generate(&ctx, args).unwrap();
        let docs = tmp.path().join("docs");
        assert!(docs.join("product-102.html").is_file());
        assert!(!docs.join("qr-102.png").exists());
    }

    #[test]
    fn test_missing_catalog_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = setup(tmp.path(), Some("shop"));
        let args = GenerateArgs {
            catalog: Some(tmp.path().join("nope.csv")),
            ..Default::default()
        };
        let err = run_generate(&ctx, args).unwrap_err();
        assert!(err.hint().is_some());
        assert!(!tmp.path().join("docs").exists());
    }
}
