use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_site::config::{ACCOUNT_ENV_VAR, CONFIG_FILE_NAME};
use storefront_site::{ConfigSource, SiteConfig};

use crate::{CliError, Context};

/// Show the effective configuration and where it came from.
pub(crate) fn run_config_show(ctx: &Context) -> Result<(), CliError> {
    let (config, source) = ctx.load_config()?;

    log::info!(
        "{}",
        "Storefront Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    match &source {
        ConfigSource::Defaults => log::info!(
            "  Config file: {}",
            "(none, using built-in defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        _ => log::info!(
            "  Config file: {}",
            source.if_supports_color(Stdout, |t| t.cyan()),
        ),
    }
    if std::env::var(ACCOUNT_ENV_VAR).is_ok_and(|v| !v.trim().is_empty()) {
        log::info!(
            "  Deploy account overridden by {}",
            ACCOUNT_ENV_VAR.if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    match config.deploy.resolve_base_url() {
        Some(url) => log::info!("  Site URL:    {}", url.if_supports_color(Stdout, |t| t.cyan())),
        None => log::info!(
            "  Site URL:    {}",
            "not set (QR codes need deploy.account or deploy.base_url)"
                .if_supports_color(Stdout, |t| t.red()),
        ),
    }
    log::info!("");

    for line in config.to_toml()?.lines() {
        log::info!("  {line}");
    }
    Ok(())
}

/// Print the config file path in use, or where one would be read from.
pub(crate) fn run_config_path(ctx: &Context) -> Result<(), CliError> {
    if let Some(path) = &ctx.config_path {
        log::info!("{}", path.display());
        return Ok(());
    }
    let local = ctx.cwd.join(CONFIG_FILE_NAME);
    if local.exists() {
        log::info!("{}", local.display());
        return Ok(());
    }
    match SiteConfig::user_config_path() {
        Some(path) => {
            log::info!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::config("could not determine config directory")),
    }
}

/// Write a default config file to `--config` or ./storefront.toml.
pub(crate) fn run_config_init(ctx: &Context, force: bool) -> Result<(), CliError> {
    let path = ctx
        .config_path
        .clone()
        .unwrap_or_else(|| ctx.cwd.join(CONFIG_FILE_NAME));

    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    SiteConfig::default().save_to(&path)?;
    log::info!(
        "{} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "  Edit the [business] and [deploy] sections, then run `storefront generate`",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(dir: &std::path::Path) -> Context {
        Context {
            cwd: dir.to_path_buf(),
            config_path: None,
            quiet: true,
        }
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        run_config_init(&ctx, false).unwrap();

        let path = tmp.path().join(CONFIG_FILE_NAME);
        assert_eq!(SiteConfig::load_from(&path).unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[business]\nname = \"Mine\"\n").unwrap();
        let ctx = context(tmp.path());

        assert!(matches!(run_config_init(&ctx, false), Err(CliError::Config(_))));
        assert!(std::fs::read_to_string(&path).unwrap().contains("Mine"));

        run_config_init(&ctx, true).unwrap();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("Mine"));
    }
}
