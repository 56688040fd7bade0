//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(
    about = "Generate a static storefront site with QR codes from a product catalog",
    long_about = None
)]
pub(crate) struct Cli {
    /// Config file to use instead of ./storefront.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `generate`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where a rewritten catalog is written.
#[derive(Args, Clone, Default)]
pub(crate) struct PersistArgs {
    /// Overwrite the catalog file instead of writing <name>_fixed.csv
    #[arg(long, conflicts_with = "out")]
    pub in_place: bool,

    /// With --in-place, skip the .bak backup
    #[arg(long, requires = "in_place")]
    pub no_backup: bool,

    /// Write the result to this file
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Price marker replacement for repair-columns.
#[derive(Args, Clone, Default)]
pub(crate) struct PriceArgs {
    /// Text to replace in prices (default: catalog.price_marker from config)
    #[arg(long)]
    pub price_marker: Option<String>,

    /// Currency symbol written in its place (default: catalog.currency_symbol)
    #[arg(long)]
    pub currency: Option<String>,

    /// Leave prices untouched
    #[arg(long, conflicts_with_all = ["price_marker", "currency"])]
    pub keep_prices: bool,
}

#[derive(Args, Clone, Default)]
pub(crate) struct GenerateArgs {
    /// Catalog CSV (default: catalog.path from config)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Output directory (default: output.dir from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hosting account used to build QR code URLs
    #[arg(long)]
    pub account: Option<String>,

    /// Render share links as they are instead of rewriting them to direct
    /// image links (the catalog file is never modified either way)
    #[arg(long)]
    pub keep_share_links: bool,

    /// Skip QR code images
    #[arg(long)]
    pub no_qr: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate the site: pages, stylesheet and QR codes
    Generate(GenerateArgs),

    /// Rewrite cloud-storage share links in the catalog to direct image links
    FixLinks {
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        #[command(flatten)]
        persist: PersistArgs,
    },

    /// Add missing optional columns with default values and fix price markers
    RepairColumns {
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Column default as COLUMN=VALUE (repeatable)
        #[arg(short, long = "default", value_parser = parse_column_default)]
        defaults: Vec<(String, String)>,

        #[command(flatten)]
        prices: PriceArgs,

        #[command(flatten)]
        persist: PersistArgs,
    },

    /// Write a starter catalog with every expected column and sample rows
    InitCatalog {
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Diagnose the catalog: columns, records and image links
    Check {
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Manage the storefront.toml configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective configuration and where it came from
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse `COLUMN=VALUE`. The value may be empty or contain `=`.
fn parse_column_default(s: &str) -> Result<(String, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{s}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{s}'"));
    }
    Ok((column.to_string(), value.to_string()))
}
