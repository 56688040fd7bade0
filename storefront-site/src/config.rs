//! Site configuration: business profile, deploy target, paths, and feature
//! flags, loaded from `storefront.toml`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storefront_catalog::ColumnDefaults;
use storefront_catalog::repair::{
    DEFAULT_CURRENCY_SYMBOL, DEFAULT_PRICE_MARKER, DEFAULT_SOCIAL_HANDLE,
};

use crate::SiteError;
use crate::qr::QrStyle;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Environment variable that overrides `deploy.account`.
pub const ACCOUNT_ENV_VAR: &str = "STOREFRONT_ACCOUNT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub business: BusinessProfile,
    pub deploy: DeployConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
    pub qr: QrStyle,
    pub features: Features,
}

/// Identity of the business, rendered into every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub name: String,
    pub tagline: String,
    /// Short mark shown before the name in the navigation bar.
    pub icon: String,
    /// Messaging recipient, used verbatim in `https://wa.me/<number>`.
    pub whatsapp_number: String,
    pub phone_number: String,
    pub address: String,
    /// Business-wide social handle; a leading `@` is optional.
    pub instagram_handle: String,
    pub hours: Vec<String>,
    pub delivery_info: String,
    pub payment_methods: String,
    /// Paragraph for the About page.
    pub story: String,
    /// Footer copyright year. Configured rather than read from the clock so
    /// regenerated output is byte-identical.
    pub copyright_year: u16,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "My Shop".to_string(),
            tagline: "Fresh treats made with love".to_string(),
            icon: "🍰".to_string(),
            whatsapp_number: "+10000000000".to_string(),
            phone_number: "+10000000000".to_string(),
            address: "1 Market Street".to_string(),
            instagram_handle: String::new(),
            hours: vec!["Monday - Saturday: 8:00 AM - 10:00 PM".to_string()],
            delivery_info: "Delivery available on request".to_string(),
            payment_methods: "Cash and Bank Transfer".to_string(),
            story: "Welcome! We bake and cook everything in small batches.".to_string(),
            copyright_year: 2024,
        }
    }
}

impl BusinessProfile {
    /// The business handle without its `@` marker, if one is configured.
    pub fn instagram_username(&self) -> Option<&str> {
        let handle = storefront_catalog::strip_handle_marker(&self.instagram_handle);
        if handle.is_empty() { None } else { Some(handle) }
    }
}

/// Where the generated site will be hosted. Needed to point QR codes at
/// product pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Full public URL of the site root. Wins over `account`.
    pub base_url: Option<String>,
    /// Hosting account name, giving `https://<account>.github.io/<repository>`.
    pub account: Option<String>,
    pub repository: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            account: None,
            repository: "product-qr-system".to_string(),
        }
    }
}

impl DeployConfig {
    /// Public site root without a trailing slash, if enough is configured.
    pub fn resolve_base_url(&self) -> Option<String> {
        if let Some(url) = self.base_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Some(url.trim_end_matches('/').to_string());
        }
        let account = self.account.as_deref().map(str::trim).filter(|a| !a.is_empty())?;
        let repo = self.repository.trim().trim_matches('/');
        if repo.is_empty() {
            Some(format!("https://{account}.github.io"))
        } else {
            Some(format!("https://{account}.github.io/{repo}"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
    /// Character that `repair-columns` replaces in prices. Empty disables it.
    pub price_marker: String,
    pub currency_symbol: String,
    /// Values used to backfill optional columns that are missing.
    pub defaults: BTreeMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert(
            storefront_catalog::COL_SOCIAL_HANDLE.to_string(),
            DEFAULT_SOCIAL_HANDLE.to_string(),
        );
        Self {
            path: PathBuf::from("products.csv"),
            price_marker: DEFAULT_PRICE_MARKER.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            defaults,
        }
    }
}

impl CatalogConfig {
    pub fn column_defaults(&self) -> ColumnDefaults {
        self.defaults
            .iter()
            .fold(ColumnDefaults::empty(), |d, (column, value)| d.with(column, value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Characters of description shown on the listing page.
    pub preview_length: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("docs"),
            preview_length: 80,
        }
    }
}

/// Optional parts of the generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Write `qr-<id>.png` files and link to them.
    pub qr_codes: bool,
    /// Show the QR gallery on the listing page. Needs `qr_codes`.
    pub qr_section: bool,
    pub about_page: bool,
    pub contact_page: bool,
    /// Delivery, payment and hours grid on detail pages.
    pub business_info: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            qr_codes: true,
            qr_section: true,
            about_page: true,
            contact_page: true,
            business_info: true,
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given on the command line.
    Explicit(PathBuf),
    /// `storefront.toml` in the working directory.
    WorkingDir(PathBuf),
    /// `~/.config/storefront/storefront.toml`.
    UserConfig(PathBuf),
    /// No file found; built-in defaults.
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) | Self::WorkingDir(p) | Self::UserConfig(p) => {
                write!(f, "{}", p.display())
            }
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

impl SiteConfig {
    /// Per-user config path: `~/.config/storefront/storefront.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("storefront").join(CONFIG_FILE_NAME))
    }

    /// Resolve the configuration file using a priority chain:
    ///
    /// 1. `explicit` (must exist)
    /// 2. `storefront.toml` in `working_dir`
    /// 3. the per-user config file
    /// 4. built-in defaults
    pub fn resolve(
        explicit: Option<&Path>,
        working_dir: &Path,
    ) -> Result<(Self, ConfigSource), SiteError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(SiteError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok((Self::load_from(path)?, ConfigSource::Explicit(path.to_path_buf())));
        }

        let local = working_dir.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Ok((Self::load_from(&local)?, ConfigSource::WorkingDir(local)));
        }

        if let Some(user) = Self::user_config_path().filter(|p| p.exists()) {
            return Ok((Self::load_from(&user)?, ConfigSource::UserConfig(user)));
        }

        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Load a config from a specific TOML file. Missing keys take defaults.
    pub fn load_from(path: &Path) -> Result<Self, SiteError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents).map_err(|source| SiteError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Write the config as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SiteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, SiteError> {
        toml::to_string_pretty(self)
            .map_err(|e| SiteError::Config(format!("failed to serialize config: {e}")))
    }

    /// Apply the deploy-account override from the environment, if set.
    pub fn apply_env(&mut self) {
        if let Ok(account) = std::env::var(ACCOUNT_ENV_VAR) {
            if !account.trim().is_empty() {
                self.deploy.account = Some(account.trim().to_string());
            }
        }
    }
}
