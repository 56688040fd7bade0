use storefront_catalog::{CatalogError, REQUIRED_COLUMNS};
use storefront_site::SiteError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog could not be read, parsed or written
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// Site generation or configuration failed
    #[error("{0}")]
    Site(#[from] SiteError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// The command ran to the end but reported problems
    #[error("{0}")]
    Incomplete(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn incomplete(msg: impl Into<String>) -> Self {
        Self::Incomplete(msg.into())
    }

    /// A suggestion for fixing the error, shown below the message.
    pub(crate) fn hint(&self) -> Option<String> {
        match self {
            Self::Catalog(CatalogError::NotFound(_)) => Some(
                "Run `storefront init-catalog` for a starter file, or point to yours with \
                 --catalog / catalog.path"
                    .to_string(),
            ),
            Self::Catalog(CatalogError::Malformed { .. }) => Some(format!(
                "The header row must contain: {}",
                REQUIRED_COLUMNS.join(", ")
            )),
            Self::Site(SiteError::Config(_)) => Some(
                "Set deploy.account or deploy.base_url in storefront.toml, pass --account, \
                 set STOREFRONT_ACCOUNT, or use --no-qr"
                    .to_string(),
            ),
            Self::Site(SiteError::ConfigParse { .. }) => {
                Some("Run `storefront config init --force` to start from defaults".to_string())
            }
            _ => None,
        }
    }
}
