use std::path::PathBuf;

/// Errors that can occur during site generation.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template rendering error: {0}")]
    Template(#[from] askama::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("QR encoding error: {0}")]
    QrEncode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
