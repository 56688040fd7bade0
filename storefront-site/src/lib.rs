//! Static site generation for a product catalog.
//!
//! Turns [`ProductRecord`](storefront_catalog::ProductRecord)s into a flat
//! folder of HTML pages, a shared stylesheet and one QR image per product,
//! ready for static hosting.

pub mod assemble;
pub mod config;
pub mod error;
pub mod qr;
pub mod render;

pub use assemble::{
    BuildOptions, FailureKind, SiteFailure, SiteProgress, SiteReport, build_site,
};
pub use config::{BusinessProfile, ConfigSource, Features, SiteConfig};
pub use error::SiteError;
pub use qr::{ErrorCorrection, QrStyle, product_url, render_qr, write_qr};
pub use render::{
    STYLESHEET, order_link, product_page_name, qr_image_name, render_about_page,
    render_contact_page, render_listing_page, render_product_page,
};
