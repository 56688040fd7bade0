//! HTML rendering of catalog pages.
//!
//! Every page is a compiled askama template. Product fields are escaped by
//! the template engine, so names or descriptions containing `<`, `&` or
//! quotes cannot break the markup.

use askama::Template;
use storefront_catalog::{ProductId, ProductRecord};

use crate::SiteError;
use crate::config::{BusinessProfile, SiteConfig};

/// Shared stylesheet, written once per site as [`STYLESHEET_FILE`].
pub const STYLESHEET: &str = include_str!("../assets/styles.css");

pub const STYLESHEET_FILE: &str = "styles.css";
pub const INDEX_FILE: &str = "index.html";
pub const ABOUT_FILE: &str = "about.html";
pub const CONTACT_FILE: &str = "contact.html";

/// Detail page filename: `product-<id>.html`.
pub fn product_page_name(id: &ProductId) -> String {
    format!("product-{id}.html")
}

/// QR image filename: `qr-<id>.png`.
pub fn qr_image_name(id: &ProductId) -> String {
    format!("qr-{id}.png")
}

/// Messaging link that opens a chat pre-filled with an order for `record`.
pub fn order_link(business: &BusinessProfile, record: &ProductRecord) -> String {
    let message = format!("Hello! I'd like to order: {} - {}", record.name, record.price);
    format!("{}?text={}", chat_link(business), encode_message(&message))
}

/// Messaging link with no pre-filled text.
pub fn chat_link(business: &BusinessProfile) -> String {
    format!("https://wa.me/{}", business.whatsapp_number.trim())
}

/// Percent-encode the characters that would break a query value.
///
/// Spaces become `%20`. `%`, `&`, `#` and `+` are encoded too since they
/// would otherwise end or corrupt the `text` parameter. Everything else,
/// including non-ASCII, is left literal.
fn encode_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            _ => out.push(c),
        }
    }
    out
}

fn instagram_url(username: &str) -> String {
    format!("https://instagram.com/{username}")
}

// ── Template contexts ───────────────────────────────────────────────────────

/// Fields shared by every page through `base.html`.
struct Layout<'a> {
    title: String,
    business: &'a BusinessProfile,
    /// Which navigation entry is highlighted: "home", "about", "contact" or "".
    active: &'static str,
    about_page: bool,
    contact_page: bool,
    chat_url: String,
    has_instagram: bool,
    instagram_url: String,
    instagram_username: String,
}

impl<'a> Layout<'a> {
    fn new(config: &'a SiteConfig, title: String, active: &'static str) -> Self {
        let business = &config.business;
        let username = business.instagram_username().unwrap_or_default();
        Self {
            title,
            business,
            active,
            about_page: config.features.about_page,
            contact_page: config.features.contact_page,
            chat_url: chat_link(business),
            has_instagram: !username.is_empty(),
            instagram_url: instagram_url(username),
            instagram_username: username.to_string(),
        }
    }
}

struct ListingEntry<'a> {
    record: &'a ProductRecord,
    page: String,
    qr_image: String,
    order_url: String,
    preview: String,
}

struct NavEntry<'a> {
    record: &'a ProductRecord,
    page: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct ListingPage<'a> {
    layout: Layout<'a>,
    entries: Vec<ListingEntry<'a>>,
    show_qr_links: bool,
    show_qr_section: bool,
}

#[derive(Template)]
#[template(path = "product.html")]
struct ProductPage<'a> {
    layout: Layout<'a>,
    record: &'a ProductRecord,
    order_url: String,
    qr_image: String,
    show_qr_link: bool,
    has_social: bool,
    social_url: String,
    social_username: String,
    show_business_info: bool,
    has_others: bool,
    others: Vec<NavEntry<'a>>,
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutPage<'a> {
    layout: Layout<'a>,
}

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactPage<'a> {
    layout: Layout<'a>,
}

// ── Rendering ───────────────────────────────────────────────────────────────

/// Render the detail page for `record`.
///
/// `catalog` supplies the cross-navigation list: every record whose id
/// differs from `record.id`, in catalog order.
pub fn render_product_page(
    record: &ProductRecord,
    catalog: &[ProductRecord],
    config: &SiteConfig,
) -> Result<String, SiteError> {
    let title = format!("{} | {}", record.name, config.business.name);

    // Record handle first, then the business-wide one.
    let social_username = record
        .social_username()
        .or_else(|| config.business.instagram_username())
        .unwrap_or_default();

    let others: Vec<NavEntry> = catalog
        .iter()
        .filter(|other| other.id != record.id)
        .map(|other| NavEntry {
            record: other,
            page: product_page_name(&other.id),
        })
        .collect();

    let page = ProductPage {
        layout: Layout::new(config, title, ""),
        record,
        order_url: order_link(&config.business, record),
        qr_image: qr_image_name(&record.id),
        show_qr_link: config.features.qr_codes,
        has_social: !social_username.is_empty(),
        social_url: instagram_url(social_username),
        social_username: social_username.to_string(),
        show_business_info: config.features.business_info,
        has_others: !others.is_empty(),
        others,
    };
    Ok(page.render()?)
}

/// Render the listing page: one entry per record, in catalog order.
pub fn render_listing_page(
    catalog: &[ProductRecord],
    config: &SiteConfig,
) -> Result<String, SiteError> {
    let entries = catalog
        .iter()
        .map(|record| ListingEntry {
            record,
            page: product_page_name(&record.id),
            qr_image: qr_image_name(&record.id),
            order_url: order_link(&config.business, record),
            preview: record.description_preview(config.output.preview_length),
        })
        .collect();

    let qr = config.features.qr_codes;
    let page = ListingPage {
        layout: Layout::new(config, config.business.name.clone(), "home"),
        entries,
        show_qr_links: qr,
        show_qr_section: qr && config.features.qr_section && !catalog.is_empty(),
    };
    Ok(page.render()?)
}

pub fn render_about_page(config: &SiteConfig) -> Result<String, SiteError> {
    let title = format!("About Us | {}", config.business.name);
    Ok(AboutPage {
        layout: Layout::new(config, title, "about"),
    }
    .render()?)
}

pub fn render_contact_page(config: &SiteConfig) -> Result<String, SiteError> {
    let title = format!("Contact Us | {}", config.business.name);
    Ok(ContactPage {
        layout: Layout::new(config, title, "contact"),
    }
    .render()?)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
