//! Site assembly: writes the complete static site for a catalog.
//!
//! A run is a total regeneration. Failures for a single page or image are
//! recorded in the [`SiteReport`] and the remaining files are still written.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use storefront_catalog::{ProductId, ProductRecord};

use crate::SiteError;
use crate::config::SiteConfig;
use crate::qr::{product_url, write_qr};
use crate::render::{
    ABOUT_FILE, CONTACT_FILE, INDEX_FILE, STYLESHEET, STYLESHEET_FILE, product_page_name,
    qr_image_name, render_about_page, render_contact_page, render_listing_page,
    render_product_page,
};

/// Per-run options that override the configuration.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub output_dir: PathBuf,
    /// Write QR images. Only takes effect when also enabled in the config.
    pub qr_codes: bool,
}

impl BuildOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            output_dir: config.output.dir.clone(),
            qr_codes: config.features.qr_codes,
        }
    }
}

/// Progress information for callbacks.
#[derive(Debug, Clone)]
pub enum SiteProgress {
    /// Records screened; `records` will be written.
    Started { records: usize },
    /// A file is about to be written.
    Writing {
        file: String,
        index: usize,
        total: usize,
    },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A detail page could not be rendered or written.
    RecordRender,
    /// A QR image could not be encoded or written.
    ImageEncode,
    /// The id was already used by an earlier record; this record was skipped.
    DuplicateId,
    /// The id cannot be used in a filename; this record was skipped.
    UnsafeId,
    /// The stylesheet, listing page or a boilerplate page failed.
    StaticPage,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RecordRender => "page",
            Self::ImageEncode => "qr image",
            Self::DuplicateId => "duplicate id",
            Self::UnsafeId => "unsafe id",
            Self::StaticPage => "site page",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct SiteFailure {
    pub kind: FailureKind,
    pub id: Option<ProductId>,
    /// Output filename involved, if any.
    pub file: Option<String>,
    pub message: String,
}

/// Outcome of one [`build_site`] run.
#[derive(Debug, Clone, Default)]
pub struct SiteReport {
    pub output_dir: PathBuf,
    pub stylesheet_written: bool,
    /// HTML pages written, detail and static.
    pub pages_written: usize,
    pub images_written: usize,
    /// Records whose detail page (and QR image, when enabled) were written.
    pub records_generated: usize,
    pub failures: Vec<SiteFailure>,
}

impl SiteReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &SiteFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    fn fail(
        &mut self,
        kind: FailureKind,
        id: Option<&ProductId>,
        file: Option<&str>,
        message: impl Into<String>,
    ) {
        let failure = SiteFailure {
            kind,
            id: id.cloned(),
            file: file.map(str::to_string),
            message: message.into(),
        };
        log::warn!(
            "{} failure{}: {}",
            failure.kind,
            failure
                .file
                .as_deref()
                .map(|f| format!(" ({f})"))
                .unwrap_or_default(),
            failure.message
        );
        self.failures.push(failure);
    }
}

/// Drop records that cannot be written: unsafe ids and repeated ids.
///
/// The first record with a given id wins; later ones are reported.
fn screen_records<'a>(
    records: &'a [ProductRecord],
    report: &mut SiteReport,
) -> Vec<&'a ProductRecord> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if !record.id.is_filename_safe() {
            report.fail(
                FailureKind::UnsafeId,
                Some(&record.id),
                None,
                format!("'{}' cannot be used in a filename; skipped", record.id),
            );
            continue;
        }
        if !seen.insert(&record.id) {
            report.fail(
                FailureKind::DuplicateId,
                Some(&record.id),
                Some(&product_page_name(&record.id)),
                format!(
                    "'{}' ({}) repeats an earlier id; first occurrence kept",
                    record.id, record.name
                ),
            );
            continue;
        }
        kept.push(record);
    }
    kept
}

/// Generate the complete site for `records` into `options.output_dir`.
///
/// Errors only when nothing could be written: a missing deploy target with
/// QR codes enabled, or an output directory that cannot be created.
pub fn build_site(
    records: &[ProductRecord],
    config: &SiteConfig,
    options: &BuildOptions,
    progress: &dyn Fn(SiteProgress),
) -> Result<SiteReport, SiteError> {
    let mut config = config.clone();
    config.features.qr_codes &= options.qr_codes;

    let base_url = if config.features.qr_codes {
        Some(config.deploy.resolve_base_url().ok_or_else(|| {
            SiteError::Config(
                "QR codes need a deploy target: set deploy.account or deploy.base_url".into(),
            )
        })?)
    } else {
        None
    };

    let out = options.output_dir.as_path();
    fs::create_dir_all(out)?;

    let mut report = SiteReport {
        output_dir: out.to_path_buf(),
        ..Default::default()
    };

    let kept: Vec<ProductRecord> = screen_records(records, &mut report)
        .into_iter()
        .cloned()
        .collect();

    let static_pages = 2 + usize::from(config.features.about_page)
        + usize::from(config.features.contact_page);
    let images = if base_url.is_some() { kept.len() } else { 0 };
    let total = static_pages + kept.len() + images;
    let mut index = 0;
    let mut step = |file: &str| {
        progress(SiteProgress::Writing {
            file: file.to_string(),
            index,
            total,
        });
        index += 1;
    };

    progress(SiteProgress::Started {
        records: kept.len(),
    });

    step(STYLESHEET_FILE);
    match fs::write(out.join(STYLESHEET_FILE), STYLESHEET) {
        Ok(()) => report.stylesheet_written = true,
        Err(e) => {
            report.fail(FailureKind::StaticPage, None, Some(STYLESHEET_FILE), e.to_string())
        }
    }

    let mut page_ok = vec![false; kept.len()];
    for (i, record) in kept.iter().enumerate() {
        let file = product_page_name(&record.id);
        step(&file);
        match write_page(out, &file, render_product_page(record, &kept, &config)) {
            Ok(()) => {
                report.pages_written += 1;
                page_ok[i] = true;
            }
            Err(e) => report.fail(
                FailureKind::RecordRender,
                Some(&record.id),
                Some(&file),
                e.to_string(),
            ),
        }
    }

    let mut static_page = |file: &str, html: Result<String, SiteError>, report: &mut SiteReport| {
        step(file);
        match write_page(out, file, html) {
            Ok(()) => report.pages_written += 1,
            Err(e) => report.fail(FailureKind::StaticPage, None, Some(file), e.to_string()),
        }
    };
    static_page(INDEX_FILE, render_listing_page(&kept, &config), &mut report);
    if config.features.about_page {
        static_page(ABOUT_FILE, render_about_page(&config), &mut report);
    }
    if config.features.contact_page {
        static_page(CONTACT_FILE, render_contact_page(&config), &mut report);
    }

    for (i, record) in kept.iter().enumerate() {
        let Some(base_url) = base_url.as_deref() else {
            if page_ok[i] {
                report.records_generated += 1;
            }
            continue;
        };
        let file = qr_image_name(&record.id);
        step(&file);
        let url = product_url(base_url, &record.id);
        match write_qr(&url, &out.join(&file), &config.qr) {
            Ok(()) => {
                report.images_written += 1;
                if page_ok[i] {
                    report.records_generated += 1;
                }
            }
            Err(e) => report.fail(
                FailureKind::ImageEncode,
                Some(&record.id),
                Some(&file),
                e.to_string(),
            ),
        }
    }

    progress(SiteProgress::Done);
    Ok(report)
}

fn write_page(dir: &Path, file: &str, html: Result<String, SiteError>) -> Result<(), SiteError> {
    let html = html?;
    fs::write(dir.join(file), html)?;
    log::debug!("Wrote {file}");
    Ok(())
}
