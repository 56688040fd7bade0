//! QR code images pointing at product pages.

use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use storefront_catalog::ProductId;

use crate::SiteError;
use crate::render::product_page_name;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// QR error-correction level. Higher levels survive more damage but need
/// more modules for the same payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

/// Bitmap layout of a generated QR image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrStyle {
    /// Pixels per module side.
    pub module_size: u32,
    /// Light border, in modules, on every side.
    pub quiet_zone: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            module_size: 10,
            quiet_zone: 4,
            error_correction: ErrorCorrection::M,
        }
    }
}

/// Public URL of a product's detail page.
pub fn product_url(base_url: &str, id: &ProductId) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), product_page_name(id))
}

/// Encode `data` into a black-on-white bitmap using the smallest QR version
/// that fits.
pub fn render_qr(data: &str, style: &QrStyle) -> Result<GrayImage, SiteError> {
    if style.module_size == 0 {
        return Err(SiteError::QrEncode("module_size must be at least 1".into()));
    }
    let code = QrCode::with_error_correction_level(data.as_bytes(), style.error_correction.into())
        .map_err(|e| SiteError::QrEncode(e.to_string()))?;

    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = (modules + 2 * style.quiet_zone) * style.module_size;

    let mut img = GrayImage::from_pixel(side, side, LIGHT);
    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = (i as u32) % modules + style.quiet_zone;
        let my = (i as u32) / modules + style.quiet_zone;
        for dy in 0..style.module_size {
            for dx in 0..style.module_size {
                img.put_pixel(mx * style.module_size + dx, my * style.module_size + dy, DARK);
            }
        }
    }
    Ok(img)
}

/// Render a QR code and save it as PNG.
pub fn write_qr(data: &str, path: &Path, style: &QrStyle) -> Result<(), SiteError> {
    let img = render_qr(data, style)?;
    img.save_with_format(path, ImageFormat::Png)?;
    log::debug!("Wrote QR code {} -> {data}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "tests/qr_tests.rs"]
mod tests;
