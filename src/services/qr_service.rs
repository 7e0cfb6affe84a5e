use std::io::Cursor;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{imageops, DynamicImage, ImageBuffer, ImageFormat, Rgba};
use log::{debug, warn};
use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use crate::models::PixError;
use crate::traits::CodeRenderer;

pub const DEFAULT_SIZE: u32 = 300;
/// One pixel per module of the smallest QR version.
pub const MIN_SIZE: u32 = 21;
pub const MAX_SIZE: u32 = 2048;
pub const DEFAULT_DARK_COLOR: &str = "#000000";
pub const DEFAULT_LIGHT_COLOR: &str = "#FFFFFF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Edge length of the square image in pixels.
    pub size: u32,
    pub dark_color: String,
    pub light_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            dark_color: DEFAULT_DARK_COLOR.to_string(),
            light_color: DEFAULT_LIGHT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Png,
    /// Placeholder artwork; not scannable.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCode {
    pub data_uri: String,
    pub kind: RenderKind,
}

impl RenderedCode {
    pub fn is_fallback(&self) -> bool {
        self.kind == RenderKind::Fallback
    }
}

/// QR code with error-correction level M, quiet zone included, centred on a
/// square canvas of `options.size` pixels.
pub struct QrPngRenderer;

impl CodeRenderer for QrPngRenderer {
    fn render_png(&self, payload: &str, options: &RenderOptions) -> Result<Vec<u8>, PixError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&options.size) {
            return Err(PixError::RenderFailure(format!(
                "size {} outside {}..={} pixels",
                options.size, MIN_SIZE, MAX_SIZE
            )));
        }
        let dark = parse_color(&options.dark_color)?;
        let light = parse_color(&options.light_color)?;

        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| PixError::RenderFailure(format!("QR encode error: {}", e)))?;

        let rendered = code
            .render::<Rgba<u8>>()
            .dark_color(dark)
            .light_color(light)
            .quiet_zone(true)
            .max_dimensions(options.size, options.size)
            .build();

        let image = if rendered.width() < options.size {
            let mut canvas = ImageBuffer::from_pixel(options.size, options.size, light);
            let x = (options.size - rendered.width()) / 2;
            let y = (options.size - rendered.height()) / 2;
            imageops::overlay(&mut canvas, &rendered, i64::from(x), i64::from(y));
            canvas
        } else {
            rendered
        };

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| PixError::RenderFailure(format!("PNG encode error: {}", e)))?;
        Ok(bytes)
    }
}

fn parse_color(hex_color: &str) -> Result<Rgba<u8>, PixError> {
    let digits = hex_color.trim().trim_start_matches('#');
    let bytes = hex::decode(digits)
        .map_err(|_| PixError::RenderFailure(format!("invalid color: {}", hex_color)))?;
    match bytes.as_slice() {
        [r, g, b] => Ok(Rgba([*r, *g, *b, 255])),
        _ => Err(PixError::RenderFailure(format!("invalid color: {}", hex_color))),
    }
}

/// Renders with the QR renderer, falling back to a placeholder on failure.
pub fn render(payload: &str, options: &RenderOptions) -> RenderedCode {
    render_with(&QrPngRenderer, payload, options)
}

pub fn render_with(renderer: &dyn CodeRenderer, payload: &str, options: &RenderOptions) -> RenderedCode {
    match renderer.render_png(payload, options) {
        Ok(png) => {
            debug!("Rendered QR code: {} bytes of PNG", png.len());
            RenderedCode {
                data_uri: format!("data:image/png;base64,{}", BASE64.encode(png)),
                kind: RenderKind::Png,
            }
        }
        Err(e) => {
            warn!("QR rendering failed, serving placeholder: {}", e);
            fallback()
        }
    }
}

/// Static SVG placeholder with human-readable text. Infallible.
pub fn fallback() -> RenderedCode {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="300" viewBox="0 0 300 300">
    <rect width="300" height="300" fill="#333333"/>
    <rect x="50" y="50" width="200" height="200" fill="white"/>
    <text x="150" y="150" font-family="Arial" font-size="24" fill="#333333" text-anchor="middle">QR Code PIX</text>
    <text x="150" y="180" font-family="Arial" font-size="14" fill="#333333" text-anchor="middle">use o código copia e cola</text>
</svg>"##;
    RenderedCode {
        data_uri: format!("data:image/svg+xml;base64,{}", BASE64.encode(svg)),
        kind: RenderKind::Fallback,
    }
}
