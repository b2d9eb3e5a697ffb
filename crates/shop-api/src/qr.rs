//! # QR Fallback Rendering
//!
//! Encodes the UPI payment URI as a PNG data URI for the payment page.
//! Pure presentation: any failure here is reported to the orchestrator,
//! which drops the image and keeps the page.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use qrcode::{EcLevel, QrCode};
use shop_core::{CheckoutError, CheckoutResult, QrRenderer};
use std::io::Cursor;

/// Renders QR codes as `data:image/png;base64,…` strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngQrRenderer;

impl QrRenderer for PngQrRenderer {
    fn render_data_uri(&self, uri: &str) -> CheckoutResult<String> {
        // Low error correction keeps the code small; the URI is short
        // and the image is scanned off a screen, not a crumpled label.
        let code = QrCode::with_error_correction_level(uri.as_bytes(), EcLevel::L)
            .map_err(|e| CheckoutError::Serialization(format!("QR encode: {e}")))?;

        let image = code.render::<image::Luma<u8>>().build();

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| CheckoutError::Serialization(format!("PNG encode: {e}")))?;

        Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_png_data_uri() {
        let uri = "upi://pay?pa=shop%40upi&pn=Ecommerce&am=998.00&cu=INR&tn=Order+Payment";
        let data_uri = PngQrRenderer.render_data_uri(uri).unwrap();

        assert!(data_uri.starts_with("data:image/png;base64,"));
        // sanity: payload decodes back to a PNG header
        let payload = data_uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = BASE64.decode(payload).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_render_is_deterministic() {
        let uri = "upi://pay?pa=shop%40upi&am=10.00&cu=INR";
        assert_eq!(
            PngQrRenderer.render_data_uri(uri).unwrap(),
            PngQrRenderer.render_data_uri(uri).unwrap()
        );
    }
}
