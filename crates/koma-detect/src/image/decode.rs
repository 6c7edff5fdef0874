// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page decoding shared by the detector and the cropper.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use koma_core::error::{KomaError, Result};
use tracing::debug;

/// Decode an encoded page (any format `image` recognises by its magic bytes).
pub fn decode_page(data: &[u8]) -> Result<DynamicImage> {
    let page = image::load_from_memory(data)
        .map_err(|err| KomaError::Decode(format!("page of {} bytes: {err}", data.len())))?;
    debug!(width = page.width(), height = page.height(), "Page decoded");
    Ok(page)
}

/// Read and decode a page from disk. Errors name the offending file.
pub fn open_page(path: &Path) -> Result<DynamicImage> {
    let page = image::open(path)
        .map_err(|err| KomaError::Decode(format!("{}: {err}", path.display())))?;
    debug!(
        path = %path.display(),
        width = page.width(),
        height = page.height(),
        "Page opened"
    );
    Ok(page)
}

/// Encode a panel image for handing to a viewer.
pub fn encode_panel(panel: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    panel
        .write_to(&mut cursor, format)
        .map_err(|err| KomaError::Encode(format!("{format:?} panel: {err}")))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage, Luma};

    fn gray_page() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(6, 4, Luma([90u8])))
    }

    /// Encoded panels decode back to the same dimensions.
    #[test]
    fn encoded_panel_decodes_as_page() {
        let png = encode_panel(&gray_page(), ImageFormat::Png).expect("encode");
        let page = decode_page(&png).expect("decode");
        assert_eq!(page.dimensions(), (6, 4));
    }

    /// Garbage bytes are a decode error that reports the input size.
    #[test]
    fn decode_error_mentions_size() {
        let err = decode_page(&[9, 9, 9]).unwrap_err();
        assert!(matches!(&err, KomaError::Decode(msg) if msg.contains("3 bytes")));
    }

    #[test]
    fn open_error_names_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = open_page(&dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(&err, KomaError::Decode(msg) if msg.contains("absent.png")));
    }
}
