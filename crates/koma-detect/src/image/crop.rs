// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Panel cropper: cuts detected panels out of a decoded page so a viewer can
// show them one at a time.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use koma_core::Panel;
use koma_core::error::{KomaError, Result};
use tracing::{debug, instrument};

use super::decode::{decode_page, encode_panel, open_page};

/// Extracts panel sub-images from a single in-memory page.
///
/// ```ignore
/// let cropper = PanelCropper::from_bytes(&page_bytes)?;
/// let result = PanelDetector::default().detect_from_image(cropper.page());
/// for panel in result.panels() {
///     let png = cropper.crop_to_png(panel)?;
/// }
/// ```
pub struct PanelCropper {
    page: DynamicImage,
}

impl PanelCropper {
    /// Decode the page stored at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        open_page(path.as_ref()).map(Self::from_dynamic)
    }

    /// Decode the same page bytes that were handed to
    /// [`PanelDetector::detect`](crate::PanelDetector::detect).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        decode_page(data).map(Self::from_dynamic)
    }

    pub fn from_dynamic(page: DynamicImage) -> Self {
        Self { page }
    }

    /// Page size in pixels as `(width, height)`.
    pub fn page_size(&self) -> (u32, u32) {
        (self.page.width(), self.page.height())
    }

    /// The decoded page, so detection can run without decoding twice.
    pub fn page(&self) -> &DynamicImage {
        &self.page
    }

    pub fn into_page(self) -> DynamicImage {
        self.page
    }

    // -- Cropping -------------------------------------------------------------

    /// Cut `panel` out of the page. The panel is clipped to the page first;
    /// a panel with no pixels inside the page is an error.
    #[instrument(skip(self, panel), fields(panel = %panel))]
    pub fn crop(&self, panel: &Panel) -> Result<DynamicImage> {
        let (img_w, img_h) = self.page_size();
        let max_w = i32::try_from(img_w)
            .map_err(|_| KomaError::Geometry(format!("page width {img_w} is too large")))?;
        let max_h = i32::try_from(img_h)
            .map_err(|_| KomaError::Geometry(format!("page height {img_h} is too large")))?;

        let clipped = panel.clamp(max_w, max_h);
        if !clipped.is_valid() {
            return Err(KomaError::Geometry(format!(
                "panel {panel} has no pixels inside the {img_w}x{img_h} page"
            )));
        }

        debug!(clipped = %clipped, "Cropping panel");
        Ok(self.page.crop_imm(
            clipped.x as u32,
            clipped.y as u32,
            clipped.width as u32,
            clipped.height as u32,
        ))
    }

    /// Crop every panel, preserving the order of `panels`.
    pub fn crop_all(&self, panels: &[Panel]) -> Result<Vec<DynamicImage>> {
        panels.iter().map(|panel| self.crop(panel)).collect()
    }

    /// Crop `panel` and encode it as PNG bytes.
    pub fn crop_to_png(&self, panel: &Panel) -> Result<Vec<u8>> {
        encode_panel(&self.crop(panel)?, ImageFormat::Png)
    }
}
