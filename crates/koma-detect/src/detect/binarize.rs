// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global-threshold binarization of a page into a foreground mask.

use image::{GrayImage, Luma};
use tracing::{debug, instrument};

use crate::image::raster::Raster;

/// Mask value for foreground (panel ink) pixels.
pub const FOREGROUND: u8 = 255;

/// Mask value for background (page) pixels.
pub const BACKGROUND: u8 = 0;

/// Perceptual luminance using the ITU-R BT.601 weights in integer arithmetic:
/// `(299 R + 587 G + 114 B) / 1000`.
///
/// Pure black maps to 0 and pure white to 255.
pub fn luminance([r, g, b]: [u8; 3]) -> u8 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    (weighted / 1000) as u8
}

/// Whether a pixel of the given luminance counts as foreground.
///
/// Without `invert`, pixels darker than `threshold` are foreground (ink on
/// white paper). With `invert`, the complement is foreground.
pub fn is_foreground(luma: u8, threshold: u8, invert: bool) -> bool {
    (luma < threshold) != invert
}

/// Classify every pixel of `image`, producing a mask with [`FOREGROUND`] and
/// [`BACKGROUND`] values.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn binarize<R: Raster + ?Sized>(image: &R, threshold: u8, invert: bool) -> GrayImage {
    let mask = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let luma = luminance(image.rgb_at(x, y));
        if is_foreground(luma, threshold, invert) {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    });

    debug!(
        foreground = mask.pixels().filter(|p| p.0[0] == FOREGROUND).count(),
        "Binarization complete"
    );
    mask
}
