// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster access: the minimal per-pixel RGB view the detector needs from a
// decoded page image.

use image::{DynamicImage, GenericImageView, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

/// A decoded page: dimensions plus per-pixel RGB access.
///
/// Implemented for the `image` crate's common buffer types so pages decoded
/// elsewhere (archive readers, PDF rasterizers) can be analysed without a
/// round trip through an encoded format.
pub trait Raster {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// RGB value at `(x, y)`. Callers stay within `width() x height()`.
    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3];
}

impl Raster for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let Rgba([r, g, b, _]) = self.get_pixel(x, y);
        [r, g, b]
    }
}

impl Raster for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let Rgb(rgb) = *self.get_pixel(x, y);
        rgb
    }
}

/// Alpha is ignored: a transparent pixel is analysed by its colour channels.
impl Raster for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let Rgba([r, g, b, _]) = *self.get_pixel(x, y);
        [r, g, b]
    }
}

impl Raster for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let value = self.get_pixel(x, y).0[0];
        [value, value, value]
    }
}
