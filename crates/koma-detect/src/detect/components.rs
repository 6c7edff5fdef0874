// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Connected components of a foreground mask: 4-connected labelling plus
// per-component bounding box and exact pixel count.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use koma_core::Panel;
use tracing::{debug, instrument};

use super::binarize::BACKGROUND;

/// A maximal 4-connected region of foreground pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Label assigned by the labelling pass (never 0, which is background).
    pub label: u32,
    /// Number of foreground pixels in the component.
    pub pixel_count: u64,
    /// Inclusive bounding box.
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Component {
    fn seed(label: u32, x: u32, y: u32) -> Self {
        Self {
            label,
            pixel_count: 0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.pixel_count += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn bbox_width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn bbox_height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Pixel count divided by the page area. Returns 0 for an empty page.
    pub fn area_fraction(&self, image_width: u32, image_height: u32) -> f64 {
        let total = image_width as f64 * image_height as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.pixel_count as f64 / total
    }

    /// The bounding box as an unordered panel.
    ///
    /// Coordinates come from a page whose dimensions the caller has already
    /// checked to fit in `i32`.
    pub fn bounding_panel(&self) -> Panel {
        Panel::new(
            self.min_x as i32,
            self.min_y as i32,
            self.bbox_width() as i32,
            self.bbox_height() as i32,
        )
    }
}

/// Find every 4-connected foreground component in `mask`.
///
/// Labelling is delegated to `imageproc` (union-find, linear in the pixel
/// count); a second raster pass accumulates the statistics. Components are
/// returned in label order, which follows the first pixel of each component
/// in raster order.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn find_components(mask: &GrayImage) -> Vec<Component> {
    let labels = connected_components(mask, Connectivity::Four, Luma([BACKGROUND]));

    let mut slots: Vec<Option<Component>> = Vec::new();
    for (x, y, pixel) in labels.enumerate_pixels() {
        let label = pixel.0[0];
        if label == 0 {
            continue;
        }
        let index = label as usize;
        if index >= slots.len() {
            slots.resize(index + 1, None);
        }
        slots[index]
            .get_or_insert_with(|| Component::seed(label, x, y))
            .include(x, y);
    }

    let components: Vec<Component> = slots.into_iter().flatten().collect();
    debug!(count = components.len(), "Connected components labelled");
    components
}
