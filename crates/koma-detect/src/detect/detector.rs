// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Panel detector: turns a page image into an ordered list of panels.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use koma_core::error::{KomaError, Result};
use koma_core::{Panel, PanelDetectionOptions, PanelDetectionResult};
use tracing::{debug, info, instrument, warn};

use super::binarize::binarize;
use super::components::find_components;
use crate::image::decode::{decode_page, open_page};
use crate::image::raster::Raster;
use crate::order::sorter::ReadingOrderSorter;

/// Segments comic pages into panels and orders them for reading.
///
/// ## Pipeline
///
/// 1. Binarize the page with a global luminance threshold
/// 2. Label 4-connected foreground components
/// 3. Drop components whose pixel count is too small (speckle) or too large
///    (page background) relative to the page area
/// 4. Turn each surviving bounding box into a panel, grow it by the margin
///    and clip it to the page
/// 5. Order the panels with [`ReadingOrderSorter`]
///
/// The detector never fails loudly: decode errors, unusable rasters and
/// invalid options all come back as a failed [`PanelDetectionResult`]. A page
/// with no qualifying components is a successful result with no panels.
#[derive(Debug, Clone, Default)]
pub struct PanelDetector {
    options: PanelDetectionOptions,
}

impl PanelDetector {
    pub fn new(options: PanelDetectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PanelDetectionOptions {
        &self.options
    }

    // -- Entry points ---------------------------------------------------------

    /// Decode page bytes (PNG, JPEG, etc.) and detect panels.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn detect(&self, data: &[u8]) -> PanelDetectionResult {
        match decode_page(data) {
            Ok(page) => self.detect_from_image(&page),
            Err(err) => {
                warn!(error = %err, "Page image could not be decoded");
                err.into()
            }
        }
    }

    /// Open a page image from disk and detect panels.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn detect_file(&self, path: impl AsRef<Path>) -> PanelDetectionResult {
        match open_page(path.as_ref()) {
            Ok(page) => self.detect_from_image(&page),
            Err(err) => {
                warn!(error = %err, "Page image could not be opened");
                err.into()
            }
        }
    }

    /// Detect panels in an already-decoded page.
    ///
    /// A raster that panics while being read (for example one reporting more
    /// pixels than it holds) yields a failed result rather than unwinding
    /// into the caller.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect_from_image<R: Raster + ?Sized>(&self, image: &R) -> PanelDetectionResult {
        let (width, height) = (image.width(), image.height());

        let outcome = catch_unwind(AssertUnwindSafe(|| self.find_panels(image)));
        match outcome {
            Err(payload) => {
                let fault = panic_message(payload.as_ref());
                warn!(fault = %fault, "Panel detection aborted by an internal fault");
                PanelDetectionResult::failed_with_dimensions(
                    format!("internal detection fault: {fault}"),
                    width,
                    height,
                )
            }
            Ok(Ok(panels)) => {
                info!(panels = panels.len(), "Panel detection complete");
                PanelDetectionResult::succeeded(panels, width, height)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "Panel detection failed");
                PanelDetectionResult::failed_with_dimensions(err.to_string(), width, height)
            }
        }
    }

    // -- Pipeline -------------------------------------------------------------

    fn find_panels<R: Raster + ?Sized>(&self, image: &R) -> Result<Vec<Panel>> {
        self.options.validate()?;

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(KomaError::EmptyImage { width, height });
        }
        let canvas_width = to_coordinate("page width", width)?;
        let canvas_height = to_coordinate("page height", height)?;
        let margin = to_coordinate("panel margin", self.options.panel_margin)?;

        let mask = binarize(image, self.options.threshold, self.options.invert);
        let components = find_components(&mask);

        let min = self.options.min_panel_area_fraction;
        let max = self.options.max_panel_area_fraction;
        let panels: Vec<Panel> = components
            .iter()
            .filter(|c| {
                let fraction = c.area_fraction(width, height);
                fraction >= min && fraction <= max
            })
            .map(|c| {
                c.bounding_panel()
                    .expand(margin)
                    .clamp(canvas_width, canvas_height)
            })
            .filter(Panel::is_valid)
            .collect();

        debug!(
            components = components.len(),
            kept = panels.len(),
            min_fraction = min,
            max_fraction = max,
            "Components filtered by area"
        );

        let sorter = ReadingOrderSorter::new(self.options.reading_direction)
            .with_row_threshold(self.options.row_threshold);
        Ok(sorter.sort(&panels))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|msg| (*msg).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn to_coordinate(what: &str, value: u32) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| KomaError::Geometry(format!("{what} {value} exceeds the coordinate range")))
}
