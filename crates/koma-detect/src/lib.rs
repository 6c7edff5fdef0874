// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// koma-detect: Panel detection for comic pages.
//
// Provides the raster abstraction over decoded page images, the segmentation
// pipeline (binarization, connected-component labelling, area filtering),
// row-aware reading-order sorting, and extraction of panel sub-images.

pub mod detect;
pub mod image;
pub mod order;

// Re-export the primary structs so callers can use `koma_detect::PanelDetector` etc.
pub use crate::detect::detector::PanelDetector;
pub use crate::image::crop::PanelCropper;
pub use crate::image::raster::Raster;
pub use crate::order::sorter::ReadingOrderSorter;
