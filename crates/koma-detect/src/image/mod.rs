// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: page decoding, raster access for detection and panel
// sub-image extraction.

pub mod crop;
pub mod decode;
pub mod raster;

pub use crop::PanelCropper;
pub use raster::Raster;
