// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection pipeline: binarization, 4-connected component labelling, area
// filtering and panel materialization.

pub mod binarize;
pub mod components;
pub mod detector;

pub use detector::PanelDetector;
