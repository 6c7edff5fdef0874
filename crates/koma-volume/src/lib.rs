// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// koma-volume: Batch panel analysis for every page of a comic volume.
//
// Pages are analysed on Tokio's blocking pool with bounded concurrency.
// Cancellation is cooperative and only takes effect between pages.

pub mod analyzer;

pub use analyzer::{CancelHandle, VolumeAnalyzer, VolumeSummary};
