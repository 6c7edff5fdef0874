// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Koma.

use thiserror::Error;

/// Top-level error type for all Koma operations.
///
/// Panel detection itself never returns this type to callers: every variant
/// is folded into a failed `PanelDetectionResult`. Helpers outside the
/// detection contract (cropping, option loading, volume analysis) return it
/// directly.
#[derive(Debug, Error)]
pub enum KomaError {
    // -- Input errors --
    #[error("failed to decode page image: {0}")]
    Decode(String),

    #[error("failed to encode panel image: {0}")]
    Encode(String),

    #[error("page image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    // -- Configuration --
    #[error("invalid detection options: {0}")]
    InvalidOptions(String),

    // -- Geometry --
    #[error("invalid panel geometry: {0}")]
    Geometry(String),

    // -- Batch analysis --
    #[error("volume analysis cancelled")]
    Cancelled,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KomaError>;
