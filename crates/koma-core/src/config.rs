// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Panel detection configuration.

use serde::{Deserialize, Serialize};

use crate::error::{KomaError, Result};

/// Settings for a single panel detection run.
///
/// Options are plain values: every `with_*` method returns a new copy, so a
/// detector can share one set of options across threads without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelDetectionOptions {
    /// Luminance cutoff (0-255) separating background from foreground.
    pub threshold: u8,
    /// Components covering less than this fraction of the page are noise.
    pub min_panel_area_fraction: f64,
    /// Components covering more than this fraction of the page are treated
    /// as background (e.g. a fully black page).
    pub max_panel_area_fraction: f64,
    /// When false, pixels darker than `threshold` are foreground. When true,
    /// the polarity is reversed (light artwork on a dark page).
    pub invert: bool,
    /// Pixels added on every side of a detected bounding box before it is
    /// clamped to the page.
    pub panel_margin: u32,
    /// Horizontal reading direction used to order panels within a row.
    pub reading_direction: crate::ReadingDirection,
    /// Minimum vertical overlap, relative to the shorter panel, for two
    /// panels to share a reading row.
    pub row_threshold: f64,
}

impl Default for PanelDetectionOptions {
    fn default() -> Self {
        Self {
            threshold: 240,
            min_panel_area_fraction: 0.01,
            max_panel_area_fraction: 0.95,
            invert: false,
            panel_margin: 5,
            reading_direction: crate::ReadingDirection::LeftToRight,
            row_threshold: 0.5,
        }
    }
}

impl PanelDetectionOptions {
    // -- Presets ----------------------------------------------------------------

    /// Western comics: rows read left to right.
    pub fn western() -> Self {
        Self::default().with_reading_direction(crate::ReadingDirection::LeftToRight)
    }

    /// Manga: rows read right to left.
    pub fn manga() -> Self {
        Self::default().with_reading_direction(crate::ReadingDirection::RightToLeft)
    }

    // -- Builders ---------------------------------------------------------------

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_area_fractions(mut self, min: f64, max: f64) -> Self {
        self.min_panel_area_fraction = min;
        self.max_panel_area_fraction = max;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_panel_margin(mut self, margin: u32) -> Self {
        self.panel_margin = margin;
        self
    }

    pub fn with_reading_direction(mut self, direction: crate::ReadingDirection) -> Self {
        self.reading_direction = direction;
        self
    }

    pub fn with_row_threshold(mut self, row_threshold: f64) -> Self {
        self.row_threshold = row_threshold;
        self
    }

    // -- Validation -------------------------------------------------------------

    /// Check that fractions and the row threshold lie in `[0, 1]` and that
    /// the area window is not inverted.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("min_panel_area_fraction", self.min_panel_area_fraction)?;
        check_unit_interval("max_panel_area_fraction", self.max_panel_area_fraction)?;
        check_unit_interval("row_threshold", self.row_threshold)?;

        if self.min_panel_area_fraction > self.max_panel_area_fraction {
            return Err(KomaError::InvalidOptions(format!(
                "min_panel_area_fraction ({}) exceeds max_panel_area_fraction ({})",
                self.min_panel_area_fraction, self.max_panel_area_fraction
            )));
        }
        Ok(())
    }

    // -- JSON -------------------------------------------------------------------

    /// Parse options from a JSON document. Missing fields take their default
    /// values; the parsed options are validated before being returned.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize the options as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(KomaError::InvalidOptions(format!(
            "{name} must lie in [0, 1], got {value}"
        )));
    }
    Ok(())
}
