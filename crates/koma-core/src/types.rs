// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Koma panel engine.

use serde::{Deserialize, Serialize};

use crate::error::KomaError;

/// Horizontal reading direction of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingDirection {
    /// Western comics: panels in a row read left to right.
    #[default]
    LeftToRight,
    /// Manga: panels in a row read right to left.
    RightToLeft,
}

/// A rectangular comic panel in page pixel coordinates.
///
/// The rectangle covers columns `[x, x + width)` and rows `[y, y + height)`.
/// Panels are values: every transformation returns a new `Panel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Panel {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Position in the reading sequence (assigned by the sorter).
    pub order: u32,
}

impl Panel {
    /// Create a panel with reading order 0.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            order: 0,
        }
    }

    // -- Derived geometry -------------------------------------------------------

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.width as f64 / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.height as f64 / 2.0
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Width divided by height, or `None` for a zero-height panel.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }

    /// True when the panel covers at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    // -- Queries ----------------------------------------------------------------

    /// Half-open containment: the right and bottom boundary pixels are
    /// outside the panel.
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// True when both axis projections overlap by a strictly positive
    /// length. Panels sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Panel) -> bool {
        self.intersection(other).is_some()
    }

    /// The overlapping rectangle (with order 0), or `None` when the panels
    /// do not overlap.
    pub fn intersection(&self, other: &Panel) -> Option<Panel> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Panel::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    // -- Transformations --------------------------------------------------------

    /// Grow the panel by `margin` on every side. The result may extend past
    /// the page; call [`Panel::clamp`] afterwards.
    pub fn expand(&self, margin: i32) -> Panel {
        Panel {
            x: self.x.saturating_sub(margin),
            y: self.y.saturating_sub(margin),
            width: self.width.saturating_add(margin.saturating_mul(2)),
            height: self.height.saturating_add(margin.saturating_mul(2)),
            order: self.order,
        }
    }

    /// Clip the panel to the canvas `[0, max_width) x [0, max_height)`.
    ///
    /// The origin is clamped into the canvas first, then the far edge. A
    /// panel lying entirely outside the canvas collapses to zero size.
    pub fn clamp(&self, max_width: i32, max_height: i32) -> Panel {
        let max_width = max_width.max(0);
        let max_height = max_height.max(0);

        let x = self.x.clamp(0, max_width);
        let y = self.y.clamp(0, max_height);
        let right = self.right().min(max_width);
        let bottom = self.bottom().min(max_height);

        Panel {
            x,
            y,
            width: (right - x).max(0),
            height: (bottom - y).max(0),
            order: self.order,
        }
    }

    /// Copy of this panel with a new reading order.
    pub fn with_order(&self, order: u32) -> Panel {
        Panel { order, ..*self }
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {}x{}+{}+{}",
            self.order, self.width, self.height, self.x, self.y
        )
    }
}

/// Outcome of analysing one page.
///
/// There is exactly one way to fail (`success == false` with an error
/// message) and exactly one way to succeed with nothing (`success == true`
/// with no panels). Callers must branch on [`is_success`](Self::is_success)
/// rather than on the panel count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDetectionResult {
    panels: Vec<Panel>,
    image_width: u32,
    image_height: u32,
    success: bool,
    error: Option<String>,
}

impl PanelDetectionResult {
    /// A successful detection. `panels` may be empty (blank page).
    pub fn succeeded(panels: Vec<Panel>, image_width: u32, image_height: u32) -> Self {
        Self {
            panels,
            image_width,
            image_height,
            success: true,
            error: None,
        }
    }

    /// A failure before the page dimensions were known.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::failed_with_dimensions(message, 0, 0)
    }

    /// A failure after the page was decoded.
    pub fn failed_with_dimensions(
        message: impl Into<String>,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        Self {
            panels: Vec::new(),
            image_width,
            image_height,
            success: false,
            error: Some(message.into()),
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Panels in reading order.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Consume the result and return its panels.
    pub fn into_panels(self) -> Vec<Panel> {
        self.panels
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Human-readable failure reason; present iff the detection failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// True when the page should be shown whole: either no panels were
    /// found or detection failed.
    pub fn is_full_page(&self) -> bool {
        self.panels.is_empty()
    }
}

impl From<KomaError> for PanelDetectionResult {
    fn from(err: KomaError) -> Self {
        match err {
            KomaError::EmptyImage { width, height } => {
                let message = KomaError::EmptyImage { width, height }.to_string();
                Self::failed_with_dimensions(message, width, height)
            }
            other => Self::failed(other.to_string()),
        }
    }
}
