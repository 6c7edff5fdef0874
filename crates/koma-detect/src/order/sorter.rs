// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Row-aware reading-order sorting of panels.

use std::cmp::Reverse;

use koma_core::{Panel, ReadingDirection};
use tracing::{debug, instrument};

/// Default minimum vertical overlap, relative to the shorter panel, for two
/// panels to share a row.
pub const DEFAULT_ROW_THRESHOLD: f64 = 0.5;

/// Orders panels into a reading sequence.
///
/// Panels are grouped into rows by vertical overlap, rows are read top to
/// bottom, and panels within a row are read in the configured direction.
/// The sorter holds only its configuration, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingOrderSorter {
    direction: ReadingDirection,
    row_threshold: f64,
}

impl Default for ReadingOrderSorter {
    fn default() -> Self {
        Self::new(ReadingDirection::LeftToRight)
    }
}

impl ReadingOrderSorter {
    pub fn new(direction: ReadingDirection) -> Self {
        Self {
            direction,
            row_threshold: DEFAULT_ROW_THRESHOLD,
        }
    }

    pub fn with_row_threshold(self, row_threshold: f64) -> Self {
        Self {
            row_threshold,
            ..self
        }
    }

    pub fn direction(&self) -> ReadingDirection {
        self.direction
    }

    pub fn row_threshold(&self) -> f64 {
        self.row_threshold
    }

    /// Return a new list of `panels` in reading order with `order` set to
    /// `0..n`. The input is left untouched; exact ties keep input order.
    #[instrument(skip(self, panels), fields(count = panels.len(), direction = ?self.direction))]
    pub fn sort(&self, panels: &[Panel]) -> Vec<Panel> {
        match panels {
            [] => return Vec::new(),
            [only] => return vec![only.with_order(0)],
            _ => {}
        }

        let mut by_top = panels.to_vec();
        by_top.sort_by_key(|p| p.y);

        let mut rows = self.group_rows(&by_top);
        rows.sort_by_key(|row| row_top(row));

        for row in &mut rows {
            match self.direction {
                ReadingDirection::LeftToRight => row.sort_by_key(|p| p.x),
                ReadingDirection::RightToLeft => row.sort_by_key(|p| Reverse(p.x)),
            }
        }

        debug!(rows = rows.len(), "Panels grouped into rows");

        rows.into_iter()
            .flatten()
            .enumerate()
            .map(|(index, panel)| panel.with_order(index as u32))
            .collect()
    }

    /// Whether `a` and `b` belong to the same reading row: their vertical
    /// overlap must be positive and at least `row_threshold` times the
    /// shorter panel's height.
    pub fn same_row(&self, a: &Panel, b: &Panel) -> bool {
        let overlap = a.bottom().min(b.bottom()) as i64 - a.y.max(b.y) as i64;
        if overlap <= 0 {
            return false;
        }
        let shorter = a.height.min(b.height) as f64;
        overlap as f64 >= self.row_threshold * shorter
    }

    /// Single pass over panels sorted by `y`. Each unused panel anchors a new
    /// row and collects every later unused panel that shares a row with the
    /// anchor. Members are tested against the anchor only, not against each
    /// other, so a panel overlapping a later member but not the anchor starts
    /// its own row.
    fn group_rows(&self, by_top: &[Panel]) -> Vec<Vec<Panel>> {
        let mut used = vec![false; by_top.len()];
        let mut rows = Vec::new();

        for (i, anchor) in by_top.iter().enumerate() {
            if used[i] {
                continue;
            }
            used[i] = true;
            let mut row = vec![*anchor];

            for (j, candidate) in by_top.iter().enumerate().skip(i + 1) {
                if !used[j] && self.same_row(anchor, candidate) {
                    used[j] = true;
                    row.push(*candidate);
                }
            }
            rows.push(row);
        }

        rows
    }
}

/// Smallest `y` among a row's members.
fn row_top(row: &[Panel]) -> i32 {
    row.iter().map(|p| p.y).min().unwrap_or(i32::MAX)
}
