// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading order: row grouping and direction-aware panel sequencing.

pub mod sorter;

pub use sorter::ReadingOrderSorter;
