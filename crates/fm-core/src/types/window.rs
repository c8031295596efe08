/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Rolling windows and the calendar ranges they select

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ENGAGEMENT_LAG_DAYS;

/// Rolling window length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Window {
  SevenDay,
  ThirtyDay,
}

impl Window {
  pub const ALL: [Window; 2] = [Window::SevenDay, Window::ThirtyDay];

  pub fn days(&self) -> u64 {
    match self {
      Window::SevenDay => 7,
      Window::ThirtyDay => 30,
    }
  }

  /// Suffix used in metric names (`7day`, `30day`)
  pub fn suffix(&self) -> &'static str {
    match self {
      Window::SevenDay => "7day",
      Window::ThirtyDay => "30day",
    }
  }

  /// Covered-date range of daily snapshots: `[D - (n-1), D]`
  pub fn snapshot_range(&self, calc_date: NaiveDate) -> DateWindow {
    DateWindow::ending_at(calc_date, self.days())
  }

  /// Local creation-date range of engagement-mature posts, shifted back by the
  /// engagement lag: `[D - (n-1) - 3, D - 3]`
  pub fn engagement_range(&self, calc_date: NaiveDate) -> DateWindow {
    let end = calc_date.checked_sub_days(Days::new(ENGAGEMENT_LAG_DAYS as u64)).unwrap_or(calc_date);
    DateWindow::ending_at(end, self.days())
  }
}

impl std::fmt::Display for Window {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.suffix())
  }
}

/// Inclusive calendar range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl DateWindow {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
    Self { start, end }
  }

  /// The `days` calendar days ending at (and including) `end`
  pub fn ending_at(end: NaiveDate, days: u64) -> Self {
    let start = end.checked_sub_days(Days::new(days.saturating_sub(1))).unwrap_or(end);
    Self { start, end }
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

impl std::fmt::Display for DateWindow {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}..={}", self.start, self.end)
  }
}
