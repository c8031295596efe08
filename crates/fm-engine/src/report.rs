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

//! Outcome of a metrics run

use chrono::NaiveDate;
use fm_core::MetricName;
use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::EngineError;

/// Pipeline stages of a single-date run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
  ComputeEntityMetrics,
  AssignRanks,
  PersistEntityMetrics,
  ComputeGlobalMetrics,
  PersistGlobalMetrics,
  ComputeGlobalDispersion,
  ComputeEntityDispersion,
  Done,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::ComputeEntityMetrics => "compute entity metrics",
      Stage::AssignRanks => "assign ranks",
      Stage::PersistEntityMetrics => "persist entity metrics",
      Stage::ComputeGlobalMetrics => "compute global metrics",
      Stage::PersistGlobalMetrics => "persist global metrics",
      Stage::ComputeGlobalDispersion => "compute global dispersion",
      Stage::ComputeEntityDispersion => "compute entity dispersion",
      Stage::Done => "done",
    };
    f.write_str(name)
  }
}

/// A piece of work that failed without stopping the run
#[derive(Debug, Clone, PartialEq)]
pub struct StageFailure {
  pub stage: Stage,
  pub entity: Option<String>,
  pub metric: Option<MetricName>,
  pub error: EngineError,
}

impl fmt::Display for StageFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]", self.stage)?;
    if let Some(entity) = &self.entity {
      write!(f, " entity={}", entity)?;
    }
    if let Some(metric) = &self.metric {
      write!(f, " metric={}", metric)?;
    }
    write!(f, ": {}", self.error)
  }
}

/// Result of running the pipeline for one date
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
  pub date: NaiveDate,

  /// Last stage reached
  pub stage: Stage,

  /// Entities whose metrics were computed and stored
  pub entities_processed: Vec<String>,

  pub global_written: bool,

  pub dispersion_rows: usize,

  pub failures: Vec<StageFailure>,
}

impl RunReport {
  pub fn new(date: NaiveDate) -> Self {
    Self {
      date,
      stage: Stage::ComputeEntityMetrics,
      entities_processed: Vec::new(),
      global_written: false,
      dispersion_rows: 0,
      failures: Vec::new(),
    }
  }

  pub fn enter(&mut self, stage: Stage) {
    self.stage = stage;
  }

  /// Record and log a failure; the run continues
  pub fn record_failure(
    &mut self,
    stage: Stage,
    entity: Option<&str>,
    metric: Option<MetricName>,
    error: EngineError,
  ) {
    let failure =
      StageFailure { stage, entity: entity.map(str::to_string), metric, error };
    error!("{} failed for {}: {}", stage, self.date, failure);
    self.failures.push(failure);
  }

  pub fn success_count(&self) -> usize {
    self.entities_processed.len()
  }

  pub fn failure_count(&self) -> usize {
    self.failures.len()
  }

  pub fn is_clean(&self) -> bool {
    self.failures.is_empty()
  }
}

/// Result of running the pipeline across a range of dates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackfillReport {
  /// Reports of dates that ran, oldest first
  pub runs: Vec<RunReport>,

  /// Dates whose run could not start
  pub failed_dates: Vec<(NaiveDate, EngineError)>,
}

impl BackfillReport {
  pub fn dates_completed(&self) -> usize {
    self.runs.len()
  }

  /// Per-record failures across all completed dates
  pub fn total_failures(&self) -> usize {
    self.runs.iter().map(RunReport::failure_count).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fm_core::{Signal, Window};

  fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()
  }

  #[test]
  fn test_new_report_is_clean() {
    let report = RunReport::new(day());
    assert!(report.is_clean());
    assert_eq!(report.stage, Stage::ComputeEntityMetrics);
    assert_eq!(report.success_count(), 0);
  }

  #[test]
  fn test_record_failure() {
    let mut report = RunReport::new(day());
    report.record_failure(
      Stage::ComputeGlobalDispersion,
      None,
      Some(MetricName::new(Signal::Score, Window::SevenDay)),
      EngineError::Database("timeout".to_string()),
    );

    assert_eq!(report.failure_count(), 1);
    assert_eq!(
      report.failures[0].to_string(),
      "[compute global dispersion] metric=score_7day: Database error: timeout"
    );
  }

  #[test]
  fn test_failure_display_with_entity() {
    let failure = StageFailure {
      stage: Stage::PersistEntityMetrics,
      entity: Some("ohio".to_string()),
      metric: None,
      error: EngineError::Database("deadlock".to_string()),
    };
    assert_eq!(failure.to_string(), "[persist entity metrics] entity=ohio: Database error: deadlock");
  }

  #[test]
  fn test_backfill_report_totals() {
    let mut first = RunReport::new(day());
    first.record_failure(Stage::ComputeEntityMetrics, Some("iowa"), None, EngineError::Database("x".into()));
    let report = BackfillReport {
      runs: vec![first, RunReport::new(day())],
      failed_dates: vec![(day(), EngineError::Database("down".into()))],
    };

    assert_eq!(report.dates_completed(), 2);
    assert_eq!(report.total_failures(), 1);
  }
}
