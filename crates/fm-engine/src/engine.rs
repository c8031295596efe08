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

//! Single-date pipeline and date-range backfill

use chrono::{Days, Duration, NaiveDate};
use fm_core::{Computed, Config, DateWindow, DispersionScope, MetricName, NullReason, Signal, Window};
use fm_database_postgres::MetricsRepository;
use fm_database_postgres::models::{Entity, EntityMetrics, GlobalMetrics};
use tracing::{debug, error, info, warn};

use crate::aggregator::{mean, rolling_averages};
use crate::dispersion::dispersion;
use crate::progress::progress_bar;
use crate::rank::assign_ranks;
use crate::report::{BackfillReport, RunReport, Stage};
use crate::wow::wow_change;
use crate::EngineResult;

/// Minimum stored rows in the trailing week before an entity gets its own dispersion
const MIN_ENTITY_DISPERSION_ROWS: usize = 2;

/// Settings injected into the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
  /// Entity tracked but never ranked nor folded into global aggregates
  pub capital_entity: String,

  /// Show a progress bar during backfills
  pub show_progress: bool,
}

impl EngineConfig {
  pub fn is_capital(&self, name: &str) -> bool {
    name.eq_ignore_ascii_case(&self.capital_entity)
  }
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self { capital_entity: fm_core::DEFAULT_CAPITAL_ENTITY.to_string(), show_progress: false }
  }
}

impl From<&Config> for EngineConfig {
  fn from(config: &Config) -> Self {
    Self { capital_entity: config.capital_entity.clone(), show_progress: false }
  }
}

/// Dates of a backfill ending at `today`, oldest first.
///
/// Fails when `days_back` exceeds [`fm_core::MAX_BACKFILL_DAYS`] or reaches
/// before the earliest representable date.
pub fn backfill_dates(today: NaiveDate, days_back: u32) -> EngineResult<Vec<NaiveDate>> {
  if days_back > fm_core::MAX_BACKFILL_DAYS {
    return Err(fm_core::Error::InvalidDayCount(days_back.to_string()).into());
  }
  let start = today
    .checked_sub_days(Days::new(u64::from(days_back)))
    .ok_or_else(|| fm_core::Error::InvalidDayCount(days_back.to_string()))?;

  Ok(start.iter_days().take(days_back as usize + 1).collect())
}

/// Computes and stores the daily metrics through a [`MetricsRepository`]
pub struct MetricsEngine<R: MetricsRepository> {
  repo: R,
  config: EngineConfig,
}

impl<R: MetricsRepository> MetricsEngine<R> {
  pub fn new(repo: R, config: EngineConfig) -> Self {
    Self { repo, config }
  }

  pub fn repository(&self) -> &R {
    &self.repo
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Run every stage for `calc_date`.
  ///
  /// Only a failure to list entities aborts the run. Everything else is
  /// recorded in the report and the remaining work goes ahead.
  pub fn run_for_date(&self, calc_date: NaiveDate) -> EngineResult<RunReport> {
    info!("Calculating metrics for {}", calc_date);

    let entities = self.repo.entities()?;
    info!("Processing {} entities", entities.len());

    let mut report = RunReport::new(calc_date);

    report.enter(Stage::ComputeEntityMetrics);
    let mut computed: Vec<(Entity, EntityMetrics)> = Vec::with_capacity(entities.len());
    for entity in entities {
      match self.compute_entity(&entity, calc_date) {
        Ok(row) => computed.push((entity, row)),
        Err(e) => report.record_failure(Stage::ComputeEntityMetrics, Some(&entity.name), None, e),
      }
    }

    report.enter(Stage::AssignRanks);
    self.assign_entity_ranks(&mut computed);

    report.enter(Stage::PersistEntityMetrics);
    computed.retain(|(entity, row)| match self.repo.upsert_entity_metrics(row) {
      Ok(()) => {
        report.entities_processed.push(entity.name.clone());
        true
      }
      Err(e) => {
        report.record_failure(Stage::PersistEntityMetrics, Some(&entity.name), None, e.into());
        false
      }
    });
    info!("Saved entity metrics for {} entities", computed.len());

    let non_capital: Vec<&EntityMetrics> = computed
      .iter()
      .filter(|(entity, _)| !self.config.is_capital(&entity.name))
      .map(|(_, row)| row)
      .collect();

    report.enter(Stage::ComputeGlobalMetrics);
    if non_capital.is_empty() {
      warn!("No non-capital entity metrics for {}, global metrics not written", calc_date);
    } else {
      match self.compute_global(calc_date, &non_capital) {
        Ok(global) => {
          report.enter(Stage::PersistGlobalMetrics);
          match self.repo.upsert_global_metrics(&global) {
            Ok(()) => {
              report.global_written = true;
              info!("Saved global metrics for {}", calc_date);
            }
            Err(e) => report.record_failure(Stage::PersistGlobalMetrics, None, None, e.into()),
          }
        }
        Err(e) => report.record_failure(Stage::ComputeGlobalMetrics, None, None, e),
      }
    }

    report.enter(Stage::ComputeGlobalDispersion);
    for metric in MetricName::ALL {
      let row = dispersion(non_capital.iter().map(|row| row.average(metric))).into_row(
        calc_date,
        DispersionScope::Global,
        None,
        metric,
      );
      match self.repo.upsert_dispersion(&row) {
        Ok(()) => report.dispersion_rows += 1,
        Err(e) => {
          report.record_failure(Stage::ComputeGlobalDispersion, None, Some(metric), e.into())
        }
      }
    }

    report.enter(Stage::ComputeEntityDispersion);
    let trailing_week = DateWindow::ending_at(calc_date, Window::SevenDay.days());
    for (entity, _) in &computed {
      let history = match self.repo.entity_metrics_in(entity.id, trailing_week) {
        Ok(history) => history,
        Err(e) => {
          report.record_failure(Stage::ComputeEntityDispersion, Some(&entity.name), None, e.into());
          continue;
        }
      };

      if history.len() < MIN_ENTITY_DISPERSION_ROWS {
        debug!("Only {} stored rows for {}, no entity dispersion", history.len(), entity.name);
        continue;
      }

      for metric in MetricName::ALL {
        let row = dispersion(history.iter().map(|row| row.average(metric))).into_row(
          calc_date,
          DispersionScope::Entity,
          Some(entity.id),
          metric,
        );
        match self.repo.upsert_dispersion(&row) {
          Ok(()) => report.dispersion_rows += 1,
          Err(e) => report.record_failure(
            Stage::ComputeEntityDispersion,
            Some(&entity.name),
            Some(metric),
            e.into(),
          ),
        }
      }
    }

    report.enter(Stage::Done);
    info!(
      "Completed metrics for {}: {} entities, {} dispersion rows, {} failures",
      calc_date,
      report.success_count(),
      report.dispersion_rows,
      report.failure_count()
    );
    Ok(report)
  }

  /// Run the pipeline for each date from `today - days_back` through `today`.
  ///
  /// A date that cannot run is logged and skipped. An unusable day count is
  /// returned as an error before any date runs.
  pub fn backfill(&self, today: NaiveDate, days_back: u32) -> EngineResult<BackfillReport> {
    let dates = backfill_dates(today, days_back)?;
    if let Some(first) = dates.first() {
      info!("Starting backfill for {} days ({} through {})", days_back, first, today);
    }

    let progress = progress_bar(dates.len() as u64, self.config.show_progress);

    let mut backfill = BackfillReport::default();
    for date in dates {
      if let Some(pb) = &progress {
        pb.set_message(date.to_string());
      }

      match self.run_for_date(date) {
        Ok(report) => backfill.runs.push(report),
        Err(e) => {
          error!("Failed to calculate metrics for {}: {}", date, e);
          backfill.failed_dates.push((date, e));
        }
      }

      if let Some(pb) = &progress {
        pb.inc(1);
      }
    }

    if let Some(pb) = progress {
      pb.finish_with_message("Backfill complete");
    }
    info!(
      "Backfill complete: {} dates run, {} dates failed",
      backfill.dates_completed(),
      backfill.failed_dates.len()
    );
    Ok(backfill)
  }

  /// Rolling averages plus WoW deltas against the row stored exactly a week earlier
  fn compute_entity(&self, entity: &Entity, calc_date: NaiveDate) -> EngineResult<EntityMetrics> {
    let averages = rolling_averages(&self.repo, entity.id, calc_date)?;
    if averages.is_empty() {
      warn!("Insufficient data for {} on {}", entity.name, calc_date);
    }

    let mut row = EntityMetrics::empty(entity.id, calc_date);
    for (metric, value) in averages.iter() {
      row.set_average(metric, value.value());
    }

    let previous_date = calc_date - Duration::days(fm_core::WOW_LOOKBACK_DAYS);
    let previous = self.repo.entity_metrics_on(entity.id, previous_date)?;
    for signal in Signal::ALL {
      let metric = MetricName::new(signal, Window::SevenDay);
      let delta = wow_change(
        row.average(metric),
        previous.as_ref().and_then(|prev| prev.average(metric)),
      );
      if delta == Computed::Null(NullReason::DivideByZero) {
        debug!("{} {} was zero on {}", entity.name, metric, previous_date);
      }
      row.set_wow_change(signal, delta.value());
    }

    Ok(row)
  }

  fn assign_entity_ranks(&self, computed: &mut [(Entity, EntityMetrics)]) {
    for signal in Signal::ALL {
      let metric = MetricName::new(signal, Window::SevenDay);
      let entries: Vec<(&str, Option<f64>)> =
        computed.iter().map(|(entity, row)| (entity.name.as_str(), row.average(metric))).collect();
      let ranks = assign_ranks(&entries, |name| self.config.is_capital(name));

      for ((_, row), rank) in computed.iter_mut().zip(ranks) {
        row.set_rank(signal, rank);
      }
    }
  }

  fn compute_global(
    &self,
    calc_date: NaiveDate,
    rows: &[&EntityMetrics],
  ) -> EngineResult<GlobalMetrics> {
    let mut global = GlobalMetrics::empty(calc_date, rows.len() as i32);
    for metric in MetricName::ALL {
      global.set_average(metric, mean(rows.iter().map(|row| row.average(metric))).value());
    }

    let previous_date = calc_date - Duration::days(fm_core::WOW_LOOKBACK_DAYS);
    let previous = self.repo.global_metrics_on(previous_date)?;
    for signal in Signal::ALL {
      let metric = MetricName::new(signal, Window::SevenDay);
      let delta = wow_change(
        global.average(metric),
        previous.as_ref().and_then(|prev| prev.average(metric)),
      );
      global.set_wow_change(signal, delta.value());
    }

    Ok(global)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::MemoryRepository;
  use crate::EngineError;
  use fm_core::test_utils::assert_some_approx;
  use pretty_assertions::assert_eq;

  fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  fn subscribers_7() -> MetricName {
    MetricName::new(Signal::Subscribers, Window::SevenDay)
  }

  /// Seven daily snapshots ending at `end` with subscribers `base, base+step, ...`
  fn seed_week(repo: &MemoryRepository, entity_id: i32, end: NaiveDate, base: i32, step: i32) {
    for offset in 0..7 {
      let day = end - Duration::days(6 - offset);
      repo.add_snapshot(entity_id, day, Some(base + step * offset as i32), Some(2));
    }
  }

  fn engine(repo: MemoryRepository) -> MetricsEngine<MemoryRepository> {
    MetricsEngine::new(repo, EngineConfig::default())
  }

  #[test]
  fn test_backfill_dates_oldest_first() {
    assert_eq!(
      backfill_dates(date("2025-12-10"), 2).unwrap(),
      vec![date("2025-12-08"), date("2025-12-09"), date("2025-12-10")]
    );
    assert_eq!(backfill_dates(date("2025-12-10"), 0).unwrap(), vec![date("2025-12-10")]);
  }

  #[test]
  fn test_backfill_dates_rejects_unusable_counts() {
    assert!(matches!(
      backfill_dates(date("2025-12-10"), fm_core::MAX_BACKFILL_DAYS + 1),
      Err(EngineError::Configuration(_))
    ));
    assert!(backfill_dates(date("2025-12-10"), u32::MAX).is_err());
    assert!(backfill_dates(NaiveDate::MIN, 1).is_err());
    assert_eq!(backfill_dates(date("2025-12-10"), fm_core::MAX_BACKFILL_DAYS).unwrap().len(), 3651);
  }

  #[test]
  fn test_backfill_with_oversized_count_runs_nothing() {
    let repo = MemoryRepository::new();
    let ohio = repo.add_entity("ohio");
    let d = date("2025-12-10");
    seed_week(&repo, ohio, d, 100, 0);

    let engine = engine(repo);
    assert!(engine.backfill(d, u32::MAX).is_err());
    assert!(engine.repository().stored_entity_metrics(ohio, d).is_none());
  }

  #[test]
  fn test_engine_config_matches_capital_case_insensitively() {
    let config = EngineConfig::from(&Config::default());
    assert!(config.is_capital("WashingtonDC"));
    assert!(!config.is_capital("washington"));
  }

  #[test]
  fn test_run_computes_seven_day_average() {
    let repo = MemoryRepository::new();
    let ohio = repo.add_entity("ohio");
    let d = date("2025-12-10");
    seed_week(&repo, ohio, d, 100, 10);

    let engine = engine(repo);
    let report = engine.run_for_date(d).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.stage, Stage::Done);
    let stored = engine.repository().stored_entity_metrics(ohio, d).unwrap();
    assert_some_approx(stored.average(subscribers_7()), 130.0);
    assert_eq!(stored.subscribers_7day_rank, Some(1));
  }

  #[test]
  fn test_ranks_exclude_capital_and_break_ties_by_name() {
    let repo = MemoryRepository::new();
    let d = date("2025-12-10");
    let texas = repo.add_entity("texas");
    let alaska = repo.add_entity("alaska");
    let capital = repo.add_entity("washingtondc");
    seed_week(&repo, texas, d, 500, 0);
    seed_week(&repo, alaska, d, 500, 0);
    seed_week(&repo, capital, d, 9_000, 0);

    let engine = engine(repo);
    engine.run_for_date(d).unwrap();
    let repo = engine.repository();

    assert_eq!(repo.stored_entity_metrics(alaska, d).unwrap().subscribers_7day_rank, Some(1));
    assert_eq!(repo.stored_entity_metrics(texas, d).unwrap().subscribers_7day_rank, Some(2));
    let capital_row = repo.stored_entity_metrics(capital, d).unwrap();
    assert_eq!(capital_row.subscribers_7day_rank, None);
    assert_some_approx(capital_row.average(subscribers_7()), 9_000.0);
  }

  #[test]
  fn test_global_metrics_exclude_capital() {
    let repo = MemoryRepository::new();
    let d = date("2025-12-10");
    let a = repo.add_entity("maine");
    let b = repo.add_entity("utah");
    let capital = repo.add_entity("washingtondc");
    seed_week(&repo, a, d, 100, 0);
    seed_week(&repo, b, d, 300, 0);
    seed_week(&repo, capital, d, 10_000, 0);

    let engine = engine(repo);
    let report = engine.run_for_date(d).unwrap();
    assert!(report.global_written);

    let global = engine.repository().stored_global_metrics(d).unwrap();
    assert_eq!(global.entities_included, 2);
    assert_some_approx(global.average(subscribers_7()), 200.0);

    let spread = engine
      .repository()
      .stored_dispersion(d, DispersionScope::Global, None, subscribers_7())
      .unwrap();
    assert_eq!(spread.max_value, Some(300.0));
    assert_eq!(spread.min_value, Some(100.0));
  }

  #[test]
  fn test_only_capital_writes_no_global_row() {
    let repo = MemoryRepository::new();
    let d = date("2025-12-10");
    let capital = repo.add_entity("WashingtonDC");
    seed_week(&repo, capital, d, 10, 0);

    let engine = engine(repo);
    let report = engine.run_for_date(d).unwrap();

    assert!(!report.global_written);
    assert!(engine.repository().stored_global_metrics(d).is_none());
    assert!(engine.repository().stored_entity_metrics(capital, d).is_some());
    let spread = engine
      .repository()
      .stored_dispersion(d, DispersionScope::Global, None, subscribers_7())
      .unwrap();
    assert_eq!(spread.median, None);
  }

  #[test]
  fn test_wow_uses_row_exactly_one_week_earlier() {
    let repo = MemoryRepository::new();
    let ohio = repo.add_entity("ohio");
    let d = date("2025-12-10");
    let week_ago = date("2025-12-03");
    seed_week(&repo, ohio, week_ago, 100, 0);
    seed_week(&repo, ohio, d, 110, 0);

    let engine = engine(repo);
    engine.run_for_date(week_ago).unwrap();
    engine.run_for_date(d).unwrap();

    let stored = engine.repository().stored_entity_metrics(ohio, d).unwrap();
    assert_some_approx(stored.subscribers_wow_change, 10.0);
    assert_some_approx(stored.posts_wow_change, 0.0);

    let global = engine.repository().stored_global_metrics(d).unwrap();
    assert_some_approx(global.subscribers_wow_change, 10.0);
  }

  #[test]
  fn test_wow_null_without_exact_previous_row() {
    let repo = MemoryRepository::new();
    let ohio = repo.add_entity("ohio");
    let d = date("2025-12-10");
    seed_week(&repo, ohio, d, 100, 0);

    let engine = engine(repo);
    // six days earlier is not a valid baseline
    engine.run_for_date(date("2025-12-04")).unwrap();
    engine.run_for_date(d).unwrap();

    let stored = engine.repository().stored_entity_metrics(ohio, d).unwrap();
    assert_eq!(stored.subscribers_wow_change, None);
  }

  #[test]
  fn test_rerun_is_idempotent() {
    let repo = MemoryRepository::new();
    let d = date("2025-12-10");
    let ohio = repo.add_entity("ohio");
    let iowa = repo.add_entity("iowa");
    seed_week(&repo, ohio, d, 100, 5);
    seed_week(&repo, iowa, d, 50, 1);
    repo.add_post(ohio, date("2025-12-05"), Some(40), Some(4), Some(60));

    let engine = engine(repo);
    engine.run_for_date(d).unwrap();
    let first = engine.repository().snapshot_of_outputs();
    engine.run_for_date(d).unwrap();
    let second = engine.repository().snapshot_of_outputs();

    assert_eq!(first, second);
  }

  #[test]
  fn test_entity_dispersion_needs_two_rows() {
    let repo = MemoryRepository::new();
    let ohio = repo.add_entity("ohio");
    let d = date("2025-12-10");
    seed_week(&repo, ohio, d, 100, 10);

    let engine = engine(repo);
    engine.run_for_date(date("2025-12-09")).unwrap();
    assert!(engine
      .repository()
      .stored_dispersion(date("2025-12-09"), DispersionScope::Entity, Some(ohio), subscribers_7())
      .is_none());

    engine.run_for_date(d).unwrap();
    let spread = engine
      .repository()
      .stored_dispersion(d, DispersionScope::Entity, Some(ohio), subscribers_7())
      .unwrap();
    assert!(spread.std_dev.is_some());
  }

  #[test]
  fn test_entity_failure_is_reported_and_run_continues() {
    let repo = MemoryRepository::new();
    let d = date("2025-12-10");
    let ohio = repo.add_entity("ohio");
    let iowa = repo.add_entity("iowa");
    seed_week(&repo, ohio, d, 100, 0);
    seed_week(&repo, iowa, d, 200, 0);
    repo.fail_reads_for(iowa);

    let engine = engine(repo);
    let report = engine.run_for_date(d).unwrap();

    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.failures[0].stage, Stage::ComputeEntityMetrics);
    assert_eq!(report.failures[0].entity.as_deref(), Some("iowa"));
    assert_eq!(report.entities_processed, vec!["ohio".to_string()]);
    assert!(report.global_written);
  }

  #[test]
  fn test_backfill_runs_each_date_in_order() {
    let repo = MemoryRepository::new();
    let ohio = repo.add_entity("ohio");
    let d = date("2025-12-10");
    seed_week(&repo, ohio, d, 100, 0);

    let engine = engine(repo);
    let report = engine.backfill(d, 2).unwrap();

    let dates: Vec<NaiveDate> = report.runs.iter().map(|run| run.date).collect();
    assert_eq!(dates, vec![date("2025-12-08"), date("2025-12-09"), date("2025-12-10")]);
    assert!(report.failed_dates.is_empty());
    assert!(engine.repository().stored_entity_metrics(ohio, date("2025-12-08")).is_some());
  }

  /// Backfill of D-2..D with subscribers 100 at D-7 and 110 from D-6 onward
  fn backfill_week_over_week(with_baseline_row: bool) -> (MemoryRepository, i32, NaiveDate) {
    let repo = MemoryRepository::new();
    let ohio = repo.add_entity("ohio");
    let d = date("2025-12-10");
    let week_ago = date("2025-12-03");
    seed_week(&repo, ohio, week_ago, 100, 0);
    seed_week(&repo, ohio, d, 110, 0);

    let engine = engine(repo);
    if with_baseline_row {
      engine.run_for_date(week_ago).unwrap();
    }
    engine.backfill(d, 2).unwrap();

    let MetricsEngine { repo, .. } = engine;
    (repo, ohio, d)
  }

  #[test]
  fn test_backfill_wow_uses_baseline_stored_before_window() {
    let (repo, ohio, d) = backfill_week_over_week(true);

    let stored = repo.stored_entity_metrics(ohio, d).unwrap();
    assert_some_approx(stored.subscribers_wow_change, 10.0);
    let global = repo.stored_global_metrics(d).unwrap();
    assert_some_approx(global.subscribers_wow_change, 10.0);
  }

  #[test]
  fn test_backfill_wow_null_without_baseline_row() {
    let (repo, ohio, d) = backfill_week_over_week(false);

    let stored = repo.stored_entity_metrics(ohio, d).unwrap();
    assert_eq!(stored.subscribers_wow_change, None);
    let global = repo.stored_global_metrics(d).unwrap();
    assert_eq!(global.subscribers_wow_change, None);
  }
}
