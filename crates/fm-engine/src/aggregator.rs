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

//! Rolling-window averages
//!
//! Subscriber and post counts come from daily snapshots whose covered date lies
//! in `[D-(n-1), D]`. Score, comments and upvotes come from posts whose
//! engagement has been collected and whose local creation date lies in the
//! same window shifted back by [`fm_core::ENGAGEMENT_LAG_DAYS`].
//!
//! Both 30-day windows contain their 7-day counterparts, so the repository is
//! queried once per source and the 7-day subset is taken in memory.

use chrono::NaiveDate;
use fm_core::types::SignalSource;
use fm_core::{Computed, MetricName, NullReason, Signal, Window};
use fm_database_postgres::models::{EngagementValues, SnapshotValues};
use fm_database_postgres::{MetricsRepository, RepositoryResult};
use std::collections::BTreeMap;

/// Arithmetic mean of the present values; null values count in neither the
/// sum nor the denominator.
pub fn mean<I>(values: I) -> Computed<f64>
where
  I: IntoIterator<Item = Option<f64>>,
{
  let (sum, count) =
    values.into_iter().flatten().fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));

  if count == 0 {
    Computed::Null(NullReason::InsufficientData)
  } else {
    Computed::Value(sum / count as f64)
  }
}

/// The ten rolling averages of one entity on one date
#[derive(Debug, Clone, PartialEq)]
pub struct RollingAverages {
  averages: BTreeMap<MetricName, Computed<f64>>,
}

impl RollingAverages {
  /// Compute all ten averages from rows covering at least the 30-day windows.
  /// Rows outside a metric's window are ignored.
  pub fn from_rows(
    calc_date: NaiveDate,
    snapshots: &[SnapshotValues],
    posts: &[EngagementValues],
  ) -> Self {
    let averages = MetricName::ALL
      .into_iter()
      .map(|metric| {
        let value = match metric.signal.source() {
          SignalSource::Snapshot => {
            let range = metric.window.snapshot_range(calc_date);
            mean(
              snapshots
                .iter()
                .filter(|row| range.contains(row.snapshot_date))
                .map(|row| snapshot_field(row, metric.signal)),
            )
          }
          SignalSource::Post => {
            let range = metric.window.engagement_range(calc_date);
            mean(
              posts
                .iter()
                .filter(|row| range.contains(row.created_local))
                .map(|row| post_field(row, metric.signal)),
            )
          }
        };
        (metric, value)
      })
      .collect();

    Self { averages }
  }

  pub fn get(&self, metric: MetricName) -> Computed<f64> {
    self.averages.get(&metric).copied().unwrap_or(Computed::Null(NullReason::InsufficientData))
  }

  /// Averages in `MetricName` order
  pub fn iter(&self) -> impl Iterator<Item = (MetricName, Computed<f64>)> + '_ {
    self.averages.iter().map(|(metric, value)| (*metric, *value))
  }

  /// True when no window had a single qualifying value
  pub fn is_empty(&self) -> bool {
    self.averages.values().all(Computed::is_null)
  }
}

fn snapshot_field(row: &SnapshotValues, signal: Signal) -> Option<f64> {
  match signal {
    Signal::Subscribers => row.subscribers_count,
    Signal::Posts => row.posts_count,
    _ => None,
  }
  .map(f64::from)
}

fn post_field(row: &EngagementValues, signal: Signal) -> Option<f64> {
  match signal {
    Signal::Score => row.score,
    Signal::Comments => row.num_comments,
    Signal::Upvotes => row.estimated_upvotes,
    _ => None,
  }
  .map(f64::from)
}

/// Load an entity's window data and compute its rolling averages for `calc_date`
pub fn rolling_averages<R>(
  repo: &R,
  entity_id: i32,
  calc_date: NaiveDate,
) -> RepositoryResult<RollingAverages>
where
  R: MetricsRepository + ?Sized,
{
  let snapshots = repo.snapshot_values(entity_id, Window::ThirtyDay.snapshot_range(calc_date))?;
  let posts = repo.engagement_values(entity_id, Window::ThirtyDay.engagement_range(calc_date))?;
  Ok(RollingAverages::from_rows(calc_date, &snapshots, &posts))
}

#[cfg(test)]
mod tests {
  use super::*;
  use fm_core::test_utils::assert_some_approx;

  fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  fn snapshot(day: &str, subscribers: Option<i32>, posts: Option<i32>) -> SnapshotValues {
    SnapshotValues { snapshot_date: date(day), subscribers_count: subscribers, posts_count: posts }
  }

  fn post(day: &str, score: Option<i32>) -> EngagementValues {
    EngagementValues {
      created_local: date(day),
      score,
      num_comments: score.map(|s| s / 10),
      estimated_upvotes: None,
    }
  }

  #[test]
  fn test_mean_ignores_nulls() {
    assert_eq!(mean([Some(1.0), None, Some(3.0)]), Computed::Value(2.0));
  }

  #[test]
  fn test_mean_of_nothing_is_insufficient_data() {
    assert_eq!(mean(Vec::<Option<f64>>::new()), Computed::Null(NullReason::InsufficientData));
    assert_eq!(mean([None, None]), Computed::Null(NullReason::InsufficientData));
  }

  #[test]
  fn test_seven_day_subscribers_average() {
    let snapshots: Vec<SnapshotValues> = (4..=10)
      .map(|day| snapshot(&format!("2025-12-{:02}", day), Some(100 + (day - 4) * 10), None))
      .collect();

    let averages = RollingAverages::from_rows(date("2025-12-10"), &snapshots, &[]);
    let subscribers_7 = MetricName::new(Signal::Subscribers, Window::SevenDay);

    assert_some_approx(averages.get(subscribers_7).value(), 130.0);
  }

  #[test]
  fn test_snapshot_outside_seven_day_window_only_counts_for_thirty() {
    let snapshots = vec![
      snapshot("2025-12-10", Some(200), Some(4)),
      snapshot("2025-12-03", Some(100), Some(2)),
    ];
    let averages = RollingAverages::from_rows(date("2025-12-10"), &snapshots, &[]);

    assert_some_approx(
      averages.get(MetricName::new(Signal::Subscribers, Window::SevenDay)).value(),
      200.0,
    );
    assert_some_approx(
      averages.get(MetricName::new(Signal::Subscribers, Window::ThirtyDay)).value(),
      150.0,
    );
    assert_some_approx(averages.get(MetricName::new(Signal::Posts, Window::ThirtyDay)).value(), 3.0);
  }

  #[test]
  fn test_engagement_window_is_lagged() {
    // D = 2025-12-10: the 7-day engagement window is 12-01..12-07
    let posts = vec![
      post("2025-12-08", Some(1000)),
      post("2025-12-07", Some(30)),
      post("2025-12-01", Some(10)),
      post("2025-11-30", Some(500)),
    ];
    let averages = RollingAverages::from_rows(date("2025-12-10"), &[], &posts);

    assert_some_approx(averages.get(MetricName::new(Signal::Score, Window::SevenDay)).value(), 20.0);
    assert_some_approx(averages.get(MetricName::new(Signal::Comments, Window::SevenDay)).value(), 2.0);
    assert_some_approx(
      averages.get(MetricName::new(Signal::Score, Window::ThirtyDay)).value(),
      (30.0 + 10.0 + 500.0) / 3.0,
    );
  }

  #[test]
  fn test_missing_data_gives_null_averages() {
    let averages = RollingAverages::from_rows(date("2025-12-10"), &[], &[post("2025-12-05", None)]);

    assert!(averages.is_empty());
    assert_eq!(
      averages.get(MetricName::new(Signal::Upvotes, Window::SevenDay)),
      Computed::Null(NullReason::InsufficientData)
    );
    assert_eq!(averages.iter().count(), 10);
  }
}
