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

//! Rows written by the metrics engine.
//!
//! Each struct is both the insert/changeset shape and the query shape; the
//! surrogate `id` and `computed_at` columns are left to the database.
//! `treat_none_as_null` matters: re-running a date must be able to overwrite a
//! previously stored value with `NULL`.

use chrono::NaiveDate;
use diesel::prelude::*;
use fm_core::{DispersionScope, MetricName, Signal, Window};
use serde::{Deserialize, Serialize};

use crate::schema::{dispersion_stats, entity_metrics, global_metrics};

/// Rolling averages, WoW deltas and ranks for one entity on one date
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = entity_metrics)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EntityMetrics {
  pub entity_id: i32,
  pub date: NaiveDate,
  pub subscribers_7day_avg: Option<f64>,
  pub posts_7day_avg: Option<f64>,
  pub score_7day_avg: Option<f64>,
  pub comments_7day_avg: Option<f64>,
  pub upvotes_7day_avg: Option<f64>,
  pub subscribers_30day_avg: Option<f64>,
  pub posts_30day_avg: Option<f64>,
  pub score_30day_avg: Option<f64>,
  pub comments_30day_avg: Option<f64>,
  pub upvotes_30day_avg: Option<f64>,
  pub subscribers_wow_change: Option<f64>,
  pub posts_wow_change: Option<f64>,
  pub score_wow_change: Option<f64>,
  pub comments_wow_change: Option<f64>,
  pub upvotes_wow_change: Option<f64>,
  pub subscribers_7day_rank: Option<i32>,
  pub posts_7day_rank: Option<i32>,
  pub score_7day_rank: Option<i32>,
  pub comments_7day_rank: Option<i32>,
  pub upvotes_7day_rank: Option<i32>,
}

/// Cross-entity means for one date
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = global_metrics)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GlobalMetrics {
  pub date: NaiveDate,
  pub subscribers_7day_avg: Option<f64>,
  pub posts_7day_avg: Option<f64>,
  pub score_7day_avg: Option<f64>,
  pub comments_7day_avg: Option<f64>,
  pub upvotes_7day_avg: Option<f64>,
  pub subscribers_30day_avg: Option<f64>,
  pub posts_30day_avg: Option<f64>,
  pub score_30day_avg: Option<f64>,
  pub comments_30day_avg: Option<f64>,
  pub upvotes_30day_avg: Option<f64>,
  pub subscribers_wow_change: Option<f64>,
  pub posts_wow_change: Option<f64>,
  pub score_wow_change: Option<f64>,
  pub comments_wow_change: Option<f64>,
  pub upvotes_wow_change: Option<f64>,
  pub entities_included: i32,
}

/// Spread of one metric's values, either across entities or across one entity's week
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = dispersion_stats)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DispersionStats {
  pub date: NaiveDate,
  pub scope: String,
  pub entity_id: Option<i32>,
  pub metric_name: String,
  pub median: Option<f64>,
  pub std_dev: Option<f64>,
  pub min_value: Option<f64>,
  pub max_value: Option<f64>,
  pub p25: Option<f64>,
  pub p75: Option<f64>,
}

impl EntityMetrics {
  /// A row with every value null
  pub fn empty(entity_id: i32, date: NaiveDate) -> Self {
    Self {
      entity_id,
      date,
      subscribers_7day_avg: None,
      posts_7day_avg: None,
      score_7day_avg: None,
      comments_7day_avg: None,
      upvotes_7day_avg: None,
      subscribers_30day_avg: None,
      posts_30day_avg: None,
      score_30day_avg: None,
      comments_30day_avg: None,
      upvotes_30day_avg: None,
      subscribers_wow_change: None,
      posts_wow_change: None,
      score_wow_change: None,
      comments_wow_change: None,
      upvotes_wow_change: None,
      subscribers_7day_rank: None,
      posts_7day_rank: None,
      score_7day_rank: None,
      comments_7day_rank: None,
      upvotes_7day_rank: None,
    }
  }

  pub fn average(&self, metric: MetricName) -> Option<f64> {
    match (metric.signal, metric.window) {
      (Signal::Subscribers, Window::SevenDay) => self.subscribers_7day_avg,
      (Signal::Posts, Window::SevenDay) => self.posts_7day_avg,
      (Signal::Score, Window::SevenDay) => self.score_7day_avg,
      (Signal::Comments, Window::SevenDay) => self.comments_7day_avg,
      (Signal::Upvotes, Window::SevenDay) => self.upvotes_7day_avg,
      (Signal::Subscribers, Window::ThirtyDay) => self.subscribers_30day_avg,
      (Signal::Posts, Window::ThirtyDay) => self.posts_30day_avg,
      (Signal::Score, Window::ThirtyDay) => self.score_30day_avg,
      (Signal::Comments, Window::ThirtyDay) => self.comments_30day_avg,
      (Signal::Upvotes, Window::ThirtyDay) => self.upvotes_30day_avg,
    }
  }

  pub fn set_average(&mut self, metric: MetricName, value: Option<f64>) {
    let slot = match (metric.signal, metric.window) {
      (Signal::Subscribers, Window::SevenDay) => &mut self.subscribers_7day_avg,
      (Signal::Posts, Window::SevenDay) => &mut self.posts_7day_avg,
      (Signal::Score, Window::SevenDay) => &mut self.score_7day_avg,
      (Signal::Comments, Window::SevenDay) => &mut self.comments_7day_avg,
      (Signal::Upvotes, Window::SevenDay) => &mut self.upvotes_7day_avg,
      (Signal::Subscribers, Window::ThirtyDay) => &mut self.subscribers_30day_avg,
      (Signal::Posts, Window::ThirtyDay) => &mut self.posts_30day_avg,
      (Signal::Score, Window::ThirtyDay) => &mut self.score_30day_avg,
      (Signal::Comments, Window::ThirtyDay) => &mut self.comments_30day_avg,
      (Signal::Upvotes, Window::ThirtyDay) => &mut self.upvotes_30day_avg,
    };
    *slot = value;
  }

  pub fn wow_change(&self, signal: Signal) -> Option<f64> {
    match signal {
      Signal::Subscribers => self.subscribers_wow_change,
      Signal::Posts => self.posts_wow_change,
      Signal::Score => self.score_wow_change,
      Signal::Comments => self.comments_wow_change,
      Signal::Upvotes => self.upvotes_wow_change,
    }
  }

  pub fn set_wow_change(&mut self, signal: Signal, value: Option<f64>) {
    let slot = match signal {
      Signal::Subscribers => &mut self.subscribers_wow_change,
      Signal::Posts => &mut self.posts_wow_change,
      Signal::Score => &mut self.score_wow_change,
      Signal::Comments => &mut self.comments_wow_change,
      Signal::Upvotes => &mut self.upvotes_wow_change,
    };
    *slot = value;
  }

  /// Rank of the 7-day average of `signal`
  pub fn rank(&self, signal: Signal) -> Option<i32> {
    match signal {
      Signal::Subscribers => self.subscribers_7day_rank,
      Signal::Posts => self.posts_7day_rank,
      Signal::Score => self.score_7day_rank,
      Signal::Comments => self.comments_7day_rank,
      Signal::Upvotes => self.upvotes_7day_rank,
    }
  }

  pub fn set_rank(&mut self, signal: Signal, value: Option<i32>) {
    let slot = match signal {
      Signal::Subscribers => &mut self.subscribers_7day_rank,
      Signal::Posts => &mut self.posts_7day_rank,
      Signal::Score => &mut self.score_7day_rank,
      Signal::Comments => &mut self.comments_7day_rank,
      Signal::Upvotes => &mut self.upvotes_7day_rank,
    };
    *slot = value;
  }
}

impl GlobalMetrics {
  pub fn empty(date: NaiveDate, entities_included: i32) -> Self {
    Self {
      date,
      subscribers_7day_avg: None,
      posts_7day_avg: None,
      score_7day_avg: None,
      comments_7day_avg: None,
      upvotes_7day_avg: None,
      subscribers_30day_avg: None,
      posts_30day_avg: None,
      score_30day_avg: None,
      comments_30day_avg: None,
      upvotes_30day_avg: None,
      subscribers_wow_change: None,
      posts_wow_change: None,
      score_wow_change: None,
      comments_wow_change: None,
      upvotes_wow_change: None,
      entities_included,
    }
  }

  pub fn average(&self, metric: MetricName) -> Option<f64> {
    match (metric.signal, metric.window) {
      (Signal::Subscribers, Window::SevenDay) => self.subscribers_7day_avg,
      (Signal::Posts, Window::SevenDay) => self.posts_7day_avg,
      (Signal::Score, Window::SevenDay) => self.score_7day_avg,
      (Signal::Comments, Window::SevenDay) => self.comments_7day_avg,
      (Signal::Upvotes, Window::SevenDay) => self.upvotes_7day_avg,
      (Signal::Subscribers, Window::ThirtyDay) => self.subscribers_30day_avg,
      (Signal::Posts, Window::ThirtyDay) => self.posts_30day_avg,
      (Signal::Score, Window::ThirtyDay) => self.score_30day_avg,
      (Signal::Comments, Window::ThirtyDay) => self.comments_30day_avg,
      (Signal::Upvotes, Window::ThirtyDay) => self.upvotes_30day_avg,
    }
  }

  pub fn set_average(&mut self, metric: MetricName, value: Option<f64>) {
    let slot = match (metric.signal, metric.window) {
      (Signal::Subscribers, Window::SevenDay) => &mut self.subscribers_7day_avg,
      (Signal::Posts, Window::SevenDay) => &mut self.posts_7day_avg,
      (Signal::Score, Window::SevenDay) => &mut self.score_7day_avg,
      (Signal::Comments, Window::SevenDay) => &mut self.comments_7day_avg,
      (Signal::Upvotes, Window::SevenDay) => &mut self.upvotes_7day_avg,
      (Signal::Subscribers, Window::ThirtyDay) => &mut self.subscribers_30day_avg,
      (Signal::Posts, Window::ThirtyDay) => &mut self.posts_30day_avg,
      (Signal::Score, Window::ThirtyDay) => &mut self.score_30day_avg,
      (Signal::Comments, Window::ThirtyDay) => &mut self.comments_30day_avg,
      (Signal::Upvotes, Window::ThirtyDay) => &mut self.upvotes_30day_avg,
    };
    *slot = value;
  }

  pub fn wow_change(&self, signal: Signal) -> Option<f64> {
    match signal {
      Signal::Subscribers => self.subscribers_wow_change,
      Signal::Posts => self.posts_wow_change,
      Signal::Score => self.score_wow_change,
      Signal::Comments => self.comments_wow_change,
      Signal::Upvotes => self.upvotes_wow_change,
    }
  }

  pub fn set_wow_change(&mut self, signal: Signal, value: Option<f64>) {
    let slot = match signal {
      Signal::Subscribers => &mut self.subscribers_wow_change,
      Signal::Posts => &mut self.posts_wow_change,
      Signal::Score => &mut self.score_wow_change,
      Signal::Comments => &mut self.comments_wow_change,
      Signal::Upvotes => &mut self.upvotes_wow_change,
    };
    *slot = value;
  }
}

impl DispersionStats {
  /// Key-only row; statistics are filled in by the caller
  pub fn keyed(
    date: NaiveDate,
    scope: DispersionScope,
    entity_id: Option<i32>,
    metric: MetricName,
  ) -> Self {
    Self {
      date,
      scope: scope.as_str().to_string(),
      entity_id,
      metric_name: metric.to_string(),
      median: None,
      std_dev: None,
      min_value: None,
      max_value: None,
      p25: None,
      p75: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
  }

  #[test]
  fn test_entity_metrics_accessors_cover_every_metric() {
    let mut row = EntityMetrics::empty(7, day());
    for (i, metric) in MetricName::ALL.iter().enumerate() {
      row.set_average(*metric, Some(i as f64));
    }
    for (i, metric) in MetricName::ALL.iter().enumerate() {
      assert_eq!(row.average(*metric), Some(i as f64), "{}", metric);
    }
    assert_eq!(row.comments_30day_avg, Some(7.0));
  }

  #[test]
  fn test_entity_metrics_ranks_and_wow() {
    let mut row = EntityMetrics::empty(7, day());
    row.set_rank(Signal::Score, Some(3));
    row.set_wow_change(Signal::Upvotes, Some(-12.5));
    assert_eq!(row.rank(Signal::Score), Some(3));
    assert_eq!(row.score_7day_rank, Some(3));
    assert_eq!(row.wow_change(Signal::Upvotes), Some(-12.5));
    assert_eq!(row.rank(Signal::Posts), None);
  }

  #[test]
  fn test_global_metrics_accessors() {
    let mut row = GlobalMetrics::empty(day(), 50);
    let metric = MetricName::new(Signal::Posts, Window::ThirtyDay);
    row.set_average(metric, Some(12.25));
    row.set_wow_change(Signal::Posts, Some(4.0));
    assert_eq!(row.average(metric), Some(12.25));
    assert_eq!(row.posts_30day_avg, Some(12.25));
    assert_eq!(row.wow_change(Signal::Posts), Some(4.0));
    assert_eq!(row.entities_included, 50);
  }

  #[test]
  fn test_dispersion_keyed() {
    let metric = MetricName::new(Signal::Score, Window::SevenDay);
    let row = DispersionStats::keyed(day(), DispersionScope::Global, None, metric);
    assert_eq!(row.scope, "global");
    assert_eq!(row.metric_name, "score_7day");
    assert_eq!(row.entity_id, None);
    assert_eq!(row.median, None);
  }
}
