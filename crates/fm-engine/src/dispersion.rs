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

//! Dispersion statistics over a set of metric values

use chrono::NaiveDate;
use fm_core::{DispersionScope, MetricName};
use fm_database_postgres::models::DispersionStats;
use serde::Serialize;

/// Median, sample standard deviation, range and quartiles of a value set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Dispersion {
  pub median: Option<f64>,
  pub std_dev: Option<f64>,
  pub min: Option<f64>,
  pub max: Option<f64>,
  pub p25: Option<f64>,
  pub p75: Option<f64>,
}

/// Compute dispersion over the present values.
///
/// With no values everything is null. A single value is its own median, min
/// and max, while spread and quartiles stay null. Quartiles are taken at index
/// `floor(n * q)` of the sorted values.
pub fn dispersion<I>(values: I) -> Dispersion
where
  I: IntoIterator<Item = Option<f64>>,
{
  let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
  sorted.sort_by(f64::total_cmp);

  match sorted.as_slice() {
    [] => Dispersion::default(),
    [only] => Dispersion {
      median: Some(*only),
      min: Some(*only),
      max: Some(*only),
      ..Dispersion::default()
    },
    _ => {
      let n = sorted.len();
      let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
      } else {
        sorted[n / 2]
      };

      let mean = sorted.iter().sum::<f64>() / n as f64;
      let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

      Dispersion {
        median: Some(median),
        std_dev: Some(variance.sqrt()),
        min: Some(sorted[0]),
        max: Some(sorted[n - 1]),
        p25: Some(sorted[n / 4]),
        p75: Some(sorted[n * 3 / 4]),
      }
    }
  }
}

impl Dispersion {
  /// Storage row keyed by (date, scope, metric[, entity])
  pub fn into_row(
    self,
    date: NaiveDate,
    scope: DispersionScope,
    entity_id: Option<i32>,
    metric: MetricName,
  ) -> DispersionStats {
    let mut row = DispersionStats::keyed(date, scope, entity_id, metric);
    row.median = self.median;
    row.std_dev = self.std_dev;
    row.min_value = self.min;
    row.max_value = self.max;
    row.p25 = self.p25;
    row.p75 = self.p75;
    row
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fm_core::test_utils::assert_some_approx;
  use fm_core::{Signal, Window};
  use pretty_assertions::assert_eq;

  #[test]
  fn test_dispersion_of_one_to_five() {
    let stats = dispersion([1.0, 2.0, 3.0, 4.0, 5.0].map(Some));

    assert_eq!(stats.median, Some(3.0));
    assert_some_approx(stats.std_dev, 1.581_138_830_084_189_8);
    assert_eq!(stats.min, Some(1.0));
    assert_eq!(stats.max, Some(5.0));
    assert_eq!(stats.p25, Some(2.0));
    assert_eq!(stats.p75, Some(4.0));
  }

  #[test]
  fn test_even_count_median_is_mean_of_middle_pair() {
    let stats = dispersion([4.0, 1.0, 3.0, 2.0].map(Some));

    assert_eq!(stats.median, Some(2.5));
    assert_eq!(stats.p25, Some(2.0));
    assert_eq!(stats.p75, Some(4.0));
  }

  #[test]
  fn test_single_value() {
    let stats = dispersion([None, Some(7.5)]);

    assert_eq!(
      stats,
      Dispersion {
        median: Some(7.5),
        std_dev: None,
        min: Some(7.5),
        max: Some(7.5),
        p25: None,
        p75: None,
      }
    );
  }

  #[test]
  fn test_no_values() {
    assert_eq!(dispersion([None, None]), Dispersion::default());
  }

  #[test]
  fn test_into_row_keys_and_values() {
    let date = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
    let metric = MetricName::new(Signal::Posts, Window::ThirtyDay);
    let row = dispersion([Some(1.0), Some(3.0)]).into_row(date, DispersionScope::Entity, Some(4), metric);

    assert_eq!(row.scope, "entity");
    assert_eq!(row.entity_id, Some(4));
    assert_eq!(row.metric_name, "posts_30day");
    assert_eq!(row.median, Some(2.0));
    assert_eq!(row.min_value, Some(1.0));
    assert_eq!(row.max_value, Some(3.0));
  }
}
