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

//! Week-over-week percent change

use fm_core::{Computed, NullReason};
use tracing::warn;

/// `(current - previous) / previous * 100`
///
/// Null when either side is missing, or when `previous` is zero.
pub fn wow_change(current: Option<f64>, previous: Option<f64>) -> Computed<f64> {
  match (current, previous) {
    (Some(_), Some(previous)) if previous == 0.0 => {
      warn!("Week-over-week baseline is zero, delta left null");
      Computed::Null(NullReason::DivideByZero)
    }
    (Some(current), Some(previous)) => Computed::Value((current - previous) / previous * 100.0),
    _ => Computed::Null(NullReason::MissingInput),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fm_core::test_utils::assert_some_approx;

  #[test]
  fn test_wow_change_growth() {
    assert_some_approx(wow_change(Some(110.0), Some(100.0)).value(), 10.0);
    assert_some_approx(wow_change(Some(50.0), Some(100.0)).value(), -50.0);
  }

  #[test]
  fn test_wow_change_of_equal_values_is_zero() {
    for x in [1.0, -3.5, 1e6] {
      assert_eq!(wow_change(Some(x), Some(x)), Computed::Value(0.0));
    }
  }

  #[test]
  fn test_wow_change_zero_baseline() {
    assert_eq!(wow_change(Some(5.0), Some(0.0)), Computed::Null(NullReason::DivideByZero));
  }

  #[test]
  fn test_wow_change_missing_side() {
    assert_eq!(wow_change(None, Some(4.0)), Computed::Null(NullReason::MissingInput));
    assert_eq!(wow_change(Some(4.0), None), Computed::Null(NullReason::MissingInput));
    assert_eq!(wow_change(None, Some(0.0)), Computed::Null(NullReason::MissingInput));
  }
}
