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

//! Explicit nullable results.
//!
//! Every average and ratio in the engine can legitimately come out empty. A
//! [`Computed`] carries either the value or the reason it is missing, so the
//! difference between "no data" and "undefined arithmetic" survives until the
//! row is written (where both become SQL `NULL`).

use serde::{Deserialize, Serialize};

/// Why a computed value is null
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullReason {
  /// The window held no qualifying rows
  InsufficientData,
  /// An input to the calculation was itself null
  MissingInput,
  /// The denominator was zero
  DivideByZero,
}

impl std::fmt::Display for NullReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      NullReason::InsufficientData => write!(f, "insufficient data"),
      NullReason::MissingInput => write!(f, "missing input"),
      NullReason::DivideByZero => write!(f, "division by zero"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Computed<T> {
  Value(T),
  Null(NullReason),
}

impl<T> Computed<T> {
  /// Wrap an option, using `reason` when it is `None`
  pub fn from_option(value: Option<T>, reason: NullReason) -> Self {
    match value {
      Some(v) => Computed::Value(v),
      None => Computed::Null(reason),
    }
  }

  pub fn value(self) -> Option<T> {
    match self {
      Computed::Value(v) => Some(v),
      Computed::Null(_) => None,
    }
  }

  pub fn reason(&self) -> Option<NullReason> {
    match self {
      Computed::Value(_) => None,
      Computed::Null(reason) => Some(*reason),
    }
  }

  pub fn is_value(&self) -> bool {
    matches!(self, Computed::Value(_))
  }

  pub fn is_null(&self) -> bool {
    !self.is_value()
  }

  pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Computed<U> {
    match self {
      Computed::Value(v) => Computed::Value(f(v)),
      Computed::Null(reason) => Computed::Null(reason),
    }
  }
}

impl<T> From<Computed<T>> for Option<T> {
  fn from(computed: Computed<T>) -> Self {
    computed.value()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_value_round_trips_to_option() {
    let c = Computed::Value(4.5);
    assert!(c.is_value());
    assert_eq!(c.reason(), None);
    assert_eq!(Option::<f64>::from(c), Some(4.5));
  }

  #[test]
  fn test_null_keeps_reason() {
    let c: Computed<f64> = Computed::from_option(None, NullReason::InsufficientData);
    assert!(c.is_null());
    assert_eq!(c.reason(), Some(NullReason::InsufficientData));
    assert_eq!(c.value(), None);
  }

  #[test]
  fn test_map_preserves_null_reason() {
    let c: Computed<i32> = Computed::Null(NullReason::DivideByZero);
    assert_eq!(c.map(|v| v * 2), Computed::Null(NullReason::DivideByZero));
    assert_eq!(Computed::Value(3).map(|v| v * 2), Computed::Value(6));
  }

  #[test]
  fn test_reason_display() {
    assert_eq!(NullReason::DivideByZero.to_string(), "division by zero");
    assert_eq!(NullReason::InsufficientData.to_string(), "insufficient data");
  }
}
