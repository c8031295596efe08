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

use thiserror::Error;

/// The main error type for fm-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Date parsing error
  #[error("Invalid date (expected YYYY-MM-DD): {0}")]
  ParseDate(#[from] chrono::ParseError),

  /// Unknown IANA timezone name
  #[error("Invalid timezone: {0}")]
  InvalidTimezone(String),

  /// Backfill day count out of range
  #[error("Invalid day count: {0}")]
  InvalidDayCount(String),

  /// Unknown metric name
  #[error("Unknown metric: {0}")]
  UnknownMetric(String),
}

/// Result type alias for fm-* crates
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_display() {
    let err = Error::InvalidTimezone("Mars/Olympus".to_string());
    assert_eq!(err.to_string(), "Invalid timezone: Mars/Olympus");

    let err = Error::InvalidDayCount("-4".to_string());
    assert_eq!(err.to_string(), "Invalid day count: -4");
  }

  #[test]
  fn test_error_from_chrono() {
    let parse_err = chrono::NaiveDate::parse_from_str("2025-13-45", "%Y-%m-%d").unwrap_err();
    let err: Error = parse_err.into();
    assert!(matches!(err, Error::ParseDate(_)));
    assert!(err.to_string().starts_with("Invalid date"));
  }
}
