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

use fm_database_postgres::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
  #[error("Database error: {0}")]
  Database(String),

  #[error("Invalid data: {0}")]
  InvalidData(String),

  #[error("Configuration error: {0}")]
  Configuration(String),
}

impl From<RepositoryError> for EngineError {
  fn from(err: RepositoryError) -> Self {
    EngineError::Database(err.to_string())
  }
}

impl From<diesel::result::Error> for EngineError {
  fn from(err: diesel::result::Error) -> Self {
    EngineError::Database(err.to_string())
  }
}

impl From<fm_core::Error> for EngineError {
  fn from(err: fm_core::Error) -> Self {
    match err {
      fm_core::Error::InvalidTimezone(_) => EngineError::InvalidData(err.to_string()),
      _ => EngineError::Configuration(err.to_string()),
    }
  }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_engine_error_display_database() {
    let err = EngineError::Database("connection refused".to_string());
    assert_eq!(err.to_string(), "Database error: connection refused");
  }

  #[test]
  fn test_engine_error_display_invalid_data() {
    let err = EngineError::InvalidData("negative day count".to_string());
    assert_eq!(err.to_string(), "Invalid data: negative day count");
  }

  #[test]
  fn test_engine_error_display_configuration() {
    let err = EngineError::Configuration("empty capital entity".to_string());
    assert_eq!(err.to_string(), "Configuration error: empty capital entity");
  }

  #[test]
  fn test_engine_error_from_repository_error() {
    let repo_err = RepositoryError::QueryError("relation does not exist".to_string());
    let err = EngineError::from(repo_err);
    assert!(matches!(err, EngineError::Database(_)));
    assert!(err.to_string().contains("relation does not exist"));
  }

  #[test]
  fn test_engine_error_from_diesel_not_found() {
    let err = EngineError::from(diesel::result::Error::NotFound);
    assert!(matches!(err, EngineError::Database(_)));
  }

  #[test]
  fn test_engine_error_from_core_error() {
    let err = EngineError::from(fm_core::Error::Config("bad pool size".to_string()));
    assert!(matches!(err, EngineError::Configuration(_)));

    let err = EngineError::from(fm_core::Error::InvalidTimezone("Mars/Olympus".to_string()));
    assert!(matches!(err, EngineError::InvalidData(_)));
  }

  #[test]
  fn test_engine_error_clone() {
    let err = EngineError::Database("test".to_string());
    assert_eq!(err.clone(), err);
  }
}
