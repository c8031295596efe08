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

//! Report posts whose stored local date disagrees with their UTC timestamp

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use diesel::PgConnection;
use fm_core::time::{entity_timezone, local_date};
use fm_database_postgres::models::{Post, PostLocalDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::EngineResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateMismatch {
  pub post_id: i32,
  pub reddit_id: String,
  pub entity_name: String,
  pub created_utc: DateTime<Utc>,
  pub stored: NaiveDate,
  pub expected: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateAudit {
  pub checked: usize,
  pub mismatches: Vec<DateMismatch>,
  /// Posts skipped because their entity's timezone does not parse
  pub invalid_timezone: usize,
}

/// Compare a post's stored local date with the date of `created_utc` in the
/// entity's timezone
pub fn check_local_date(row: &PostLocalDate, default_timezone: Tz) -> EngineResult<Option<DateMismatch>> {
  let tz = entity_timezone(row.timezone.as_deref(), default_timezone)?;
  let expected = local_date(row.created_utc, tz);
  if expected == row.created_local {
    return Ok(None);
  }

  Ok(Some(DateMismatch {
    post_id: row.id,
    reddit_id: row.reddit_id.clone(),
    entity_name: row.entity_name.clone(),
    created_utc: row.created_utc,
    stored: row.created_local,
    expected,
  }))
}

/// Check every post, or only those of `entity_name`. Nothing is modified.
pub fn audit_local_dates(
  conn: &mut PgConnection,
  entity_name: Option<&str>,
  default_timezone: Tz,
) -> EngineResult<DateAudit> {
  let rows = Post::local_dates(conn, entity_name)?;
  let mut audit = DateAudit { checked: rows.len(), ..Default::default() };

  for row in &rows {
    match check_local_date(row, default_timezone) {
      Ok(Some(mismatch)) => audit.mismatches.push(mismatch),
      Ok(None) => {}
      Err(e) => {
        warn!("Cannot check post {} of {}: {}", row.reddit_id, row.entity_name, e);
        audit.invalid_timezone += 1;
      }
    }
  }

  info!("Checked {} posts, {} with a wrong local date", audit.checked, audit.mismatches.len());
  Ok(audit)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn row(timezone: Option<&str>, created_utc: DateTime<Utc>, created_local: NaiveDate) -> PostLocalDate {
    PostLocalDate {
      id: 7,
      reddit_id: "abc123".to_string(),
      entity_name: "california".to_string(),
      timezone: timezone.map(str::to_string),
      created_utc,
      created_local,
    }
  }

  #[test]
  fn test_late_evening_pacific_post_belongs_to_previous_day() {
    // 2025-11-07 03:00 UTC is 2025-11-06 19:00 in Los Angeles
    let utc = Utc.with_ymd_and_hms(2025, 11, 7, 3, 0, 0).unwrap();
    let stored_utc_date = NaiveDate::from_ymd_opt(2025, 11, 7).unwrap();

    let mismatch = check_local_date(
      &row(Some("America/Los_Angeles"), utc, stored_utc_date),
      chrono_tz::America::New_York,
    )
    .unwrap()
    .unwrap();

    assert_eq!(mismatch.stored, stored_utc_date);
    assert_eq!(mismatch.expected, NaiveDate::from_ymd_opt(2025, 11, 6).unwrap());
  }

  #[test]
  fn test_correct_date_under_default_timezone() {
    let utc = Utc.with_ymd_and_hms(2025, 11, 7, 3, 0, 0).unwrap();
    let local = NaiveDate::from_ymd_opt(2025, 11, 6).unwrap();

    assert_eq!(check_local_date(&row(None, utc, local), chrono_tz::America::New_York).unwrap(), None);
  }

  #[test]
  fn test_invalid_timezone_is_an_error() {
    let utc = Utc.with_ymd_and_hms(2025, 11, 7, 3, 0, 0).unwrap();
    let local = NaiveDate::from_ymd_opt(2025, 11, 6).unwrap();

    assert!(check_local_date(&row(Some("Pacific/Atlantis"), utc, local), chrono_tz::America::New_York).is_err());
  }
}
