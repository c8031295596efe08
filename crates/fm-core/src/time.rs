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

//! Local-date helpers.
//!
//! Posts are bucketed by the calendar day in the entity's own timezone.

use crate::error::{Error, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz> {
  name.trim().parse::<Tz>().map_err(|_| Error::InvalidTimezone(name.to_string()))
}

/// Timezone for an entity, falling back to `default` when none is recorded
pub fn entity_timezone(name: Option<&str>, default: Tz) -> Result<Tz> {
  match name.map(str::trim) {
    Some(n) if !n.is_empty() => parse_timezone(n),
    _ => Ok(default),
  }
}

/// Calendar date of `instant` in `tz`
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
  instant.with_timezone(&tz).date_naive()
}

/// First instant of `date` in `tz`, expressed in UTC
pub fn start_of_local_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
  // Midnight can fall into a DST gap in a few zones; walk forward to the first valid hour.
  for hour in 0..3 {
    let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else { continue };
    if let Some(dt) = tz.from_local_datetime(&date.and_time(time)).earliest() {
      return dt.with_timezone(&Utc);
    }
  }
  Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Half-open UTC range `[start, end)` covering the local day `date` in `tz`
pub fn local_day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
  let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
  (start_of_local_day(date, tz), start_of_local_day(next, tz))
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
}
