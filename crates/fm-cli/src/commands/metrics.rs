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

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use fm_core::time::{local_date, parse_date};
use fm_engine::{EngineConfig, MetricsEngine};
use tracing::{info, warn};

use crate::commands::connect;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct MetricsCommand {
  /// Calculation date (YYYY-MM-DD); defaults to today
  #[arg(value_parser = parse_date, conflicts_with = "backfill")]
  date: Option<NaiveDate>,

  /// Recalculate the last DAYS days and today, oldest first
  #[arg(long, value_name = "DAYS", value_parser = parse_day_count)]
  backfill: Option<u32>,
}

pub(crate) fn parse_day_count(raw: &str) -> fm_core::Result<u32> {
  match raw.trim().parse::<u32>() {
    Ok(days) if days <= fm_core::MAX_BACKFILL_DAYS => Ok(days),
    _ => Err(fm_core::Error::InvalidDayCount(raw.to_string())),
  }
}

pub async fn execute(cmd: MetricsCommand, config: Config) -> Result<()> {
  let today = local_date(Utc::now(), config.core.default_timezone);
  let context = connect(&config)?;

  let engine_config = EngineConfig { show_progress: cmd.backfill.is_some(), ..EngineConfig::from(&config.core) };
  let engine = MetricsEngine::new(context.metrics_repository(), engine_config);

  match cmd.backfill {
    Some(days_back) => {
      let report = tokio::task::spawn_blocking(move || engine.backfill(today, days_back))
        .await
        .context("Backfill task failed")?
        .with_context(|| format!("Cannot backfill {} days before {}", days_back, today))?;

      println!(
        "Backfilled {} dates ({} record failures, {} dates failed)",
        report.dates_completed(),
        report.total_failures(),
        report.failed_dates.len()
      );
      for (date, error) in &report.failed_dates {
        warn!("{} was not calculated: {}", date, error);
      }
    }
    None => {
      let calc_date = cmd.date.unwrap_or(today);
      let report = tokio::task::spawn_blocking(move || engine.run_for_date(calc_date))
        .await
        .context("Metrics task failed")?
        .with_context(|| format!("Failed to calculate metrics for {}", calc_date))?;

      println!(
        "Metrics for {}: {} entities, global {}, {} dispersion rows",
        report.date,
        report.success_count(),
        if report.global_written { "written" } else { "skipped" },
        report.dispersion_rows
      );
      for failure in &report.failures {
        println!("  failed {}", failure);
      }
      info!("Run finished at stage {:?}", report.stage);
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_day_count() {
    assert_eq!(parse_day_count("30").unwrap(), 30);
    assert_eq!(parse_day_count("0").unwrap(), 0);
    assert!(matches!(parse_day_count("-1"), Err(fm_core::Error::InvalidDayCount(_))));
    assert!(parse_day_count("a week").is_err());
  }

  #[test]
  fn test_parse_day_count_rejects_oversized_counts() {
    let limit = fm_core::MAX_BACKFILL_DAYS;
    assert_eq!(parse_day_count(&limit.to_string()).unwrap(), limit);
    assert!(matches!(
      parse_day_count(&(limit + 1).to_string()),
      Err(fm_core::Error::InvalidDayCount(_))
    ));
    assert!(parse_day_count("4294967295").is_err());
  }
}
