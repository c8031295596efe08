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
use fm_engine::EngineError;
use fm_engine::maintenance::{audit_local_dates, backfill_snapshot_totals, backfill_vote_estimates};
use tracing::info;

use crate::commands::connect;
use crate::config::Config;

/// Most mismatches listed individually by `audit-dates`
const AUDIT_LIST_LIMIT: usize = 20;

#[derive(Debug)]
pub enum MaintenanceCommand {
  Votes,
  SnapshotTotals,
  AuditDates { entity: Option<String> },
}

pub async fn execute(cmd: MaintenanceCommand, config: Config) -> Result<()> {
  let context = connect(&config)?;
  let default_timezone = config.core.default_timezone;

  match cmd {
    MaintenanceCommand::Votes => {
      let summary = context
        .run(|conn| -> Result<_, EngineError> { backfill_vote_estimates(conn, true) })
        .await
        .context("Vote estimation failed")?;

      println!("Vote estimation complete:");
      println!("  - Updated: {}", summary.updated);
      println!("  - Already had estimates: {}", summary.already_estimated);
      println!("  - Skipped (cannot calculate): {}", summary.skipped);
      if summary.errors > 0 {
        println!("  - Errors: {}", summary.errors);
      }
    }

    MaintenanceCommand::SnapshotTotals => {
      let summary = context
        .run(move |conn| -> Result<_, EngineError> {
          backfill_snapshot_totals(conn, default_timezone, true)
        })
        .await
        .context("Snapshot totals backfill failed")?;

      println!("Snapshot totals complete:");
      println!("  - {} snapshots updated", summary.updated);
      println!("  - {} snapshots had no posts in the database", summary.no_posts);
      println!("  - {} snapshots errored", summary.errors);
    }

    MaintenanceCommand::AuditDates { entity } => {
      let scope = entity.clone().unwrap_or_else(|| "all entities".to_string());
      info!("Auditing stored local dates for {}", scope);

      let audit = context
        .run(move |conn| -> Result<_, EngineError> {
          audit_local_dates(conn, entity.as_deref(), default_timezone)
        })
        .await
        .context("Local date audit failed")?;

      println!("Checked {} posts for {}", audit.checked, scope);
      println!("  - {} with a wrong created_local", audit.mismatches.len());
      if audit.invalid_timezone > 0 {
        println!("  - {} skipped (invalid entity timezone)", audit.invalid_timezone);
      }

      for mismatch in audit.mismatches.iter().take(AUDIT_LIST_LIMIT) {
        println!(
          "  {} ({}): created {} stored {} expected {}",
          mismatch.reddit_id,
          mismatch.entity_name,
          mismatch.created_utc.format("%Y-%m-%d %H:%M UTC"),
          mismatch.stored,
          mismatch.expected
        );
      }
      if audit.mismatches.len() > AUDIT_LIST_LIMIT {
        println!("  ... and {} more", audit.mismatches.len() - AUDIT_LIST_LIMIT);
      }
    }
  }

  Ok(())
}
