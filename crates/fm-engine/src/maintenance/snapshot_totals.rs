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

//! Derive missing snapshot totals from the posts of the covered day

use chrono_tz::Tz;
use diesel::PgConnection;
use fm_core::time::{entity_timezone, local_day_bounds};
use fm_database_postgres::models::{DailySnapshot, Post, PostDayTotals, SnapshotTotals};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::EngineResult;
use crate::progress::progress_bar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotTotalsSummary {
  pub checked: usize,
  pub updated: usize,
  pub no_posts: usize,
  pub errors: usize,
}

fn clamp_i32(value: i64) -> i32 {
  value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Totals to store for a day, or `None` when the day had no posts.
/// Missing sums are stored as zero.
pub fn totals_from(day: &PostDayTotals) -> Option<SnapshotTotals> {
  if day.post_count == 0 {
    return None;
  }

  Some(SnapshotTotals {
    posts_count: clamp_i32(day.post_count),
    total_comments: clamp_i32(day.total_comments.unwrap_or(0)),
    total_estimated_upvotes: clamp_i32(day.total_upvotes.unwrap_or(0)),
    total_estimated_downvotes: clamp_i32(day.total_downvotes.unwrap_or(0)),
  })
}

/// Fill post count, comment and vote totals on snapshots where any is zero or missing
pub fn backfill_snapshot_totals(
  conn: &mut PgConnection,
  default_timezone: Tz,
  show_progress: bool,
) -> EngineResult<SnapshotTotalsSummary> {
  info!("Starting backfill of post totals for snapshots");

  let snapshots = DailySnapshot::needing_totals(conn)?;
  info!("Found {} snapshots to check", snapshots.len());

  let progress = progress_bar(snapshots.len() as u64, show_progress);
  let mut summary = SnapshotTotalsSummary { checked: snapshots.len(), ..Default::default() };

  for (snapshot, entity) in &snapshots {
    if let Some(pb) = &progress {
      pb.inc(1);
    }

    let tz = match entity_timezone(entity.timezone.as_deref(), default_timezone) {
      Ok(tz) => tz,
      Err(e) => {
        error!("Error processing snapshot {} for {}: {}", snapshot.id, entity.name, e);
        summary.errors += 1;
        continue;
      }
    };

    let (start, end) = local_day_bounds(snapshot.snapshot_date, tz);
    let day = match Post::day_totals(conn, entity.id, start, end) {
      Ok(day) => day,
      Err(e) => {
        error!("Error processing snapshot {} for {}: {}", snapshot.id, entity.name, e);
        summary.errors += 1;
        continue;
      }
    };

    let Some(totals) = totals_from(&day) else {
      debug!("No posts found for {} on {}", entity.name, snapshot.snapshot_date);
      summary.no_posts += 1;
      continue;
    };

    match DailySnapshot::update_totals(conn, snapshot.id, &totals) {
      Ok(_) => {
        summary.updated += 1;
        debug!(
          "{} on {}: {} posts, {} comments, up={}, down={}",
          entity.name,
          snapshot.snapshot_date,
          totals.posts_count,
          totals.total_comments,
          totals.total_estimated_upvotes,
          totals.total_estimated_downvotes
        );
      }
      Err(e) => {
        error!("Error processing snapshot {} for {}: {}", snapshot.id, entity.name, e);
        summary.errors += 1;
      }
    }
  }

  if let Some(pb) = progress {
    pb.finish_with_message("Snapshot totals complete");
  }
  info!(
    "Snapshot totals complete: updated {}, no posts {}, errors {}",
    summary.updated, summary.no_posts, summary.errors
  );
  Ok(summary)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_no_posts_means_no_update() {
    assert_eq!(totals_from(&PostDayTotals::default()), None);
  }

  #[test]
  fn test_missing_sums_become_zero() {
    let day =
      PostDayTotals { post_count: 4, total_comments: Some(31), total_upvotes: None, total_downvotes: None };

    assert_eq!(
      totals_from(&day),
      Some(SnapshotTotals {
        posts_count: 4,
        total_comments: 31,
        total_estimated_upvotes: 0,
        total_estimated_downvotes: 0,
      })
    );
  }

  #[test]
  fn test_oversized_sum_saturates() {
    let day = PostDayTotals {
      post_count: 1,
      total_comments: Some(i64::from(i32::MAX) + 10),
      total_upvotes: Some(7),
      total_downvotes: Some(2),
    };
    let totals = totals_from(&day).unwrap();
    assert_eq!(totals.total_comments, i32::MAX);
    assert_eq!(totals.total_estimated_upvotes, 7);
  }
}
