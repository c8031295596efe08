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

//! Fill in estimated up/down votes on posts that have score and ratio

use diesel::PgConnection;
use fm_core::{Computed, NullReason, VoteEstimate, estimate_votes};
use fm_database_postgres::models::Post;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::EngineResult;
use crate::progress::progress_bar;

/// What to do with one post
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VotePlan {
  /// A non-zero estimate is stored already; estimates are frozen once set
  AlreadyEstimated,
  Update(VoteEstimate),
  /// Estimation is undefined for this post
  Skip(NullReason),
}

pub fn plan_vote_update(post: &Post) -> VotePlan {
  let has_estimate =
    post.estimated_upvotes.is_some_and(|v| v > 0) || post.estimated_downvotes.is_some_and(|v| v > 0);
  if has_estimate {
    return VotePlan::AlreadyEstimated;
  }

  match estimate_votes(post.score, post.upvote_ratio) {
    Computed::Value(estimate) => VotePlan::Update(estimate),
    Computed::Null(reason) => VotePlan::Skip(reason),
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteBackfillSummary {
  pub checked: usize,
  pub updated: usize,
  pub already_estimated: usize,
  pub skipped: usize,
  pub errors: usize,
}

/// Estimate votes for every post with score and ratio lacking a stored estimate
pub fn backfill_vote_estimates(
  conn: &mut PgConnection,
  show_progress: bool,
) -> EngineResult<VoteBackfillSummary> {
  info!("Starting backfill of estimated votes for posts");

  let posts = Post::with_vote_inputs(conn)?;
  info!("Found {} posts to check", posts.len());

  let progress = progress_bar(posts.len() as u64, show_progress);
  let mut summary = VoteBackfillSummary { checked: posts.len(), ..Default::default() };

  for post in &posts {
    match plan_vote_update(post) {
      VotePlan::AlreadyEstimated => summary.already_estimated += 1,
      VotePlan::Skip(reason) => {
        debug!(
          "Skipped post {} ({}): score={:?}, ratio={:?}",
          post.reddit_id, reason, post.score, post.upvote_ratio
        );
        summary.skipped += 1;
      }
      VotePlan::Update(estimate) => {
        match Post::set_vote_estimates(conn, post.id, estimate.upvotes, estimate.downvotes) {
          Ok(_) => summary.updated += 1,
          Err(e) => {
            error!("Failed to store vote estimate for post {}: {}", post.reddit_id, e);
            summary.errors += 1;
          }
        }
      }
    }

    if let Some(pb) = &progress {
      pb.inc(1);
    }
  }

  if let Some(pb) = progress {
    pb.finish_with_message("Vote estimates complete");
  }
  info!(
    "Vote backfill complete: updated {}, already had estimates {}, skipped {}, errors {}",
    summary.updated, summary.already_estimated, summary.skipped, summary.errors
  );
  Ok(summary)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{NaiveDate, Utc};

  fn post(
    score: Option<i32>,
    ratio: Option<f64>,
    upvotes: Option<i32>,
    downvotes: Option<i32>,
  ) -> Post {
    Post {
      id: 1,
      reddit_id: "1o0sthp".to_string(),
      entity_id: 1,
      title: "Weekend farmers market thread".to_string(),
      created_utc: Utc::now(),
      created_local: NaiveDate::from_ymd_opt(2025, 10, 8).unwrap(),
      score,
      upvote_ratio: ratio,
      num_comments: Some(3),
      estimated_upvotes: upvotes,
      estimated_downvotes: downvotes,
      engagement_collected: true,
      is_removed: false,
      date_created: Utc::now(),
      date_updated: Utc::now(),
    }
  }

  #[test]
  fn test_plan_updates_missing_estimate() {
    assert_eq!(
      plan_vote_update(&post(Some(10), Some(0.75), None, None)),
      VotePlan::Update(VoteEstimate { upvotes: 15, downvotes: 5 })
    );
  }

  #[test]
  fn test_plan_recomputes_zero_estimate() {
    assert_eq!(
      plan_vote_update(&post(Some(10), Some(0.75), Some(0), Some(0))),
      VotePlan::Update(VoteEstimate { upvotes: 15, downvotes: 5 })
    );
  }

  #[test]
  fn test_plan_keeps_existing_estimate() {
    assert_eq!(
      plan_vote_update(&post(Some(10), Some(0.75), Some(0), Some(2))),
      VotePlan::AlreadyEstimated
    );
    assert_eq!(
      plan_vote_update(&post(Some(99), Some(0.9), Some(40), None)),
      VotePlan::AlreadyEstimated
    );
  }

  #[test]
  fn test_plan_skips_undefined_ratio() {
    assert_eq!(
      plan_vote_update(&post(Some(10), Some(0.5), None, None)),
      VotePlan::Skip(NullReason::DivideByZero)
    );
    assert_eq!(
      plan_vote_update(&post(None, Some(0.8), None, None)),
      VotePlan::Skip(NullReason::MissingInput)
    );
  }
}
