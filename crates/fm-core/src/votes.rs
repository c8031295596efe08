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

//! Reconstruction of up/down vote counts from a post's score and upvote ratio.
//!
//! The platform only exposes `score = up - down` and `ratio = up / (up + down)`.
//! Solving for the total gives `total = score / (2 * ratio - 1)`, which is
//! undefined at a ratio of exactly one half.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::computed::{Computed, NullReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEstimate {
  pub upvotes: i32,
  pub downvotes: i32,
}

/// Estimate up/down votes; null when either input is missing or the ratio is 0.5
pub fn estimate_votes(score: Option<i32>, upvote_ratio: Option<f64>) -> Computed<VoteEstimate> {
  let (Some(score), Some(ratio)) = (score, upvote_ratio) else {
    return Computed::Null(NullReason::MissingInput);
  };

  let denominator = 2.0 * ratio - 1.0;
  if denominator == 0.0 {
    warn!("Cannot estimate votes for score {} with upvote ratio {}", score, ratio);
    return Computed::Null(NullReason::DivideByZero);
  }

  let total_votes = f64::from(score) / denominator;
  if !total_votes.is_finite() {
    warn!("Vote estimate not finite - score: {}, ratio: {}", score, ratio);
    return Computed::Null(NullReason::DivideByZero);
  }

  // Half-way cases round to even, matching the collection jobs
  let (Some(upvotes), Some(downvotes)) =
    (to_vote_count(total_votes * ratio), to_vote_count(total_votes * (1.0 - ratio)))
  else {
    warn!("Vote estimate out of range - score: {}, ratio: {}", score, ratio);
    return Computed::Null(NullReason::DivideByZero);
  };

  Computed::Value(VoteEstimate { upvotes, downvotes })
}

fn to_vote_count(votes: f64) -> Option<i32> {
  let rounded = votes.round_ties_even();
  (rounded >= f64::from(i32::MIN) && rounded <= f64::from(i32::MAX)).then_some(rounded as i32)
}
