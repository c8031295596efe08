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

//! # fm-core
//!
//! Shared vocabulary for the forum metrics workspace: the tracked signals and
//! rolling windows, metric names, dispersion scopes, the explicit nullable
//! result type, configuration, timezone helpers and the vote estimation used
//! by the collection jobs.

pub mod computed;
pub mod config;
pub mod error;
pub mod time;
pub mod types;
pub mod votes;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use computed::{Computed, NullReason};
pub use config::Config;
pub use error::{Error, Result};
pub use types::{DateWindow, DispersionScope, MetricName, Signal, Window};
pub use votes::{VoteEstimate, estimate_votes};

/// Entity excluded from rankings and global aggregates unless configured otherwise
pub const DEFAULT_CAPITAL_ENTITY: &str = "washingtondc";

/// Timezone applied to entities that do not carry one
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Engagement (score, ratio, comments) is collected this many days after a post is created
pub const ENGAGEMENT_LAG_DAYS: i64 = 3;

/// Distance, in days, of the record used as the week-over-week baseline
pub const WOW_LOOKBACK_DAYS: i64 = 7;

/// Longest backfill accepted, in days before today
pub const MAX_BACKFILL_DAYS: u32 = 3650;
