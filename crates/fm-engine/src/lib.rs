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

//! # fm-engine
//!
//! Daily metric computation for tracked forum communities.
//!
//! For one calculation date the engine computes, per entity:
//! - 7-day and 30-day rolling averages of subscribers, posts, score, comments and upvotes
//! - week-over-week percent changes of the 7-day averages
//! - ranks of each 7-day average across entities
//!
//! and then the cross-entity global means and dispersion statistics. The
//! `maintenance` module carries the data-repair jobs that keep its inputs complete.

pub mod aggregator;
pub mod dispersion;
pub mod engine;
pub mod error;
pub mod maintenance;
pub mod progress;
pub mod rank;
pub mod report;
pub mod wow;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use aggregator::{RollingAverages, mean, rolling_averages};
pub use dispersion::{Dispersion, dispersion};
pub use engine::{EngineConfig, MetricsEngine, backfill_dates};
pub use error::{EngineError, EngineResult};
pub use rank::assign_ranks;
pub use report::{BackfillReport, RunReport, Stage, StageFailure};
pub use wow::wow_change;
