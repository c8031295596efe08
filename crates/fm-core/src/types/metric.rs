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

//! Signals, metric names and dispersion scopes

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;
use crate::types::window::Window;

/// Where a signal's raw values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalSource {
  /// Daily snapshot rows, windowed by covered date
  Snapshot,
  /// Engagement-mature posts, windowed by local creation date
  Post,
}

/// One of the five tracked engagement signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Signal {
  Subscribers,
  Posts,
  Score,
  Comments,
  Upvotes,
}

impl Signal {
  pub const ALL: [Signal; 5] =
    [Signal::Subscribers, Signal::Posts, Signal::Score, Signal::Comments, Signal::Upvotes];

  pub fn as_str(&self) -> &'static str {
    match self {
      Signal::Subscribers => "subscribers",
      Signal::Posts => "posts",
      Signal::Score => "score",
      Signal::Comments => "comments",
      Signal::Upvotes => "upvotes",
    }
  }

  pub fn source(&self) -> SignalSource {
    match self {
      Signal::Subscribers | Signal::Posts => SignalSource::Snapshot,
      Signal::Score | Signal::Comments | Signal::Upvotes => SignalSource::Post,
    }
  }
}

impl std::fmt::Display for Signal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A (signal, window) pair, e.g. `score_30day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricName {
  pub signal: Signal,
  pub window: Window,
}

impl MetricName {
  /// All ten metrics in storage order
  pub const ALL: [MetricName; 10] = [
    MetricName::new(Signal::Subscribers, Window::SevenDay),
    MetricName::new(Signal::Subscribers, Window::ThirtyDay),
    MetricName::new(Signal::Posts, Window::SevenDay),
    MetricName::new(Signal::Posts, Window::ThirtyDay),
    MetricName::new(Signal::Score, Window::SevenDay),
    MetricName::new(Signal::Score, Window::ThirtyDay),
    MetricName::new(Signal::Comments, Window::SevenDay),
    MetricName::new(Signal::Comments, Window::ThirtyDay),
    MetricName::new(Signal::Upvotes, Window::SevenDay),
    MetricName::new(Signal::Upvotes, Window::ThirtyDay),
  ];

  pub const fn new(signal: Signal, window: Window) -> Self {
    Self { signal, window }
  }
}

impl std::fmt::Display for MetricName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}_{}", self.signal.as_str(), self.window.suffix())
  }
}

impl FromStr for MetricName {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    MetricName::ALL
      .into_iter()
      .find(|m| m.to_string() == s)
      .ok_or_else(|| Error::UnknownMetric(s.to_string()))
  }
}

/// Population a dispersion row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispersionScope {
  /// One day's per-entity averages across all ranked entities
  Global,
  /// One entity's own daily averages across its trailing week
  Entity,
}

impl DispersionScope {
  pub fn as_str(&self) -> &'static str {
    match self {
      DispersionScope::Global => "global",
      DispersionScope::Entity => "entity",
    }
  }
}

impl std::fmt::Display for DispersionScope {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for DispersionScope {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "global" => Ok(DispersionScope::Global),
      "entity" => Ok(DispersionScope::Entity),
      other => Err(Error::Config(format!("Unknown dispersion scope: {}", other))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_metric_names() {
    let names: Vec<String> = MetricName::ALL.iter().map(|m| m.to_string()).collect();
    assert_eq!(
      names,
      vec![
        "subscribers_7day",
        "subscribers_30day",
        "posts_7day",
        "posts_30day",
        "score_7day",
        "score_30day",
        "comments_7day",
        "comments_30day",
        "upvotes_7day",
        "upvotes_30day",
      ]
    );
  }

  #[test]
  fn test_metric_name_parse() {
    let m: MetricName = "comments_30day".parse().unwrap();
    assert_eq!(m, MetricName::new(Signal::Comments, Window::ThirtyDay));
    assert!(matches!("comments_14day".parse::<MetricName>(), Err(Error::UnknownMetric(_))));
  }

  #[test]
  fn test_signal_sources() {
    assert_eq!(Signal::Subscribers.source(), SignalSource::Snapshot);
    assert_eq!(Signal::Posts.source(), SignalSource::Snapshot);
    assert_eq!(Signal::Upvotes.source(), SignalSource::Post);
  }

  #[test]
  fn test_scope_round_trip() {
    assert_eq!("entity".parse::<DispersionScope>().unwrap(), DispersionScope::Entity);
    assert_eq!(DispersionScope::Global.to_string(), "global");
    assert!("subreddit".parse::<DispersionScope>().is_err());
  }
}
