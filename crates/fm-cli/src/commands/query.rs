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
use chrono::NaiveDate;
use clap::Args;
use fm_core::time::parse_date;
use fm_core::{MetricName, Signal, Window};
use fm_database_postgres::models::{DispersionStats, EntityMetrics, GlobalMetrics};
use fm_database_postgres::{MetricsRepository, RepositoryError};
use serde::Serialize;
use std::collections::HashMap;

use crate::commands::connect;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct QueryCommand {
  /// Date to show (YYYY-MM-DD)
  #[arg(value_parser = parse_date)]
  date: NaiveDate,

  /// Only show this entity
  #[arg(short, long)]
  entity: Option<String>,

  /// Print JSON instead of a table
  #[arg(long)]
  json: bool,
}

#[derive(Debug, Serialize)]
struct NamedMetrics {
  entity: String,
  #[serde(flatten)]
  metrics: EntityMetrics,
}

#[derive(Debug, Serialize)]
struct QueryOutput {
  date: NaiveDate,
  global: Option<GlobalMetrics>,
  entities: Vec<NamedMetrics>,
  dispersion: Vec<DispersionStats>,
}

pub async fn execute(cmd: QueryCommand, config: Config) -> Result<()> {
  let context = connect(&config)?;
  let repo = context.metrics_repository();
  let date = cmd.date;
  let entity_filter = cmd.entity.clone();

  let output = tokio::task::spawn_blocking(move || -> Result<QueryOutput, RepositoryError> {
    let names: HashMap<i32, String> =
      repo.entities()?.into_iter().map(|entity| (entity.id, entity.name)).collect();
    let keep = |entity_id: i32| match &entity_filter {
      Some(wanted) => names.get(&entity_id).is_some_and(|name| name.eq_ignore_ascii_case(wanted)),
      None => true,
    };

    let entities = repo
      .entity_metrics_for_date(date)?
      .into_iter()
      .filter(|row| keep(row.entity_id))
      .map(|row| NamedMetrics {
        entity: names.get(&row.entity_id).cloned().unwrap_or_else(|| row.entity_id.to_string()),
        metrics: row,
      })
      .collect();

    let dispersion = repo
      .dispersion_for_date(date)?
      .into_iter()
      .filter(|row| match row.entity_id {
        Some(id) => keep(id),
        None => entity_filter.is_none(),
      })
      .collect();

    let global = if entity_filter.is_none() { repo.global_metrics_on(date)? } else { None };

    Ok(QueryOutput { date, global, entities, dispersion })
  })
  .await
  .context("Query task failed")?
  .with_context(|| format!("Failed to read metrics for {}", date))?;

  if cmd.json {
    println!("{}", serde_json::to_string_pretty(&output)?);
  } else {
    print_table(&output);
  }
  Ok(())
}

fn fmt_value(value: Option<f64>) -> String {
  value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn fmt_rank(rank: Option<i32>) -> String {
  rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_table(output: &QueryOutput) {
  println!("Metrics for {}", output.date);

  if output.entities.is_empty() {
    println!("No entity metrics stored for this date");
  } else {
    println!(
      "{:<20} {:>12} {:>8} {:>10} {:>10} {:>10} {:>10} {:>6}",
      "entity", "subs 7d", "posts 7d", "score 7d", "cmts 7d", "ups 7d", "subs WoW", "rank"
    );
    for named in &output.entities {
      let m = &named.metrics;
      println!(
        "{:<20} {:>12} {:>8} {:>10} {:>10} {:>10} {:>10} {:>6}",
        named.entity,
        fmt_value(m.average(MetricName::new(Signal::Subscribers, Window::SevenDay))),
        fmt_value(m.average(MetricName::new(Signal::Posts, Window::SevenDay))),
        fmt_value(m.average(MetricName::new(Signal::Score, Window::SevenDay))),
        fmt_value(m.average(MetricName::new(Signal::Comments, Window::SevenDay))),
        fmt_value(m.average(MetricName::new(Signal::Upvotes, Window::SevenDay))),
        fmt_value(m.wow_change(Signal::Subscribers)),
        fmt_rank(m.rank(Signal::Subscribers)),
      );
    }
  }

  if let Some(global) = &output.global {
    println!();
    println!("Global ({} entities)", global.entities_included);
    for metric in MetricName::ALL {
      println!("  {:<18} {:>12}", metric.to_string(), fmt_value(global.average(metric)));
    }
    for signal in Signal::ALL {
      println!("  {:<18} {:>12}", format!("{}_wow_change", signal.as_str()), fmt_value(global.wow_change(signal)));
    }
  }

  if !output.dispersion.is_empty() {
    println!();
    println!(
      "{:<8} {:<8} {:<18} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
      "scope", "entity", "metric", "median", "std_dev", "min", "max", "p25", "p75"
    );
    for row in &output.dispersion {
      println!(
        "{:<8} {:<8} {:<18} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        row.scope,
        row.entity_id.map(|id| id.to_string()).unwrap_or_default(),
        row.metric_name,
        fmt_value(row.median),
        fmt_value(row.std_dev),
        fmt_value(row.min_value),
        fmt_value(row.max_value),
        fmt_value(row.p25),
        fmt_value(row.p75),
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fmt_helpers() {
    assert_eq!(fmt_value(Some(130.0)), "130.00");
    assert_eq!(fmt_value(None), "-");
    assert_eq!(fmt_rank(Some(3)), "3");
    assert_eq!(fmt_rank(None), "-");
  }

  #[test]
  fn test_json_output_names_entities() {
    let date = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
    let mut metrics = EntityMetrics::empty(3, date);
    metrics.subscribers_7day_avg = Some(130.0);
    let output = QueryOutput {
      date,
      global: None,
      entities: vec![NamedMetrics { entity: "ohio".to_string(), metrics }],
      dispersion: Vec::new(),
    };

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["entities"][0]["entity"], "ohio");
    assert_eq!(json["entities"][0]["subscribers_7day_avg"], 130.0);
    assert_eq!(json["date"], "2025-12-10");
  }
}
