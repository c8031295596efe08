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

//! In-memory repository for engine tests

use chrono::{NaiveDate, Utc};
use fm_core::{DateWindow, DispersionScope, MetricName};
use fm_database_postgres::models::{
  DispersionStats, EngagementValues, Entity, EntityMetrics, GlobalMetrics, SnapshotValues,
};
use fm_database_postgres::{MetricsRepository, RepositoryError, RepositoryResult};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

type DispersionKey = (NaiveDate, String, Option<i32>, String);

/// Stored outputs in key order, for before/after comparisons
pub type StoredOutputs = (Vec<EntityMetrics>, Vec<GlobalMetrics>, Vec<DispersionStats>);

#[derive(Default)]
struct State {
  entities: Vec<Entity>,
  snapshots: Vec<(i32, SnapshotValues)>,
  posts: Vec<(i32, EngagementValues)>,
  entity_metrics: BTreeMap<(i32, NaiveDate), EntityMetrics>,
  global_metrics: BTreeMap<NaiveDate, GlobalMetrics>,
  dispersion: BTreeMap<DispersionKey, DispersionStats>,
  failing_entities: HashSet<i32>,
}

/// A [`MetricsRepository`] backed by maps, with upsert-by-key semantics
#[derive(Default)]
pub struct MemoryRepository {
  state: Mutex<State>,
}

impl MemoryRepository {
  pub fn new() -> Self {
    Self::default()
  }

  fn state(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Add an entity and return its id
  pub fn add_entity(&self, name: &str) -> i32 {
    let mut state = self.state();
    let id = state.entities.len() as i32 + 1;
    let now = Utc::now();
    state.entities.push(Entity {
      id,
      name: name.to_string(),
      uri: None,
      description: None,
      population: None,
      population_density: None,
      region: None,
      timezone: None,
      date_created: now,
      date_updated: now,
    });
    id
  }

  pub fn add_snapshot(
    &self,
    entity_id: i32,
    snapshot_date: NaiveDate,
    subscribers_count: Option<i32>,
    posts_count: Option<i32>,
  ) {
    self
      .state()
      .snapshots
      .push((entity_id, SnapshotValues { snapshot_date, subscribers_count, posts_count }));
  }

  /// Add a post whose engagement has been collected
  pub fn add_post(
    &self,
    entity_id: i32,
    created_local: NaiveDate,
    score: Option<i32>,
    num_comments: Option<i32>,
    estimated_upvotes: Option<i32>,
  ) {
    self.state().posts.push((
      entity_id,
      EngagementValues { created_local, score, num_comments, estimated_upvotes },
    ));
  }

  /// Make every read for `entity_id` fail
  pub fn fail_reads_for(&self, entity_id: i32) {
    self.state().failing_entities.insert(entity_id);
  }

  pub fn stored_entity_metrics(&self, entity_id: i32, date: NaiveDate) -> Option<EntityMetrics> {
    self.state().entity_metrics.get(&(entity_id, date)).cloned()
  }

  pub fn stored_global_metrics(&self, date: NaiveDate) -> Option<GlobalMetrics> {
    self.state().global_metrics.get(&date).cloned()
  }

  pub fn stored_dispersion(
    &self,
    date: NaiveDate,
    scope: DispersionScope,
    entity_id: Option<i32>,
    metric: MetricName,
  ) -> Option<DispersionStats> {
    let key = (date, scope.as_str().to_string(), entity_id, metric.to_string());
    self.state().dispersion.get(&key).cloned()
  }

  pub fn snapshot_of_outputs(&self) -> StoredOutputs {
    let state = self.state();
    (
      state.entity_metrics.values().cloned().collect(),
      state.global_metrics.values().cloned().collect(),
      state.dispersion.values().cloned().collect(),
    )
  }

  fn check_readable(state: &State, entity_id: i32) -> RepositoryResult<()> {
    if state.failing_entities.contains(&entity_id) {
      Err(RepositoryError::QueryError(format!("reads disabled for entity {}", entity_id)))
    } else {
      Ok(())
    }
  }
}

impl MetricsRepository for MemoryRepository {
  fn entities(&self) -> RepositoryResult<Vec<Entity>> {
    let mut entities = self.state().entities.clone();
    entities.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entities)
  }

  fn snapshot_values(
    &self,
    entity_id: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<SnapshotValues>> {
    let state = self.state();
    Self::check_readable(&state, entity_id)?;
    Ok(
      state
        .snapshots
        .iter()
        .filter(|(id, row)| *id == entity_id && window.contains(row.snapshot_date))
        .map(|(_, row)| *row)
        .collect(),
    )
  }

  fn engagement_values(
    &self,
    entity_id: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<EngagementValues>> {
    let state = self.state();
    Self::check_readable(&state, entity_id)?;
    Ok(
      state
        .posts
        .iter()
        .filter(|(id, row)| *id == entity_id && window.contains(row.created_local))
        .map(|(_, row)| *row)
        .collect(),
    )
  }

  fn entity_metrics_on(
    &self,
    entity_id: i32,
    date: NaiveDate,
  ) -> RepositoryResult<Option<EntityMetrics>> {
    let state = self.state();
    Self::check_readable(&state, entity_id)?;
    Ok(state.entity_metrics.get(&(entity_id, date)).cloned())
  }

  fn entity_metrics_in(
    &self,
    entity_id: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<EntityMetrics>> {
    let state = self.state();
    Self::check_readable(&state, entity_id)?;
    Ok(
      state
        .entity_metrics
        .range((entity_id, window.start)..=(entity_id, window.end))
        .map(|(_, row)| row.clone())
        .collect(),
    )
  }

  fn entity_metrics_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<EntityMetrics>> {
    Ok(self.state().entity_metrics.values().filter(|row| row.date == date).cloned().collect())
  }

  fn global_metrics_on(&self, date: NaiveDate) -> RepositoryResult<Option<GlobalMetrics>> {
    Ok(self.state().global_metrics.get(&date).cloned())
  }

  fn dispersion_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<DispersionStats>> {
    Ok(self.state().dispersion.values().filter(|row| row.date == date).cloned().collect())
  }

  fn upsert_entity_metrics(&self, row: &EntityMetrics) -> RepositoryResult<()> {
    self.state().entity_metrics.insert((row.entity_id, row.date), row.clone());
    Ok(())
  }

  fn upsert_global_metrics(&self, row: &GlobalMetrics) -> RepositoryResult<()> {
    self.state().global_metrics.insert(row.date, row.clone());
    Ok(())
  }

  fn upsert_dispersion(&self, row: &DispersionStats) -> RepositoryResult<()> {
    let key = (row.date, row.scope.clone(), row.entity_id, row.metric_name.clone());
    self.state().dispersion.insert(key, row.clone());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
  }

  #[test]
  fn test_window_filtering() {
    let repo = MemoryRepository::new();
    let id = repo.add_entity("ohio");
    repo.add_snapshot(id, day(1), Some(1), None);
    repo.add_snapshot(id, day(9), Some(9), None);

    let rows = repo.snapshot_values(id, DateWindow::new(day(2), day(9))).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subscribers_count, Some(9));
  }

  #[test]
  fn test_upsert_replaces() {
    let repo = MemoryRepository::new();
    let mut row = EntityMetrics::empty(1, day(3));
    repo.upsert_entity_metrics(&row).unwrap();
    row.posts_7day_avg = Some(4.0);
    repo.upsert_entity_metrics(&row).unwrap();

    assert_eq!(repo.entity_metrics_for_date(day(3)).unwrap(), vec![row]);
  }

  #[test]
  fn test_failing_entity_reads() {
    let repo = MemoryRepository::new();
    let id = repo.add_entity("iowa");
    repo.fail_reads_for(id);
    assert!(repo.entity_metrics_on(id, day(1)).is_err());
  }
}
