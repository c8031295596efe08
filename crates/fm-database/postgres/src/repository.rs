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

//! Database repository abstraction layer
//!
//! Provides the read and upsert operations the metrics engine needs behind the
//! [`MetricsRepository`] trait, plus a pooled [`DatabaseContext`] for the
//! maintenance commands that work with a connection directly.

use chrono::NaiveDate;
use diesel::pg::upsert::on_constraint;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use fm_core::DateWindow;
use log::error;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
  DispersionStats, EngagementValues, Entity, EntityMetrics, GlobalMetrics, SnapshotValues,
};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

const DEFAULT_POOL_SIZE: u32 = 2;
/// Connection timeout in seconds - pool will fail instead of retrying forever
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Name of the unique constraint on (date, scope, metric_name, entity_id)
const DISPERSION_NATURAL_KEY: &str = "dispersion_stats_natural_key";

/// Database repository errors
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
  #[error("Connection pool error: {0}")]
  PoolError(String),

  #[error("Database query error: {0}")]
  QueryError(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("Migration error: {0}")]
  MigrationError(String),
}

impl From<DieselError> for RepositoryError {
  fn from(err: DieselError) -> Self {
    match err {
      DieselError::NotFound => RepositoryError::NotFound("Record not found".to_string()),
      DieselError::DatabaseError(kind, info) => match kind {
        diesel::result::DatabaseErrorKind::UniqueViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        diesel::result::DatabaseErrorKind::ForeignKeyViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        diesel::result::DatabaseErrorKind::CheckViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        _ => RepositoryError::QueryError(info.message().to_string()),
      },
      _ => RepositoryError::QueryError(err.to_string()),
    }
  }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
  fn from(err: diesel::r2d2::PoolError) -> Self {
    RepositoryError::PoolError(err.to_string())
  }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Event-store reads and metric upserts used by the metrics engine.
///
/// All writes are upserts on the natural key, so repeating a run for the same
/// date replaces rather than duplicates.
pub trait MetricsRepository: Send + Sync {
  /// All tracked entities ordered by name
  fn entities(&self) -> RepositoryResult<Vec<Entity>>;

  /// Snapshot values whose covered date lies in `window`
  fn snapshot_values(
    &self,
    entity_id: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<SnapshotValues>>;

  /// Engagement values of posts with collected engagement whose local
  /// creation date lies in `window`
  fn engagement_values(
    &self,
    entity_id: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<EngagementValues>>;

  /// The metrics row stored for exactly (entity, date)
  fn entity_metrics_on(
    &self,
    entity_id: i32,
    date: NaiveDate,
  ) -> RepositoryResult<Option<EntityMetrics>>;

  /// Stored metrics rows for an entity with dates in `window`, oldest first
  fn entity_metrics_in(
    &self,
    entity_id: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<EntityMetrics>>;

  /// Every entity's metrics row for `date`
  fn entity_metrics_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<EntityMetrics>>;

  fn global_metrics_on(&self, date: NaiveDate) -> RepositoryResult<Option<GlobalMetrics>>;

  /// Every dispersion row for `date`
  fn dispersion_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<DispersionStats>>;

  fn upsert_entity_metrics(&self, row: &EntityMetrics) -> RepositoryResult<()>;

  fn upsert_global_metrics(&self, row: &GlobalMetrics) -> RepositoryResult<()>;

  fn upsert_dispersion(&self, row: &DispersionStats) -> RepositoryResult<()>;
}

/// Database context that provides access to repositories and connection pool
#[derive(Clone)]
pub struct DatabaseContext {
  pool: Arc<DbPool>,
}

impl DatabaseContext {
  /// Create a new database context with a small connection pool
  ///
  /// Fails fast if the database is unavailable by testing the connection at startup.
  pub fn new(database_url: &str) -> RepositoryResult<Self> {
    Self::with_pool_config(database_url, DEFAULT_POOL_SIZE)
  }

  /// Create with custom pool size
  ///
  /// Fails fast if the database is unavailable by testing the connection at startup.
  /// This prevents the r2d2 pool from spawning background threads that retry forever.
  pub fn with_pool_config(database_url: &str, max_size: u32) -> RepositoryResult<Self> {
    // Test connection BEFORE creating the pool to fail fast without background retry noise
    PgConnection::establish(database_url).map_err(|e| {
      RepositoryError::PoolError(format!("Failed to connect to database: {}", e))
    })?;

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
      .max_size(max_size.max(1))
      .min_idle(Some(1))
      .connection_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
      .build(manager)
      .map_err(|e| RepositoryError::PoolError(e.to_string()))?;

    Ok(Self { pool: Arc::new(pool) })
  }

  /// Get a connection from the pool
  pub fn get_connection(&self) -> RepositoryResult<DbConnection> {
    self.pool.get().map_err(|e| RepositoryError::PoolError(e.to_string()))
  }

  /// Execute a blocking database operation asynchronously
  pub async fn run<F, R, E>(&self, f: F) -> Result<R, E>
  where
    F: FnOnce(&mut DbConnection) -> Result<R, E> + Send + 'static,
    R: Send + 'static,
    E: From<RepositoryError> + Send + 'static,
  {
    let pool = Arc::clone(&self.pool);
    tokio::task::spawn_blocking(move || {
      let mut conn = pool.get().map_err(|e| E::from(RepositoryError::PoolError(e.to_string())))?;
      f(&mut conn)
    })
    .await
    .map_err(|e| E::from(RepositoryError::QueryError(format!("Task join error: {}", e))))?
  }

  /// Create a metrics repository instance
  pub fn metrics_repository(&self) -> PgMetricsRepository {
    PgMetricsRepository { pool: Arc::clone(&self.pool) }
  }
}

/// Postgres implementation of [`MetricsRepository`]
#[derive(Clone)]
pub struct PgMetricsRepository {
  pool: Arc<DbPool>,
}

impl PgMetricsRepository {
  fn conn(&self) -> RepositoryResult<DbConnection> {
    self.pool.get().map_err(|e| {
      error!("Failed to check out a connection: {}", e);
      RepositoryError::PoolError(e.to_string())
    })
  }
}

impl MetricsRepository for PgMetricsRepository {
  fn entities(&self) -> RepositoryResult<Vec<Entity>> {
    let mut conn = self.conn()?;
    Ok(Entity::all_by_name(&mut conn)?)
  }

  fn snapshot_values(
    &self,
    for_entity: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<SnapshotValues>> {
    use crate::schema::daily_snapshots::dsl::*;

    let mut conn = self.conn()?;
    let rows = daily_snapshots
      .filter(entity_id.eq(for_entity))
      .filter(snapshot_date.ge(window.start))
      .filter(snapshot_date.le(window.end))
      .order(snapshot_date.asc())
      .select(SnapshotValues::as_select())
      .load(&mut conn)?;
    Ok(rows)
  }

  fn engagement_values(
    &self,
    for_entity: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<EngagementValues>> {
    use crate::schema::posts::dsl::*;

    let mut conn = self.conn()?;
    let rows = posts
      .filter(entity_id.eq(for_entity))
      .filter(engagement_collected.eq(true))
      .filter(created_local.ge(window.start))
      .filter(created_local.le(window.end))
      .order((created_local.asc(), id.asc()))
      .select(EngagementValues::as_select())
      .load(&mut conn)?;
    Ok(rows)
  }

  fn entity_metrics_on(
    &self,
    for_entity: i32,
    on: NaiveDate,
  ) -> RepositoryResult<Option<EntityMetrics>> {
    use crate::schema::entity_metrics::dsl::*;

    let mut conn = self.conn()?;
    let row = entity_metrics
      .filter(entity_id.eq(for_entity))
      .filter(date.eq(on))
      .select(EntityMetrics::as_select())
      .first(&mut conn)
      .optional()?;
    Ok(row)
  }

  fn entity_metrics_in(
    &self,
    for_entity: i32,
    window: DateWindow,
  ) -> RepositoryResult<Vec<EntityMetrics>> {
    use crate::schema::entity_metrics::dsl::*;

    let mut conn = self.conn()?;
    let rows = entity_metrics
      .filter(entity_id.eq(for_entity))
      .filter(date.ge(window.start))
      .filter(date.le(window.end))
      .order(date.asc())
      .select(EntityMetrics::as_select())
      .load(&mut conn)?;
    Ok(rows)
  }

  fn entity_metrics_for_date(&self, on: NaiveDate) -> RepositoryResult<Vec<EntityMetrics>> {
    use crate::schema::entity_metrics::dsl::*;

    let mut conn = self.conn()?;
    let rows = entity_metrics
      .filter(date.eq(on))
      .order(entity_id.asc())
      .select(EntityMetrics::as_select())
      .load(&mut conn)?;
    Ok(rows)
  }

  fn global_metrics_on(&self, on: NaiveDate) -> RepositoryResult<Option<GlobalMetrics>> {
    use crate::schema::global_metrics::dsl::*;

    let mut conn = self.conn()?;
    let row = global_metrics
      .filter(date.eq(on))
      .select(GlobalMetrics::as_select())
      .first(&mut conn)
      .optional()?;
    Ok(row)
  }

  fn dispersion_for_date(&self, on: NaiveDate) -> RepositoryResult<Vec<DispersionStats>> {
    use crate::schema::dispersion_stats::dsl::*;

    let mut conn = self.conn()?;
    let rows = dispersion_stats
      .filter(date.eq(on))
      .order((scope.desc(), entity_id.asc(), metric_name.asc()))
      .select(DispersionStats::as_select())
      .load(&mut conn)?;
    Ok(rows)
  }

  fn upsert_entity_metrics(&self, row: &EntityMetrics) -> RepositoryResult<()> {
    use crate::schema::entity_metrics;

    let mut conn = self.conn()?;
    diesel::insert_into(entity_metrics::table)
      .values(row)
      .on_conflict((entity_metrics::entity_id, entity_metrics::date))
      .do_update()
      .set((row, entity_metrics::computed_at.eq(diesel::dsl::now)))
      .execute(&mut conn)?;
    Ok(())
  }

  fn upsert_global_metrics(&self, row: &GlobalMetrics) -> RepositoryResult<()> {
    use crate::schema::global_metrics;

    let mut conn = self.conn()?;
    diesel::insert_into(global_metrics::table)
      .values(row)
      .on_conflict(global_metrics::date)
      .do_update()
      .set((row, global_metrics::computed_at.eq(diesel::dsl::now)))
      .execute(&mut conn)?;
    Ok(())
  }

  fn upsert_dispersion(&self, row: &DispersionStats) -> RepositoryResult<()> {
    use crate::schema::dispersion_stats;

    let mut conn = self.conn()?;
    diesel::insert_into(dispersion_stats::table)
      .values(row)
      .on_conflict(on_constraint(DISPERSION_NATURAL_KEY))
      .do_update()
      .set((row, dispersion_stats::computed_at.eq(diesel::dsl::now)))
      .execute(&mut conn)?;
    Ok(())
  }
}
