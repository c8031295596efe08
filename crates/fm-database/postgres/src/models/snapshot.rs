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

//! Daily per-entity snapshots.
//!
//! A snapshot is taken the morning after the day it describes; `snapshot_date`
//! stores that covered day.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::entity::Entity;
use crate::schema::{daily_snapshots, entities};

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = daily_snapshots)]
#[diesel(belongs_to(Entity))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DailySnapshot {
  pub id: i32,
  pub entity_id: i32,
  pub snapshot_date: NaiveDate,
  pub subscribers_count: Option<i32>,
  pub posts_count: Option<i32>,
  pub total_comments: Option<i32>,
  pub total_estimated_upvotes: Option<i32>,
  pub total_estimated_downvotes: Option<i32>,
  pub date_created: DateTime<Utc>,
  pub date_updated: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = daily_snapshots)]
pub struct NewDailySnapshot {
  pub entity_id: i32,
  pub snapshot_date: NaiveDate,
  pub subscribers_count: Option<i32>,
  pub posts_count: Option<i32>,
}

/// The two snapshot fields the rolling aggregator reads
#[derive(Queryable, Selectable, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = daily_snapshots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SnapshotValues {
  pub snapshot_date: NaiveDate,
  pub subscribers_count: Option<i32>,
  pub posts_count: Option<i32>,
}

/// Post-derived totals written back onto a snapshot
#[derive(AsChangeset, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[diesel(table_name = daily_snapshots)]
pub struct SnapshotTotals {
  pub posts_count: i32,
  pub total_comments: i32,
  pub total_estimated_upvotes: i32,
  pub total_estimated_downvotes: i32,
}

impl NewDailySnapshot {
  /// Insert or replace the counts for (entity, covered day)
  pub fn upsert(&self, conn: &mut PgConnection) -> QueryResult<DailySnapshot> {
    use diesel::upsert::excluded;

    diesel::insert_into(daily_snapshots::table)
      .values(self)
      .on_conflict((daily_snapshots::entity_id, daily_snapshots::snapshot_date))
      .do_update()
      .set((
        daily_snapshots::subscribers_count.eq(excluded(daily_snapshots::subscribers_count)),
        daily_snapshots::posts_count.eq(excluded(daily_snapshots::posts_count)),
        daily_snapshots::date_updated.eq(diesel::dsl::now),
      ))
      .returning(DailySnapshot::as_returning())
      .get_result(conn)
  }
}

impl DailySnapshot {
  /// Snapshots whose post-derived totals are missing or zero, oldest first
  pub fn needing_totals(conn: &mut PgConnection) -> QueryResult<Vec<(DailySnapshot, Entity)>> {
    daily_snapshots::table
      .inner_join(entities::table)
      .filter(
        daily_snapshots::total_estimated_upvotes
          .is_null()
          .or(daily_snapshots::total_estimated_upvotes.eq(0))
          .or(daily_snapshots::posts_count.is_null())
          .or(daily_snapshots::posts_count.eq(0))
          .or(daily_snapshots::total_comments.is_null())
          .or(daily_snapshots::total_comments.eq(0)),
      )
      .order((daily_snapshots::snapshot_date.asc(), entities::name.asc()))
      .select((DailySnapshot::as_select(), Entity::as_select()))
      .load(conn)
  }

  pub fn update_totals(
    conn: &mut PgConnection,
    snapshot_id: i32,
    totals: &SnapshotTotals,
  ) -> QueryResult<usize> {
    diesel::update(daily_snapshots::table.find(snapshot_id))
      .set((totals, daily_snapshots::date_updated.eq(diesel::dsl::now)))
      .execute(conn)
  }
}
