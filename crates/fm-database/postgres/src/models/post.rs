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

use chrono::{DateTime, NaiveDate, Utc};
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::entity::Entity;
use crate::schema::{entities, posts};

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = posts)]
#[diesel(belongs_to(Entity))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
  pub id: i32,
  pub reddit_id: String,
  pub entity_id: i32,
  pub title: String,
  pub created_utc: DateTime<Utc>,
  pub created_local: NaiveDate,
  pub score: Option<i32>,
  pub upvote_ratio: Option<f64>,
  pub num_comments: Option<i32>,
  pub estimated_upvotes: Option<i32>,
  pub estimated_downvotes: Option<i32>,
  pub engagement_collected: bool,
  pub is_removed: bool,
  pub date_created: DateTime<Utc>,
  pub date_updated: DateTime<Utc>,
}

/// A newly observed post. `created_local` must be the local date of
/// `created_utc` in the entity's timezone (see `fm_core::time::local_date`).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
  pub reddit_id: &'a str,
  pub entity_id: i32,
  pub title: &'a str,
  pub created_utc: DateTime<Utc>,
  pub created_local: NaiveDate,
}

/// Engagement fields collected three days after creation
#[derive(AsChangeset, Debug, Clone, Copy, PartialEq)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
pub struct PostEngagement {
  pub score: Option<i32>,
  pub upvote_ratio: Option<f64>,
  pub num_comments: Option<i32>,
  pub estimated_upvotes: Option<i32>,
  pub estimated_downvotes: Option<i32>,
  pub engagement_collected: bool,
  pub is_removed: bool,
}

/// The post fields the rolling aggregator reads
#[derive(Queryable, Selectable, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EngagementValues {
  pub created_local: NaiveDate,
  pub score: Option<i32>,
  pub num_comments: Option<i32>,
  pub estimated_upvotes: Option<i32>,
}

/// Aggregates over the posts of one local day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostDayTotals {
  pub post_count: i64,
  pub total_comments: Option<i64>,
  pub total_upvotes: Option<i64>,
  pub total_downvotes: Option<i64>,
}

/// Stored local date alongside what is needed to recompute it
#[derive(Queryable, Debug, Clone, PartialEq)]
pub struct PostLocalDate {
  pub id: i32,
  pub reddit_id: String,
  pub entity_name: String,
  pub timezone: Option<String>,
  pub created_utc: DateTime<Utc>,
  pub created_local: NaiveDate,
}

impl NewPost<'_> {
  /// Insert unless a post with the same `reddit_id` already exists
  pub fn insert_if_new(&self, conn: &mut PgConnection) -> QueryResult<usize> {
    diesel::insert_into(posts::table).values(self).on_conflict(posts::reddit_id).do_nothing().execute(conn)
  }
}

impl Post {
  /// Record the engagement fields for a post
  pub fn record_engagement(
    conn: &mut PgConnection,
    post_reddit_id: &str,
    engagement: &PostEngagement,
  ) -> QueryResult<usize> {
    diesel::update(posts::table.filter(posts::reddit_id.eq(post_reddit_id)))
      .set((engagement, posts::date_updated.eq(diesel::dsl::now)))
      .execute(conn)
  }

  /// Posts with score and ratio from which votes can be estimated (ratio 0.5 excluded)
  pub fn with_vote_inputs(conn: &mut PgConnection) -> QueryResult<Vec<Post>> {
    posts::table
      .filter(posts::score.is_not_null())
      .filter(posts::upvote_ratio.is_not_null())
      .filter(posts::upvote_ratio.ne(0.5))
      .order(posts::id.asc())
      .select(Post::as_select())
      .load(conn)
  }

  pub fn set_vote_estimates(
    conn: &mut PgConnection,
    post_id: i32,
    upvotes: i32,
    downvotes: i32,
  ) -> QueryResult<usize> {
    diesel::update(posts::table.find(post_id))
      .set((
        posts::estimated_upvotes.eq(Some(upvotes)),
        posts::estimated_downvotes.eq(Some(downvotes)),
        posts::date_updated.eq(diesel::dsl::now),
      ))
      .execute(conn)
  }

  /// Count and sums over posts with `created_utc` in `[start, end)`
  pub fn day_totals(
    conn: &mut PgConnection,
    for_entity: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> QueryResult<PostDayTotals> {
    let (post_count, total_comments, total_upvotes, total_downvotes): (
      i64,
      Option<i64>,
      Option<i64>,
      Option<i64>,
    ) = posts::table
      .filter(posts::entity_id.eq(for_entity))
      .filter(posts::created_utc.ge(start))
      .filter(posts::created_utc.lt(end))
      .select((
        count_star(),
        sum(posts::num_comments),
        sum(posts::estimated_upvotes),
        sum(posts::estimated_downvotes),
      ))
      .first(conn)?;

    Ok(PostDayTotals { post_count, total_comments, total_upvotes, total_downvotes })
  }

  /// Stored local dates, optionally for a single entity
  pub fn local_dates(
    conn: &mut PgConnection,
    entity_name: Option<&str>,
  ) -> QueryResult<Vec<PostLocalDate>> {
    let mut query = posts::table
      .inner_join(entities::table)
      .select((
        posts::id,
        posts::reddit_id,
        entities::name,
        entities::timezone,
        posts::created_utc,
        posts::created_local,
      ))
      .order(posts::id.asc())
      .into_boxed();

    if let Some(name) = entity_name {
      query = query.filter(entities::name.eq(name));
    }

    query.load::<PostLocalDate>(conn)
  }
}
