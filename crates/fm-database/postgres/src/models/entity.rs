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

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::entities;

/// A tracked community
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = entities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Entity {
  pub id: i32,
  pub name: String,
  pub uri: Option<String>,
  pub description: Option<String>,
  pub population: Option<i64>,
  pub population_density: Option<f64>,
  pub region: Option<String>,
  pub timezone: Option<String>,
  pub date_created: DateTime<Utc>,
  pub date_updated: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = entities)]
pub struct NewEntity<'a> {
  pub name: &'a str,
  pub uri: Option<&'a str>,
  pub population: Option<i64>,
  pub population_density: Option<f64>,
  pub region: Option<&'a str>,
  pub timezone: Option<&'a str>,
}

impl<'a> NewEntity<'a> {
  pub fn named(name: &'a str) -> Self {
    Self { name, uri: None, population: None, population_density: None, region: None, timezone: None }
  }

  /// Insert, or return the existing row with the same name
  pub fn find_or_create(self, conn: &mut PgConnection) -> QueryResult<Entity> {
    match Entity::find_by_name(conn, self.name)? {
      Some(entity) => Ok(entity),
      None => diesel::insert_into(entities::table)
        .values(&self)
        .returning(Entity::as_returning())
        .get_result(conn),
    }
  }
}

impl Entity {
  /// All entities ordered by name
  pub fn all_by_name(conn: &mut PgConnection) -> QueryResult<Vec<Self>> {
    entities::table.select(Entity::as_select()).order(entities::name.asc()).load(conn)
  }

  pub fn find_by_name(conn: &mut PgConnection, entity_name: &str) -> QueryResult<Option<Self>> {
    entities::table
      .filter(entities::name.eq(entity_name))
      .select(Entity::as_select())
      .first(conn)
      .optional()
  }
}
