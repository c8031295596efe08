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

//! Engine configuration

use crate::error::{Error, Result};
use crate::time::parse_timezone;
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;

/// Settings the metrics engine needs beyond the database itself
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Entity tracked but excluded from ranks and global aggregates
  pub capital_entity: String,

  /// Timezone for entities that have none recorded
  pub default_timezone: Tz,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let capital_entity =
      env::var("FM_CAPITAL_ENTITY").unwrap_or_else(|_| crate::DEFAULT_CAPITAL_ENTITY.to_string());
    if capital_entity.trim().is_empty() {
      return Err(Error::Config("FM_CAPITAL_ENTITY must not be empty".to_string()));
    }

    let tz_name =
      env::var("FM_DEFAULT_TIMEZONE").unwrap_or_else(|_| crate::DEFAULT_TIMEZONE.to_string());
    let default_timezone = parse_timezone(&tz_name)
      .map_err(|_| Error::Config(format!("Invalid FM_DEFAULT_TIMEZONE: {}", tz_name)))?;

    Ok(Config { capital_entity: capital_entity.trim().to_string(), default_timezone })
  }

  /// Whether `name` is the configured capital entity (case-insensitive)
  pub fn is_capital(&self, name: &str) -> bool {
    name.eq_ignore_ascii_case(&self.capital_entity)
  }
}

impl Default for Config {
  fn default() -> Self {
    Config {
      capital_entity: crate::DEFAULT_CAPITAL_ENTITY.to_string(),
      default_timezone: chrono_tz::America::New_York,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn test_is_capital_ignores_case() {
    let config = Config::default();
    assert!(config.is_capital("WashingtonDC"));
    assert!(config.is_capital("washingtondc"));
    assert!(!config.is_capital("maryland"));
  }

  #[test]
  #[serial]
  fn test_config_from_env_overrides() {
    env::set_var("FM_CAPITAL_ENTITY", "dc");
    env::set_var("FM_DEFAULT_TIMEZONE", "America/Chicago");
    let config = Config::from_env().unwrap();
    assert_eq!(config.capital_entity, "dc");
    assert_eq!(config.default_timezone, chrono_tz::America::Chicago);
    env::remove_var("FM_CAPITAL_ENTITY");
    env::remove_var("FM_DEFAULT_TIMEZONE");
  }

  #[test]
  #[serial]
  fn test_config_rejects_bad_timezone() {
    env::set_var("FM_DEFAULT_TIMEZONE", "Eastern Standard");
    let result = Config::from_env();
    env::remove_var("FM_DEFAULT_TIMEZONE");
    assert!(matches!(result, Err(Error::Config(_))));
  }
}
