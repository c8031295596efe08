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
use fm_core::Config as CoreConfig;
use std::env;

const DEFAULT_POOL_SIZE: u32 = 2;

#[derive(Debug, Clone)]
pub struct Config {
  pub core: CoreConfig,
  pub database_url: String,
  pub pool_size: u32,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let database_url =
      env::var("DATABASE_URL").context("DATABASE_URL environment variable not set")?;

    let pool_size = match env::var("FM_POOL_SIZE") {
      Ok(raw) => parse_pool_size(&raw)?,
      Err(_) => DEFAULT_POOL_SIZE,
    };

    let core = CoreConfig::from_env().context("Invalid engine configuration")?;

    Ok(Self { core, database_url, pool_size })
  }
}

fn parse_pool_size(raw: &str) -> fm_core::Result<u32> {
  match raw.trim().parse::<u32>() {
    Ok(size) if size > 0 => Ok(size),
    _ => Err(fm_core::Error::Config(format!("FM_POOL_SIZE must be a positive integer, got {:?}", raw))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_pool_size() {
    assert_eq!(parse_pool_size("4").unwrap(), 4);
    assert_eq!(parse_pool_size(" 2 ").unwrap(), 2);
    assert!(parse_pool_size("0").is_err());
    assert!(parse_pool_size("many").is_err());
  }
}
