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

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod commands;
use commands::{
  maintenance::MaintenanceCommand, metrics::MetricsCommand, query::QueryCommand,
};

mod config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "fm")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Calculate rolling metrics, ranks and dispersion for a date or a range of dates
  Metrics(MetricsCommand),

  /// Print the stored metrics of a date
  Query(QueryCommand),

  /// Estimate up/down votes for posts that have score and ratio
  Votes,

  /// Fill post totals on snapshots from the posts of the covered day
  SnapshotTotals,

  /// Report posts whose stored local date disagrees with their UTC timestamp
  AuditDates {
    /// Only check posts of this entity
    #[arg(short, long)]
    entity: Option<String>,
  },

  /// Apply pending database migrations
  Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
  // Load environment variables
  dotenv().ok();

  // Parse CLI arguments
  let cli = Cli::parse();

  // Initialize logging
  let log_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt().with_env_filter(log_level).init();

  // Load configuration
  let config = config::Config::from_env()?;

  // Execute command
  match cli.command {
    Commands::Metrics(cmd) => commands::metrics::execute(cmd, config).await?,
    Commands::Query(cmd) => commands::query::execute(cmd, config).await?,
    Commands::Votes => commands::maintenance::execute(MaintenanceCommand::Votes, config).await?,
    Commands::SnapshotTotals => {
      commands::maintenance::execute(MaintenanceCommand::SnapshotTotals, config).await?
    }
    Commands::AuditDates { entity } => {
      commands::maintenance::execute(MaintenanceCommand::AuditDates { entity }, config).await?
    }
    Commands::Migrate => commands::migrate::execute(config).await?,
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_metrics_forms() {
    let cli = Cli::try_parse_from(["fm", "metrics"]).unwrap();
    assert!(matches!(cli.command, Commands::Metrics(_)));

    assert!(Cli::try_parse_from(["fm", "metrics", "2025-12-10"]).is_ok());
    assert!(Cli::try_parse_from(["fm", "metrics", "--backfill", "30"]).is_ok());
  }

  #[test]
  fn test_rejects_bad_arguments() {
    assert!(Cli::try_parse_from(["fm", "metrics", "12/10/2025"]).is_err());
    assert!(Cli::try_parse_from(["fm", "metrics", "--backfill", "-3"]).is_err());
    assert!(Cli::try_parse_from(["fm", "metrics", "--backfill", "soon"]).is_err());
    assert!(Cli::try_parse_from(["fm", "metrics", "--backfill", "200000000"]).is_err());
    assert!(Cli::try_parse_from(["fm", "metrics", "2025-12-10", "--backfill", "3"]).is_err());
  }

  #[test]
  fn test_parse_audit_dates_entity() {
    let cli = Cli::try_parse_from(["fm", "audit-dates", "--entity", "california"]).unwrap();
    match cli.command {
      Commands::AuditDates { entity } => assert_eq!(entity.as_deref(), Some("california")),
      other => panic!("unexpected command {:?}", other),
    }
  }
}
