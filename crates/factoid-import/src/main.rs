//! `factoid-import`: bulk-load facts from a CSV file into a running server.
//!
//! # Usage
//!
//! ```text
//! factoid-import --csv facts.csv --auth "$SECRET"
//! factoid-import --addr http://facts.internal:8080/v1 --csv facts.csv
//! ```
//!
//! Each header-less `content,source` row is posted as one fact. Bad rows and
//! rejected requests are logged and skipped.

mod client;
mod records;

use std::{fs::File, path::PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{client::ImportClient, records::Record};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "factoid-import", about = "Import facts from a CSV file")]
struct Args {
  /// Base URL of the Factoid REST API.
  #[arg(long, env = "FACTOID_ADDR", default_value = "http://localhost:8080/v1")]
  addr: String,

  /// Path to a header-less `content,source` CSV file.
  #[arg(long, value_name = "FILE")]
  csv: PathBuf,

  /// Authorization secret sent with every request.
  #[arg(long, env = "FACTOID_AUTH", default_value = "", hide_env_values = true)]
  auth: String,
}

// ─── Import ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
  imported: usize,
  failed:   usize,
}

/// Post every parsed record in order, continuing past failures.
async fn import(client: &ImportClient, records: Vec<Result<Record>>) -> Summary {
  let mut summary = Summary::default();

  for record in records {
    let outcome = match record {
      Ok(record) => client.create(&record).await,
      Err(e) => Err(e),
    };
    match outcome {
      Ok(body) => {
        tracing::info!(response = body.trim_end(), "imported");
        summary.imported += 1;
      }
      Err(e) => {
        tracing::warn!(error = %format!("{e:#}"), "skipped");
        summary.failed += 1;
      }
    }
  }
  summary
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file = File::open(&args.csv).with_context(|| format!("failed to open {:?}", args.csv))?;
  let records = records::read_records(file);
  if records.is_empty() {
    bail!("nothing to import");
  }

  let client = ImportClient::new(&args.addr, args.auth)?;
  let summary = import(&client, records).await;

  tracing::info!(imported = summary.imported, failed = summary.failed, "import finished");
  Ok(())
}
