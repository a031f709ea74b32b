//! wordhoard binary.
//!
//! Reads `wordhoard.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP.
//!
//! ```text
//! wordhoard                      # serve
//! wordhoard export --format csv --out words.csv
//! wordhoard export --format db --out backup.db
//! wordhoard stats
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wordhoard_core::stats;
use wordhoard_server::{ServerConfig, app, export_csv, export_db};

#[derive(Parser)]
#[command(author, version, about = "Wordhoard vocabulary server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "wordhoard.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API (the default).
  Serve,
  /// Write the live table or the whole database to a file.
  Export {
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
    #[arg(long)]
    out:    PathBuf,
  },
  /// Print addition statistics as JSON.
  Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
  Csv,
  Db,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;
  let store = cfg.open_store().await?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => {
      let address = cfg.address();
      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app(store)).await.context("server error")?;
    }
    Command::Export { format: ExportFormat::Csv, out } => {
      let rows = export_csv(&store, &out).await?;
      println!("{rows} words written to {}", out.display());
    }
    Command::Export { format: ExportFormat::Db, out } => {
      export_db(&store, &out).await?;
      println!("database copied to {}", out.display());
    }
    Command::Stats => {
      let summary = stats::summary(&store, Utc::now().date_naive())
        .await
        .context("failed to compute statistics")?;
      println!("{}", serde_json::to_string_pretty(&summary)?);
    }
  }

  Ok(())
}
