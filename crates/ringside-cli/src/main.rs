//! `ringside`: title history and milestone tracker for wrestling promotions.
//!
//! # Usage
//!
//! ```text
//! ringside serve
//! ringside promotions
//! ringside import apex-history.json
//! ringside import --shows --promotion Apex apex-shows.json
//! ringside export Apex -o apex-history.json
//! ringside lineages Apex
//! ringside reigns Apex --title "World Heavyweight"
//! ringside milestones Apex --year 2023 --json
//! ```

mod report;
mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, bail};
use chrono::{Datelike as _, Utc};
use clap::{Args, Parser, Subcommand};
use ringside_core::{
  HistoryService, PromotionHistory,
  log::MutationOutcome,
  show::Show,
  store::HistoryStore as _,
};
use ringside_store_sqlite::SqliteStore;
use serde::Serialize;
use settings::Settings;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

type Service = HistoryService<SqliteStore>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ringside", author, version, about = "Title history and milestone tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "ringside.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API.
  Serve,
  /// List every promotion with stored shows or history.
  Promotions,
  /// Load a saved history, or a list of shows with `--shows`.
  Import {
    file:      PathBuf,
    /// Treat `file` as a JSON array of shows and add each one.
    #[arg(long, requires = "promotion")]
    shows:     bool,
    /// Promotion the shows belong to.
    #[arg(long)]
    promotion: Option<String>,
  },
  /// Write a promotion's history in its persisted JSON shape.
  Export {
    promotion: String,
    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output:    Option<PathBuf>,
  },
  /// Every match result, chronologically.
  Results(ReportArgs),
  /// Every title's lineage.
  Lineages(ReportArgs),
  /// Reign lengths and defenses.
  Reigns {
    #[command(flatten)]
    args:   ReportArgs,
    /// Restrict to one title.
    #[arg(long)]
    title:  Option<String>,
  },
  /// Milestones reached during a year.
  Milestones {
    #[command(flatten)]
    args:   ReportArgs,
    /// Defaults to the current year.
    #[arg(long)]
    year:   Option<i32>,
  },
  /// A wrestler's win/loss/draw record.
  Record {
    #[command(flatten)]
    args:     ReportArgs,
    wrestler: String,
  },
}

#[derive(Args)]
struct ReportArgs {
  promotion: String,
  /// Print JSON instead of text.
  #[arg(long)]
  json:      bool,
}

impl ReportArgs {
  fn emit<T>(&self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()>
  where
    T: Serialize + ?Sized,
  {
    if self.json {
      println!("{}", serde_json::to_string_pretty(value)?);
    } else {
      print!("{}", text(value));
    }
    Ok(())
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let service = Arc::new(HistoryService::new(Arc::new(store)));

  match cli.command {
    Command::Serve => serve(service, &settings).await,
    Command::Promotions => {
      for name in service.store().promotions().await? {
        println!("{name}");
      }
      Ok(())
    }
    Command::Import {
      file,
      shows,
      promotion,
    } => import(&service, &file, shows, promotion.as_deref()).await,
    Command::Export { promotion, output } => export(&service, &promotion, output).await,
    Command::Results(args) => {
      let results = service.match_results(&args.promotion).await;
      args.emit(&results, |r| report::results(r))
    }
    Command::Lineages(args) => {
      let lineages = service.lineages(&args.promotion).await;
      args.emit(&lineages, |l| report::lineages(l))
    }
    Command::Reigns { args, title } => {
      let summaries = service
        .reign_summaries(&args.promotion, title.as_deref())
        .await;
      args.emit(&summaries, |s| report::reigns(s))
    }
    Command::Milestones { args, year } => {
      let year = year.unwrap_or_else(|| Utc::now().year());
      let milestones = service.milestones(&args.promotion, year).await;
      args.emit(&milestones, |m| report::milestones(m))
    }
    Command::Record { args, wrestler } => {
      let record = service.wrestler_record(&args.promotion, &wrestler).await;
      args.emit(&record, report::record)
    }
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn serve(service: Arc<Service>, settings: &Settings) -> anyhow::Result<()> {
  let app = axum::Router::new().nest("/api", ringside_api::api_router(service));
  let address = settings.address();

  info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

async fn import(
  service: &Service,
  file: &Path,
  shows: bool,
  promotion: Option<&str>,
) -> anyhow::Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("failed to read {}", file.display()))?;

  if !shows {
    let history = PromotionHistory::from_json(&raw)
      .with_context(|| format!("failed to parse history in {}", file.display()))?;
    service
      .store()
      .save_history(&history)
      .await
      .context("failed to save history")?;
    info!(
      promotion = history.promotion(),
      results = history.match_results().len(),
      "imported history"
    );
    return Ok(());
  }

  let Some(promotion) = promotion.map(str::trim).filter(|p| !p.is_empty()) else {
    bail!("--shows needs a non-blank --promotion");
  };
  let parsed: Vec<Show> = serde_json::from_str(&raw)
    .with_context(|| format!("failed to parse shows in {}", file.display()))?;

  let mut applied = 0;
  for show in &parsed {
    match service.add_show(promotion, show).await {
      MutationOutcome::Applied { .. } => applied += 1,
      MutationOutcome::Skipped { reason } => {
        warn!(promotion, show = %show.name, ?reason, "show skipped");
      }
    }
  }
  info!(promotion, applied, total = parsed.len(), "imported shows");
  Ok(())
}

async fn export(service: &Service, promotion: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
  let Some(history) = service.history(promotion).await else {
    bail!("promotion name is blank");
  };
  let json = history.to_json_pretty()?;
  match output {
    Some(path) => std::fs::write(&path, json)
      .with_context(|| format!("failed to write {}", path.display()))?,
    None => println!("{json}"),
  }
  Ok(())
}
