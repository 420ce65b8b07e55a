//! Read-only report handlers. Every response is a detached snapshot.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/promotions/{promotion}/results` | Chronological |
//! | `GET`  | `/promotions/{promotion}/lineages` | |
//! | `GET`  | `/promotions/{promotion}/titles/{title}/history` | Title matches for one title |
//! | `GET`  | `/promotions/{promotion}/reigns` | Optional `?title=<title>`; 404 for an unknown title |
//! | `GET`  | `/promotions/{promotion}/milestones` | Optional `?year=<yyyy>`, default current year |
//! | `GET`  | `/promotions/{promotion}/wrestlers/{name}/record` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{Datelike as _, Utc};
use ringside_core::{
  HistoryService, HistoryStore,
  lineage::TitleLineage,
  milestone::Milestone,
  record::WrestlerRecord,
  reign::TitleReignSummary,
  show::{MatchResult, same_name},
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, require_promotion};

/// `GET /promotions/{promotion}/results`
pub async fn results<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
) -> Result<Json<Vec<MatchResult>>, ApiError> {
  let promotion = require_promotion(&promotion)?;
  Ok(Json(service.match_results(promotion).await))
}

/// `GET /promotions/{promotion}/lineages`
pub async fn lineages<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
) -> Result<Json<Vec<TitleLineage>>, ApiError> {
  let promotion = require_promotion(&promotion)?;
  Ok(Json(service.lineages(promotion).await))
}

/// `GET /promotions/{promotion}/titles/{title}/history`
pub async fn title_history<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path((promotion, title)): Path<(String, String)>,
) -> Result<Json<Vec<MatchResult>>, ApiError> {
  let promotion = require_promotion(&promotion)?;
  Ok(Json(service.title_history(promotion, &title).await))
}

// ─── Reigns ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReignParams {
  pub title: Option<String>,
}

/// `GET /promotions/{promotion}/reigns[?title=<title>]`
pub async fn reigns<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
  Query(params): Query<ReignParams>,
) -> Result<Json<Vec<TitleReignSummary>>, ApiError> {
  let promotion = require_promotion(&promotion)?;
  let title = params.title.as_deref().map(str::trim).filter(|t| !t.is_empty());

  if let Some(title) = title {
    let known = service
      .lineages(promotion)
      .await
      .iter()
      .any(|l| same_name(&l.title_name, title));
    if !known {
      debug!(promotion, title, "no lineage for title");
      return Err(ApiError::NotFound(format!("no lineage for title {title:?}")));
    }
  }

  Ok(Json(service.reign_summaries(promotion, title).await))
}

// ─── Milestones ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MilestoneParams {
  pub year: Option<i32>,
}

/// `GET /promotions/{promotion}/milestones[?year=<yyyy>]`
pub async fn milestones<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
  Query(params): Query<MilestoneParams>,
) -> Result<Json<Vec<Milestone>>, ApiError> {
  let promotion = require_promotion(&promotion)?;
  let year = params.year.unwrap_or_else(|| Utc::now().year());
  Ok(Json(service.milestones(promotion, year).await))
}

// ─── Records ──────────────────────────────────────────────────────────────────

/// `GET /promotions/{promotion}/wrestlers/{name}/record`
pub async fn record<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path((promotion, name)): Path<(String, String)>,
) -> Result<Json<WrestlerRecord>, ApiError> {
  let promotion = require_promotion(&promotion)?;
  Ok(Json(service.wrestler_record(promotion, &name).await))
}
