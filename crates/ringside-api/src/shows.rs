//! Handlers for `/promotions/{promotion}/shows`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/promotions/{promotion}/shows` | Stored show records |
//! | `POST`   | `/promotions/{promotion}/shows` | Body: a show. `201` when applied |
//! | `PUT`    | `/promotions/{promotion}/shows` | Body: `{"show":{..},"previous":{"name":..,"date":..}}` |
//! | `DELETE` | `/promotions/{promotion}/shows` | `?name=<show>&date=<date>` |
//!
//! Mutations always answer with the outcome; a skipped mutation is not an
//! error.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use ringside_core::{
  HistoryService, HistoryStore,
  log::MutationOutcome,
  show::{Show, ShowIdentity},
};
use serde::Deserialize;

use crate::error::{ApiError, require_promotion};

fn respond(outcome: MutationOutcome, applied: StatusCode) -> impl IntoResponse {
  let status = if outcome.is_applied() {
    applied
  } else {
    StatusCode::OK
  };
  (status, Json(outcome))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /promotions/{promotion}/shows`
pub async fn list<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
) -> Result<Json<Vec<Show>>, ApiError> {
  let promotion = require_promotion(&promotion)?;
  Ok(Json(service.shows(promotion).await))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /promotions/{promotion}/shows`
pub async fn create<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
  Json(show): Json<Show>,
) -> Result<impl IntoResponse, ApiError> {
  let promotion = require_promotion(&promotion)?;
  let outcome = service.add_show(promotion, &show).await;
  Ok(respond(outcome, StatusCode::CREATED))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub show:     Show,
  /// The show's identity before this edit, when it was renamed or re-dated.
  #[serde(default)]
  pub previous: Option<ShowIdentity>,
}

/// `PUT /promotions/{promotion}/shows`
pub async fn update<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let promotion = require_promotion(&promotion)?;
  let outcome = service
    .edit_show(promotion, &body.show, body.previous.as_ref())
    .await;
  Ok(respond(outcome, StatusCode::OK))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
  pub name: Option<String>,
  pub date: Option<String>,
}

/// `DELETE /promotions/{promotion}/shows?name=<show>&date=<date>`
pub async fn remove<S: HistoryStore>(
  State(service): State<Arc<HistoryService<S>>>,
  Path(promotion): Path<String>,
  Query(query): Query<RemoveQuery>,
) -> Result<impl IntoResponse, ApiError> {
  let promotion = require_promotion(&promotion)?;
  let Some(name) = query.name else {
    return Err(ApiError::BadRequest("missing query parameter `name`".into()));
  };
  let identity = ShowIdentity::new(name, query.date.unwrap_or_default());
  let outcome = service.delete_show(promotion, &identity).await;
  Ok(respond(outcome, StatusCode::OK))
}
