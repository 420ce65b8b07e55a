//! JSON REST API for Ringside.
//!
//! Exposes an axum [`Router`] over a [`HistoryService`] backed by any
//! [`HistoryStore`]. Auth, TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ringside_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod reports;
pub mod shows;

use std::sync::Arc;

use axum::{Router, routing::get};
use ringside_core::{HistoryService, HistoryStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<HistoryService<S>>) -> Router<()>
where
  S: HistoryStore + 'static,
{
  Router::new()
    // Shows
    .route(
      "/promotions/{promotion}/shows",
      get(shows::list::<S>)
        .post(shows::create::<S>)
        .put(shows::update::<S>)
        .delete(shows::remove::<S>),
    )
    // Reports
    .route("/promotions/{promotion}/results", get(reports::results::<S>))
    .route("/promotions/{promotion}/lineages", get(reports::lineages::<S>))
    .route(
      "/promotions/{promotion}/titles/{title}/history",
      get(reports::title_history::<S>),
    )
    .route("/promotions/{promotion}/reigns", get(reports::reigns::<S>))
    .route("/promotions/{promotion}/milestones", get(reports::milestones::<S>))
    .route(
      "/promotions/{promotion}/wrestlers/{name}/record",
      get(reports::record::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(service)
}
