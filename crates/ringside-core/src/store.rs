//! The `HistoryStore` trait, the persistence collaborator.
//!
//! The trait is implemented by storage backends (e.g. `ringside-store-sqlite`,
//! or [`MemoryStore`](crate::memory::MemoryStore)). The
//! [`HistoryService`](crate::service::HistoryService) depends on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  history::PromotionHistory,
  show::{Show, ShowIdentity},
};

/// Abstraction over where promotion histories and show records live.
///
/// Histories are written whole: `save_history` replaces whatever was stored
/// for that promotion. Show records belong to the promotion's own editor; the
/// engine reads them to rebuild a missing history and to find attendance
/// records.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Histories ─────────────────────────────────────────────────────────

  /// Load the stored history for `promotion`. Returns `None` if none has
  /// been saved yet.
  fn load_history<'a>(
    &'a self,
    promotion: &'a str,
  ) -> impl Future<Output = Result<Option<PromotionHistory>, Self::Error>> + Send + 'a;

  /// Replace the stored history for `history.promotion()`.
  fn save_history<'a>(
    &'a self,
    history: &'a PromotionHistory,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Shows ─────────────────────────────────────────────────────────────

  /// Every show recorded for `promotion`, in no particular order.
  fn list_shows<'a>(
    &'a self,
    promotion: &'a str,
  ) -> impl Future<Output = Result<Vec<Show>, Self::Error>> + Send + 'a;

  /// Insert or replace a show. Any stored show matching the show's identity
  /// or `previous` is replaced.
  fn save_show<'a>(
    &'a self,
    promotion: &'a str,
    show: &'a Show,
    previous: Option<&'a ShowIdentity>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete every stored show matching `identity`. Returns how many were
  /// removed.
  fn delete_show<'a>(
    &'a self,
    promotion: &'a str,
    identity: &'a ShowIdentity,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;
}
