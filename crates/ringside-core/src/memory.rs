//! In-process [`HistoryStore`] backed by hash maps.
//!
//! Useful for tests and for embedding the engine without a database. Cloning
//! is cheap; clones share the same state.

use std::{collections::HashMap, convert::Infallible, sync::Arc};

use tokio::sync::Mutex;

use crate::{
  history::PromotionHistory,
  show::{Show, ShowIdentity},
  store::HistoryStore,
};

#[derive(Debug, Default)]
struct Inner {
  histories: HashMap<String, PromotionHistory>,
  shows:     HashMap<String, Vec<Show>>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Seed a promotion's show records, as if its editor had saved them
  /// before any history existed.
  pub async fn with_shows(self, promotion: &str, shows: Vec<Show>) -> Self {
    self
      .inner
      .lock()
      .await
      .shows
      .insert(promotion.to_owned(), shows);
    self
  }

  /// Whether a history has been saved for `promotion`.
  pub async fn has_history(&self, promotion: &str) -> bool {
    self.inner.lock().await.histories.contains_key(promotion)
  }
}

impl HistoryStore for MemoryStore {
  type Error = Infallible;

  async fn load_history(&self, promotion: &str) -> Result<Option<PromotionHistory>, Infallible> {
    Ok(self.inner.lock().await.histories.get(promotion).cloned())
  }

  async fn save_history(&self, history: &PromotionHistory) -> Result<(), Infallible> {
    self
      .inner
      .lock()
      .await
      .histories
      .insert(history.promotion().to_owned(), history.clone());
    Ok(())
  }

  async fn list_shows(&self, promotion: &str) -> Result<Vec<Show>, Infallible> {
    Ok(
      self
        .inner
        .lock()
        .await
        .shows
        .get(promotion)
        .cloned()
        .unwrap_or_default(),
    )
  }

  async fn save_show(
    &self,
    promotion: &str,
    show: &Show,
    previous: Option<&ShowIdentity>,
  ) -> Result<(), Infallible> {
    let identity = show.identity();
    let mut inner = self.inner.lock().await;
    let shows = inner.shows.entry(promotion.to_owned()).or_default();
    shows.retain(|s| {
      !identity.matches(&s.name, &s.date)
        && !previous.is_some_and(|p| p.matches(&s.name, &s.date))
    });
    shows.push(show.clone());
    Ok(())
  }

  async fn delete_show(
    &self,
    promotion: &str,
    identity: &ShowIdentity,
  ) -> Result<usize, Infallible> {
    let mut inner = self.inner.lock().await;
    let Some(shows) = inner.shows.get_mut(promotion) else {
      return Ok(0);
    };
    let before = shows.len();
    shows.retain(|s| !identity.matches(&s.name, &s.date));
    Ok(before - shows.len())
  }
}
