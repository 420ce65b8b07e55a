//! [`HistoryService`]: the per-promotion history cache and the surface the
//! UI and API talk to.
//!
//! Each promotion's history is loaded (or rebuilt from its shows) the first
//! time anything touches it and then kept for the life of the service. Every
//! load, mutate and persist sequence for one promotion, including the write of
//! the matching show record, runs under that promotion's lock, so a lineage
//! rebuild never sees a half-applied edit.
//!
//! Storage failures never reach the caller: they are logged here and the
//! service carries on with whatever it has in memory. A history that could
//! not be loaded is served from shows but never saved over the stored log;
//! the load is retried on the next access.

use std::{collections::HashMap, sync::Arc};

use chrono::{NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::{
  history::PromotionHistory,
  lineage::{self, TitleLineage},
  log::{MutationOutcome, SkipReason},
  milestone::{self, Milestone},
  record::{self, WrestlerRecord},
  reign::{self, TitleReignSummary},
  show::{MatchResult, Show, ShowIdentity, same_name},
  store::HistoryStore,
};

/// A promotion's cached history.
struct Cached {
  history: PromotionHistory,
  /// False when the stored log could not be read and `history` was rebuilt
  /// from shows instead. Nothing is persisted over the stored log until a
  /// later load succeeds.
  loaded:  bool,
}

type Guard = OwnedMutexGuard<Option<Cached>>;
type Slot = Arc<Mutex<Option<Cached>>>;

pub struct HistoryService<S> {
  store: Arc<S>,
  slots: Mutex<HashMap<String, Slot>>,
  today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate { Utc::now().date_naive() }

fn skipped_promotion() -> MutationOutcome {
  MutationOutcome::Skipped {
    reason: SkipReason::MissingPromotion,
  }
}

impl<S: HistoryStore> HistoryService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      slots: Mutex::new(HashMap::new()),
      today: utc_today,
    }
  }

  /// Override the clock used as the as-of date when a log has no dated
  /// results.
  pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
    self.today = today;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Loading ───────────────────────────────────────────────────────────

  /// Lock `promotion`'s slot, loading its history first if this is the
  /// first access or every earlier load failed.
  ///
  /// The returned guard always holds a history.
  async fn acquire(&self, promotion: &str) -> Guard {
    let slot = {
      let mut slots = self.slots.lock().await;
      slots.entry(promotion.to_owned()).or_default().clone()
    };
    let mut guard = slot.lock_owned().await;
    if guard.as_ref().is_some_and(|c| c.loaded) {
      return guard;
    }

    match self.load(promotion).await {
      Some(history) => {
        if guard.is_some() {
          warn!(promotion, "stored history readable again; dropping unsaved in-memory changes");
        }
        *guard = Some(Cached { history, loaded: true });
      }
      None if guard.is_none() => {
        let history = PromotionHistory::from_shows(promotion, &self.shows(promotion).await);
        *guard = Some(Cached { history, loaded: false });
      }
      None => {}
    }
    guard
  }

  /// The stored history, or one rebuilt from shows when none was ever
  /// saved. `None` when the store could not be read.
  async fn load(&self, promotion: &str) -> Option<PromotionHistory> {
    match self.store.load_history(promotion).await {
      Ok(Some(stored)) => {
        debug!(promotion, results = stored.match_results().len(), "loaded history");
        Some(PromotionHistory::from_parts(promotion, stored.match_results().to_vec()))
      }
      Ok(None) => {
        let history = PromotionHistory::from_shows(promotion, &self.shows(promotion).await);
        info!(
          promotion,
          results = history.match_results().len(),
          "no stored history; rebuilt from shows"
        );
        self.persist(&history).await;
        Some(history)
      }
      Err(e) => {
        warn!(promotion, error = %e, "failed to load history; serving shows until it loads");
        None
      }
    }
  }

  /// The promotion's stored show records. A storage failure is logged and
  /// reads as no shows.
  pub async fn shows(&self, promotion: &str) -> Vec<Show> {
    let promotion = promotion.trim();
    self
      .store
      .list_shows(promotion)
      .await
      .unwrap_or_else(|e| {
        warn!(promotion, error = %e, "failed to list shows");
        Vec::new()
      })
  }

  async fn persist(&self, history: &PromotionHistory) {
    if let Err(e) = self.store.save_history(history).await {
      warn!(
        promotion = history.promotion(),
        error = %e,
        "failed to persist history; keeping in-memory state"
      );
    }
  }

  /// Make sure `promotion`'s history is in the cache. Once a load succeeds
  /// it is never repeated for the life of the service.
  pub async fn ensure_loaded(&self, promotion: &str) {
    let promotion = promotion.trim();
    if !promotion.is_empty() {
      drop(self.acquire(promotion).await);
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Apply `apply` to the cached history and persist it when it changed.
  ///
  /// When the mutation applied, the promotion's lock is handed back so the
  /// caller can write the matching show record before anyone else edits.
  async fn mutate<F>(&self, promotion: &str, apply: F) -> (MutationOutcome, Option<Guard>)
  where
    F: FnOnce(&mut PromotionHistory) -> MutationOutcome + Send,
  {
    if promotion.is_empty() {
      debug!("skipping mutation without a promotion");
      return (skipped_promotion(), None);
    }

    let mut guard = self.acquire(promotion).await;
    let Some(cached) = guard.as_mut() else {
      return (skipped_promotion(), None);
    };
    let outcome = apply(&mut cached.history);
    match outcome {
      MutationOutcome::Applied { removed, appended } if cached.loaded => {
        info!(promotion, removed, appended, "history updated");
        self.persist(&cached.history).await;
      }
      MutationOutcome::Applied { removed, appended } => {
        warn!(
          promotion,
          removed, appended, "stored history unreadable; change kept in memory only"
        );
      }
      MutationOutcome::Skipped { reason } => {
        debug!(promotion, ?reason, "mutation skipped");
        return (outcome, None);
      }
    }
    (outcome, Some(guard))
  }

  /// Record a newly saved show.
  pub async fn add_show(&self, promotion: &str, show: &Show) -> MutationOutcome {
    let promotion = promotion.trim();
    let (outcome, lock) = self.mutate(promotion, |h| h.add_show(show)).await;
    if let Some(_lock) = lock {
      self.save_show_record(promotion, show, None).await;
    }
    outcome
  }

  /// Replace a show's results. `previous` is the identity the show had
  /// before this edit, when it was renamed or re-dated.
  pub async fn edit_show(
    &self,
    promotion: &str,
    show: &Show,
    previous: Option<&ShowIdentity>,
  ) -> MutationOutcome {
    let promotion = promotion.trim();
    let (outcome, lock) = self.mutate(promotion, |h| h.edit_show(show, previous)).await;
    if let Some(_lock) = lock {
      self.save_show_record(promotion, show, previous).await;
    }
    outcome
  }

  /// Remove every result of a deleted show.
  pub async fn delete_show(&self, promotion: &str, identity: &ShowIdentity) -> MutationOutcome {
    let promotion = promotion.trim();
    let (outcome, lock) = self.mutate(promotion, |h| h.delete_show(identity)).await;
    if let Some(_lock) = lock
      && let Err(e) = self.store.delete_show(promotion, identity).await
    {
      warn!(promotion, show = %identity.name, error = %e, "failed to delete show record");
    }
    outcome
  }

  async fn save_show_record(&self, promotion: &str, show: &Show, previous: Option<&ShowIdentity>) {
    if let Err(e) = self.store.save_show(promotion, show, previous).await {
      warn!(promotion, show = %show.name, error = %e, "failed to save show record");
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Run `read` against the loaded history. Blank promotions yield `None`.
  async fn read<R, F>(&self, promotion: &str, read: F) -> Option<R>
  where
    F: FnOnce(&PromotionHistory) -> R + Send,
  {
    let promotion = promotion.trim();
    if promotion.is_empty() {
      return None;
    }
    let guard = self.acquire(promotion).await;
    guard.as_ref().map(|c| read(&c.history))
  }

  /// A detached copy of the whole history record.
  pub async fn history(&self, promotion: &str) -> Option<PromotionHistory> {
    self.read(promotion, PromotionHistory::clone).await
  }

  /// Every match result, chronologically.
  pub async fn match_results(&self, promotion: &str) -> Vec<MatchResult> {
    self
      .read(promotion, PromotionHistory::sorted_results)
      .await
      .unwrap_or_default()
  }

  pub async fn lineages(&self, promotion: &str) -> Vec<TitleLineage> {
    self
      .read(promotion, |h| h.lineages().to_vec())
      .await
      .unwrap_or_default()
  }

  /// Title matches contested for `title`, chronologically.
  pub async fn title_history(&self, promotion: &str, title: &str) -> Vec<MatchResult> {
    self
      .read(promotion, |h| {
        h.sorted_results()
          .into_iter()
          .filter(|r| r.is_title_match && same_name(&r.title_involved, title))
          .collect()
      })
      .await
      .unwrap_or_default()
  }

  /// Reign summaries for one title, or every title when `title` is `None`.
  pub async fn reign_summaries(
    &self,
    promotion: &str,
    title: Option<&str>,
  ) -> Vec<TitleReignSummary> {
    let today = (self.today)();
    self
      .read(promotion, |h| match title {
        Some(t) => lineage::find(h.lineages(), t)
          .map(|l| reign::summarize(l, h.match_results(), today))
          .unwrap_or_default(),
        None => reign::summarize_all(h.lineages(), h.match_results(), today),
      })
      .await
      .unwrap_or_default()
  }

  /// Milestones that fall in `year`. Advisory: any failure yields an empty
  /// list.
  ///
  /// Show records are read under the promotion's lock so attendance always
  /// matches the log it is paired with.
  pub async fn milestones(&self, promotion: &str, year: i32) -> Vec<Milestone> {
    let promotion = promotion.trim();
    if promotion.is_empty() {
      return Vec::new();
    }
    let guard = self.acquire(promotion).await;
    let shows = match self.store.list_shows(promotion).await {
      Ok(shows) => shows,
      Err(e) => {
        warn!(promotion, year, error = %e, "milestone computation failed");
        return Vec::new();
      }
    };
    guard
      .as_ref()
      .map(|c| {
        milestone::detect(c.history.match_results(), c.history.lineages(), &shows, year)
      })
      .unwrap_or_default()
  }

  pub async fn wrestler_record(&self, promotion: &str, wrestler: &str) -> WrestlerRecord {
    self
      .read(promotion, |h| record::wrestler_record(h.match_results(), wrestler))
      .await
      .unwrap_or_else(|| WrestlerRecord {
        wrestler: wrestler.trim().to_owned(),
        ..WrestlerRecord::default()
      })
  }
}
