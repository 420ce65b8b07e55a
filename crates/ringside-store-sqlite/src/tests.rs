//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use ringside_core::{
  HistoryService,
  history::PromotionHistory,
  log::MutationOutcome,
  show::{Match, Show, ShowIdentity},
  store::HistoryStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn title_bout(a: &str, b: &str, winner: &str) -> Match {
  Match {
    name:           "Main Event".into(),
    participant1:   a.into(),
    participant2:   b.into(),
    winner:         winner.into(),
    is_title_match: true,
    title_involved: "World".into(),
  }
}

fn show(name: &str, date: &str, matches: Vec<Match>) -> Show {
  Show {
    name: name.into(),
    date: date.into(),
    attendance: Some(1200),
    matches,
  }
}

// ─── Histories ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_history_returns_none() {
  let s = store().await;
  assert!(s.load_history("Apex").await.unwrap().is_none());
}

#[tokio::test]
async fn empty_history_is_still_saved() {
  let s = store().await;
  s.save_history(&PromotionHistory::new("Apex")).await.unwrap();

  let loaded = s.load_history("Apex").await.unwrap().unwrap();
  assert_eq!(loaded.promotion(), "Apex");
  assert!(loaded.match_results().is_empty());
}

#[tokio::test]
async fn save_and_load_history() {
  let s = store().await;
  let history = PromotionHistory::from_shows("Apex", &[
    show("Night 1", "01/05/2022", vec![title_bout("Ace", "Blaze", "Ace")]),
    show("Night 2", "2022-02-01", vec![title_bout("Ace", "Blaze", "Blaze")]),
  ]);
  s.save_history(&history).await.unwrap();

  let loaded = s.load_history("Apex").await.unwrap().unwrap();
  assert_eq!(loaded, history);
  assert_eq!(loaded.match_results()[0].date, "2022-01-05");
  assert_eq!(loaded.lineages()[0].reigns.len(), 2);
}

#[tokio::test]
async fn save_history_replaces_previous_rows() {
  let s = store().await;
  let mut history = PromotionHistory::from_shows("Apex", &[
    show("Night 1", "2022-01-01", vec![title_bout("Ace", "Blaze", "Ace")]),
    show("Night 2", "2022-02-01", vec![title_bout("Ace", "Blaze", "Blaze")]),
  ]);
  s.save_history(&history).await.unwrap();

  history.delete_show(&ShowIdentity::new("Night 2", "2022-02-01"));
  s.save_history(&history).await.unwrap();

  let loaded = s.load_history("Apex").await.unwrap().unwrap();
  assert_eq!(loaded.match_results().len(), 1);
  assert_eq!(loaded.lineages()[0].reigns.len(), 1);
}

#[tokio::test]
async fn histories_are_scoped_per_promotion() {
  let s = store().await;
  s.save_history(&PromotionHistory::from_shows("Apex", &[show(
    "Night 1",
    "2022-01-01",
    vec![title_bout("Ace", "Blaze", "Ace")],
  )]))
  .await
  .unwrap();
  s.save_history(&PromotionHistory::new("Summit")).await.unwrap();

  let summit = s.load_history("Summit").await.unwrap().unwrap();
  assert!(summit.match_results().is_empty());
  assert_eq!(s.promotions().await.unwrap(), ["Apex", "Summit"]);
}

// ─── Shows ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_list_shows() {
  let s = store().await;
  let night = show("Night 1", "2022-01-01", vec![title_bout("Ace", "Blaze", "Ace")]);
  s.save_show("Apex", &night, None).await.unwrap();

  let shows = s.list_shows("Apex").await.unwrap();
  assert_eq!(shows, [night]);
  assert!(s.list_shows("Summit").await.unwrap().is_empty());
}

#[tokio::test]
async fn save_show_replaces_same_identity_and_previous() {
  let s = store().await;
  s.save_show("Apex", &show("Night 1", "2022-01-01", vec![]), None)
    .await
    .unwrap();
  s.save_show("Apex", &show("NIGHT 1", "01/01/2022", vec![]), None)
    .await
    .unwrap();
  assert_eq!(s.list_shows("Apex").await.unwrap().len(), 1);

  s.save_show(
    "Apex",
    &show("Night One", "2022-01-02", vec![]),
    Some(&ShowIdentity::new("night 1", "2022-01-01")),
  )
  .await
  .unwrap();
  let shows = s.list_shows("Apex").await.unwrap();
  assert_eq!(shows.len(), 1);
  assert_eq!(shows[0].name, "Night One");
}

#[tokio::test]
async fn delete_show_matches_by_name_when_date_blank() {
  let s = store().await;
  s.save_show("Apex", &show("Night 1", "2021-01-01", vec![]), None)
    .await
    .unwrap();
  s.save_show("Apex", &show("Night 1", "2022-01-01", vec![]), None)
    .await
    .unwrap();
  s.save_show("Apex", &show("Night 2", "2022-01-08", vec![]), None)
    .await
    .unwrap();
  assert_eq!(s.list_shows("Apex").await.unwrap().len(), 3);

  let removed = s
    .delete_show("Apex", &ShowIdentity::new("Night 1", ""))
    .await
    .unwrap();
  assert_eq!(removed, 2);
  assert_eq!(
    s.delete_show("Apex", &ShowIdentity::new("Night 9", "")).await.unwrap(),
    0
  );
}

// ─── Through the service ─────────────────────────────────────────────────────

#[tokio::test]
async fn service_state_survives_a_restart() {
  let s = store().await;
  {
    let svc = HistoryService::new(Arc::new(s.clone()));
    let outcome = svc
      .add_show("Apex", &show("Night 1", "2022-01-01", vec![title_bout("Ace", "Blaze", "Ace")]))
      .await;
    assert!(matches!(outcome, MutationOutcome::Applied { appended: 1, .. }));
  }

  let svc = HistoryService::new(Arc::new(s));
  let lineages = svc.lineages("Apex").await;
  assert_eq!(lineages[0].reigns[0].champion, "Ace");
  assert_eq!(svc.milestones("Apex", 2022).await.len(), 2);
}

#[tokio::test]
async fn missing_history_is_rebuilt_from_stored_shows() {
  let s = store().await;
  s.save_show(
    "Apex",
    &show("Night 1", "2022-01-01", vec![title_bout("Ace", "Blaze", "Ace")]),
    None,
  )
  .await
  .unwrap();
  assert!(s.load_history("Apex").await.unwrap().is_none());

  let svc = HistoryService::new(Arc::new(s.clone()));
  assert_eq!(svc.match_results("Apex").await.len(), 1);

  let persisted = s.load_history("Apex").await.unwrap().unwrap();
  assert_eq!(persisted.match_results().len(), 1);
}
