//! [`SqliteStore`]: the SQLite implementation of [`HistoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use ringside_core::{
  history::PromotionHistory,
  show::{Show, ShowIdentity},
  store::HistoryStore,
};

use crate::{
  Error, Result,
  encode::{RawMatchResult, RawShow, encode_dt, encode_matches},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Promotion histories and show records in a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Every promotion with a saved history or at least one show, sorted.
  pub async fn promotions(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT promotion FROM histories
           UNION
           SELECT DISTINCT promotion FROM shows
           ORDER BY 1",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }

  /// Name, date and row id of every stored show for `promotion`.
  fn show_keys(
    conn: &rusqlite::Connection,
    promotion: &str,
  ) -> rusqlite::Result<Vec<(i64, String, String)>> {
    let mut stmt = conn.prepare("SELECT show_id, name, date FROM shows WHERE promotion = ?1")?;
    stmt
      .query_map(rusqlite::params![promotion], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
      })?
      .collect()
  }

  fn delete_shows(conn: &rusqlite::Connection, ids: &[i64]) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare("DELETE FROM shows WHERE show_id = ?1")?;
    let mut removed = 0;
    for id in ids {
      removed += stmt.execute(rusqlite::params![id])?;
    }
    Ok(removed)
  }
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for SqliteStore {
  type Error = Error;

  // ── Histories ─────────────────────────────────────────────────────────────

  async fn load_history(&self, promotion: &str) -> Result<Option<PromotionHistory>> {
    let key = promotion.to_owned();

    let raws: Option<Vec<RawMatchResult>> = self
      .conn
      .call(move |conn| {
        let saved = conn
          .query_row(
            "SELECT 1 FROM histories WHERE promotion = ?1",
            rusqlite::params![key],
            |_| Ok(()),
          )
          .optional()?;
        if saved.is_none() {
          return Ok(None);
        }

        let mut stmt = conn.prepare(
          "SELECT show_name, date, match_name, participant1, participant2,
                  winner, is_title_match, title_involved
           FROM match_results
           WHERE promotion = ?1
           ORDER BY seq",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![key], RawMatchResult::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(rows))
      })
      .await?;

    Ok(raws.map(|raws| {
      let results = raws.into_iter().map(|r| r.into_result(promotion)).collect();
      PromotionHistory::from_parts(promotion, results)
    }))
  }

  async fn save_history(&self, history: &PromotionHistory) -> Result<()> {
    let promotion = history.promotion().to_owned();
    let results = history.match_results().to_vec();
    let lineages = history.lineages().to_vec();
    let saved_at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO histories (promotion, saved_at) VALUES (?1, ?2)
           ON CONFLICT (promotion) DO UPDATE SET saved_at = excluded.saved_at",
          rusqlite::params![promotion, saved_at],
        )?;
        tx.execute(
          "DELETE FROM match_results WHERE promotion = ?1",
          rusqlite::params![promotion],
        )?;
        tx.execute(
          "DELETE FROM title_reigns WHERE promotion = ?1",
          rusqlite::params![promotion],
        )?;

        {
          let mut insert = tx.prepare(
            "INSERT INTO match_results (
               promotion, seq, show_name, date, match_name,
               participant1, participant2, winner, is_title_match, title_involved
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          )?;
          for (seq, r) in results.iter().enumerate() {
            insert.execute(rusqlite::params![
              promotion,
              seq as i64,
              r.show_name,
              r.date,
              r.match_name,
              r.participant1,
              r.participant2,
              r.winner,
              r.is_title_match,
              r.title_involved,
            ])?;
          }

          let mut insert = tx.prepare(
            "INSERT INTO title_reigns (
               promotion, title_name, seq, champion, date_won, date_lost, event_name
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for lineage in &lineages {
            for (seq, reign) in lineage.reigns.iter().enumerate() {
              insert.execute(rusqlite::params![
                promotion,
                lineage.title_name,
                seq as i64,
                reign.champion,
                reign.date_won,
                reign.date_lost,
                reign.event_name,
              ])?;
            }
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Shows ─────────────────────────────────────────────────────────────────

  async fn list_shows(&self, promotion: &str) -> Result<Vec<Show>> {
    let key = promotion.to_owned();

    let raws: Vec<RawShow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT name, date, attendance, matches_json
           FROM shows
           WHERE promotion = ?1
           ORDER BY show_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![key], RawShow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShow::into_show).collect()
  }

  async fn save_show(
    &self,
    promotion: &str,
    show: &Show,
    previous: Option<&ShowIdentity>,
  ) -> Result<()> {
    let key = promotion.to_owned();
    let identity = show.identity();
    let previous = previous.cloned();
    let name = show.name.clone();
    let date = show.date.clone();
    let attendance = show.attendance;
    let matches_json = encode_matches(&show.matches)?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let stale: Vec<i64> = Self::show_keys(&tx, &key)?
          .into_iter()
          .filter(|(_, n, d)| {
            identity.matches(n, d) || previous.as_ref().is_some_and(|p| p.matches(n, d))
          })
          .map(|(id, ..)| id)
          .collect();
        Self::delete_shows(&tx, &stale)?;
        tx.execute(
          "INSERT INTO shows (promotion, name, date, attendance, matches_json)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![key, name, date, attendance, matches_json],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_show(&self, promotion: &str, identity: &ShowIdentity) -> Result<usize> {
    let key = promotion.to_owned();
    let identity = identity.clone();

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let ids: Vec<i64> = Self::show_keys(&tx, &key)?
          .into_iter()
          .filter(|(_, n, d)| identity.matches(n, d))
          .map(|(id, ..)| id)
          .collect();
        let removed = Self::delete_shows(&tx, &ids)?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;
    Ok(removed)
  }
}
