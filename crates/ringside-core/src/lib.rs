//! Core types and engine for Ringside, the title history and milestone
//! tracker for wrestling promotions.
//!
//! This crate is free of HTTP and database dependencies. Storage is reached
//! through the [`store::HistoryStore`] trait; everything else here is pure
//! derivation from a promotion's match result log.

// Native `async fn` in traits; the `Send` bounds live on the trait signatures.
#![allow(async_fn_in_trait)]

pub mod date;
pub mod error;
pub mod history;
pub mod lineage;
pub mod log;
pub mod memory;
pub mod milestone;
pub mod record;
pub mod reign;
pub mod service;
pub mod show;
pub mod store;

pub use error::{Error, Result};
pub use history::PromotionHistory;
pub use service::HistoryService;
pub use store::HistoryStore;
