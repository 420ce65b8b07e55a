//! Error types for `ringside-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("promotion name is blank")]
  BlankPromotion,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
