//! Error type for `transcript-store-sqlite`.

use thiserror::Error;
use transcript_core::RecordError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Record(#[from] transcript_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored row holds a value the domain types cannot represent.
  #[error("corrupt row: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl RecordError for Error {
  fn record_error(&self) -> Option<&transcript_core::Error> {
    match self {
      Self::Record(e) => Some(e),
      _ => None,
    }
  }
}
