//! Error types for `transcript-core`.

use thiserror::Error;

/// The record-keeping error taxonomy shared by every backend and surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("student {0} already exists")]
  DuplicateKey(String),

  #[error("semester {sem} is already recorded for student {usn}")]
  DuplicateSemester { usn: String, sem: u8 },

  #[error("subject {code} appears more than once in the submission")]
  DuplicateSubject { code: String },

  #[error("not found: {0}")]
  NotFound(String),

  #[error("mark references unknown subject {0}")]
  ReferentialError(String),

  #[error("{field} must be between {min} and {max}, got {value}")]
  OutOfRange {
    field: &'static str,
    value: i64,
    min:   i64,
    max:   i64,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Implemented by backend error types so that outer layers can recover the
/// domain error (if any) without knowing the concrete backend.
pub trait RecordError: std::error::Error + Send + Sync + 'static {
  /// The domain error carried by `self`, or `None` for infrastructure
  /// failures (I/O, corrupt rows, ...).
  fn record_error(&self) -> Option<&Error>;
}

impl RecordError for Error {
  fn record_error(&self) -> Option<&Error> { Some(self) }
}
