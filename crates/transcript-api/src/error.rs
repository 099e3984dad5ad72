//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use transcript_core::{Error as DomainError, RecordError};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Record(#[from] DomainError),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Surface a backend error, keeping its domain kind when it has one.
  pub fn store<E: RecordError>(err: E) -> Self {
    match err.record_error() {
      Some(domain) => Self::Record(domain.clone()),
      None => Self::Store(Box::new(err)),
    }
  }

  pub fn not_found(what: impl Into<String>) -> Self {
    Self::Record(DomainError::NotFound(what.into()))
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Record(e) => match e {
        DomainError::DuplicateKey(_)
        | DomainError::DuplicateSemester { .. }
        | DomainError::DuplicateSubject { .. } => StatusCode::CONFLICT,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::ReferentialError(_) | DomainError::OutOfRange { .. } => {
          StatusCode::UNPROCESSABLE_ENTITY
        }
      },
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::warn!(error = %self, "request rejected");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
