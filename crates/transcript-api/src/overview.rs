//! Cross-student views: `GET /summary` and `GET /stats`.

use std::sync::Arc;

use axum::{Json, extract::State};
use transcript_core::{
  report::{StoreStats, StudentSummary},
  store::RecordStore,
};

use crate::error::ApiError;

/// `GET /summary`: CGPA and mean CIE per student, best CGPA first.
pub async fn summary<S: RecordStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<StudentSummary>>, ApiError> {
  let rows = store.student_summaries().await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `GET /stats`
pub async fn stats<S: RecordStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<StoreStats>, ApiError> {
  Ok(Json(store.stats().await.map_err(ApiError::store)?))
}
