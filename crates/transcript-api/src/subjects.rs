//! Handlers for the subject catalog.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | Optional `?sem=N` |
//! | `GET`  | `/subjects/:code/average?sem=N` | Mean total across all students |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use transcript_core::{
  record::{Subject, validate_semester},
  store::RecordStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SemParams {
  pub sem: Option<i64>,
}

/// `GET /subjects[?sem=N]`
pub async fn list<S: RecordStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SemParams>,
) -> Result<Json<Vec<Subject>>, ApiError> {
  let sem = params.sem.map(validate_semester).transpose()?;
  let subjects = store.list_subjects(sem).await.map_err(ApiError::store)?;
  Ok(Json(subjects))
}

#[derive(Debug, Serialize)]
pub struct SubjectAverage {
  pub subject_code: String,
  pub sem_number:   u8,
  /// `null` when no student has a mark for the subject in that semester.
  pub average:      Option<f64>,
}

/// `GET /subjects/:code/average?sem=N`
pub async fn average<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
  Query(params): Query<SemParams>,
) -> Result<Json<SubjectAverage>, ApiError> {
  let sem = params
    .sem
    .ok_or_else(|| ApiError::BadRequest("query parameter `sem` is required".into()))?;
  let sem_number = validate_semester(sem)?;
  let average = store
    .subject_average(code.clone(), sem_number)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(SubjectAverage { subject_code: code, sem_number, average }))
}
