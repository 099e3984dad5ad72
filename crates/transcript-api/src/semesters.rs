//! Handlers for a student's semester records.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/students/:usn/semesters` | SGPA series ordered by semester |
//! | `POST` | `/students/:usn/semesters` | Body: [`RecordBody`]; 201 + stored record |
//! | `GET`  | `/students/:usn/semesters/:sem/marks` | Marks ordered by subject code |
//! | `GET`  | `/students/:usn/semesters/:sem/comparison` | Totals vs cohort averages |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use transcript_core::{
  record::{Mark, NewMark, normalize_usn, validate_semester},
  report::{SemesterPoint, SubjectComparison},
  store::{RecordStore, compare_semester},
};

use crate::error::ApiError;

// ─── Series ───────────────────────────────────────────────────────────────────

/// `GET /students/:usn/semesters`
pub async fn series<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(usn): Path<String>,
) -> Result<Json<Vec<SemesterPoint>>, ApiError> {
  let series = store
    .semester_series(normalize_usn(&usn))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(series))
}

// ─── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecordBody {
  pub sem_number: i64,
  pub marks:      Vec<NewMark>,
}

/// `POST /students/:usn/semesters`
///
/// Scores are range-checked here; the store trusts its inputs.
pub async fn record<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(usn): Path<String>,
  Json(body): Json<RecordBody>,
) -> Result<impl IntoResponse, ApiError> {
  let sem = validate_semester(body.sem_number)?;
  for mark in &body.marks {
    mark.validate()?;
  }

  let record = store
    .record_semester(normalize_usn(&usn), sem, body.marks)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Marks ────────────────────────────────────────────────────────────────────

/// `GET /students/:usn/semesters/:sem/marks`
pub async fn marks<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path((usn, sem)): Path<(String, i64)>,
) -> Result<Json<Vec<Mark>>, ApiError> {
  let sem = validate_semester(sem)?;
  let marks = store
    .semester_marks(normalize_usn(&usn), sem)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(marks))
}

// ─── Comparison ───────────────────────────────────────────────────────────────

/// `GET /students/:usn/semesters/:sem/comparison`
pub async fn comparison<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path((usn, sem)): Path<(String, i64)>,
) -> Result<Json<Vec<SubjectComparison>>, ApiError> {
  let sem = validate_semester(sem)?;
  let rows = compare_semester(store.as_ref(), &normalize_usn(&usn), sem)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}
