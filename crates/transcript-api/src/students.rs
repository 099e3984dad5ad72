//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/students` | Optional `?with_records=true` |
//! | `POST`   | `/students` | Body: [`CreateBody`]; 409 if the USN exists |
//! | `GET`    | `/students/:usn` | 404 if not found |
//! | `DELETE` | `/students/:usn` | Cascades to semesters and marks; 204 |
//! | `GET`    | `/students/:usn/report` | [`PerformanceReport`] snapshot |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use transcript_core::{
  record::{DEFAULT_BRANCH, Student, normalize_usn, validate_semester},
  report::PerformanceReport,
  store::{RecordStore, performance_report},
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Only students with at least one recorded semester.
  #[serde(default)]
  pub with_records: bool,
}

/// `GET /students[?with_records=true]`
pub async fn list<S: RecordStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Student>>, ApiError> {
  let students = store
    .list_students(params.with_records)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(students))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub usn:    String,
  pub name:   String,
  /// Defaults to the catalog branch.
  pub branch: Option<String>,
  pub sem:    i64,
}

/// `POST /students`
pub async fn create<S: RecordStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let usn = normalize_usn(&body.usn);
  let name = body.name.trim();
  if usn.is_empty() || name.is_empty() {
    return Err(ApiError::BadRequest("usn and name are required".into()));
  }

  let student = Student {
    usn,
    name: name.to_owned(),
    branch: body.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_owned()),
    sem: validate_semester(body.sem)?,
  };
  let student = store.add_student(student).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(student)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /students/:usn`
pub async fn get_one<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(usn): Path<String>,
) -> Result<Json<Student>, ApiError> {
  let usn = normalize_usn(&usn);
  let student = store
    .get_student(usn.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found(format!("student {usn}")))?;
  Ok(Json(student))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /students/:usn`
pub async fn remove<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(usn): Path<String>,
) -> Result<StatusCode, ApiError> {
  store
    .remove_student(normalize_usn(&usn))
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Report ───────────────────────────────────────────────────────────────────

/// `GET /students/:usn/report`
pub async fn report<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(usn): Path<String>,
) -> Result<Json<PerformanceReport>, ApiError> {
  let usn = normalize_usn(&usn);
  let report = performance_report(store.as_ref(), &usn)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found(format!("student {usn}")))?;
  Ok(Json(report))
}
