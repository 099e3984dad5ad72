//! JSON REST API for the transcript record store.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`]. The form layer
//! submits students and semesters through it; the reporting layer reads
//! series, marks and comparisons. Transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", transcript_api::api_router(Arc::new(store)))
//! ```

pub mod error;
pub mod overview;
pub mod semesters;
pub mod students;
pub mod subjects;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use transcript_core::store::RecordStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Catalog
    .route("/subjects", get(subjects::list::<S>))
    .route("/subjects/{code}/average", get(subjects::average::<S>))
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route(
      "/students/{usn}",
      get(students::get_one::<S>).delete(students::remove::<S>),
    )
    .route("/students/{usn}/report", get(students::report::<S>))
    // Semesters
    .route(
      "/students/{usn}/semesters",
      get(semesters::series::<S>).post(semesters::record::<S>),
    )
    .route("/students/{usn}/semesters/{sem}/marks", get(semesters::marks::<S>))
    .route(
      "/students/{usn}/semesters/{sem}/comparison",
      get(semesters::comparison::<S>),
    )
    // Cross-student
    .route("/summary", get(overview::summary::<S>))
    .route("/stats", get(overview::stats::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
