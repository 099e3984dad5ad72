//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `transcript-store-sqlite`). The API
//! and CLI depend on this abstraction, not on any concrete backend, and
//! receive the store handle explicitly.

use std::future::Future;

use crate::{
  error::RecordError,
  record::{Mark, NewMark, SemesterRecord, Student, Subject},
  report::{PerformanceReport, SemesterPoint, StoreStats, StudentSummary, SubjectComparison},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an academic record store backend.
///
/// A (student, semester) pair moves from "no record" to "recorded" exactly
/// once. There is no edit path: a recorded semester can only disappear
/// together with its student.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: RecordError;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Enrol a student. Fails with `DuplicateKey` if the USN is taken.
  fn add_student(
    &self,
    student: Student,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Record a semester and its marks, then compute and store its SGPA.
  ///
  /// Checked in order: `NotFound` student, `DuplicateSemester`,
  /// `DuplicateSubject`, then `ReferentialError` for an unknown subject.
  /// Atomic: on any failure nothing is persisted.
  fn record_semester(
    &self,
    usn: String,
    sem_number: u8,
    marks: Vec<NewMark>,
  ) -> impl Future<Output = Result<SemesterRecord, Self::Error>> + Send + '_;

  /// Delete a student with all of its marks and semester records.
  /// Fails with `NotFound` if the USN is unknown.
  fn remove_student(
    &self,
    usn: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Catalog and students ──────────────────────────────────────────────

  /// Catalog subjects ordered by code, optionally for one semester only.
  fn list_subjects(
    &self,
    sem: Option<u8>,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Retrieve a student by USN. Returns `None` if not found.
  fn get_student(
    &self,
    usn: String,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// All students ordered by USN. With `with_records`, only those having at
  /// least one recorded semester.
  fn list_students(
    &self,
    with_records: bool,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  // ── Reporting queries ─────────────────────────────────────────────────

  /// The record for one (student, semester) pair, if it has been recorded.
  fn get_semester(
    &self,
    usn: String,
    sem_number: u8,
  ) -> impl Future<Output = Result<Option<SemesterRecord>, Self::Error>> + Send + '_;

  /// `(sem_number, sgpa)` for every recorded semester, ordered by semester.
  fn semester_series(
    &self,
    usn: String,
  ) -> impl Future<Output = Result<Vec<SemesterPoint>, Self::Error>> + Send + '_;

  /// Marks of one recorded semester ordered by subject code. Empty if the
  /// semester was never recorded.
  fn semester_marks(
    &self,
    usn: String,
    sem_number: u8,
  ) -> impl Future<Output = Result<Vec<Mark>, Self::Error>> + Send + '_;

  /// Mean stored total across every student's mark for `subject_code` in
  /// semester `sem_number`; `None` when no such mark exists.
  fn subject_average(
    &self,
    subject_code: String,
    sem_number: u8,
  ) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send + '_;

  /// CGPA and mean CIE of every student with records, best CGPA first.
  fn student_summaries(
    &self,
  ) -> impl Future<Output = Result<Vec<StudentSummary>, Self::Error>> + Send + '_;

  /// Row counts of students, semester records and marks.
  fn stats(&self) -> impl Future<Output = Result<StoreStats, Self::Error>> + Send + '_;
}

// ─── Composite queries ───────────────────────────────────────────────────────

/// Build the personal-performance snapshot for `usn`. Returns `None` if the
/// student does not exist.
pub async fn performance_report<S: RecordStore>(
  store: &S,
  usn: &str,
) -> Result<Option<PerformanceReport>, S::Error> {
  let Some(student) = store.get_student(usn.to_owned()).await? else {
    return Ok(None);
  };
  let series = store.semester_series(usn.to_owned()).await?;
  Ok(Some(PerformanceReport::build(student, series)))
}

/// Each subject of a recorded semester next to the cohort average for it,
/// ordered by subject code.
pub async fn compare_semester<S: RecordStore>(
  store: &S,
  usn: &str,
  sem_number: u8,
) -> Result<Vec<SubjectComparison>, S::Error> {
  let marks = store.semester_marks(usn.to_owned(), sem_number).await?;
  let mut rows = Vec::with_capacity(marks.len());
  for mark in marks {
    let average = store
      .subject_average(mark.subject_code.clone(), sem_number)
      .await?;
    if let Some(peer_average) = average {
      rows.push(SubjectComparison {
        subject_code: mark.subject_code,
        student_total: mark.total,
        peer_average,
      });
    }
  }
  Ok(rows)
}
