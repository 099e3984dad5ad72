//! Read-only snapshots handed to the reporting layer.
//!
//! These are derived from store queries and never persisted. Chart drawing
//! consumes them as plain series.

use serde::{Deserialize, Serialize};

use crate::record::Student;

/// One point of a student's SGPA trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemesterPoint {
  pub sem_number: u8,
  pub sgpa:       f64,
}

/// Mean SGPA across the series, or `None` if nothing has been recorded.
pub fn cgpa(series: &[SemesterPoint]) -> Option<f64> {
  if series.is_empty() {
    return None;
  }
  Some(series.iter().map(|p| p.sgpa).sum::<f64>() / series.len() as f64)
}

/// CGPA as it stood after each semester of the series.
pub fn running_cgpa(series: &[SemesterPoint]) -> Vec<SemesterPoint> {
  let mut sum = 0.0;
  series
    .iter()
    .enumerate()
    .map(|(i, p)| {
      sum += p.sgpa;
      SemesterPoint { sem_number: p.sem_number, sgpa: sum / (i + 1) as f64 }
    })
    .collect()
}

/// The semester with the highest SGPA; the earliest wins a tie.
pub fn best_semester(series: &[SemesterPoint]) -> Option<u8> {
  series
    .iter()
    .fold(None::<&SemesterPoint>, |best, p| match best {
      Some(b) if b.sgpa >= p.sgpa => Some(b),
      _ => Some(p),
    })
    .map(|p| p.sem_number)
}

/// Everything the personal-performance view shows for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
  pub student:             Student,
  /// Ordered by semester number.
  pub series:              Vec<SemesterPoint>,
  pub cgpa:                Option<f64>,
  pub running_cgpa:        Vec<SemesterPoint>,
  pub best_semester:       Option<u8>,
  pub semesters_completed: usize,
}

impl PerformanceReport {
  pub fn build(student: Student, series: Vec<SemesterPoint>) -> Self {
    Self {
      cgpa: cgpa(&series),
      running_cgpa: running_cgpa(&series),
      best_semester: best_semester(&series),
      semesters_completed: series.len(),
      student,
      series,
    }
  }
}

/// A student's total in one subject next to the cohort mean for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectComparison {
  pub subject_code:  String,
  pub student_total: f64,
  pub peer_average:  f64,
}

/// One row of the cross-student summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
  pub usn:     String,
  pub name:    String,
  pub cgpa:    f64,
  pub avg_cie: f64,
}

/// Row counts for the store's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
  pub students:  u64,
  pub semesters: u64,
  pub marks:     u64,
}
