//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; grades as their printed letter.

use chrono::{DateTime, Utc};
use transcript_core::{
  grade::Grade,
  record::{Mark, Student, Subject},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Grade ───────────────────────────────────────────────────────────────────

pub fn decode_grade(s: &str) -> Result<Grade> {
  Grade::from_letter(s).ok_or_else(|| Error::Decode(format!("unknown grade {s:?}")))
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

/// Columns: `usn, name, branch, sem`.
pub fn student_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Student> {
  Ok(Student {
    usn:    row.get(0)?,
    name:   row.get(1)?,
    branch: row.get(2)?,
    sem:    row.get(3)?,
  })
}

/// Columns: `code, name, sem, branch, credits`.
pub fn subject_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subject> {
  Ok(Subject {
    code:    row.get(0)?,
    name:    row.get(1)?,
    sem:     row.get(2)?,
    branch:  row.get(3)?,
    credits: row.get(4)?,
  })
}

// ─── Raw mark ────────────────────────────────────────────────────────────────

/// A `marks` row before the grade letter is validated.
#[derive(Debug)]
pub struct RawMark {
  pub mark_id:      i64,
  pub semester_id:  i64,
  pub subject_code: String,
  pub cie:          u32,
  pub see:          f64,
  pub total:        f64,
  pub grade:        String,
}

impl RawMark {
  /// Columns: `mark_id, semester_id, subject_code, cie, see, total, grade`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      mark_id:      row.get(0)?,
      semester_id:  row.get(1)?,
      subject_code: row.get(2)?,
      cie:          row.get(3)?,
      see:          row.get(4)?,
      total:        row.get(5)?,
      grade:        row.get(6)?,
    })
  }

  pub fn into_mark(self) -> Result<Mark> {
    Ok(Mark {
      grade:        decode_grade(&self.grade)?,
      mark_id:      self.mark_id,
      semester_id:  self.semester_id,
      subject_code: self.subject_code,
      cie:          self.cie,
      see:          self.see,
      total:        self.total,
    })
  }
}
