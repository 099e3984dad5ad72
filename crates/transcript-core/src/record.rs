//! Academic entities: students, catalog subjects, semester records and marks.
//!
//! A student owns at most one [`SemesterRecord`] per semester number; each
//! record owns at most one [`Mark`] per subject. Records and marks are written
//! together and never edited afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  grade::{Grade, grade_for, normalized_see, subject_total},
};

/// Lowest and highest semester numbers a student can be in.
pub const SEMESTERS: std::ops::RangeInclusive<u8> = 1..=8;
/// Continuous internal evaluation is scored out of this many points.
pub const CIE_MAX: u32 = 50;
/// The semester end exam is entered out of this many points.
pub const SEE_RAW_MAX: u32 = 100;
/// Branch assigned to students and catalog subjects when none is given.
pub const DEFAULT_BRANCH: &str = "Information Science And Engineering";

// ─── Student ─────────────────────────────────────────────────────────────────

/// A student, keyed by university seat number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub usn:    String,
  pub name:   String,
  pub branch: String,
  /// The semester the student declared as current at enrolment.
  pub sem:    u8,
}

// ─── Subject ─────────────────────────────────────────────────────────────────

/// A catalog entry. Seeded once; shared by every student of the branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub code:    String,
  pub name:    String,
  pub sem:     u8,
  pub branch:  String,
  pub credits: u32,
}

// ─── Semester record ─────────────────────────────────────────────────────────

/// One recorded semester for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterRecord {
  pub semester_id: i64,
  pub usn:         String,
  pub sem_number:  u8,
  /// `None` only while marks are still being inserted inside the recording
  /// transaction; a committed record always carries a value.
  pub sgpa:        Option<f64>,
  pub recorded_at: DateTime<Utc>,
}

// ─── Marks ───────────────────────────────────────────────────────────────────

/// Operator input for one subject of a semester submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMark {
  pub subject_code: String,
  pub cie:          u32,
  /// Exam score out of [`SEE_RAW_MAX`]; halved before storage.
  pub see_raw:      u32,
}

impl NewMark {
  pub fn new(subject_code: impl Into<String>, cie: u32, see_raw: u32) -> Self {
    Self { subject_code: subject_code.into(), cie, see_raw }
  }

  /// The stored columns derived from this input.
  pub fn derive(&self) -> DerivedScore {
    let total = subject_total(self.cie, self.see_raw);
    DerivedScore {
      see:   normalized_see(self.see_raw),
      total,
      grade: grade_for(total),
    }
  }

  /// Check the documented input ranges.
  pub fn validate(&self) -> Result<()> {
    check_range("cie", i64::from(self.cie), 0, i64::from(CIE_MAX))?;
    check_range("see", i64::from(self.see_raw), 0, i64::from(SEE_RAW_MAX))
  }
}

/// Values computed once at insertion time and stored alongside the raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScore {
  pub see:   f64,
  pub total: f64,
  pub grade: Grade,
}

/// A persisted mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
  pub mark_id:      i64,
  pub semester_id:  i64,
  pub subject_code: String,
  pub cie:          u32,
  /// Exam score already normalised to 0–50.
  pub see:          f64,
  /// `cie + see`, fixed at insertion.
  pub total:        f64,
  pub grade:        Grade,
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Reject a semester number outside [`SEMESTERS`].
pub fn validate_semester(sem: i64) -> Result<u8> {
  check_range(
    "semester",
    sem,
    i64::from(*SEMESTERS.start()),
    i64::from(*SEMESTERS.end()),
  )?;
  // In range, so the cast is lossless.
  Ok(sem as u8)
}

/// Canonical form of a university seat number.
pub fn normalize_usn(usn: &str) -> String { usn.trim().to_uppercase() }

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
  if (min..=max).contains(&value) {
    Ok(())
  } else {
    Err(Error::OutOfRange { field, value, min, max })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derive_fixes_total_and_grade() {
    let d = NewMark::new("23IS3PCDSC", 45, 90).derive();
    assert_eq!(d.see, 45.0);
    assert_eq!(d.total, 90.0);
    assert_eq!(d.grade, Grade::O);

    let d = NewMark::new("23IS3PCOPS", 30, 59).derive();
    assert_eq!(d.total, 59.5);
    assert_eq!(d.grade, Grade::B);
  }

  #[test]
  fn validate_rejects_out_of_range_scores() {
    assert!(NewMark::new("X", 50, 100).validate().is_ok());
    assert_eq!(
      NewMark::new("X", 51, 0).validate(),
      Err(Error::OutOfRange { field: "cie", value: 51, min: 0, max: 50 })
    );
    assert!(matches!(
      NewMark::new("X", 0, 101).validate(),
      Err(Error::OutOfRange { field: "see", .. })
    ));
  }

  #[test]
  fn semester_range() {
    assert_eq!(validate_semester(1), Ok(1));
    assert_eq!(validate_semester(8), Ok(8));
    assert!(validate_semester(0).is_err());
    assert!(validate_semester(9).is_err());
  }

  #[test]
  fn usn_is_trimmed_and_uppercased() {
    assert_eq!(normalize_usn(" 1bm23is001 "), "1BM23IS001");
  }
}
