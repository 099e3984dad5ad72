//! Grade policy: raw totals to letter grades and grade points.
//!
//! Thresholds are inclusive lower bounds evaluated highest-first. Totals
//! outside `0..=100` are passed through the same table rather than rejected,
//! so the policy never fails; range checks belong to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A letter grade awarded for one subject.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Grade {
  #[serde(rename = "F")]
  F,
  #[serde(rename = "B")]
  B,
  #[serde(rename = "B+")]
  BPlus,
  #[serde(rename = "A")]
  A,
  #[serde(rename = "A+")]
  APlus,
  #[serde(rename = "O")]
  O,
}

/// `(inclusive lower bound, grade)`, highest first.
const THRESHOLDS: [(f64, Grade); 5] = [
  (90.0, Grade::O),
  (80.0, Grade::APlus),
  (70.0, Grade::A),
  (60.0, Grade::BPlus),
  (50.0, Grade::B),
];

impl Grade {
  /// Every grade, best first.
  pub const ALL: [Grade; 6] = [
    Grade::O,
    Grade::APlus,
    Grade::A,
    Grade::BPlus,
    Grade::B,
    Grade::F,
  ];

  /// Grade points on the ten-point scale.
  pub fn points(self) -> u32 {
    match self {
      Self::O => 10,
      Self::APlus => 9,
      Self::A => 8,
      Self::BPlus => 7,
      Self::B => 6,
      Self::F => 0,
    }
  }

  /// The letter as printed on a marks card and stored in the `grade` column.
  pub fn letter(self) -> &'static str {
    match self {
      Self::O => "O",
      Self::APlus => "A+",
      Self::A => "A",
      Self::BPlus => "B+",
      Self::B => "B",
      Self::F => "F",
    }
  }

  /// Parse a stored letter. Returns `None` for anything outside the table.
  pub fn from_letter(letter: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|g| g.letter() == letter)
  }
}

impl fmt::Display for Grade {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.letter())
  }
}

/// Map a subject total to its letter grade.
///
/// `NaN` compares false against every threshold and therefore yields
/// [`Grade::F`].
pub fn grade_for(total: f64) -> Grade {
  THRESHOLDS
    .iter()
    .find(|(floor, _)| total >= *floor)
    .map(|&(_, grade)| grade)
    .unwrap_or(Grade::F)
}

/// Grade points for a stored letter; unknown letters count for nothing.
pub fn points_for_letter(letter: &str) -> u32 {
  Grade::from_letter(letter).map(Grade::points).unwrap_or(0)
}

/// Subject total from the internal score and the raw (out of 100) exam score.
pub fn subject_total(cie: u32, see_raw: u32) -> f64 {
  f64::from(cie) + normalized_see(see_raw)
}

/// The exam score rescaled to a 0–50 range.
pub fn normalized_see(see_raw: u32) -> f64 { f64::from(see_raw) / 2.0 }
