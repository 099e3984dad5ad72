//! Semester grade-point average.

use crate::grade::points_for_letter;

/// Credit-weighted mean of grade points over one semester's marks.
///
/// Each item is a `(letter, credits)` pair. Letters outside the grade table
/// contribute zero points but their credits still count. An empty input or a
/// zero credit total yields `0.0`.
pub fn sgpa<I, L>(marks: I) -> f64
where
  I: IntoIterator<Item = (L, u32)>,
  L: AsRef<str>,
{
  let (weighted, credits) = marks.into_iter().fold(
    (0u64, 0u64),
    |(weighted, credits), (letter, c)| {
      let points = u64::from(points_for_letter(letter.as_ref()));
      (weighted + points * u64::from(c), credits + u64::from(c))
    },
  );

  if credits == 0 {
    return 0.0;
  }
  weighted as f64 / credits as f64
}
