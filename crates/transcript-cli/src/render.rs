//! Plain-text tables for terminal output.

use tabled::{Table, Tabled, settings::Style};
use transcript_core::{
  record::{Mark, Subject},
  report::{PerformanceReport, StoreStats, StudentSummary, SubjectComparison},
};

fn two_places(v: &f64) -> String { format!("{v:.2}") }

fn one_place(v: &f64) -> String { format!("{v:.1}") }

fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
  Table::new(rows).with(Style::modern()).to_string()
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubjectRow<'a> {
  #[tabled(rename = "Code")]
  code:    &'a str,
  #[tabled(rename = "Subject")]
  name:    &'a str,
  #[tabled(rename = "Sem")]
  sem:     u8,
  #[tabled(rename = "Credits")]
  credits: u32,
}

pub fn subjects(subjects: &[Subject]) -> String {
  table(subjects.iter().map(|s| SubjectRow {
    code:    &s.code,
    name:    &s.name,
    sem:     s.sem,
    credits: s.credits,
  }))
}

// ─── Marks ────────────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct MarkRow<'a> {
  #[tabled(rename = "Subject")]
  code:  &'a str,
  #[tabled(rename = "CIE")]
  cie:   u32,
  #[tabled(rename = "SEE", display = "one_place")]
  see:   f64,
  #[tabled(rename = "Total", display = "one_place")]
  total: f64,
  #[tabled(rename = "Grade")]
  grade: &'static str,
}

pub fn marks(marks: &[Mark]) -> String {
  table(marks.iter().map(|m| MarkRow {
    code:  &m.subject_code,
    cie:   m.cie,
    see:   m.see,
    total: m.total,
    grade: m.grade.letter(),
  }))
}

// ─── Personal performance ─────────────────────────────────────────────────────

#[derive(Tabled)]
struct SemesterRow {
  #[tabled(rename = "Semester")]
  sem:    u8,
  #[tabled(rename = "SGPA", display = "two_places")]
  sgpa:   f64,
  #[tabled(rename = "CGPA so far", display = "two_places")]
  cgpa:   f64,
}

pub fn report(report: &PerformanceReport) -> String {
  let header = format!(
    "{} ({}), {}, semester {}",
    report.student.name, report.student.usn, report.student.branch, report.student.sem
  );
  if report.series.is_empty() {
    return format!("{header}\nNo semester data found.");
  }

  let rows = report
    .series
    .iter()
    .zip(&report.running_cgpa)
    .map(|(p, running)| SemesterRow { sem: p.sem_number, sgpa: p.sgpa, cgpa: running.sgpa });

  let mut out = format!("{header}\n{}\n", table(rows));
  if let Some(cgpa) = report.cgpa {
    out.push_str(&format!("CGPA: {cgpa:.2}\n"));
  }
  if let Some(best) = report.best_semester {
    out.push_str(&format!("Best semester: {best}\n"));
  }
  out.push_str(&format!("Semesters completed: {}", report.semesters_completed));
  out
}

#[derive(Tabled)]
struct TrendRow<'a> {
  #[tabled(rename = "USN")]
  usn:  &'a str,
  #[tabled(rename = "Name")]
  name: &'a str,
  #[tabled(rename = "Semester")]
  sem:  u8,
  #[tabled(rename = "SGPA", display = "two_places")]
  sgpa: f64,
  #[tabled(rename = "CGPA so far", display = "two_places")]
  cgpa: f64,
}

/// SGPA and running CGPA per semester for several students, one row each.
pub fn trends(reports: &[PerformanceReport]) -> String {
  table(reports.iter().flat_map(|r| {
    r.series.iter().zip(&r.running_cgpa).map(move |(p, running)| TrendRow {
      usn:  &r.student.usn,
      name: &r.student.name,
      sem:  p.sem_number,
      sgpa: p.sgpa,
      cgpa: running.sgpa,
    })
  }))
}

// ─── Comparisons ──────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ComparisonRow<'a> {
  #[tabled(rename = "Subject")]
  code:    &'a str,
  #[tabled(rename = "Student", display = "one_place")]
  student: f64,
  #[tabled(rename = "Branch avg", display = "one_place")]
  average: f64,
}

pub fn comparison(rows: &[SubjectComparison]) -> String {
  table(rows.iter().map(|r| ComparisonRow {
    code:    &r.subject_code,
    student: r.student_total,
    average: r.peer_average,
  }))
}

#[derive(Tabled)]
struct SummaryRow<'a> {
  #[tabled(rename = "USN")]
  usn:     &'a str,
  #[tabled(rename = "Name")]
  name:    &'a str,
  #[tabled(rename = "CGPA", display = "two_places")]
  cgpa:    f64,
  #[tabled(rename = "Avg CIE", display = "one_place")]
  avg_cie: f64,
}

pub fn summary(rows: &[StudentSummary]) -> String {
  table(rows.iter().map(|r| SummaryRow {
    usn:     &r.usn,
    name:    &r.name,
    cgpa:    r.cgpa,
    avg_cie: r.avg_cie,
  }))
}

pub fn stats(stats: &StoreStats) -> String {
  format!(
    "Students: {}\nSemesters: {}\nMarks records: {}",
    stats.students, stats.semesters, stats.marks
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use transcript_core::{grade::Grade, record::Student, report::SemesterPoint};

  fn jane() -> Student {
    Student {
      usn:    "1BM23IS001".into(),
      name:   "Jane".into(),
      branch: "ISE".into(),
      sem:    4,
    }
  }

  #[test]
  fn report_lists_running_cgpa() {
    let report = PerformanceReport::build(jane(), vec![
      SemesterPoint { sem_number: 1, sgpa: 8.0 },
      SemesterPoint { sem_number: 2, sgpa: 9.0 },
    ]);
    let text = super::report(&report);
    assert!(text.contains("8.50"), "{text}");
    assert!(text.contains("Best semester: 2"), "{text}");
    assert!(text.contains("Semesters completed: 2"), "{text}");
  }

  #[test]
  fn trends_list_every_students_semesters() {
    let mut ravi = jane();
    ravi.usn = "1BM23IS002".into();
    ravi.name = "Ravi".into();
    let text = trends(&[
      PerformanceReport::build(jane(), vec![
        SemesterPoint { sem_number: 1, sgpa: 8.0 },
        SemesterPoint { sem_number: 2, sgpa: 9.0 },
      ]),
      PerformanceReport::build(ravi, vec![SemesterPoint { sem_number: 1, sgpa: 6.5 }]),
    ]);
    assert_eq!(text.matches("1BM23IS001").count(), 2, "{text}");
    assert!(text.contains("Ravi"), "{text}");
    assert!(text.contains("8.50"), "{text}");
    assert!(text.contains("6.50"), "{text}");
  }

  #[test]
  fn scores_print_with_fixed_places() {
    let text = marks(&[Mark {
      mark_id:      1,
      semester_id:  1,
      subject_code: "22CS1ESPOP".into(),
      cie:          30,
      see:          30.5,
      total:        60.5,
      grade:        Grade::BPlus,
    }]);
    assert!(text.contains("30.5") && text.contains("60.5"), "{text}");
    assert!(text.contains("B+"), "{text}");

    let text = comparison(&[SubjectComparison {
      subject_code:  "23MA1BSMCS".into(),
      student_total: 90.0,
      peer_average:  72.5,
    }]);
    assert!(text.contains("90.0") && text.contains("72.5"), "{text}");

    let text = summary(&[StudentSummary {
      usn:     "1BM23IS001".into(),
      name:    "Jane".into(),
      cgpa:    61.0 / 7.0,
      avg_cie: 37.5,
    }]);
    assert!(text.contains("8.71") && text.contains("37.5"), "{text}");
  }

  #[test]
  fn empty_report_says_so() {
    let text = super::report(&PerformanceReport::build(jane(), Vec::new()));
    assert!(text.ends_with("No semester data found."));
  }
}
