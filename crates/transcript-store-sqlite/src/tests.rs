//! Integration tests for `SqliteStore` against an in-memory database.

use transcript_core::{
  Error as DomainError,
  grade::Grade,
  record::{DEFAULT_BRANCH, NewMark, Student},
  store::RecordStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn student(usn: &str, name: &str) -> Student {
  Student {
    usn:    usn.into(),
    name:   name.into(),
    branch: DEFAULT_BRANCH.into(),
    sem:    4,
  }
}

fn domain(err: Error) -> DomainError {
  match err {
    Error::Record(e) => e,
    other => panic!("expected a domain error, got {other:?}"),
  }
}

/// Semester-1 subjects: 23MA1BSMCS has 4 credits, 22CS1ESPOP has 3.
fn jane_sem1() -> Vec<NewMark> {
  vec![
    NewMark::new("23MA1BSMCS", 45, 90),
    NewMark::new("22CS1ESPOP", 30, 60),
  ]
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_is_seeded_once() {
  let s = store().await;
  let all = s.list_subjects(None).await.unwrap();
  assert_eq!(all.len(), 22);
  assert!(all.windows(2).all(|w| w[0].code < w[1].code));
  assert!(all.iter().all(|sub| sub.branch == DEFAULT_BRANCH && sub.credits > 0));

  // Re-running initialisation must not duplicate rows.
  s.init_schema().await.unwrap();
  assert_eq!(s.list_subjects(None).await.unwrap().len(), 22);
}

#[tokio::test]
async fn catalog_filtered_by_semester() {
  let s = store().await;
  let counts = [
    s.list_subjects(Some(1)).await.unwrap().len(),
    s.list_subjects(Some(2)).await.unwrap().len(),
    s.list_subjects(Some(3)).await.unwrap().len(),
    s.list_subjects(Some(4)).await.unwrap().len(),
  ];
  assert_eq!(counts, [8, 7, 7, 0]);
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_student() {
  let s = store().await;
  let added = s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  let fetched = s.get_student("1BM23IS001".into()).await.unwrap();
  assert_eq!(fetched, Some(added));
  assert!(s.get_student("1BM23IS999".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_usn_is_rejected() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  let err = s
    .add_student(student("1BM23IS001", "Someone Else"))
    .await
    .unwrap_err();
  assert_eq!(domain(err), DomainError::DuplicateKey("1BM23IS001".into()));

  let kept = s.get_student("1BM23IS001".into()).await.unwrap().unwrap();
  assert_eq!(kept.name, "Jane");
}

#[tokio::test]
async fn list_students_with_records_only() {
  let s = store().await;
  s.add_student(student("1BM23IS002", "Ravi")).await.unwrap();
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.record_semester("1BM23IS002".into(), 1, jane_sem1()).await.unwrap();

  let all: Vec<_> = s
    .list_students(false)
    .await
    .unwrap()
    .into_iter()
    .map(|st| st.usn)
    .collect();
  assert_eq!(all, ["1BM23IS001", "1BM23IS002"]);

  let recorded = s.list_students(true).await.unwrap();
  assert_eq!(recorded.len(), 1);
  assert_eq!(recorded[0].usn, "1BM23IS002");
}

// ─── Recording semesters ─────────────────────────────────────────────────────

#[tokio::test]
async fn record_semester_end_to_end() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();

  let record = s
    .record_semester("1BM23IS001".into(), 1, jane_sem1())
    .await
    .unwrap();
  let sgpa = record.sgpa.unwrap();
  assert!((sgpa - (10.0 * 4.0 + 7.0 * 3.0) / 7.0).abs() < 1e-9);

  let marks = s.semester_marks("1BM23IS001".into(), 1).await.unwrap();
  assert_eq!(marks.len(), 2);
  // Ordered by subject code.
  assert_eq!(marks[0].subject_code, "22CS1ESPOP");
  assert_eq!(marks[0].see, 30.0);
  assert_eq!(marks[0].total, 60.0);
  assert_eq!(marks[0].grade, Grade::BPlus);
  assert_eq!(marks[1].subject_code, "23MA1BSMCS");
  assert_eq!(marks[1].total, 90.0);
  assert_eq!(marks[1].grade, Grade::O);
  assert!(marks.iter().all(|m| m.semester_id == record.semester_id));

  let stored = s.get_semester("1BM23IS001".into(), 1).await.unwrap().unwrap();
  assert_eq!(stored.sgpa, Some(sgpa));
  assert_eq!(stored.semester_id, record.semester_id);
}

#[tokio::test]
async fn second_recording_is_rejected_without_changes() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.record_semester("1BM23IS001".into(), 1, jane_sem1()).await.unwrap();
  let before = s.stats().await.unwrap();

  let err = s
    .record_semester(
      "1BM23IS001".into(),
      1,
      vec![NewMark::new("23MA1BSMCS", 10, 10)],
    )
    .await
    .unwrap_err();
  assert_eq!(
    domain(err),
    DomainError::DuplicateSemester { usn: "1BM23IS001".into(), sem: 1 }
  );

  assert_eq!(s.stats().await.unwrap(), before);
  assert_eq!(s.semester_series("1BM23IS001".into()).await.unwrap().len(), 1);
  let marks = s.semester_marks("1BM23IS001".into(), 1).await.unwrap();
  assert_eq!(marks.len(), 2);
}

#[tokio::test]
async fn unknown_subject_rolls_back_everything() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();

  let mut marks = jane_sem1();
  marks.push(NewMark::new("99XX9NOPE", 40, 80));
  let err = s
    .record_semester("1BM23IS001".into(), 1, marks)
    .await
    .unwrap_err();
  assert_eq!(domain(err), DomainError::ReferentialError("99XX9NOPE".into()));

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.semesters, 0);
  assert_eq!(stats.marks, 0);
  assert!(s.get_semester("1BM23IS001".into(), 1).await.unwrap().is_none());

  // The semester is still free to record.
  s.record_semester("1BM23IS001".into(), 1, jane_sem1()).await.unwrap();
}

#[tokio::test]
async fn repeated_subject_in_one_submission_is_rejected() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  let err = s
    .record_semester(
      "1BM23IS001".into(),
      1,
      vec![
        NewMark::new("23MA1BSMCS", 45, 90),
        NewMark::new("23MA1BSMCS", 20, 40),
      ],
    )
    .await
    .unwrap_err();
  assert_eq!(
    domain(err),
    DomainError::DuplicateSubject { code: "23MA1BSMCS".into() }
  );
  assert_eq!(s.stats().await.unwrap().semesters, 0);
}

#[tokio::test]
async fn recording_for_unknown_student_is_not_found() {
  let s = store().await;
  let err = s
    .record_semester("1BM23IS404".into(), 1, jane_sem1())
    .await
    .unwrap_err();
  assert!(matches!(domain(err), DomainError::NotFound(_)));
  assert_eq!(s.stats().await.unwrap().semesters, 0);
}

#[tokio::test]
async fn student_and_semester_checks_precede_repeated_subject() {
  let s = store().await;
  let repeated = || {
    vec![
      NewMark::new("23MA1BSMCS", 45, 90),
      NewMark::new("23MA1BSMCS", 20, 40),
    ]
  };

  let err = s
    .record_semester("1BM23IS404".into(), 1, repeated())
    .await
    .unwrap_err();
  assert!(matches!(domain(err), DomainError::NotFound(_)));

  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.record_semester("1BM23IS001".into(), 1, jane_sem1()).await.unwrap();
  let err = s
    .record_semester("1BM23IS001".into(), 1, repeated())
    .await
    .unwrap_err();
  assert_eq!(
    domain(err),
    DomainError::DuplicateSemester { usn: "1BM23IS001".into(), sem: 1 }
  );
  assert_eq!(s.stats().await.unwrap().marks, 2);
}

#[tokio::test]
async fn input_order_does_not_change_sgpa() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.add_student(student("1BM23IS002", "Ravi")).await.unwrap();

  let marks = vec![
    NewMark::new("23MA2BSMCS", 41, 77),
    NewMark::new("22CY2BSCCS", 35, 62),
    NewMark::new("22ME2ESCED", 28, 90),
    NewMark::new("22MA2HSCIP", 12, 40),
  ];
  let mut reversed = marks.clone();
  reversed.reverse();

  let a = s.record_semester("1BM23IS001".into(), 2, marks).await.unwrap();
  let b = s.record_semester("1BM23IS002".into(), 2, reversed).await.unwrap();
  assert_eq!(a.sgpa, b.sgpa);
}

#[tokio::test]
async fn empty_submission_records_zero_sgpa() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  let record = s
    .record_semester("1BM23IS001".into(), 3, Vec::new())
    .await
    .unwrap();
  assert_eq!(record.sgpa, Some(0.0));
}

// ─── Removal ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remove_student_cascades() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.add_student(student("1BM23IS002", "Ravi")).await.unwrap();
  s.record_semester("1BM23IS001".into(), 1, jane_sem1()).await.unwrap();
  s.record_semester(
    "1BM23IS001".into(),
    2,
    vec![NewMark::new("23MA2BSMCS", 40, 80)],
  )
  .await
  .unwrap();
  s.record_semester("1BM23IS002".into(), 1, jane_sem1()).await.unwrap();

  s.remove_student("1BM23IS001".into()).await.unwrap();

  assert!(s.get_student("1BM23IS001".into()).await.unwrap().is_none());
  assert!(s.semester_series("1BM23IS001".into()).await.unwrap().is_empty());
  assert!(s.semester_marks("1BM23IS001".into(), 1).await.unwrap().is_empty());

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.students, 1);
  assert_eq!(stats.semesters, 1);
  assert_eq!(stats.marks, 2);

  // A re-enrolled student starts from a clean slate.
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.record_semester("1BM23IS001".into(), 1, jane_sem1()).await.unwrap();
}

#[tokio::test]
async fn remove_unknown_student_is_not_found() {
  let s = store().await;
  let err = s.remove_student("1BM23IS404".into()).await.unwrap_err();
  assert!(matches!(domain(err), DomainError::NotFound(_)));
}

// ─── Reporting queries ───────────────────────────────────────────────────────

#[tokio::test]
async fn semester_series_is_ordered() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.record_semester(
    "1BM23IS001".into(),
    2,
    vec![NewMark::new("23MA2BSMCS", 40, 80)],
  )
  .await
  .unwrap();
  s.record_semester("1BM23IS001".into(), 1, jane_sem1()).await.unwrap();

  let series = s.semester_series("1BM23IS001".into()).await.unwrap();
  let sems: Vec<u8> = series.iter().map(|p| p.sem_number).collect();
  assert_eq!(sems, [1, 2]);
  assert_eq!(series[1].sgpa, 9.0);
}

#[tokio::test]
async fn subject_average_spans_students() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.add_student(student("1BM23IS002", "Ravi")).await.unwrap();
  s.record_semester("1BM23IS001".into(), 1, jane_sem1()).await.unwrap();
  s.record_semester(
    "1BM23IS002".into(),
    1,
    vec![NewMark::new("23MA1BSMCS", 25, 51)],
  )
  .await
  .unwrap();

  let avg = s
    .subject_average("23MA1BSMCS".into(), 1)
    .await
    .unwrap()
    .unwrap();
  assert!((avg - (90.0 + 50.5) / 2.0).abs() < 1e-9);

  assert_eq!(s.subject_average("23MA1BSMCS".into(), 2).await.unwrap(), None);
  assert_eq!(s.subject_average("23IS3PCOPS".into(), 3).await.unwrap(), None);
}

#[tokio::test]
async fn summaries_rank_by_cgpa() {
  let s = store().await;
  s.add_student(student("1BM23IS001", "Jane")).await.unwrap();
  s.add_student(student("1BM23IS002", "Ravi")).await.unwrap();
  s.add_student(student("1BM23IS003", "Idle")).await.unwrap();
  s.record_semester(
    "1BM23IS001".into(),
    1,
    vec![NewMark::new("23MA1BSMCS", 20, 70)],
  )
  .await
  .unwrap();
  s.record_semester(
    "1BM23IS002".into(),
    1,
    vec![NewMark::new("23MA1BSMCS", 48, 100)],
  )
  .await
  .unwrap();

  let summaries = s.student_summaries().await.unwrap();
  assert_eq!(summaries.len(), 2);
  assert_eq!(summaries[0].usn, "1BM23IS002");
  assert_eq!(summaries[0].cgpa, 10.0);
  assert_eq!(summaries[0].avg_cie, 48.0);
  assert_eq!(summaries[1].usn, "1BM23IS001");
  assert_eq!(summaries[1].cgpa, 6.0);
}
