//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};
use transcript_core::{
  Error as DomainError,
  record::{Mark, NewMark, SemesterRecord, Student, Subject},
  report::{SemesterPoint, StoreStats, StudentSummary},
  sgpa,
  store::RecordStore,
};

use crate::{
  Result, catalog,
  encode::{RawMark, decode_dt, encode_dt, student_from_row, subject_from_row},
  schema::SCHEMA,
};

/// Outcome of a closure that may reject the request on domain grounds after
/// touching the database. A rejection drops the open transaction, rolling it
/// back.
type Checked<T> = std::result::Result<T, DomainError>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An academic record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, initialise the schema and seed the
  /// subject catalog.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    let seeded = self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(catalog::seed(conn)?)
      })
      .await?;
    debug!(seeded, "schema ready");
    Ok(())
  }
}

/// Reject a submission that names the same subject twice.
fn check_distinct_subjects(marks: &[NewMark]) -> Checked<()> {
  let mut seen = HashSet::new();
  for m in marks {
    if !seen.insert(m.subject_code.as_str()) {
      return Err(DomainError::DuplicateSubject { code: m.subject_code.clone() });
    }
  }
  Ok(())
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn add_student(&self, student: Student) -> Result<Student> {
    let row = student.clone();

    let outcome: Checked<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM students WHERE usn = ?1",
            rusqlite::params![row.usn],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if exists {
          return Ok(Err(DomainError::DuplicateKey(row.usn)));
        }

        tx.execute(
          "INSERT INTO students (usn, name, branch, sem) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![row.usn, row.name, row.branch, row.sem],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;
    outcome?;

    info!(usn = %student.usn, sem = student.sem, "student added");
    Ok(student)
  }

  async fn record_semester(
    &self,
    usn:        String,
    sem_number: u8,
    marks:      Vec<NewMark>,
  ) -> Result<SemesterRecord> {
    let recorded_at = Utc::now();
    let at_str      = encode_dt(recorded_at);
    let owner       = usn.clone();

    let outcome: Checked<(i64, f64)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let student_exists = tx
          .query_row(
            "SELECT 1 FROM students WHERE usn = ?1",
            rusqlite::params![owner],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !student_exists {
          return Ok(Err(DomainError::NotFound(format!("student {owner}"))));
        }

        let already = tx
          .query_row(
            "SELECT semester_id FROM semesters WHERE usn = ?1 AND sem_number = ?2",
            rusqlite::params![owner, sem_number],
            |r| r.get::<_, i64>(0),
          )
          .optional()?;
        if already.is_some() {
          return Ok(Err(DomainError::DuplicateSemester { usn: owner, sem: sem_number }));
        }
        if let Err(e) = check_distinct_subjects(&marks) {
          return Ok(Err(e));
        }

        tx.execute(
          "INSERT INTO semesters (usn, sem_number, sgpa, recorded_at)
           VALUES (?1, ?2, NULL, ?3)",
          rusqlite::params![owner, sem_number, at_str],
        )?;
        let semester_id = tx.last_insert_rowid();

        for m in &marks {
          let known = tx
            .query_row(
              "SELECT 1 FROM subjects WHERE code = ?1",
              rusqlite::params![m.subject_code],
              |_| Ok(()),
            )
            .optional()?
            .is_some();
          if !known {
            return Ok(Err(DomainError::ReferentialError(m.subject_code.clone())));
          }

          let derived = m.derive();
          tx.execute(
            "INSERT INTO marks (semester_id, subject_code, cie, see, total, grade)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              semester_id,
              m.subject_code,
              m.cie,
              derived.see,
              derived.total,
              derived.grade.letter(),
            ],
          )?;
        }

        // SGPA over exactly the rows just inserted, joined with catalog credits.
        let weighted: Vec<(String, u32)> = {
          let mut stmt = tx.prepare(
            "SELECT m.grade, s.credits
             FROM marks m
             JOIN subjects s ON s.code = m.subject_code
             WHERE m.semester_id = ?1",
          )?;
          stmt
            .query_map(rusqlite::params![semester_id], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        let semester_gpa = sgpa(weighted);

        tx.execute(
          "UPDATE semesters SET sgpa = ?1 WHERE semester_id = ?2",
          rusqlite::params![semester_gpa, semester_id],
        )?;
        tx.commit()?;
        Ok(Ok((semester_id, semester_gpa)))
      })
      .await?;
    let (semester_id, semester_gpa) = outcome?;

    info!(%usn, sem = sem_number, semester_id, sgpa = semester_gpa, "semester recorded");
    Ok(SemesterRecord {
      semester_id,
      usn,
      sem_number,
      sgpa: Some(semester_gpa),
      recorded_at,
    })
  }

  async fn remove_student(&self, usn: String) -> Result<()> {
    let target = usn.clone();

    let outcome: Checked<(usize, usize)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM students WHERE usn = ?1",
            rusqlite::params![target],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(Err(DomainError::NotFound(format!("student {target}"))));
        }

        // Children first so no foreign key is ever left dangling.
        let marks = tx.execute(
          "DELETE FROM marks WHERE semester_id IN
             (SELECT semester_id FROM semesters WHERE usn = ?1)",
          rusqlite::params![target],
        )?;
        let semesters = tx.execute(
          "DELETE FROM semesters WHERE usn = ?1",
          rusqlite::params![target],
        )?;
        tx.execute("DELETE FROM students WHERE usn = ?1", rusqlite::params![target])?;
        tx.commit()?;
        Ok(Ok((semesters, marks)))
      })
      .await?;
    let (semesters, marks) = outcome?;

    info!(%usn, semesters, marks, "student removed");
    Ok(())
  }

  // ── Catalog and students ──────────────────────────────────────────────────

  async fn list_subjects(&self, sem: Option<u8>) -> Result<Vec<Subject>> {
    let subjects = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT code, name, sem, branch, credits
           FROM subjects
           WHERE ?1 IS NULL OR sem = ?1
           ORDER BY code",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![sem], subject_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(subjects)
  }

  async fn get_student(&self, usn: String) -> Result<Option<Student>> {
    let student = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT usn, name, branch, sem FROM students WHERE usn = ?1",
            rusqlite::params![usn],
            student_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(student)
  }

  async fn list_students(&self, with_records: bool) -> Result<Vec<Student>> {
    let students = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT st.usn, st.name, st.branch, st.sem
           FROM students st
           WHERE ?1 = 0
              OR EXISTS (SELECT 1 FROM semesters se WHERE se.usn = st.usn)
           ORDER BY st.usn",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![with_records], student_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(students)
  }

  // ── Reporting queries ─────────────────────────────────────────────────────

  async fn get_semester(
    &self,
    usn:        String,
    sem_number: u8,
  ) -> Result<Option<SemesterRecord>> {
    let raw: Option<(i64, String, u8, Option<f64>, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT semester_id, usn, sem_number, sgpa, recorded_at
             FROM semesters
             WHERE usn = ?1 AND sem_number = ?2",
            rusqlite::params![usn, sem_number],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(semester_id, usn, sem_number, sgpa, at)| -> Result<SemesterRecord> {
        Ok(SemesterRecord {
          semester_id,
          usn,
          sem_number,
          sgpa,
          recorded_at: decode_dt(&at)?,
        })
      })
      .transpose()
  }

  async fn semester_series(&self, usn: String) -> Result<Vec<SemesterPoint>> {
    let series = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT sem_number, sgpa
           FROM semesters
           WHERE usn = ?1 AND sgpa IS NOT NULL
           ORDER BY sem_number",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![usn], |r| {
            Ok(SemesterPoint { sem_number: r.get(0)?, sgpa: r.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(series)
  }

  async fn semester_marks(&self, usn: String, sem_number: u8) -> Result<Vec<Mark>> {
    let raws: Vec<RawMark> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT m.mark_id, m.semester_id, m.subject_code,
                  m.cie, m.see, m.total, m.grade
           FROM semesters s
           JOIN marks m ON m.semester_id = s.semester_id
           WHERE s.usn = ?1 AND s.sem_number = ?2
           ORDER BY m.subject_code",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![usn, sem_number], RawMark::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMark::into_mark).collect()
  }

  async fn subject_average(
    &self,
    subject_code: String,
    sem_number:   u8,
  ) -> Result<Option<f64>> {
    let average = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(m.total)
           FROM semesters s
           JOIN marks m ON m.semester_id = s.semester_id
           WHERE m.subject_code = ?1 AND s.sem_number = ?2",
          rusqlite::params![subject_code, sem_number],
          |r| r.get::<_, Option<f64>>(0),
        )?)
      })
      .await?;
    Ok(average)
  }

  async fn student_summaries(&self) -> Result<Vec<StudentSummary>> {
    let summaries = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT st.usn, st.name,
                  (SELECT AVG(se.sgpa) FROM semesters se WHERE se.usn = st.usn) AS cgpa,
                  (SELECT AVG(m.cie)
                     FROM semesters se
                     JOIN marks m ON m.semester_id = se.semester_id
                    WHERE se.usn = st.usn) AS avg_cie
           FROM students st
           WHERE EXISTS (SELECT 1 FROM semesters se WHERE se.usn = st.usn)
           ORDER BY cgpa DESC, st.usn",
        )?;
        let rows = stmt
          .query_map([], |r| {
            Ok(StudentSummary {
              usn:     r.get(0)?,
              name:    r.get(1)?,
              cgpa:    r.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
              avg_cie: r.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(summaries)
  }

  async fn stats(&self) -> Result<StoreStats> {
    let stats = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<u64> {
          let n: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
          Ok(n as u64)
        };
        Ok(StoreStats {
          students:  count("students")?,
          semesters: count("semesters")?,
          marks:     count("marks")?,
        })
      })
      .await?;
    Ok(stats)
  }
}
