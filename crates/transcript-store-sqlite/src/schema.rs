//! SQL schema for the transcript SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS students (
    usn     TEXT PRIMARY KEY,
    name    TEXT NOT NULL,
    branch  TEXT NOT NULL,
    sem     INTEGER NOT NULL
);

-- At most one record per (student, semester). Rows are never updated after
-- the recording transaction commits.
CREATE TABLE IF NOT EXISTS semesters (
    semester_id INTEGER PRIMARY KEY AUTOINCREMENT,
    usn         TEXT NOT NULL REFERENCES students(usn),
    sem_number  INTEGER NOT NULL,
    sgpa        REAL,            -- NULL only inside the recording transaction
    recorded_at TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    UNIQUE (usn, sem_number)
);

-- Reference data; seeded from the built-in catalog.
CREATE TABLE IF NOT EXISTS subjects (
    code    TEXT PRIMARY KEY,
    name    TEXT NOT NULL,
    sem     INTEGER NOT NULL,
    branch  TEXT NOT NULL,
    credits INTEGER NOT NULL CHECK (credits > 0)
);

-- `see` is already halved; `total` and `grade` are fixed at insertion.
CREATE TABLE IF NOT EXISTS marks (
    mark_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    semester_id  INTEGER NOT NULL REFERENCES semesters(semester_id),
    subject_code TEXT NOT NULL REFERENCES subjects(code),
    cie          INTEGER NOT NULL,
    see          REAL NOT NULL,
    total        REAL NOT NULL,
    grade        TEXT NOT NULL,
    UNIQUE (semester_id, subject_code)
);

CREATE INDEX IF NOT EXISTS semesters_usn_idx  ON semesters(usn);
CREATE INDEX IF NOT EXISTS marks_subject_idx  ON marks(subject_code);
CREATE INDEX IF NOT EXISTS subjects_sem_idx   ON subjects(sem);

PRAGMA user_version = 1;
";
