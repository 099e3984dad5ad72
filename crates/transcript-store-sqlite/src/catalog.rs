//! Built-in subject catalog, seeded into every new store.

use transcript_core::record::DEFAULT_BRANCH;

/// `(code, name, sem, credits)`.
pub const SUBJECTS: [(&str, &str, u8, u32); 22] = [
  ("23MA1BSMCS", "Mathematical Foundation For CS Stream-1", 1, 4),
  ("22PH1BSPCS", "Applied Physics for Computer Science Cluster", 1, 4),
  ("22CS1ESPOP", "Principles of programming in C", 1, 3),
  ("22EC1ESIEL", "Introduction to Electronics Engineering", 1, 3),
  ("22ME1AEIDT", "Innovation and Design Thinking", 1, 1),
  ("22MA1HSBAK", "Balake Kannada", 1, 1),
  ("22CS1ESPYP", "Introduction to PYTHON Programming", 1, 3),
  ("22MA1AECEN", "Communicative English", 1, 1),
  ("23MA2BSMCS", "Mathematical Foundation For CS Stream-2", 2, 4),
  ("22CY2BSCCS", "Applied Chemistry for Computer Science Engineering Stream", 2, 4),
  ("22ME2ESCED", "Computer Aided Engineering Drawing", 2, 3),
  ("22ME2ESIME", "Introduction to Mechanical Engineering", 2, 3),
  ("22EE2ESRES", "Renewable Energy Sources", 2, 3),
  ("22MA2HSCIP", "Constitution of India & Professional Ethics", 2, 1),
  ("23BT2AESFH", "Scientific Foundations for Health", 2, 1),
  ("23MA3BSSDM", "Statistics and Discrete Mathematics", 3, 3),
  ("23IS3PCCOA", "Computer Organization and Architecture", 3, 3),
  ("23IS3PCDSC", "Data Structures", 3, 4),
  ("23IS3PCOOP", "Object oriented Programming Using C++", 3, 4),
  ("23IS3PCDLD", "Digital Logic Design", 3, 3),
  ("23IS3PCOPS", "Operating Systems", 3, 4),
  ("23IS3AEUSP", "UNIX System Programming", 3, 1),
];

/// Insert any catalog rows that are not present yet.
pub fn seed(conn: &rusqlite::Connection) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare(
    "INSERT OR IGNORE INTO subjects (code, name, sem, branch, credits)
     VALUES (?1, ?2, ?3, ?4, ?5)",
  )?;
  let mut inserted = 0;
  for (code, name, sem, credits) in SUBJECTS {
    inserted += stmt.execute(rusqlite::params![code, name, sem, DEFAULT_BRANCH, credits])?;
  }
  Ok(inserted)
}
