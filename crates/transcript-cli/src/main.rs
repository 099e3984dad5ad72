//! `transcript`: operator tool for the academic record store.
//!
//! # Usage
//!
//! ```text
//! transcript add-student 1BM23IS001 "Jane" --sem 4
//! transcript record 1BM23IS001 1 --mark 23MA1BSMCS=45,90 --mark 22CS1ESPOP=30,60
//! transcript report 1BM23IS001
//! transcript trends
//! transcript serve --port 8501
//! ```

mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use settings::Settings;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use transcript_core::{
  Error as DomainError, RecordError,
  record::{NewMark, Student, normalize_usn, validate_semester},
  report::PerformanceReport,
  store::{RecordStore, compare_semester, performance_report},
};
use transcript_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "transcript", version, about = "Student marks, SGPA and performance reports")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "transcript.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List catalog subjects.
  Subjects {
    #[arg(long)]
    sem: Option<i64>,
  },
  /// Enrol a new student.
  AddStudent {
    usn:    String,
    name:   String,
    /// Current semester (1-8).
    #[arg(long)]
    sem:    i64,
    /// Defaults to the configured branch.
    #[arg(long)]
    branch: Option<String>,
  },
  /// Record one semester's marks; computes and stores the SGPA.
  Record {
    usn:   String,
    sem:   i64,
    /// `CODE=CIE,SEE` with CIE out of 50 and SEE out of 100. Repeatable.
    #[arg(long = "mark", value_parser = parse_mark, required = true)]
    marks: Vec<NewMark>,
  },
  /// Remove a student together with every recorded semester.
  Remove { usn: String },
  /// SGPA trajectory, CGPA and best semester for one student.
  Report { usn: String },
  /// Subject totals for one semester against the cohort average.
  Compare { usn: String, sem: i64 },
  /// CGPA ranking of every student with recorded semesters.
  Summary,
  /// SGPA and running CGPA per semester for every student with records.
  Trends,
  /// Row counts.
  Stats,
  /// Serve the JSON API.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

/// Parse `CODE=CIE,SEE`.
fn parse_mark(s: &str) -> Result<NewMark, String> {
  let (code, scores) = s
    .split_once('=')
    .ok_or_else(|| format!("expected CODE=CIE,SEE, got {s:?}"))?;
  let (cie, see) = scores
    .split_once(',')
    .ok_or_else(|| format!("expected CIE,SEE after '=', got {scores:?}"))?;
  let cie = cie.trim().parse().map_err(|e| format!("CIE {cie:?}: {e}"))?;
  let see = see.trim().parse().map_err(|e| format!("SEE {see:?}: {e}"))?;
  Ok(NewMark::new(code.trim(), cie, see))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  run(cli.command, store, &settings).await
}

async fn run(command: Command, store: SqliteStore, settings: &Settings) -> Result<()> {
  match command {
    Command::Subjects { sem } => {
      let sem = sem.map(validate_semester).transpose()?;
      println!("{}", render::subjects(&store.list_subjects(sem).await?));
    }

    Command::AddStudent { usn, name, sem, branch } => {
      let student = Student {
        usn: normalize_usn(&usn),
        name: name.trim().to_owned(),
        branch: branch.unwrap_or_else(|| settings.branch.clone()),
        sem: validate_semester(sem)?,
      };
      let student = store.add_student(student).await.map_err(describe)?;
      println!("Student {} ({}) added.", student.name, student.usn);
    }

    Command::Record { usn, sem, marks } => {
      let sem = validate_semester(sem)?;
      for mark in &marks {
        mark.validate()?;
      }
      let usn = normalize_usn(&usn);
      let record = store
        .record_semester(usn.clone(), sem, marks)
        .await
        .map_err(describe)?;
      println!(
        "Semester {sem} saved! SGPA: {:.2}",
        record.sgpa.unwrap_or_default()
      );
      println!("{}", render::marks(&store.semester_marks(usn, sem).await?));
    }

    Command::Remove { usn } => {
      let usn = normalize_usn(&usn);
      match store.remove_student(usn.clone()).await {
        Ok(()) => println!("Student {usn} removed."),
        Err(e) if matches!(e.record_error(), Some(DomainError::NotFound(_))) => {
          println!("No student {usn}; nothing to remove.");
        }
        Err(e) => return Err(e.into()),
      }
    }

    Command::Report { usn } => {
      let usn = normalize_usn(&usn);
      let report = performance_report(&store, &usn)
        .await?
        .ok_or_else(|| describe(DomainError::NotFound(format!("student {usn}"))))?;
      println!("{}", render::report(&report));
    }

    Command::Compare { usn, sem } => {
      let sem = validate_semester(sem)?;
      let rows = compare_semester(&store, &normalize_usn(&usn), sem).await?;
      if rows.is_empty() {
        println!("No marks recorded for semester {sem}.");
      } else {
        println!("{}", render::comparison(&rows));
      }
    }

    Command::Summary => {
      let rows = store.student_summaries().await?;
      if rows.is_empty() {
        println!("Add students with recorded semesters to see a comparison.");
      } else {
        println!("{}", render::summary(&rows));
      }
    }

    Command::Trends => {
      let mut reports = Vec::new();
      for student in store.list_students(true).await? {
        let series = store.semester_series(student.usn.clone()).await?;
        reports.push(PerformanceReport::build(student, series));
      }
      if reports.is_empty() {
        println!("Add students with recorded semesters to see their trends.");
      } else {
        println!("{}", render::trends(&reports));
      }
    }

    Command::Stats => println!("{}", render::stats(&store.stats().await?)),

    Command::Serve { host, port } => {
      let host = host.unwrap_or_else(|| settings.host.clone());
      let port = port.unwrap_or(settings.port);
      let app = transcript_api::api_router(Arc::new(store));
      let address = format!("{host}:{port}");

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app).await.context("server error")?;
    }
  }
  Ok(())
}

/// Turn a store rejection into the message shown to the operator.
fn describe<E: RecordError>(err: E) -> anyhow::Error {
  let message = match err.record_error() {
    Some(DomainError::DuplicateKey(usn)) => {
      format!("Student {usn} already exists.")
    }
    Some(DomainError::DuplicateSemester { usn, sem }) => {
      format!("Data already exists for semester {sem} of {usn}.")
    }
    Some(DomainError::NotFound(what)) => format!("No such {what}."),
    Some(DomainError::ReferentialError(code)) => {
      format!("Unknown subject code {code}; see `transcript subjects`.")
    }
    Some(other) => other.to_string(),
    None => return anyhow::Error::new(err),
  };
  anyhow::anyhow!(message)
}
