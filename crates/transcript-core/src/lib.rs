//! Core types and trait definitions for the transcript record store.
//!
//! Grade policy, SGPA arithmetic, the academic entity model and the
//! [`store::RecordStore`] abstraction live here. This crate performs no I/O;
//! storage backends and outer surfaces depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod grade;
pub mod record;
pub mod report;
pub mod sgpa;
pub mod store;

pub use error::{Error, RecordError, Result};
pub use grade::{Grade, grade_for};
pub use sgpa::sgpa;
