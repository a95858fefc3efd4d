//! Golden-vector conformance for the ctrlparity kernels
//!
//! ## Overview
//!
//! A kernel is conformant when, for every case in its vector directory, each
//! output element lies within the case's absolute tolerance of the golden
//! value. The same run captures the actual outputs as equivalence records so a
//! second implementation (another language, another toolchain) can be diffed
//! against this one out of band.
//!
//! ```text
//! vectors/<algorithm>/*.json
//!        │  discover (sorted, schema.json skipped)
//!        ▼
//!   TestSuiteDocument ──parse──▶ TestCase (tolerance resolved, arity checked)
//!        │
//!        ▼  run_suite: one kernel call per case
//!   (SuiteReport, Vec<EquivalenceRecord>)
//!        │
//!        ▼  write_artifact
//!   <output>/<algorithm>/rust_outputs.json ──compare_artifacts──▶ equivalence_report.json
//! ```
//!
//! ## Two-Phase API
//!
//! Running and exporting are separate calls. The artifact is written from
//! the records captured during the conformance pass, so the exported values
//! are exactly the values that were asserted on.
//!
//! ```no_run
//! use ctrlparity_conformance::{
//!     algorithm::KalmanFilter, artifact::write_artifact, runner::run_suite, HarnessConfig,
//! };
//!
//! let config = HarnessConfig::from_env();
//! let run = run_suite::<KalmanFilter>(&config)?;
//!
//! // Export regardless of the outcome
//! write_artifact(&config, run.report.suite, &run.records)?;
//! assert!(run.report.all_passed(), "{}", run.report);
//! # Ok::<(), ctrlparity_conformance::ConformanceError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod algorithm;
pub mod artifact;
pub mod compare;
pub mod config;
pub mod document;
pub mod errors;
pub mod number;
pub mod runner;
pub mod vectors;

// Public API
pub use algorithm::{Algorithm, KalmanFilter, LowPassFilter, PidController};
pub use artifact::{write_artifact, EquivalenceRecord, ARTIFACT_FILE_NAME};
pub use compare::{compare_artifact_files, compare_artifacts, write_report, EquivalenceReport, REPORT_FILE_NAME};
pub use config::HarnessConfig;
pub use errors::{ConformanceError, ConformanceResult, LoadIssue, LoadIssueKind};
pub use number::{FieldValue, Float, OutputField};
pub use runner::{run_suite, CaseResult, SuiteReport, SuiteRun};
