//! Error types for the conformance harness
//!
//! Two tiers:
//!
//! - [`ConformanceError`] is fatal to a run: the vector directory is missing,
//!   or an artifact/report cannot be written or read.
//! - [`LoadIssue`] is local to one document. The document is rejected, the
//!   issue lands in the suite report, and the other documents keep loading.
//!
//! Assertion mismatches are neither: they are recorded per case in the
//! [`SuiteReport`](crate::runner::SuiteReport).

use std::{io, path::PathBuf};

use ctrlparity_core::{InvocationError, ToleranceError};
use thiserror::Error;

/// Result type for fatal harness operations
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Fatal harness errors
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The algorithm's vector directory could not be listed
    #[error("Cannot read vector directory {}: {source}", .path.display())]
    VectorsDirectory {
        /// Directory that was scanned
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Writing or reading an artifact or report failed
    #[error("Artifact I/O failed for {}: {source}", .path.display())]
    ArtifactIo {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// An artifact or report could not be encoded or decoded
    #[error("Artifact {} is not valid: {source}", .path.display())]
    ArtifactFormat {
        /// File involved
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

/// A rejected vector document
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}: {kind}", .path.display())]
pub struct LoadIssue {
    /// Document that was rejected
    pub path: PathBuf,
    /// Why it was rejected
    pub kind: LoadIssueKind,
}

/// Reasons a vector document is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadIssueKind {
    /// File could not be read
    #[error("unreadable: {0}")]
    Unreadable(String),

    /// Not valid JSON
    #[error("malformed JSON: {0}")]
    Malformed(String),

    /// Valid JSON, but a required field is missing or has the wrong type
    #[error("schema violation: {0}")]
    Schema(String),

    /// Inputs do not fit the kernel's fixed arity
    #[error("case '{case}': {error}")]
    Invocation {
        /// Offending case
        case: String,
        /// Arity failure
        error: InvocationError,
    },

    /// Suite or case tolerance is negative or non-finite
    #[error("{scope} tolerance: {error}")]
    Tolerance {
        /// `"global"` or `"case '<name>'"`
        scope: String,
        /// Tolerance failure
        error: ToleranceError,
    },

    /// Case name already used earlier in the run
    #[error("duplicate case name '{0}'")]
    DuplicateName(String),

    /// Case name is empty
    #[error("case name is empty")]
    EmptyName,
}

impl LoadIssueKind {
    /// Classify a `serde_json` parse failure.
    pub fn from_json(err: &serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => Self::Schema(err.to_string()),
            serde_json::error::Category::Io => Self::Unreadable(err.to_string()),
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                Self::Malformed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_classified() {
        let syntax = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        assert!(matches!(LoadIssueKind::from_json(&syntax), LoadIssueKind::Malformed(_)));

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            name: String,
        }
        let data = serde_json::from_str::<Needs>("{}").unwrap_err();
        let kind = LoadIssueKind::from_json(&data);
        assert!(matches!(&kind, LoadIssueKind::Schema(msg) if msg.contains("name")));
    }

    #[test]
    fn issue_display_names_the_document() {
        let issue = LoadIssue {
            path: PathBuf::from("vectors/pid_controller/bad.json"),
            kind: LoadIssueKind::DuplicateName("step".to_string()),
        };
        assert_eq!(issue.to_string(), "vectors/pid_controller/bad.json: duplicate case name 'step'");
    }
}
