//! Vector discovery and loading
//!
//! ## Loading rules
//!
//! - Every file in `<vectors_root>/<algorithm>/` with the document extension
//!   is a vector document, except the reserved schema file.
//! - Documents are processed in file-name order. Cases keep document order.
//! - A document is accepted or rejected as a whole. Rejection reasons are
//!   unreadable file, invalid JSON, missing/mistyped fields, unknown input
//!   keys, wrong input arity, bad tolerance, empty or duplicate case names.
//! - A rejected document becomes a [`LoadIssue`]; loading continues with the
//!   next document.
//!
//! A missing or unlistable directory is fatal and returns
//! [`ConformanceError::VectorsDirectory`].

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use ctrlparity_core::tolerance::{resolve_tolerance, validate_tolerance, ResolvedTolerance};
use log::{error, info};

use crate::{
    algorithm::Algorithm,
    config::HarnessConfig,
    document::TestSuiteDocument,
    errors::{ConformanceError, ConformanceResult, LoadIssue, LoadIssueKind},
    number::OutputField,
};

/// One normalized case, ready to run
#[derive(Debug, Clone)]
pub struct TestCase<A: Algorithm> {
    /// Case name, unique across the run
    pub name: String,
    /// Free-form description from the document
    pub description: Option<String>,
    /// Document the case came from
    pub source: PathBuf,
    /// Arity-checked kernel arguments
    pub invocation: A::Invocation,
    /// Golden outputs
    pub expected: Vec<OutputField>,
    /// Tolerance after case → suite → default resolution
    pub tolerance: ResolvedTolerance,
}

/// Everything loaded for one algorithm
#[derive(Debug, Clone)]
pub struct LoadedSuite<A: Algorithm> {
    /// Documents that were accepted
    pub documents: usize,
    /// Accepted cases in discovery order
    pub cases: Vec<TestCase<A>>,
    /// Rejected documents
    pub issues: Vec<LoadIssue>,
}

impl<A: Algorithm> Default for LoadedSuite<A> {
    fn default() -> Self {
        Self {
            documents: 0,
            cases: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// List the vector documents in `dir`, sorted by file name.
pub fn discover_documents(config: &HarnessConfig, dir: &Path) -> ConformanceResult<Vec<PathBuf>> {
    let to_error = |source: io::Error| ConformanceError::VectorsDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut documents = Vec::new();
    for entry in fs::read_dir(dir).map_err(to_error)? {
        let path = entry.map_err(to_error)?.path();
        if path.is_file() && config.is_vector_document(&path) {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

/// Parse and normalize one document. Pure: no file access, no logging.
pub fn parse_document<A: Algorithm>(source: &Path, text: &str) -> Result<Vec<TestCase<A>>, LoadIssueKind> {
    let document: TestSuiteDocument<A::Inputs, A::Expected> =
        serde_json::from_str(text).map_err(|e| LoadIssueKind::from_json(&e))?;

    let suite_tolerance = document
        .suite_tolerance()
        .map(validate_tolerance)
        .transpose()
        .map_err(|error| LoadIssueKind::Tolerance {
            scope: "global".to_string(),
            error,
        })?;

    let mut cases = Vec::with_capacity(document.test_cases.len());
    for case in document.test_cases {
        if case.name.trim().is_empty() {
            return Err(LoadIssueKind::EmptyName);
        }

        let case_tolerance = case
            .case_tolerance()
            .map(validate_tolerance)
            .transpose()
            .map_err(|error| LoadIssueKind::Tolerance {
                scope: format!("case '{}'", case.name),
                error,
            })?;

        let invocation = A::prepare(case.inputs).map_err(|error| LoadIssueKind::Invocation {
            case: case.name.clone(),
            error,
        })?;

        cases.push(TestCase {
            tolerance: resolve_tolerance(case_tolerance, suite_tolerance),
            expected: A::expected_fields(case.expected_output),
            name: case.name,
            description: case.description,
            source: source.to_path_buf(),
            invocation,
        });
    }

    Ok(cases)
}

/// Load every document for `A`, rejecting bad documents individually.
pub fn load_suite<A: Algorithm>(config: &HarnessConfig) -> ConformanceResult<LoadedSuite<A>> {
    let dir = config.suite_dir(A::NAME);
    let mut suite = LoadedSuite::default();
    let mut seen_names: HashSet<String> = HashSet::new();

    for path in discover_documents(config, &dir)? {
        let outcome = fs::read_to_string(&path)
            .map_err(|e| LoadIssueKind::Unreadable(e.to_string()))
            .and_then(|text| parse_document::<A>(&path, &text))
            .and_then(|cases| claim_names(&mut seen_names, cases));

        match outcome {
            Ok(cases) => {
                info!("Loaded {} {} case(s) from {}", cases.len(), A::NAME, path.display());
                suite.documents += 1;
                suite.cases.extend(cases);
            }
            Err(kind) => {
                let issue = LoadIssue { path, kind };
                error!("Rejected vector document {}", issue);
                suite.issues.push(issue);
            }
        }
    }

    Ok(suite)
}

/// Reserve the document's case names, or reject it if any is already taken.
fn claim_names<A: Algorithm>(
    seen: &mut HashSet<String>,
    cases: Vec<TestCase<A>>,
) -> Result<Vec<TestCase<A>>, LoadIssueKind> {
    let mut local: HashSet<&str> = HashSet::new();
    for case in &cases {
        if seen.contains(&case.name) || !local.insert(case.name.as_str()) {
            return Err(LoadIssueKind::DuplicateName(case.name.clone()));
        }
    }
    seen.extend(cases.iter().map(|c| c.name.clone()));
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{LowPassFilter, PidController};
    use ctrlparity_core::{tolerance::ToleranceSource, ToleranceError};

    const PID_DOC: &str = r#"{
        "global_tolerance": {"absolute": 1e-6},
        "test_cases": [
            {"name": "suite_tol",
             "inputs": {"error": 2, "integral": 1.8, "prev_error": 1.5, "kp": 1, "ki": 0.5, "kd": 0.1, "dt": 0.1},
             "expected_output": {"output": 3.1, "new_integral": 2.0, "new_prev_error": 2.0}},
            {"name": "case_tol", "tolerance": {"absolute": 1e-3},
             "inputs": {"error": 0, "integral": 0, "prev_error": 0, "kp": 1, "ki": 1, "kd": 1, "dt": 1},
             "expected_output": {"output": 0, "new_integral": 0, "new_prev_error": 0}}
        ]
    }"#;

    #[test]
    fn tolerances_resolve_case_then_suite() {
        let cases = parse_document::<PidController>(Path::new("pid.json"), PID_DOC).unwrap();
        assert_eq!(cases[0].tolerance.absolute, 1e-6);
        assert_eq!(cases[0].tolerance.source, ToleranceSource::Suite);
        assert_eq!(cases[1].tolerance.absolute, 1e-3);
        assert_eq!(cases[1].tolerance.source, ToleranceSource::Case);
        assert_eq!(cases[1].source, PathBuf::from("pid.json"));
    }

    #[test]
    fn default_tolerance_when_document_is_silent() {
        let doc = r#"{"test_cases": [{"name": "a", "inputs": {"input_signal": [1], "alpha": 0.5},
                      "expected_output": {"output_signal": [1]}}]}"#;
        let cases = parse_document::<LowPassFilter>(Path::new("lp.json"), doc).unwrap();
        assert_eq!(cases[0].tolerance.absolute, 1e-10);
        assert_eq!(cases[0].tolerance.source, ToleranceSource::Default);
    }

    #[test]
    fn negative_global_tolerance_is_rejected() {
        let doc = r#"{"global_tolerance": {"absolute": -1.0}, "test_cases": []}"#;
        let err = parse_document::<LowPassFilter>(Path::new("lp.json"), doc).unwrap_err();
        assert_eq!(
            err,
            LoadIssueKind::Tolerance {
                scope: "global".to_string(),
                error: ToleranceError::Negative { value: -1.0 },
            }
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let doc = r#"{"test_cases": [{"name": " ", "inputs": {"input_signal": [], "alpha": 0.5},
                      "expected_output": {"output_signal": []}}]}"#;
        let err = parse_document::<LowPassFilter>(Path::new("lp.json"), doc).unwrap_err();
        assert_eq!(err, LoadIssueKind::EmptyName);
    }

    #[test]
    fn duplicate_names_within_a_document_are_rejected() {
        let mut seen = HashSet::new();
        let doc = r#"{"test_cases": [
            {"name": "a", "inputs": {"input_signal": [], "alpha": 0.5}, "expected_output": {"output_signal": []}},
            {"name": "a", "inputs": {"input_signal": [], "alpha": 0.5}, "expected_output": {"output_signal": []}}
        ]}"#;
        let cases = parse_document::<LowPassFilter>(Path::new("lp.json"), doc).unwrap();
        let err = claim_names(&mut seen, cases).unwrap_err();
        assert_eq!(err, LoadIssueKind::DuplicateName("a".to_string()));
        assert!(seen.is_empty());
    }
}
