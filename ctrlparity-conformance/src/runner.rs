//! Conformance runner
//!
//! Executes every loaded case exactly once, checks each expected field with
//! the case's resolved tolerance, and captures the actual outputs as
//! [`EquivalenceRecord`]s in the same pass. Failures are collected, never
//! fail-fast: one report lists every mismatch of every case.

use std::{fmt, path::PathBuf};

use ctrlparity_core::tolerance::{check_close, Closeness, ResolvedTolerance};
use log::{debug, error, info, warn};

use crate::{
    algorithm::Algorithm,
    artifact::EquivalenceRecord,
    config::HarnessConfig,
    errors::{ConformanceResult, LoadIssue},
    number::FieldValue,
    vectors::{load_suite, LoadedSuite, TestCase},
};

/// Why one expected field did not match
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    /// Finite values further apart than the tolerance
    Value {
        /// Element index (0 for scalars)
        index: usize,
        /// Kernel output
        actual: f64,
        /// Golden value
        expected: f64,
        /// `|actual − expected|`
        difference: f64,
        /// Tolerance it was checked against
        tolerance: f64,
    },
    /// Non-finite on one side, or non-finite of a different class
    NonFinite {
        /// Element index (0 for scalars)
        index: usize,
        /// Kernel output
        actual: f64,
        /// Golden value
        expected: f64,
    },
    /// Vector fields of different lengths
    Length {
        /// Golden length
        expected: usize,
        /// Kernel output length
        actual: usize,
    },
    /// Kernel produced no output with this name
    MissingField,
}

/// One mismatching field of one case
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Output field name
    pub field: String,
    /// What went wrong
    pub kind: MismatchKind,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MismatchKind::Value { index, actual, expected, difference, tolerance } => write!(
                f,
                "{}[{}]: actual {} vs expected {} (|diff| {:e} > tolerance {:e})",
                self.field, index, actual, expected, difference, tolerance
            ),
            MismatchKind::NonFinite { index, actual, expected } => write!(
                f,
                "{}[{}]: non-finite mismatch, actual {} vs expected {}",
                self.field, index, actual, expected
            ),
            MismatchKind::Length { expected, actual } => write!(
                f,
                "{}: length {} vs expected {}",
                self.field, actual, expected
            ),
            MismatchKind::MissingField => write!(f, "{}: missing from kernel output", self.field),
        }
    }
}

/// Verdict for one case
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    /// Case name
    pub name: String,
    /// Document the case came from
    pub source: PathBuf,
    /// Tolerance used
    pub tolerance: ResolvedTolerance,
    /// Every mismatching element or field
    pub mismatches: Vec<Mismatch>,
    /// Largest finite difference seen across all fields
    pub max_difference: f64,
}

impl CaseResult {
    /// True when no field mismatched
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Outcome of one suite run
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    /// Algorithm name
    pub suite: &'static str,
    /// Accepted documents
    pub documents: usize,
    /// Per-case results in discovery order
    pub cases: Vec<CaseResult>,
    /// Rejected documents
    pub issues: Vec<LoadIssue>,
    /// Non-fatal observations, e.g. an empty suite
    pub warnings: Vec<String>,
    /// Copied from [`HarnessConfig::require_cases`]
    pub require_cases: bool,
}

impl SuiteReport {
    /// Number of cases executed
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Number of cases that passed
    pub fn pass_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    /// No cases were executed
    pub fn is_vacuous(&self) -> bool {
        self.cases.is_empty()
    }

    /// Cases that failed
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.passed())
    }

    /// Every case passed, no document was rejected, and the suite is not
    /// vacuous when cases are required.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.issues.is_empty()
            && self.cases.iter().all(CaseResult::passed)
            && !(self.require_cases && self.is_vacuous())
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}/{} cases passed from {} document(s), {} rejected",
            self.suite,
            self.pass_count(),
            self.case_count(),
            self.documents,
            self.issues.len()
        )?;
        for issue in &self.issues {
            writeln!(f, "  rejected {}", issue)?;
        }
        for case in self.failures() {
            writeln!(f, "  FAIL {} ({})", case.name, case.source.display())?;
            for mismatch in &case.mismatches {
                writeln!(f, "    {}", mismatch)?;
            }
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {}", warning)?;
        }
        if self.require_cases && self.is_vacuous() {
            writeln!(f, "  FAIL no cases loaded and cases are required")?;
        }
        Ok(())
    }
}

/// Report plus the records captured while producing it
#[derive(Debug, Clone)]
pub struct SuiteRun {
    /// Pass/fail verdicts
    pub report: SuiteReport,
    /// Actual outputs, one per case, in discovery order
    pub records: Vec<EquivalenceRecord>,
}

/// Load and run every vector for `A`.
///
/// Only a missing vector directory is an error; rejected documents and
/// mismatches are part of the returned report.
pub fn run_suite<A: Algorithm>(config: &HarnessConfig) -> ConformanceResult<SuiteRun> {
    let loaded = load_suite::<A>(config)?;
    Ok(run_loaded(loaded, config.require_cases))
}

/// Run an already-loaded suite.
pub fn run_loaded<A: Algorithm>(loaded: LoadedSuite<A>, require_cases: bool) -> SuiteRun {
    let mut report = SuiteReport {
        suite: A::NAME,
        documents: loaded.documents,
        cases: Vec::with_capacity(loaded.cases.len()),
        issues: loaded.issues,
        warnings: Vec::new(),
        require_cases,
    };
    let mut records = Vec::with_capacity(loaded.cases.len());

    if loaded.cases.is_empty() {
        let message = if require_cases {
            format!("No {} test cases were loaded", A::NAME)
        } else {
            format!("No {} test cases were loaded; the suite passes vacuously", A::NAME)
        };
        warn!("{}", message);
        report.warnings.push(message);
    }

    for case in &loaded.cases {
        let (result, record) = run_case(case);
        if record.has_non_finite() {
            warn!("Case '{}' produced non-finite outputs", record.test_name);
        }
        report.cases.push(result);
        records.push(record);
    }

    info!(
        "{}: {}/{} cases passed, {} document(s) rejected",
        A::NAME,
        report.pass_count(),
        report.case_count(),
        report.issues.len()
    );

    SuiteRun { report, records }
}

/// Execute one case and check it.
pub fn run_case<A: Algorithm>(case: &TestCase<A>) -> (CaseResult, EquivalenceRecord) {
    let actual = A::execute(&case.invocation);
    let tolerance = case.tolerance.absolute;

    let mut mismatches = Vec::new();
    let mut max_difference = 0.0_f64;
    for expected in &case.expected {
        match actual.iter().find(|field| field.name == expected.name) {
            Some(field) => {
                max_difference = max_difference.max(compare_fields(
                    &expected.name,
                    &field.value,
                    &expected.value,
                    tolerance,
                    &mut mismatches,
                ));
            }
            None => mismatches.push(Mismatch {
                field: expected.name.clone(),
                kind: MismatchKind::MissingField,
            }),
        }
    }

    if mismatches.is_empty() {
        debug!("PASS {} (max |diff| {:e}, tolerance {:e})", case.name, max_difference, tolerance);
    } else {
        for mismatch in &mismatches {
            error!("FAIL {}: {}", case.name, mismatch);
        }
    }

    let result = CaseResult {
        name: case.name.clone(),
        source: case.source.clone(),
        tolerance: case.tolerance,
        mismatches,
        max_difference,
    };
    let record = EquivalenceRecord {
        test_name: case.name.clone(),
        outputs: actual,
        tolerance,
    };
    (result, record)
}

/// Compare one field element by element, pushing mismatches.
///
/// Returns the largest finite difference seen.
pub fn compare_fields(
    field: &str,
    actual: &FieldValue,
    expected: &FieldValue,
    tolerance: f64,
    mismatches: &mut Vec<Mismatch>,
) -> f64 {
    let (actual, expected) = (actual.elements(), expected.elements());
    if actual.len() != expected.len() {
        mismatches.push(Mismatch {
            field: field.to_string(),
            kind: MismatchKind::Length {
                expected: expected.len(),
                actual: actual.len(),
            },
        });
        return 0.0;
    }

    let mut max_difference = 0.0_f64;
    for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
        let kind = match check_close(a.get(), e.get(), tolerance) {
            Closeness::Within { difference } => {
                max_difference = max_difference.max(difference);
                continue;
            }
            Closeness::Exceeds { difference } => {
                max_difference = max_difference.max(difference);
                MismatchKind::Value {
                    index,
                    actual: a.get(),
                    expected: e.get(),
                    difference,
                    tolerance,
                }
            }
            Closeness::NonFinite => MismatchKind::NonFinite {
                index,
                actual: a.get(),
                expected: e.get(),
            },
        };
        mismatches.push(Mismatch {
            field: field.to_string(),
            kind,
        });
    }
    max_difference
}
