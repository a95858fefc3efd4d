//! Cross-implementation equivalence comparison
//!
//! Diffs a reference artifact against a candidate artifact produced by
//! another implementation of the same kernels. Records are paired by
//! `test_name`; every `actual_*` field is compared element by element using
//! the reference record's tolerance.
//!
//! Relative error is only taken where `|reference| > 1e-15`, so exact zeros
//! in the reference do not blow it up.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use ctrlparity_core::{
    constants::RELATIVE_ERROR_FLOOR,
    tolerance::{check_close, Closeness},
};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::{
    artifact::{read_artifact, write_json_atomic, EquivalenceRecord},
    config::HarnessConfig,
    errors::ConformanceResult,
};

/// Report file name inside each algorithm directory
pub const REPORT_FILE_NAME: &str = "equivalence_report.json";

/// Verdict for one paired case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseComparison {
    /// Case name
    pub test_name: String,
    /// Every element within tolerance and every field present
    pub passed: bool,
    /// Largest finite absolute error in this case
    pub max_absolute_error: f64,
    /// Reference tolerance (0 when the case is missing from the reference)
    pub tolerance: f64,
    /// Why the case failed, empty when it passed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Outcome of comparing two artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceReport {
    /// Algorithm name
    pub algorithm: String,
    /// Every case passed and both artifacts hold the same cases
    pub all_passed: bool,
    /// Cases seen in either artifact
    pub total_tests: usize,
    /// Cases that passed
    pub passed_tests: usize,
    /// Cases that failed
    pub failed_tests: usize,
    /// Largest finite absolute error over all cases
    pub max_absolute_error: f64,
    /// Largest relative error over elements with `|reference| > 1e-15`
    pub max_relative_error: f64,
    /// Per-case verdicts, reference order then candidate-only cases
    pub details: Vec<CaseComparison>,
}

impl fmt::Display for EquivalenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}/{} equivalent (max abs {:e}, max rel {:e})",
            self.algorithm, self.passed_tests, self.total_tests, self.max_absolute_error, self.max_relative_error
        )?;
        for case in self.details.iter().filter(|c| !c.passed) {
            writeln!(f, "  FAIL {}", case.test_name)?;
            for note in &case.notes {
                writeln!(f, "    {}", note)?;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct ErrorStats {
    max_absolute: f64,
    max_relative: f64,
}

/// Compare a candidate artifact against the reference.
///
/// A `test_name` that occurs more than once in either artifact fails every
/// record carrying it. Each candidate copy is still diffed so its error shows
/// up in the statistics.
pub fn compare_artifacts(
    algorithm: &str,
    reference: &[EquivalenceRecord],
    candidate: &[EquivalenceRecord],
) -> EquivalenceReport {
    let candidates = index_by_name(candidate);
    let references = index_by_name(reference);

    let mut stats = ErrorStats::default();
    let mut details = Vec::with_capacity(reference.len());

    for reference_record in reference {
        let name = reference_record.test_name.as_str();
        let matches = candidates.get(name).map(Vec::as_slice).unwrap_or_default();
        let mut comparison = CaseComparison {
            test_name: reference_record.test_name.clone(),
            passed: false,
            max_absolute_error: 0.0,
            tolerance: reference_record.tolerance,
            notes: Vec::new(),
        };

        if matches.is_empty() {
            comparison.notes.push("missing from candidate artifact".to_string());
        }
        for candidate_record in matches {
            let single = compare_records(reference_record, candidate_record, &mut stats);
            comparison.max_absolute_error = comparison.max_absolute_error.max(single.max_absolute_error);
            comparison.notes.extend(single.notes);
        }
        if matches.len() > 1 {
            comparison.notes.push(duplicate_note("candidate", matches.len()));
        }
        if let Some(copies) = references.get(name).filter(|r| r.len() > 1) {
            comparison.notes.push(duplicate_note("reference", copies.len()));
        }

        comparison.passed = comparison.notes.is_empty();
        details.push(comparison);
    }

    for candidate_record in candidate {
        let name = candidate_record.test_name.as_str();
        if references.contains_key(name) {
            continue;
        }
        let mut notes = vec!["missing from reference artifact".to_string()];
        if let Some(copies) = candidates.get(name).filter(|c| c.len() > 1) {
            notes.push(duplicate_note("candidate", copies.len()));
        }
        details.push(CaseComparison {
            test_name: candidate_record.test_name.clone(),
            passed: false,
            max_absolute_error: 0.0,
            tolerance: 0.0,
            notes,
        });
    }

    let passed_tests = details.iter().filter(|c| c.passed).count();
    let report = EquivalenceReport {
        algorithm: algorithm.to_string(),
        all_passed: passed_tests == details.len(),
        total_tests: details.len(),
        passed_tests,
        failed_tests: details.len() - passed_tests,
        max_absolute_error: stats.max_absolute,
        max_relative_error: stats.max_relative,
        details,
    };

    if report.all_passed {
        info!("{}: {}/{} cases equivalent", algorithm, report.passed_tests, report.total_tests);
    } else {
        error!("{}: {} of {} cases differ", algorithm, report.failed_tests, report.total_tests);
    }
    report
}

fn index_by_name(records: &[EquivalenceRecord]) -> HashMap<&str, Vec<&EquivalenceRecord>> {
    let mut index: HashMap<&str, Vec<&EquivalenceRecord>> = HashMap::new();
    for record in records {
        index.entry(record.test_name.as_str()).or_default().push(record);
    }
    index
}

fn duplicate_note(side: &str, copies: usize) -> String {
    format!("duplicate test_name in {side} artifact ({copies} records)")
}

fn compare_records(
    reference: &EquivalenceRecord,
    candidate: &EquivalenceRecord,
    stats: &mut ErrorStats,
) -> CaseComparison {
    let tolerance = reference.tolerance;
    let mut notes = Vec::new();
    let mut case_max = 0.0_f64;

    for field in &reference.outputs {
        let Some(other) = candidate.field(&field.name) else {
            notes.push(format!("{}: missing from candidate", field.name));
            continue;
        };
        let (expected, actual) = (field.value.elements(), other.elements());
        if expected.len() != actual.len() {
            notes.push(format!("{}: length {} vs reference {}", field.name, actual.len(), expected.len()));
            continue;
        }

        for (index, (r, c)) in expected.iter().zip(actual).enumerate() {
            let (r, c) = (r.get(), c.get());
            match check_close(c, r, tolerance) {
                Closeness::Within { difference } | Closeness::Exceeds { difference }
                    if r.is_finite() && c.is_finite() =>
                {
                    case_max = case_max.max(difference);
                    stats.max_absolute = stats.max_absolute.max(difference);
                    if r.abs() > RELATIVE_ERROR_FLOOR {
                        stats.max_relative = stats.max_relative.max(difference / r.abs());
                    }
                    if difference > tolerance {
                        notes.push(format!(
                            "{}[{}]: {} vs reference {} (|diff| {:e} > {:e})",
                            field.name, index, c, r, difference, tolerance
                        ));
                    }
                }
                Closeness::NonFinite => {
                    notes.push(format!("{}[{}]: {} vs reference {}", field.name, index, c, r));
                }
                // Matching NaN/infinity
                _ => {}
            }
        }
    }

    for field in &candidate.outputs {
        if reference.field(&field.name).is_none() {
            notes.push(format!("{}: not in reference", field.name));
        }
    }

    CaseComparison {
        test_name: reference.test_name.clone(),
        passed: notes.is_empty(),
        max_absolute_error: case_max,
        tolerance,
        notes,
    }
}

/// Read two artifacts from disk and compare them.
pub fn compare_artifact_files(
    algorithm: &str,
    reference: &Path,
    candidate: &Path,
) -> ConformanceResult<EquivalenceReport> {
    let reference = read_artifact(reference)?;
    let candidate = read_artifact(candidate)?;
    Ok(compare_artifacts(algorithm, &reference, &candidate))
}

/// Write the report to `<output_root>/<algorithm>/equivalence_report.json`.
pub fn write_report(config: &HarnessConfig, report: &EquivalenceReport) -> ConformanceResult<PathBuf> {
    let path = config.artifact_path(&report.algorithm, REPORT_FILE_NAME);
    write_json_atomic(&path, report)?;
    info!("Wrote equivalence report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::OutputField;

    fn record(name: &str, state: &[f64], tolerance: f64) -> EquivalenceRecord {
        EquivalenceRecord {
            test_name: name.to_string(),
            outputs: vec![OutputField::new("updated_state", state)],
            tolerance,
        }
    }

    #[test]
    fn relative_error_skips_zero_reference() {
        let reference = [record("a", &[0.0, 2.0], 1e-6)];
        let candidate = [record("a", &[1e-9, 2.0 + 2e-9], 1e-6)];
        let report = compare_artifacts("kalman_filter", &reference, &candidate);

        assert!(report.all_passed);
        assert!((report.max_absolute_error - 2e-9).abs() < 1e-15);
        assert!((report.max_relative_error - 1e-9).abs() < 1e-15);
    }

    #[test]
    fn field_level_differences_fail_the_case() {
        let reference = [record("a", &[1.0, 2.0], 1e-10)];
        let candidate = [EquivalenceRecord {
            test_name: "a".to_string(),
            outputs: vec![OutputField::new("updated_state", &[1.0][..])],
            tolerance: 1e-10,
        }];
        let report = compare_artifacts("kalman_filter", &reference, &candidate);
        assert!(!report.all_passed);
        assert!(report.details[0].notes[0].contains("length 1 vs reference 2"));
    }

    #[test]
    fn non_finite_classes_must_agree() {
        let reference = [record("a", &[f64::NAN, f64::INFINITY], 1e-10)];
        let same = [record("a", &[f64::NAN, f64::INFINITY], 1e-10)];
        let different = [record("a", &[f64::NAN, f64::NEG_INFINITY], 1e-10)];

        assert!(compare_artifacts("k", &reference, &same).all_passed);
        let report = compare_artifacts("k", &reference, &different);
        assert_eq!(report.failed_tests, 1);
        assert_eq!(report.max_absolute_error, 0.0);
    }

    #[test]
    fn report_serializes_expected_keys() {
        let reference = [record("a", &[1.0], 1e-10)];
        let report = compare_artifacts("kalman_filter", &reference, &reference);
        let value = serde_json::to_value(&report).unwrap();

        for key in [
            "algorithm",
            "all_passed",
            "total_tests",
            "passed_tests",
            "failed_tests",
            "max_absolute_error",
            "max_relative_error",
            "details",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["details"][0]["test_name"], "a");
        assert!(value["details"][0].get("notes").is_none());
    }
}
