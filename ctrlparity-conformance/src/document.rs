//! On-disk shape of a vector document
//!
//! Generic over the per-algorithm input and expected-output types, which are
//! supplied by the [`Algorithm`](crate::algorithm::Algorithm) binding.
//! Top-level metadata such as `algorithm` and `version` is ignored.

use serde::Deserialize;

/// `{"absolute": <float>}` tolerance override
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ToleranceSpec {
    /// Absolute tolerance; absent means "inherit"
    #[serde(default)]
    pub absolute: Option<f64>,
}

/// One JSON file of test cases for a single algorithm
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "I: Deserialize<'de>, E: Deserialize<'de>"))]
pub struct TestSuiteDocument<I, E> {
    /// Suite-wide tolerance
    #[serde(default)]
    pub global_tolerance: Option<ToleranceSpec>,
    /// Cases in document order
    pub test_cases: Vec<TestCaseDocument<I, E>>,
}

impl<I, E> TestSuiteDocument<I, E> {
    /// Suite tolerance value, if the document sets one
    pub fn suite_tolerance(&self) -> Option<f64> {
        self.global_tolerance.and_then(|t| t.absolute)
    }
}

/// One case as written in the document
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "I: Deserialize<'de>, E: Deserialize<'de>"))]
pub struct TestCaseDocument<I, E> {
    /// Case name, unique across the run
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Kernel inputs
    pub inputs: I,
    /// Golden outputs
    pub expected_output: E,
    /// Case-level tolerance override
    #[serde(default)]
    pub tolerance: Option<ToleranceSpec>,
}

impl<I, E> TestCaseDocument<I, E> {
    /// Case tolerance value, if the case sets one
    pub fn case_tolerance(&self) -> Option<f64> {
        self.tolerance.and_then(|t| t.absolute)
    }
}
