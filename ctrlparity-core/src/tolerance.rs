//! Tolerance resolution and the closeness check
//!
//! Every comparison in the conformance harness is an absolute-tolerance check:
//!
//! ```text
//! |actual − expected| ≤ tolerance
//! ```
//!
//! The tolerance for a case is resolved with a strict three-level fallback:
//!
//! ```text
//! case.tolerance.absolute ──▶ suite.global_tolerance.absolute ──▶ 1e-10
//! ```
//!
//! A lower level is only consulted when every level above it is absent.
//!
//! Non-finite values never pass the plain check (`NaN ≤ tol` is false and
//! `∞ − ∞` is NaN), so they are classified explicitly: an actual NaN or
//! infinity only matches an expected value of the same class, and anything
//! else is reported as [`Closeness::NonFinite`] rather than as an ordinary
//! out-of-tolerance value.

use crate::{
    constants::DEFAULT_ABSOLUTE_TOLERANCE,
    errors::ToleranceError,
};

/// Which level supplied a resolved tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceSource {
    /// `tolerance.absolute` on the test case
    Case,
    /// `global_tolerance.absolute` on the suite document
    Suite,
    /// Hard-coded [`DEFAULT_ABSOLUTE_TOLERANCE`]
    Default,
}

/// Absolute tolerance for one case, with its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTolerance {
    /// Maximum allowed absolute difference
    pub absolute: f64,
    /// Level the value came from
    pub source: ToleranceSource,
}

impl Default for ResolvedTolerance {
    fn default() -> Self {
        Self {
            absolute: DEFAULT_ABSOLUTE_TOLERANCE,
            source: ToleranceSource::Default,
        }
    }
}

/// Resolve a case tolerance: case → suite → default, never the reverse.
pub fn resolve_tolerance(case: Option<f64>, suite: Option<f64>) -> ResolvedTolerance {
    match (case, suite) {
        (Some(absolute), _) => ResolvedTolerance { absolute, source: ToleranceSource::Case },
        (None, Some(absolute)) => ResolvedTolerance { absolute, source: ToleranceSource::Suite },
        (None, None) => ResolvedTolerance::default(),
    }
}

/// Reject tolerances that are negative, NaN or infinite.
pub fn validate_tolerance(value: f64) -> Result<f64, ToleranceError> {
    if !value.is_finite() {
        return Err(ToleranceError::NonFinite);
    }
    if value < 0.0 {
        return Err(ToleranceError::Negative { value });
    }
    Ok(value)
}

/// Outcome of comparing one actual value against one expected value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Closeness {
    /// `|actual − expected| ≤ tolerance`, or both are the same non-finite value
    Within {
        /// Absolute difference (0 for matching non-finite values)
        difference: f64,
    },
    /// Both finite, but further apart than the tolerance allows
    Exceeds {
        /// Absolute difference
        difference: f64,
    },
    /// At least one side is non-finite and the two do not match
    NonFinite,
}

impl Closeness {
    /// True when the comparison passed
    pub fn is_within(&self) -> bool {
        matches!(self, Self::Within { .. })
    }
}

/// Symmetric absolute closeness check with explicit non-finite handling.
pub fn check_close(actual: f64, expected: f64, tolerance: f64) -> Closeness {
    if !actual.is_finite() || !expected.is_finite() {
        return if same_non_finite(actual, expected) {
            Closeness::Within { difference: 0.0 }
        } else {
            Closeness::NonFinite
        };
    }

    let difference = libm::fabs(actual - expected);
    if difference <= tolerance {
        Closeness::Within { difference }
    } else {
        Closeness::Exceeds { difference }
    }
}

/// True when both values are NaN, or both are the same infinity.
pub fn same_non_finite(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || (a.is_infinite() && a == b)
}
