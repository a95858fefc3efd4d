//! Error types for kernel invocation and tolerance handling
//!
//! ## Design
//!
//! The kernels themselves have no error path: degenerate inputs (zero `dt`,
//! zero innovation covariance) flow through as non-finite outputs. Errors only
//! exist at the boundary where loosely typed data (a parsed vector document,
//! a sensor buffer) is turned into a fixed-arity kernel invocation, and where
//! tolerances are accepted from documents.
//!
//! Both error types are `Copy` and carry only `&'static str` context, so they
//! can be returned from embedded control loops without allocation.
//!
//! ```
//! use ctrlparity_core::kernels::to_fixed;
//! use ctrlparity_core::InvocationError;
//!
//! let err = to_fixed::<2>("state", &[1.0, 2.0, 3.0]).unwrap_err();
//! assert_eq!(
//!     err,
//!     InvocationError::ArityMismatch { field: "state", expected: 2, actual: 3 }
//! );
//! ```

use thiserror_no_std::Error;

/// Result type for building kernel invocations
pub type InvocationResult<T> = Result<T, InvocationError>;

/// Invocation errors - raised before a kernel runs, never by the kernel
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationError {
    /// A fixed-size input had the wrong number of elements
    #[error("Field '{field}' must have {expected} elements, got {actual}")]
    ArityMismatch {
        /// Input field name as it appears in vector documents
        field: &'static str,
        /// Arity required by the kernel
        expected: usize,
        /// Number of elements supplied
        actual: usize,
    },
}

/// Tolerance errors - a tolerance that could never be satisfied sensibly
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ToleranceError {
    /// Negative tolerance would fail every comparison
    #[error("Tolerance {value} is negative")]
    Negative {
        /// The rejected tolerance
        value: f64,
    },

    /// NaN or infinite tolerance
    #[error("Tolerance is not a finite number")]
    NonFinite,
}

#[cfg(feature = "defmt")]
impl defmt::Format for InvocationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ArityMismatch { field, expected, actual } =>
                defmt::write!(fmt, "'{}' needs {} elements, got {}", field, expected, actual),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ToleranceError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Negative { value } =>
                defmt::write!(fmt, "Negative tolerance {}", value),
            Self::NonFinite =>
                defmt::write!(fmt, "Non-finite tolerance"),
        }
    }
}
