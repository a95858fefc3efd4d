//! Algorithm kernels
//!
//! ## Overview
//!
//! Each kernel is one step of a classic signal-processing or control
//! algorithm, written as a pure function:
//!
//! ```text
//! raw samples ──▶ low_pass_filter ──▶ kalman_step ──▶ pid_step ──▶ actuator
//!                  (smoothing)        (estimation)    (control)
//! ```
//!
//! | Kernel            | Cost  | Carried state (caller-owned)      |
//! |-------------------|-------|-----------------------------------|
//! | [`kalman_step`]   | O(1)  | state `[f64; 2]`, covariance `[f64; 4]` |
//! | [`low_pass_filter`] | O(n) | none (whole sequence per call)   |
//! | [`pid_step`]      | O(1)  | [`PidState`] (integral, previous error) |
//!
//! ## Reproducibility
//!
//! The kernels are golden-tested against a reference implementation, so the
//! order of floating-point operations matters. Expressions are written in the
//! same association order as the reference and never use fused multiply-add.
//! Do not "simplify" them without regenerating the golden vectors.

pub mod kalman;
pub mod low_pass;
pub mod pid;

pub use kalman::{kalman_step, KalmanInputs, KalmanUpdate};
pub use low_pass::low_pass_filter;
#[cfg(feature = "alloc")]
pub use low_pass::low_pass_filtered;
pub use pid::{pid_step, PidGains, PidOutput, PidState};

use crate::errors::{InvocationError, InvocationResult};

/// Copy a slice into a fixed-size array, checking its arity.
///
/// `field` names the input in error messages.
pub fn to_fixed<const N: usize>(field: &'static str, values: &[f64]) -> InvocationResult<[f64; N]> {
    values.try_into().map_err(|_| InvocationError::ArityMismatch {
        field,
        expected: N,
        actual: values.len(),
    })
}
