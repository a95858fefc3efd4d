//! Numeric kernels for the ctrlparity sensor/control pipeline
//!
//! Three pure, deterministic kernels plus the tolerance rules used to prove
//! that two implementations of them agree.
//!
//! Key constraints:
//! - Every kernel is a pure function of its inputs (no hidden state, no I/O)
//! - No heap allocation in the kernels themselves
//! - Fixed-size 2×2 algebra written out as scalar expressions
//! - Operation order is fixed so results are bit-reproducible across builds
//!
//! ```
//! use ctrlparity_core::kernels::{kalman_step, KalmanInputs};
//!
//! let update = kalman_step(&KalmanInputs {
//!     state: [0.0, 0.0],
//!     measurement: 1.0,
//!     state_covariance: [10.0, 0.0, 0.0, 10.0],
//!     measurement_noise: 2.0,
//!     process_noise: 0.1,
//! });
//!
//! assert!((update.state[0] - 0.9095).abs() < 1e-3);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

pub mod constants;
pub mod errors;
pub mod kernels;
pub mod tolerance;

// Public API
pub use errors::{InvocationError, InvocationResult, ToleranceError};
pub use kernels::{
    kalman_step, low_pass_filter, pid_step,
    KalmanInputs, KalmanUpdate, PidGains, PidOutput, PidState,
};
pub use tolerance::{resolve_tolerance, Closeness, ResolvedTolerance, ToleranceSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
