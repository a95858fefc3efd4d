//! Constants shared by the kernels and the conformance harness
//!
//! Values that appear in vector documents, artifacts or kernel signatures are
//! defined once here so the loader, the runner and the comparator agree.

/// Absolute tolerance used when neither the case nor the suite provides one.
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-10;

/// Kalman state vector length: `[position, velocity]`.
pub const KALMAN_STATE_LEN: usize = 2;

/// Kalman covariance length: 2×2 flattened row-major `[P11, P12, P21, P22]`.
pub const KALMAN_COVARIANCE_LEN: usize = 4;

/// Reference magnitudes at or below this are excluded from relative-error
/// statistics to avoid dividing by (almost) zero.
pub const RELATIVE_ERROR_FLOOR: f64 = 1e-15;

/// String token for NaN in vector documents and artifacts.
pub const NAN_TOKEN: &str = "NaN";

/// String token for positive infinity in vector documents and artifacts.
pub const POS_INFINITY_TOKEN: &str = "Infinity";

/// String token for negative infinity in vector documents and artifacts.
pub const NEG_INFINITY_TOKEN: &str = "-Infinity";
