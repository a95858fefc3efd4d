//! Scalar Kalman filter step (constant-velocity model)
//!
//! ## Model
//!
//! State `x = [position, velocity]`, unit time step, position-only sensor:
//!
//! ```text
//! F = | 1  1 |      H = | 1  0 |      Q·I = | Q  0 |
//!     | 0  1 |                              | 0  Q |
//! ```
//!
//! ### 1. Predict
//! ```text
//! x̂  = F·x
//! P̂  = F·P·Fᵀ + Q·I
//! ```
//!
//! ### 2. Update
//! ```text
//! y  = z − x̂₀                   innovation
//! S  = P̂₀₀ + R                  innovation covariance
//! K  = [P̂₀₀ / S, P̂₁₀ / S]       gain
//! x  = x̂ + K·y
//! P  = (I − K·H)·P̂·(I − K·H)ᵀ + K·R·Kᵀ     Joseph form
//! ```
//!
//! ## Explicit Scalars
//!
//! Everything is 2×2 or 2×1, so each product is expanded by hand below with
//! its derivation alongside. The Joseph form keeps the updated covariance
//! symmetric under rounding.
//!
//! ## Degenerate Input
//!
//! There is no error path. When `S = 0` (zero predicted position variance and
//! `R = 0`) the gain is non-finite: `K0 = 0/0` is NaN, and `K1` is NaN or ±∞
//! depending on `P̂₁₀`. The position outputs are NaN either way.

use crate::constants::{KALMAN_COVARIANCE_LEN, KALMAN_STATE_LEN};

/// Inputs for one predict/update step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanInputs {
    /// `[position, velocity]`
    pub state: [f64; KALMAN_STATE_LEN],
    /// Observed position
    pub measurement: f64,
    /// Flattened row-major 2×2 covariance `[P11, P12, P21, P22]`
    pub state_covariance: [f64; KALMAN_COVARIANCE_LEN],
    /// Measurement noise variance (R)
    pub measurement_noise: f64,
    /// Process noise variance (Q), added to the diagonal
    pub process_noise: f64,
}

/// Result of one predict/update step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanUpdate {
    /// Updated `[position, velocity]`
    pub state: [f64; KALMAN_STATE_LEN],
    /// Updated covariance, flattened row-major
    pub covariance: [f64; KALMAN_COVARIANCE_LEN],
}

/// Run one Kalman predict/update step.
pub fn kalman_step(inputs: &KalmanInputs) -> KalmanUpdate {
    let [p11, p12, p21, p22] = inputs.state_covariance;
    let q = inputs.process_noise;
    let r = inputs.measurement_noise;

    // Predict: x̂ = F·x
    let x_pred0 = inputs.state[0] + inputs.state[1];
    let x_pred1 = inputs.state[1];

    // P̂ = F·P·Fᵀ + Q·I
    // F·P       = | P11+P21  P12+P22 |
    //             | P21      P22     |
    // (F·P)·Fᵀ  = | (P11+P21)+(P12+P22)  P12+P22 |
    //             | P21+P22              P22     |
    let pp11 = (p11 + p21) + (p12 + p22) + q;
    let pp12 = p12 + p22;
    let pp21 = p21 + p22;
    let pp22 = p22 + q;

    // Update
    let innovation = inputs.measurement - x_pred0;
    let s = pp11 + r;

    let k0 = pp11 / s;
    let k1 = pp21 / s;

    let state = [x_pred0 + k0 * innovation, x_pred1 + k1 * innovation];

    // Joseph form. I − K·H = | 1−K0  0 |
    //                        | −K1   1 |
    let ikh00 = 1.0 - k0;
    let ikh10 = -k1;

    // A = (I − K·H)·P̂
    let a00 = ikh00 * pp11;
    let a01 = ikh00 * pp12;
    let a10 = ikh10 * pp11 + pp21;
    let a11 = ikh10 * pp12 + pp22;

    // A·(I − K·H)ᵀ, (I − K·H)ᵀ = | 1−K0  −K1 |
    //                            | 0      1  |
    let mut u11 = a00 * ikh00;
    let mut u12 = a00 * ikh10 + a01;
    let mut u21 = a10 * ikh00;
    let mut u22 = a10 * ikh10 + a11;

    // + K·R·Kᵀ
    u11 += k0 * r * k0;
    u12 += k0 * r * k1;
    u21 += k1 * r * k0;
    u22 += k1 * r * k1;

    KalmanUpdate {
        state,
        covariance: [u11, u12, u21, u22],
    }
}
