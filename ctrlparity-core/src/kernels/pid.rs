//! Discrete PID controller step
//!
//! ```text
//! integral'  = integral + e·dt                 Euler integration
//! derivative = (e − e_prev) / dt
//! u          = Kp·e + Ki·integral' + Kd·derivative
//! e_prev'    = e
//! ```
//!
//! The kernel holds no state. The caller threads [`PidOutput::next_state`]
//! into the next call. `dt = 0` divides by zero in the derivative term and
//! yields a non-finite output; it is not guarded.

/// Controller gains
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
}

impl PidGains {
    /// Create gains
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// State carried between steps
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidState {
    /// Accumulated integral of the error
    pub integral: f64,
    /// Error seen on the previous step
    pub prev_error: f64,
}

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput {
    /// Control signal
    pub output: f64,
    /// Integral after this step
    pub new_integral: f64,
    /// Error to use as `prev_error` on the next step
    pub new_prev_error: f64,
}

impl PidOutput {
    /// State to feed into the next step
    pub fn next_state(&self) -> PidState {
        PidState {
            integral: self.new_integral,
            prev_error: self.new_prev_error,
        }
    }
}

/// Run one PID step.
pub fn pid_step(error: f64, state: PidState, gains: &PidGains, dt: f64) -> PidOutput {
    // Plain multiply then add, never mul_add: golden vectors assume two roundings
    let new_integral = state.integral + error * dt;
    let derivative = (error - state.prev_error) / dt;
    let output = gains.kp * error + gains.ki * new_integral + gains.kd * derivative;

    PidOutput {
        output,
        new_integral,
        new_prev_error: error,
    }
}
