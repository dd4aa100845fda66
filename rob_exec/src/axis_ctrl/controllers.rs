//! # Axis controllers module
//!
//! Provides the PID controller used by AxisCtrl.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Default, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Bound on the magnitude of the integral accumulation
    integral_limit: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64, integral_limit: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral_limit: integral_limit.abs(),
            prev_error: None,
            integral: 0f64,
        }
    }

    /// Get the value of the controller for the given error, `dt` seconds after the previous
    /// call.
    pub fn get(&mut self, error: f64, dt: f64) -> f64 {
        // Accumulate the integral term.
        //
        // A non-positive dt means no time has passed so nothing is accumulated.
        if dt > 0.0 {
            self.integral = (self.integral + error * dt)
                .max(-self.integral_limit)
                .min(self.integral_limit);
        }

        // Calculate the derivative.
        //
        // On the first sample there's no previous error to difference against. Taking the error
        // itself would give a large spike at the start of every motion, so we assume no
        // derivative instead.
        let deriv = match self.prev_error {
            Some(e) if dt > 0.0 => (error - e) / dt,
            _ => 0f64,
        };

        // Calculate the output
        let out = self.k_p * error + self.k_i * self.integral + self.k_d * deriv;

        // Remember the previous error
        self.prev_error = Some(error);

        out
    }

    /// Clear the integral and derivative history.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
    }

    /// Replace the gains, keeping the accumulated state.
    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
    }

    /// The current integral accumulation.
    pub fn integral(&self) -> f64 {
        self.integral
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_proportional_only() {
        let mut pid = PidController::new(0.5, 0.0, 0.0, 100.0);
        assert_eq!(pid.get(10.0, 0.02), 5.0);
        assert_eq!(pid.get(-4.0, 0.02), -2.0);
    }

    #[test]
    fn test_no_derivative_on_first_sample() {
        let mut pid = PidController::new(0.0, 0.0, 1.0, 100.0);
        assert_eq!(pid.get(50.0, 0.02), 0.0);

        // Second sample differences against the first
        assert!((pid.get(52.0, 0.02) - 100.0).abs() < 1e-9);

        // No time passed, no derivative
        assert_eq!(pid.get(60.0, 0.0), 0.0);
    }

    #[test]
    fn test_integral_bounded() {
        let mut pid = PidController::new(0.0, 1.0, 0.0, 2.0);
        for _ in 0..1000 {
            pid.get(100.0, 0.02);
        }
        assert_eq!(pid.integral(), 2.0);
        assert_eq!(pid.get(100.0, 0.02), 2.0);

        for _ in 0..1000 {
            pid.get(-100.0, 0.02);
        }
        assert_eq!(pid.integral(), -2.0);
    }

    #[test]
    fn test_reset() {
        let mut pid = PidController::new(0.0, 1.0, 1.0, 10.0);
        pid.get(1.0, 0.5);
        pid.get(2.0, 0.5);
        assert!(pid.integral() > 0.0);

        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.get(5.0, 0.5), 2.5);
    }
}
