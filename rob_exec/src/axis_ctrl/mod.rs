//! # Axis control module
//!
//! Axis control drives a single power-commanded actuator to a position goal. Each time a new goal
//! is issued a trapezoidal motion profile is generated from the most recently observed state of
//! the axis, and on every cycle the profile is sampled to give a position and velocity setpoint.
//! The commanded power is then the sum of:
//!
//! - a feedforward term, `k_f` times the setpoint velocity, and
//! - a feedback term, from a PID controller acting on the error between the setpoint position
//!   and the measured position.
//!
//! The sum is saturated to the maximum power of the axis.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::PidController;
pub use params::Params;
pub use state::*;

use crate::motion_profile::ProfileError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AxisCtrl operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AxisCtrlError {
    #[error("Goal {1} for the {0} axis is not a finite position")]
    InvalidGoal(String, f64),

    #[error("The {0} axis has invalid profile constraints: {1}")]
    InvalidConstraints(String, ProfileError),
}
