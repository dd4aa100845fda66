//! Axis control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the control of a single axis
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Params {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64,

    /// Velocity feedforward gain
    ///
    /// Units: power/(ticks/second)
    pub k_f: f64,

    /// Bound on the magnitude of the accumulated integral.
    ///
    /// Units: ticks.seconds
    pub integral_limit: f64,

    /// Maximum magnitude of the output power, at most 1.
    pub max_power: f64,

    /// Profile velocity limit
    ///
    /// Units: ticks/second
    pub max_velocity: f64,

    /// Profile acceleration limit
    ///
    /// Units: ticks/second^2
    pub max_acceleration: f64,

    /// Default allowed distance from the goal still considered arrived
    ///
    /// Units: ticks
    pub at_goal_tolerance: f64,
}
