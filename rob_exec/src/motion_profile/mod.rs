//! # Motion profile module
//!
//! Generates time-parameterised trapezoidal trajectories between a start state and a goal
//! position, bounded by velocity and acceleration limits. A profile is created whenever a new
//! goal is issued to an axis and is sampled once per control cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod trapezoid;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

pub use trapezoid::TrapezoidProfile;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position and velocity of an axis at an instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    /// Units: encoder ticks
    pub position: f64,

    /// Units: encoder ticks/second
    pub velocity: f64,
}

/// Limits bounding a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileConstraints {
    /// Units: encoder ticks/second
    max_velocity: f64,

    /// Units: encoder ticks/second^2
    max_acceleration: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while building a profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("Maximum velocity must be positive and finite, found {0}")]
    InvalidMaxVelocity(f64),

    #[error("Maximum acceleration must be positive and finite, found {0}")]
    InvalidMaxAcceleration(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionState {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

impl ProfileConstraints {
    /// Create a new set of constraints, both limits must be positive.
    pub fn new(max_velocity: f64, max_acceleration: f64) -> Result<Self, ProfileError> {
        if !(max_velocity.is_finite() && max_velocity > 0.0) {
            return Err(ProfileError::InvalidMaxVelocity(max_velocity));
        }
        if !(max_acceleration.is_finite() && max_acceleration > 0.0) {
            return Err(ProfileError::InvalidMaxAcceleration(max_acceleration));
        }

        Ok(Self {
            max_velocity,
            max_acceleration,
        })
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }
}

impl Default for ProfileConstraints {
    /// Unit limits, 1 tick/s and 1 tick/s^2.
    fn default() -> Self {
        Self {
            max_velocity: 1.0,
            max_acceleration: 1.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_constraints_rejected() {
        assert_eq!(
            ProfileConstraints::new(0.0, 100.0),
            Err(ProfileError::InvalidMaxVelocity(0.0))
        );
        assert_eq!(
            ProfileConstraints::new(500.0, -1.0),
            Err(ProfileError::InvalidMaxAcceleration(-1.0))
        );
        assert!(ProfileConstraints::new(f64::INFINITY, 100.0).is_err());
        assert!(ProfileConstraints::new(500.0, 100.0).is_ok());
    }
}
