//! # Mechanisms Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::EqptError;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// All arm actuators, in control order.
pub const ARM_IDS: [ActId; 2] = [ActId::ArmPivot, ActId::ArmExtension];

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A position-sensing, power-commanded motor.
///
/// Positions are reported in encoder ticks. All calls are expected to be fast and non-blocking.
pub trait Actuator {
    /// Current encoder position in ticks.
    fn get_position(&mut self) -> Result<f64, EqptError>;

    /// Command a normalised power in the range `[-1, 1]`.
    fn set_power(&mut self, power: f64) -> Result<(), EqptError>;

    /// Zero the encoder at the current physical position.
    fn reset_encoder(&mut self) -> Result<(), EqptError>;

    /// Select whether the motor brakes (true) or coasts (false) at zero power.
    fn set_brake_on_zero_power(&mut self, brake: bool) -> Result<(), EqptError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands that are sent to the arm actuators each cycle
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MechDems {
    /// The demanded normalised power of each actuator, in `[-1, 1]`.
    pub power: HashMap<ActId, f64>,

    /// If true the actuators shall brake when their power is zero.
    pub brake: bool,
}

/// Sensor data read back from the equipment at the start of each cycle
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MechSensData {
    /// Measured position of each actuator in encoder ticks.
    pub pos_ticks: HashMap<ActId, f64>,

    /// Measured intake servo position.
    pub intake_pos: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of all actuators driven by the control core
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ActId {
    ArmPivot,
    ArmExtension,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Default for MechDems {
    /// Zero power on every arm actuator with braking engaged.
    fn default() -> Self {
        Self {
            power: ARM_IDS.iter().map(|id| (*id, 0.0)).collect(),
            brake: true,
        }
    }
}

impl MechDems {
    /// Demanded power for the given actuator, zero if none was set.
    pub fn power_of(&self, id: ActId) -> f64 {
        self.power.get(&id).copied().unwrap_or(0.0)
    }
}

impl MechSensData {
    /// Build sensor data from the pivot and extension positions.
    pub fn new(pivot_ticks: f64, ext_ticks: f64, intake_pos: f64) -> Self {
        let mut pos_ticks = HashMap::new();
        pos_ticks.insert(ActId::ArmPivot, pivot_ticks);
        pos_ticks.insert(ActId::ArmExtension, ext_ticks);

        Self {
            pos_ticks,
            intake_pos,
        }
    }
}

impl std::fmt::Display for ActId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActId::ArmPivot => write!(f, "ArmPivot"),
            ActId::ArmExtension => write!(f, "ArmExtension"),
        }
    }
}
