//! # Intake (end-effector) Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::EqptError;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Servo position of the intake when closed/idle.
pub const INTAKE_CLOSED_POS: f64 = 0.0;

/// Allowed deviation from [`INTAKE_CLOSED_POS`] still considered closed.
pub const INTAKE_CLOSED_TOLERANCE: f64 = 0.1;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The end-effector mounted on the end of the extension stage.
pub trait Intake {
    /// Start collecting a game piece.
    fn collect(&mut self) -> Result<(), EqptError>;

    /// Start depositing the held game piece.
    fn deposit(&mut self) -> Result<(), EqptError>;

    /// Directly set the intake roller power. Zero power returns the intake to its closed/idle
    /// position.
    fn set_power(&mut self, power: f64) -> Result<(), EqptError>;

    /// Current intake servo position.
    fn get_position(&mut self) -> Result<f64, EqptError>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A demand for the intake produced by arm control.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeDem {
    Collect,
    Deposit,
    Stop,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Returns true if the servo position `pos` is within `tolerance` of the closed position.
pub fn is_closed(pos: f64, closed_pos: f64, tolerance: f64) -> bool {
    (pos - closed_pos).abs() < tolerance
}

/// Apply an intake demand to an intake.
pub fn apply_dem<I: Intake + ?Sized>(intake: &mut I, dem: IntakeDem) -> Result<(), EqptError> {
    match dem {
        IntakeDem::Collect => intake.collect(),
        IntakeDem::Deposit => intake.deposit(),
        IntakeDem::Stop => intake.set_power(0.0),
    }
}
