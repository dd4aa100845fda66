//! # Arm control commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A semantic command that can be completed by arm control.
///
/// Each pose command first moves the pivot, then the extension once the pivot has arrived, then
/// performs the intake action once the extension has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArmCmd {
    /// Lower the arm into the submersible and collect a game piece.
    GoToCollect,

    /// Collect from the observation zone, which only needs the pivot lowered.
    GoToCollectObs,

    /// Raise and extend to the high basket and deposit the held game piece.
    GoToScoreHighBasket,

    /// Move to the specimen scoring pose and deposit.
    GoToScoreSpecimen,

    /// Raise and partly extend to the low basket and deposit the held game piece.
    GoToScoreLowBasket,

    /// Hook the low rung with the extension, then pull back in to lift the robot.
    LevelTwoAscent,

    /// Collapse the arm into the robot.
    Stow,

    /// Move to an explicit pose.
    Goto {
        /// Pivot angle above horizontal.
        ///
        /// Units: degrees
        pivot_deg: f64,

        /// Extension position, negative is extended.
        ///
        /// Units: encoder ticks
        ext_ticks: f64,

        /// Action to perform once both axes have arrived.
        action: IntakeAction,
    },

    /// Stop the arm, holding position with zero power.
    Stop,
}

/// Intake actions that can be performed at the end of an arm command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeAction {
    None,
    Collect,
    Deposit,
}
