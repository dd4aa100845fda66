//! # Communications interface crate.
//!
//! Provides all common interfaces between the control core and the things it
//! talks to: the equipment (actuators, intake, path follower), the commands
//! issued to the arm, and the telemetry sink.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Commands issued to the arm by the mission sequencer or an operator
pub mod tc;

/// Contracts and data types for equipment (actuators, intake, path follower)
pub mod eqpt;

/// Telemetry sink contract
pub mod tm;
