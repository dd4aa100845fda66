//! # Equipment Interface
//!
//! This module defines the contracts the control core relies on for every piece of equipment it
//! drives. Implementations live outside the core (hardware abstraction layers, or the simulated
//! equipment in `rob_exec::sim`).

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod follower;
pub mod intake;
pub mod mech;

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

/// Faults that can be reported by any equipment.
///
/// All equipment faults are fatal for the current mission, the core does not retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EqptError {
    #[error("Equipment {0} reported a fault: {1}")]
    Fault(String, String),

    #[error("Demand {1} is outside the valid range for {0}")]
    InvalidDemand(String, f64),
}
