//! # Arm control module
//!
//! Arm control turns semantic commands ("go to collect", "score in the high basket") into goals
//! for the pivot and extension axes and intake actions. A command is a short progression of
//! phases evaluated once per cycle:
//!
//! 1. `Pivot` - the pivot goal is set, wait for the pivot to arrive.
//! 2. `Extension` - the extension goal is clamped to the safe envelope for the measured pivot
//!    position and set, wait for the extension to arrive.
//! 3. `Pull` - only for the ascent, the extension pulls back in once the rung is hooked.
//! 4. `Actuate` - the intake action is triggered and runs for a fixed time.
//! 5. `Done`
//!
//! The envelope is also re-applied every cycle to an extension goal that is still being driven,
//! so lowering the pivot pulls the extension in with it.
//!
//! Pivot angles are given in degrees in commands and parameters and are converted to encoder
//! ticks on entry, every internal pivot quantity is in ticks. Extension positions are negative
//! when extended.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod limits;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

use crate::axis_ctrl::AxisCtrlError;
use comms_if::eqpt::mech::ActId;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Could not load the parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Pivot target {0} deg is outside the supported band [{1}, {2}]")]
    PivotOutOfRange(f64, f64, f64),

    #[error("Extension target {0} ticks is outside the supported band [{1}, {2}]")]
    ExtensionOutOfRange(f64, f64, f64),

    #[error("No position reading for actuator {0}")]
    MissingSensData(ActId),

    #[error("Axis error: {0}")]
    AxisError(#[from] AxisCtrlError),
}
