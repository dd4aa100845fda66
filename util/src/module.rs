//! Module interfaces
//!
//! Cyclic control modules in `rob_exec` implement [`State`]. They are initialised once from a
//! parameter file and then processed exactly once per control cycle by the executive.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required during initialisation, usually a parameter file name
    type InitData;
    type InitError;

    /// Inputs for one cycle: commands, sensor data and the cycle period
    type InputData;
    /// Demands produced by one cycle
    type OutputData;
    /// Per-cycle status, reported as telemetry
    type StatusReport;
    type ProcError;

    /// Initialise the module, replacing any previous state.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Process one control cycle.
    ///
    /// Must be called exactly once per cycle, including cycles with no new command. Errors are
    /// fatal for the mission: the executive makes everything safe and does not call `proc`
    /// again.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
