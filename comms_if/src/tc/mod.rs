//! # Command module
//!
//! Commands issued to the control core, either by the mission sequencer or by an operator.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Semantic arm commands
pub mod arm_ctrl;
