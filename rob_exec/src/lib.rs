//! # Robot library.
//!
//! The motion-control and mission-sequencing core of the arm robot. This library allows the
//! executable, the benches, and other crates in the workspace to access items defined inside
//! the robot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Motion profile generator - trapezoidal position/velocity trajectories
pub mod motion_profile;

/// Axis control - profiled PID plus feedforward control of a single actuator
pub mod axis_ctrl;

/// Arm control - semantic arm commands over the pivot and extension axes
pub mod arm_ctrl;

/// Autonomy - the mission sequencer
pub mod auto;

/// Global data store for the executive
pub mod data_store;

/// The cycle executive, wiring all modules to the equipment
pub mod exec;

/// Executable parameters
pub mod params;

/// Simulated equipment used for the demo executable and scenario tests
pub mod sim;

/// Telemetry sink publishing status lines through the logger
pub mod tm_server;
