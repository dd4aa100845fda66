//! # Autonomy Module
//!
//! This module provides the autonomous mission for the robot, coordinating the drive base path
//! follower with arm control.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use auto_mgr::AutoMgr;

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Automation Manager module
pub mod auto_mgr;
