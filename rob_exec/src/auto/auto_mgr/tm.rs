//! # Defines Telemetry Pack for Autonomy

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::MissionState;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AutoTm {
    /// State after the latest step, `None` before the mission starts.
    pub state: Option<MissionState>,

    /// Mission time at the latest step
    ///
    /// Units: seconds
    pub elapsed_s: f64,

    /// Follower busy flag seen at the latest step
    pub follower_busy: bool,

    /// True if the mission was ended by the time limit
    pub timed_out: bool,

    /// Set if the mission was aborted, with the reason
    pub abort_reason: Option<String>,
}
