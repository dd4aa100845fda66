//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::intake::{INTAKE_CLOSED_POS, INTAKE_CLOSED_TOLERANCE};
use serde::{Deserialize, Serialize};

use crate::axis_ctrl;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- GEOMETRY ----
    /// Conversion between pivot angle and pivot encoder position.
    ///
    /// Units: ticks/degree
    pub ticks_per_degree: f64,

    // ---- AXES ----
    /// Control parameters of the pivot axis, in ticks.
    pub pivot: axis_ctrl::Params,

    /// Control parameters of the extension axis, in ticks.
    pub extension: axis_ctrl::Params,

    // ---- CAPABILITIES ----
    /// Lowest supported pivot angle
    ///
    /// Units: degrees
    pub pivot_min_deg: f64,

    /// Highest supported pivot angle
    ///
    /// Units: degrees
    pub pivot_max_deg: f64,

    /// Extension position when fully retracted
    ///
    /// Units: ticks
    pub ext_retracted_ticks: f64,

    /// Extension position when fully extended, the unclamped maximum. This is the extension
    /// limit with the pivot fully up.
    ///
    /// Units: ticks
    pub ext_full_ticks: f64,

    // ---- SAFETY ENVELOPE ----
    /// Pivot angle at which the extension limit is `ext_limit_down_ticks`
    ///
    /// Units: degrees
    pub pivot_down_deg: f64,

    /// Pivot angle at which the extension limit is `ext_full_ticks`
    ///
    /// Units: degrees
    pub pivot_up_deg: f64,

    /// Extension limit with the pivot fully down.
    ///
    /// Units: ticks
    pub ext_limit_down_ticks: f64,

    // ---- POSES ----
    pub collect: ArmPose,
    pub collect_obs: ArmPose,
    pub score_high_basket: ArmPose,
    pub score_specimen: ArmPose,
    pub score_low_basket: ArmPose,
    pub stow: ArmPose,

    /// Pose in which the extension hooks the low rung
    pub level_two_ascent: ArmPose,

    /// Extension position the ascent pulls back to once the rung is hooked
    ///
    /// Units: ticks
    pub ascent_pull_ticks: f64,

    // ---- INTAKE ----
    /// Intake servo position when closed
    #[serde(default = "default_intake_closed_pos")]
    pub intake_closed_pos: f64,

    /// Allowed deviation from `intake_closed_pos` still considered closed
    #[serde(default = "default_intake_closed_tolerance")]
    pub intake_closed_tolerance: f64,

    /// How long a collect or deposit runs for
    ///
    /// Units: seconds
    pub actuate_duration_s: f64,
}

/// A named arm pose.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmPose {
    /// Units: degrees
    pub pivot_deg: f64,

    /// Extension position, or `None` if the pose only moves the pivot.
    ///
    /// Units: ticks
    #[serde(default)]
    pub ext_ticks: Option<f64>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn default_intake_closed_pos() -> f64 {
    INTAKE_CLOSED_POS
}

fn default_intake_closed_tolerance() -> f64 {
    INTAKE_CLOSED_TOLERANCE
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shipped_params() {
        let p: Params = util::params::parse(include_str!("../../../params/arm_ctrl.toml")).unwrap();

        assert_eq!(p.ticks_per_degree, 4.67);
        assert_eq!(p.ext_limit_down_ticks, -2764.0);
        assert_eq!(p.score_high_basket.ext_ticks, Some(-2440.0));
        assert_eq!(p.collect_obs.ext_ticks, None);
        assert_eq!(p.score_low_basket.ext_ticks, Some(-1000.0));
        assert_eq!(p.level_two_ascent.ext_ticks, Some(-1250.0));
        assert_eq!(p.ascent_pull_ticks, 0.0);
        assert_eq!(p.intake_closed_pos, 0.0);
        assert_eq!(p.intake_closed_tolerance, 0.1);
        assert_eq!(p.extension.max_velocity, 500.0);
        assert_eq!(p.extension.max_acceleration, 100.0);
    }
}
