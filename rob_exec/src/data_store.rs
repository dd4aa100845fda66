//! # Data Store

use comms_if::tc::arm_ctrl::ArmCmd;
use log::warn;

use crate::{
    arm_ctrl::{self, ArmCtrl},
    auto::{auto_mgr::AutoTm, AutoMgr},
};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the robot has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    /// The operator asked for the robot to stop
    StopRequested,

    /// A piece of equipment reported a fault
    EqptFault,

    /// A module failed during cyclic processing
    ModuleError,

    /// The mission time limit was reached and the arm has finished its last action
    MissionTimeout,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Time of the most recent cycle
    pub time_s: f64,

    // Safe mode variables
    /// Determines if the robot is in safe mode.
    pub safe: bool,

    /// Gives the reason for the robot being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    // ArmCtrl
    pub arm_ctrl: ArmCtrl,
    pub arm_cmd: Option<ArmCmd>,
    pub arm_ctrl_output: arm_ctrl::OutputData,
    pub arm_ctrl_status_rpt: arm_ctrl::StatusReport,

    // Autonomy
    pub auto_mgr: AutoMgr,
    pub auto_tm: Option<AutoTm>,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    pub fn new(arm_ctrl: ArmCtrl, auto_mgr: AutoMgr) -> Self {
        Self {
            num_cycles: 0,
            time_s: 0.0,
            safe: false,
            safe_cause: None,
            arm_ctrl,
            arm_cmd: None,
            arm_ctrl_output: arm_ctrl::OutputData::default(),
            arm_ctrl_status_rpt: arm_ctrl::StatusReport::default(),
            auto_mgr,
            auto_tm: None,
        }
    }

    /// Puts the robot into safe mode with the given cause.
    ///
    /// Arm control is made safe and the mission is forced to complete. The caller is responsible
    /// for commanding the equipment itself to stop.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);

            // Make arm_ctrl safe
            self.arm_ctrl.make_safe();
            self.arm_cmd = None;
            self.arm_ctrl_output = arm_ctrl::OutputData::default();

            // Stop the mission, the stop actions are performed by the caller
            self.auto_mgr.abort(&format!("{:?}", cause));
            self.auto_tm = Some(self.auto_mgr.get_tm());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::auto_mgr::{AutoMgrParams, MissionState};
    use comms_if::eqpt::mech::ActId;

    fn ds() -> DataStore {
        let arm: arm_ctrl::Params =
            util::params::parse(include_str!("../../params/arm_ctrl.toml")).unwrap();
        let auto: AutoMgrParams =
            util::params::parse(include_str!("../../params/auto_mgr.toml")).unwrap();
        DataStore::new(ArmCtrl::new(arm).unwrap(), AutoMgr::new(auto).unwrap())
    }

    #[test]
    fn test_make_safe_keeps_first_cause() {
        let mut ds = ds();
        ds.auto_mgr.start(0.0).unwrap();

        ds.make_safe(SafeModeCause::EqptFault);
        ds.make_safe(SafeModeCause::StopRequested);

        assert!(ds.safe);
        assert_eq!(ds.safe_cause, Some(SafeModeCause::EqptFault));
        assert_eq!(ds.auto_mgr.state(), MissionState::Complete);
        assert_eq!(ds.arm_ctrl_output.mech.power_of(ActId::ArmPivot), 0.0);
        assert!(ds.arm_ctrl_output.mech.brake);
    }
}
