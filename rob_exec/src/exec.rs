//! # Cycle executive
//!
//! [`RobExec`] owns the data store and every piece of equipment, and runs one control cycle each
//! time [`RobExec::cycle`] is called. The host is responsible for calling it at a fixed cadence.
//!
//! Within a cycle the processing order is:
//!
//! 1. Path follower update
//! 2. Sensor acquisition
//! 3. Mission step, and execution of the actions it requests
//! 4. Arm control processing
//! 5. Actuator and intake demand output
//! 6. Telemetry
//!
//! Any equipment or module error aborts the cycle. The executive then enters safe mode, zeroes all
//! actuators with braking engaged, stops the intake and path following, and forces the mission to
//! complete. Nothing is retried.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{error, info, warn};

// Internal
use crate::{
    arm_ctrl::{self, ArmCtrlError, Phase},
    auto::auto_mgr::{AutoAction, AutoMgrError, StepInput},
    data_store::{DataStore, SafeModeCause},
};
use comms_if::{
    eqpt::{
        follower::PathFollower,
        intake::{self, Intake, IntakeDem},
        mech::{ActId, Actuator, MechSensData},
        EqptError,
    },
    tm::TmSink,
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The robot cycle executive.
pub struct RobExec<P, E, I, F, T>
where
    P: Actuator,
    E: Actuator,
    I: Intake,
    F: PathFollower,
    T: TmSink,
{
    pub ds: DataStore,

    pivot: P,
    ext: E,
    intake: I,
    follower: F,
    tm: T,

    /// Time of the previous cycle, `None` before the first cycle
    prev_time_s: Option<f64>,

    /// Set once the arm has been halted at the end of the mission
    arm_halted: bool,

    stopped: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which abort a cycle.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Equipment error: {0}")]
    Eqpt(#[from] EqptError),

    #[error("ArmCtrl error: {0}")]
    ArmCtrl(#[from] ArmCtrlError),

    #[error("AutoMgr error: {0}")]
    AutoMgr(#[from] AutoMgrError),

    #[error("The executive has been stopped")]
    Stopped,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<P, E, I, F, T> RobExec<P, E, I, F, T>
where
    P: Actuator,
    E: Actuator,
    I: Intake,
    F: PathFollower,
    T: TmSink,
{
    pub fn new(ds: DataStore, pivot: P, ext: E, intake: I, follower: F, tm: T) -> Self {
        Self {
            ds,
            pivot,
            ext,
            intake,
            follower,
            tm,
            prev_time_s: None,
            arm_halted: false,
            stopped: false,
        }
    }

    /// Prepare the equipment: encoders are zeroed and the actuators will brake at zero power.
    pub fn init(&mut self) -> Result<(), ExecError> {
        let result = self.init_eqpt();
        self.on_result(result)
    }

    /// Start the mission at time `now_s`.
    ///
    /// Starting an already started mission is refused without touching the running one.
    pub fn start(&mut self, now_s: f64) -> Result<(), ExecError> {
        if self.ds.auto_mgr.is_started() {
            warn!("The mission has already been started, ignoring the new start");
            return Err(ExecError::AutoMgr(AutoMgrError::AlreadyStarted));
        }

        let result = self.start_mission(now_s);
        self.on_result(result)
    }

    /// Run a single control cycle at time `now_s`.
    pub fn cycle(&mut self, now_s: f64) -> Result<(), ExecError> {
        if self.stopped {
            return Err(ExecError::Stopped);
        }

        let result = if self.ds.safe {
            // Nothing moves in safe mode, just keep reporting
            self.ds.arm_ctrl_status_rpt = arm_ctrl::StatusReport::default();
            self.send_tm(now_s);
            Ok(())
        } else {
            self.run_cycle(now_s)
        };

        self.prev_time_s = Some(now_s);
        self.ds.time_s = now_s;
        self.ds.num_cycles += 1;

        self.on_result(result)
    }

    /// Stop everything: zero power with braking on all actuators, the intake stopped, and path
    /// following broken.
    ///
    /// Calling this more than once has no further effect.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }

        info!("RobExec stopping");
        self.ds.make_safe(SafeModeCause::StopRequested);
        self.command_safe();
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn pivot(&self) -> &P {
        &self.pivot
    }

    pub fn pivot_mut(&mut self) -> &mut P {
        &mut self.pivot
    }

    pub fn extension(&self) -> &E {
        &self.ext
    }

    pub fn extension_mut(&mut self) -> &mut E {
        &mut self.ext
    }

    pub fn intake(&self) -> &I {
        &self.intake
    }

    pub fn intake_mut(&mut self) -> &mut I {
        &mut self.intake
    }

    pub fn follower(&self) -> &F {
        &self.follower
    }

    pub fn follower_mut(&mut self) -> &mut F {
        &mut self.follower
    }

    pub fn tm(&self) -> &T {
        &self.tm
    }

    fn init_eqpt(&mut self) -> Result<(), ExecError> {
        self.pivot.reset_encoder()?;
        self.ext.reset_encoder()?;
        self.pivot.set_brake_on_zero_power(true)?;
        self.ext.set_brake_on_zero_power(true)?;

        let pivot_ticks = self.pivot.get_position()?;
        let ext_ticks = self.ext.get_position()?;
        self.ds.arm_ctrl.reset_observed(pivot_ticks, ext_ticks);

        info!("Equipment initialised");
        Ok(())
    }

    fn start_mission(&mut self, now_s: f64) -> Result<(), ExecError> {
        let out = self.ds.auto_mgr.start(now_s)?;
        self.apply_actions(&out.actions)?;
        self.ds.auto_tm = Some(self.ds.auto_mgr.get_tm());
        Ok(())
    }

    fn run_cycle(&mut self, now_s: f64) -> Result<(), ExecError> {
        let dt_s = match self.prev_time_s {
            Some(t) => (now_s - t).max(0.0),
            None => 0.0,
        };

        // ---- PATH FOLLOWER ----
        self.follower.update()?;

        // ---- SENSOR ACQUISITION ----
        let sens = MechSensData::new(
            self.pivot.get_position()?,
            self.ext.get_position()?,
            self.intake.get_position()?,
        );

        // ---- AUTONOMY PROCESSING ----
        let step_input = StepInput {
            follower_busy: self.follower.is_busy(),
            arm_finished: self.ds.arm_ctrl.is_finished(),
        };
        let out = self.ds.auto_mgr.step(now_s, &step_input)?;
        self.apply_actions(&out.actions)?;
        self.ds.auto_tm = Some(self.ds.auto_mgr.get_tm());

        // ---- ARM CONTROL PROCESSING ----
        let input = arm_ctrl::InputData {
            cmd: self.ds.arm_cmd.take(),
            sens,
            dt_s,
        };
        let (output, report) = self.ds.arm_ctrl.proc(&input)?;
        self.ds.arm_ctrl_output = output;
        self.ds.arm_ctrl_status_rpt = report;

        // ---- DEMAND OUTPUT ----
        let mech = &self.ds.arm_ctrl_output.mech;
        self.pivot.set_power(mech.power_of(ActId::ArmPivot))?;
        self.ext.set_power(mech.power_of(ActId::ArmExtension))?;
        if let Some(dem) = self.ds.arm_ctrl_output.intake {
            intake::apply_dem(&mut self.intake, dem)?;
        }

        // Once a timed out mission's last intake action has finished there's nothing left to do.
        // The arm is already holding and following already broken, so only the safe state is
        // recorded.
        if self.arm_halted
            && self.ds.auto_mgr.get_tm().timed_out
            && self.ds.arm_ctrl.phase() != Phase::Actuate
        {
            self.ds.make_safe(SafeModeCause::MissionTimeout);
        }

        // ---- TELEMETRY ----
        self.send_tm(now_s);

        Ok(())
    }

    /// Perform the actions requested by the mission manager.
    fn apply_actions(&mut self, actions: &[AutoAction]) -> Result<(), ExecError> {
        for action in actions {
            match action {
                AutoAction::SetStartingPose(pose) => self.follower.set_starting_pose(*pose)?,
                AutoAction::FollowPath(path) => self.follower.follow_path(path)?,
                AutoAction::BreakFollowing => self.follower.break_following()?,
                AutoAction::Arm(cmd) => self.ds.arm_cmd = Some(*cmd),
                AutoAction::HaltArm => {
                    self.ds.arm_ctrl.halt();
                    self.arm_halted = true;
                }
            }
        }

        Ok(())
    }

    fn send_tm(&mut self, now_s: f64) {
        let elapsed_s = self.ds.auto_mgr.elapsed_s(now_s).unwrap_or(0.0).max(0.0);

        self.tm
            .add_data("Current State", self.ds.auto_mgr.state().to_string());
        self.tm
            .add_data("Time Elapsed", format!("{} seconds", elapsed_s.floor() as u64));
        self.tm
            .add_data("Follower Busy", self.follower.is_busy().to_string());
        self.tm.add_data(
            "Pivot Position",
            format!("{:.1}", self.ds.arm_ctrl.pivot_position()),
        );
        self.tm.add_data(
            "Extension Position",
            format!("{:.1}", self.ds.arm_ctrl.extension_position()),
        );
        self.tm
            .add_data("Arm Phase", format!("{:?}", self.ds.arm_ctrl.phase()));
        self.tm.add_data(
            "Cmd Rejected",
            self.ds.arm_ctrl_status_rpt.cmd_rejected.to_string(),
        );
        self.tm.add_data(
            "Ext Limited",
            self.ds.arm_ctrl_status_rpt.ext_limited.to_string(),
        );
        if let Some(cause) = self.ds.safe_cause {
            self.tm.add_data("Safe", format!("{:?}", cause));
        }

        self.tm.update();
    }

    /// Run the fault path if `result` is an error, then pass it on.
    fn on_result(&mut self, result: Result<(), ExecError>) -> Result<(), ExecError> {
        if let Err(ref e) = result {
            error!("{}", e);

            let cause = match e {
                ExecError::Eqpt(_) => SafeModeCause::EqptFault,
                _ => SafeModeCause::ModuleError,
            };
            self.ds.make_safe(cause);
            self.command_safe();

            self.tm.add_data("Fault", e.to_string());
            self.tm.update();
        }

        result
    }

    /// Command every piece of equipment to stop.
    ///
    /// Every command is attempted even if earlier ones fail, failures are only logged.
    fn command_safe(&mut self) {
        let results = [
            ("pivot power", self.pivot.set_power(0.0)),
            ("pivot brake", self.pivot.set_brake_on_zero_power(true)),
            ("extension power", self.ext.set_power(0.0)),
            ("extension brake", self.ext.set_brake_on_zero_power(true)),
            ("intake", intake::apply_dem(&mut self.intake, IntakeDem::Stop)),
            ("follower", self.follower.break_following()),
        ];

        for (what, r) in results.iter() {
            if let Err(e) = r {
                warn!("Could not make {} safe: {}", what, e);
            }
        }
    }
}

impl<P, E, I, F, T> Drop for RobExec<P, E, I, F, T>
where
    P: Actuator,
    E: Actuator,
    I: Intake,
    F: PathFollower,
    T: TmSink,
{
    fn drop(&mut self) {
        self.stop();
    }
}
