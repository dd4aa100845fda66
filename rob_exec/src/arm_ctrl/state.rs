//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::{ArmCtrlError, Params};
use crate::axis_ctrl::AxisCtrl;
use comms_if::{
    eqpt::{
        intake::{self, IntakeDem},
        mech::{ActId, MechDems, MechSensData},
    },
    tc::arm_ctrl::{ArmCmd, IntakeAction},
};
use std::collections::HashMap;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
#[derive(Default)]
pub struct ArmCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    pub(crate) pivot: AxisCtrl,

    pub(crate) ext: AxisCtrl,

    /// The command currently being executed
    pub(crate) current_cmd: Option<ArmCmd>,

    /// Resolved target of the current command
    pub(crate) target: Option<Target>,

    pub(crate) phase: Phase,

    /// Time spent in the `Actuate` phase
    ///
    /// Units: seconds
    pub(crate) actuate_time_s: f64,

    /// Latest measurements
    pub(crate) pivot_meas_ticks: f64,
    pub(crate) ext_meas_ticks: f64,
    pub(crate) intake_pos: f64,
}

/// Input data to Arm Control.
#[derive(Default)]
pub struct InputData {
    /// The command to be executed, or `None` if there is no new command on this cycle.
    pub cmd: Option<ArmCmd>,

    /// Sensor data read at the start of this cycle
    pub sens: MechSensData,

    /// Time since the previous cycle
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Output data from Arm Control.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputData {
    /// Demands for the arm actuators
    pub mech: MechDems,

    /// A demand for the intake, only present on the cycle the demand changes
    pub intake: Option<IntakeDem>,
}

/// A command resolved into axis goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    /// Units: ticks
    pub pivot_ticks: f64,

    /// Requested extension, before clamping. `None` if the extension is not moved.
    ///
    /// Units: ticks
    pub ext_ticks: Option<f64>,

    /// Extension position to pull back to once `ext_ticks` has been reached.
    ///
    /// Units: ticks
    pub pull_ext_ticks: Option<f64>,

    pub action: IntakeAction,
}

/// Status report for ArmCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    pub phase: Phase,

    /// Extension limit applied this cycle
    pub max_ext_ticks: f64,

    /// True if the extension goal was clamped to the limit this cycle
    pub ext_limited: bool,

    /// True if a command was rejected this cycle
    pub cmd_rejected: bool,

    pub pivot_at_goal: bool,
    pub ext_at_goal: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Progress through the current command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No command.
    Idle,

    /// Waiting for the pivot to arrive.
    Pivot,

    /// Waiting for the extension to arrive.
    Extension,

    /// Waiting for the extension to pull back in.
    Pull,

    /// Intake action running.
    Actuate,

    /// Command complete.
    Done,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ArmCtrl {
    type InitData = &'static str;
    type InitError = ArmCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;
        *self = Self::new(params)?;

        Ok(())
    }

    /// Perform cyclic processing of Arm Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport {
            phase: self.phase,
            ..Default::default()
        };

        // Latest measurements
        self.pivot_meas_ticks = sens_pos(&input_data.sens, ActId::ArmPivot)?;
        self.ext_meas_ticks = sens_pos(&input_data.sens, ActId::ArmExtension)?;
        self.intake_pos = input_data.sens.intake_pos;

        let mut intake_dem = None;

        // Check to see if there's a new command
        if let Some(cmd) = input_data.cmd {
            self.handle_cmd(cmd, &mut intake_dem)?;
        }

        // Progress through the command's phases
        self.progress(input_data.dt_s, &mut intake_dem)?;

        // Keep the extension inside the envelope whatever the pivot is doing
        self.enforce_envelope()?;

        // Calculate the output
        let mut power = HashMap::new();
        power.insert(
            ActId::ArmPivot,
            self.pivot.tick(input_data.dt_s, self.pivot_meas_ticks),
        );
        power.insert(
            ActId::ArmExtension,
            self.ext.tick(input_data.dt_s, self.ext_meas_ticks),
        );

        self.report.phase = self.phase;
        self.report.max_ext_ticks = self.extension_limit();
        self.report.pivot_at_goal = self.pivot.is_at_goal_default(self.pivot_meas_ticks);
        self.report.ext_at_goal = self.ext.is_at_goal_default(self.ext_meas_ticks);

        Ok((
            OutputData {
                mech: MechDems { power, brake: true },
                intake: intake_dem,
            },
            self.report,
        ))
    }
}

impl ArmCtrl {
    /// Create a new arm controller from the given parameters.
    pub fn new(params: Params) -> Result<Self, ArmCtrlError> {
        Self::check_params(&params)?;

        Ok(Self {
            pivot: AxisCtrl::new("pivot", params.pivot.clone())?,
            ext: AxisCtrl::new("extension", params.extension.clone())?,
            params,
            ..Default::default()
        })
    }

    /// Function called when entering safe mode.
    ///
    /// Must result in no motion of the arm. Any intake action is abandoned, the caller is
    /// responsible for stopping the intake.
    pub fn make_safe(&mut self) {
        self.pivot.hold();
        self.ext.hold();
        self.current_cmd = None;
        self.target = None;
        self.phase = Phase::Idle;
    }

    /// Orderly stop at the end of a mission.
    ///
    /// Both axes hold with zero power and any phase not yet started is cancelled. An intake
    /// action which is already running is allowed to finish.
    pub fn halt(&mut self) {
        self.pivot.hold();
        self.ext.hold();

        if self.phase != Phase::Actuate {
            self.current_cmd = None;
            self.target = None;
            self.phase = Phase::Idle;
        }

        info!("Arm halted");
    }

    /// Record encoder positions after they have been reset.
    pub fn reset_observed(&mut self, pivot_ticks: f64, ext_ticks: f64) {
        self.pivot.reset_observed(pivot_ticks);
        self.ext.reset_observed(ext_ticks);
        self.pivot_meas_ticks = pivot_ticks;
        self.ext_meas_ticks = ext_ticks;
    }

    /// True when both axes are within tolerance of their goals, the intake is closed, and the
    /// current command has finished.
    ///
    /// False before the first command.
    pub fn is_finished(&self) -> bool {
        let progression_done = matches!(self.phase, Phase::Done | Phase::Idle);

        let pivot_done = self.pivot.goal().is_some()
            && self.pivot.is_at_goal_default(self.pivot_meas_ticks);

        // Poses which only move the pivot leave the extension without a goal
        let ext_done = self.ext.goal().is_none() || self.ext.is_at_goal_default(self.ext_meas_ticks);

        let intake_closed = intake::is_closed(
            self.intake_pos,
            self.params.intake_closed_pos,
            self.params.intake_closed_tolerance,
        );

        progression_done && pivot_done && ext_done && intake_closed
    }

    /// The current phase of the command.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The command currently being executed.
    pub fn current_cmd(&self) -> Option<ArmCmd> {
        self.current_cmd
    }

    /// Read-only access to the pivot axis.
    pub fn pivot(&self) -> &AxisCtrl {
        &self.pivot
    }

    /// Read-only access to the extension axis.
    pub fn extension(&self) -> &AxisCtrl {
        &self.ext
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Latest measured pivot position.
    ///
    /// Units: ticks
    pub fn pivot_position(&self) -> f64 {
        self.pivot_meas_ticks
    }

    /// Latest measured extension position.
    ///
    /// Units: ticks
    pub fn extension_position(&self) -> f64 {
        self.ext_meas_ticks
    }

    /// Start a new command, or ignore it if it's already in progress.
    fn handle_cmd(
        &mut self,
        cmd: ArmCmd,
        intake_dem: &mut Option<IntakeDem>,
    ) -> Result<(), ArmCtrlError> {
        if cmd == ArmCmd::Stop {
            info!("ArmCtrl stopping");
            if self.phase == Phase::Actuate {
                *intake_dem = Some(IntakeDem::Stop);
            }
            self.make_safe();
            return Ok(());
        }

        let in_progress = matches!(
            self.phase,
            Phase::Pivot | Phase::Extension | Phase::Pull | Phase::Actuate
        );
        if in_progress && self.current_cmd == Some(cmd) {
            debug!("ArmCmd::{:?} already in progress", cmd);
            return Ok(());
        }

        let target = match self.resolve(&cmd) {
            Ok(t) => t,
            Err(e) => {
                // Rejected, keep doing whatever we were doing
                warn!("Rejected ArmCmd::{:?}: {}", cmd, e);
                self.report.cmd_rejected = true;
                return Ok(());
            }
        };

        debug!("New ArmCtrl ArmCmd::{:?}", cmd);

        // A new command preempts a running intake action
        if self.phase == Phase::Actuate {
            *intake_dem = Some(IntakeDem::Stop);
        }

        self.current_cmd = Some(cmd);
        self.target = Some(target);
        self.phase = Phase::Pivot;
        set_goal_if_changed(&mut self.pivot, target.pivot_ticks)?;

        Ok(())
    }

    /// Advance the phase progression by at most one phase.
    fn progress(&mut self, dt_s: f64, intake_dem: &mut Option<IntakeDem>) -> Result<(), ArmCtrlError> {
        let target = match self.target {
            Some(t) => t,
            None => return Ok(()),
        };

        let prev = self.phase;

        match self.phase {
            Phase::Pivot => {
                if self.pivot.is_at_goal_default(self.pivot_meas_ticks) {
                    match target.ext_ticks {
                        Some(requested) => {
                            self.set_ext_goal(requested)?;
                            self.phase = Phase::Extension;
                        }
                        None => self.start_actuate(target.action, intake_dem),
                    }
                }
            }
            Phase::Extension => {
                if self.ext.is_at_goal_default(self.ext_meas_ticks) {
                    match target.pull_ext_ticks {
                        Some(pull) => {
                            self.set_ext_goal(pull)?;
                            self.phase = Phase::Pull;
                        }
                        None => self.start_actuate(target.action, intake_dem),
                    }
                }
            }
            Phase::Pull => {
                if self.ext.is_at_goal_default(self.ext_meas_ticks) {
                    self.start_actuate(target.action, intake_dem);
                }
            }
            Phase::Actuate => {
                self.actuate_time_s += dt_s;
                if self.actuate_time_s >= self.params.actuate_duration_s {
                    *intake_dem = Some(IntakeDem::Stop);
                    self.phase = Phase::Done;
                }
            }
            Phase::Idle | Phase::Done => (),
        }

        if self.phase != prev {
            debug!("ArmCtrl phase {:?} -> {:?}", prev, self.phase);
        }

        Ok(())
    }

    /// Set the extension goal, capped to the current envelope.
    fn set_ext_goal(&mut self, requested: f64) -> Result<(), ArmCtrlError> {
        let clamped = requested.max(self.extension_limit());
        if clamped != requested {
            debug!(
                "Extension goal {:.1} clamped to {:.1}",
                requested, clamped
            );
            self.report.ext_limited = true;
        }
        set_goal_if_changed(&mut self.ext, clamped)
    }

    /// Pull a driven extension goal back inside the envelope.
    ///
    /// The limit moves with the pivot, so a goal which was safe when it was set can be beyond it
    /// once the pivot is lowered. Held axes are not driven and are left alone.
    fn enforce_envelope(&mut self) -> Result<(), ArmCtrlError> {
        if !self.ext.is_active() {
            return Ok(());
        }

        let limit = self.extension_limit();
        match self.ext.goal() {
            Some(goal) if goal < limit => {
                debug!(
                    "Extension goal {:.1} beyond the limit {:.1} for the pivot, pulling in",
                    goal, limit
                );
                self.ext.set_goal(limit)?;
                self.report.ext_limited = true;
            }
            _ => (),
        }

        Ok(())
    }

    /// Trigger the intake action, or finish the command if there isn't one.
    fn start_actuate(&mut self, action: IntakeAction, intake_dem: &mut Option<IntakeDem>) {
        let dem = match action {
            IntakeAction::None => None,
            IntakeAction::Collect => Some(IntakeDem::Collect),
            IntakeAction::Deposit => Some(IntakeDem::Deposit),
        };

        match dem {
            Some(d) => {
                *intake_dem = Some(d);
                self.actuate_time_s = 0.0;
                self.phase = Phase::Actuate;
            }
            None => self.phase = Phase::Done,
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Only set a goal on the axis when it differs from the current one or the axis is holding.
/// Re-setting an unchanged goal on an active axis would restart the profile from the (lagging)
/// measured state.
fn set_goal_if_changed(axis: &mut AxisCtrl, goal: f64) -> Result<(), ArmCtrlError> {
    if axis.goal() != Some(goal) || !axis.is_active() {
        axis.set_goal(goal)?;
    }
    Ok(())
}

fn sens_pos(sens: &MechSensData, id: ActId) -> Result<f64, ArmCtrlError> {
    sens.pos_ticks
        .get(&id)
        .copied()
        .ok_or(ArmCtrlError::MissingSensData(id))
}

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.02;

    fn arm() -> ArmCtrl {
        let p: Params = util::params::parse(include_str!("../../../params/arm_ctrl.toml")).unwrap();
        ArmCtrl::new(p).unwrap()
    }

    fn input(cmd: Option<ArmCmd>, pivot: f64, ext: f64, intake: f64) -> InputData {
        InputData {
            cmd,
            sens: MechSensData::new(pivot, ext, intake),
            dt_s: DT,
        }
    }

    /// Drive the arm with ideal axes which sit exactly on the goal, returning every intake demand
    /// emitted.
    fn run_ideal(arm: &mut ArmCtrl, cycles: usize, intake: &mut f64) -> Vec<IntakeDem> {
        let mut dems = Vec::new();
        for _ in 0..cycles {
            let pivot = arm.pivot().goal().unwrap_or(0.0);
            let ext = arm.extension().goal().unwrap_or(0.0);
            let (out, _) = arm.proc(&input(None, pivot, ext, *intake)).unwrap();
            if let Some(d) = out.intake {
                *intake = match d {
                    IntakeDem::Stop => 0.0,
                    _ => 1.0,
                };
                dems.push(d);
            }
        }
        dems
    }

    #[test]
    fn test_not_finished_before_first_cmd() {
        let mut arm = arm();
        arm.proc(&input(None, 0.0, 0.0, 0.0)).unwrap();
        assert!(!arm.is_finished());
        assert_eq!(arm.phase(), Phase::Idle);
    }

    #[test]
    fn test_score_high_basket_progression() {
        let mut arm = arm();
        let tpd = arm.params().ticks_per_degree;

        arm.proc(&input(Some(ArmCmd::GoToScoreHighBasket), 0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(arm.phase(), Phase::Pivot);
        assert_eq!(arm.pivot().goal(), Some(90.0 * tpd));

        // Extension is not touched until the pivot arrives
        for _ in 0..20 {
            arm.proc(&input(None, 0.0, 0.0, 0.0)).unwrap();
        }
        assert_eq!(arm.extension().goal(), None);
        assert_eq!(arm.phase(), Phase::Pivot);

        let mut intake = 0.0;
        let dems = run_ideal(&mut arm, 1, &mut intake);
        assert!(dems.is_empty());
        assert_eq!(arm.phase(), Phase::Extension);
        assert_eq!(arm.extension().goal(), Some(-2440.0));
        assert!(!arm.is_finished());

        // Extension arrives, deposit starts
        let dems = run_ideal(&mut arm, 1, &mut intake);
        assert_eq!(dems, vec![IntakeDem::Deposit]);
        assert_eq!(arm.phase(), Phase::Actuate);
        assert!(!arm.is_finished());

        // Deposit runs for its duration then stops
        let n = (arm.params().actuate_duration_s / DT).ceil() as usize + 1;
        let dems = run_ideal(&mut arm, n, &mut intake);
        assert_eq!(dems, vec![IntakeDem::Stop]);
        assert_eq!(arm.phase(), Phase::Done);

        // The closed intake is only seen on the next reading
        run_ideal(&mut arm, 1, &mut intake);
        assert!(arm.is_finished());
    }

    #[test]
    fn test_collect_obs_only_moves_pivot() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::GoToCollectObs), 0.0, 0.0, 0.0))
            .unwrap();

        let mut intake = 0.0;
        let dems = run_ideal(&mut arm, 1, &mut intake);
        assert_eq!(dems, vec![IntakeDem::Collect]);
        assert_eq!(arm.extension().goal(), None);
    }

    #[test]
    fn test_lowering_pivot_pulls_extension_in() {
        let mut arm = arm();
        let mut intake = 0.0;

        arm.proc(&input(
            Some(ArmCmd::Goto {
                pivot_deg: 90.0,
                ext_ticks: -4000.0,
                action: IntakeAction::None,
            }),
            0.0,
            0.0,
            0.0,
        ))
        .unwrap();
        run_ideal(&mut arm, 5, &mut intake);
        assert_eq!(arm.phase(), Phase::Done);
        assert!(arm.extension().goal().unwrap() < -3990.0);

        // Pivot-only pose to 45 deg with the arm fully extended
        let pivot = arm.pivot_position();
        let ext = arm.extension_position();
        let (_, report) = arm
            .proc(&input(Some(ArmCmd::GoToCollectObs), pivot, ext, intake))
            .unwrap();
        assert!(report.ext_limited);
        assert!((report.max_ext_ticks + 3382.0).abs() < 1e-6);
        assert!((arm.extension().goal().unwrap() + 3382.0).abs() < 1e-6);
        assert!(arm.extension().is_active());

        for _ in 0..10 {
            let pivot = arm.pivot().goal().unwrap();
            let ext = arm.extension().goal().unwrap();
            arm.proc(&input(None, pivot, ext, intake)).unwrap();

            let limit = arm.max_extension(arm.pivot_position());
            assert!(arm.extension().goal().unwrap() >= limit - 1e-9);
        }
    }

    #[test]
    fn test_level_two_ascent_pulls_back() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::LevelTwoAscent), 0.0, 0.0, 0.0))
            .unwrap();

        let mut intake = 0.0;
        run_ideal(&mut arm, 1, &mut intake);
        assert_eq!(arm.phase(), Phase::Extension);
        assert_eq!(arm.extension().goal(), Some(-1250.0));

        run_ideal(&mut arm, 1, &mut intake);
        assert_eq!(arm.phase(), Phase::Pull);
        assert_eq!(arm.extension().goal(), Some(0.0));
        assert!(!arm.is_finished());

        // No intake action at the end of the ascent
        let dems = run_ideal(&mut arm, 1, &mut intake);
        assert!(dems.is_empty());
        assert_eq!(arm.phase(), Phase::Done);
        assert!(arm.is_finished());
    }

    #[test]
    fn test_reissue_is_noop() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::GoToScoreHighBasket), 0.0, 0.0, 0.0))
            .unwrap();
        for _ in 0..10 {
            arm.proc(&input(None, 0.0, 0.0, 0.0)).unwrap();
        }
        let sp_before = arm.pivot().setpoint().unwrap();

        // Re-issuing must not restart the profile from the lagging measured position, so the
        // setpoint keeps moving ahead of it.
        arm.proc(&input(Some(ArmCmd::GoToScoreHighBasket), 0.0, 0.0, 0.0))
            .unwrap();
        let sp_after = arm.pivot().setpoint().unwrap();
        assert_eq!(arm.phase(), Phase::Pivot);
        assert!(sp_after.position > sp_before.position);
        assert!(sp_after.velocity > sp_before.velocity);
    }

    #[test]
    fn test_rejected_cmd_keeps_goal() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::GoToScoreHighBasket), 0.0, 0.0, 0.0))
            .unwrap();
        let goal = arm.pivot().goal();

        let (_, report) = arm
            .proc(&input(
                Some(ArmCmd::Goto {
                    pivot_deg: 400.0,
                    ext_ticks: 0.0,
                    action: IntakeAction::None,
                }),
                0.0,
                0.0,
                0.0,
            ))
            .unwrap();

        assert!(report.cmd_rejected);
        assert_eq!(arm.pivot().goal(), goal);
        assert_eq!(arm.current_cmd(), Some(ArmCmd::GoToScoreHighBasket));
    }

    #[test]
    fn test_stop_zeroes_output() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::GoToScoreHighBasket), 0.0, 0.0, 0.0))
            .unwrap();
        let (out, _) = arm.proc(&input(None, 0.0, 0.0, 0.0)).unwrap();
        assert!(out.mech.power_of(ActId::ArmPivot) > 0.0);

        let (out, _) = arm.proc(&input(Some(ArmCmd::Stop), 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(out.mech.power_of(ActId::ArmPivot), 0.0);
        assert_eq!(out.mech.power_of(ActId::ArmExtension), 0.0);
        assert!(out.mech.brake);
        assert_eq!(arm.phase(), Phase::Idle);
    }

    #[test]
    fn test_cmd_after_stop_restarts_axes() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::GoToScoreHighBasket), 0.0, 0.0, 0.0))
            .unwrap();
        arm.proc(&input(None, 5.0, 0.0, 0.0)).unwrap();
        arm.proc(&input(Some(ArmCmd::Stop), 10.0, 0.0, 0.0)).unwrap();
        assert!(!arm.pivot().is_active());

        // Same goal as before the stop, the held axis must still be driven again
        let (out, _) = arm
            .proc(&input(Some(ArmCmd::GoToScoreHighBasket), 10.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(arm.phase(), Phase::Pivot);
        assert!(arm.pivot().is_active());
        assert!(out.mech.power_of(ActId::ArmPivot) > 0.0);
    }

    #[test]
    fn test_halt_lets_actuation_finish() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::GoToCollectObs), 0.0, 0.0, 0.0))
            .unwrap();
        let mut intake = 0.0;
        run_ideal(&mut arm, 1, &mut intake);
        assert_eq!(arm.phase(), Phase::Actuate);

        arm.halt();
        assert_eq!(arm.phase(), Phase::Actuate);

        let n = (arm.params().actuate_duration_s / DT).ceil() as usize + 1;
        let dems = run_ideal(&mut arm, n, &mut intake);
        assert_eq!(dems, vec![IntakeDem::Stop]);
        assert_eq!(arm.phase(), Phase::Done);
    }

    #[test]
    fn test_halt_cancels_pending_phases() {
        let mut arm = arm();
        arm.proc(&input(Some(ArmCmd::GoToScoreHighBasket), 0.0, 0.0, 0.0))
            .unwrap();
        arm.halt();

        let mut intake = 0.0;
        let dems = run_ideal(&mut arm, 10, &mut intake);
        assert!(dems.is_empty());
        assert_eq!(arm.phase(), Phase::Idle);
        assert_eq!(arm.extension().goal(), None);
        assert!(!arm.pivot().is_active());
    }

    #[test]
    fn test_missing_sens_data() {
        let mut arm = arm();
        let r = arm.proc(&InputData {
            cmd: None,
            sens: MechSensData::default(),
            dt_s: DT,
        });
        assert!(matches!(r, Err(ArmCtrlError::MissingSensData(ActId::ArmPivot))));
    }
}
