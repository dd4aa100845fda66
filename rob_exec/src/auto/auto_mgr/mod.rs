//! # AutoMgr module
//!
//! This module implements the [`AutoMgr`] state machine, which sequences the autonomous mission.
//! The mission moves through the following states in order:
//!
//! - `MoveToScoringZone` - The scoring path is being followed.
//! - `ScoreHighBasket` - The high basket scoring command is issued to arm control.
//! - `CheckScoringFinished` - Waiting for arm control to finish scoring.
//! - `MoveToObservationZone` - The observation path is issued to the follower.
//! - `Complete` - The mission is over, following is stopped and the arm halted.
//!
//! The manager doesn't own any equipment. Each step returns the [`AutoAction`]s the executive
//! must perform, and readiness is passed back in through [`StepInput`] on the next cycle.
//!
//! Independent of the state, once the mission time limit is reached the manager is forced into
//! `Complete`.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
pub mod tm;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Display;

pub use self::{
    params::{AutoMgrParams, BezierParams},
    tm::AutoTm,
};

use comms_if::{
    eqpt::follower::{PathSpec, Pose},
    tc::arm_ctrl::ArmCmd,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Autonomy Manager
///
/// Responsible for managing the state of the autonomous mission.
pub struct AutoMgr {
    /// Parameters for the AutoMgr.
    pub params: AutoMgrParams,

    /// Mission bookkeeping, set when the mission starts.
    context: Option<MissionContext>,

    state: MissionState,

    /// Telemetry packet to be sent by the TM server, summarising the autonomy state.
    auto_tm: AutoTm,
}

/// Wall-clock bookkeeping for the mission time limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionContext {
    /// Time the mission started at
    ///
    /// Units: seconds
    pub start_time_s: f64,

    /// Units: seconds
    pub time_limit_s: f64,
}

/// Readiness signals passed into each step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInput {
    /// True while the path follower is following a path.
    pub follower_busy: bool,

    /// True when arm control reports it has finished its command.
    pub arm_finished: bool,
}

/// Output of the step function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    /// Actions for the executive to perform, in order
    pub actions: Vec<AutoAction>,

    /// The state change made by this step, if any
    pub transition: Option<(MissionState, MissionState)>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur in the autonomy manager.
#[derive(Debug, thiserror::Error)]
pub enum AutoMgrError {
    #[error("Failed to load AutoMgrParams: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("The mission has not been started")]
    NotStarted,

    #[error("The mission has already been started")]
    AlreadyStarted,

    #[error("Invalid mission time limit: {0}")]
    InvalidTimeLimit(f64),
}

/// States of the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionState {
    MoveToScoringZone,
    ScoreHighBasket,
    CheckScoringFinished,
    MoveToObservationZone,
    Complete,
}

/// Actions requested by the manager.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoAction {
    /// Tell the follower where the robot starts.
    SetStartingPose(Pose),

    /// Begin following a path.
    FollowPath(PathSpec),

    /// Stop following.
    BreakFollowing,

    /// Send a command to arm control.
    Arm(ArmCmd),

    /// Orderly stop of the arm.
    HaltArm,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AutoMgr {
    /// Load the parameters and create a new manager.
    pub fn init(params_path: &str) -> Result<Self, AutoMgrError> {
        // Load parameters
        let params: AutoMgrParams = match util::params::load(params_path) {
            Ok(p) => p,
            Err(e) => return Err(AutoMgrError::ParamLoadError(e)),
        };

        Self::new(params)
    }

    pub fn new(params: AutoMgrParams) -> Result<Self, AutoMgrError> {
        if !(params.time_limit_s.is_finite() && params.time_limit_s > 0.0) {
            return Err(AutoMgrError::InvalidTimeLimit(params.time_limit_s));
        }

        Ok(Self {
            params,
            context: None,
            state: MissionState::MoveToScoringZone,
            auto_tm: AutoTm::default(),
        })
    }

    /// Start the mission at time `now_s`.
    ///
    /// The robot's starting pose is set and the scoring path is followed.
    pub fn start(&mut self, now_s: f64) -> Result<StepOutput, AutoMgrError> {
        if self.context.is_some() {
            return Err(AutoMgrError::AlreadyStarted);
        }

        self.context = Some(MissionContext {
            start_time_s: now_s,
            time_limit_s: self.params.time_limit_s,
        });
        self.state = MissionState::MoveToScoringZone;
        self.auto_tm.state = Some(self.state);

        info!("Mission started in {}", self.state);

        Ok(StepOutput {
            actions: vec![
                AutoAction::SetStartingPose(self.params.starting_pose),
                AutoAction::FollowPath(self.params.scoring_path.to_path()),
            ],
            transition: None,
        })
    }

    /// Step the mission at time `now_s`.
    ///
    /// Exactly one transition decision is made per step.
    pub fn step(&mut self, now_s: f64, input: &StepInput) -> Result<StepOutput, AutoMgrError> {
        let context = self.context.ok_or(AutoMgrError::NotStarted)?;
        let elapsed_s = now_s - context.start_time_s;

        self.auto_tm.elapsed_s = elapsed_s;
        self.auto_tm.follower_busy = input.follower_busy;

        // Complete is terminal, entry actions have already been issued
        if self.state == MissionState::Complete {
            return Ok(StepOutput::default());
        }

        // The time limit takes priority over the transition table
        if elapsed_s >= context.time_limit_s {
            warn!(
                "Mission time limit of {} s reached in {}",
                context.time_limit_s, self.state
            );
            self.auto_tm.timed_out = true;
            return Ok(self.transition(MissionState::Complete, Vec::new()));
        }

        let out = match self.state {
            MissionState::MoveToScoringZone => {
                if !input.follower_busy {
                    self.transition(MissionState::ScoreHighBasket, Vec::new())
                } else {
                    StepOutput::default()
                }
            }
            MissionState::ScoreHighBasket => self.transition(
                MissionState::CheckScoringFinished,
                vec![AutoAction::Arm(ArmCmd::GoToScoreHighBasket)],
            ),
            MissionState::CheckScoringFinished => {
                if input.arm_finished {
                    self.transition(MissionState::MoveToObservationZone, Vec::new())
                } else {
                    StepOutput::default()
                }
            }
            MissionState::MoveToObservationZone => {
                let path = self.params.observation_path.to_path();
                self.transition(MissionState::Complete, vec![AutoAction::FollowPath(path)])
            }
            MissionState::Complete => StepOutput::default(),
        };

        Ok(out)
    }

    /// Abort the mission, forcing it to complete.
    ///
    /// Used on the fault path. Does nothing if the mission is already complete.
    pub fn abort(&mut self, reason: &str) -> StepOutput {
        if self.state == MissionState::Complete {
            return StepOutput::default();
        }

        warn!("Mission aborted in {}: {}", self.state, reason);
        self.auto_tm.abort_reason = Some(reason.into());

        self.transition(MissionState::Complete, Vec::new())
    }

    /// The current mission state.
    pub fn state(&self) -> MissionState {
        self.state
    }

    /// Time since the start of the mission, or `None` if it hasn't started.
    pub fn elapsed_s(&self, now_s: f64) -> Option<f64> {
        self.context.map(|c| now_s - c.start_time_s)
    }

    pub fn context(&self) -> Option<MissionContext> {
        self.context
    }

    pub fn is_started(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.state == MissionState::Complete
    }

    pub fn get_tm(&self) -> AutoTm {
        self.auto_tm.clone()
    }

    /// Move to a new state. Entering `Complete` appends the stop actions after `actions`.
    fn transition(&mut self, to: MissionState, mut actions: Vec<AutoAction>) -> StepOutput {
        let from = self.state;
        self.state = to;
        self.auto_tm.state = Some(to);

        if to == MissionState::Complete {
            actions.push(AutoAction::BreakFollowing);
            actions.push(AutoAction::HaltArm);
        }

        info!("AutoMgr state change: {} -> {}", from, to);

        StepOutput {
            actions,
            transition: Some((from, to)),
        }
    }
}

impl Display for MissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionState::MoveToScoringZone => write!(f, "MoveToScoringZone"),
            MissionState::ScoreHighBasket => write!(f, "ScoreHighBasket"),
            MissionState::CheckScoringFinished => write!(f, "CheckScoringFinished"),
            MissionState::MoveToObservationZone => write!(f, "MoveToObservationZone"),
            MissionState::Complete => write!(f, "Complete"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.02;

    fn mgr() -> AutoMgr {
        let p: AutoMgrParams =
            util::params::parse(include_str!("../../../../params/auto_mgr.toml")).unwrap();
        AutoMgr::new(p).unwrap()
    }

    fn busy(b: bool) -> StepInput {
        StepInput {
            follower_busy: b,
            arm_finished: false,
        }
    }

    fn count(out: &[StepOutput], action: &AutoAction) -> usize {
        out.iter()
            .flat_map(|o| o.actions.iter())
            .filter(|a| *a == action)
            .count()
    }

    #[test]
    fn test_step_before_start() {
        let mut mgr = mgr();
        assert!(matches!(
            mgr.step(0.0, &StepInput::default()),
            Err(AutoMgrError::NotStarted)
        ));
        assert_eq!(mgr.elapsed_s(1.0), None);
    }

    #[test]
    fn test_start_follows_scoring_path() {
        let mut mgr = mgr();
        let out = mgr.start(5.0).unwrap();

        assert_eq!(
            out.actions[0],
            AutoAction::SetStartingPose(mgr.params.starting_pose)
        );
        assert_eq!(
            out.actions[1],
            AutoAction::FollowPath(mgr.params.scoring_path.to_path())
        );
        assert_eq!(mgr.state(), MissionState::MoveToScoringZone);
        assert_eq!(mgr.elapsed_s(7.5), Some(2.5));
        assert!(matches!(mgr.start(6.0), Err(AutoMgrError::AlreadyStarted)));
    }

    #[test]
    fn test_score_exactly_one_tick_after_follower_idle() {
        let mut mgr = mgr();
        mgr.start(0.0).unwrap();

        let mut t = 0.0;
        for _ in 0..50 {
            t += DT;
            let out = mgr.step(t, &busy(true)).unwrap();
            assert_eq!(out.transition, None);
            assert_eq!(mgr.state(), MissionState::MoveToScoringZone);
        }

        t += DT;
        let out = mgr.step(t, &busy(false)).unwrap();
        assert_eq!(
            out.transition,
            Some((MissionState::MoveToScoringZone, MissionState::ScoreHighBasket))
        );
        assert_eq!(mgr.state(), MissionState::ScoreHighBasket);
    }

    #[test]
    fn test_full_sequence() {
        let mut mgr = mgr();
        mgr.start(0.0).unwrap();

        let out = mgr.step(1.0, &busy(false)).unwrap();
        assert!(out.actions.is_empty());
        assert_eq!(mgr.state(), MissionState::ScoreHighBasket);

        // Scoring command is issued once, unconditionally
        let out = mgr.step(1.02, &busy(false)).unwrap();
        assert_eq!(out.actions, vec![AutoAction::Arm(ArmCmd::GoToScoreHighBasket)]);
        assert_eq!(mgr.state(), MissionState::CheckScoringFinished);

        // Re-polls until the arm is finished
        for i in 0..100 {
            let out = mgr.step(1.04 + i as f64 * DT, &busy(false)).unwrap();
            assert!(out.actions.is_empty());
        }
        assert_eq!(mgr.state(), MissionState::CheckScoringFinished);

        let done = StepInput {
            follower_busy: false,
            arm_finished: true,
        };
        mgr.step(4.0, &done).unwrap();
        assert_eq!(mgr.state(), MissionState::MoveToObservationZone);

        let out = mgr.step(4.02, &done).unwrap();
        assert_eq!(
            out.actions,
            vec![
                AutoAction::FollowPath(mgr.params.observation_path.to_path()),
                AutoAction::BreakFollowing,
                AutoAction::HaltArm,
            ]
        );
        assert_eq!(mgr.state(), MissionState::Complete);

        let out = mgr.step(4.04, &done).unwrap();
        assert_eq!(out, StepOutput::default());
    }

    #[test]
    fn test_timeout_while_checking() {
        let mut mgr = mgr();
        mgr.start(0.0).unwrap();
        mgr.step(1.0, &busy(false)).unwrap();
        mgr.step(1.02, &busy(false)).unwrap();
        assert_eq!(mgr.state(), MissionState::CheckScoringFinished);

        let mut outs = Vec::new();
        let mut t = 1.02;
        while t < 29.9 {
            t += DT;
            outs.push(mgr.step(t, &busy(false)).unwrap());
        }
        assert_eq!(mgr.state(), MissionState::CheckScoringFinished);
        assert_eq!(count(&outs, &AutoAction::BreakFollowing), 0);

        // Reaching the limit forces Complete, even though the arm is not finished
        let out = mgr.step(30.0, &busy(false)).unwrap();
        assert_eq!(
            out.transition,
            Some((MissionState::CheckScoringFinished, MissionState::Complete))
        );
        outs.push(out);

        for i in 1..100 {
            outs.push(mgr.step(30.0 + i as f64 * DT, &busy(false)).unwrap());
        }

        assert_eq!(mgr.state(), MissionState::Complete);
        assert_eq!(count(&outs, &AutoAction::BreakFollowing), 1);
        assert_eq!(count(&outs, &AutoAction::HaltArm), 1);
        assert!(mgr.get_tm().timed_out);
    }

    #[test]
    fn test_timeout_priority_over_table() {
        let mut mgr = mgr();
        mgr.start(0.0).unwrap();

        // The follower goes idle on the same tick as the time limit
        let out = mgr.step(31.0, &busy(false)).unwrap();
        assert_eq!(
            out.transition,
            Some((MissionState::MoveToScoringZone, MissionState::Complete))
        );
    }

    #[test]
    fn test_abort() {
        let mut mgr = mgr();
        mgr.start(0.0).unwrap();

        let out = mgr.abort("pivot fault");
        assert_eq!(
            out.actions,
            vec![AutoAction::BreakFollowing, AutoAction::HaltArm]
        );
        assert!(mgr.is_complete());
        assert_eq!(mgr.get_tm().abort_reason, Some("pivot fault".to_string()));

        assert_eq!(mgr.abort("again"), StepOutput::default());
    }

    #[test]
    fn test_invalid_time_limit() {
        let mut p: AutoMgrParams =
            util::params::parse(include_str!("../../../../params/auto_mgr.toml")).unwrap();
        p.time_limit_s = 0.0;
        assert!(matches!(
            AutoMgr::new(p),
            Err(AutoMgrError::InvalidTimeLimit(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            MissionState::CheckScoringFinished.to_string(),
            "CheckScoringFinished"
        );
    }
}
