//! Command resolution and the extension safety envelope

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{ArmCtrl, ArmCtrlError, ArmPose, Params, Target};
use comms_if::tc::arm_ctrl::{ArmCmd, IntakeAction};
use util::maths::lin_map_sat;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArmCtrl {
    /// The most extended position allowed with the pivot at `pivot_ticks`.
    ///
    /// Linearly interpolated between `ext_limit_down_ticks` with the pivot down and
    /// `ext_full_ticks` with the pivot up, saturating outside that range.
    pub fn max_extension(&self, pivot_ticks: f64) -> f64 {
        let p = &self.params;
        lin_map_sat(
            (
                p.pivot_down_deg * p.ticks_per_degree,
                p.pivot_up_deg * p.ticks_per_degree,
            ),
            (p.ext_limit_down_ticks, p.ext_full_ticks),
            pivot_ticks,
        )
    }

    /// Cap a requested extension goal to the limit at the latest measured pivot position.
    ///
    /// Extension is negative so the cap is a lower bound.
    pub fn clamp_extension(&self, requested: f64) -> f64 {
        requested.max(self.max_extension(self.pivot_meas_ticks))
    }

    /// The extension limit which applies this cycle.
    ///
    /// While the pivot is being driven this is the stricter of the limits at the measured pivot
    /// and at the pivot goal, so the extension starts pulling in as soon as a lower pivot goal is
    /// set rather than once the pivot has already dropped.
    pub fn extension_limit(&self) -> f64 {
        let meas = self.max_extension(self.pivot_meas_ticks);

        match self.pivot.goal() {
            Some(goal) if self.pivot.is_active() => meas.max(self.max_extension(goal)),
            _ => meas,
        }
    }

    /// Resolve a command into axis goals, checking it lies within the supported bands.
    pub fn resolve(&self, cmd: &ArmCmd) -> Result<Target, ArmCtrlError> {
        let p = &self.params;

        let mut pull_ext_ticks = None;

        let (pose, action) = match *cmd {
            ArmCmd::GoToCollect => (p.collect, IntakeAction::Collect),
            ArmCmd::GoToCollectObs => (p.collect_obs, IntakeAction::Collect),
            ArmCmd::GoToScoreHighBasket => (p.score_high_basket, IntakeAction::Deposit),
            ArmCmd::GoToScoreSpecimen => (p.score_specimen, IntakeAction::Deposit),
            ArmCmd::GoToScoreLowBasket => (p.score_low_basket, IntakeAction::Deposit),
            ArmCmd::Stow => (p.stow, IntakeAction::None),
            ArmCmd::LevelTwoAscent => {
                pull_ext_ticks = Some(p.ascent_pull_ticks);
                (p.level_two_ascent, IntakeAction::None)
            }
            ArmCmd::Goto {
                pivot_deg,
                ext_ticks,
                action,
            } => (
                ArmPose {
                    pivot_deg,
                    ext_ticks: Some(ext_ticks),
                },
                action,
            ),
            ArmCmd::Stop => {
                return Err(ArmCtrlError::InvalidParams(
                    "Stop has no target pose".into(),
                ))
            }
        };

        if !(pose.pivot_deg >= p.pivot_min_deg && pose.pivot_deg <= p.pivot_max_deg) {
            return Err(ArmCtrlError::PivotOutOfRange(
                pose.pivot_deg,
                p.pivot_min_deg,
                p.pivot_max_deg,
            ));
        }

        for ext in pose.ext_ticks.iter().chain(pull_ext_ticks.iter()).copied() {
            if !(ext >= p.ext_full_ticks && ext <= p.ext_retracted_ticks) {
                return Err(ArmCtrlError::ExtensionOutOfRange(
                    ext,
                    p.ext_full_ticks,
                    p.ext_retracted_ticks,
                ));
            }
        }

        Ok(Target {
            pivot_ticks: pose.pivot_deg * p.ticks_per_degree,
            ext_ticks: pose.ext_ticks,
            pull_ext_ticks,
            action,
        })
    }

    /// Check the parameters are self consistent.
    pub(crate) fn check_params(p: &Params) -> Result<(), ArmCtrlError> {
        if !(p.ticks_per_degree > 0.0) {
            return Err(ArmCtrlError::InvalidParams(format!(
                "ticks_per_degree must be positive, found {}",
                p.ticks_per_degree
            )));
        }
        if p.pivot_min_deg > p.pivot_max_deg {
            return Err(ArmCtrlError::InvalidParams(
                "pivot_min_deg is above pivot_max_deg".into(),
            ));
        }
        if p.ext_full_ticks > p.ext_retracted_ticks {
            return Err(ArmCtrlError::InvalidParams(
                "ext_full_ticks must be below (more extended than) ext_retracted_ticks".into(),
            ));
        }
        if p.pivot_down_deg == p.pivot_up_deg {
            return Err(ArmCtrlError::InvalidParams(
                "pivot_down_deg and pivot_up_deg must differ".into(),
            ));
        }

        Ok(())
    }
}
