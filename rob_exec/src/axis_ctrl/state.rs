//! Implementations for the AxisCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Serialize;

// Internal
use super::{AxisCtrlError, Params, PidController};
use crate::motion_profile::{MotionState, ProfileConstraints, TrapezoidProfile};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Profiled position controller for a single axis.
///
/// A default controller has all gains and the power limit zeroed, so it never commands any
/// motion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AxisCtrl {
    /// Name of the axis, used in logs and errors.
    name: String,

    params: Params,

    constraints: ProfileConstraints,

    pid: PidController,

    /// The active profile, `None` until the first goal is set or after a hold.
    profile: Option<TrapezoidProfile>,

    /// Time since the active profile was created.
    ///
    /// Units: seconds
    profile_time_s: f64,

    /// Most recently commanded goal
    goal: Option<f64>,

    /// Most recently observed state of the axis
    observed: Option<MotionState>,

    /// Setpoint sampled on the last tick
    setpoint: Option<MotionState>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AxisCtrl {
    /// Create a new axis controller from its parameters.
    pub fn new(name: &str, params: Params) -> Result<Self, AxisCtrlError> {
        let constraints = ProfileConstraints::new(params.max_velocity, params.max_acceleration)
            .map_err(|e| AxisCtrlError::InvalidConstraints(name.into(), e))?;

        Ok(Self {
            name: name.into(),
            pid: PidController::new(params.k_p, params.k_i, params.k_d, params.integral_limit),
            params,
            constraints,
            profile: None,
            profile_time_s: 0.0,
            goal: None,
            observed: None,
            setpoint: None,
        })
    }

    /// Set a new goal for the axis, replacing any profile in progress.
    ///
    /// The new profile starts from the most recently observed state of the axis. If the axis
    /// has never been observed it is assumed to be at rest at the origin, which is where it is
    /// after an encoder reset.
    pub fn set_goal(&mut self, position: f64) -> Result<(), AxisCtrlError> {
        if !position.is_finite() {
            warn!("Rejected goal {} for the {} axis", position, self.name);
            return Err(AxisCtrlError::InvalidGoal(self.name.clone(), position));
        }

        let start = self.observed.unwrap_or_default();
        let profile = TrapezoidProfile::new(start, position, self.constraints);

        debug!(
            "New {} goal {:.1} from {:.1} ({:.1}/s), profile lasts {:.3} s",
            self.name,
            position,
            start.position,
            start.velocity,
            profile.duration()
        );

        self.profile = Some(profile);
        self.profile_time_s = 0.0;
        self.goal = Some(position);
        self.pid.reset();

        Ok(())
    }

    /// The most recently commanded goal, if any.
    pub fn goal(&self) -> Option<f64> {
        self.goal
    }

    /// Record a new measurement of the axis position, `dt` seconds after the previous one.
    ///
    /// The velocity is estimated by finite difference.
    pub fn observe(&mut self, dt: f64, measured: f64) {
        let velocity = match self.observed {
            Some(prev) if dt > 0.0 => (measured - prev.position) / dt,
            _ => 0.0,
        };

        self.observed = Some(MotionState::new(measured, velocity));
    }

    /// Advance the controller by `dt` seconds and compute the power to command.
    ///
    /// With no active profile there is nothing to track and the output is zero.
    pub fn tick(&mut self, dt: f64, measured: f64) -> f64 {
        self.observe(dt, measured);

        let profile = match self.profile {
            Some(ref p) => p,
            None => {
                self.setpoint = None;
                return 0.0;
            }
        };

        self.profile_time_s += dt.max(0.0);
        let setpoint = profile.sample(self.profile_time_s);
        self.setpoint = Some(setpoint);

        let feedforward = self.params.k_f * setpoint.velocity;
        let feedback = self.pid.get(setpoint.position - measured, dt);

        let max_power = self.params.max_power.abs().min(1.0);
        (feedforward + feedback).max(-max_power).min(max_power)
    }

    /// True if the measured position is within `tolerance` of the current goal.
    ///
    /// Always false when no goal has been set.
    pub fn is_at_goal(&self, measured: f64, tolerance: f64) -> bool {
        match self.goal {
            Some(g) => (measured - g).abs() <= tolerance,
            None => false,
        }
    }

    /// As [`AxisCtrl::is_at_goal`] using the configured tolerance.
    pub fn is_at_goal_default(&self, measured: f64) -> bool {
        self.is_at_goal(measured, self.params.at_goal_tolerance)
    }

    /// The most recently observed state of the axis.
    pub fn observed(&self) -> Option<MotionState> {
        self.observed
    }

    /// The setpoint sampled on the last tick.
    pub fn setpoint(&self) -> Option<MotionState> {
        self.setpoint
    }

    /// Forget the observation history, after the encoder has been reset to `position`.
    pub fn reset_observed(&mut self, position: f64) {
        self.observed = Some(MotionState::new(position, 0.0));
    }

    /// Drop the active profile so the axis is commanded zero power.
    ///
    /// The goal is kept so at-goal checks still refer to the last command.
    pub fn hold(&mut self) {
        if self.profile.take().is_some() {
            debug!("{} axis holding", self.name);
        }
        self.setpoint = None;
        self.pid.reset();
    }

    /// True if a profile is being tracked.
    pub fn is_active(&self) -> bool {
        self.profile.is_some()
    }

    /// Operator entry point for tuning the gains. The control loop never calls this.
    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64, k_f: f64) {
        self.params.k_p = k_p;
        self.params.k_i = k_i;
        self.params.k_d = k_d;
        self.params.k_f = k_f;
        self.pid.set_gains(k_p, k_i, k_d);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.02;

    /// First order velocity plant, as used by the simulated actuators.
    struct Plant {
        pos: f64,
        vel: f64,
        free_speed: f64,
    }

    impl Plant {
        fn new(pos: f64, free_speed: f64) -> Self {
            Self {
                pos,
                vel: 0.0,
                free_speed,
            }
        }

        fn step(&mut self, power: f64) {
            self.vel += (power * self.free_speed - self.vel) * DT / 0.05;
            self.pos += self.vel * DT;
        }
    }

    fn ext_params() -> Params {
        Params {
            k_p: 0.01,
            k_i: 0.0,
            k_d: 0.0002,
            k_f: 0.001,
            integral_limit: 100.0,
            max_power: 1.0,
            max_velocity: 500.0,
            max_acceleration: 100.0,
            at_goal_tolerance: 10.0,
        }
    }

    fn pivot_params() -> Params {
        Params {
            k_f: 1.0 / 800.0,
            max_velocity: 400.0,
            max_acceleration: 80.0,
            ..ext_params()
        }
    }

    /// Run the axis against the plant and return the first tick at goal and whether the axis
    /// ever left the goal after that.
    fn run(axis: &mut AxisCtrl, plant: &mut Plant, goal: f64, ticks: usize) -> (Option<usize>, bool) {
        let mut first = None;
        let mut left = false;

        for i in 0..ticks {
            let power = axis.tick(DT, plant.pos);
            assert!(power.abs() <= 1.0);
            plant.step(power);

            let at_goal = axis.is_at_goal_default(plant.pos);
            if at_goal && first.is_none() {
                first = Some(i);
            }
            if first.is_some() && !at_goal {
                left = true;
            }
            assert!((axis.goal().unwrap() - goal).abs() < 1e-12);
        }

        (first, left)
    }

    #[test]
    fn test_no_goal_outputs_zero() {
        let mut axis = AxisCtrl::new("ext", ext_params()).unwrap();
        assert_eq!(axis.goal(), None);
        for _ in 0..10 {
            assert_eq!(axis.tick(DT, 123.0), 0.0);
        }
        assert!(!axis.is_at_goal(123.0, 1000.0));
        assert_eq!(axis.observed(), Some(MotionState::new(123.0, 0.0)));
    }

    #[test]
    fn test_rejects_non_finite_goal() {
        let mut axis = AxisCtrl::new("ext", ext_params()).unwrap();
        axis.set_goal(-100.0).unwrap();

        assert!(matches!(
            axis.set_goal(f64::NAN),
            Err(AxisCtrlError::InvalidGoal(_, _))
        ));
        assert!(axis.set_goal(f64::INFINITY).is_err());
        assert_eq!(axis.goal(), Some(-100.0));
    }

    #[test]
    fn test_rejects_bad_constraints() {
        let params = Params {
            max_velocity: 0.0,
            ..ext_params()
        };
        assert!(matches!(
            AxisCtrl::new("ext", params),
            Err(AxisCtrlError::InvalidConstraints(_, _))
        ));
    }

    #[test]
    fn test_extension_converges_without_chatter() {
        let mut axis = AxisCtrl::new("ext", ext_params()).unwrap();
        let mut plant = Plant::new(0.0, 1000.0);
        axis.reset_observed(0.0);
        axis.set_goal(-2440.0).unwrap();

        let (first, left) = run(&mut axis, &mut plant, -2440.0, 1200);
        assert!(first.unwrap() < 600);
        assert!(!left);
    }

    #[test]
    fn test_pivot_converges_both_ways() {
        let mut axis = AxisCtrl::new("pivot", pivot_params()).unwrap();
        let mut plant = Plant::new(0.0, 800.0);
        axis.set_goal(420.0).unwrap();

        let (first, left) = run(&mut axis, &mut plant, 420.0, 600);
        assert!(first.unwrap() < 300);
        assert!(!left);

        axis.set_goal(0.0).unwrap();
        let (first, left) = run(&mut axis, &mut plant, 0.0, 600);
        assert!(first.unwrap() < 300);
        assert!(!left);
    }

    #[test]
    fn test_new_goal_starts_from_observed_state() {
        let mut axis = AxisCtrl::new("ext", ext_params()).unwrap();
        let mut plant = Plant::new(0.0, 1000.0);
        axis.set_goal(-2440.0).unwrap();
        for _ in 0..100 {
            let power = axis.tick(DT, plant.pos);
            plant.step(power);
        }

        // Retarget mid-motion, the first setpoint must follow on from the axis state rather than
        // jumping back to rest.
        let observed = axis.observed().unwrap();
        assert!(observed.velocity < -100.0);
        axis.set_goal(-1000.0).unwrap();
        axis.tick(DT, plant.pos);
        let sp = axis.setpoint().unwrap();
        assert!((sp.position - observed.position).abs() < 20.0);
        assert!((sp.velocity - observed.velocity).abs() < 10.0);
    }

    #[test]
    fn test_hold() {
        let mut axis = AxisCtrl::new("ext", ext_params()).unwrap();
        axis.set_goal(-500.0).unwrap();
        axis.tick(DT, 0.0);
        assert!(axis.is_active());

        axis.hold();
        assert!(!axis.is_active());
        assert_eq!(axis.tick(DT, -10.0), 0.0);
        assert_eq!(axis.goal(), Some(-500.0));
        assert!(axis.is_at_goal(-495.0, 10.0));
    }

    #[test]
    fn test_output_saturates() {
        let params = Params {
            k_p: 1.0,
            max_power: 0.6,
            ..ext_params()
        };
        let mut axis = AxisCtrl::new("ext", params).unwrap();
        axis.set_goal(-4000.0).unwrap();
        for _ in 0..50 {
            assert!(axis.tick(DT, 0.0).abs() <= 0.6);
        }
    }

    #[test]
    fn test_set_gains() {
        let mut axis = AxisCtrl::new("ext", ext_params()).unwrap();
        axis.set_gains(0.02, 0.001, 0.0, 0.002);
        assert_eq!(axis.params().k_p, 0.02);
        assert_eq!(axis.params().k_f, 0.002);
    }
}
