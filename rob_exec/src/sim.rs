//! # Simulated equipment
//!
//! Simple models of the arm actuators, the intake, and the path follower. They are used by the
//! demo executable, the benches, and the executive scenario tests. All of them support fault
//! injection so the fault path can be exercised.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::{
    follower::{PathFollower, PathSpec, Pose},
    intake::Intake,
    mech::Actuator,
    EqptError,
};
use log::trace;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of chords used to estimate path lengths.
const PATH_LENGTH_STEPS: usize = 100;

/// Servo position of the intake while collecting or depositing.
pub const INTAKE_OPEN_POS: f64 = 1.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A power-commanded motor with a first order velocity response.
///
/// Velocity approaches `power * free_speed` with time constant `tau_s`.
#[derive(Debug, Clone)]
pub struct SimActuator {
    name: String,

    /// Units: ticks
    pos_ticks: f64,

    /// Units: ticks/second
    vel_ticks_s: f64,

    power: f64,

    brake: bool,

    /// Speed at full power
    ///
    /// Units: ticks/second
    free_speed: f64,

    /// Units: seconds
    tau_s: f64,

    fault: Option<String>,

    num_resets: usize,
}

/// An intake whose servo opens while an action is running and closes when its power is zeroed.
#[derive(Debug, Clone, Default)]
pub struct SimIntake {
    pos: f64,
    power: f64,
    num_collects: usize,
    num_deposits: usize,
    num_stops: usize,
    fault: Option<String>,
}

/// A path follower which is busy for the time it takes to drive the path at a constant speed.
#[derive(Debug, Clone)]
pub struct SimFollower {
    /// Units: inches/second
    speed_ips: f64,

    /// Time advanced by each update
    ///
    /// Units: seconds
    dt_s: f64,

    starting_pose: Option<Pose>,

    /// Paths passed to `follow_path`, in order
    paths: Vec<PathSpec>,

    /// Time left on the current path
    ///
    /// Units: seconds
    remaining_s: f64,

    num_break_calls: usize,

    fault: Option<String>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimActuator {
    pub fn new(name: &str, free_speed: f64, tau_s: f64) -> Self {
        Self {
            name: name.into(),
            pos_ticks: 0.0,
            vel_ticks_s: 0.0,
            power: 0.0,
            brake: false,
            free_speed,
            tau_s,
            fault: None,
            num_resets: 0,
        }
    }

    /// Advance the plant by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        // Braking at zero power stops the motor much faster than coasting
        let tau_s = if self.power == 0.0 && self.brake {
            0.25 * self.tau_s
        } else {
            self.tau_s
        };

        self.vel_ticks_s += (self.power * self.free_speed - self.vel_ticks_s) * dt_s / tau_s;
        self.pos_ticks += self.vel_ticks_s * dt_s;
    }

    /// Inject a fault, or clear it with `None`.
    pub fn set_fault(&mut self, fault: Option<&str>) {
        self.fault = fault.map(String::from);
    }

    pub fn position(&self) -> f64 {
        self.pos_ticks
    }

    pub fn velocity(&self) -> f64 {
        self.vel_ticks_s
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn brake(&self) -> bool {
        self.brake
    }

    pub fn num_resets(&self) -> usize {
        self.num_resets
    }

    fn check_fault(&self) -> Result<(), EqptError> {
        match self.fault {
            Some(ref f) => Err(EqptError::Fault(self.name.clone(), f.clone())),
            None => Ok(()),
        }
    }
}

impl Actuator for SimActuator {
    fn get_position(&mut self) -> Result<f64, EqptError> {
        self.check_fault()?;
        Ok(self.pos_ticks)
    }

    fn set_power(&mut self, power: f64) -> Result<(), EqptError> {
        self.check_fault()?;
        if !(power.abs() <= 1.0) {
            return Err(EqptError::InvalidDemand(self.name.clone(), power));
        }
        self.power = power;
        Ok(())
    }

    fn reset_encoder(&mut self) -> Result<(), EqptError> {
        self.check_fault()?;
        self.pos_ticks = 0.0;
        self.num_resets += 1;
        Ok(())
    }

    fn set_brake_on_zero_power(&mut self, brake: bool) -> Result<(), EqptError> {
        self.check_fault()?;
        self.brake = brake;
        Ok(())
    }
}

impl SimIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fault(&mut self, fault: Option<&str>) {
        self.fault = fault.map(String::from);
    }

    pub fn position(&self) -> f64 {
        self.pos
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn num_collects(&self) -> usize {
        self.num_collects
    }

    pub fn num_deposits(&self) -> usize {
        self.num_deposits
    }

    /// Number of times the intake has been commanded to zero power.
    pub fn num_stops(&self) -> usize {
        self.num_stops
    }

    fn check_fault(&self) -> Result<(), EqptError> {
        match self.fault {
            Some(ref f) => Err(EqptError::Fault("intake".into(), f.clone())),
            None => Ok(()),
        }
    }
}

impl Intake for SimIntake {
    fn collect(&mut self) -> Result<(), EqptError> {
        self.check_fault()?;
        self.pos = INTAKE_OPEN_POS;
        self.power = 1.0;
        self.num_collects += 1;
        Ok(())
    }

    fn deposit(&mut self) -> Result<(), EqptError> {
        self.check_fault()?;
        self.pos = INTAKE_OPEN_POS;
        self.power = -1.0;
        self.num_deposits += 1;
        Ok(())
    }

    fn set_power(&mut self, power: f64) -> Result<(), EqptError> {
        self.check_fault()?;
        self.power = power;
        if power == 0.0 {
            self.pos = 0.0;
            self.num_stops += 1;
        }
        Ok(())
    }

    fn get_position(&mut self) -> Result<f64, EqptError> {
        self.check_fault()?;
        Ok(self.pos)
    }
}

impl SimFollower {
    pub fn new(speed_ips: f64, dt_s: f64) -> Self {
        Self {
            speed_ips,
            dt_s,
            starting_pose: None,
            paths: Vec::new(),
            remaining_s: 0.0,
            num_break_calls: 0,
            fault: None,
        }
    }

    pub fn set_fault(&mut self, fault: Option<&str>) {
        self.fault = fault.map(String::from);
    }

    pub fn starting_pose(&self) -> Option<Pose> {
        self.starting_pose
    }

    /// Every path that has been followed, in order.
    pub fn paths(&self) -> &[PathSpec] {
        &self.paths
    }

    /// Number of times `break_following` has been called.
    pub fn num_break_calls(&self) -> usize {
        self.num_break_calls
    }

    fn check_fault(&self) -> Result<(), EqptError> {
        match self.fault {
            Some(ref f) => Err(EqptError::Fault("follower".into(), f.clone())),
            None => Ok(()),
        }
    }
}

impl PathFollower for SimFollower {
    fn set_starting_pose(&mut self, pose: Pose) -> Result<(), EqptError> {
        self.check_fault()?;
        self.starting_pose = Some(pose);
        Ok(())
    }

    fn follow_path(&mut self, path: &PathSpec) -> Result<(), EqptError> {
        self.check_fault()?;
        self.remaining_s = path.length(PATH_LENGTH_STEPS) / self.speed_ips;
        self.paths.push(path.clone());
        trace!("SimFollower following path for {:.2} s", self.remaining_s);
        Ok(())
    }

    fn update(&mut self) -> Result<(), EqptError> {
        self.check_fault()?;
        self.remaining_s = (self.remaining_s - self.dt_s).max(0.0);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.remaining_s > 0.0
    }

    fn break_following(&mut self) -> Result<(), EqptError> {
        self.num_break_calls += 1;
        self.check_fault()?;
        self.remaining_s = 0.0;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::follower::Point;

    #[test]
    fn test_actuator_reaches_free_speed() {
        let mut act = SimActuator::new("pivot", 800.0, 0.05);
        act.set_power(0.5).unwrap();
        for _ in 0..100 {
            act.step(0.02);
        }
        assert!((act.velocity() - 400.0).abs() < 1e-3);
        assert!(act.position() > 0.0);
    }

    #[test]
    fn test_actuator_rejects_bad_power() {
        let mut act = SimActuator::new("pivot", 800.0, 0.05);
        assert_eq!(
            act.set_power(1.5),
            Err(EqptError::InvalidDemand("pivot".into(), 1.5))
        );
        assert!(act.set_power(f64::NAN).is_err());
        assert_eq!(act.power(), 0.0);
    }

    #[test]
    fn test_actuator_fault() {
        let mut act = SimActuator::new("extension", 1000.0, 0.05);
        act.set_fault(Some("overcurrent"));
        assert_eq!(
            act.get_position(),
            Err(EqptError::Fault("extension".into(), "overcurrent".into()))
        );
        act.set_fault(None);
        assert!(act.get_position().is_ok());
    }

    #[test]
    fn test_intake_closes_on_zero_power() {
        let mut intake = SimIntake::new();
        intake.deposit().unwrap();
        assert_eq!(intake.get_position().unwrap(), INTAKE_OPEN_POS);
        intake.set_power(0.0).unwrap();
        assert_eq!(intake.get_position().unwrap(), 0.0);
        assert_eq!(intake.num_deposits(), 1);
        assert_eq!(intake.num_stops(), 1);
    }

    #[test]
    fn test_follower_busy_for_path_duration() {
        let mut f = SimFollower::new(10.0, 0.02);
        let path = PathSpec::Bezier {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        };
        assert!(!f.is_busy());

        f.follow_path(&path).unwrap();
        let mut n = 0;
        while f.is_busy() {
            f.update().unwrap();
            n += 1;
        }
        // 1 s of travel at 0.02 s a tick
        assert!((49..=51).contains(&n));

        f.break_following().unwrap();
        f.break_following().unwrap();
        assert_eq!(f.num_break_calls(), 2);
        assert!(!f.is_busy());
    }
}
