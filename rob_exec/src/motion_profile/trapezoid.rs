//! Trapezoidal velocity profile

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::{MotionState, ProfileConstraints};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A trapezoidal (or triangular) velocity profile from a start state to a goal position at rest.
///
/// The profile is stored as three constant-acceleration segments expressed along `direction`:
///
/// 1. Change velocity from the start velocity to the peak velocity.
/// 2. Cruise at the peak velocity.
/// 3. Decelerate from the peak velocity to rest at the goal.
///
/// Any segment may have zero duration. When the distance is too short to reach the maximum
/// velocity the cruise segment vanishes and the peak velocity is solved for exactly.
#[derive(Debug, Clone, Serialize)]
pub struct TrapezoidProfile {
    start: MotionState,
    goal: MotionState,
    constraints: ProfileConstraints,

    /// Direction of travel of the cruise segment, +1 or -1.
    direction: f64,

    segments: [Segment; 3],

    /// Total duration of the profile.
    ///
    /// Units: seconds
    duration_s: f64,
}

/// A constant acceleration segment, in the direction-normalised frame.
#[derive(Debug, Clone, Copy, Default, Serialize)]
struct Segment {
    duration_s: f64,
    start_vel: f64,
    accel: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrapezoidProfile {
    /// Build a new profile from `start` to rest at `goal_position`.
    ///
    /// `start.velocity` may be nonzero, including moving away from the goal, faster than the
    /// velocity limit, or too fast to stop before the goal (in which case the profile brakes
    /// through the goal and comes back).
    pub fn new(start: MotionState, goal_position: f64, constraints: ProfileConstraints) -> Self {
        let v_max = constraints.max_velocity();
        let a_max = constraints.max_acceleration();

        let goal = MotionState::new(goal_position, 0.0);
        let disp = goal_position - start.position;

        // Signed displacement covered if we braked as hard as possible right now. The direction
        // of travel is set by where the goal lies relative to that stopping point.
        let stop_disp = start.velocity * start.velocity.abs() / (2.0 * a_max);
        let remaining = disp - stop_disp;
        let direction = if remaining != 0.0 {
            remaining.signum()
        } else if start.velocity != 0.0 {
            start.velocity.signum()
        } else {
            // Already at rest on the goal
            return Self {
                start,
                goal,
                constraints,
                direction: 1.0,
                segments: [Segment::default(); 3],
                duration_s: 0.0,
            };
        };

        // Work in the frame where travel is positive
        let u_0 = direction * start.velocity;
        let dist = direction * disp;

        // Distance needed to change from u_0 to v_max and then brake to rest
        let accel_to_max = if v_max >= u_0 { a_max } else { -a_max };
        let dist_to_max = (v_max * v_max - u_0 * u_0) / (2.0 * accel_to_max);
        let dist_brake_max = v_max * v_max / (2.0 * a_max);

        // Either the cruise velocity is reachable, or the profile is triangular and the peak is
        // found from (u_p^2 - u_0^2)/2a + u_p^2/2a = dist.
        let u_peak = if dist_to_max + dist_brake_max <= dist {
            v_max
        } else {
            (a_max * dist + 0.5 * u_0 * u_0).max(0.0).sqrt()
        };

        let accel_1 = if u_peak >= u_0 { a_max } else { -a_max };
        let t_1 = (u_peak - u_0).abs() / a_max;
        let dist_1 = if t_1 > 0.0 {
            (u_peak * u_peak - u_0 * u_0) / (2.0 * accel_1)
        } else {
            0.0
        };
        let dist_3 = u_peak * u_peak / (2.0 * a_max);
        let dist_2 = (dist - dist_1 - dist_3).max(0.0);
        let t_2 = if u_peak > 0.0 { dist_2 / u_peak } else { 0.0 };
        let t_3 = u_peak / a_max;

        Self {
            start,
            goal,
            constraints,
            direction,
            segments: [
                Segment {
                    duration_s: t_1,
                    start_vel: u_0,
                    accel: accel_1,
                },
                Segment {
                    duration_s: t_2,
                    start_vel: u_peak,
                    accel: 0.0,
                },
                Segment {
                    duration_s: t_3,
                    start_vel: u_peak,
                    accel: -a_max,
                },
            ],
            duration_s: t_1 + t_2 + t_3,
        }
    }

    /// Sample the profile `t_s` seconds after its creation.
    ///
    /// Sampling at or before zero returns the start state, sampling at or after the end of the
    /// profile returns the goal state exactly.
    pub fn sample(&self, t_s: f64) -> MotionState {
        if t_s <= 0.0 {
            return self.start;
        }
        if t_s >= self.duration_s {
            return self.goal;
        }

        let mut t = t_s;
        let mut pos = 0.0;
        for seg in self.segments.iter() {
            if t <= seg.duration_s {
                let p = pos + seg.start_vel * t + 0.5 * seg.accel * t * t;
                let v = seg.start_vel + seg.accel * t;
                return MotionState::new(
                    self.start.position + self.direction * p,
                    self.direction * v,
                );
            }

            pos += seg.start_vel * seg.duration_s + 0.5 * seg.accel * seg.duration_s.powi(2);
            t -= seg.duration_s;
        }

        self.goal
    }

    /// Total duration of the profile.
    ///
    /// Units: seconds
    pub fn duration(&self) -> f64 {
        self.duration_s
    }

    /// Returns true if the profile has ended at the given time.
    pub fn is_finished(&self, t_s: f64) -> bool {
        t_s >= self.duration_s
    }

    pub fn start(&self) -> MotionState {
        self.start
    }

    pub fn goal(&self) -> MotionState {
        self.goal
    }

    pub fn constraints(&self) -> ProfileConstraints {
        self.constraints
    }
}
