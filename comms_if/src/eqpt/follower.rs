//! # Path Follower Equipment Interface
//!
//! The path follower executes offline-authored paths on the drive base. The control core only
//! starts, polls, and aborts it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::EqptError;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trajectory-executing subsystem of the drive base.
pub trait PathFollower {
    /// Set the pose the robot starts the mission in.
    fn set_starting_pose(&mut self, pose: Pose) -> Result<(), EqptError>;

    /// Begin following the given path, replacing any path currently being followed.
    fn follow_path(&mut self, path: &PathSpec) -> Result<(), EqptError>;

    /// Advance internal path tracking. Must be called exactly once per cycle.
    fn update(&mut self) -> Result<(), EqptError>;

    /// True while a path is being followed.
    fn is_busy(&self) -> bool;

    /// Stop following immediately. Calling this when not following is a no-op.
    fn break_following(&mut self) -> Result<(), EqptError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A point on the field.
///
/// Units: inches
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A robot pose on the field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Units: inches
    pub x: f64,

    /// Units: inches
    pub y: f64,

    /// Units: radians
    pub heading_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Description of a path to follow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PathSpec {
    /// A single Bezier curve through the given control points, with the first and last points
    /// being the start and end of the path.
    Bezier { points: Vec<Point> },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl PathSpec {
    /// Evaluate the path at the normalised parameter `t` in `[0, 1]`.
    ///
    /// Returns `None` if the path has no points.
    pub fn point_at(&self, t: f64) -> Option<Point> {
        match self {
            PathSpec::Bezier { points } => {
                if points.is_empty() {
                    return None;
                }

                // De Casteljau evaluation
                let t = t.max(0.0).min(1.0);
                let mut work = points.clone();
                for level in 1..work.len() {
                    for i in 0..(work.len() - level) {
                        work[i] = Point::new(
                            (1.0 - t) * work[i].x + t * work[i + 1].x,
                            (1.0 - t) * work[i].y + t * work[i + 1].y,
                        );
                    }
                }
                Some(work[0])
            }
        }
    }

    /// Approximate arc length of the path, by summing `num_steps` chords.
    pub fn length(&self, num_steps: usize) -> f64 {
        let num_steps = num_steps.max(1);
        let mut length = 0.0;
        let mut prev = match self.point_at(0.0) {
            Some(p) => p,
            None => return 0.0,
        };

        for i in 1..=num_steps {
            if let Some(p) = self.point_at(i as f64 / num_steps as f64) {
                length += prev.dist(&p);
                prev = p;
            }
        }

        length
    }

    /// The final point of the path, if there is one.
    pub fn end(&self) -> Option<Point> {
        match self {
            PathSpec::Bezier { points } => points.last().copied(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bezier_ends() {
        let path = PathSpec::Bezier {
            points: vec![
                Point::new(138.0, 85.0),
                Point::new(132.0, 65.0),
                Point::new(125.5, 19.0),
            ],
        };

        assert_eq!(path.point_at(0.0), Some(Point::new(138.0, 85.0)));
        assert_eq!(path.point_at(1.0), Some(Point::new(125.5, 19.0)));
        assert_eq!(path.end(), Some(Point::new(125.5, 19.0)));
    }

    #[test]
    fn test_straight_line_length() {
        let path = PathSpec::Bezier {
            points: vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)],
        };

        assert!((path.length(50) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_path() {
        let path = PathSpec::Bezier { points: vec![] };
        assert_eq!(path.point_at(0.5), None);
        assert_eq!(path.length(10), 0.0);
    }
}
