//! # AutoMgr Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::follower::{PathSpec, Point, Pose};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMgrParams {
    /// Hard limit on the mission duration, after which the mission is forced to complete.
    ///
    /// Units: seconds
    pub time_limit_s: f64,

    /// Pose the robot starts the mission in.
    pub starting_pose: Pose,

    /// Path from the starting pose to the scoring zone.
    pub scoring_path: BezierParams,

    /// Path from the scoring zone to the observation zone.
    pub observation_path: BezierParams,
}

/// Control points of an offline authored Bezier path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BezierParams {
    pub points: Vec<Point>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BezierParams {
    pub fn to_path(&self) -> PathSpec {
        PathSpec::Bezier {
            points: self.points.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shipped_params() {
        let p: AutoMgrParams =
            util::params::parse(include_str!("../../../../params/auto_mgr.toml")).unwrap();

        assert_eq!(p.time_limit_s, 30.0);
        assert_eq!(p.starting_pose, Pose { x: 138.0, y: 85.0, heading_rad: 0.0 });

        // The scoring path ends where the observation path starts
        assert_eq!(p.scoring_path.to_path().end(), Some(Point::new(125.5, 19.0)));
        assert_eq!(
            p.observation_path.to_path().point_at(0.0),
            p.scoring_path.to_path().end()
        );
        assert_eq!(
            p.observation_path.to_path().end(),
            Some(Point::new(134.22, 125.22))
        );
    }
}
