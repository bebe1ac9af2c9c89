//! Write head of a waveguide path: pose and cross-section.

use cpwkit_core::{normalize_angle, PathError, PathResult, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Position plus heading (radians, kept in `[-PI, PI)`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub heading: f64,
}

impl Pose {
    pub fn new(position: Point, heading: f64) -> Self {
        Self {
            position,
            heading: normalize_angle(heading),
        }
    }

    /// Pose reached after moving `distance` along the current heading.
    pub fn advanced(&self, distance: f64) -> Self {
        Self {
            position: self.position.polar(distance, self.heading),
            heading: self.heading,
        }
    }

    /// Maps a point given in the path-local frame (x along the heading, y to
    /// the left) into world coordinates.
    pub fn to_world(&self, local: Point) -> Point {
        let (sin, cos) = self.heading.sin_cos();
        Point::new(
            self.position.x + cos * local.x - sin * local.y,
            self.position.y + sin * local.x + cos * local.y,
        )
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.4} rad", self.position, self.heading)
    }
}

/// Centre-conductor width and conductor-to-ground gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub width: f64,
    pub gap: f64,
}

impl CrossSection {
    /// Creates a validated cross-section.
    pub fn new(width: f64, gap: f64) -> PathResult<Self> {
        let cs = Self { width, gap };
        cs.validate()?;
        Ok(cs)
    }

    pub fn validate(&self) -> PathResult<()> {
        if !(self.width > 0.0 && self.width.is_finite()) {
            return Err(PathError::invalid_argument(
                "width",
                format!("must be > 0, got {}", self.width),
            ));
        }
        if !(self.gap > 0.0 && self.gap.is_finite()) {
            return Err(PathError::invalid_argument(
                "gap",
                format!("must be > 0, got {}", self.gap),
            ));
        }
        Ok(())
    }

    /// Distance from the centreline to the outer ground edge.
    pub fn half_extent(&self) -> f64 {
        self.width / 2.0 + self.gap
    }

    /// Full width of the etched opening, `width + 2 * gap`.
    pub fn total_extent(&self) -> f64 {
        self.width + 2.0 * self.gap
    }

    /// Copy with optional replacements.
    pub fn with(&self, width: Option<f64>, gap: Option<f64>) -> PathResult<Self> {
        Self::new(width.unwrap_or(self.width), gap.unwrap_or(self.gap))
    }
}

impl Default for CrossSection {
    fn default() -> Self {
        Self {
            width: 10.0,
            gap: 6.0,
        }
    }
}

/// Initial heading of a path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StartDirection {
    #[default]
    PlusX,
    MinusX,
    PlusY,
    MinusY,
    /// Arbitrary heading in radians.
    Angle(f64),
}

impl StartDirection {
    pub fn radians(self) -> f64 {
        match self {
            Self::PlusX => 0.0,
            Self::MinusX => PI,
            Self::PlusY => PI / 2.0,
            Self::MinusY => -PI / 2.0,
            Self::Angle(a) => a,
        }
    }
}

impl From<f64> for StartDirection {
    fn from(angle: f64) -> Self {
        Self::Angle(angle)
    }
}

impl FromStr for StartDirection {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+x" => Ok(Self::PlusX),
            "-x" => Ok(Self::MinusX),
            "+y" => Ok(Self::PlusY),
            "-y" => Ok(Self::MinusY),
            other => other.parse::<f64>().map(Self::Angle).map_err(|_| {
                PathError::invalid_argument(
                    "direction",
                    format!("expected +x, -x, +y, -y or an angle in radians, got '{}'", other),
                )
            }),
        }
    }
}

impl fmt::Display for StartDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlusX => write!(f, "+x"),
            Self::MinusX => write!(f, "-x"),
            Self::PlusY => write!(f, "+y"),
            Self::MinusY => write!(f, "-y"),
            Self::Angle(a) => write!(f, "{}", a),
        }
    }
}

impl TryFrom<String> for StartDirection {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StartDirection> for String {
    fn from(value: StartDirection) -> Self {
        value.to_string()
    }
}

/// Pose and cross-section of a live path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub pose: Pose,
    pub section: CrossSection,
}

impl Cursor {
    pub fn new(pose: Pose, section: CrossSection) -> Self {
        Self { pose, section }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_normalizes_heading() {
        let pose = Pose::new(Point::zero(), 3.0 * PI);
        assert!((pose.heading + PI).abs() < 1e-12);
    }

    #[test]
    fn test_to_world_uses_left_normal() {
        let pose = Pose::new(Point::new(5.0, 5.0), PI / 2.0);
        let p = pose.to_world(Point::new(2.0, 1.0));
        assert!(p.approx_eq(Point::new(4.0, 7.0), 1e-12));
    }

    #[test]
    fn test_cross_section_validation() {
        assert!(CrossSection::new(10.0, 6.0).is_ok());
        assert!(matches!(
            CrossSection::new(0.0, 6.0),
            Err(PathError::InvalidArgument { .. })
        ));
        assert!(CrossSection::new(10.0, -1.0).is_err());
        assert_eq!(CrossSection::new(4.0, 3.0).unwrap().total_extent(), 10.0);
    }

    #[test]
    fn test_start_direction_tokens() {
        assert_eq!("+y".parse::<StartDirection>().unwrap().radians(), PI / 2.0);
        assert_eq!("-x".parse::<StartDirection>().unwrap().radians(), PI);
        assert_eq!(
            "0.5".parse::<StartDirection>().unwrap(),
            StartDirection::Angle(0.5)
        );
        assert!("north".parse::<StartDirection>().is_err());
    }
}
