//! Bend angles and turn tokens.

use cpwkit_core::{PathError, PathResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

/// Rotational sense of a bend. Left is counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnSense {
    Left,
    Right,
}

impl TurnSense {
    /// Sign applied to a sweep magnitude: +1 for left, -1 for right.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Sense of a signed sweep; `None` for a zero sweep.
    pub fn of(sweep: f64) -> Option<Self> {
        if sweep > 0.0 {
            Some(Self::Left)
        } else if sweep < 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// Sweep angle of a bend. Positive angles turn left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AngleRepr", into = "AngleRepr")]
pub enum AngleSpec {
    Degrees(f64),
    Radians(f64),
    QuarterLeft,
    QuarterRight,
    HalfLeft,
    HalfRight,
}

impl AngleSpec {
    /// Signed sweep in radians.
    pub fn radians(self) -> f64 {
        match self {
            Self::Degrees(d) => d.to_radians(),
            Self::Radians(r) => r,
            Self::QuarterLeft => PI / 2.0,
            Self::QuarterRight => -PI / 2.0,
            Self::HalfLeft => PI,
            Self::HalfRight => -PI,
        }
    }

    /// Signed sweep in radians, rejecting zero, non-finite and
    /// more-than-full-turn values.
    pub fn sweep(self) -> PathResult<f64> {
        let sweep = self.radians();
        if !sweep.is_finite() {
            return Err(PathError::invalid_argument("angle", "must be finite"));
        }
        if sweep == 0.0 {
            return Err(PathError::invalid_argument("angle", "must be non-zero"));
        }
        if sweep.abs() > TAU + 1e-12 {
            return Err(PathError::invalid_argument(
                "angle",
                format!("|{}| rad exceeds a full turn", sweep),
            ));
        }
        Ok(sweep)
    }
}

impl From<f64> for AngleSpec {
    fn from(degrees: f64) -> Self {
        Self::Degrees(degrees)
    }
}

impl From<TurnToken> for AngleSpec {
    fn from(token: TurnToken) -> Self {
        match token {
            TurnToken::Left => Self::QuarterLeft,
            TurnToken::Right => Self::QuarterRight,
            TurnToken::HalfLeft => Self::HalfLeft,
            TurnToken::HalfRight => Self::HalfRight,
        }
    }
}

impl FromStr for AngleSpec {
    type Err = PathError;

    /// Accepts the turn tokens (`l`, `r`, `ll`, `rr` and their long names),
    /// plain numbers in degrees, or numbers suffixed with `rad`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(token) = s.parse::<TurnToken>() {
            return Ok(token.into());
        }
        let parsed = match s.strip_suffix("rad") {
            Some(value) => value.trim().parse::<f64>().map(Self::Radians),
            None => s
                .strip_suffix("deg")
                .unwrap_or(s)
                .trim()
                .parse::<f64>()
                .map(Self::Degrees),
        };
        parsed.map_err(|_| PathError::invalid_argument("angle", format!("malformed angle '{}'", s)))
    }
}

impl fmt::Display for AngleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrees(d) => write!(f, "{}", d),
            Self::Radians(r) => write!(f, "{}rad", r),
            Self::QuarterLeft => write!(f, "l"),
            Self::QuarterRight => write!(f, "r"),
            Self::HalfLeft => write!(f, "ll"),
            Self::HalfRight => write!(f, "rr"),
        }
    }
}

/// Serialized angle: a bare number (degrees) or a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AngleRepr {
    Degrees(f64),
    Text(String),
}

impl TryFrom<AngleRepr> for AngleSpec {
    type Error = PathError;

    fn try_from(value: AngleRepr) -> Result<Self, Self::Error> {
        match value {
            AngleRepr::Degrees(d) => Ok(Self::Degrees(d)),
            AngleRepr::Text(s) => s.parse(),
        }
    }
}

impl From<AngleSpec> for AngleRepr {
    fn from(value: AngleSpec) -> Self {
        match value {
            AngleSpec::Degrees(d) => Self::Degrees(d),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Turn tokens of the straight-first meander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TurnToken {
    /// `l`: quarter turn left.
    Left,
    /// `r`: quarter turn right.
    Right,
    /// `ll`: half turn left.
    HalfLeft,
    /// `rr`: half turn right.
    HalfRight,
}

impl TurnToken {
    /// Token of the bend that follows this one in a meander. A quarter turn
    /// is always followed by a half turn the other way.
    pub fn next(self) -> Self {
        match self {
            Self::HalfLeft | Self::Left => Self::HalfRight,
            Self::HalfRight | Self::Right => Self::HalfLeft,
        }
    }

    pub fn sense(self) -> TurnSense {
        match self {
            Self::Left | Self::HalfLeft => TurnSense::Left,
            Self::Right | Self::HalfRight => TurnSense::Right,
        }
    }
}

impl FromStr for TurnToken {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "l" | "quarter-left" => Ok(Self::Left),
            "r" | "quarter-right" => Ok(Self::Right),
            "ll" | "half-left" => Ok(Self::HalfLeft),
            "rr" | "half-right" => Ok(Self::HalfRight),
            other => Err(PathError::invalid_argument(
                "turn",
                format!("expected l, r, ll or rr, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for TurnToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Left => "l",
            Self::Right => "r",
            Self::HalfLeft => "ll",
            Self::HalfRight => "rr",
        };
        f.write_str(token)
    }
}

impl TryFrom<String> for TurnToken {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TurnToken> for String {
    fn from(value: TurnToken) -> Self {
        value.to_string()
    }
}
