//! Physical units for persisted layouts
//!
//! Path geometry is unit-less; a layout file fixes what one user unit means
//! physically (`unit`, in metres) and the database resolution
//! (`precision`, in metres).

use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named length units a layout can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// 1e-9 m
    Nanometer,
    /// 1e-6 m
    #[default]
    Micron,
    /// 1e-3 m
    Millimeter,
}

impl LengthUnit {
    /// Size of one unit in metres.
    pub fn meters(self) -> f64 {
        match self {
            Self::Nanometer => 1e-9,
            Self::Micron => 1e-6,
            Self::Millimeter => 1e-3,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nanometer => write!(f, "nm"),
            Self::Micron => write!(f, "um"),
            Self::Millimeter => write!(f, "mm"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nm" | "nanometer" | "nanometre" => Ok(Self::Nanometer),
            "um" | "µm" | "micron" | "micrometer" | "micrometre" => Ok(Self::Micron),
            "mm" | "millimeter" | "millimetre" => Ok(Self::Millimeter),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Unit and precision handed to a layout sink on finalize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutUnits {
    /// Size of one user unit in metres.
    pub unit: f64,
    /// Database resolution in metres.
    pub precision: f64,
}

impl Default for LayoutUnits {
    fn default() -> Self {
        Self {
            unit: 1.0e-6,
            precision: 1.0e-9,
        }
    }
}

impl LayoutUnits {
    /// Creates a unit/precision pair.
    pub fn new(unit: f64, precision: f64) -> Self {
        Self { unit, precision }
    }

    /// Units for a named length unit at the given resolution.
    pub fn from_length_unit(unit: LengthUnit, precision: f64) -> Self {
        Self::new(unit.meters(), precision)
    }

    /// Checks both values are positive and the precision is not coarser
    /// than the unit.
    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.unit > 0.0 && self.unit.is_finite()) {
            return Err(LayoutError::InvalidUnits(format!(
                "unit must be > 0, got {}",
                self.unit
            )));
        }
        if !(self.precision > 0.0 && self.precision.is_finite()) {
            return Err(LayoutError::InvalidUnits(format!(
                "precision must be > 0, got {}",
                self.precision
            )));
        }
        if self.precision > self.unit {
            return Err(LayoutError::InvalidUnits(format!(
                "precision {} is coarser than unit {}",
                self.precision, self.unit
            )));
        }
        Ok(())
    }

    /// Resolution expressed in user units.
    pub fn grid(&self) -> f64 {
        self.precision / self.unit
    }

    /// The named unit matching `unit`, if any.
    pub fn length_unit(&self) -> Option<LengthUnit> {
        [LengthUnit::Nanometer, LengthUnit::Micron, LengthUnit::Millimeter]
            .into_iter()
            .find(|u| ((u.meters() - self.unit) / self.unit).abs() < 1e-9)
    }
}
