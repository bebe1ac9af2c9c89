//! Exact-length meanders
//!
//! A meander alternates straight runs with half-circle bends of alternating
//! sense until less than one full period of length is left, then closes with
//! either a short straight or a full straight followed by a fractional bend
//! whose angle is solved so the emitted length equals the target.

use crate::angle::{AngleSpec, TurnSense, TurnToken};
use crate::render::Renderer;
use crate::segment::PathSegment;
use crate::waveguide::WaveguidePath;
use cpwkit_core::{PathError, PathResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use tracing::{debug, info};

/// Sweeps below this are treated as zero and not emitted.
const MIN_SWEEP: f64 = 1e-12;

/// How a meander finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeanderEnding {
    /// The budget ran out before a full straight; no trailing bend.
    Straight,
    /// A full straight followed by a fractional bend.
    Bend,
}

/// Summary of an emitted meander.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanderReport {
    /// Full straight-plus-half-turn periods in the body.
    pub periods: usize,
    pub ending: MeanderEnding,
    /// Signed sweep of the closing bend in radians, 0 when ending on a
    /// straight.
    pub residual_angle: f64,
    /// Emitted centreline length.
    pub length: f64,
    /// Segments appended.
    pub segments: usize,
}

fn validate(total: f64, radius: f64, straight: f64) -> PathResult<()> {
    if !(total >= 0.0 && total.is_finite()) {
        return Err(PathError::invalid_argument(
            "total length",
            format!("must be >= 0, got {}", total),
        ));
    }
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(PathError::invalid_argument(
            "radius",
            format!("must be > 0, got {}", radius),
        ));
    }
    if !(straight >= 0.0 && straight.is_finite()) {
        return Err(PathError::invalid_argument(
            "straight length",
            format!("must be >= 0, got {}", straight),
        ));
    }
    Ok(())
}

/// First bend of a phase-started meander and the sense of the next turn.
///
/// Phases of exactly 0 and PI start with a full half turn (right and left
/// respectively). Any other phase starts with a partial bend of
/// `phase - PI` radians.
pub fn initial_bend(phase: f64) -> (f64, TurnSense) {
    let phase = phase.rem_euclid(TAU);
    if phase == 0.0 {
        (-PI, TurnSense::Left)
    } else if phase == PI {
        (PI, TurnSense::Right)
    } else if phase < PI {
        (phase - PI, TurnSense::Left)
    } else {
        (phase - PI, TurnSense::Right)
    }
}

impl<R: Renderer> WaveguidePath<R> {
    fn emitted_since(&self, mark: usize) -> f64 {
        self.segments[mark..].iter().map(PathSegment::length).sum()
    }

    fn report(&self, mark: usize, periods: usize, residual_angle: f64) -> MeanderReport {
        let report = MeanderReport {
            periods,
            ending: if residual_angle == 0.0 {
                MeanderEnding::Straight
            } else {
                MeanderEnding::Bend
            },
            residual_angle,
            length: self.emitted_since(mark),
            segments: self.segments.len() - mark,
        };
        info!(
            "Meander: {} periods, {} segments, length {:.6}, residual {:.6} rad",
            report.periods, report.segments, report.length, report.residual_angle
        );
        report
    }

    fn straight_if_any(&mut self, length: f64) -> PathResult<()> {
        if length > 0.0 {
            self.straight(length, None, None)?;
        }
        Ok(())
    }

    /// Closes a meander whose body used `mark..` and whose next turn is
    /// `sense`. Returns the residual sweep.
    fn meander_tail(
        &mut self,
        mark: usize,
        total: f64,
        radius: f64,
        straight: f64,
        sense: TurnSense,
        points: usize,
    ) -> PathResult<f64> {
        let remaining = total - self.emitted_since(mark);
        if remaining < straight {
            self.straight_if_any(remaining)?;
            return Ok(0.0);
        }
        self.straight_if_any(straight)?;
        let sweep = sense.sign() * (remaining - straight) / radius;
        if sweep.abs() < MIN_SWEEP {
            return Ok(0.0);
        }
        self.bend_sweep(radius, sweep, None, None, points)?;
        Ok(sweep)
    }

    /// Meander of exactly `total` length that begins mid-curve according to
    /// `phase` (radians, taken modulo a full turn).
    ///
    /// A target shorter than one straight run, or than the opening bend,
    /// yields a single straight of the target length.
    pub fn meander(
        &mut self,
        total: f64,
        radius: f64,
        straight: f64,
        phase: f64,
        points: usize,
    ) -> PathResult<MeanderReport> {
        self.live("meander")?;
        validate(total, radius, straight)?;
        if !phase.is_finite() {
            return Err(PathError::invalid_argument("phase", "must be finite"));
        }

        let checkpoint = self.checkpoint();
        let result = self.meander_by_phase(total, radius, straight, phase, points);
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    fn meander_by_phase(
        &mut self,
        total: f64,
        radius: f64,
        straight: f64,
        phase: f64,
        points: usize,
    ) -> PathResult<MeanderReport> {
        let mark = self.segments.len();
        let (first, mut sense) = initial_bend(phase);
        debug!("meander: total {}, first bend {:.6} rad", total, first);

        if total < straight || total < radius * first.abs() {
            self.straight_if_any(total)?;
            return Ok(self.report(mark, 0, 0.0));
        }

        self.bend_sweep(radius, first, None, None, points)?;

        let period = straight + PI * radius;
        let mut periods = 0;
        while total - period > self.emitted_since(mark) {
            self.straight_if_any(straight)?;
            self.bend_sweep(radius, sense.sign() * PI, None, None, points)?;
            sense = sense.flipped();
            periods += 1;
        }

        let residual = self.meander_tail(mark, total, radius, straight, sense, points)?;
        Ok(self.report(mark, periods, residual))
    }

    /// Straight-first meander driven by turn tokens: every period is a
    /// straight followed by the bend `turn` names, and the token then
    /// alternates (`l` and `r` are followed by the opposite half turn). The
    /// closing bend turns in the sense of the pending token.
    pub fn meander_with_turn(
        &mut self,
        total: f64,
        radius: f64,
        straight: f64,
        turn: TurnToken,
        points: usize,
    ) -> PathResult<MeanderReport> {
        self.live("meander_with_turn")?;
        validate(total, radius, straight)?;

        let checkpoint = self.checkpoint();
        let result = self.meander_by_token(total, radius, straight, turn, points);
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    fn meander_by_token(
        &mut self,
        total: f64,
        radius: f64,
        straight: f64,
        mut turn: TurnToken,
        points: usize,
    ) -> PathResult<MeanderReport> {
        let mark = self.segments.len();
        let period = straight + PI * radius;
        let mut periods = 0;
        while total - period > self.emitted_since(mark) {
            self.straight_if_any(straight)?;
            self.bend_sweep(radius, AngleSpec::from(turn).radians(), None, None, points)?;
            turn = turn.next();
            periods += 1;
        }

        let residual = self.meander_tail(mark, total, radius, straight, turn.sense(), points)?;
        Ok(self.report(mark, periods, residual))
    }
}
