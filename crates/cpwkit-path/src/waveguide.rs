//! Cursor-based waveguide path builder
//!
//! A [`WaveguidePath`] is started at a pose, extended by primitive calls that
//! each append one immutable [`PathSegment`] and advance the cursor, and
//! finished by [`WaveguidePath::end`], which renders every segment into the
//! sink of its [`Renderer`]. A failed call leaves both the segments and the
//! cursor as they were.

use crate::angle::AngleSpec;
use crate::cursor::{CrossSection, Cursor, Pose, StartDirection};
use crate::render::{PolygonRenderer, Renderer, ScriptRenderer};
use crate::segment::{FilletSide, PathSegment, DEFAULT_BEND_POINTS, MIN_BEND_POINTS};
use cpwkit_core::{
    displacement_and_heading, fillet_outline, BooleanOp, BooleanProvider, Layer, PathError,
    PathResult, Point, Region, Result, DEFAULT_POINTS_PER_TURN,
};
use cpwkit_layout::SketchBoolean;
use tracing::{debug, info, warn};

/// Lifecycle of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathState {
    /// Created, not started.
    Idle,
    /// Accepting primitives.
    Live(Cursor),
    /// Rendered; holds the final cursor.
    Finalized(Cursor),
}

/// Restore point for multi-primitive operations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    state: PathState,
    segments: usize,
}

/// One coplanar-waveguide trace.
#[derive(Debug)]
pub struct WaveguidePath<R: Renderer = PolygonRenderer> {
    renderer: R,
    layer: Layer,
    section: CrossSection,
    boolean: Box<dyn BooleanProvider>,
    fillet_points: usize,
    state: PathState,
    pub(crate) segments: Vec<PathSegment>,
}

impl WaveguidePath<PolygonRenderer> {
    /// Path rendered as closed regions into a layout sink.
    pub fn polygon(section: CrossSection, layer: Layer) -> Self {
        Self::new(PolygonRenderer::new(), section, layer)
    }
}

impl WaveguidePath<ScriptRenderer> {
    /// Path rendered as drafting commands.
    pub fn script(section: CrossSection, renderer: ScriptRenderer) -> Self {
        Self::new(renderer, section, Layer::default())
    }
}

fn require_non_negative(name: &str, value: f64) -> PathResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PathError::invalid_argument(name, format!("must be >= 0, got {}", value)))
    }
}

fn require_positive(name: &str, value: f64) -> PathResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PathError::invalid_argument(name, format!("must be > 0, got {}", value)))
    }
}

fn local_rect(x0: f64, x1: f64, width: f64) -> Vec<Point> {
    vec![
        Point::new(x0, -width / 2.0),
        Point::new(x1, -width / 2.0),
        Point::new(x1, width / 2.0),
        Point::new(x0, width / 2.0),
    ]
}

impl<R: Renderer> WaveguidePath<R> {
    /// Creates an idle path. `section` is the cross-section `start` uses.
    pub fn new(renderer: R, section: CrossSection, layer: Layer) -> Self {
        Self {
            renderer,
            layer,
            section,
            boolean: Box::new(SketchBoolean::default()),
            fillet_points: DEFAULT_POINTS_PER_TURN,
            state: PathState::Idle,
            segments: Vec::new(),
        }
    }

    /// Replaces the boolean engine used by filleted gaps and masks.
    pub fn with_boolean(mut self, provider: Box<dyn BooleanProvider>) -> Self {
        self.boolean = provider;
        self
    }

    /// Points per full turn used when rounding open-gap corners.
    pub fn with_fillet_points(mut self, points: usize) -> Self {
        self.fillet_points = points.max(4);
        self
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Cross-section applied by [`WaveguidePath::start`].
    pub fn default_section(&self) -> CrossSection {
        self.section
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, PathState::Live(_))
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, PathState::Finalized(_))
    }

    /// Emitted segments, in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Current cursor; fails on a path that was never started.
    pub fn cursor(&self) -> PathResult<Cursor> {
        match self.state {
            PathState::Live(c) | PathState::Finalized(c) => Ok(c),
            PathState::Idle => Err(PathError::invalid_state("path has not been started")),
        }
    }

    pub fn position(&self) -> PathResult<Point> {
        Ok(self.cursor()?.pose.position)
    }

    pub fn heading(&self) -> PathResult<f64> {
        Ok(self.cursor()?.pose.heading)
    }

    pub fn cross_section(&self) -> PathResult<CrossSection> {
        Ok(self.cursor()?.section)
    }

    /// Sum of the centreline lengths of every emitted segment.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(PathSegment::length).sum()
    }

    pub(crate) fn live(&self, operation: &str) -> PathResult<Cursor> {
        match self.state {
            PathState::Live(c) => Ok(c),
            PathState::Idle => Err(PathError::invalid_state(format!(
                "{} called before start",
                operation
            ))),
            PathState::Finalized(_) => Err(PathError::invalid_state(format!(
                "{} called after end",
                operation
            ))),
        }
    }

    fn push(&mut self, segment: PathSegment) {
        let end = segment.end();
        let section = segment.section_end();
        debug!(
            "{} of length {:.4} -> {} (w={}, g={})",
            segment.kind(),
            segment.length(),
            end,
            section.width,
            section.gap
        );
        self.segments.push(segment);
        self.state = PathState::Live(Cursor::new(end, section));
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state,
            segments: self.segments.len(),
        }
    }

    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.segments.truncate(checkpoint.segments);
        self.state = checkpoint.state;
    }

    /// Starts the path with its configured cross-section.
    pub fn start(&mut self, position: Point, direction: impl Into<StartDirection>) -> PathResult<()> {
        let section = self.section;
        self.start_with(position, direction, section)
    }

    /// Starts the path with an explicit cross-section.
    pub fn start_with(
        &mut self,
        position: Point,
        direction: impl Into<StartDirection>,
        section: CrossSection,
    ) -> PathResult<()> {
        match self.state {
            PathState::Idle => {}
            PathState::Live(_) => return Err(PathError::invalid_state("path already started")),
            PathState::Finalized(_) => {
                return Err(PathError::invalid_state("path already ended"))
            }
        }
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(PathError::invalid_argument("position", "must be finite"));
        }
        section.validate()?;
        let heading = direction.into().radians();
        if !heading.is_finite() {
            return Err(PathError::invalid_argument("direction", "must be finite"));
        }

        let pose = Pose::new(position, heading);
        debug!("start at {} (w={}, g={})", pose, section.width, section.gap);
        self.state = PathState::Live(Cursor::new(pose, section));
        Ok(())
    }

    /// Straight run along the current heading. Giving an end width or gap
    /// turns it into a linear taper; a zero-length taper is a pure
    /// cross-section change.
    pub fn straight(
        &mut self,
        length: f64,
        width_end: Option<f64>,
        gap_end: Option<f64>,
    ) -> PathResult<()> {
        let cursor = self.live("straight")?;
        require_non_negative("length", length)?;
        self.emit_straight(cursor.pose, length, cursor.section, width_end, gap_end)
    }

    fn emit_straight(
        &mut self,
        start: Pose,
        length: f64,
        from: CrossSection,
        width_end: Option<f64>,
        gap_end: Option<f64>,
    ) -> PathResult<()> {
        let segment = if width_end.is_none() && gap_end.is_none() {
            PathSegment::Straight {
                start,
                length,
                section: from,
            }
        } else {
            PathSegment::Taper {
                start,
                length,
                from,
                to: from.with(width_end, gap_end)?,
            }
        };
        self.push(segment);
        Ok(())
    }

    /// Straight run aimed at `end`. The heading becomes the direction of the
    /// displacement; aiming at the current position keeps the heading.
    pub fn straight_to(
        &mut self,
        end: Point,
        width_end: Option<f64>,
        gap_end: Option<f64>,
    ) -> PathResult<()> {
        let cursor = self.live("straight_to")?;
        if !(end.x.is_finite() && end.y.is_finite()) {
            return Err(PathError::invalid_argument("end", "must be finite"));
        }
        let (distance, heading) = displacement_and_heading(cursor.pose.position, end);
        let heading = if distance == 0.0 {
            cursor.pose.heading
        } else {
            heading
        };
        let start = Pose::new(cursor.pose.position, heading);
        self.emit_straight(start, distance, cursor.section, width_end, gap_end)
    }

    /// Linear taper aimed at `end`, finishing with the given cross-section.
    pub fn taper_to(&mut self, end: Point, width_end: f64, gap_end: f64) -> PathResult<()> {
        self.straight_to(end, Some(width_end), Some(gap_end))
    }

    /// Break in the centre conductor: the whole `width + 2 * gap` opening is
    /// etched for `distance`, widening or narrowing to the end cross-section
    /// when one is given.
    pub fn open_gap(
        &mut self,
        distance: f64,
        width_end: Option<f64>,
        gap_end: Option<f64>,
    ) -> PathResult<()> {
        let cursor = self.live("open_gap")?;
        require_non_negative("distance", distance)?;
        let to = cursor.section.with(width_end, gap_end)?;
        self.push(PathSegment::OpenGap {
            start: cursor.pose,
            length: distance,
            from: cursor.section,
            to,
        });
        Ok(())
    }

    /// Open gap whose corners on `side` are rounded with `radius`, with the
    /// conductor tip next to it rounded to match. `direction` overrides the
    /// current heading for this and later segments.
    pub fn open_gap_fillet(
        &mut self,
        distance: f64,
        side: FilletSide,
        radius: f64,
        direction: Option<StartDirection>,
    ) -> PathResult<()> {
        let cursor = self.live("open_gap_fillet")?;
        require_positive("distance", distance)?;
        require_positive("fillet radius", radius)?;

        let section = cursor.section;
        let extent = section.total_extent();
        if radius > distance / 2.0 {
            return Err(PathError::geometry(format!(
                "fillet radius {} exceeds half the gap length {}",
                radius, distance
            )));
        }
        if radius > extent / 2.0 {
            return Err(PathError::geometry(format!(
                "fillet radius {} exceeds half the gap extent {}",
                radius, extent
            )));
        }

        let heading = direction.map_or(cursor.pose.heading, StartDirection::radians);
        let start = Pose::new(cursor.pose.position, heading);

        // Local frame: x along the path from the gap start, y to the left.
        let gap = Region::new(fillet_outline(
            &local_rect(0.0, distance, extent),
            radius,
            self.fillet_points,
        ));
        let (sharp, notch_from) = match side {
            FilletSide::Begin => (local_rect(distance - radius, distance, extent), distance),
            FilletSide::End => (local_rect(0.0, radius, extent), -2.0 * radius),
        };
        let opening = self
            .boolean
            .boolean(&[gap], &[Region::new(sharp)], BooleanOp::Union)?;

        let notch = Region::new(fillet_outline(
            &local_rect(notch_from, notch_from + 2.0 * radius, section.width),
            radius,
            self.fillet_points,
        ));
        let notch_slice = match side {
            FilletSide::Begin => local_rect(notch_from, notch_from + radius, section.width),
            FilletSide::End => local_rect(notch_from + radius, notch_from + 2.0 * radius, section.width),
        };
        let corners = self
            .boolean
            .boolean(&[Region::new(notch_slice)], &[notch], BooleanOp::Subtract)?;

        let regions = opening
            .into_iter()
            .chain(corners)
            .map(|r| r.rotated(heading, Point::zero()).translated(start.position))
            .collect();

        self.push(PathSegment::FilletedGap {
            start,
            length: distance,
            section,
            side,
            radius,
            regions,
        });
        Ok(())
    }

    /// Circular bend about a centre `radius` to the side of the turn.
    /// `points` sets the tessellation density of rendered arcs.
    pub fn bend(
        &mut self,
        radius: f64,
        angle: impl Into<AngleSpec>,
        width_end: Option<f64>,
        gap_end: Option<f64>,
        points: usize,
    ) -> PathResult<()> {
        self.live("bend")?;
        let sweep = angle.into().sweep()?;
        self.bend_sweep(radius, sweep, width_end, gap_end, points)
    }

    /// Bend with the default tessellation and constant cross-section.
    pub fn turn(&mut self, radius: f64, angle: impl Into<AngleSpec>) -> PathResult<()> {
        self.bend(radius, angle, None, None, DEFAULT_BEND_POINTS)
    }

    pub(crate) fn bend_sweep(
        &mut self,
        radius: f64,
        sweep: f64,
        width_end: Option<f64>,
        gap_end: Option<f64>,
        points: usize,
    ) -> PathResult<()> {
        let cursor = self.live("bend")?;
        require_positive("radius", radius)?;
        let from = cursor.section;
        let to = from.with(width_end, gap_end)?;
        let half = from.half_extent().max(to.half_extent());
        if radius < half {
            return Err(PathError::geometry(format!(
                "bend radius {} is smaller than half the cross-section {}",
                radius, half
            )));
        }
        let points = if points < MIN_BEND_POINTS {
            warn!("Bend tessellation of {} points raised to {}", points, MIN_BEND_POINTS);
            MIN_BEND_POINTS
        } else {
            points
        };

        self.push(PathSegment::Arc {
            start: cursor.pose,
            radius,
            sweep,
            from,
            to,
            points,
        });
        Ok(())
    }

    /// Renders every segment into `sink` and closes the path.
    pub fn end(&mut self, sink: &mut R::Sink) -> Result<()> {
        let cursor = self.live("end")?;
        self.renderer.begin(self.layer, sink)?;
        for segment in &self.segments {
            self.renderer.render(segment, self.layer, sink)?;
        }
        self.renderer.finish(self.layer, sink)?;

        self.state = PathState::Finalized(cursor);
        info!(
            "Path finished: {} segments, length {:.4}, ending at {}",
            self.segments.len(),
            self.length(),
            cursor.pose
        );
        Ok(())
    }

    /// All etched outlines of the path, in world coordinates.
    pub fn outlines(&self) -> Vec<Region> {
        self.segments.iter().flat_map(PathSegment::outlines).collect()
    }

    /// Metal left after etching this path out of `ground_plane` (a
    /// 1000 x 1000 square about the origin when none is given).
    pub fn use_as_mask(&self, ground_plane: Option<&[Region]>) -> PathResult<Vec<Region>> {
        let default_ground;
        let ground = match ground_plane {
            Some(g) => g,
            None => {
                default_ground = [Region::rectangle(
                    Point::new(-500.0, -500.0),
                    Point::new(500.0, 500.0),
                )];
                &default_ground[..]
            }
        };
        let etched: Vec<Region> = self
            .outlines()
            .into_iter()
            .filter(|r| !r.is_degenerate(1e-12))
            .collect();
        if etched.is_empty() {
            return Err(PathError::invalid_state("path has no geometry to mask with"));
        }
        self.boolean.boolean(ground, &etched, BooleanOp::Subtract)
    }
}
