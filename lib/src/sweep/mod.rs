//! Axis sweep generation module.
//!
//! This module produces the trajectory of a single layer: a raster of
//! parallel sweep lines covering the full build area.
//!
//! # Overview
//!
//! A sweep is described by two independent choices:
//! - [`Orientation`] - which axis is swept across (primary) and which one is
//!   stepped through between lines (secondary)
//! - [`Directionality`] - whether consecutive lines alternate direction
//!   (zig-zag) or all run from the origin edge to the far edge (one-direction)
//!
//! # Algorithm
//!
//! 1. Emit the origin waypoint `(t0, 0, 0, height, power)`
//! 2. For each of `floor(secondary_bound / interline_gap) + 1` lines:
//!    - sweep the full primary extent, ending with power off
//!    - if the next line still fits, index the secondary axis by
//!      `interline_gap` (rounded to 2 decimals) with power back on
//! 3. Stop after the last sweep; no return-to-origin move is appended
//!
//! One-direction sweeps fold the retrace to the origin edge into the
//! indexing move, so that move takes as long as a full sweep.
//!
//! The rounded secondary coordinate is clamped to the build area, so a gap
//! that is not a multiple of 0.01 never lands a line past the far edge.

use crate::geometry::{round_to, Axis, Trajectory, Waypoint};
use crate::{CoordF, Error, Result};
use std::fmt;

/// Decimal places kept on the secondary axis after each indexing move.
pub const INDEX_ROUNDING_DECIMALS: i32 = 2;

/// Upper bound on sweep lines in one layer.
pub const MAX_SWEEP_LINES: usize = 1_000_000;

/// Sweep orientation within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Lines run along X, stacked along Y.
    Horizontal,
    /// Lines run along Y, stacked along X.
    Vertical,
}

impl Orientation {
    /// Axis swept across by each line.
    #[inline]
    pub fn primary_axis(self) -> Axis {
        match self {
            Orientation::Horizontal => Axis::X,
            Orientation::Vertical => Axis::Y,
        }
    }

    /// Axis stepped through between lines.
    #[inline]
    pub fn secondary_axis(self) -> Axis {
        self.primary_axis().other()
    }

    /// Orientation for a layer when alternating by parity: even layers are horizontal.
    #[inline]
    pub fn for_layer(layer_index: usize) -> Orientation {
        if layer_index % 2 == 0 {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// Line directionality within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directionality {
    /// Consecutive lines traverse in alternating directions.
    ZigZag,
    /// Every line traverses from the origin edge to the far edge.
    OneDirection,
}

/// Direction of a single sweep line along the primary axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepDirection {
    /// From 0 toward the extent.
    Forward,
    /// From the extent back toward 0.
    Backward,
}

impl SweepDirection {
    /// Direction of zig-zag line `line_index`; the first line runs forward.
    #[inline]
    pub fn for_line(line_index: usize) -> SweepDirection {
        if line_index % 2 == 0 {
            SweepDirection::Forward
        } else {
            SweepDirection::Backward
        }
    }

    /// Primary-axis coordinate a sweep in this direction ends at.
    #[inline]
    pub fn destination(self, extent: CoordF) -> CoordF {
        match self {
            SweepDirection::Forward => extent,
            SweepDirection::Backward => 0.0,
        }
    }
}

/// A sweep variant: orientation x directionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepPattern {
    pub orientation: Orientation,
    pub directionality: Directionality,
}

impl SweepPattern {
    pub const HORIZONTAL_ZIG_ZAG: SweepPattern =
        SweepPattern::new(Orientation::Horizontal, Directionality::ZigZag);
    pub const VERTICAL_ZIG_ZAG: SweepPattern =
        SweepPattern::new(Orientation::Vertical, Directionality::ZigZag);
    pub const HORIZONTAL_ONE_DIRECTION: SweepPattern =
        SweepPattern::new(Orientation::Horizontal, Directionality::OneDirection);
    pub const VERTICAL_ONE_DIRECTION: SweepPattern =
        SweepPattern::new(Orientation::Vertical, Directionality::OneDirection);

    pub const fn new(orientation: Orientation, directionality: Directionality) -> Self {
        Self {
            orientation,
            directionality,
        }
    }

    /// Number of sweep lines for the given parameters.
    pub fn line_count(&self, params: &SweepParams) -> usize {
        let bound = params.extent(self.orientation.secondary_axis());
        ((bound / params.interline_gap).floor() as usize).saturating_add(1)
    }

    /// Destination of line `line_index` along the primary axis.
    fn sweep_destination(&self, line_index: usize, extent: CoordF) -> CoordF {
        match self.directionality {
            Directionality::ZigZag => SweepDirection::for_line(line_index).destination(extent),
            Directionality::OneDirection => SweepDirection::Forward.destination(extent),
        }
    }
}

impl fmt::Display for SweepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let orientation = match self.orientation {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        };
        let directionality = match self.directionality {
            Directionality::ZigZag => "zig-zag",
            Directionality::OneDirection => "one-direction",
        };
        write!(f, "{} {}", orientation, directionality)
    }
}

/// Inputs for one layer's sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    /// Start time of the layer (s).
    pub t0: CoordF,
    /// Build area extent along X (mm).
    pub max_x: CoordF,
    /// Build area extent along Y (mm).
    pub max_y: CoordF,
    /// Head speed (mm/s).
    pub speed: CoordF,
    /// Spacing between sweep lines (mm).
    pub interline_gap: CoordF,
    /// Target layer height (mm).
    pub height: CoordF,
    /// Active emission intensity.
    pub power: CoordF,
}

impl SweepParams {
    /// Extent of the build area along an axis.
    #[inline]
    pub fn extent(&self, axis: Axis) -> CoordF {
        match axis {
            Axis::X => self.max_x,
            Axis::Y => self.max_y,
        }
    }

    /// Check the parameters before generating anything.
    pub fn validate(&self) -> Result<()> {
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            return Err(Error::Config(format!(
                "speed must be positive, got {}",
                self.speed
            )));
        }
        if !(self.interline_gap > 0.0 && self.interline_gap.is_finite()) {
            return Err(Error::Config(format!(
                "interline_gap must be positive, got {}",
                self.interline_gap
            )));
        }
        if !(self.max_x > 0.0 && self.max_x.is_finite() && self.max_y > 0.0 && self.max_y.is_finite())
        {
            return Err(Error::Config(format!(
                "build area must be positive, got {}x{}",
                self.max_x, self.max_y
            )));
        }
        if !(self.t0 >= 0.0 && self.t0.is_finite()) {
            return Err(Error::Config(format!(
                "start time must not be negative, got {}",
                self.t0
            )));
        }
        if !(self.power >= 0.0 && self.power.is_finite()) {
            return Err(Error::Config(format!(
                "power must not be negative, got {}",
                self.power
            )));
        }
        let widest = self.max_x.max(self.max_y);
        if widest / self.interline_gap >= MAX_SWEEP_LINES as CoordF {
            return Err(Error::Config(format!(
                "interline_gap {} over {}mm exceeds {} sweep lines per layer",
                self.interline_gap, widest, MAX_SWEEP_LINES
            )));
        }
        Ok(())
    }
}

/// Generate one layer's trajectory.
///
/// Pure function of its inputs: identical parameters give identical output.
pub fn generate_sweep(params: &SweepParams, pattern: SweepPattern) -> Result<Trajectory> {
    params.validate()?;

    let primary = pattern.orientation.primary_axis();
    let secondary = pattern.orientation.secondary_axis();
    let primary_extent = params.extent(primary);
    let secondary_bound = params.extent(secondary);
    let line_count = pattern.line_count(params);

    let sweep_dt = primary_extent / params.speed;
    let index_dt = match pattern.directionality {
        Directionality::ZigZag => params.interline_gap / params.speed,
        Directionality::OneDirection => primary_extent / params.speed,
    };

    let capacity = line_count
        .checked_mul(2)
        .ok_or_else(|| Error::Config(format!("{} sweep lines overflow", line_count)))?;
    let mut trajectory = Trajectory::with_capacity(capacity);
    let mut last = Waypoint::new(params.t0, 0.0, 0.0, params.height, params.power);
    trajectory.push(last);

    for line in 0..line_count {
        // Sweep move: power off at the far edge
        last = Waypoint {
            t: last.t + sweep_dt,
            power: 0.0,
            ..last
        }
        .with_coord(primary, pattern.sweep_destination(line, primary_extent));
        trajectory.push(last);

        // Indexing move, only while the next line still fits
        let next_secondary = last.coord(secondary) + params.interline_gap;
        if next_secondary <= secondary_bound {
            let line_start = match pattern.directionality {
                Directionality::ZigZag => last.coord(primary),
                Directionality::OneDirection => 0.0,
            };
            last = Waypoint {
                t: last.t + index_dt,
                power: params.power,
                ..last
            }
            .with_coord(primary, line_start)
            .with_coord(
                secondary,
                round_to(next_secondary, INDEX_ROUNDING_DECIMALS).min(secondary_bound),
            );
            trajectory.push(last);
        }
    }

    Ok(trajectory)
}
