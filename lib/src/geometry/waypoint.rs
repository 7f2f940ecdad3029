//! Waypoint type.
//!
//! A waypoint is the 5-tuple `(t, x, y, z, power)` handed to the actuator
//! controller. Field order is the column order of the output files.

use super::Axis;
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A timestamped position of the scanning head.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Absolute time since build start (s).
    pub t: CoordF,
    /// Planar X position (mm).
    pub x: CoordF,
    /// Planar Y position (mm).
    pub y: CoordF,
    /// Target layer height (mm).
    pub z: CoordF,
    /// Emission intensity for the segment ending at this waypoint.
    pub power: CoordF,
}

impl Waypoint {
    /// Create a new waypoint.
    #[inline]
    pub const fn new(t: CoordF, x: CoordF, y: CoordF, z: CoordF, power: CoordF) -> Self {
        Self { t, x, y, z, power }
    }

    /// Get the coordinate along a planar axis.
    #[inline]
    pub fn coord(&self, axis: Axis) -> CoordF {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Copy of this waypoint with one planar coordinate replaced.
    #[inline]
    pub fn with_coord(mut self, axis: Axis, value: CoordF) -> Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
        self
    }

    /// Whether the segment ending here emits.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.power > 0.0
    }

    /// Planar distance to another waypoint (mm).
    #[inline]
    pub fn distance_to(&self, other: &Waypoint) -> CoordF {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.t, self.x, self.y, self.z, self.power
        )
    }
}
