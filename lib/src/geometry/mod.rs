//! Geometry primitives for scan trajectories.
//!
//! This module provides the value types every generator produces:
//! - [`Waypoint`] - a timestamped position with the emission power of the segment ending there
//! - [`Trajectory`] - an ordered sequence of waypoints (a path, not a set)
//! - [`Axis`] - one of the two planar axes of the scanning head
//!
//! ## Coordinate System
//!
//! All values are unscaled floating-point: millimeters for positions,
//! seconds since build start for time. The build area spans
//! `[0, max_x] x [0, max_y]` with the origin at the corner the head starts from.

mod trajectory;
mod waypoint;

pub use trajectory::Trajectory;
pub use waypoint::Waypoint;

use crate::CoordF;

/// A planar axis of the scanning head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The other planar axis.
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Round a value to the given number of decimal places (half away from zero).
#[inline]
pub fn round_to(value: CoordF, decimals: i32) -> CoordF {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.1 + 0.2, 2), 0.3);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(7.0, 2), 7.0);
        // Accumulated drift collapses back onto the grid
        let mut y = 0.0;
        for _ in 0..10 {
            y = round_to(y + 0.1, 2);
        }
        assert_eq!(y, 1.0);
    }

    #[test]
    fn test_axis_other() {
        assert_eq!(Axis::X.other(), Axis::Y);
        assert_eq!(Axis::Y.other(), Axis::X);
        assert_eq!(Axis::X.to_string(), "X");
    }
}
