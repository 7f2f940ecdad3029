//! Trajectory type.
//!
//! An ordered sequence of waypoints. Order is the path the head follows.

use super::Waypoint;
use crate::CoordF;

/// An ordered sequence of waypoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<Waypoint>,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty trajectory with room for `capacity` waypoints.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Append a waypoint.
    #[inline]
    pub fn push(&mut self, point: Waypoint) {
        self.points.push(point);
    }

    /// Append every waypoint of another trajectory, preserving order.
    pub fn extend(&mut self, other: Trajectory) {
        self.points.extend(other.points);
    }

    /// Get the waypoints.
    #[inline]
    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.points.iter()
    }

    /// Time of the first waypoint.
    pub fn start_time(&self) -> Option<CoordF> {
        self.first().map(|p| p.t)
    }

    /// Time of the last waypoint.
    pub fn end_time(&self) -> Option<CoordF> {
        self.last().map(|p| p.t)
    }

    /// Elapsed time between the first and last waypoint (0 when empty).
    pub fn duration(&self) -> CoordF {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Check that timestamps never decrease along the path.
    pub fn is_time_monotonic(&self) -> bool {
        self.points.windows(2).all(|w| w[1].t >= w[0].t)
    }

    /// Total planar path length (mm).
    pub fn path_length(&self) -> CoordF {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

impl From<Vec<Waypoint>> for Trajectory {
    fn from(points: Vec<Waypoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<Waypoint> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Trajectory {
    type Item = Waypoint;
    type IntoIter = std::vec::IntoIter<Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
