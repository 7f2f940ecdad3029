//! Roller pass generation.
//!
//! The leveling roller runs once per layer along the middle of the build
//! area: it is lowered at the left position when the layer starts and raised
//! at the right position once the powder deposit delay has elapsed. It does
//! not depend on the scanning strategy.

use crate::config::{BuildConfig, MAX_LAYERS};
use crate::geometry::{Trajectory, Waypoint};
use crate::{CoordF, Error, Result};

/// Power flag carried while the roller is lowered onto the powder.
pub const ROLLER_LOWERED: CoordF = 1.0;

/// Power flag carried once the roller is raised.
pub const ROLLER_RAISED: CoordF = 0.0;

/// The two waypoints of the roller pass for layer `index`.
pub fn roller_pass(config: &BuildConfig, index: usize) -> [Waypoint; 2] {
    let roller_y = config.max_y / 2.0;
    let height = config.layer_height(index);
    let start = config.layer_start_time(index);
    [
        Waypoint::new(start, config.roller_x_left, roller_y, height, ROLLER_LOWERED),
        Waypoint::new(
            start + config.powder_deposit_time,
            config.roller_x_right,
            roller_y,
            height,
            ROLLER_RAISED,
        ),
    ]
}

/// Generate the roller trajectory for every layer of the build.
pub fn generate_roller_passes(config: &BuildConfig) -> Result<Trajectory> {
    let total_layers = config.total_layers();
    if total_layers > MAX_LAYERS {
        return Err(Error::Config(format!(
            "{} layers exceeds the limit of {}",
            total_layers, MAX_LAYERS
        )));
    }
    let mut trajectory = Trajectory::with_capacity(2 * total_layers);
    for index in 0..total_layers {
        for point in roller_pass(config, index) {
            trajectory.push(point);
        }
    }
    Ok(trajectory)
}
