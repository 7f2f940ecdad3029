//! Build configuration types.
//!
//! This module provides the flat parameter record that drives trajectory
//! generation: build volume, line spacing, timing, roller travel, head speed,
//! emission power and the scanning strategy.

use crate::geometry::round_to;
use crate::sweep::MAX_SWEEP_LINES;
use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Upper bound on layers in one build.
pub const MAX_LAYERS: usize = 1_000_000;

/// Scanning strategy selecting how layers are swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanStrategy {
    /// Zig-zag lines, orientation alternating between layers.
    #[default]
    #[serde(rename = "ZIG_ZAG_XY")]
    ZigZagXY,
    /// Zig-zag lines along X on every layer.
    #[serde(rename = "ZIG_ZAG_X")]
    ZigZagX,
    /// One-direction lines, orientation alternating between layers.
    #[serde(rename = "ONE_DIRECTION_XY")]
    OneDirectionXY,
    /// One-direction lines along X on every layer.
    #[serde(rename = "ONE_DIRECTION_X")]
    OneDirectionX,
    /// Reserved. No generator exists for it.
    #[serde(rename = "SPIRAL")]
    Spiral,
}

impl ScanStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [ScanStrategy; 5] = [
        ScanStrategy::ZigZagXY,
        ScanStrategy::ZigZagX,
        ScanStrategy::OneDirectionXY,
        ScanStrategy::OneDirectionX,
        ScanStrategy::Spiral,
    ];

    /// Configuration name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            ScanStrategy::ZigZagXY => "ZIG_ZAG_XY",
            ScanStrategy::ZigZagX => "ZIG_ZAG_X",
            ScanStrategy::OneDirectionXY => "ONE_DIRECTION_XY",
            ScanStrategy::OneDirectionX => "ONE_DIRECTION_X",
            ScanStrategy::Spiral => "SPIRAL",
        }
    }

    /// Check if this strategy has a generator.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, ScanStrategy::Spiral)
    }

    /// Check if this strategy alternates sweep orientation between layers.
    pub fn alternates_orientation(&self) -> bool {
        matches!(self, ScanStrategy::ZigZagXY | ScanStrategy::OneDirectionXY)
    }
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ScanStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        ScanStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == normalized)
            .ok_or_else(|| Error::Config(format!("Unknown scanning strategy '{}'", s)))
    }
}

/// Flat parameter record for one build.
///
/// Deserializes from the JSON layout used by the machine configuration
/// files, where the emission power key is `puissance`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    // === Build Volume ===
    /// Build area extent along X (mm).
    pub max_x: CoordF,
    /// Build area extent along Y (mm).
    pub max_y: CoordF,
    /// Build height (mm).
    pub max_z: CoordF,

    // === Scanning ===
    /// Spacing between sweep lines (mm).
    pub interline_gap: CoordF,
    /// Height increment per layer (mm).
    pub layer_depth: CoordF,
    /// Head traverse speed (mm/s).
    pub speed: CoordF,
    /// Active emission intensity.
    #[serde(rename = "puissance", alias = "power")]
    pub power: CoordF,
    /// Scanning strategy.
    pub scanning: ScanStrategy,

    // === Timing ===
    /// Delay between the roller pass start and the layer sweep (s).
    pub powder_deposit_time: CoordF,
    /// Time budget allotted per layer (s).
    pub average_layering_time: CoordF,

    // === Roller ===
    /// Roller lowering position (mm).
    pub roller_x_left: CoordF,
    /// Roller raising position (mm).
    pub roller_x_right: CoordF,
}

impl BuildConfig {
    /// Create a new BuildConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse a configuration from a JSON string.
    ///
    /// Missing fields and unknown strategy names are configuration errors.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method: set build area extents.
    pub fn area(mut self, max_x: CoordF, max_y: CoordF) -> Self {
        self.max_x = max_x;
        self.max_y = max_y;
        self
    }

    /// Builder method: set build height.
    pub fn max_z(mut self, max_z: CoordF) -> Self {
        self.max_z = max_z;
        self
    }

    /// Builder method: set sweep line spacing.
    pub fn interline_gap(mut self, gap: CoordF) -> Self {
        self.interline_gap = gap;
        self
    }

    /// Builder method: set layer depth.
    pub fn layer_depth(mut self, depth: CoordF) -> Self {
        self.layer_depth = depth;
        self
    }

    /// Builder method: set head speed.
    pub fn speed(mut self, speed: CoordF) -> Self {
        self.speed = speed;
        self
    }

    /// Builder method: set emission power.
    pub fn power(mut self, power: CoordF) -> Self {
        self.power = power;
        self
    }

    /// Builder method: set scanning strategy.
    pub fn scanning(mut self, strategy: ScanStrategy) -> Self {
        self.scanning = strategy;
        self
    }

    /// Builder method: set per-layer timing.
    pub fn timing(mut self, powder_deposit_time: CoordF, average_layering_time: CoordF) -> Self {
        self.powder_deposit_time = powder_deposit_time;
        self.average_layering_time = average_layering_time;
        self
    }

    /// Builder method: set roller travel endpoints.
    pub fn roller(mut self, left: CoordF, right: CoordF) -> Self {
        self.roller_x_left = left;
        self.roller_x_right = right;
        self
    }

    /// Validate the configuration.
    ///
    /// Runs before any generation so a bad record never yields partial output.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("max_x", self.max_x),
            ("max_y", self.max_y),
            ("max_z", self.max_z),
            ("interline_gap", self.interline_gap),
            ("layer_depth", self.layer_depth),
            ("speed", self.speed),
            ("puissance", self.power),
            ("powder_deposit_time", self.powder_deposit_time),
            ("average_layering_time", self.average_layering_time),
            ("roller_x_left", self.roller_x_left),
            ("roller_x_right", self.roller_x_right),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be finite, got {}", name, value)));
            }
        }

        let positive = [
            ("max_x", self.max_x),
            ("max_y", self.max_y),
            ("max_z", self.max_z),
            ("interline_gap", self.interline_gap),
            ("layer_depth", self.layer_depth),
            ("speed", self.speed),
            ("average_layering_time", self.average_layering_time),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.powder_deposit_time < 0.0 {
            return Err(Error::Config(format!(
                "powder_deposit_time must not be negative, got {}",
                self.powder_deposit_time
            )));
        }
        if self.power < 0.0 {
            return Err(Error::Config(format!(
                "puissance must not be negative, got {}",
                self.power
            )));
        }
        if self.max_z / self.layer_depth >= MAX_LAYERS as CoordF {
            return Err(Error::Config(format!(
                "layer_depth {} over {}mm exceeds {} layers",
                self.layer_depth, self.max_z, MAX_LAYERS
            )));
        }
        let widest = self.max_x.max(self.max_y);
        if widest / self.interline_gap >= MAX_SWEEP_LINES as CoordF {
            return Err(Error::Config(format!(
                "interline_gap {} over {}mm exceeds {} sweep lines per layer",
                self.interline_gap, widest, MAX_SWEEP_LINES
            )));
        }
        if !self.scanning.is_implemented() {
            return Err(Error::UnimplementedStrategy(self.scanning));
        }
        Ok(())
    }

    /// Number of layers in the build: `floor(max_z / layer_depth)`.
    pub fn total_layers(&self) -> usize {
        if self.layer_depth <= 0.0 || !self.layer_depth.is_finite() {
            return 0;
        }
        (self.max_z / self.layer_depth).floor().max(0.0) as usize
    }

    /// Time at which layer `index` starts (roller lowering), before the deposit delay.
    pub fn layer_start_time(&self, index: usize) -> CoordF {
        index as CoordF * self.average_layering_time
    }

    /// Time at which the sweep of layer `index` starts.
    pub fn sweep_start_time(&self, index: usize) -> CoordF {
        self.layer_start_time(index) + self.powder_deposit_time
    }

    /// Target height of layer `index`, rounded to 3 decimal places.
    pub fn layer_height(&self, index: usize) -> CoordF {
        round_to((index + 1) as CoordF * self.layer_depth, 3)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            // Build volume
            max_x: 100.0,
            max_y: 100.0,
            max_z: 10.0,

            // Scanning
            interline_gap: 1.0,
            layer_depth: 0.1,
            speed: 100.0,
            power: 100.0,
            scanning: ScanStrategy::ZigZagXY,

            // Timing
            powder_deposit_time: 5.0,
            average_layering_time: 120.0,

            // Roller
            roller_x_left: 0.0,
            roller_x_right: 100.0,
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuildConfig(area={}x{}x{}mm, gap={}mm, speed={}mm/s, scanning={})",
            self.max_x, self.max_y, self.max_z, self.interline_gap, self.speed, self.scanning
        )
    }
}
