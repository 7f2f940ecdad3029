//! # Scanpath
//!
//! Timed motion trajectories for a two-axis scanning head working a powder bed.
//!
//! This library provides the complete trajectory pipeline:
//! - Build configuration loading and validation
//! - Axis sweep generation (zig-zag and one-direction, horizontal and vertical)
//! - Layer orchestration across the configured scanning strategy
//! - Roller (powder leveling) pass generation
//! - CSV output of the produced waypoint sequences
//!
//! ## Example
//!
//! ```rust,ignore
//! use scanpath::{BuildConfig, BuildPipeline};
//!
//! let config = BuildConfig::from_file("config.json")?;
//! let output = BuildPipeline::new(config).generate()?;
//! scanpath::output::write_trajectory_to_file("laser.csv", &output.laser)?;
//! ```

// Core modules
pub mod config;
pub mod geometry;
pub mod output;
pub mod pipeline;
pub mod roller;
pub mod sweep;

// Re-export commonly used types
pub use config::{BuildConfig, ScanStrategy};
pub use geometry::{round_to, Axis, Trajectory, Waypoint};
pub use output::{read_trajectory, write_trajectory, write_trajectory_to_file, OutputNaming};
pub use pipeline::{BuildOutput, BuildPipeline, BuildStats, LayerPlan, TimingOverlap};
pub use roller::generate_roller_passes;
pub use sweep::{
    generate_sweep, Directionality, Orientation, SweepDirection, SweepParams, SweepPattern,
};

/// Coordinate type used for positions, times and intensities.
pub type CoordF = f64;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for trajectory generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The strategy is known but has no generator.
    #[error("Scanning strategy {0} is not implemented")]
    UnimplementedStrategy(ScanStrategy),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
