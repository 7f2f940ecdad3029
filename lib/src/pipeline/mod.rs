//! Pipeline module - orchestrates trajectory generation for a whole build.
//!
//! This module provides a high-level API for the complete build:
//! config → layer plans → per-layer sweeps → laser trajectory, plus roller passes
//!
//! # Strategy Dispatch
//!
//! Each layer gets its own sweep pattern from the scanning strategy and the
//! layer parity:
//!
//! | strategy           | even layer                | odd layer               |
//! |--------------------|---------------------------|-------------------------|
//! | `ZIG_ZAG_XY`       | horizontal zig-zag        | vertical zig-zag        |
//! | `ZIG_ZAG_X`        | horizontal zig-zag        | horizontal zig-zag      |
//! | `ONE_DIRECTION_XY` | horizontal one-direction  | vertical one-direction  |
//! | `ONE_DIRECTION_X`  | horizontal one-direction  | horizontal one-direction|
//! | `SPIRAL`           | unimplemented             | unimplemented           |
//!
//! Layers start on a fixed stride of `average_layering_time`. Nothing checks
//! that a sweep finishes before the next layer starts; [`check_layer_timing`]
//! reports the layers that overrun.
//!
//! # Example
//!
//! ```rust,ignore
//! use scanpath::pipeline::BuildPipeline;
//! use scanpath::BuildConfig;
//!
//! let pipeline = BuildPipeline::new(BuildConfig::default());
//! let output = pipeline.generate()?;
//! println!("{} laser waypoints", output.laser.len());
//! ```

use crate::config::{BuildConfig, ScanStrategy};
use crate::geometry::Trajectory;
use crate::roller::generate_roller_passes;
use crate::sweep::{generate_sweep, Directionality, Orientation, SweepParams, SweepPattern};
use crate::{CoordF, Error, Result};
use log::{debug, info, warn};
use rayon::prelude::*;

/// Sweep pattern for layer `layer_index` under a scanning strategy.
pub fn sweep_pattern_for(strategy: ScanStrategy, layer_index: usize) -> Result<SweepPattern> {
    let directionality = match strategy {
        ScanStrategy::ZigZagXY | ScanStrategy::ZigZagX => Directionality::ZigZag,
        ScanStrategy::OneDirectionXY | ScanStrategy::OneDirectionX => Directionality::OneDirection,
        ScanStrategy::Spiral => return Err(Error::UnimplementedStrategy(strategy)),
    };
    let orientation = if strategy.alternates_orientation() {
        Orientation::for_layer(layer_index)
    } else {
        Orientation::Horizontal
    };
    Ok(SweepPattern::new(orientation, directionality))
}

/// Timing, height and pattern of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlan {
    /// Layer index, from 0.
    pub index: usize,
    /// Sweep start time (s).
    pub start_time: CoordF,
    /// Target height (mm).
    pub height: CoordF,
    /// Sweep pattern.
    pub pattern: SweepPattern,
}

impl LayerPlan {
    /// Plan layer `index` of a build.
    pub fn new(config: &BuildConfig, index: usize) -> Result<Self> {
        Ok(Self {
            index,
            start_time: config.sweep_start_time(index),
            height: config.layer_height(index),
            pattern: sweep_pattern_for(config.scanning, index)?,
        })
    }

    /// Sweep parameters for this layer.
    pub fn sweep_params(&self, config: &BuildConfig) -> SweepParams {
        SweepParams {
            t0: self.start_time,
            max_x: config.max_x,
            max_y: config.max_y,
            speed: config.speed,
            interline_gap: config.interline_gap,
            height: self.height,
            power: config.power,
        }
    }

    /// Generate this layer's trajectory.
    pub fn generate(&self, config: &BuildConfig) -> Result<Trajectory> {
        let trajectory = generate_sweep(&self.sweep_params(config), self.pattern)?;
        debug!(
            "Layer {}: {} at z={} from t={}, {} waypoints",
            self.index,
            self.pattern,
            self.height,
            self.start_time,
            trajectory.len()
        );
        Ok(trajectory)
    }
}

/// A layer whose sweep is still running when the next layer's sweep starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingOverlap {
    /// Index of the overrunning layer.
    pub layer_index: usize,
    /// Time of the layer's last waypoint (s).
    pub end_time: CoordF,
    /// Sweep start time of the following layer (s).
    pub next_start_time: CoordF,
}

impl TimingOverlap {
    /// How long the layer overruns (s).
    pub fn overrun(&self) -> CoordF {
        self.end_time - self.next_start_time
    }
}

/// Find layers whose trajectory ends after the next layer's sweep starts.
///
/// `layers` holds one trajectory per layer, in layer order.
pub fn check_layer_timing(config: &BuildConfig, layers: &[Trajectory]) -> Vec<TimingOverlap> {
    layers
        .iter()
        .enumerate()
        .take(layers.len().saturating_sub(1))
        .filter_map(|(index, layer)| {
            let end_time = layer.end_time()?;
            let next_start_time = config.sweep_start_time(index + 1);
            (end_time > next_start_time).then_some(TimingOverlap {
                layer_index: index,
                end_time,
                next_start_time,
            })
        })
        .collect()
}

/// Summary of a generated build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    pub layer_count: usize,
    pub laser_waypoints: usize,
    pub roller_waypoints: usize,
    /// Time of the last laser waypoint (s).
    pub laser_end_time: CoordF,
    /// Longest single-layer sweep duration (s).
    pub longest_layer_duration: CoordF,
    /// Planar length of the laser path (mm).
    pub laser_path_length: CoordF,
}

/// Result of a build generation.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Laser trajectory for all layers, in layer order.
    pub laser: Trajectory,
    /// Roller trajectory for all layers.
    pub roller: Trajectory,
    /// Sweep duration of each layer (s).
    pub layer_durations: Vec<CoordF>,
    /// Layers overrunning their time slot.
    pub overlaps: Vec<TimingOverlap>,
    pub stats: BuildStats,
}

/// Trajectory generation pipeline for one build.
#[derive(Debug, Clone)]
pub struct BuildPipeline {
    config: BuildConfig,
    parallel: bool,
}

impl BuildPipeline {
    /// Create a new pipeline.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            parallel: false,
        }
    }

    /// Builder: generate layers on the rayon thread pool.
    ///
    /// Output is identical to sequential generation. Layers run in batches of
    /// a few per worker thread; progress is reported after each batch.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Plan every layer of the build.
    pub fn plan(&self) -> Result<Vec<LayerPlan>> {
        self.config.validate()?;
        (0..self.config.total_layers())
            .map(|index| LayerPlan::new(&self.config, index))
            .collect()
    }

    /// Generate the laser and roller trajectories.
    pub fn generate(&self) -> Result<BuildOutput> {
        self.generate_with_callback(|_, _| {})
    }

    /// Generate with a progress callback.
    ///
    /// The callback receives (stage_name, progress_0_to_1).
    pub fn generate_with_callback<F>(&self, mut callback: F) -> Result<BuildOutput>
    where
        F: FnMut(&str, f64),
    {
        // Fail before producing anything
        let plans = self.plan()?;
        info!(
            "Generating {} layers with {} ({})",
            plans.len(),
            self.config.scanning,
            self.config
        );

        // Step 1: Sweep every layer
        callback("laser", 0.0);
        let layers = self.generate_layers(&plans, |progress| callback("laser", progress))?;
        callback("laser", 1.0);

        // Step 2: Roller passes
        callback("roller", 0.0);
        let roller = generate_roller_passes(&self.config)?;
        callback("roller", 1.0);

        let overlaps = check_layer_timing(&self.config, &layers);
        for overlap in &overlaps {
            warn!(
                "Layer {} ends at t={} but layer {} starts at t={} ({}s overrun)",
                overlap.layer_index,
                overlap.end_time,
                overlap.layer_index + 1,
                overlap.next_start_time,
                overlap.overrun()
            );
        }

        let layer_durations: Vec<CoordF> = layers.iter().map(Trajectory::duration).collect();
        let mut laser = Trajectory::with_capacity(layers.iter().map(Trajectory::len).sum());
        for layer in layers {
            laser.extend(layer);
        }

        let stats = BuildStats {
            layer_count: plans.len(),
            laser_waypoints: laser.len(),
            roller_waypoints: roller.len(),
            laser_end_time: laser.end_time().unwrap_or(0.0),
            longest_layer_duration: layer_durations.iter().copied().fold(0.0, CoordF::max),
            laser_path_length: laser.path_length(),
        };
        info!(
            "Generated {} laser and {} roller waypoints, laser ends at t={}",
            stats.laser_waypoints, stats.roller_waypoints, stats.laser_end_time
        );

        Ok(BuildOutput {
            laser,
            roller,
            layer_durations,
            overlaps,
            stats,
        })
    }

    /// Generate every planned layer, in layer order.
    fn generate_layers<F>(&self, plans: &[LayerPlan], mut callback: F) -> Result<Vec<Trajectory>>
    where
        F: FnMut(f64),
    {
        let total_layers = plans.len();
        if self.parallel {
            let config = &self.config;
            let batch_size = rayon::current_num_threads().max(1) * 4;
            let mut layers = Vec::with_capacity(total_layers);
            for batch in plans.chunks(batch_size) {
                let generated = batch
                    .par_iter()
                    .map(|plan| plan.generate(config))
                    .collect::<Result<Vec<_>>>()?;
                layers.extend(generated);
                callback(layers.len() as f64 / total_layers as f64);
            }
            callback(1.0);
            return Ok(layers);
        }

        let mut layers = Vec::with_capacity(total_layers);
        for (i, plan) in plans.iter().enumerate() {
            layers.push(plan.generate(&self.config)?);
            if total_layers > 0 {
                callback(i as f64 / total_layers as f64);
            }
        }
        callback(1.0);
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(strategy: ScanStrategy) -> BuildConfig {
        BuildConfig::default()
            .area(10.0, 10.0)
            .max_z(0.45)
            .layer_depth(0.1)
            .interline_gap(5.0)
            .speed(1.0)
            .power(5.0)
            .timing(3.0, 100.0)
            .scanning(strategy)
    }

    #[test]
    fn test_dispatch_table() {
        use ScanStrategy::*;
        assert_eq!(
            sweep_pattern_for(ZigZagXY, 0).unwrap(),
            SweepPattern::HORIZONTAL_ZIG_ZAG
        );
        assert_eq!(
            sweep_pattern_for(ZigZagXY, 1).unwrap(),
            SweepPattern::VERTICAL_ZIG_ZAG
        );
        assert_eq!(
            sweep_pattern_for(ZigZagX, 1).unwrap(),
            SweepPattern::HORIZONTAL_ZIG_ZAG
        );
        assert_eq!(
            sweep_pattern_for(OneDirectionXY, 2).unwrap(),
            SweepPattern::HORIZONTAL_ONE_DIRECTION
        );
        assert_eq!(
            sweep_pattern_for(OneDirectionXY, 3).unwrap(),
            SweepPattern::VERTICAL_ONE_DIRECTION
        );
        assert_eq!(
            sweep_pattern_for(OneDirectionX, 3).unwrap(),
            SweepPattern::HORIZONTAL_ONE_DIRECTION
        );
        assert!(matches!(
            sweep_pattern_for(Spiral, 0),
            Err(Error::UnimplementedStrategy(Spiral))
        ));
    }

    #[test]
    fn test_alternation_parity() {
        for strategy in [ScanStrategy::ZigZagXY, ScanStrategy::OneDirectionXY] {
            let plans = BuildPipeline::new(config(strategy)).plan().unwrap();
            assert_eq!(plans.len(), 4);
            for plan in plans {
                let horizontal = plan.pattern.orientation == Orientation::Horizontal;
                assert_eq!(horizontal, plan.index % 2 == 0, "{} layer {}", strategy, plan.index);
            }
        }
    }

    #[test]
    fn test_layer_plan_timing() {
        let plans = BuildPipeline::new(config(ScanStrategy::ZigZagX)).plan().unwrap();
        let starts: Vec<f64> = plans.iter().map(|p| p.start_time).collect();
        assert_eq!(starts, vec![3.0, 103.0, 203.0, 303.0]);
        let heights: Vec<f64> = plans.iter().map(|p| p.height).collect();
        assert_eq!(heights, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_generate_concatenates_layers() {
        let output = BuildPipeline::new(config(ScanStrategy::ZigZagXY))
            .generate()
            .unwrap();
        // 6 waypoints per 10x10 layer with gap 5
        assert_eq!(output.stats.layer_count, 4);
        assert_eq!(output.laser.len(), 24);
        assert_eq!(output.roller.len(), 8);
        assert!(output.overlaps.is_empty());
        assert!(output.laser.is_time_monotonic());

        // Each layer restarts at the origin with power on
        for (layer, chunk) in output.laser.points().chunks(6).enumerate() {
            assert_eq!((chunk[0].x, chunk[0].y), (0.0, 0.0));
            assert_eq!(chunk[0].power, 5.0);
            assert_eq!(chunk[0].t, layer as f64 * 100.0 + 3.0);
            assert!(chunk.iter().all(|p| p.z == chunk[0].z));
        }

        // Layer 1 is vertical: first sweep runs along Y
        let layer1 = &output.laser.points()[6..12];
        assert_eq!((layer1[1].x, layer1[1].y), (0.0, 10.0));

        assert_eq!(output.layer_durations, vec![40.0; 4]);
        assert_eq!(output.stats.longest_layer_duration, 40.0);
        assert_eq!(output.stats.laser_end_time, 343.0);
    }

    #[test]
    fn test_spiral_rejected_without_output() {
        let pipeline = BuildPipeline::new(config(ScanStrategy::Spiral));
        let mut called = false;
        let result = pipeline.generate_with_callback(|_, _| called = true);
        assert!(matches!(
            result,
            Err(Error::UnimplementedStrategy(ScanStrategy::Spiral))
        ));
        assert!(!called);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let pipeline = BuildPipeline::new(config(ScanStrategy::ZigZagX).speed(0.0));
        assert!(matches!(pipeline.generate(), Err(Error::Config(_))));

        let pipeline = BuildPipeline::new(config(ScanStrategy::ZigZagX).interline_gap(0.0));
        assert!(matches!(pipeline.plan(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unbounded_line_count_rejected() {
        let huge = config(ScanStrategy::ZigZagXY)
            .area(1e300, 1e300)
            .interline_gap(1e-300);
        assert!(matches!(
            BuildPipeline::new(huge.clone()).generate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            BuildPipeline::new(huge).parallel(true).generate(),
            Err(Error::Config(_))
        ));

        let deep = config(ScanStrategy::ZigZagX).max_z(1e300).layer_depth(1e-300);
        assert!(matches!(
            BuildPipeline::new(deep).generate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_overlap_reported_not_fixed() {
        // Layers last 40s but only 20s are budgeted
        let config = config(ScanStrategy::ZigZagX).timing(3.0, 20.0);
        let output = BuildPipeline::new(config).generate().unwrap();
        assert_eq!(output.overlaps.len(), 3);
        let first = output.overlaps[0];
        assert_eq!(first.layer_index, 0);
        assert_eq!(first.end_time, 43.0);
        assert_eq!(first.next_start_time, 23.0);
        assert_eq!(first.overrun(), 20.0);
        // Timestamps are left as generated
        assert!(!output.laser.is_time_monotonic());
        assert_eq!(output.laser.points()[6].t, 23.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = config(ScanStrategy::OneDirectionXY).interline_gap(0.7);
        let sequential = BuildPipeline::new(config.clone()).generate().unwrap();
        let parallel = BuildPipeline::new(config).parallel(true).generate().unwrap();
        assert_eq!(sequential.laser, parallel.laser);
        assert_eq!(sequential.roller, parallel.roller);
        assert_eq!(sequential.stats, parallel.stats);
    }

    #[test]
    fn test_progress_callback() {
        let pipeline = BuildPipeline::new(config(ScanStrategy::ZigZagX));
        let mut stages = Vec::new();
        pipeline
            .generate_with_callback(|stage, progress| stages.push((stage.to_string(), progress)))
            .unwrap();
        assert_eq!(stages.first(), Some(&("laser".to_string(), 0.0)));
        assert_eq!(stages.last(), Some(&("roller".to_string(), 1.0)));
        assert!(stages
            .iter()
            .filter(|(stage, _)| stage == "laser")
            .all(|(_, p)| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_parallel_progress_advances() {
        let config = config(ScanStrategy::ZigZagXY)
            .area(1.0, 1.0)
            .interline_gap(0.5)
            .max_z(10.0)
            .layer_depth(0.01);
        let pipeline = BuildPipeline::new(config).parallel(true);
        let mut laser = Vec::new();
        pipeline
            .generate_with_callback(|stage, progress| {
                if stage == "laser" {
                    laser.push(progress);
                }
            })
            .unwrap();
        assert_eq!(laser.first(), Some(&0.0));
        assert_eq!(laser.last(), Some(&1.0));
        assert!(laser.iter().any(|p| *p > 0.0 && *p < 1.0));
        assert!(laser.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_no_layers() {
        let output = BuildPipeline::new(config(ScanStrategy::ZigZagX).max_z(0.05))
            .generate()
            .unwrap();
        assert!(output.laser.is_empty());
        assert!(output.roller.is_empty());
        assert_eq!(output.stats.laser_end_time, 0.0);
    }
}
