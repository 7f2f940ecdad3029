//! Scanpath CLI - Command-line interface for the scanpath library
//!
//! Usage:
//!   scanpath-cli generate --config config.json [-o output] [--parallel]
//!   scanpath-cli print --config config.json [--roller]
//!   scanpath-cli info --config config.json
//!   scanpath-cli inspect <trajectory.csv>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use scanpath::output::{read_trajectory_from_file, OutputNaming};
use scanpath::pipeline::{check_layer_timing, BuildPipeline};
use scanpath::{generate_roller_passes, BuildConfig, Trajectory};
use std::path::{Path, PathBuf};

/// Timed scan and roller trajectories for powder-bed builds
#[derive(Parser, Debug)]
#[command(name = "scanpath-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate laser and roller trajectories and write them as CSV
    Generate {
        /// Build configuration file (JSON format)
        #[arg(short, long, value_name = "CONFIG", default_value = "config.json")]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output_dir: PathBuf,

        /// Generate layers in parallel
        #[arg(long)]
        parallel: bool,

        /// Number of threads to use with --parallel (0 = auto)
        #[arg(short = 'j', long, default_value = "0")]
        threads: usize,
    },

    /// Print generated waypoints to the console
    Print {
        /// Build configuration file (JSON format)
        #[arg(short, long, value_name = "CONFIG", default_value = "config.json")]
        config: PathBuf,

        /// Print the roller trajectory instead of the laser trajectory
        #[arg(long)]
        roller: bool,
    },

    /// Display layer timing for a build configuration
    Info {
        /// Build configuration file (JSON format)
        #[arg(short, long, value_name = "CONFIG", default_value = "config.json")]
        config: PathBuf,
    },

    /// Summarize a written trajectory file
    Inspect {
        /// Trajectory CSV file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Generate {
            config,
            output_dir,
            parallel,
            threads,
        } => cmd_generate(config, output_dir, parallel, threads),
        Commands::Print { config, roller } => cmd_print(config, roller),
        Commands::Info { config } => cmd_info(config),
        Commands::Inspect { input } => cmd_inspect(input),
    }
}

fn load_config(path: &Path) -> Result<BuildConfig> {
    info!("Loading build config from: {}", path.display());
    let config = BuildConfig::from_file(path)
        .with_context(|| format!("Failed to load build config: {}", path.display()))?;
    config.validate().context("Invalid build config")?;
    Ok(config)
}

fn cmd_generate(
    config_path: PathBuf,
    output_dir: PathBuf,
    parallel: bool,
    threads: usize,
) -> Result<()> {
    let config = load_config(&config_path)?;

    info!("Configuration:");
    info!("  Area: {} x {} mm", config.max_x, config.max_y);
    info!("  Height: {} mm ({} layers)", config.max_z, config.total_layers());
    info!("  Interline gap: {} mm", config.interline_gap);
    info!("  Speed: {} mm/s", config.speed);
    info!("  Scanning: {}", config.scanning);

    if parallel && threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let pipeline = BuildPipeline::new(config).parallel(parallel);
    let output = pipeline.generate_with_callback(|stage, stage_progress| {
        let (base, range) = match stage {
            "laser" => (0, 80),
            "roller" => (80, 10),
            _ => (0, 90),
        };
        progress.set_position(base + (stage_progress * range as f64) as u64);
        progress.set_message(match stage {
            "laser" => "Sweeping layers...",
            "roller" => "Generating roller passes...",
            _ => "Processing...",
        });
    })?;

    progress.set_message("Writing output...");
    progress.set_position(95);

    let naming = OutputNaming::new(&output_dir);
    let (laser_path, roller_path) = naming
        .write_build(&output)
        .with_context(|| format!("Failed to write trajectories to {}", output_dir.display()))?;

    progress.set_position(100);
    progress.finish_with_message("Done!");

    println!();
    println!("Generation complete!");
    println!("  Laser:  {}", laser_path.display());
    println!("  Roller: {}", roller_path.display());
    println!("  Layers: {}", output.stats.layer_count);
    println!("  Laser waypoints: {}", output.stats.laser_waypoints);
    println!("  Laser path: {:.2} m", output.stats.laser_path_length / 1000.0);
    println!("  Laser ends at: {:.2} s", output.stats.laser_end_time);
    if !output.overlaps.is_empty() {
        println!(
            "  Warning: {} layers overrun average_layering_time",
            output.overlaps.len()
        );
    }

    Ok(())
}

fn cmd_print(config_path: PathBuf, roller: bool) -> Result<()> {
    let config = load_config(&config_path)?;

    let trajectory = if roller {
        generate_roller_passes(&config)?
    } else {
        BuildPipeline::new(config).generate()?.laser
    };

    for point in &trajectory {
        println!("{}", point);
        println!();
    }

    Ok(())
}

fn cmd_info(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    let pipeline = BuildPipeline::new(config.clone());
    let plans = pipeline.plan()?;

    println!("Build Information:");
    println!("  File: {}", config_path.display());
    println!("  {}", config);
    println!("  Layers: {}", plans.len());
    println!("  Layer budget: {} s", config.average_layering_time);
    println!("{:-<60}", "");

    let mut layers = Vec::with_capacity(plans.len());
    for plan in &plans {
        let trajectory = plan.generate(&config)?;
        println!(
            "  Layer {:>4}  z={:<8} t0={:<10} {:<26} {:>8.2} s",
            plan.index,
            plan.height,
            plan.start_time,
            plan.pattern.to_string(),
            trajectory.duration()
        );
        layers.push(trajectory);
    }

    let overlaps = check_layer_timing(&config, &layers);
    if overlaps.is_empty() {
        println!();
        println!("All layers fit within average_layering_time");
    } else {
        println!();
        for overlap in &overlaps {
            warn!(
                "Layer {} overruns the next layer by {:.2} s",
                overlap.layer_index,
                overlap.overrun()
            );
            println!(
                "  Layer {} ends at {:.2} s, next layer starts at {:.2} s",
                overlap.layer_index, overlap.end_time, overlap.next_start_time
            );
        }
    }

    Ok(())
}

fn cmd_inspect(input: PathBuf) -> Result<()> {
    info!("Loading trajectory: {}", input.display());

    let trajectory: Trajectory = read_trajectory_from_file(&input)
        .with_context(|| format!("Failed to read trajectory: {}", input.display()))?;

    let active = trajectory.iter().filter(|p| p.is_active()).count();
    let mut heights: Vec<f64> = trajectory.iter().map(|p| p.z).collect();
    heights.dedup();

    println!("Trajectory Information:");
    println!("  File: {}", input.display());
    println!("  Waypoints: {}", trajectory.len());
    println!("  Active waypoints: {}", active);
    println!("  Layers: {}", heights.len());
    if let (Some(start), Some(end)) = (trajectory.start_time(), trajectory.end_time()) {
        println!("  Time span: {:.3} s - {:.3} s", start, end);
    }
    println!("  Path length: {:.3} mm", trajectory.path_length());
    println!(
        "  Monotonic time: {}",
        if trajectory.is_time_monotonic() {
            "yes"
        } else {
            "no"
        }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_defaults() {
        let cli = Cli::parse_from(["scanpath-cli", "generate"]);
        match cli.command {
            Commands::Generate {
                config,
                output_dir,
                parallel,
                threads,
            } => {
                assert_eq!(config, PathBuf::from("config.json"));
                assert_eq!(output_dir, PathBuf::from("output"));
                assert!(!parallel);
                assert_eq!(threads, 0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
