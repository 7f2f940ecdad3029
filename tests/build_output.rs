//! End-to-end generation: JSON config in, CSV trajectories out.

use scanpath::output::{read_trajectory_from_file, OutputNaming, TrajectoryKind};
use scanpath::{BuildConfig, BuildPipeline, Error, ScanStrategy};
use std::fs;

const CONFIG_JSON: &str = r#"{
    "max_x": 10,
    "max_y": 10,
    "max_z": 0.35,
    "interline_gap": 5,
    "layer_depth": 0.1,
    "powder_deposit_time": 3,
    "average_layering_time": 50,
    "roller_x_left": 0,
    "roller_x_right": 12,
    "speed": 1,
    "puissance": 5,
    "scanning": "ZIG_ZAG_XY"
}"#;

#[test]
fn test_generate_and_write_build() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, CONFIG_JSON).unwrap();

    let config = BuildConfig::from_file(&config_path).unwrap();
    assert_eq!(config.scanning, ScanStrategy::ZigZagXY);

    let output = BuildPipeline::new(config).generate().unwrap();
    assert_eq!(output.stats.layer_count, 3);
    assert!(output.overlaps.is_empty());

    let out_dir = dir.path().join("output");
    let naming = OutputNaming::new(&out_dir);
    let (laser_path, roller_path) = naming.write_build(&output).unwrap();
    assert_eq!(laser_path, naming.path_for(TrajectoryKind::Laser));
    assert!(laser_path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_es_laser.csv")));

    let laser = read_trajectory_from_file(&laser_path).unwrap();
    let roller = read_trajectory_from_file(&roller_path).unwrap();
    assert_eq!(laser, output.laser);
    assert_eq!(roller, output.roller);

    let text = fs::read_to_string(&roller_path).unwrap();
    let first_row: Vec<&str> = text.lines().next().unwrap().split(',').collect();
    assert_eq!(first_row, vec!["0.0", "0.0", "5.0", "0.1", "1.0"]);
}

#[test]
fn test_spiral_config_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, CONFIG_JSON.replace("ZIG_ZAG_XY", "SPIRAL")).unwrap();

    let config = BuildConfig::from_file(&config_path).unwrap();
    let result = BuildPipeline::new(config).generate();
    assert!(matches!(
        result,
        Err(Error::UnimplementedStrategy(ScanStrategy::Spiral))
    ));
}

#[test]
fn test_unknown_strategy_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, CONFIG_JSON.replace("ZIG_ZAG_XY", "HILBERT")).unwrap();
    assert!(matches!(
        BuildConfig::from_file(&config_path),
        Err(Error::Config(_))
    ));

    assert!(matches!(
        BuildConfig::from_file(dir.path().join("missing.json")),
        Err(Error::Io(_))
    ));
}
