//! Trajectory output.
//!
//! Trajectories are written as CSV, one row per waypoint, columns
//! `t, x, y, z, power`, no header row. Build outputs are named after the
//! generation time:
//!
//! ```text
//! <dir>/<YYYY-MM-DD>-<HH-MM-SS>_es_laser.csv
//! <dir>/<YYYY-MM-DD>-<HH-MM-SS>_es_roller.csv
//! ```

use crate::geometry::{Trajectory, Waypoint};
use crate::pipeline::BuildOutput;
use crate::Result;
use chrono::{Local, NaiveDateTime};
use log::info;
use std::fmt;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Which trajectory of a build a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrajectoryKind {
    Laser,
    Roller,
}

impl TrajectoryKind {
    pub fn name(&self) -> &'static str {
        match self {
            TrajectoryKind::Laser => "laser",
            TrajectoryKind::Roller => "roller",
        }
    }
}

impl fmt::Display for TrajectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Timestamped file naming for build outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputNaming {
    dir: PathBuf,
    generated_at: NaiveDateTime,
}

impl OutputNaming {
    /// Name outputs in `dir` after the current local time.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::at(dir, Local::now().naive_local())
    }

    /// Name outputs in `dir` after a fixed generation time.
    pub fn at<P: Into<PathBuf>>(dir: P, generated_at: NaiveDateTime) -> Self {
        Self {
            dir: dir.into(),
            generated_at,
        }
    }

    /// File name for a trajectory kind.
    pub fn file_name(&self, kind: TrajectoryKind) -> String {
        format!(
            "{}-{}_es_{}.csv",
            self.generated_at.format("%Y-%m-%d"),
            self.generated_at.format("%H-%M-%S"),
            kind
        )
    }

    /// Full path for a trajectory kind.
    pub fn path_for(&self, kind: TrajectoryKind) -> PathBuf {
        self.dir.join(self.file_name(kind))
    }

    /// Write both trajectories of a build, creating the directory if needed.
    ///
    /// Returns the laser and roller file paths.
    pub fn write_build(&self, output: &BuildOutput) -> Result<(PathBuf, PathBuf)> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let laser_path = self.path_for(TrajectoryKind::Laser);
        let roller_path = self.path_for(TrajectoryKind::Roller);
        write_trajectory_to_file(&laser_path, &output.laser)?;
        write_trajectory_to_file(&roller_path, &output.roller)?;
        Ok((laser_path, roller_path))
    }
}

/// Write a trajectory as header-less CSV rows.
pub fn write_trajectory<W: Write>(writer: W, trajectory: &Trajectory) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for point in trajectory {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a trajectory to a file, replacing any existing content.
pub fn write_trajectory_to_file<P: AsRef<Path>>(path: P, trajectory: &Trajectory) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_trajectory(file, trajectory)?;
    info!("Wrote {} waypoints to {}", trajectory.len(), path.display());
    Ok(())
}

/// Read a trajectory written by [`write_trajectory`].
pub fn read_trajectory<R: Read>(reader: R) -> Result<Trajectory> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);
    csv_reader
        .deserialize::<Waypoint>()
        .map(|row| row.map_err(Into::into))
        .collect()
}

/// Read a trajectory file.
pub fn read_trajectory_from_file<P: AsRef<Path>>(path: P) -> Result<Trajectory> {
    read_trajectory(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Trajectory {
        vec![
            Waypoint::new(0.0, 0.0, 0.0, 0.1, 5.0),
            Waypoint::new(10.0, 10.0, 0.0, 0.1, 0.0),
            Waypoint::new(15.0, 10.0, 5.0, 0.1, 5.0),
        ]
        .into()
    }

    #[test]
    fn test_rows_without_header() {
        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, &sample()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0.0,0.0,0.0,0.1,5.0");
        assert_eq!(lines[2], "15.0,10.0,5.0,0.1,5.0");
    }

    #[test]
    fn test_read_back() {
        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, &sample()).unwrap();
        let traj = read_trajectory(buffer.as_slice()).unwrap();
        assert_eq!(traj, sample());
    }

    #[test]
    fn test_read_rejects_short_rows() {
        let data = "0,0,0,0.1\n";
        assert!(read_trajectory(data.as_bytes()).is_err());
    }

    #[test]
    fn test_file_naming() {
        let when = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(14, 7, 9))
            .unwrap();
        let naming = OutputNaming::at("output", when);
        assert_eq!(
            naming.file_name(TrajectoryKind::Laser),
            "2024-03-05-14-07-09_es_laser.csv"
        );
        assert_eq!(
            naming.path_for(TrajectoryKind::Roller),
            PathBuf::from("output").join("2024-03-05-14-07-09_es_roller.csv")
        );
    }
}
