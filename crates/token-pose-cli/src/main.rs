//! Replay recorded detection logs through the pose filter.
//!
//! Input is JSONL: one record per line, `{"detection": {...}}` with an
//! optional `"marker": [x, y]` and `"clear_marker": true` flag. Records
//! are routed to one tracker per detection id; every commit prints one
//! JSON line with the committed pose.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use token_pose_core::{init_with_level, Detection, IdentityCalibration};
use token_pose_track::{Pose, TokenTracker, TrackerParams};

#[derive(Parser)]
#[command(name = "token-pose", about = "Token pose tracking utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Log verbosely.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSONL detection log and print committed poses.
    Replay {
        /// Path to the JSONL detection log.
        input: PathBuf,
        /// Optional tracker parameters (JSON).
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    detection: Detection,
    #[serde(default)]
    marker: Option<[f32; 2]>,
    #[serde(default)]
    clear_marker: bool,
}

#[derive(Serialize)]
struct CommitLine<'a> {
    line: usize,
    id: i32,
    pose: &'a Pose,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record at line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid params file: {0}")]
    Params(serde_json::Error),
    #[error("failed to serialize pose: {0}")]
    Output(serde_json::Error),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = init_with_level(level);

    match cli.command {
        Command::Replay { input, params } => replay(&input, params.as_deref()),
    }
}

fn load_params(path: Option<&std::path::Path>) -> Result<TrackerParams, CliError> {
    let Some(path) = path else {
        return Ok(TrackerParams::default());
    };
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(file).map_err(CliError::Params)
}

fn replay(input: &std::path::Path, params_path: Option<&std::path::Path>) -> Result<(), CliError> {
    let params = load_params(params_path)?;
    let file = File::open(input).map_err(|source| CliError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let calibration = IdentityCalibration;
    let mut trackers: HashMap<i32, TokenTracker> = HashMap::new();
    let mut commits = 0usize;
    let mut frames = 0usize;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| CliError::Io {
            path: input.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord =
            serde_json::from_str(&line).map_err(|source| CliError::Record {
                line: index + 1,
                source,
            })?;
        frames += 1;

        let id = record.detection.id;
        let tracker = trackers
            .entry(id)
            .or_insert_with(|| TokenTracker::new(params));
        if record.clear_marker {
            tracker.clear_marker();
        }
        let marker = record.marker.map(|[x, y]| Point2::new(x, y));
        if tracker.observe(record.detection, marker, &calibration) {
            commits += 1;
            let out = CommitLine {
                line: index + 1,
                id,
                pose: tracker.pose(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).map_err(CliError::Output)?
            );
        }
    }

    info!(
        "{frames} frames, {} trackers, {commits} commits",
        trackers.len()
    );
    Ok(())
}
