//! Run configuration and dispatch for the headless runner.

use std::fs;
use std::path::{Path, PathBuf};

use amoebot_algorithms::{BlobParams, Line, Oscillate, TokenDemo};
use amoebot_core::{
    Algorithm, RunLimits, RunSummary, Simulator, SystemConfig, SystemError, SystemSnapshot,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Algorithms the runner knows how to drive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    Oscillate,
    #[default]
    Line,
    TokenDemo,
}

/// Errors raised while loading, validating or running a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A field of the run configuration is out of range.
    #[error("invalid run configuration: {0}")]
    InvalidConfig(&'static str),
    /// Populating or driving the system failed.
    #[error(transparent)]
    System(#[from] SystemError),
}

/// Everything needed to reproduce a run; loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub algorithm: AlgorithmKind,
    pub system: SystemConfig,
    pub blob: BlobParams,
    pub limits: RunLimits,
}

impl RunConfig {
    /// Read a JSON configuration; absent fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate().map_err(invalid)?;
        self.blob.validate().map_err(invalid)?;
        Ok(())
    }
}

fn invalid(err: SystemError) -> ConfigError {
    match err {
        SystemError::InvalidConfig(reason) => ConfigError::InvalidConfig(reason),
        other => ConfigError::System(other),
    }
}

/// Outcome of a run: counters plus the final configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub snapshot: SystemSnapshot,
}

/// Build the configured algorithm and drive it to termination or its limits.
pub fn run(config: &RunConfig) -> Result<RunReport, ConfigError> {
    config.validate()?;
    let report = match config.algorithm {
        AlgorithmKind::Oscillate => drive(
            Oscillate {
                particles: config.blob.particles,
            },
            config,
        )?,
        AlgorithmKind::Line => drive(Line::new(config.blob), config)?,
        AlgorithmKind::TokenDemo => drive(TokenDemo::new(config.blob), config)?,
    };
    Ok(report)
}

fn drive<A: Algorithm>(algorithm: A, config: &RunConfig) -> Result<RunReport, SystemError> {
    let mut sim = Simulator::new(algorithm, config.system.clone())?;
    info!(
        algorithm = sim.algorithm().name(),
        particles = sim.system().size(),
        seed = ?config.system.rng_seed,
        "starting run"
    );
    let summary = sim.run(config.limits)?;
    Ok(RunReport {
        summary,
        snapshot: sim.system().snapshot(),
    })
}
