use std::path::PathBuf;

use amoebot_app::{AlgorithmKind, RunConfig, RunReport, run};
use amoebot_core::StopReason;
use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "amoebot-sim",
    version,
    about = "Run amoebot particle algorithms headlessly"
)]
struct Cli {
    /// JSON run configuration; command-line flags override its fields.
    #[arg(short, long, env = "AMOEBOT_CONFIG")]
    config: Option<PathBuf>,
    /// Algorithm to run.
    #[arg(short, long, value_enum)]
    algorithm: Option<AlgorithmKind>,
    /// Number of particles besides the seed.
    #[arg(short = 'n', long)]
    particles: Option<usize>,
    /// Chance that a node of the initial blob is left empty.
    #[arg(long)]
    hole_probability: Option<f64>,
    /// RNG seed for reproducible runs.
    #[arg(long, env = "AMOEBOT_SEED")]
    seed: Option<u64>,
    /// Stop after this many completed rounds.
    #[arg(long)]
    max_rounds: Option<u64>,
    /// Stop after this many activations.
    #[arg(long)]
    max_activations: Option<u64>,
    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
    /// Include the final particle configuration in JSON output.
    #[arg(long, requires = "json")]
    snapshot: bool,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(particles) = self.particles {
            config.blob.particles = particles;
        }
        if let Some(hole_probability) = self.hole_probability {
            config.blob.hole_probability = hole_probability;
        }
        if let Some(seed) = self.seed {
            config.system.rng_seed = Some(seed);
        }
        if let Some(max_rounds) = self.max_rounds {
            config.limits.max_rounds = Some(max_rounds);
        }
        if let Some(max_activations) = self.max_activations {
            config.limits.max_activations = Some(max_activations);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.run_config()?;
    let report = run(&config).context("simulation failed")?;

    match report.summary.stop_reason {
        StopReason::Terminated => info!(rounds = report.summary.rounds, "algorithm terminated"),
        reason => warn!(?reason, "run stopped before termination"),
    }

    if cli.json {
        print_json(&report, cli.snapshot)?;
    } else {
        print_table(&report);
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json(report: &RunReport, with_snapshot: bool) -> Result<()> {
    let rendered = if with_snapshot {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string_pretty(&report.summary)
    }
    .context("serializing run report")?;
    println!("{rendered}");
    Ok(())
}

fn print_table(report: &RunReport) {
    let summary = &report.summary;
    let outcome = match summary.stop_reason {
        StopReason::Terminated => "terminated".green().to_string(),
        StopReason::RoundLimit => "round limit".yellow().to_string(),
        StopReason::ActivationLimit => "activation limit".yellow().to_string(),
        StopReason::Empty => "empty system".red().to_string(),
    };
    println!("{:<14} {}", "ALGORITHM".bold().cyan(), summary.algorithm);
    println!("{}", "-".repeat(32).dimmed());
    println!("{:<14} {}", "outcome", outcome);
    println!("{:<14} {}", "particles", summary.particles);
    println!("{:<14} {}", "tiles", report.snapshot.tiles.len());
    println!("{:<14} {}", "rounds", summary.rounds);
    println!("{:<14} {}", "activations", summary.activations);
    println!("{:<14} {}", "movements", summary.movements);
    let connected = if summary.connected {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    };
    println!("{:<14} {}", "connected", connected);
}
