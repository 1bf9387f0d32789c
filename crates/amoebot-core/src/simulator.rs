//! Algorithm plumbing and the run loop that drives a system to termination.

use crate::{AmoebotSystem, Behavior, ParticleId, SystemConfig, SystemError};
use amoebot_index::Node;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A distributed algorithm: a particle behaviour plus the code that seeds an
/// initial configuration and recognises termination.
pub trait Algorithm {
    type Particle: Behavior;

    /// Human-readable name used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Insert the initial particles and tiles.
    fn populate(&mut self, system: &mut AmoebotSystem<Self::Particle>) -> Result<(), SystemError>;

    /// Whether the system has reached its goal configuration.
    fn has_terminated(&self, system: &AmoebotSystem<Self::Particle>) -> bool;
}

/// Bounds on a single [`Simulator::run`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunLimits {
    pub max_rounds: Option<u64>,
    pub max_activations: Option<u64>,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_rounds: Some(1_000),
            max_activations: None,
        }
    }
}

impl RunLimits {
    /// Reject limits that would stop a run before it starts or never stop it.
    pub fn validate(&self) -> Result<(), SystemError> {
        if self.max_rounds == Some(0) {
            return Err(SystemError::InvalidConfig("max_rounds must be positive"));
        }
        if self.max_activations == Some(0) {
            return Err(SystemError::InvalidConfig(
                "max_activations must be positive",
            ));
        }
        if self.max_rounds.is_none() && self.max_activations.is_none() {
            return Err(SystemError::InvalidConfig(
                "at least one of max_rounds or max_activations must be set",
            ));
        }
        Ok(())
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Terminated,
    RoundLimit,
    ActivationLimit,
    Empty,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub algorithm: String,
    pub particles: usize,
    pub rounds: u64,
    pub activations: u64,
    pub movements: u64,
    pub connected: bool,
    pub stop_reason: StopReason,
}

/// Couples an [`Algorithm`] with the system it populated.
pub struct Simulator<A: Algorithm> {
    algorithm: A,
    system: AmoebotSystem<A::Particle>,
}

impl<A: Algorithm> Simulator<A> {
    /// Create a system from `config` and let the algorithm populate it.
    pub fn new(mut algorithm: A, config: SystemConfig) -> Result<Self, SystemError> {
        let mut system = AmoebotSystem::new(config);
        algorithm.populate(&mut system)?;
        system.check_invariants()?;
        debug!(
            algorithm = algorithm.name(),
            particles = system.size(),
            tiles = system.num_tiles(),
            "populated system"
        );
        Ok(Self { algorithm, system })
    }

    #[must_use]
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    #[must_use]
    pub fn system(&self) -> &AmoebotSystem<A::Particle> {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut AmoebotSystem<A::Particle> {
        &mut self.system
    }

    #[must_use]
    pub fn has_terminated(&self) -> bool {
        self.algorithm.has_terminated(&self.system)
    }

    /// Run a single scheduled activation.
    pub fn step(&mut self) -> Option<ParticleId> {
        self.system.activate()
    }

    /// Activate whichever particle occupies `node`.
    pub fn step_particle_at(&mut self, node: Node) -> Option<ParticleId> {
        self.system.activate_particle_at(node)
    }

    /// Activate until the algorithm terminates or a limit is reached.
    pub fn run(&mut self, limits: RunLimits) -> Result<RunSummary, SystemError> {
        limits.validate()?;
        let round_base = self.system.num_rounds();
        let activation_base = self.system.num_activations();
        let stop_reason = loop {
            if self.has_terminated() {
                break StopReason::Terminated;
            }
            if limits
                .max_rounds
                .is_some_and(|max| self.system.num_rounds() - round_base >= max)
            {
                break StopReason::RoundLimit;
            }
            if limits
                .max_activations
                .is_some_and(|max| self.system.num_activations() - activation_base >= max)
            {
                break StopReason::ActivationLimit;
            }
            if self.step().is_none() {
                break StopReason::Empty;
            }
        };
        let summary = self.summary(stop_reason);
        debug!(
            algorithm = %summary.algorithm,
            rounds = summary.rounds,
            movements = summary.movements,
            reason = ?summary.stop_reason,
            "run finished"
        );
        Ok(summary)
    }

    fn summary(&self, stop_reason: StopReason) -> RunSummary {
        RunSummary {
            algorithm: self.algorithm.name().to_string(),
            particles: self.system.size(),
            rounds: self.system.num_rounds(),
            activations: self.system.num_activations(),
            movements: self.system.num_movements(),
            connected: self.system.is_connected(),
            stop_reason,
        }
    }
}
