//! Core engine for amoebot particle systems on the triangular lattice.
//!
//! Particles see only labelled edges around the node(s) they occupy and act
//! through a small set of movement primitives. [`AmoebotSystem`] owns every
//! particle, keeps the node occupancy index consistent and interleaves
//! activations in a freshly shuffled order each round.

use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, new_key_type};
use thiserror::Error;

pub mod body;
pub mod labels;
pub mod simulator;
pub mod system;
pub mod token;

pub use amoebot_index::{IndexError, NUM_DIRS, Node, NodeMap, OccupancyIndex, opposite};
pub use body::Body;
pub use simulator::{Algorithm, RunLimits, RunSummary, Simulator, StopReason};
pub use system::{
    Activation, AmoebotSystem, Neighbor, Particle, ParticleMarks, ParticleSnapshot,
    SystemSnapshot, Tile,
};
pub use token::{Mailbox, NoToken, Token};

new_key_type! {
    /// Stable handle for particles backed by a generational slot map.
    pub struct ParticleId;
}

/// Convenience alias for associating side data with particles.
pub type ParticleMap<T> = SecondaryMap<ParticleId, T>;

/// Per-activation behaviour implemented by every algorithm's particles.
///
/// The scheduler calls [`Behavior::activate`] with exclusive access to the
/// particle's own state. Everything else, from neighbour state to movement,
/// goes through the [`Activation`] handle.
pub trait Behavior: Sized {
    /// Closed set of messages this algorithm exchanges.
    type Token: Token;

    /// Static identifier of the behaviour (used in snapshots and logs).
    fn kind(&self) -> &'static str;

    /// Execute one activation.
    fn activate(&mut self, ctx: &mut Activation<'_, Self>);

    /// Colour (`0xRRGGBB`) of the ring drawn around the head.
    fn head_mark_color(&self, _mailbox: &Mailbox<Self::Token>) -> Option<u32> {
        None
    }

    /// Colour (`0xRRGGBB`) of the ring drawn around the tail.
    fn tail_mark_color(&self, _mailbox: &Mailbox<Self::Token>) -> Option<u32> {
        None
    }

    /// Local direction of the marker drawn at the head.
    fn head_mark_dir(&self) -> Option<usize> {
        None
    }

    /// Local direction of the marker drawn at the tail.
    fn tail_mark_dir(&self) -> Option<usize> {
        None
    }

    /// Free-form dump of the particle's memory for inspection.
    fn inspection_text(&self, mailbox: &Mailbox<Self::Token>) -> String {
        format!("{} particle holding {} tokens", self.kind(), mailbox.len())
    }
}

/// Errors reported by system construction and setup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SystemError {
    /// A particle already owns a required node.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// A tile already sits on a required node.
    #[error("node ({}, {}) holds a tile", .node.x, .node.y)]
    Tile { node: Node },
    /// The spatial index disagrees with particle state.
    #[error("inconsistent system state: {0}")]
    Inconsistent(String),
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Static configuration for an amoebot system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SystemConfig {
    /// Optional RNG seed for reproducible activation orders.
    pub rng_seed: Option<u64>,
}

impl SystemConfig {
    /// Configuration with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
        }
    }

    /// Returns the configured RNG, seeding from entropy if no seed is set.
    fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                SmallRng::seed_from_u64(seed)
            }
        }
    }
}
