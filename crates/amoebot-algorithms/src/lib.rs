//! Reference algorithms for the amoebot engine.

use amoebot_core::{AmoebotSystem, Behavior, Body, Node, ParticleId, SystemError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

pub mod line;
pub mod oscillate;
pub mod token_demo;

pub use line::{Line, LineParticle, LineState};
pub use oscillate::{Oscillate, OscillateParticle};
pub use token_demo::{DemoToken, TokenDemo, TokenDemoParticle};

/// Shape of a randomly grown initial configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlobParams {
    /// Number of particles besides the seed.
    pub particles: usize,
    /// Chance that a frontier node is left as a hole instead of filled.
    pub hole_probability: f64,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            particles: 20,
            hole_probability: 0.2,
        }
    }
}

impl BlobParams {
    pub fn validate(&self) -> Result<(), SystemError> {
        if !(0.0..=1.0).contains(&self.hole_probability) {
            return Err(SystemError::InvalidConfig(
                "hole_probability must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Insert `seed` at the origin and grow a connected blob around it.
///
/// Frontier nodes are drawn uniformly at random; each one either receives a
/// particle from `make_particle` or becomes a hole that is never revisited.
/// Growth stops once `params.particles` particles are placed or the frontier
/// runs dry. Returns the seed's id.
pub fn grow_blob<B: Behavior>(
    system: &mut AmoebotSystem<B>,
    params: BlobParams,
    seed: B,
    mut make_particle: impl FnMut() -> B,
) -> Result<ParticleId, SystemError> {
    params.validate()?;
    let orientation = system.rng().random_range(0..6);
    let seed_id = system.insert(Body::contracted(Node::ORIGIN, orientation), seed)?;

    let mut visited = BTreeSet::from([Node::ORIGIN]);
    let mut frontier: BTreeSet<Node> = Node::ORIGIN.neighbors().collect();
    let mut placed = 0;
    while placed < params.particles {
        let pick = system.rng().random_range(0..frontier.len().max(1));
        let Some(node) = frontier.iter().nth(pick).copied() else {
            break;
        };
        frontier.remove(&node);
        visited.insert(node);

        if !system.rng().random_bool(1.0 - params.hole_probability) {
            continue;
        }
        let orientation = system.rng().random_range(0..6);
        system.insert(Body::contracted(node, orientation), make_particle())?;
        placed += 1;
        frontier.extend(node.neighbors().filter(|next| !visited.contains(next)));
    }
    debug!(placed, requested = params.particles, "grew particle blob");
    Ok(seed_id)
}
