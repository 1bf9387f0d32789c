//! Particles that alternately expand in a rotating direction and contract.

use amoebot_core::{
    Activation, Algorithm, AmoebotSystem, Behavior, Body, Mailbox, Node, NoToken, SystemError,
};
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct OscillateParticle {
    expand_dir: usize,
    cycles: u64,
}

impl OscillateParticle {
    /// Completed expand/contract cycles.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl Behavior for OscillateParticle {
    type Token = NoToken;

    fn kind(&self) -> &'static str {
        "oscillate"
    }

    fn activate(&mut self, ctx: &mut Activation<'_, Self>) {
        if ctx.body().is_expanded() {
            ctx.contract_tail();
            self.cycles += 1;
            return;
        }
        self.expand_dir = (self.expand_dir + 1) % 6;
        if ctx.can_expand(self.expand_dir) {
            ctx.expand(self.expand_dir);
        }
    }

    fn head_mark_color(&self, _: &Mailbox<NoToken>) -> Option<u32> {
        Some(0x3366cc)
    }

    fn head_mark_dir(&self) -> Option<usize> {
        Some(self.expand_dir)
    }

    fn inspection_text(&self, _: &Mailbox<NoToken>) -> String {
        format!("expand dir: {}\ncycles: {}", self.expand_dir, self.cycles)
    }
}

/// A row of particles with one free node between neighbours, so adjacent
/// particles compete for the same gaps.
#[derive(Debug, Clone)]
pub struct Oscillate {
    pub particles: usize,
}

impl Default for Oscillate {
    fn default() -> Self {
        Self { particles: 20 }
    }
}

impl Algorithm for Oscillate {
    type Particle = OscillateParticle;

    fn name(&self) -> &'static str {
        "oscillate"
    }

    fn populate(
        &mut self,
        system: &mut AmoebotSystem<OscillateParticle>,
    ) -> Result<(), SystemError> {
        for (x, _) in (0..).step_by(2).zip(0..self.particles) {
            let orientation = system.rng().random_range(0..6);
            system.insert(
                Body::contracted(Node::new(x, 0), orientation),
                OscillateParticle::default(),
            )?;
        }
        Ok(())
    }

    /// Oscillation never settles; runs are bounded by their limits.
    fn has_terminated(&self, _: &AmoebotSystem<OscillateParticle>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amoebot_core::{RunLimits, Simulator, StopReason, SystemConfig};

    #[test]
    fn lone_particle_cycles_through_directions() {
        let mut system = AmoebotSystem::new(SystemConfig::seeded(2));
        let id = system
            .insert(
                Body::contracted(Node::ORIGIN, 0),
                OscillateParticle::default(),
            )
            .expect("insert");
        system.activate();
        let body = *system.particle(id).expect("particle").body();
        assert_eq!(body.head(), Node::new(0, 1));
        system.activate();
        system.activate();
        let body = *system.particle(id).expect("particle").body();
        assert_eq!(body.head(), Node::new(-1, 2));
        assert_eq!(body.tail(), Node::new(0, 1));
        assert_eq!(system.behavior(id).expect("behaviour").cycles(), 1);
        assert_eq!(system.num_movements(), 3);
    }

    #[test]
    fn row_stays_consistent_until_round_limit() {
        let mut sim = Simulator::new(Oscillate { particles: 8 }, SystemConfig::seeded(11))
            .expect("populate");
        let summary = sim
            .run(RunLimits {
                max_rounds: Some(50),
                max_activations: None,
            })
            .expect("run");
        assert_eq!(summary.stop_reason, StopReason::RoundLimit);
        assert_eq!(summary.rounds, 50);
        sim.system().check_invariants().expect("consistent");
        assert!(sim.system().behaviors().any(|(_, p)| p.cycles() > 0));
    }
}
