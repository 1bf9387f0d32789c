//! Line formation with a supply of coloured tokens circulating through the
//! finished line.
//!
//! The classic token demo circulates its tokens over hexagon formation; this
//! one rides on line formation instead, so the structure tokens travel
//! through is a line rather than a hexagon.

use crate::line::{LineMember, LineParticle, LineState};
use crate::{BlobParams, grow_blob};
use amoebot_core::{Activation, Algorithm, AmoebotSystem, Behavior, Mailbox, SystemError, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoToken {
    Red,
    Blue,
}

impl Token for DemoToken {
    type Kind = DemoToken;

    fn kind(&self) -> DemoToken {
        *self
    }
}

/// Tokens handed to the seed before the first activation.
const SEED_SUPPLY: [DemoToken; 5] = [
    DemoToken::Red,
    DemoToken::Red,
    DemoToken::Red,
    DemoToken::Blue,
    DemoToken::Blue,
];

#[derive(Debug, Clone)]
pub struct TokenDemoParticle {
    line: LineParticle,
}

impl TokenDemoParticle {
    #[must_use]
    pub fn seed() -> Self {
        Self {
            line: LineParticle::seed(),
        }
    }

    #[must_use]
    pub fn idle() -> Self {
        Self {
            line: LineParticle::idle(),
        }
    }

    #[must_use]
    pub fn state(&self) -> LineState {
        self.line.state()
    }
}

impl LineMember for TokenDemoParticle {
    fn line(&self) -> &LineParticle {
        &self.line
    }
}

impl Behavior for TokenDemoParticle {
    type Token = DemoToken;

    fn kind(&self) -> &'static str {
        "token-demo"
    }

    fn activate(&mut self, ctx: &mut Activation<'_, Self>) {
        self.line.step(ctx);

        if ctx.mailbox().is_empty() || ctx.body().is_expanded() || !self.state().is_structure() {
            return;
        }
        let start = ctx.random_dir();
        let Some(label) = ctx.label_of_first_neighbor_with(start, |nbr| {
            nbr.behavior().state().is_structure()
        }) else {
            return;
        };
        if let Some(token) = ctx.mailbox_mut().take_first() {
            ctx.put_token_at(label, token);
        }
    }

    fn head_mark_color(&self, mailbox: &Mailbox<DemoToken>) -> Option<u32> {
        match (
            mailbox.has_kind(DemoToken::Red),
            mailbox.has_kind(DemoToken::Blue),
        ) {
            (true, true) => Some(0xff00ff),
            (true, false) => Some(0xff0000),
            (false, true) => Some(0x0000ff),
            (false, false) if self.state().is_structure() => Some(0x000000),
            (false, false) => None,
        }
    }

    fn head_mark_dir(&self) -> Option<usize> {
        self.line.mark_dir()
    }

    fn inspection_text(&self, mailbox: &Mailbox<DemoToken>) -> String {
        format!(
            "{}\nred tokens: {}\nblue tokens: {}",
            self.line.describe(),
            mailbox.count_kind(DemoToken::Red),
            mailbox.count_kind(DemoToken::Blue)
        )
    }
}

/// Token passing layered on line formation. The tokens never settle, so the
/// demo only stops at its run limits.
#[derive(Debug, Clone, Default)]
pub struct TokenDemo {
    pub blob: BlobParams,
}

impl TokenDemo {
    #[must_use]
    pub fn new(blob: BlobParams) -> Self {
        Self { blob }
    }
}

impl Algorithm for TokenDemo {
    type Particle = TokenDemoParticle;

    fn name(&self) -> &'static str {
        "token-demo"
    }

    fn populate(
        &mut self,
        system: &mut AmoebotSystem<TokenDemoParticle>,
    ) -> Result<(), SystemError> {
        let seed = grow_blob(
            system,
            self.blob,
            TokenDemoParticle::seed(),
            TokenDemoParticle::idle,
        )?;
        for token in SEED_SUPPLY {
            system.put_token(seed, token);
        }
        Ok(())
    }

    fn has_terminated(&self, _: &AmoebotSystem<TokenDemoParticle>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amoebot_core::{Body, Node, SystemConfig};

    #[test]
    fn seed_hands_tokens_to_finished_neighbour() {
        let mut system = AmoebotSystem::new(SystemConfig::seeded(4));
        let seed = system
            .insert(Body::contracted(Node::ORIGIN, 0), TokenDemoParticle::seed())
            .expect("seed");
        let other = system
            .insert(Body::contracted(Node::new(1, 0), 0), TokenDemoParticle::idle())
            .expect("idle");
        system.put_token(seed, DemoToken::Blue);
        system.put_token(seed, DemoToken::Red);

        // Idle neighbours never receive tokens.
        system.activate_particle_at(Node::ORIGIN);
        assert_eq!(system.particle(other).expect("other").mailbox().len(), 0);

        // Idle -> lead -> finish.
        system.activate_particle_at(Node::new(1, 0));
        system.activate_particle_at(Node::new(1, 0));
        assert_eq!(system.behavior(other).expect("other").state(), LineState::Finish);

        system.activate_particle_at(Node::ORIGIN);
        let received = system.particle(other).expect("other").mailbox();
        assert_eq!(received.peek_kind(DemoToken::Blue), Some(&DemoToken::Blue));
        assert_eq!(
            system.marks(seed).expect("marks").head_color,
            Some(0xff0000)
        );
    }

    #[test]
    fn populate_seeds_supply() {
        let mut system = AmoebotSystem::new(SystemConfig::seeded(8));
        let mut demo = TokenDemo::new(BlobParams {
            particles: 6,
            hole_probability: 0.0,
        });
        demo.populate(&mut system).expect("populate");
        let seed = system.particle_at(Node::ORIGIN).expect("seed");
        let mailbox = system.particle(seed).expect("seed").mailbox();
        assert_eq!(mailbox.count_kind(DemoToken::Red), 3);
        assert_eq!(mailbox.count_kind(DemoToken::Blue), 2);
        assert_eq!(
            system.marks(seed).expect("marks").head_color,
            Some(0xff00ff)
        );
    }
}
