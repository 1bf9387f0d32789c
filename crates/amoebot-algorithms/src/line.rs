//! Line formation around a seed particle.
//!
//! Idle particles next to the finished line become leaders; idle particles
//! next to leaders or followers become followers. Leaders walk clockwise
//! around the line until they reach one of its ends, where they finish and
//! extend it. Followers trail behind by pushing into the tail of whoever they
//! follow, so a chain of particles moves as one.

use crate::{BlobParams, grow_blob};
use amoebot_core::{
    Activation, Algorithm, AmoebotSystem, Behavior, Mailbox, NoToken, SystemError, opposite,
};

/// Role of a particle in line formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Seed,
    Idle,
    Follow,
    Lead,
    Finish,
}

impl LineState {
    /// Part of the line under construction.
    #[must_use]
    pub fn is_structure(self) -> bool {
        matches!(self, Self::Seed | Self::Finish)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Idle => "idle",
            Self::Follow => "follow",
            Self::Lead => "lead",
            Self::Finish => "finish",
        }
    }
}

/// Behaviours that carry line-formation state, so neighbours can read it.
pub trait LineMember: Behavior {
    fn line(&self) -> &LineParticle;
}

/// Line-formation memory of one particle. Directions are local and only
/// meaningful while the particle is contracted.
#[derive(Debug, Clone)]
pub struct LineParticle {
    state: LineState,
    construction_dir: Option<usize>,
    move_dir: Option<usize>,
    follow_dir: Option<usize>,
}

impl LineParticle {
    #[must_use]
    pub fn seed() -> Self {
        Self {
            state: LineState::Seed,
            construction_dir: Some(0),
            move_dir: None,
            follow_dir: None,
        }
    }

    #[must_use]
    pub fn idle() -> Self {
        Self {
            state: LineState::Idle,
            construction_dir: None,
            move_dir: None,
            follow_dir: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> LineState {
        self.state
    }

    /// Direction along which the line continues past this particle.
    #[must_use]
    pub fn construction_dir(&self) -> Option<usize> {
        self.construction_dir
    }

    /// Run one line-formation activation on behalf of the active particle.
    pub fn step<B: LineMember>(&mut self, ctx: &mut Activation<'_, B>) {
        if ctx.body().is_expanded() {
            assert!(
                matches!(self.state, LineState::Follow | LineState::Lead),
                "{:?} particle cannot be expanded",
                self.state
            );
            if !has_neighbor_in(ctx, |state| state == LineState::Idle)
                && !has_tail_follower(ctx)
            {
                ctx.contract_tail();
                if self.state == LineState::Lead {
                    self.update_move_dir(ctx);
                }
            }
            return;
        }

        match self.state {
            LineState::Seed | LineState::Finish => {}
            LineState::Idle => {
                if has_neighbor_in(ctx, LineState::is_structure) {
                    self.state = LineState::Lead;
                    self.update_move_dir(ctx);
                } else if let Some(label) = first_neighbor_in(ctx, 0, |state| {
                    matches!(state, LineState::Lead | LineState::Follow)
                }) {
                    self.state = LineState::Follow;
                    self.follow_dir = Some(label);
                }
            }
            LineState::Follow => {
                if has_neighbor_in(ctx, LineState::is_structure) {
                    self.state = LineState::Lead;
                    self.update_move_dir(ctx);
                } else if let Some(follow_dir) =
                    self.follow_dir.filter(|&dir| ctx.has_tail_at_label(dir))
                {
                    // After the push the followed head sits along the
                    // neighbour's tail-to-head direction.
                    let next = ctx.neighbor(follow_dir).and_then(|nbr| {
                        let body = nbr.body();
                        let tail_dir = body.tail_dir()?;
                        Some(ctx.body().neighbor_dir_to_dir(body, opposite(tail_dir)))
                    });
                    ctx.push(follow_dir);
                    self.follow_dir = next;
                }
            }
            LineState::Lead => {
                if let Some(receive_dir) = construction_receive_dir(ctx) {
                    self.state = LineState::Finish;
                    self.construction_dir = Some(opposite(receive_dir));
                    return;
                }
                self.update_move_dir(ctx);
                let Some(move_dir) = self.move_dir else {
                    return;
                };
                if ctx.can_expand(move_dir) {
                    ctx.expand(move_dir);
                } else if ctx.has_tail_at_label(move_dir) {
                    ctx.push(move_dir);
                }
            }
        }
    }

    /// Point `move_dir` at the first free edge clockwise of the line.
    fn update_move_dir<B: LineMember>(&mut self, ctx: &Activation<'_, B>) {
        let Some(start) = first_neighbor_in(ctx, 0, LineState::is_structure) else {
            return;
        };
        self.move_dir = (0..6)
            .map(|step| (start + 6 - step) % 6)
            .find(|&dir| !neighbor_state(ctx, dir).is_some_and(LineState::is_structure));
    }

    pub(crate) fn mark_color(&self) -> Option<u32> {
        match self.state {
            LineState::Seed => Some(0x00ff00),
            LineState::Idle => None,
            LineState::Follow => Some(0x0000ff),
            LineState::Lead => Some(0xff0000),
            LineState::Finish => Some(0x000000),
        }
    }

    pub(crate) fn mark_dir(&self) -> Option<usize> {
        match self.state {
            LineState::Seed | LineState::Finish => self.construction_dir,
            LineState::Lead => self.move_dir,
            LineState::Follow => self.follow_dir,
            LineState::Idle => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        format!(
            "state: {}\nconstruction dir: {:?}\nmove dir: {:?}\nfollow dir: {:?}",
            self.state.name(),
            self.construction_dir,
            self.move_dir,
            self.follow_dir
        )
    }
}

fn neighbor_state<B: LineMember>(ctx: &Activation<'_, B>, label: usize) -> Option<LineState> {
    ctx.neighbor(label).map(|nbr| nbr.behavior().line().state)
}

fn first_neighbor_in<B: LineMember>(
    ctx: &Activation<'_, B>,
    start: usize,
    wanted: impl Fn(LineState) -> bool,
) -> Option<usize> {
    ctx.label_of_first_neighbor_with(start, |nbr| wanted(nbr.behavior().line().state))
}

fn has_neighbor_in<B: LineMember>(
    ctx: &Activation<'_, B>,
    wanted: impl Fn(LineState) -> bool,
) -> bool {
    first_neighbor_in(ctx, 0, wanted).is_some()
}

/// Whether a follower is waiting to push into this particle's tail.
fn has_tail_follower<B: LineMember>(ctx: &Activation<'_, B>) -> bool {
    let me = *ctx.body();
    ctx.label_of_first_neighbor_with(0, |nbr| {
        let line = nbr.behavior().line();
        let body = nbr.body();
        line.state == LineState::Follow
            && line.follow_dir.is_some_and(|dir| {
                body.head().node_in_dir(body.local_to_global(dir)) == me.tail()
            })
    })
    .is_some()
}

/// Label of a finished neighbour whose line end points at this particle.
fn construction_receive_dir<B: LineMember>(ctx: &Activation<'_, B>) -> Option<usize> {
    let me = *ctx.body();
    if me.is_expanded() {
        return None;
    }
    ctx.label_of_first_neighbor_with(0, |nbr| {
        let line = nbr.behavior().line();
        line.state.is_structure()
            && line.construction_dir.is_some_and(|dir| {
                me.points_at_me(nbr.body(), dir) || me.points_at_me(nbr.body(), opposite(dir))
            })
    })
}

impl LineMember for LineParticle {
    fn line(&self) -> &LineParticle {
        self
    }
}

impl Behavior for LineParticle {
    type Token = NoToken;

    fn kind(&self) -> &'static str {
        "line"
    }

    fn activate(&mut self, ctx: &mut Activation<'_, Self>) {
        self.step(ctx);
    }

    fn head_mark_color(&self, _: &Mailbox<NoToken>) -> Option<u32> {
        self.mark_color()
    }

    fn tail_mark_color(&self, _: &Mailbox<NoToken>) -> Option<u32> {
        self.mark_color()
    }

    fn head_mark_dir(&self) -> Option<usize> {
        self.mark_dir()
    }

    fn inspection_text(&self, _: &Mailbox<NoToken>) -> String {
        self.describe()
    }
}

/// Line formation over a random blob grown around a seed.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub blob: BlobParams,
}

impl Line {
    #[must_use]
    pub fn new(blob: BlobParams) -> Self {
        Self { blob }
    }
}

impl Algorithm for Line {
    type Particle = LineParticle;

    fn name(&self) -> &'static str {
        "line"
    }

    fn populate(&mut self, system: &mut AmoebotSystem<LineParticle>) -> Result<(), SystemError> {
        grow_blob(system, self.blob, LineParticle::seed(), LineParticle::idle)?;
        Ok(())
    }

    fn has_terminated(&self, system: &AmoebotSystem<LineParticle>) -> bool {
        system
            .behaviors()
            .all(|(_, particle)| particle.state.is_structure())
    }
}
