//! Particle arena, spatial index, movement primitives and activation
//! scheduling.

use crate::body::Body;
use crate::labels::{CONTRACTED_LABEL_COUNT, EXPANDED_LABEL_COUNT, check_label};
use crate::token::{Mailbox, Token};
use crate::{Behavior, ParticleId, ParticleMap, SystemConfig, SystemError};
use amoebot_index::{IndexError, Node, NodeMap, OccupancyIndex};
use rand::seq::SliceRandom;
use rand::{Rng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use tracing::{debug, trace};

/// A single node of a static obstacle. Tiles never move and are never owned
/// by particles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tile {
    pub node: Node,
}

/// Engine-owned particle record: geometry plus mailbox. Algorithm state lives
/// in the particle's [`Behavior`].
#[derive(Debug, Clone)]
pub struct Particle<T> {
    body: Body,
    mailbox: Mailbox<T>,
}

impl<T: Token> Particle<T> {
    fn new(body: Body) -> Self {
        Self {
            body,
            mailbox: Mailbox::new(),
        }
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub fn mailbox(&self) -> &Mailbox<T> {
        &self.mailbox
    }
}

/// Cosmetic markers of a particle in global terms, for visualisers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticleMarks {
    pub head_color: Option<u32>,
    pub tail_color: Option<u32>,
    pub head_global_dir: Option<usize>,
    pub tail_global_dir: Option<usize>,
}

/// Serializable view of one particle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticleSnapshot {
    pub id: ParticleId,
    pub kind: String,
    pub head: Node,
    pub tail: Option<Node>,
    pub orientation: usize,
    pub tokens: usize,
    pub marks: ParticleMarks,
}

/// Serializable view of the whole system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemSnapshot {
    pub movements: u64,
    pub rounds: u64,
    pub activations: u64,
    pub particles: Vec<ParticleSnapshot>,
    pub tiles: Vec<Node>,
}

/// Particles, behaviours and the occupancy index. Every mutation of particle
/// geometry goes through the movement methods below so the index never
/// disagrees with the bodies it describes.
struct Lattice<B: Behavior> {
    particles: SlotMap<ParticleId, Particle<B::Token>>,
    behaviors: ParticleMap<B>,
    occupancy: NodeMap<ParticleId>,
    tiles: Vec<Tile>,
    tile_index: NodeMap<usize>,
    movements: u64,
}

impl<B: Behavior> Lattice<B> {
    fn new() -> Self {
        Self {
            particles: SlotMap::with_key(),
            behaviors: ParticleMap::new(),
            occupancy: NodeMap::new(),
            tiles: Vec::new(),
            tile_index: NodeMap::new(),
            movements: 0,
        }
    }

    fn particle(&self, id: ParticleId) -> &Particle<B::Token> {
        self.particles
            .get(id)
            .unwrap_or_else(|| panic!("unknown particle {id:?}"))
    }

    fn particle_mut(&mut self, id: ParticleId) -> &mut Particle<B::Token> {
        self.particles
            .get_mut(id)
            .unwrap_or_else(|| panic!("unknown particle {id:?}"))
    }

    fn body(&self, id: ParticleId) -> Body {
        self.particle(id).body
    }

    fn ensure_vacant(&self, node: Node) -> Result<(), SystemError> {
        if self.tile_index.is_occupied(node) {
            return Err(SystemError::Tile { node });
        }
        if self.occupancy.is_occupied(node) {
            return Err(IndexError::Occupied { node }.into());
        }
        Ok(())
    }

    fn insert(&mut self, body: Body, behavior: B) -> Result<ParticleId, SystemError> {
        for node in body.occupied_nodes() {
            self.ensure_vacant(node)?;
        }
        let id = self.particles.insert(Particle::new(body));
        self.behaviors.insert(id, behavior);
        for node in body.occupied_nodes() {
            self.occupancy.claim(node, id)?;
        }
        Ok(id)
    }

    fn insert_tile(&mut self, node: Node) -> Result<(), SystemError> {
        self.ensure_vacant(node)?;
        self.tile_index.claim(node, self.tiles.len())?;
        self.tiles.push(Tile { node });
        Ok(())
    }

    fn neighbor_node(&self, id: ParticleId, label: usize) -> Node {
        self.particle(id).body.neighbor_node_via_label(label)
    }

    fn neighbor_id(&self, id: ParticleId, label: usize) -> Option<ParticleId> {
        self.occupancy.occupant(self.neighbor_node(id, label))
    }

    fn has_tile_at_label(&self, id: ParticleId, label: usize) -> bool {
        self.tile_index.is_occupied(self.neighbor_node(id, label))
    }

    fn can_expand(&self, id: ParticleId, label: usize) -> bool {
        check_label(label, CONTRACTED_LABEL_COUNT);
        let body = self.body(id);
        if body.is_expanded() {
            return false;
        }
        let target = body.neighbor_node_via_label(label);
        !self.occupancy.is_occupied(target) && !self.tile_index.is_occupied(target)
    }

    fn expand(&mut self, id: ParticleId, label: usize) {
        assert!(
            self.can_expand(id, label),
            "particle {id:?} cannot expand along label {label}"
        );
        let particle = self.particle_mut(id);
        let global_dir = particle.body.local_to_global(label);
        particle.body.expand_towards(global_dir);
        let head = particle.body.head();
        let previous = self.occupancy.reassign(head, id);
        debug_assert!(previous.is_none());
        self.movements += 1;
        trace!(?id, x = head.x, y = head.y, "expanded");
    }

    fn can_push(&self, id: ParticleId, label: usize) -> bool {
        check_label(label, CONTRACTED_LABEL_COUNT);
        if self.body(id).is_expanded() {
            return false;
        }
        self.neighbor_id(id, label)
            .is_some_and(|neighbor| self.body(neighbor).is_expanded())
    }

    fn push(&mut self, id: ParticleId, label: usize) {
        assert!(
            self.can_push(id, label),
            "particle {id:?} cannot push along label {label}"
        );
        let body = self.body(id);
        let global_dir = body.local_to_global(label);
        let handover = body.head().node_in_dir(global_dir);
        let neighbor = self
            .occupancy
            .occupant(handover)
            .unwrap_or_else(|| panic!("handover node ({}, {}) is empty", handover.x, handover.y));

        let neighbor_body = &mut self.particle_mut(neighbor).body;
        if neighbor_body.head() == handover {
            neighbor_body.retract_head();
        } else {
            neighbor_body.retract_tail();
        }
        self.particle_mut(id).body.expand_towards(global_dir);
        self.occupancy.reassign(handover, id);

        self.movements += 2;
        trace!(?id, ?neighbor, x = handover.x, y = handover.y, "pushed");
    }

    fn contract(&mut self, id: ParticleId, label: usize) {
        check_label(label, EXPANDED_LABEL_COUNT);
        let body = self.body(id);
        if label == body.head_contraction_label() {
            self.contract_head(id);
        } else if label == body.tail_contraction_label() {
            self.contract_tail(id);
        } else {
            panic!("label {label} is not a contraction label of particle {id:?}");
        }
    }

    fn contract_head(&mut self, id: ParticleId) {
        let particle = self.particle_mut(id);
        assert!(particle.body.is_expanded(), "contracting a contracted particle");
        let vacated = particle.body.retract_head();
        self.occupancy.release(vacated);
        self.movements += 1;
        trace!(?id, x = vacated.x, y = vacated.y, "contracted head");
    }

    fn contract_tail(&mut self, id: ParticleId) {
        let particle = self.particle_mut(id);
        assert!(particle.body.is_expanded(), "contracting a contracted particle");
        let vacated = particle.body.retract_tail();
        self.occupancy.release(vacated);
        self.movements += 1;
        trace!(?id, x = vacated.x, y = vacated.y, "contracted tail");
    }

    fn can_pull(&self, id: ParticleId, label: usize) -> bool {
        check_label(label, EXPANDED_LABEL_COUNT);
        if self.body(id).is_contracted() {
            return false;
        }
        self.neighbor_id(id, label)
            .is_some_and(|neighbor| self.body(neighbor).is_contracted())
    }

    fn pull(&mut self, id: ParticleId, label: usize) {
        assert!(
            self.can_pull(id, label),
            "particle {id:?} cannot pull along label {label}"
        );
        let body = self.body(id);
        let pull_dir = body.label_to_global_dir(label);
        let neighbor = self
            .neighbor_id(id, label)
            .unwrap_or_else(|| panic!("no neighbour at label {label}"));

        let puller = &mut self.particle_mut(id).body;
        let handover = if body.is_head_label(label) {
            puller.retract_head()
        } else {
            puller.retract_tail()
        };
        self.particle_mut(neighbor)
            .body
            .expand_into(handover, pull_dir);
        self.occupancy.reassign(handover, neighbor);

        self.movements += 2;
        trace!(?id, ?neighbor, x = handover.x, y = handover.y, "pulled");
    }

    fn check_invariants(&self) -> Result<(), SystemError> {
        let mut owned = 0;
        for (id, particle) in &self.particles {
            for node in particle.body.occupied_nodes() {
                owned += 1;
                if self.occupancy.occupant(node) != Some(id) {
                    return Err(SystemError::Inconsistent(format!(
                        "node ({}, {}) is not indexed to particle {id:?}",
                        node.x, node.y
                    )));
                }
                if self.tile_index.is_occupied(node) {
                    return Err(SystemError::Inconsistent(format!(
                        "particle {id:?} overlaps a tile at ({}, {})",
                        node.x, node.y
                    )));
                }
            }
        }
        if owned != self.occupancy.len() {
            return Err(SystemError::Inconsistent(format!(
                "index holds {} nodes but particles own {owned}",
                self.occupancy.len()
            )));
        }
        if self.behaviors.len() != self.particles.len() {
            return Err(SystemError::Inconsistent(
                "behaviour count differs from particle count".to_string(),
            ));
        }
        Ok(())
    }
}

/// Activation queue and round bookkeeping.
#[derive(Debug, Default)]
struct Scheduler {
    queue: VecDeque<ParticleId>,
    roster: HashSet<ParticleId>,
    rounds: u64,
    activations: u64,
}

impl Scheduler {
    /// Pop the next particle, reshuffling every registered particle into the
    /// queue once it runs dry.
    fn next(&mut self, registered: Vec<ParticleId>, rng: &mut SmallRng) -> Option<ParticleId> {
        if self.queue.is_empty() {
            let mut order = registered;
            order.shuffle(rng);
            self.queue.extend(order);
        }
        self.queue.pop_front()
    }

    /// Start a round if none is in progress; its roster is every particle
    /// registered right now.
    fn open_round(&mut self, registered: impl Iterator<Item = ParticleId>) {
        if self.roster.is_empty() {
            self.roster.extend(registered);
        }
    }

    /// Mark `id` as activated this round; returns true when this completes
    /// the round.
    fn record(&mut self, id: ParticleId) -> bool {
        if self.roster.remove(&id) && self.roster.is_empty() {
            self.rounds += 1;
            return true;
        }
        false
    }
}

/// Aggregate particle system: arena, spatial index, tiles, counters and the
/// activation scheduler.
pub struct AmoebotSystem<B: Behavior> {
    config: SystemConfig,
    rng: SmallRng,
    lattice: Lattice<B>,
    scheduler: Scheduler,
}

impl<B: Behavior> fmt::Debug for AmoebotSystem<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmoebotSystem")
            .field("config", &self.config)
            .field("particles", &self.lattice.particles.len())
            .field("tiles", &self.lattice.tiles.len())
            .field("movements", &self.lattice.movements)
            .field("rounds", &self.scheduler.rounds)
            .finish()
    }
}

impl<B: Behavior> AmoebotSystem<B> {
    /// Instantiate an empty system using the supplied configuration.
    #[must_use]
    pub fn new(config: SystemConfig) -> Self {
        let rng = config.seeded_rng();
        Self {
            config,
            rng,
            lattice: Lattice::new(),
            scheduler: Scheduler::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// The system's random number generator, for population setup.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Insert a contracted or expanded particle. Fails if any node it needs is
    /// held by a particle or a tile.
    pub fn insert(&mut self, body: Body, behavior: B) -> Result<ParticleId, SystemError> {
        self.lattice.insert(body, behavior)
    }

    /// Insert a tile. Fails if the node is held by a particle or a tile.
    pub fn insert_tile(&mut self, node: Node) -> Result<(), SystemError> {
        self.lattice.insert_tile(node)
    }

    /// Activate the next particle of the current shuffled pass. Returns the
    /// activated particle, or `None` when the system is empty.
    pub fn activate(&mut self) -> Option<ParticleId> {
        let registered: Vec<ParticleId> = if self.scheduler.queue.is_empty() {
            self.lattice.particles.keys().collect()
        } else {
            Vec::new()
        };
        let id = self.scheduler.next(registered, &mut self.rng)?;
        self.run_activation(id);
        Some(id)
    }

    /// Activate the particle occupying `node`, if any, outside the queue.
    pub fn activate_particle_at(&mut self, node: Node) -> Option<ParticleId> {
        let id = self.lattice.occupancy.occupant(node)?;
        self.run_activation(id);
        Some(id)
    }

    fn run_activation(&mut self, id: ParticleId) {
        let Some(mut behavior) = self.lattice.behaviors.remove(id) else {
            panic!("particle {id:?} has no behaviour");
        };
        self.scheduler.open_round(self.lattice.particles.keys());
        {
            let mut ctx = Activation {
                id,
                lattice: &mut self.lattice,
                rng: &mut self.rng,
            };
            behavior.activate(&mut ctx);
        }
        self.lattice.behaviors.insert(id, behavior);
        self.scheduler.activations += 1;
        trace!(?id, "activated particle");

        // Only an invoked behaviour counts; the passive side of a push or pull
        // has not been activated.
        if self.scheduler.record(id) {
            debug!(
                rounds = self.scheduler.rounds,
                movements = self.lattice.movements,
                activations = self.scheduler.activations,
                "round completed"
            );
        }
    }

    /// Number of particles in the system.
    #[must_use]
    pub fn size(&self) -> usize {
        self.lattice.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lattice.particles.is_empty()
    }

    #[must_use]
    pub fn num_tiles(&self) -> usize {
        self.lattice.tiles.len()
    }

    /// Total expansions and contractions; handovers count two.
    #[must_use]
    pub fn num_movements(&self) -> u64 {
        self.lattice.movements
    }

    /// Number of completed asynchronous rounds.
    #[must_use]
    pub fn num_rounds(&self) -> u64 {
        self.scheduler.rounds
    }

    /// Number of behaviour invocations so far.
    #[must_use]
    pub fn num_activations(&self) -> u64 {
        self.scheduler.activations
    }

    #[must_use]
    pub fn particle(&self, id: ParticleId) -> Option<&Particle<B::Token>> {
        self.lattice.particles.get(id)
    }

    #[must_use]
    pub fn behavior(&self, id: ParticleId) -> Option<&B> {
        self.lattice.behaviors.get(id)
    }

    /// Mutable access to a behaviour between activations, for setup and
    /// debugging drivers.
    pub fn behavior_mut(&mut self, id: ParticleId) -> Option<&mut B> {
        self.lattice.behaviors.get_mut(id)
    }

    /// Deposit a token into a particle's mailbox between activations.
    pub fn put_token(&mut self, id: ParticleId, token: B::Token) -> bool {
        match self.lattice.particles.get_mut(id) {
            Some(particle) => {
                particle.mailbox.put(token);
                true
            }
            None => false,
        }
    }

    /// Particle owning `node`, if any.
    #[must_use]
    pub fn particle_at(&self, node: Node) -> Option<ParticleId> {
        self.lattice.occupancy.occupant(node)
    }

    #[must_use]
    pub fn has_tile_at(&self, node: Node) -> bool {
        self.lattice.tile_index.is_occupied(node)
    }

    /// Iterate over particles in arena order.
    pub fn particles(&self) -> impl Iterator<Item = (ParticleId, &Particle<B::Token>)> + '_ {
        self.lattice.particles.iter()
    }

    /// Iterate over particles together with their behaviours.
    pub fn behaviors(&self) -> impl Iterator<Item = (ParticleId, &B)> + '_ {
        self.lattice.behaviors.iter()
    }

    /// Inspection text of `id`, as written by its behaviour.
    #[must_use]
    pub fn inspect(&self, id: ParticleId) -> Option<String> {
        let particle = self.lattice.particles.get(id)?;
        let behavior = self.lattice.behaviors.get(id)?;
        let body = particle.body;
        let mut text = format!(
            "head: ({}, {})\norientation: {}\nglobal tail dir: {:?}\n",
            body.head().x,
            body.head().y,
            body.orientation(),
            body.global_tail_dir()
        );
        text.push_str(&behavior.inspection_text(&particle.mailbox));
        Some(text)
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.lattice.tiles
    }

    /// Global-frame cosmetic markers of `id`.
    #[must_use]
    pub fn marks(&self, id: ParticleId) -> Option<ParticleMarks> {
        let particle = self.lattice.particles.get(id)?;
        let behavior = self.lattice.behaviors.get(id)?;
        let body = particle.body;
        let expanded = body.is_expanded();
        Some(ParticleMarks {
            head_color: behavior.head_mark_color(&particle.mailbox),
            tail_color: behavior
                .tail_mark_color(&particle.mailbox)
                .filter(|_| expanded),
            head_global_dir: behavior.head_mark_dir().map(|dir| body.local_to_global(dir)),
            tail_global_dir: behavior
                .tail_mark_dir()
                .filter(|_| expanded)
                .map(|dir| body.local_to_global(dir)),
        })
    }

    /// Capture a serializable view of every particle and tile.
    #[must_use]
    pub fn snapshot(&self) -> SystemSnapshot {
        let particles = self
            .lattice
            .particles
            .iter()
            .filter_map(|(id, particle)| {
                let behavior = self.lattice.behaviors.get(id)?;
                let body = particle.body;
                Some(ParticleSnapshot {
                    id,
                    kind: behavior.kind().to_string(),
                    head: body.head(),
                    tail: body.is_expanded().then(|| body.tail()),
                    orientation: body.orientation(),
                    tokens: particle.mailbox.len(),
                    marks: self.marks(id).unwrap_or_default(),
                })
            })
            .collect();
        SystemSnapshot {
            movements: self.lattice.movements,
            rounds: self.scheduler.rounds,
            activations: self.scheduler.activations,
            particles,
            tiles: self.lattice.tiles.iter().map(|tile| tile.node).collect(),
        }
    }

    /// Whether the nodes occupied by particles form one connected component.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let mut unvisited: HashSet<Node> =
            self.lattice.occupancy.iter().map(|(node, _)| node).collect();
        let Some(&start) = unvisited.iter().next() else {
            return true;
        };
        unvisited.remove(&start);
        let mut frontier = VecDeque::from([start]);
        while let Some(node) = frontier.pop_front() {
            for neighbor in node.neighbors() {
                if unvisited.remove(&neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }
        unvisited.is_empty()
    }

    /// Verify that the occupancy index and particle bodies agree.
    pub fn check_invariants(&self) -> Result<(), SystemError> {
        self.lattice.check_invariants()
    }
}

/// Read-only view of a neighbouring particle.
pub struct Neighbor<'a, B: Behavior> {
    id: ParticleId,
    particle: &'a Particle<B::Token>,
    behavior: &'a B,
}

impl<'a, B: Behavior> Neighbor<'a, B> {
    #[must_use]
    pub fn id(&self) -> ParticleId {
        self.id
    }

    #[must_use]
    pub fn body(&self) -> &'a Body {
        &self.particle.body
    }

    #[must_use]
    pub fn behavior(&self) -> &'a B {
        self.behavior
    }

    #[must_use]
    pub fn mailbox(&self) -> &'a Mailbox<B::Token> {
        &self.particle.mailbox
    }
}

/// Exclusive handle given to a particle for the duration of one activation.
///
/// Labels are always interpreted in the active particle's current occupancy:
/// `0..6` when contracted and `0..10` when expanded. Movement methods panic
/// when their paired `can_*` predicate does not hold.
pub struct Activation<'a, B: Behavior> {
    id: ParticleId,
    lattice: &'a mut Lattice<B>,
    rng: &'a mut SmallRng,
}

impl<B: Behavior> Activation<'_, B> {
    #[must_use]
    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// Geometry of the active particle.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.lattice.particle(self.id).body
    }

    #[must_use]
    pub fn mailbox(&self) -> &Mailbox<B::Token> {
        &self.lattice.particle(self.id).mailbox
    }

    pub fn mailbox_mut(&mut self) -> &mut Mailbox<B::Token> {
        &mut self.lattice.particle_mut(self.id).mailbox
    }

    /// Deposit a token into the active particle's own mailbox.
    pub fn put_token(&mut self, token: B::Token) {
        self.mailbox_mut().put(token);
    }

    /// Deposit a token into the mailbox of the neighbour at `label`.
    ///
    /// # Panics
    /// Panics when no particle is reached via `label`.
    pub fn put_token_at(&mut self, label: usize, token: B::Token) {
        let neighbor = self.expect_neighbor(label);
        self.lattice.particle_mut(neighbor).mailbox.put(token);
    }

    pub fn rng(&mut self) -> &mut SmallRng {
        &mut *self.rng
    }

    /// Uniformly random local direction.
    pub fn random_dir(&mut self) -> usize {
        self.rng.random_range(0..CONTRACTED_LABEL_COUNT)
    }

    /// Returns true with probability `probability`, clamped to `[0, 1]`. NaN
    /// is treated as 0.
    pub fn random_bool(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn has_neighbor_at_label(&self, label: usize) -> bool {
        self.lattice.neighbor_id(self.id, label).is_some()
    }

    /// Whether a neighbour's head is reached via `label`.
    #[must_use]
    pub fn has_head_at_label(&self, label: usize) -> bool {
        let node = self.lattice.neighbor_node(self.id, label);
        self.lattice
            .occupancy
            .occupant(node)
            .is_some_and(|neighbor| self.lattice.body(neighbor).head() == node)
    }

    /// Whether a neighbour's tail is reached via `label`.
    #[must_use]
    pub fn has_tail_at_label(&self, label: usize) -> bool {
        let node = self.lattice.neighbor_node(self.id, label);
        self.lattice.occupancy.occupant(node).is_some_and(|neighbor| {
            let body = self.lattice.body(neighbor);
            body.is_expanded() && body.tail() == node
        })
    }

    /// The neighbour reached via `label`, if any.
    #[must_use]
    pub fn neighbor(&self, label: usize) -> Option<Neighbor<'_, B>> {
        let id = self.lattice.neighbor_id(self.id, label)?;
        let particle = self.lattice.particles.get(id)?;
        let behavior = self.lattice.behaviors.get(id)?;
        Some(Neighbor {
            id,
            particle,
            behavior,
        })
    }

    /// First label, scanning counter-clockwise from `start`, whose neighbour
    /// satisfies `predicate`.
    #[must_use]
    pub fn label_of_first_neighbor_with(
        &self,
        start: usize,
        predicate: impl Fn(&Neighbor<'_, B>) -> bool,
    ) -> Option<usize> {
        let limit = self.body().label_count();
        (0..limit)
            .map(|offset| (start + offset) % limit)
            .find(|&label| self.neighbor(label).is_some_and(|nbr| predicate(&nbr)))
    }

    #[must_use]
    pub fn has_tile_at_label(&self, label: usize) -> bool {
        self.lattice.has_tile_at_label(self.id, label)
    }

    #[must_use]
    pub fn has_tile_neighbor(&self) -> bool {
        self.label_of_first_tile_neighbor(0).is_some()
    }

    /// First label, scanning counter-clockwise from `start`, that reaches a
    /// tile.
    #[must_use]
    pub fn label_of_first_tile_neighbor(&self, start: usize) -> Option<usize> {
        let limit = self.body().label_count();
        (0..limit)
            .map(|offset| (start + offset) % limit)
            .find(|&label| self.has_tile_at_label(label))
    }

    /// Contracted and the node via `label` is free of particles and tiles.
    #[must_use]
    pub fn can_expand(&self, label: usize) -> bool {
        self.lattice.can_expand(self.id, label)
    }

    /// Expand into the node via `label`; the old node becomes the tail.
    pub fn expand(&mut self, label: usize) {
        self.lattice.expand(self.id, label);
    }

    /// Contracted and the node via `label` belongs to an expanded neighbour.
    #[must_use]
    pub fn can_push(&self, label: usize) -> bool {
        self.lattice.can_push(self.id, label)
    }

    /// Expand into the node via `label` while its expanded owner contracts
    /// out of it.
    pub fn push(&mut self, label: usize) {
        self.lattice.push(self.id, label);
    }

    /// Contract onto the node `label` is incident to.
    pub fn contract(&mut self, label: usize) {
        self.lattice.contract(self.id, label);
    }

    /// Vacate the head and remain at the tail.
    pub fn contract_head(&mut self) {
        self.lattice.contract_head(self.id);
    }

    /// Vacate the tail and remain at the head.
    pub fn contract_tail(&mut self) {
        self.lattice.contract_tail(self.id);
    }

    /// Expanded and the node via `label` belongs to a contracted neighbour.
    #[must_use]
    pub fn can_pull(&self, label: usize) -> bool {
        self.lattice.can_pull(self.id, label)
    }

    /// Contract away from the node `label` is incident to, handing it to the
    /// contracted neighbour at `label`, which expands into it.
    pub fn pull(&mut self, label: usize) {
        self.lattice.pull(self.id, label);
    }

    fn expect_neighbor(&self, label: usize) -> ParticleId {
        self.lattice
            .neighbor_id(self.id, label)
            .unwrap_or_else(|| panic!("no neighbour at label {label}"))
    }
}
