use amoebot_core::{
    Activation, AmoebotSystem, Behavior, Body, Node, NoToken, SystemConfig, Token,
};

/// Expands in a random direction, then contracts to a random end.
struct Walker;

impl Behavior for Walker {
    type Token = NoToken;

    fn kind(&self) -> &'static str {
        "test.walker"
    }

    fn activate(&mut self, ctx: &mut Activation<'_, Self>) {
        if ctx.body().is_contracted() {
            let dir = ctx.random_dir();
            if ctx.can_expand(dir) {
                ctx.expand(dir);
            } else if ctx.can_push(dir) {
                ctx.push(dir);
            }
        } else if ctx.random_bool(0.5) {
            let label = ctx.body().head_contraction_label();
            if ctx.can_pull(label) {
                ctx.pull(label);
            } else {
                ctx.contract_head();
            }
        } else {
            ctx.contract_tail();
        }
    }
}

fn walkers(seed: u64) -> AmoebotSystem<Walker> {
    let mut system = AmoebotSystem::new(SystemConfig::seeded(seed));
    for x in 0..4 {
        for y in 0..3 {
            system
                .insert(Body::contracted(Node::new(x, y), ((x + y) % 6) as usize), Walker)
                .expect("grid insert");
        }
    }
    for x in -2..7 {
        system.insert_tile(Node::new(x, -2)).expect("tile row");
    }
    system
}

#[test]
fn random_walk_keeps_index_consistent() {
    let mut system = walkers(0x5EED);
    for _ in 0..2_000 {
        system.activate().expect("non-empty system");
        system.check_invariants().expect("consistent after activation");
    }
    assert_eq!(system.size(), 12);
    assert_eq!(system.num_activations(), 2_000);
    // Every full queue pass closes exactly one round.
    assert_eq!(system.num_rounds(), 2_000 / 12);
    for tile in system.tiles() {
        assert_eq!(system.particle_at(tile.node), None);
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut first = walkers(42);
    let mut second = walkers(42);
    for _ in 0..500 {
        first.activate();
        second.activate();
    }
    assert_eq!(first.num_movements(), second.num_movements());
    let heads = |system: &AmoebotSystem<Walker>| -> Vec<Node> {
        system.particles().map(|(_, p)| p.body().head()).collect()
    };
    assert_eq!(heads(&first), heads(&second));
}

#[derive(Debug, Clone, PartialEq)]
enum Relay {
    Baton(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelayKind {
    Baton,
}

impl Token for Relay {
    type Kind = RelayKind;

    fn kind(&self) -> RelayKind {
        RelayKind::Baton
    }
}

/// Forwards every baton one node east, incrementing it on the way.
struct Runner;

impl Behavior for Runner {
    type Token = Relay;

    fn kind(&self) -> &'static str {
        "test.runner"
    }

    fn activate(&mut self, ctx: &mut Activation<'_, Self>) {
        let east = ctx.body().dir_to_head_label(ctx.body().global_to_local(0));
        if !ctx.has_neighbor_at_label(east) {
            return;
        }
        while let Some(Relay::Baton(laps)) = ctx.mailbox_mut().take_kind(RelayKind::Baton) {
            ctx.put_token_at(east, Relay::Baton(laps + 1));
        }
    }
}

#[test]
fn tokens_travel_along_a_line() {
    let mut system = AmoebotSystem::new(SystemConfig::seeded(9));
    let mut ids = Vec::new();
    for x in 0..5 {
        ids.push(
            system
                .insert(Body::contracted(Node::new(x, 0), (x as usize * 2) % 6), Runner)
                .expect("line insert"),
        );
    }
    assert!(system.put_token(ids[0], Relay::Baton(0)));
    for x in 0..4 {
        system.activate_particle_at(Node::new(x, 0));
    }
    let last = system.particle(ids[4]).expect("last runner");
    assert_eq!(last.mailbox().peek_kind(RelayKind::Baton), Some(&Relay::Baton(4)));
    assert!(ids[..4]
        .iter()
        .all(|&id| system.particle(id).expect("runner").mailbox().is_empty()));
    assert_eq!(system.snapshot().particles[4].tokens, 1);
}
