use amoebot_algorithms::{BlobParams, DemoToken, Line, LineState, TokenDemo};
use amoebot_core::{RunLimits, Simulator, StopReason, SystemConfig};

#[test]
fn line_forms_from_compact_blob() {
    let config = SystemConfig::seeded(0xC0FFEE);
    let blob = BlobParams {
        particles: 8,
        hole_probability: 0.0,
    };
    let mut sim = Simulator::new(Line::new(blob), config).expect("populate");
    assert_eq!(sim.system().size(), 9);
    let summary = sim
        .run(RunLimits {
            max_rounds: Some(100_000),
            max_activations: None,
        })
        .expect("run");
    assert_eq!(summary.stop_reason, StopReason::Terminated);
    assert!(
        sim.system()
            .behaviors()
            .all(|(_, particle)| matches!(particle.state(), LineState::Seed | LineState::Finish))
    );
    sim.system().check_invariants().expect("consistent");
}

#[test]
fn token_demo_conserves_tokens() {
    let blob = BlobParams {
        particles: 6,
        hole_probability: 0.1,
    };
    let mut sim = Simulator::new(TokenDemo::new(blob), SystemConfig::seeded(99)).expect("populate");
    let limits = RunLimits {
        max_rounds: None,
        max_activations: Some(5_000),
    };
    let summary = sim.run(limits).expect("run");
    assert_eq!(summary.stop_reason, StopReason::ActivationLimit);

    let system = sim.system();
    let mut red = 0;
    let mut blue = 0;
    for (id, particle) in system.particles() {
        let mailbox = particle.mailbox();
        red += mailbox.count_kind(DemoToken::Red);
        blue += mailbox.count_kind(DemoToken::Blue);
        if !mailbox.is_empty() {
            let state = system.behavior(id).expect("behaviour").state();
            assert!(state.is_structure(), "{state:?} particle holds tokens");
        }
    }
    assert_eq!((red, blue), (3, 2));
    let snapshot_tokens: usize = system.snapshot().particles.iter().map(|p| p.tokens).sum();
    assert_eq!(snapshot_tokens, 5);
}
