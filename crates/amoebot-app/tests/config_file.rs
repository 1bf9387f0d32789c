use std::io::Write;

use amoebot_app::{AlgorithmKind, ConfigError, RunConfig, run};
use amoebot_core::StopReason;

#[test]
fn loads_config_from_disk_and_runs() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{
            "algorithm": "line",
            "system": {{ "rng_seed": 31 }},
            "blob": {{ "particles": 6, "hole_probability": 0.0 }},
            "limits": {{ "max_rounds": 100000 }}
        }}"#
    )
    .expect("write config");

    let config = RunConfig::load(file.path()).expect("load");
    assert_eq!(config.algorithm, AlgorithmKind::Line);
    assert_eq!(config.blob.particles, 6);

    let report = run(&config).expect("run");
    assert_eq!(report.summary.stop_reason, StopReason::Terminated);
    assert_eq!(report.snapshot.particles.len(), 7);
    assert!(
        report
            .snapshot
            .particles
            .iter()
            .all(|particle| particle.tail.is_none())
    );
}

#[test]
fn missing_and_malformed_files_are_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.json");
    assert!(matches!(
        RunConfig::load(&missing),
        Err(ConfigError::Read { .. })
    ));

    let garbled = dir.path().join("garbled.json");
    std::fs::write(&garbled, "{ not json").expect("write");
    let err = RunConfig::load(&garbled).expect_err("parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("garbled.json"));
}

#[test]
fn out_of_range_hole_probability_fails_validation() {
    let mut config = RunConfig::default();
    config.blob.hole_probability = -0.5;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
}
