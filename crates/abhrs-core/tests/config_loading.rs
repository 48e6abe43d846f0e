//! Configuration loading from files
//!
//! Exercises the full load path: TOML file, environment-style overrides,
//! validation.

use abhrs_core::config::RandomnessMode;
use abhrs_core::{AbhrsError, ConfigValidation, Effects, ProtocolConfig};
use assert_matches::assert_matches;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn load_full_file() {
    let file = write_config(
        r#"
[parameters]
target_ring_size = 8
decoy_ratio = 0.25

[tuner]
cost_budget = 12.0
rounds = 10
hard_max_ring_size = 16

[tuner.weights]
attribute = 0.5
policy = 0.25
anonymity = 0.25

[randomness]
mode = "seeded"
seed = 7

[schema]
required_keys = ["role"]
"#,
    );

    let config = ProtocolConfig::load_from_file(file.path()).unwrap();
    config.validate().unwrap();

    let theta = config.initial_theta();
    assert_eq!(theta.target_ring_size, 8);
    assert_eq!(theta.decoy_ratio, 0.25);
    assert_eq!(config.tuner.rounds, 10);
    assert_eq!(config.randomness.mode, RandomnessMode::Seeded);
    assert_eq!(config.schema.required_keys, vec!["role".to_string()]);

    let effects = Effects::from_config(&config.randomness);
    assert!(effects.is_deterministic());
}

#[test]
fn missing_file_is_a_config_error() {
    let result = ProtocolConfig::load_from_file(std::path::Path::new("/nonexistent/abhrs.toml"));
    assert_matches!(result, Err(AbhrsError::Config { .. }));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let file = write_config("[parameters\ntarget_ring_size = ");
    let result = ProtocolConfig::load_from_file(file.path());
    assert_matches!(result, Err(AbhrsError::Config { .. }));
}

#[test]
fn override_then_validate_catches_bad_cap() {
    let file = write_config("[parameters]\ntarget_ring_size = 4\n");
    let mut config = ProtocolConfig::load_from_file(file.path()).unwrap();
    config
        .merge_with_vars(vec![(
            "ABHRS_TUNER_HARD_MAX_RING_SIZE".to_string(),
            "2".to_string(),
        )])
        .unwrap();
    assert_matches!(config.validate(), Err(AbhrsError::Config { .. }));
}
