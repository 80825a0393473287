/*!
 * Configuration Loading Tests
 * File and environment sources; env-mutating tests run serially
 */

use fragsim::config::{
    ConfigError, SimulationConfig, ENV_BLOCK_SIZE, ENV_CONFIG_PATH, ENV_FRAGMENT_THRESHOLD,
    ENV_MAX_REQUEST, ENV_TOTAL_MEMORY,
};
use fragsim::{Simulation, Variant};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

const ALL_VARS: [&str; 5] = [
    ENV_CONFIG_PATH,
    ENV_TOTAL_MEMORY,
    ENV_BLOCK_SIZE,
    ENV_FRAGMENT_THRESHOLD,
    ENV_MAX_REQUEST,
];

fn clear_env() {
    for var in ALL_VARS {
        std::env::remove_var(var);
    }
}

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(json.as_bytes()).expect("write temp config");
    file
}

#[test]
#[serial]
fn test_load_defaults() {
    clear_env();
    let config = SimulationConfig::load().unwrap();
    assert_eq!(config, SimulationConfig::default());
    assert_eq!(config.fixed.total_memory, 100);
    assert_eq!(config.fixed.block_size, 20);
    assert_eq!(config.first_fit.fragment_threshold, 5);
    assert_eq!(config.first_fit.max_request, None);
}

#[test]
#[serial]
fn test_load_file_then_env() {
    clear_env();
    let file = config_file(r#"{ "fixed": { "total_memory": 256, "block_size": 32 }, "first_fit": { "fragment_threshold": 8 } }"#);
    std::env::set_var(ENV_CONFIG_PATH, file.path());
    std::env::set_var(ENV_FRAGMENT_THRESHOLD, "12");

    let config = SimulationConfig::load().unwrap();
    clear_env();

    assert_eq!(config.fixed.total_memory, 256);
    assert_eq!(config.fixed.block_size, 32);
    // Missing fields keep their defaults
    assert_eq!(config.first_fit.total_memory, 100);
    // Environment wins over the file
    assert_eq!(config.first_fit.fragment_threshold, 12);
}

#[test]
#[serial]
fn test_total_memory_override_applies_to_both() {
    clear_env();
    std::env::set_var(ENV_TOTAL_MEMORY, "400");
    std::env::set_var(ENV_MAX_REQUEST, "50");
    let config = SimulationConfig::load().unwrap();
    clear_env();

    let mut sim = Simulation::new(&config).unwrap();
    assert_eq!(sim.fixed().total_blocks(), 20);
    assert_eq!(sim.snapshot().first_fit.stats.total_memory, 400);

    let outcome = sim.execute(&fragsim::Command::Allocate {
        variant: Variant::FirstFit,
        size: 51,
    });
    assert_eq!(outcome.kind(), "rejected");
}

#[test]
#[serial]
fn test_malformed_env_value() {
    clear_env();
    std::env::set_var(ENV_BLOCK_SIZE, "twenty");
    let err = SimulationConfig::load().unwrap_err();
    clear_env();

    assert!(matches!(
        err,
        ConfigError::InvalidEnv { var, ref value } if var == ENV_BLOCK_SIZE && value == "twenty"
    ));
}

#[test]
#[serial]
fn test_invalid_combination_rejected() {
    clear_env();
    std::env::set_var(ENV_TOTAL_MEMORY, "10");
    let err = SimulationConfig::load().unwrap_err();
    clear_env();

    assert!(matches!(
        err,
        ConfigError::BlockLargerThanMemory {
            block_size: 20,
            total_memory: 10
        }
    ));
}

#[test]
fn test_malformed_file() {
    let file = config_file("{ not json");
    let err = SimulationConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SimulationConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
