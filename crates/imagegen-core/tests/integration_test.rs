//! Configuration and error handling working together

use imagegen_core::{
    config::{load_config, load_config_or_default, AppConfig, GenerationConfig, RunMode},
    error::{CoreError, Result},
    logging::LogConfig,
};
use std::path::PathBuf;

#[test]
fn test_config_loading_falls_back_to_defaults() {
    let config = load_config_or_default("nonexistent.toml");
    assert_eq!(config.agent.model, "gemma3:4b");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_yaml_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("imagegen.yaml");
    std::fs::write(&path, "logging:\n  level: trace\nagent:\n  temperature: 0.2\n")
        .expect("write config");

    let config = load_config(&path).expect("load config");
    assert_eq!(config.logging.level, "trace");
    assert!((config.agent.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.agent.max_iterations, 3);
}

#[test]
fn test_logging_config_follows_app_config() {
    let config = AppConfig::default();
    let log = LogConfig::from(&config.logging);
    assert_eq!(log.level, "info");
    assert!(!log.json);
}

#[test]
fn test_generation_config_without_process_environment() {
    let config = GenerationConfig::from_lookup(|key| match key {
        "ENV" => Some("staging".to_string()),
        "SAVE_PATH" => Some("/srv/images".to_string()),
        "HF_TOKEN" => Some("hf_token".to_string()),
        _ => None,
    })
    .expect("complete configuration");

    assert_eq!(config.mode, RunMode::Simulated);
    assert_eq!(config.save_directory, PathBuf::from("/srv/images"));
}

#[test]
fn test_missing_token_is_a_config_error() {
    let result: Result<GenerationConfig> = GenerationConfig::from_lookup(|key| match key {
        "ENV" => Some("prod".to_string()),
        "SAVE_PATH" => Some("/srv/images".to_string()),
        _ => None,
    });

    match result {
        Err(CoreError::Config(msg)) => assert!(msg.contains("HF_TOKEN")),
        other => panic!("expected config error, got {:?}", other.map(|c| c.mode)),
    }
}
