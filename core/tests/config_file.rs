mod common;

use postings_core::{EngineConfig, InvertedIndex};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_partial_config_with_defaults() {
    common::init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(&path, r#"{ "corpus_size": 17, "phrase_window": 2 }"#).unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.corpus_size, 17);
    assert_eq!(config.phrase_window, 2);
    assert_eq!(config.feedback.alpha, 0.1);
    assert_eq!(InvertedIndex::from_config(&config).corpus_size(), 17);
}

#[test]
fn rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(&path, r#"{ "corpus_size": 0 }"#).unwrap();
    let err = EngineConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("corpus_size"));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = EngineConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn round_trips_through_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.json");
    let mut config = EngineConfig::with_corpus_size(42);
    config.ranking.static_weight = 0.25;
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap(), config);
}
