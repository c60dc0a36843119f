/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;

use promptbridge::app_config::{AdapterBackend, Config, LogLevel};
use promptbridge::errors::ConfigError;
use promptbridge::pipeline::StageKind;

use crate::common::{create_temp_dir, create_test_file};

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.cache.max_size = 0;
    assert_eq!(config.validate(), Err(ConfigError::InvalidCacheSize(0)));
    config.cache.max_size = 10;

    config.cache.ttl_secs = 0;
    assert_eq!(config.validate(), Err(ConfigError::InvalidTtl));
    config.cache.ttl_secs = 60;

    config.pipeline.stages.clear();
    assert_eq!(config.validate(), Err(ConfigError::EmptyPipeline));
    config.pipeline.stages = vec![StageKind::GrammarCorrector];

    assert!(config.validate().is_ok());
}

#[test]
fn test_config_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config, Config::default());

    // A second load reads the file written by the first one
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_config_load_withCustomFile_shouldReadValues() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "cache": {"enabled": false, "max_size": 5, "ttl_secs": 10},
            "pipeline": {"stages": ["grammar_corrector", "toxicity_classifier"]},
            "adapter": {"backend": "ollama", "model": "mistral"},
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert!(!config.cache.enabled);
    assert_eq!(config.cache.max_size, 5);
    assert_eq!(
        config.pipeline.stages,
        vec![StageKind::GrammarCorrector, StageKind::ToxicityClassifier]
    );
    assert_eq!(config.adapter.backend, AdapterBackend::Ollama);
    assert_eq!(config.adapter.model, "mistral");
    assert_eq!(config.adapter.endpoint, "http://localhost:11434");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_config_load_withUnknownStage_shouldFail() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{"pipeline": {"stages": ["spellchecker"]}}"#,
    )?;

    assert!(Config::load(&path).is_err());
    Ok(())
}

#[test]
fn test_config_save_shouldRoundTrip() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = dir.path().join("saved.json");

    let mut config = Config::default();
    config.cache.max_size = 42;
    config.adapter.temperature = 0.5;
    config.save(&path)?;

    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

#[test]
fn test_adapterConfig_buildTranslator_shouldMatchBackend() {
    let mut config = Config::default();
    let translator = config.adapter.build_translator().unwrap();
    assert_eq!(translator.name(), "passthrough");

    config.adapter.backend = AdapterBackend::Ollama;
    let translator = config.adapter.build_translator().unwrap();
    assert_eq!(translator.name(), "ollama");
}

#[test]
fn test_adapterBackend_fromStr_shouldBeCaseInsensitive() {
    assert_eq!("Ollama".parse::<AdapterBackend>().unwrap(), AdapterBackend::Ollama);
    assert!("openai".parse::<AdapterBackend>().is_err());
}
