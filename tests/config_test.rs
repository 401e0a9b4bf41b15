//! Tests for loading [`Config`] from disk.

use std::io::Write;
use std::time::Duration;

use cellgpt::{CacheDuration, CellGpt, CellGptError, Config};

#[test]
fn load_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[models]
default = "gpt-4.1-mini"

[generation]
max_tokens = 64
temperature = 0.2

[cache]
duration = 300
"#
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.models.default, "gpt-4.1-mini");
    assert_eq!(config.models.advanced, "gpt-4o");
    assert_eq!(config.generation.max_tokens, 64);
    assert_eq!(config.generation.temperature, 0.2);
    assert_eq!(
        config.cache.duration,
        CacheDuration::Bounded(Duration::from_secs(300))
    );
}

#[test]
fn empty_file_yields_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn malformed_file_names_the_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[generation]\nmax_tokens = \"lots\"").unwrap();

    let err = Config::load_from_file(file.path()).unwrap_err();

    match err {
        CellGptError::Configuration(msg) => {
            assert!(msg.contains("Failed to parse config"));
            assert!(msg.contains(&file.path().display().to_string()));
        }
        other => panic!("expected Configuration, got {other:?}"),
    }
}

#[test]
fn missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(matches!(err, CellGptError::Configuration(_)));
}

#[test]
fn loaded_config_drives_the_facade() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[models]\nbasic = \"cheap\"\n[api]\ntimeout_secs = 10").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    let gpt = CellGpt::builder().config(config).build().unwrap();

    assert_eq!(gpt.config().models.basic, "cheap");
    assert_eq!(gpt.config().api.timeout_secs, 10);
    assert_eq!(gpt.pipeline().client().base_url(), "https://api.openai.com/v1");
}
