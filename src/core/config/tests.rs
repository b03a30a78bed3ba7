use super::data::{BackendKind, Config};
use super::io::ConfigError;
use super::orchestrator::ConfigOrchestrator;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_orchestrator_detects_external_updates() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let orchestrator = ConfigOrchestrator::new(config_path.clone());

    orchestrator
        .mutate(|config| {
            config.endpoint_url = Some("https://first.example/chat".to_string());
            Ok(())
        })
        .expect("mutate failed");

    let persisted = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(
        persisted.endpoint_url.as_deref(),
        Some("https://first.example/chat")
    );

    let cached = orchestrator.load_with_cache().expect("cached load failed");
    assert_eq!(cached, persisted);

    std::thread::sleep(Duration::from_millis(1100));

    let external = Config {
        endpoint_url: Some("https://second.example/chat".to_string()),
        ..Default::default()
    };
    external
        .save_to_path(&config_path)
        .expect("external save failed");

    let reloaded = orchestrator.load_with_cache().expect("reload failed");
    assert_eq!(
        reloaded.endpoint_url.as_deref(),
        Some("https://second.example/chat")
    );
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        endpoint_url: Some("https://api.example/prod/chat".to_string()),
        backend: Some(BackendKind::Http),
        password_file: Some(PathBuf::from("/etc/yccoach/password")),
        mock_latency_ms: Some(0),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let contents = std::fs::read_to_string(&config_path).expect("config file exists");
    assert!(contents.contains("backend = \"http\""));

    let mut loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    loaded.backend = None;
    loaded.password_file = None;
    loaded
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.backend, None);
    assert_eq!(reloaded.password_file, None);
    assert_eq!(reloaded.mock_latency(), Duration::ZERO);
}

#[test]
fn invalid_backend_is_a_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "backend = \"carrier-pigeon\"\n").expect("write config");

    let err = Config::load_from_path(&config_path).expect_err("unknown backend must fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn summary_hides_api_key() {
    let config = Config {
        api_key: Some("super-secret".to_string()),
        ..Default::default()
    };
    let lines = config.summary_lines();
    assert!(lines.iter().any(|line| line == "  api-key: (set)"));
    assert!(lines.iter().all(|line| !line.contains("super-secret")));
}
