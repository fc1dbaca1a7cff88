use analogy_core::{AnalogyConfig, ConfigError, ConfigManager};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

const OVERRIDE_VARS: [&str; 5] = [
    "ANALOGY_SERVICE_URL",
    "ANALOGY_TIMEOUT_SECS",
    "ANALOGY_MAX_RETRIES",
    "ANALOGY_LOG_FORMAT",
    "RUST_LOG",
];

fn clear_overrides() {
    for var in OVERRIDE_VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[service]
base_url = "http://analogy.internal:5000"
timeout_secs = 30
max_retries = 2

[logging]
level = "debug"
format = "compact"
"#,
    )
    .unwrap();

    let manager = ConfigManager::from_file(&path).unwrap();
    let config = manager.config();
    assert_eq!(config.service.base_url, "http://analogy.internal:5000");
    assert_eq!(config.service.timeout_secs, 30);
    assert_eq!(config.service.max_retries, 2);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "compact");
    assert_eq!(manager.config_path(), Some(path.as_path()));
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[service]\nbase_url = \"http://from-file:5000\"\n").unwrap();

    std::env::set_var("ANALOGY_SERVICE_URL", "http://from-env:9000");
    std::env::set_var("ANALOGY_TIMEOUT_SECS", "15");
    std::env::set_var("ANALOGY_MAX_RETRIES", "not-a-number");
    let manager = ConfigManager::from_file(&path);
    clear_overrides();

    let config = manager.unwrap().config().clone();
    assert_eq!(config.service.base_url, "http://from-env:9000");
    assert_eq!(config.service.timeout_secs, 15);
    assert_eq!(config.service.max_retries, 0);
}

#[test]
#[serial]
fn test_rust_log_directives_do_not_touch_config_level() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[logging]\nlevel = \"info\"\n").unwrap();

    std::env::set_var("RUST_LOG", "info,reqwest=warn");
    let manager = ConfigManager::from_file(&path);
    clear_overrides();

    let config = manager.unwrap().config().clone();
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn test_missing_file_is_not_found() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let result = ConfigManager::from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
#[serial]
fn test_malformed_file_is_parse_error() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[service\nbase_url = ").unwrap();

    let result = ConfigManager::from_file(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
#[serial]
fn test_invalid_values_fail_validation() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[service]\ntimeout_secs = 0\n").unwrap();

    let result = ConfigManager::from_file(&path);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
#[serial]
fn test_create_default_config_round_trips() {
    clear_overrides();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    ConfigManager::create_default_config(&path).unwrap();
    assert!(path.exists());

    let manager = ConfigManager::from_file(&path).unwrap();
    assert_eq!(manager.config(), &AnalogyConfig::default());
}
