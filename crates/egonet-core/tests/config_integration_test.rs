use egonet_core::{ConfigManager, EgoNetConfig, EgoNetError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_create_and_reload_default_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    ConfigManager::create_default_config(&config_path).unwrap();
    assert!(config_path.exists());

    let manager = ConfigManager::from_path(&config_path).unwrap();
    assert_eq!(manager.config_path(), Some(config_path.as_path()));
    assert_eq!(
        manager.config().analysis,
        EgoNetConfig::default().analysis
    );
}

#[test]
fn test_config_file_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("egonet.toml");
    fs::write(
        &config_path,
        r#"
[analysis]
eigenvector_max_iterations = 500

[colors]
ego = "gold"

[logging]
format = "compact"
"#,
    )
    .unwrap();

    let manager = ConfigManager::from_path(&config_path).unwrap();
    let config = manager.config();
    assert_eq!(config.analysis.eigenvector_max_iterations, 500);
    assert_eq!(config.colors.ego, "gold");
    assert_eq!(config.colors.fallback, "white");
    assert_eq!(config.logging.format, "compact");
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("egonet.toml");
    fs::write(&config_path, "[sampling]\ntarget_count = 0\n").unwrap();
    assert!(matches!(
        ConfigManager::from_path(&config_path),
        Err(EgoNetError::Config(_))
    ));

    fs::write(&config_path, "[sampling\n").unwrap();
    assert!(matches!(
        ConfigManager::from_path(&config_path),
        Err(EgoNetError::TomlDecode(_))
    ));
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");
    assert!(matches!(
        ConfigManager::from_path(&missing),
        Err(EgoNetError::Io(_))
    ));
}
