//! Integration tests for logging functionality
//!
//! The global subscriber can only be installed once per process, so a
//! single test covers initialization.

use inserter::config::LoggingConfig;
use inserter::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "/var/log/inserter");
}

#[test]
fn test_init_logging_creates_directory_once() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    assert!(guard.has_file_output());
    assert!(log_path.exists());
    tracing::info!(collection = "blocks", "Logging integration test");

    // A second subscriber is refused rather than panicking
    let second = init_logging("info", &LoggingConfig::default());
    assert!(second.is_err());
}

#[test]
fn test_init_logging_rejects_bad_level() {
    let result = init_logging("loud", &LoggingConfig::default());
    assert!(result.is_err());
}
