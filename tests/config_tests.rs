//! Integration tests for configuration management

use greenmove_analytics::config::{Config, ConfigOverrides, CONFIG_KEYS};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.reports_dir.is_empty(),
        "Default reports_dir should not be empty"
    );
    assert_eq!(config.database.name, "greenmove");
    assert_eq!(config.database.port, 5432);
    assert!(config.database.password.is_empty());
    assert_eq!(config.analysis.top_users, 5);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
quiet = true

[database]
host = "db.example.com"
name = "trips"
user = "analyst"
password = "secret"
port = 6543

[paths]
reports_dir = "./reports"

[analysis]
low_intensity = 10.0
moderate_intensity = 40.0
high_intensity = 90.0
target_intensity = 30.0
top_users = 3
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.quiet);
    assert_eq!(config.database.host, "db.example.com");
    assert_eq!(config.database.name, "trips");
    assert_eq!(config.database.user, "analyst");
    assert_eq!(config.database.password, "secret");
    assert_eq!(config.database.port, 6543);
    assert_eq!(config.paths.reports_dir, "./reports");
    assert!((config.analysis.target_intensity - 30.0).abs() < f64::EPSILON);
    assert_eq!(config.analysis.top_users, 3);
}

#[test]
fn test_config_from_toml_partial() {
    // Missing fields within sections use defaults
    let toml_str = r#"
[logging]
level = "error"

[database]
host = "localhost"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.quiet);
    assert_eq!(config.database.port, 5432);
    assert_eq!(config.analysis.top_users, 5);
    assert!((config.analysis.low_intensity - 15.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$GREENMOVE/test.log"

[paths]
reports_dir = "$GREENMOVE/reports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("greenmove"));
    assert!(!config.logging.file.contains("$GREENMOVE"));
    assert!(config.paths.reports_dir.ends_with("reports"));
    assert!(!config.paths.reports_dir.contains("$GREENMOVE"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config.set("quiet", "true").expect("Failed to set quiet");
    assert_eq!(config.get("quiet").unwrap(), "true");
    assert!(config.logging.quiet);

    config.set("port", "6543").expect("Failed to set port");
    assert_eq!(config.database.port, 6543);

    // The password is stored but never displayed
    config.set("password", "secret").expect("Failed to set password");
    assert_eq!(config.database.password, "secret");
    assert_ne!(config.get("password").unwrap(), "secret");

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
    assert!(config.set("port", "not-a-port").is_err());
    assert!(config.set("level", "loud").is_err());
}

#[test]
fn test_every_listed_key_is_readable() {
    let config = Config::from_defaults();
    for key in CONFIG_KEYS {
        assert!(config.get(key).is_some(), "key {key} should be readable");
    }
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "error").expect("Failed to set level");
    config.set("top_users", "12").expect("Failed to set top_users");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("top_users", &defaults)
        .expect("Failed to unset top_users");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.analysis.top_users, defaults.analysis.top_users);
    assert!(config.unset("unknown_key", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("host", "db.local").expect("Failed to set host");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config, config);
}

#[test]
fn test_load_from_creates_missing_file() {
    let (_temp_dir, config_file) = setup_temp_config();

    let config = Config::load_from(&config_file);

    assert_eq!(config, Config::from_defaults());
    assert!(config_file.exists());
}

#[test]
fn test_load_from_keeps_unparseable_file() {
    let (_temp_dir, config_file) = setup_temp_config();
    let broken = "[database]\nhost = \"db.local\"\nport = \"not a number\n";
    fs::write(&config_file, broken).expect("Failed to write config");

    let config = Config::load_from(&config_file);

    assert_eq!(config, Config::from_defaults());
    // The user's file is left for them to fix
    assert_eq!(fs::read_to_string(&config_file).unwrap(), broken);
}

#[test]
fn test_load_from_reads_existing_file() {
    let (_temp_dir, config_file) = setup_temp_config();
    fs::write(&config_file, "[database]\nhost = \"db.local\"\nport = 6543\n")
        .expect("Failed to write config");

    let config = Config::load_from(&config_file);

    assert_eq!(config.database.host, "db.local");
    assert_eq!(config.database.port, 6543);
    // Missing sections come from the defaults
    assert_eq!(config.analysis.top_users, 5);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        quiet: Some(true),
        db_host: Some("db.override".to_string()),
        db_name: Some("other".to_string()),
        db_user: Some("reporter".to_string()),
        db_password: Some("pw".to_string()),
        db_port: Some(15432),
        reports_dir: Some("./custom_reports".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.quiet);
    assert_eq!(config.database.host, "db.override");
    assert_eq!(config.database.name, "other");
    assert_eq!(config.database.user, "reporter");
    assert_eq!(config.database.password, "pw");
    assert_eq!(config.database.port, 15432);
    assert_eq!(config.paths.reports_dir, "./custom_reports");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.database, before.database);
    assert_eq!(config.paths, before.paths);
}

#[test]
fn test_connection_params_report_missing_keys() {
    let mut config = Config::from_toml(
        r#"
[database]
host = ""
name = "greenmove"
user = ""
password = ""
"#,
    )
    .expect("Failed to parse TOML");

    let missing = config.connection_params().unwrap_err();
    assert_eq!(missing, vec!["host", "user", "password"]);

    config.set("host", "localhost").unwrap();
    config.set("user", "analyst").unwrap();
    config.set("password", "secret").unwrap();
    let params = config.connection_params().expect("all parameters set");
    assert_eq!(params.host, "localhost");
    assert_eq!(params.port, 5432);
    // The password stays out of the displayed form
    assert!(!params.to_string().contains("secret"));
}

#[test]
fn test_thresholds_are_validated() {
    let mut config = Config::from_defaults();
    let thresholds = config.thresholds().expect("defaults are valid");
    assert!((thresholds.target - 50.0).abs() < f64::EPSILON);

    config.set("moderate_intensity", "5").unwrap();
    assert!(config.thresholds().is_err());
}

#[test]
fn test_config_display_format() {
    let mut config = Config::from_defaults();
    config.set("password", "secret").unwrap();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[database]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[analysis]"));
    assert!(display_str.contains("reports_dir"));
    assert!(!display_str.contains("secret"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = ""
file = ""

[database]
host = ""
name = ""

[paths]
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.database.name, "greenmove");
    assert_eq!(config.paths.reports_dir, defaults.paths.reports_dir);
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"

[database]
host = "db.mine"
name = "mine"

[paths]
reports_dir = "/srv/reports"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.database.host, "db.mine");
    assert_eq!(config.database.name, "mine");
    assert_eq!(config.paths.reports_dir, "/srv/reports");
}

#[test]
fn test_get_greenmove_dir() {
    let dir = Config::get_greenmove_dir();

    assert!(dir.to_string_lossy().contains("greenmove"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
