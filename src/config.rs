//! Configuration module for `Greenmove` analytics

use crate::core::intensity::IntensityThresholds;
use crate::core::loader::ConnectionParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the configuration directory inside config values.
const DIR_VARIABLE: &str = "$GREENMOVE";

/// Default `PostgreSQL` port.
pub const DEFAULT_PORT: u16 = 5432;

/// Keys accepted by `get`, `set` and `unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "level",
    "file",
    "quiet",
    "host",
    "database",
    "user",
    "password",
    "port",
    "reports_dir",
    "low_intensity",
    "moderate_intensity",
    "high_intensity",
    "target_intensity",
    "top_users",
];

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Suppress progress text
    #[serde(default)]
    pub quiet: bool,
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Server host name
    #[serde(default)]
    pub host: String,
    /// Database name
    #[serde(default)]
    pub name: String,
    /// Login user
    #[serde(default)]
    pub user: String,
    /// Login password (prefer the `GREENMOVE_DB_PASSWORD` variable)
    #[serde(default)]
    pub password: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            name: String::new(),
            user: String::new(),
            password: String::new(),
            port: DEFAULT_PORT,
        }
    }
}

/// Paths configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory receiving generated reports
    #[serde(default)]
    pub reports_dir: String,
}

/// Analysis settings: intensity tiers, recommended target and batch size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound of the low tier (g CO2/km)
    pub low_intensity: f64,
    /// Upper bound of the moderate tier (g CO2/km)
    pub moderate_intensity: f64,
    /// Intensity above which a mode is flagged as a priority (g CO2/km)
    pub high_intensity: f64,
    /// Recommended fleet-wide intensity (g CO2/km)
    pub target_intensity: f64,
    /// Number of per-user reports in the full suite
    pub top_users: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let thresholds = IntensityThresholds::default();
        Self {
            low_intensity: thresholds.low,
            moderate_intensity: thresholds.moderate,
            high_intensity: thresholds.high,
            target_intensity: thresholds.target,
            top_users: 5,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override quiet flag
    pub quiet: Option<bool>,
    /// Override database host
    pub db_host: Option<String>,
    /// Override database name
    pub db_name: Option<String>,
    /// Override database user
    pub db_user: Option<String>,
    /// Override database password
    pub db_password: Option<String>,
    /// Override database port
    pub db_port: Option<u16>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$GREENMOVE` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/greenmove`
    /// - macOS: `~/Library/Application Support/greenmove`
    /// - Windows: `%APPDATA%\greenmove`
    #[must_use]
    pub fn get_greenmove_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("greenmove")
    }

    /// Get the user config file path (`dconfig.toml` in debug builds)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_greenmove_dir().join(CONFIG_FILE_NAME)
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// updated; numeric fields already carry serde defaults.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;
        let mut fill = |field: &mut String, default: &String| {
            if field.is_empty() && !default.is_empty() {
                field.clone_from(default);
                changed = true;
            }
        };

        fill(&mut self.logging.level, &defaults.logging.level);
        fill(&mut self.logging.file, &defaults.logging.file);
        fill(&mut self.database.host, &defaults.database.host);
        fill(&mut self.database.name, &defaults.database.name);
        fill(&mut self.database.user, &defaults.database.user);
        fill(&mut self.paths.reports_dir, &defaults.paths.reports_dir);

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the file on disk is untouched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(quiet) = overrides.quiet {
            self.logging.quiet = quiet;
        }
        if let Some(host) = &overrides.db_host {
            self.database.host.clone_from(host);
        }
        if let Some(name) = &overrides.db_name {
            self.database.name.clone_from(name);
        }
        if let Some(user) = &overrides.db_user {
            self.database.user.clone_from(user);
        }
        if let Some(password) = &overrides.db_password {
            self.database.password.clone_from(password);
        }
        if let Some(port) = overrides.db_port {
            self.database.port = port;
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Expand `$GREENMOVE` in a config value
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_greenmove_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields use their serde defaults. `$GREENMOVE` is expanded in
    /// path-like values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the compiled-in default configuration is invalid TOML.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file is merged with newer defaults and saved back when
    /// fields were added. Falls back to defaults, with a warning, when the
    /// file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// [`Config::load`] against an explicit file
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save_to(config_file);
            return defaults;
        }

        let parsed = fs::read_to_string(config_file)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_toml(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save_to(config_file);
                }
                config
            }
            Err(e) => {
                logger::warn!(
                    "Ignoring {} and using defaults: {e}",
                    config_file.display()
                );
                defaults
            }
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the directory
    /// cannot be created or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration to `config_file`
    ///
    /// # Errors
    /// Same as [`Config::save`].
    pub fn save_to(&self, config_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key. The password is masked.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "quiet" => Some(self.logging.quiet.to_string()),
            "host" => Some(self.database.host.clone()),
            "database" | "name" => Some(self.database.name.clone()),
            "user" => Some(self.database.user.clone()),
            "password" => Some(mask(&self.database.password)),
            "port" => Some(self.database.port.to_string()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "low_intensity" => Some(self.analysis.low_intensity.to_string()),
            "moderate_intensity" => Some(self.analysis.moderate_intensity.to_string()),
            "high_intensity" => Some(self.analysis.high_intensity.to_string()),
            "target_intensity" => Some(self.analysis.target_intensity.to_string()),
            "top_users" => Some(self.analysis.top_users.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                if logger::Level::parse(value).is_none() {
                    return Err(format!("Invalid log level: '{value}'"));
                }
                self.logging.level = value.to_ascii_lowercase();
            }
            "file" => self.logging.file = value.to_string(),
            "quiet" => self.logging.quiet = parse_value(key, value)?,
            "host" => self.database.host = value.to_string(),
            "database" | "name" => self.database.name = value.to_string(),
            "user" => self.database.user = value.to_string(),
            "password" => self.database.password = value.to_string(),
            "port" => self.database.port = parse_value(key, value)?,
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "low_intensity" => self.analysis.low_intensity = parse_value(key, value)?,
            "moderate_intensity" => self.analysis.moderate_intensity = parse_value(key, value)?,
            "high_intensity" => self.analysis.high_intensity = parse_value(key, value)?,
            "target_intensity" => self.analysis.target_intensity = parse_value(key, value)?,
            "top_users" => self.analysis.top_users = parse_value(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "quiet" => self.logging.quiet = defaults.logging.quiet,
            "host" => self.database.host.clone_from(&defaults.database.host),
            "database" | "name" => self.database.name.clone_from(&defaults.database.name),
            "user" => self.database.user.clone_from(&defaults.database.user),
            "password" => self.database.password.clone_from(&defaults.database.password),
            "port" => self.database.port = defaults.database.port,
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "low_intensity" => self.analysis.low_intensity = defaults.analysis.low_intensity,
            "moderate_intensity" => {
                self.analysis.moderate_intensity = defaults.analysis.moderate_intensity;
            }
            "high_intensity" => self.analysis.high_intensity = defaults.analysis.high_intensity,
            "target_intensity" => {
                self.analysis.target_intensity = defaults.analysis.target_intensity;
            }
            "top_users" => self.analysis.top_users = defaults.analysis.top_users,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Connection parameters, or the names of the settings that are still empty.
    ///
    /// # Errors
    /// Returns the list of missing keys (`host`, `database`, `user`, `password`).
    pub fn connection_params(&self) -> Result<ConnectionParams, Vec<&'static str>> {
        let db = &self.database;
        let missing: Vec<&'static str> = [
            ("host", &db.host),
            ("database", &db.name),
            ("user", &db.user),
            ("password", &db.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(ConnectionParams {
            host: db.host.clone(),
            database: db.name.clone(),
            user: db.user.clone(),
            password: db.password.clone(),
            port: db.port,
        })
    }

    /// Intensity thresholds and recommended target.
    ///
    /// # Errors
    /// Returns a message when the three tier bounds are not strictly increasing
    /// or the target is not positive.
    pub fn thresholds(&self) -> Result<IntensityThresholds, String> {
        IntensityThresholds::new(
            self.analysis.low_intensity,
            self.analysis.moderate_intensity,
            self.analysis.high_intensity,
            self.analysis.target_intensity,
        )
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid value for '{key}': '{value}'"))
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  quiet = {}", self.logging.quiet)?;

        writeln!(f, "\n[database]")?;
        writeln!(f, "  host = \"{}\"", self.database.host)?;
        writeln!(f, "  name = \"{}\"", self.database.name)?;
        writeln!(f, "  user = \"{}\"", self.database.user)?;
        writeln!(f, "  password = \"{}\"", mask(&self.database.password))?;
        writeln!(f, "  port = {}", self.database.port)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[analysis]")?;
        writeln!(f, "  low_intensity = {}", self.analysis.low_intensity)?;
        writeln!(f, "  moderate_intensity = {}", self.analysis.moderate_intensity)?;
        writeln!(f, "  high_intensity = {}", self.analysis.high_intensity)?;
        writeln!(f, "  target_intensity = {}", self.analysis.target_intensity)?;
        writeln!(f, "  top_users = {}", self.analysis.top_users)?;

        Ok(())
    }
}
